use super::{interrupt_flag, open_journal};
use crate::camera::StillCamera;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::monitor::Monitor;
use crate::errors::AppResult;
use crate::face::FaceApiClient;
use crate::hardware::open_motion_sensor;
use crate::http::build_client;
use crate::sink::build_sink;
use crate::ui::messages::{header, success};
use std::time::Duration;

/// Handle the `run` command: the capture loop.
///
/// Everything the loop needs (credentials, HTTP client, GPIO pin) is set up
/// before the first poll, so a missing setting fails right away.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Run {
        sink,
        interval,
        cycles,
        simulate,
    } = cmd
    {
        let sink_kind = sink.unwrap_or(cfg.sink);
        let interval = Duration::from_secs(interval.unwrap_or(cfg.sensor.poll_interval_secs));

        let http = build_client(cfg.http_timeout_secs)?;
        let detector = FaceApiClient::from_config(cfg, http.clone())?;
        let report_sink = build_sink(sink_kind, cfg, http)?;
        let sensor = open_motion_sensor(cfg.sensor.pin, *simulate)?;

        let mut monitor = Monitor::new(
            sensor,
            Box::new(StillCamera::new(cfg.camera.clone())),
            Box::new(detector),
            report_sink,
            interval,
        );
        if let Some(journal) = open_journal(cfg) {
            monitor = monitor.with_journal(journal);
        }

        let running = interrupt_flag();
        header(format!(
            "Watching GPIO{} → {} (Ctrl+C to stop)",
            cfg.sensor.pin,
            sink_kind.as_str()
        ));

        let summary = monitor.run(&running, *cycles)?;
        // dropping the monitor releases the pin
        drop(monitor);

        success(format!(
            "Stopped after {} cycle(s): {} detection(s), {} report(s) delivered, {} failed",
            summary.cycles, summary.detections, summary.delivered, summary.rejected
        ));
    }

    Ok(())
}
