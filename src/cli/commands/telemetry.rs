use super::{interrupt_flag, open_journal};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::telemetry::Telemetry;
use crate::errors::AppResult;
use crate::hardware::{open_motion_sensor, open_thermometer};
use crate::http::build_client;
use crate::sink::WebhookClient;
use crate::ui::messages::{header, success};
use std::time::Duration;

/// Handle the `telemetry` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Telemetry {
        interval,
        cycles,
        simulate,
    } = cmd
    {
        let interval = Duration::from_secs(interval.unwrap_or(cfg.sensor.poll_interval_secs));
        let webhook = WebhookClient::from_config(cfg, build_client(cfg.http_timeout_secs)?)?;
        let sensor = open_motion_sensor(cfg.sensor.telemetry_pin, *simulate)?;
        let thermometer = open_thermometer(cfg, *simulate)?;

        let mut telemetry = Telemetry::new(sensor, thermometer, webhook, interval);
        if let Some(journal) = open_journal(cfg) {
            telemetry = telemetry.with_journal(journal);
        }

        let running = interrupt_flag();
        header(format!(
            "Telemetry: GPIO{} + I2C {:#04x} every {}s (Ctrl+C to stop)",
            cfg.sensor.telemetry_pin,
            cfg.thermometer.address,
            interval.as_secs()
        ));

        let sent = telemetry.run(&running, *cycles)?;
        drop(telemetry);
        success(format!("Stopped after {} sample(s)", sent));
    }

    Ok(())
}
