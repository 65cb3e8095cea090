//! Destinations for detected face attributes.
//!
//! Each sink gets exactly one `report` call per detected face. `begin` runs
//! once per detection before those calls (the console sink asks the
//! operator for its value there).

pub mod console;
pub mod kintone;
pub mod webhook;

use crate::config::{Config, SinkKind};
use crate::errors::AppResult;
use crate::face::FaceRecord;
use chrono::{DateTime, Local};
use reqwest::blocking::Client;

pub use console::ConsoleSink;
pub use kintone::KintoneSink;
pub use webhook::{WebhookClient, WebhookSink, WebhookValues};

pub trait ReportSink {
    fn name(&self) -> &'static str;

    fn begin(&mut self, _faces: &[FaceRecord]) -> AppResult<()> {
        Ok(())
    }

    fn report(&mut self, face: &FaceRecord, at: &DateTime<Local>) -> AppResult<()>;
}

/// Build the configured sink. Missing credentials fail here, before the
/// loop starts.
pub fn build_sink(kind: SinkKind, cfg: &Config, http: Client) -> AppResult<Box<dyn ReportSink>> {
    let sink: Box<dyn ReportSink> = match kind {
        SinkKind::Kintone => Box::new(KintoneSink::from_config(cfg, http)?),
        SinkKind::Webhook => Box::new(WebhookSink::new(WebhookClient::from_config(cfg, http)?)),
        SinkKind::Console => Box::new(ConsoleSink::stdio(WebhookClient::from_config(cfg, http)?)),
    };
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn sink_construction_checks_credentials() {
        let cfg = Config::default();
        for kind in [SinkKind::Kintone, SinkKind::Webhook, SinkKind::Console] {
            let res = build_sink(kind, &cfg, Client::new());
            assert!(matches!(res, Err(AppError::MissingSetting(_))));
        }
    }

    #[test]
    fn sink_names() {
        let mut cfg = Config::default();
        cfg.kintone.domain = Some("example".into());
        cfg.kintone.app_id = Some(1);
        cfg.kintone.token = Some("t".into());
        cfg.webhook.key = Some("k".into());
        cfg.webhook.event = Some("e".into());

        for kind in [SinkKind::Kintone, SinkKind::Webhook, SinkKind::Console] {
            let sink = build_sink(kind, &cfg, Client::new()).unwrap();
            assert_eq!(sink.name(), kind.as_str());
        }
    }
}
