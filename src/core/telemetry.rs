//! Environment telemetry: PIR state and temperature pushed to the webhook.

use crate::db::Journal;
use crate::errors::AppResult;
use crate::hardware::{MotionSensor, Thermometer};
use crate::sink::{WebhookClient, WebhookValues};
use crate::ui::messages::{error, success};
use crate::utils::time::{sleep_while_running, webhook_timestamp};
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// `value1` = timestamp, `value2` = 1/0 presence, `value3` = °C
pub fn telemetry_values(at: &DateTime<Local>, human: bool, celsius: f64) -> WebhookValues {
    WebhookValues::new(webhook_timestamp(at), u8::from(human), celsius)
}

pub struct Telemetry {
    sensor: Box<dyn MotionSensor>,
    thermometer: Box<dyn Thermometer>,
    webhook: WebhookClient,
    journal: Option<Journal>,
    interval: Duration,
}

impl Telemetry {
    pub fn new(
        sensor: Box<dyn MotionSensor>,
        thermometer: Box<dyn Thermometer>,
        webhook: WebhookClient,
        interval: Duration,
    ) -> Self {
        Self {
            sensor,
            thermometer,
            webhook,
            journal: None,
            interval,
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Read both sensors. Device errors are fatal.
    pub fn sample(&mut self) -> AppResult<WebhookValues> {
        let at = Local::now();
        let human = self.sensor.detected()?;
        let celsius = self.thermometer.read_celsius()?;
        log::debug!("presence={} temperature={:.4}", human, celsius);
        Ok(telemetry_values(&at, human, celsius))
    }

    /// Sample and post once. Returns whether the webhook accepted it.
    pub fn tick(&mut self) -> AppResult<bool> {
        let values = self.sample()?;
        let delivered = match self.webhook.trigger(&values) {
            Ok(()) => {
                success("success");
                true
            }
            Err(e) if e.is_recoverable() => {
                error(format!("fail ({})", e));
                false
            }
            Err(e) => return Err(e),
        };

        if let Some(j) = &self.journal {
            j.note(
                "telemetry",
                "webhook",
                &format!(
                    "presence={} temperature={} {}",
                    values.value2,
                    values.value3,
                    if delivered { "sent" } else { "failed" }
                ),
            );
        }
        Ok(delivered)
    }

    pub fn run(&mut self, running: &AtomicBool, max_cycles: Option<u64>) -> AppResult<u64> {
        let mut cycles = 0;
        while running.load(Ordering::SeqCst) {
            self.tick()?;
            cycles += 1;
            if max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            if !sleep_while_running(self.interval, running) {
                break;
            }
        }
        Ok(cycles)
    }
}
