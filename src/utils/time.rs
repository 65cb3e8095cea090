//! Timestamp formats used in outbound payloads, plus an interruptible sleep.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// ISO 8601 with the local offset, as kintone expects for DATETIME fields.
pub fn kintone_datetime(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// `YYYY-MM-DD HH:MM:SS.ffffff` for webhook values.
pub fn webhook_timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Sleep for `total`, waking up early once `running` turns false.
/// Returns false when interrupted.
pub fn sleep_while_running(total: Duration, running: &AtomicBool) -> bool {
    let deadline = Instant::now() + total;
    loop {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}
