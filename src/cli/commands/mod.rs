pub mod config;
pub mod detect;
pub mod init;
pub mod log;
pub mod run;
pub mod telemetry;

use crate::config::Config;
use crate::db::Journal;
use crate::ui::messages::warning;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag cleared by Ctrl+C; loops check it between blocking calls.
pub(crate) fn interrupt_flag() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(err) = ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        }) {
            warning(format!("Failed to install Ctrl+C handler: {err}"));
        }
    }
    running
}

/// The journal is optional: a broken database must not stop the sensor.
pub(crate) fn open_journal(cfg: &Config) -> Option<Journal> {
    match Journal::open(Path::new(&cfg.database)) {
        Ok(j) => Some(j),
        Err(e) => {
            warning(format!("Journal disabled ({}): {}", cfg.database, e));
            None
        }
    }
}
