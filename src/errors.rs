//! Unified application error type.
//! Every module (hardware, camera, face, sink, db, cli) returns AppError so
//! the monitor loop can decide in one place what is fatal and what is not.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Journal
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Network / remote services
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Face API returned {status}: {message}")]
    FaceApi { status: u16, message: String },

    #[error("{service} rejected the report with status {status}")]
    Rejected { service: String, status: u16 },

    // ---------------------------
    // Devices
    // ---------------------------
    #[error("GPIO error: {0}")]
    Gpio(String),

    #[error("I2C error: {0}")]
    I2c(String),

    #[error("Camera error: {0}")]
    Camera(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing setting: {0}")]
    MissingSetting(String),

    // ---------------------------
    // Operator input
    // ---------------------------
    #[error("Input error: {0}")]
    Input(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors after which the monitor loop skips to the next cycle instead
    /// of stopping. Device, config and journal failures are fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Http(_)
                | AppError::Json(_)
                | AppError::FaceApi { .. }
                | AppError::Rejected { .. }
                | AppError::Camera(_)
                | AppError::Io(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
