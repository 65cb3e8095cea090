//! Face-attribute detection.

pub mod client;

use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use client::FaceApiClient;

/// One face as returned by the `detect` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_id: Option<String>,
    pub face_attributes: FaceAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAttributes {
    pub age: f64,
    pub gender: String,
    /// 0.0 – 1.0, only present when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<f64>,
}

impl fmt::Display for FaceAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "age {} / {}", self.age, self.gender)?;
        if let Some(smile) = self.smile {
            write!(f, " / smile {:.2}", smile)?;
        }
        Ok(())
    }
}

pub trait FaceDetector {
    fn detect(&self, image: &[u8]) -> AppResult<Vec<FaceRecord>>;
}
