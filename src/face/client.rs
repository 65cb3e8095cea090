//! Microsoft Face API `detect` client.

use super::{FaceDetector, FaceRecord};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::http::snippet;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

pub struct FaceApiClient {
    http: Client,
    endpoint: String,
    key: String,
    attributes: String,
}

impl FaceApiClient {
    pub fn from_config(cfg: &Config, http: Client) -> AppResult<Self> {
        Ok(Self {
            http,
            endpoint: cfg.face_api.endpoint.clone(),
            key: cfg.face_api_key()?.to_string(),
            attributes: cfg.face_api.attributes.join(","),
        })
    }

    pub fn query(&self) -> [(&'static str, String); 3] {
        [
            ("returnFaceId", "false".to_string()),
            ("returnFaceLandmarks", "false".to_string()),
            ("returnFaceAttributes", self.attributes.clone()),
        ]
    }
}

/// Turn a `detect` response into face records, or a `FaceApi` error for
/// any non-2xx status.
pub fn parse_response(status: u16, body: &str) -> AppResult<Vec<FaceRecord>> {
    if !(200..300).contains(&status) {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) if !env.error.code.is_empty() => {
                format!("{} ({})", env.error.message, env.error.code)
            }
            Ok(env) => env.error.message,
            Err(_) => snippet(body),
        };
        return Err(AppError::FaceApi { status, message });
    }
    Ok(serde_json::from_str(body)?)
}

impl FaceDetector for FaceApiClient {
    fn detect(&self, image: &[u8]) -> AppResult<Vec<FaceRecord>> {
        log::debug!("POST {} ({} bytes)", self.endpoint, image.len());

        let response = self
            .http
            .post(&self.endpoint)
            .query(&self.query())
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(KEY_HEADER, &self.key)
            .body(image.to_vec())
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        log::debug!("face API answered {}: {}", status, snippet(&body));

        parse_response(status, &body)
    }
}
