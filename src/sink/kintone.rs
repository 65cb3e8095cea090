//! kintone record API sink: one record per face.

use super::ReportSink;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::face::FaceRecord;
use crate::http::snippet;
use crate::utils::time::kintone_datetime;
use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use serde_json::{Value, json};

const TOKEN_HEADER: &str = "X-Cybozu-API-Token";

pub struct KintoneSink {
    http: Client,
    url: String,
    app_id: u64,
    token: String,
}

impl KintoneSink {
    pub fn from_config(cfg: &Config, http: Client) -> AppResult<Self> {
        Ok(Self {
            http,
            url: cfg.kintone_record_url()?,
            app_id: cfg.kintone_app_id()?,
            token: cfg.kintone_token()?.to_string(),
        })
    }
}

/// `{ "app": id, "record": { "datetime", "age", "gender" } }`
pub fn record_payload(app_id: u64, face: &FaceRecord, at: &DateTime<Local>) -> Value {
    json!({
        "app": app_id,
        "record": {
            "datetime": { "value": kintone_datetime(at) },
            "age": { "value": face.face_attributes.age },
            "gender": { "value": face.face_attributes.gender },
        }
    })
}

impl ReportSink for KintoneSink {
    fn name(&self) -> &'static str {
        "kintone"
    }

    fn report(&mut self, face: &FaceRecord, at: &DateTime<Local>) -> AppResult<()> {
        let payload = record_payload(self.app_id, face, at);
        let response = self
            .http
            .post(&self.url)
            .header(TOKEN_HEADER, &self.token)
            .json(&payload)
            .send()?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().unwrap_or_default();
            log::warn!("kintone answered {}: {}", status, snippet(&body));
            Err(AppError::Rejected {
                service: "kintone".into(),
                status: status.as_u16(),
            })
        }
    }
}
