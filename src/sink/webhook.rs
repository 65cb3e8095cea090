//! Webhook trigger (IFTTT Maker style): form-encoded `value1..value3`.

use super::ReportSink;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::face::FaceRecord;
use crate::utils::time::webhook_timestamp;
use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookValues {
    pub value1: String,
    pub value2: String,
    pub value3: String,
}

impl WebhookValues {
    pub fn new(value1: impl ToString, value2: impl ToString, value3: impl ToString) -> Self {
        Self {
            value1: value1.to_string(),
            value2: value2.to_string(),
            value3: value3.to_string(),
        }
    }
}

pub struct WebhookClient {
    http: Client,
    url: String,
}

impl WebhookClient {
    pub fn from_config(cfg: &Config, http: Client) -> AppResult<Self> {
        Ok(Self {
            http,
            url: cfg.webhook_url()?,
        })
    }

    /// POST the values; any non-2xx status becomes `Rejected`.
    pub fn trigger(&self, values: &WebhookValues) -> AppResult<()> {
        log::debug!("webhook values {:?}", values);
        let response = self.http.post(&self.url).form(values).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::Rejected {
                service: "webhook".into(),
                status: status.as_u16(),
            })
        }
    }
}

/// `value1` = timestamp, `value2` = age, `value3` = gender
pub fn face_values(face: &FaceRecord, at: &DateTime<Local>) -> WebhookValues {
    WebhookValues::new(
        webhook_timestamp(at),
        face.face_attributes.age,
        &face.face_attributes.gender,
    )
}

pub struct WebhookSink {
    client: WebhookClient,
}

impl WebhookSink {
    pub fn new(client: WebhookClient) -> Self {
        Self { client }
    }
}

impl ReportSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn report(&mut self, face: &FaceRecord, at: &DateTime<Local>) -> AppResult<()> {
        self.client.trigger(&face_values(face, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server;
    use crate::face::FaceAttributes;
    use chrono::TimeZone;

    #[test]
    fn face_values_layout() {
        let face = FaceRecord {
            face_id: None,
            face_attributes: FaceAttributes {
                age: 27.0,
                gender: "male".into(),
                smile: None,
            },
        };
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let values = face_values(&face, &at);
        assert_eq!(values.value1, "2024-01-02 03:04:05.000000");
        assert_eq!(values.value2, "27");
        assert_eq!(values.value3, "male");
    }

    #[test]
    fn client_url_from_config() {
        let mut cfg = Config::default();
        cfg.webhook.base_url = "http://localhost:8080/".into();
        cfg.webhook.event = Some("seen".into());
        cfg.webhook.key = Some("abc".into());
        let client = WebhookClient::from_config(&cfg, Client::new()).unwrap();
        assert_eq!(client.url, "http://localhost:8080/trigger/seen/with/key/abc");
    }
    fn client_for(base_url: &str) -> WebhookClient {
        let mut cfg = Config::default();
        cfg.webhook.base_url = base_url.to_string();
        cfg.webhook.event = Some("store_sensor".into());
        cfg.webhook.key = Some("maker-key".into());
        WebhookClient::from_config(&cfg, test_server::client()).unwrap()
    }

    #[test]
    fn trigger_posts_form_encoded_values() {
        let server = test_server::serve(1, 200, "Congratulations!");
        let client = client_for(&server.base_url);

        client
            .trigger(&WebhookValues::new("2024-01-02 03:04:05", 27, "male"))
            .unwrap();
        let requests = server.finish();

        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.target, "/trigger/store_sensor/with/key/maker-key");
        assert_eq!(
            req.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            req.body_text(),
            "value1=2024-01-02+03%3A04%3A05&value2=27&value3=male"
        );
    }

    #[test]
    fn sink_sends_one_trigger_per_face() {
        let server = test_server::serve(2, 200, "ok");
        let mut sink = WebhookSink::new(client_for(&server.base_url));
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        for gender in ["female", "male"] {
            let face = FaceRecord {
                face_id: None,
                face_attributes: FaceAttributes {
                    age: 30.0,
                    gender: gender.into(),
                    smile: None,
                },
            };
            sink.report(&face, &at).unwrap();
        }
        let requests = server.finish();

        assert_eq!(requests.len(), 2);
        assert!(requests[0].body_text().ends_with("value3=female"));
        assert!(requests[1].body_text().ends_with("value3=male"));
    }

    #[test]
    fn error_status_is_rejected() {
        let server = test_server::serve(1, 401, "You sent an invalid key.");
        let client = client_for(&server.base_url);

        let err = client.trigger(&WebhookValues::new("a", "b", "c")).unwrap_err();
        server.finish();

        assert!(matches!(
            err,
            AppError::Rejected { ref service, status: 401 } if service == "webhook"
        ));
    }
}
