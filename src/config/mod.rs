use crate::errors::{AppError, AppResult};
use crate::utils::path::resolve_path;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

/// Environment variable holding the webhook secret key.
pub const ENV_WEBHOOK_KEY: &str = "maker_key";
/// Environment variable holding the webhook event name.
pub const ENV_WEBHOOK_EVENT: &str = "maker_event_store_sensor";

const MASK: &str = "********";

/// Where detected face attributes are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// kintone record API (one record per face)
    #[default]
    Kintone,
    /// Webhook trigger with timestamp, age and gender
    Webhook,
    /// Ask the operator for a value, then send it with age and smile to the webhook
    Console,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Kintone => "kintone",
            SinkKind::Webhook => "webhook",
            SinkKind::Console => "console",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// BCM pin of the PIR sensor used by `run`
    #[serde(default = "default_motion_pin")]
    pub pin: u8,
    /// BCM pin of the PIR sensor used by `telemetry`
    #[serde(default = "default_telemetry_pin")]
    pub telemetry_pin: u8,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_command")]
    pub command: String,
    #[serde(default = "default_camera_output")]
    pub output: String,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    /// Time the camera waits before taking the shot
    #[serde(default = "default_camera_delay")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceApiConfig {
    #[serde(default = "default_face_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_face_attributes")]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KintoneConfig {
    /// Sub-domain of `<domain>.cybozu.com`
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub app_id: Option<u64>,
    #[serde(default)]
    pub token: Option<String>,
    /// Overrides `https://<domain>.cybozu.com` (on-premise installs, tests)
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_webhook_base")]
    pub base_url: String,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermometerConfig {
    #[serde(default = "default_i2c_bus")]
    pub bus: u8,
    #[serde(default = "default_i2c_address")]
    pub address: u16,
    #[serde(default)]
    pub register: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub sink: SinkKind,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub face_api: FaceApiConfig,
    #[serde(default)]
    pub kintone: KintoneConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub thermometer: ThermometerConfig,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_http_timeout() -> u64 {
    30
}
fn default_motion_pin() -> u8 {
    4
}
fn default_telemetry_pin() -> u8 {
    17
}
fn default_poll_interval() -> u64 {
    10
}
fn default_camera_command() -> String {
    "raspistill".to_string()
}
fn default_camera_output() -> String {
    "cam.jpg".to_string()
}
fn default_camera_width() -> u32 {
    640
}
fn default_camera_height() -> u32 {
    480
}
fn default_camera_delay() -> u64 {
    5000
}
fn default_face_endpoint() -> String {
    "https://westus.api.cognitive.microsoft.com/face/v1.0/detect".to_string()
}
fn default_face_attributes() -> Vec<String> {
    vec!["age".into(), "gender".into(), "smile".into()]
}
fn default_webhook_base() -> String {
    "https://maker.ifttt.com".to_string()
}
fn default_i2c_bus() -> u8 {
    1
}
fn default_i2c_address() -> u16 {
    0x48
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            pin: default_motion_pin(),
            telemetry_pin: default_telemetry_pin(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: default_camera_command(),
            output: default_camera_output(),
            width: default_camera_width(),
            height: default_camera_height(),
            delay_ms: default_camera_delay(),
        }
    }
}

impl Default for FaceApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_face_endpoint(),
            key: None,
            attributes: default_face_attributes(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: default_webhook_base(),
            event: None,
            key: None,
        }
    }
}

impl Default for ThermometerConfig {
    fn default() -> Self {
        Self {
            bus: default_i2c_bus(),
            address: default_i2c_address(),
            register: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            sink: SinkKind::default(),
            http_timeout_secs: default_http_timeout(),
            sensor: SensorConfig::default(),
            camera: CameraConfig::default(),
            face_api: FaceApiConfig::default(),
            kintone: KintoneConfig::default(),
            webhook: WebhookConfig::default(),
            thermometer: ThermometerConfig::default(),
        }
    }
}

/// Treat blank strings in the YAML file the same as absent keys.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Config {
    /// Return the standard configuration directory (`~/.smilesensor`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".smilesensor")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("smilesensor.conf")
    }

    /// Return the full path of the journal database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("smilesensor.sqlite")
    }

    /// Load configuration from `path`, or defaults if the file does not
    /// exist. Webhook credentials from the environment win over the file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let mut cfg = Self::load_file(path)?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// The file contents only, without environment overrides. Anything that
    /// writes the config back must start from this.
    pub fn load_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            Ok(Config::default())
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Override webhook settings from environment variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_WEBHOOK_KEY).filter(|v| !v.trim().is_empty()) {
            self.webhook.key = Some(key);
        }
        if let Some(event) = lookup(ENV_WEBHOOK_EVENT).filter(|v| !v.trim().is_empty()) {
            self.webhook.event = Some(event);
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Write a template config (unless `is_test`) and return the journal path.
    pub fn init_all(
        path: &Path,
        custom_db: Option<String>,
        is_test: bool,
    ) -> AppResult<PathBuf> {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_dir);
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => resolve_path(&name),
            None => dir.join("smilesensor.sqlite"),
        };

        if !is_test {
            // keep credentials an operator already filled in
            let mut config = Config::load_file(path)?;
            config.database = db_path.to_string_lossy().to_string();
            config.save(path)?;
        }

        Ok(db_path)
    }

    pub fn face_api_key(&self) -> AppResult<&str> {
        non_empty(&self.face_api.key)
            .ok_or_else(|| AppError::MissingSetting("face_api.key".into()))
    }

    /// Full URL of the kintone record endpoint.
    pub fn kintone_record_url(&self) -> AppResult<String> {
        let base = match non_empty(&self.kintone.base_url) {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let domain = non_empty(&self.kintone.domain)
                    .ok_or_else(|| AppError::MissingSetting("kintone.domain".into()))?;
                format!("https://{}.cybozu.com", domain)
            }
        };
        Ok(format!("{}/k/v1/record.json", base))
    }

    pub fn kintone_app_id(&self) -> AppResult<u64> {
        self.kintone
            .app_id
            .ok_or_else(|| AppError::MissingSetting("kintone.app_id".into()))
    }

    pub fn kintone_token(&self) -> AppResult<&str> {
        non_empty(&self.kintone.token)
            .ok_or_else(|| AppError::MissingSetting("kintone.token".into()))
    }

    /// `<base>/trigger/<event>/with/key/<key>`
    pub fn webhook_url(&self) -> AppResult<String> {
        let event = non_empty(&self.webhook.event).ok_or_else(|| {
            AppError::MissingSetting(format!("webhook.event (or ${})", ENV_WEBHOOK_EVENT))
        })?;
        let key = non_empty(&self.webhook.key).ok_or_else(|| {
            AppError::MissingSetting(format!("webhook.key (or ${})", ENV_WEBHOOK_KEY))
        })?;
        Ok(format!(
            "{}/trigger/{}/with/key/{}",
            self.webhook.base_url.trim_end_matches('/'),
            event,
            key
        ))
    }

    /// Every setting still missing for the given sink (face API included).
    pub fn missing_for(&self, sink: SinkKind) -> Vec<String> {
        let mut checks: Vec<AppResult<()>> = vec![self.face_api_key().map(|_| ())];
        match sink {
            SinkKind::Kintone => {
                checks.push(self.kintone_record_url().map(|_| ()));
                checks.push(self.kintone_app_id().map(|_| ()));
                checks.push(self.kintone_token().map(|_| ()));
            }
            SinkKind::Webhook | SinkKind::Console => {
                checks.push(self.webhook_url().map(|_| ()));
            }
        }

        let mut missing = Vec::new();
        for c in checks {
            if let Err(AppError::MissingSetting(name)) = c {
                missing.push(name);
            }
        }

        // webhook_url stops at the first missing field
        if matches!(sink, SinkKind::Webhook | SinkKind::Console)
            && non_empty(&self.webhook.event).is_none()
            && non_empty(&self.webhook.key).is_none()
        {
            missing.push(format!("webhook.key (or ${})", ENV_WEBHOOK_KEY));
        }
        missing
    }

    /// Copy of the configuration safe to print.
    pub fn masked(&self) -> Config {
        let mut copy = self.clone();
        let mask = |v: &mut Option<String>| {
            if non_empty(v).is_some() {
                *v = Some(MASK.to_string());
            }
        };
        mask(&mut copy.face_api.key);
        mask(&mut copy.kintone.token);
        mask(&mut copy.webhook.key);
        copy
    }
}
