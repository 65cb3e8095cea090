#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Scratch HOME with its own config file and journal.
pub struct Workspace {
    pub dir: TempDir,
    pub config: String,
    pub db: String,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = dir.path().join("smilesensor.conf").to_string_lossy().to_string();
        let db = dir.path().join("journal.sqlite").to_string_lossy().to_string();
        Self { dir, config, db }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_config(&self, yaml: &str) {
        fs::write(&self.config, yaml).expect("write config");
    }

    /// smilesensor with --config/--db pointing into the workspace and a
    /// clean environment (no colours, no webhook variables, HOME isolated).
    pub fn cmd(&self) -> Command {
        let mut cmd = self.cmd_without_db();
        cmd.args(["--db", &self.db]);
        cmd
    }

    /// Same as `cmd` but leaves the journal location to the caller.
    pub fn cmd_without_db(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("smilesensor");
        cmd.env("NO_COLOR", "1")
            .env("HOME", self.dir.path())
            .env_remove("maker_key")
            .env_remove("maker_event_store_sensor")
            .env_remove("RUST_LOG")
            .args(["--config", &self.config]);
        cmd
    }
}

/// Config with every credential filled in for the kintone sink.
pub fn kintone_config(camera_command: &str, camera_output: &str) -> String {
    format!(
        r#"sink: kintone
face_api:
  key: test-face-key
  endpoint: http://127.0.0.1:9/face/v1.0/detect
kintone:
  domain: example
  app_id: 12
  token: test-token
camera:
  command: {camera_command}
  output: {camera_output}
  delay_ms: 0
"#
    )
}
