//! Still capture through an external camera CLI (`raspistill` flags).

use crate::config::CameraConfig;
use crate::errors::{AppError, AppResult};
use std::path::PathBuf;
use std::process::Command;

pub trait Camera {
    /// Take a picture and return the path of the written image.
    fn capture(&mut self) -> AppResult<PathBuf>;
}

pub struct StillCamera {
    cfg: CameraConfig,
}

impl StillCamera {
    pub fn new(cfg: CameraConfig) -> Self {
        Self { cfg }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "-o".into(),
            self.cfg.output.clone(),
            "-w".into(),
            self.cfg.width.to_string(),
            "-h".into(),
            self.cfg.height.to_string(),
            "-t".into(),
            self.cfg.delay_ms.to_string(),
        ]
    }
}

impl Camera for StillCamera {
    fn capture(&mut self) -> AppResult<PathBuf> {
        let args = self.args();
        log::debug!("running {} {}", self.cfg.command, args.join(" "));

        let status = Command::new(&self.cfg.command)
            .args(&args)
            .status()
            .map_err(|e| AppError::Camera(format!("cannot run '{}': {}", self.cfg.command, e)))?;

        if !status.success() {
            return Err(AppError::Camera(format!(
                "'{}' exited with {}",
                self.cfg.command, status
            )));
        }

        let output = PathBuf::from(&self.cfg.output);
        if !output.exists() {
            return Err(AppError::Camera(format!(
                "'{}' did not write {}",
                self.cfg.command,
                output.display()
            )));
        }
        Ok(output)
    }
}

/// Uses an existing picture instead of the camera (`detect --image`).
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Camera for ImageFile {
    fn capture(&mut self) -> AppResult<PathBuf> {
        if self.path.is_file() {
            Ok(self.path.clone())
        } else {
            Err(AppError::Camera(format!(
                "image not found: {}",
                self.path.display()
            )))
        }
    }
}
