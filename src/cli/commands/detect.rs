use super::open_journal;
use crate::camera::{Camera, ImageFile, StillCamera};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::face::{FaceApiClient, FaceDetector};
use crate::http::build_client;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::fs;

/// Handle the `detect` command: one capture + face detection, no reporting.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Detect { image } = cmd {
        let detector = FaceApiClient::from_config(cfg, build_client(cfg.http_timeout_secs)?)?;

        let mut camera: Box<dyn Camera> = match image {
            Some(file) => Box::new(ImageFile::new(expand_tilde(file))),
            None => {
                info("Taking a picture...");
                Box::new(StillCamera::new(cfg.camera.clone()))
            }
        };
        let path = camera.capture()?;
        let bytes = fs::read(&path)?;

        info(format!("Sending {} to the face API...", path.display()));
        let faces = detector.detect(&bytes)?;

        if let Some(journal) = open_journal(cfg) {
            journal.note(
                "detect",
                "",
                &format!("{}: {} face(s)", path.display(), faces.len()),
            );
        }

        if faces.is_empty() {
            warning("No faces detected");
            return Ok(());
        }

        success(format!("{} face(s) detected", faces.len()));
        for (i, face) in faces.iter().enumerate() {
            println!("  #{} {}", i + 1, face.face_attributes);
        }
    }

    Ok(())
}
