use crate::config::{Config, SinkKind};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration:\n");
        println!("{}", serde_yaml::to_string(&cfg.masked())?);
        Ok(())
    }

    /// Print every missing setting for `sink`. Returns true when complete.
    pub fn check(cfg: &Config, sink: SinkKind) -> bool {
        let missing = cfg.missing_for(sink);
        if missing.is_empty() {
            success(format!("Configuration complete for sink '{}'", sink.as_str()));
            return true;
        }
        for name in &missing {
            warning(format!("missing: {}", name));
        }
        error(format!(
            "{} setting(s) missing for sink '{}'",
            missing.len(),
            sink.as_str()
        ));
        false
    }

    fn default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    /// Open `path` in the requested editor, falling back to the default one.
    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let default_editor = Self::default_editor();
        let requested = editor.clone().unwrap_or_else(|| default_editor.clone());

        match Command::new(&requested).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!("Configuration file edited using '{}'", requested));
                return Ok(());
            }
            _ if requested == default_editor => {
                return Err(AppError::Config(format!(
                    "failed to edit {} with '{}'",
                    path.display(),
                    requested
                )));
            }
            _ => warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                requested, default_editor
            )),
        }

        match Command::new(&default_editor).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!(
                    "Configuration file edited using fallback '{}'",
                    default_editor
                ));
                Ok(())
            }
            _ => Err(AppError::Config(format!(
                "failed to edit {} with fallback '{}'",
                path.display(),
                default_editor
            ))),
        }
    }
}
