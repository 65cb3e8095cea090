//! Import of the legacy two-file layout:
//! `ms_api_key.yaml` (`key`) and `kintone_conf.yaml` (`domain`, `id`, `token`).

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

pub const LEGACY_FACE_FILE: &str = "ms_api_key.yaml";
pub const LEGACY_KINTONE_FILE: &str = "kintone_conf.yaml";

/// Read a legacy YAML file as a mapping. Missing file → Ok(None).
fn read_mapping(path: &Path) -> AppResult<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)?;
    if !yaml.is_mapping() {
        return Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        )));
    }
    Ok(Some(yaml))
}

/// Scalar as string: the old files hold ids both quoted and unquoted.
fn scalar(map: &Value, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Merge legacy settings found in `legacy_dir` into `cfg`.
/// Returns the names of the fields that were imported.
pub fn merge_legacy(cfg: &mut Config, legacy_dir: &Path) -> AppResult<Vec<&'static str>> {
    let mut imported = Vec::new();

    if let Some(face) = read_mapping(&legacy_dir.join(LEGACY_FACE_FILE))?
        && let Some(key) = scalar(&face, "key")
    {
        cfg.face_api.key = Some(key);
        imported.push("face_api.key");
    }

    if let Some(kintone) = read_mapping(&legacy_dir.join(LEGACY_KINTONE_FILE))? {
        if let Some(domain) = scalar(&kintone, "domain") {
            cfg.kintone.domain = Some(domain);
            imported.push("kintone.domain");
        }
        if let Some(id) = scalar(&kintone, "id") {
            let app_id = id
                .parse::<u64>()
                .map_err(|_| AppError::Config(format!("kintone app id is not a number: {}", id)))?;
            cfg.kintone.app_id = Some(app_id);
            imported.push("kintone.app_id");
        }
        if let Some(token) = scalar(&kintone, "token") {
            cfg.kintone.token = Some(token);
            imported.push("kintone.token");
        }
    }

    Ok(imported)
}

/// Import the legacy files into the config file at `conf_path`.
/// Returns:
///   Ok(true)  → config updated
///   Ok(false) → nothing found to import
pub fn run_config_migration(conf_path: &Path, legacy_dir: &Path) -> AppResult<bool> {
    info(format!("Looking for legacy settings in {}", legacy_dir.display()));

    let mut cfg = Config::load_file(conf_path)?;
    let imported = merge_legacy(&mut cfg, legacy_dir)?;

    if imported.is_empty() {
        info("No legacy settings found.");
        return Ok(false);
    }

    cfg.save(conf_path)?;
    success(format!(
        "Imported {} into {}",
        imported.join(", "),
        conf_path.display()
    ));
    Ok(true)
}
