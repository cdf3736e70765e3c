use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use bridge_loan_core::bridge::fees::FeeSchedule;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read(&canonical)?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load a fee schedule from YAML (`.yaml`/`.yml`) or JSON (anything else).
/// Fields left out keep the standard schedule's values.
pub fn read_fee_schedule(path: &str) -> Result<FeeSchedule, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read(&canonical)?;
    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let schedule: FeeSchedule = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    tracing::debug!(path = %canonical.display(), ?schedule, "fee schedule loaded");
    Ok(schedule)
}

/// Optional `--fees` path, falling back to the standard schedule.
pub fn fee_schedule_or_default(
    path: Option<&str>,
) -> Result<FeeSchedule, Box<dyn std::error::Error>> {
    match path {
        Some(p) => read_fee_schedule(p),
        None => Ok(FeeSchedule::default()),
    }
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
