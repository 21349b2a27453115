use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DataError;
use crate::models::{AppSettings, Theme};

pub const SETTINGS_PATH_VAR: &str = "INTERNBOARD_SETTINGS";

fn parse_theme(value: &str) -> Result<Theme, DataError> {
    match value {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        other => Err(DataError::InvalidValue {
            field: "theme",
            value: other.to_string(),
        }),
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, DataError> {
    value.trim().parse().map_err(|_| DataError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

pub fn settings_from_toml(raw: &str) -> Result<AppSettings, DataError> {
    Ok(toml::from_str(raw)?)
}

/// Applies `INTERNBOARD_*` overrides through `lookup` so tests can feed their
/// own environment.
pub fn apply_overrides<F>(settings: &mut AppSettings, lookup: F) -> Result<(), DataError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("INTERNBOARD_THEME") {
        settings.theme = parse_theme(&v)?;
    }
    if let Some(v) = lookup("INTERNBOARD_ARCHIVE_MONTHS") {
        settings.data_retention.archive_after_months = parse_count("archive months", &v)?;
    }
    if let Some(v) = lookup("INTERNBOARD_DELETE_YEARS") {
        settings.data_retention.auto_delete_after_years = parse_count("delete years", &v)?;
    }
    Ok(())
}

/// Settings file from the explicit path, else `INTERNBOARD_SETTINGS`, else
/// defaults. Environment overrides apply last.
pub fn load_settings(path: Option<&Path>) -> Result<AppSettings, DataError> {
    let path: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(SETTINGS_PATH_VAR).ok().map(PathBuf::from));

    let mut settings = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|source| DataError::Read {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "settings file loaded");
            settings_from_toml(&raw)?
        }
        None => AppSettings::default(),
    };

    apply_overrides(&mut settings, |key| std::env::var(key).ok())?;
    if settings.data_retention.auto_delete_after_years == 0 {
        warn!("auto delete retention is 0 years; nothing acts on it");
    }
    Ok(settings)
}
