//! INI parsing: `Ini` → `ConfigFile`.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [archive] section
    if let Some(section) = ini.section(Some("archive")) {
        if let Some(v) = non_empty(section.get("path")) {
            config.archive.path = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("url")) {
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("archive", "url", v, "must be an http:// or https:// URL"));
            }
            config.archive.url = Some(v.to_string());
        }
        if let Some(v) = non_empty(section.get("access")) {
            config.archive.access = v
                .parse()
                .map_err(|_| invalid("archive", "access", v, "must be 'random' or 'sequential'"))?;
        }
        if let Some(v) = non_empty(section.get("timeout")) {
            config.archive.timeout = v
                .parse()
                .ok()
                .filter(|&secs: &u64| secs > 0)
                .ok_or_else(|| {
                    invalid("archive", "timeout", v, "must be a positive integer (seconds)")
                })?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section.get("max_vertices")) {
            config.cache.max_vertices = v.parse().map_err(|_| {
                invalid("cache", "max_vertices", v, "must be a non-negative integer")
            })?;
        }
    }

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = non_empty(section.get("path")) {
            config.source.path = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("tolerance")) {
            config.source.tolerance = v
                .parse()
                .ok()
                .filter(|&t: &f64| t.is_finite() && t >= 0.0)
                .ok_or_else(|| invalid("source", "tolerance", v, "must be a non-negative number"))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
