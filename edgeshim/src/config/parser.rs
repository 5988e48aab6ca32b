//! INI → `ConfigFile` mapping.
//!
//! The single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::clamp_previous_item_ttl;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("project_dir") {
            let v = v.trim();
            if !v.starts_with('/') {
                return Err(invalid(
                    "server",
                    "project_dir",
                    v,
                    "must be an absolute logical path starting with '/'",
                ));
            }
            config.server.project_dir = v.to_string();
        }
        if let Some(v) = section.get("dist_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.server.dist_dir = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("assets_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.server.assets_dir = Some(PathBuf::from(v));
            }
        }
        if let Some(v) = section.get("locales") {
            config.server.locales = v
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = section.get("default_locale") {
            let v = v.trim();
            if !v.is_empty() {
                config.server.default_locale = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("app_dir") {
            config.server.app_dir = parse_bool(v)
                .ok_or_else(|| invalid("server", "app_dir", v, "must be true or false"))?;
        }
    }

    if let Some(default_locale) = &config.server.default_locale {
        if !config.server.locales.is_empty() && !config.server.locales.contains(default_locale) {
            return Err(invalid(
                "server",
                "default_locale",
                default_locale,
                "must be one of the configured locales",
            ));
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("previous_item_ttl_ms") {
            let parsed: u64 = v.trim().parse().map_err(|_| {
                invalid(
                    "cache",
                    "previous_item_ttl_ms",
                    v,
                    "must be a non-negative integer (milliseconds)",
                )
            })?;
            config.cache.previous_item_ttl_ms = clamp_previous_item_ttl(parsed);
        }
        if let Some(v) = section.get("page_path_cache_size") {
            let parsed: usize = v.trim().parse().map_err(|_| {
                invalid("cache", "page_path_cache_size", v, "must be a positive integer")
            })?;
            if parsed == 0 {
                return Err(invalid(
                    "cache",
                    "page_path_cache_size",
                    v,
                    "must be a positive integer",
                ));
            }
            config.cache.page_path_cache_size = parsed;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = PathBuf::from(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains('/') {
                return Err(invalid("logging", "file", v, "must be a plain file name"));
            }
            config.logging.file = v.to_string();
        }
        if let Some(v) = section.get("filter") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.filter = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
