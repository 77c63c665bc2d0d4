//! Application configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use time::UtcOffset;
use time::macros::offset;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
/// WIB (UTC+7), the timezone the attendance event is held in.
pub const DEFAULT_DISPLAY_UTC_OFFSET_HOURS: i8 = 7;

pub const DEFAULT_EXPORT_TITLE: &str = "Daftar Kehadiran Forum Perangkat Daerah Tahun 2025";
pub const DEFAULT_EXPORT_ORGANIZATION: &str =
    "Dinas Pekerjaan Umum Penataan Ruang & Perumahan Rakyat Kawasan Permukiman";
pub const DEFAULT_EXPORT_REGION: &str = "Provinsi Kepulauan Bangka Belitung";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl crate::routes::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        "E_CONFIG"
    }
}

/// Heading lines printed at the top of every exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportHeading {
    pub title: String,
    pub organization: String,
    pub region: String,
}

impl Default for ExportHeading {
    fn default() -> Self {
        Self {
            title: DEFAULT_EXPORT_TITLE.to_owned(),
            organization: DEFAULT_EXPORT_ORGANIZATION.to_owned(),
            region: DEFAULT_EXPORT_REGION.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// `None` selects the in-memory record store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Offset export timestamps and filenames are rendered in.
    pub display_offset: UtcOffset,
    pub heading: ExportHeading,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            display_offset: offset!(+7),
            heading: ExportHeading::default(),
        }
    }
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DATABASE_URL`: in-memory store when absent, empty or a placeholder
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `DISPLAY_UTC_OFFSET_HOURS`: default 7
    /// - `EXPORT_TITLE`, `EXPORT_ORGANIZATION`, `EXPORT_REGION`: document heading
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable does not parse
    /// or the offset is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), DEFAULT_DB_MAX_CONNECTIONS)?;
        let offset_hours = parse_or(
            "DISPLAY_UTC_OFFSET_HOURS",
            lookup("DISPLAY_UTC_OFFSET_HOURS"),
            DEFAULT_DISPLAY_UTC_OFFSET_HOURS,
        )?;
        let display_offset = UtcOffset::from_hms(offset_hours, 0, 0).map_err(|_| ConfigError::Invalid {
            key: "DISPLAY_UTC_OFFSET_HOURS",
            value: offset_hours.to_string(),
        })?;

        let defaults = ExportHeading::default();
        let heading = ExportHeading {
            title: non_empty(lookup("EXPORT_TITLE")).unwrap_or(defaults.title),
            organization: non_empty(lookup("EXPORT_ORGANIZATION")).unwrap_or(defaults.organization),
            region: non_empty(lookup("EXPORT_REGION")).unwrap_or(defaults.region),
        };

        Ok(Self {
            port,
            database_url: database_url(lookup("DATABASE_URL")),
            db_max_connections,
            display_offset,
            heading,
        })
    }
}

/// Deployments ship a `.env` with a placeholder URL before a database is
/// provisioned; treat that the same as no URL.
fn database_url(raw: Option<String>) -> Option<String> {
    non_empty(raw).filter(|url| !url.contains("placeholder"))
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid { key, value }),
    }
}
