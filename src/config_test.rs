use std::collections::HashMap;

use super::*;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_uses_defaults_when_unset() {
    let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.database_url, None);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.display_offset, UtcOffset::from_hms(7, 0, 0).unwrap());
    assert_eq!(cfg.heading, ExportHeading::default());
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = AppConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("DATABASE_URL", "postgres://u:p@db:5432/kehadiran"),
        ("DB_MAX_CONNECTIONS", "12"),
        ("DISPLAY_UTC_OFFSET_HOURS", "-3"),
        ("EXPORT_TITLE", "Rapat Koordinasi"),
    ]))
    .unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://u:p@db:5432/kehadiran"));
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.display_offset, UtcOffset::from_hms(-3, 0, 0).unwrap());
    assert_eq!(cfg.heading.title, "Rapat Koordinasi");
    assert_eq!(cfg.heading.organization, DEFAULT_EXPORT_ORGANIZATION);
}

#[test]
fn placeholder_database_url_selects_memory_store() {
    let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://placeholder")])).unwrap();
    assert_eq!(cfg.database_url, None);

    let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "   ")])).unwrap();
    assert_eq!(cfg.database_url, None);
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = AppConfig::from_lookup(lookup(&[("PORT", ""), ("EXPORT_REGION", "  ")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.heading.region, DEFAULT_EXPORT_REGION);
}

#[test]
fn invalid_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    assert!(err.to_string().contains("eighty"));
}

#[test]
fn out_of_range_offset_is_rejected() {
    let err = AppConfig::from_lookup(lookup(&[("DISPLAY_UTC_OFFSET_HOURS", "30")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "DISPLAY_UTC_OFFSET_HOURS", .. }));
}

#[test]
fn default_config_matches_unset_environment() {
    let cfg = AppConfig::default();
    assert_eq!(cfg, AppConfig::from_lookup(lookup(&[])).unwrap());
    assert!(cfg.database_url.is_none());
}
