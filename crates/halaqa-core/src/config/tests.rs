//! Tests for configuration module.

use super::*;

#[test_log::test]
fn test_defaults_apply_without_sources() {
    let settings = Settings::from_toml_str("").expect("defaults should deserialize");

    assert_eq!(settings.limits, GenerationLimits::default());
    assert_eq!(settings.limits.max_ahead_days, 365);
    assert_eq!(settings.limits.max_sessions_per_batch, 100);
    assert_eq!(settings.scheduling.default_timezone, "Asia/Riyadh");
    assert_eq!(settings.scheduling.storage_timezone, "UTC");
    assert!(settings.scheduling.day_aliases.is_empty());
    assert_eq!(settings.batch.input_path, "schedules.json");
    assert!(settings.batch.existing_path.is_none());
    assert_eq!(settings.logging.level, "info");
}

#[test_log::test]
fn test_toml_overrides_defaults() {
    let settings = Settings::from_toml_str(
        r#"
        [limits]
        max_ahead_days = 30

        [scheduling]
        default_timezone = "Africa/Cairo"

        [scheduling.day_aliases]
        "lundi" = "monday"

        [batch]
        input_path = "tenants.json"
        existing_path = "existing.json"

        [logging]
        level = "debug"
        "#,
    )
    .expect("valid toml");

    assert_eq!(settings.limits.max_ahead_days, 30);
    // Untouched keys keep their defaults
    assert_eq!(settings.limits.max_sessions_per_batch, 100);
    assert_eq!(settings.scheduling.default_timezone, "Africa/Cairo");
    assert_eq!(settings.scheduling.storage_timezone, "UTC");
    assert_eq!(
        settings.scheduling.day_aliases.get("lundi").map(String::as_str),
        Some("monday")
    );
    assert_eq!(settings.batch.input_path, "tenants.json");
    assert_eq!(settings.batch.existing_path.as_deref(), Some("existing.json"));
    assert_eq!(settings.logging.level, "debug");
}

#[test]
fn test_blank_timezone_is_rejected() {
    let err = Settings::from_toml_str(
        r#"
        [scheduling]
        default_timezone = "  "
        "#,
    )
    .expect_err("blank timezone must fail");

    assert!(matches!(err, CoreError::ConfigError(_)));
}

#[test]
fn test_blank_day_alias_is_rejected() {
    let err = Settings::from_toml_str(
        r#"
        [scheduling.day_aliases]
        " " = "monday"
        "#,
    )
    .expect_err("blank alias must fail");

    assert!(matches!(err, CoreError::ConfigError(_)));
}

#[test]
fn test_malformed_toml_is_a_config_source_error() {
    let err = Settings::from_toml_str("[limits\nmax_ahead_days = ").expect_err("invalid toml");
    assert!(matches!(err, CoreError::ConfigSource(_)));
}

#[test]
fn test_clamp_count() {
    let limits = GenerationLimits::new(365, 100);

    assert_eq!(limits.clamp_count(0), 0);
    assert_eq!(limits.clamp_count(42), 42);
    assert_eq!(limits.clamp_count(100), 100);
    assert_eq!(limits.clamp_count(500), 100);
}
