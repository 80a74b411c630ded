//! Configuration resolution and graceful degradation
//!
//! Tests that touch TRIPWRAP_CONFIG are marked #[serial] so they do not
//! race on the process environment.

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tripwrap_common::config::{resolve_config_path, ConfigSource, TomlConfig, CONFIG_ENV_VAR};
use tripwrap_common::Error;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_env_var_used_without_cli_arg() {
    let test_path = "/tmp/tripwrap-test-env.toml";
    env::set_var(CONFIG_ENV_VAR, test_path);

    let resolved = resolve_config_path(None);

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolved, Some(PathBuf::from(test_path)));
}

#[test]
#[serial]
fn test_cli_arg_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");
    let cli = PathBuf::from("/tmp/from-cli.toml");

    let resolved = resolve_config_path(Some(cli.as_path()));

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolved, Some(cli));
}

#[test]
#[serial]
fn test_missing_file_degrades_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let config = TomlConfig::load(Some(missing.as_path())).unwrap();

    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_missing_file_is_reported_as_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let (config, source) = TomlConfig::load_with_source(Some(missing.as_path())).unwrap();

    assert_eq!(config, TomlConfig::default());
    assert_eq!(source, ConfigSource::Missing(missing));
    assert!(source.is_default());
}

#[test]
fn test_existing_file_is_reported_as_file_source() {
    let file = write_config("[logging]\nlevel = \"warn\"\n");

    let (config, source) = TomlConfig::load_with_source(Some(file.path())).unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    assert!(!source.is_default());
}

#[test]
#[serial]
fn test_load_file_from_env_var() {
    let file = write_config(
        r#"
        [playback]
        base_slide_ms = 4000
        per_image_ms = 1000

        [story]
        profile_name = "Ada"
        utc_offset_minutes = 60

        [logging]
        level = "debug"
        "#,
    );
    env::set_var(CONFIG_ENV_VAR, file.path());

    let config = TomlConfig::load(None);

    env::remove_var(CONFIG_ENV_VAR);
    let config = config.unwrap();
    assert_eq!(config.playback.base_slide_ms, 4000);
    assert_eq!(config.playback.per_image_ms, 1000);
    assert_eq!(config.playback.settle_ms, 300);
    assert_eq!(config.story.profile_name, "Ada");
    assert_eq!(config.story.utc_offset_minutes, 60);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_file_is_error() {
    let file = write_config("[story]\nprofile_name = ");

    let result = TomlConfig::load(Some(file.path()));

    assert!(matches!(result, Err(Error::Config(_))));
}
