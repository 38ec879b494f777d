//! Tests for the show-config CLI command

use searchkit::cli::commands::config::{execute, ConfigArgs};
use searchkit::cli::OutputFormat;
use searchkit::core::config::Config;

fn config_with_credentials() -> Config {
    let mut config = Config::default();
    config.backend.username = Some("elastic".to_string());
    config.backend.password = Some("changeme".to_string());
    config
}

#[test]
fn test_show_config_human() {
    let result = execute(
        ConfigArgs { toml: false },
        &config_with_credentials(),
        OutputFormat::Human,
    );
    assert!(result.is_ok());
}

#[test]
fn test_show_config_json() {
    let result = execute(
        ConfigArgs { toml: false },
        &config_with_credentials(),
        OutputFormat::Json,
    );
    assert!(result.is_ok());
}

#[test]
fn test_show_config_toml() {
    let result = execute(
        ConfigArgs { toml: true },
        &config_with_credentials(),
        OutputFormat::Human,
    );
    assert!(result.is_ok());
}
