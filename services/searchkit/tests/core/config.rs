// Integration tests for configuration loading

use searchkit::core::config::Config;
use searchkit::core::xdg::XdgDirs;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "SEARCHKIT_CONFIG",
    "SEARCHKIT_BACKEND_HOST",
    "SEARCHKIT_BACKEND_PASSWORD",
    "SEARCHKIT_DEFAULT_PAGE_SIZE",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn xdg_in(dir: &TempDir) -> XdgDirs {
    XdgDirs {
        config_dir: dir.path().to_path_buf(),
    }
}

#[test]
#[serial]
fn test_load_defaults_without_files() {
    clear_env();
    let dir = TempDir::new().unwrap();

    let config = Config::load_with_xdg(&xdg_in(&dir)).unwrap();
    assert_eq!(config.backend.base_url(), "http://localhost:9200");
    assert_eq!(config.search.default_page_size, 50);
}

#[test]
#[serial]
fn test_load_xdg_file_then_env_override() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        r#"
            [backend]
            host = "es.from-file"
            port = 9201
            username = "elastic"

            [search]
            default_page_size = 25
        "#,
    )
    .unwrap();

    let config = Config::load_with_xdg(&xdg_in(&dir)).unwrap();
    assert_eq!(config.backend.host, "es.from-file");
    assert_eq!(config.search.default_page_size, 25);

    env::set_var("SEARCHKIT_BACKEND_HOST", "es.from-env");
    env::set_var("SEARCHKIT_BACKEND_PASSWORD", "changeme");
    let config = Config::load_with_xdg(&xdg_in(&dir)).unwrap();
    assert_eq!(config.backend.host, "es.from-env");
    assert_eq!(config.backend.port, 9201);
    assert_eq!(config.backend.password.as_deref(), Some("changeme"));

    clear_env();
}

#[test]
#[serial]
fn test_explicit_config_path_wins() {
    clear_env();
    let xdg_dir = TempDir::new().unwrap();
    fs::write(
        xdg_dir.path().join("config.toml"),
        "[backend]\nhost = \"es.xdg\"\n",
    )
    .unwrap();

    let other = TempDir::new().unwrap();
    let explicit = other.path().join("custom.toml");
    fs::write(&explicit, "[backend]\nhost = \"es.explicit\"\n").unwrap();
    env::set_var("SEARCHKIT_CONFIG", &explicit);

    let config = Config::load_with_xdg(&xdg_in(&xdg_dir)).unwrap();
    assert_eq!(config.backend.host, "es.explicit");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[search]\ndefault_page_size = 5000\n",
    )
    .unwrap();

    let err = Config::load_with_xdg(&xdg_in(&dir)).unwrap_err();
    assert!(err.to_string().contains("page size"));
}

#[test]
#[serial]
fn test_malformed_toml_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "[backend\nhost = ").unwrap();

    assert!(Config::load_with_xdg(&xdg_in(&dir)).is_err());
}
