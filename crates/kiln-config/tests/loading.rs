//! Tests for layered configuration loading.
//!
//! Priority: environment > file > defaults

use kiln_config::{Config, ConfigError};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn defaults_apply_without_a_config_file() {
    let temp = TempDir::new().unwrap();

    let config = Config::load(temp.path(), None).unwrap();

    assert_eq!(config.root, temp.path());
    assert!(config.source.is_none());
    assert_eq!(config.paths.style_bundle, "weel.css");
    assert_eq!(config.dist_dir(), temp.path().join("dist"));
}

#[test]
#[serial]
fn kiln_toml_in_root_is_picked_up() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kiln.toml"),
        r#"
            [paths]
            styles = "styles/**/*.styl"
            style_bundle = "app.css"
            partials = "src/partials/**/*"

            [test]
            files = "spec/**/*.js"
            reporter = "dot"
        "#,
    )
    .unwrap();

    let config = Config::load(temp.path(), None).unwrap();

    assert_eq!(config.source, Some(temp.path().join("kiln.toml")));
    assert_eq!(config.paths.styles, "styles/**/*.styl");
    assert_eq!(config.paths.style_bundle, "app.css");
    // untouched keys keep their defaults
    assert_eq!(config.paths.script_bundle, "weel.js");
    assert_eq!(config.paths.partials.as_deref(), Some("src/partials/**/*"));

    let test = config.test.expect("test section");
    assert_eq!(test.files, "spec/**/*.js");
    assert_eq!(test.reporter, "dot");
    assert_eq!(test.ui, "bdd");
    assert_eq!(test.command, "mocha");
}

#[test]
#[serial]
fn explicit_config_path_must_exist() {
    let temp = TempDir::new().unwrap();

    let err = Config::load(temp.path(), Some(&PathBuf::from("missing.toml"))).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(path) if path.ends_with("missing.toml")));
}

#[test]
#[serial]
fn environment_overrides_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("custom.toml"),
        r#"
            [server]
            port = 9000
        "#,
    )
    .unwrap();

    unsafe {
        std::env::set_var("KILN_SERVER__PORT", "9100");
    }
    let result = Config::load(temp.path(), Some(&PathBuf::from("custom.toml")));
    unsafe {
        std::env::remove_var("KILN_SERVER__PORT");
    }

    let config = result.unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.source, Some(temp.path().join("custom.toml")));
}

#[test]
#[serial]
fn unknown_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kiln.toml"),
        r#"
            [paths]
            stylez = "typo"
        "#,
    )
    .unwrap();

    let err = Config::load(temp.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
#[serial]
fn two_configurations_coexist() {
    let first_root = TempDir::new().unwrap();
    let second_root = TempDir::new().unwrap();
    fs::write(first_root.path().join("kiln.toml"), "[paths]\nstyle_bundle = \"one.css\"").unwrap();
    fs::write(second_root.path().join("kiln.toml"), "[paths]\nstyle_bundle = \"two.css\"").unwrap();

    let first = Config::load(first_root.path(), None).unwrap();
    let second = Config::load(second_root.path(), None).unwrap();

    assert_eq!(first.paths.style_bundle, "one.css");
    assert_eq!(second.paths.style_bundle, "two.css");
    assert_eq!(first.dist_dir(), first_root.path().join("dist"));
    assert_eq!(second.dist_dir(), second_root.path().join("dist"));
}
