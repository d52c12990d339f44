//! Layered loading from real files.

use dify_kb_config::{
    load_config_file, load_config_with_options, save_config, KbConfig, Profile,
};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn test_project_layer_overrides_user_layer() {
    let user = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(
        &user,
        "config.toml",
        r#"
current-profile = "cloud"

[[profiles]]
name = "cloud"
base-url = "https://api.dify.ai/v1"
api-key-env = "DIFY_CLOUD_KEY"
"#,
    );
    write(
        &project,
        "dify-kb.toml",
        r#"
current-profile = "local"

[[profiles]]
name = "local"
base-url = "http://localhost/v1"
"#,
    );

    let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
    assert_eq!(loaded.loaded_from().len(), 2);
    assert_eq!(loaded.config.current().unwrap().name, "local");
    assert_eq!(loaded.config.profile_names(), vec!["cloud", "local"]);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_missing_files_yield_empty_config() {
    let user = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
    assert!(loaded.loaded_from().is_empty());
    assert_eq!(loaded.sources.len(), 2);
    assert!(loaded.config.profiles.is_empty());
}

#[test]
fn test_broken_layer_becomes_warning() {
    let user = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(&user, "config.toml", "current-profile = [not toml");

    let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
    assert!(loaded.loaded_from().is_empty());
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("config.toml"));
}

#[test]
fn test_plaintext_key_warns() {
    let user = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(
        &project,
        "dify-kb.toml",
        r#"
[[profiles]]
name = "local"
base-url = "http://localhost/v1"
api-key = "dataset-abc"
"#,
    );

    let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("local"));
}

#[test]
fn test_save_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = KbConfig::new();
    config.set_profile(Profile::new("cloud", "https://api.dify.ai/v1").with_api_key_env("K"));
    config.use_profile("cloud").unwrap();
    save_config(&config, &path).unwrap();

    let reloaded = load_config_file(&path).unwrap();
    assert_eq!(reloaded, config);
}
