use super::*;
use tempfile::{tempdir, TempDir};
use std::fs::File;
use std::io::Write;

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        port: 8000,
        media_root: "media".to_string(),
        media_url: "/media/".to_string(),
        log_dir: None,
    }
}

fn empty_args() -> CliArgs {
    CliArgs {
        database_url: None,
        port: None,
        media_root: None,
        log_dir: None,
        debug: false,
        log_json: false,
    }
}

#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        port: Some(9000),
        media_root: Some("/srv/media".to_string()),
        media_url: Some("/uploads/".to_string()),
        log_dir: Some("/var/log/jobmarket".to_string()),
        server_url: None,
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.port, 9000);
    assert_eq!(updated.media_root, "/srv/media");
    assert_eq!(updated.media_url, "/uploads/");
    assert_eq!(updated.log_dir.as_deref(), Some("/var/log/jobmarket"));
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        ..ConfigUpdate::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.port, 8000); // Unchanged
    assert_eq!(updated.media_root, "media"); // Unchanged
}

#[test]
fn test_apply_update_keeps_log_dir_when_not_overridden() {
    let mut config = sample_config();
    config.log_dir = Some("logs".to_string());

    let updated = config.apply_update(ConfigUpdate::default());

    assert_eq!(updated.log_dir.as_deref(), Some("logs"));
}

#[test]
fn test_media_url_prefix_normalisation() {
    let mut config = sample_config();
    assert_eq!(config.media_url_prefix(), "/media/");

    config.media_url = "uploads".to_string();
    assert_eq!(config.media_url_prefix(), "/uploads/");

    config.media_url = "/".to_string();
    assert_eq!(config.media_url_prefix(), "/");
}

#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "jobmarket.db");
    assert_eq!(config.port, 8000);
    assert_eq!(config.media_root, "media");
    assert_eq!(config.media_url, "/media/");
    assert!(config.log_dir.is_none());
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db_path = temp_dir.path().join("jobmarket.db").to_string_lossy().to_string();
    let expected_media = temp_dir.path().join("media").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
    assert_eq!(config.media_root, expected_media);
}

#[test]
fn test_config_from_args_with_values() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        port: Some(3000),
        media_root: None,
        log_dir: Some("logs".to_string()),
        debug: true,
        log_json: false,
    };

    let update = config_from_args(args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.port, Some(3000));
    assert_eq!(update.media_root, None);
    assert_eq!(update.log_dir, Some("logs".to_string()));
    assert_eq!(update.server_url, None);
}

#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();
    assert_eq!(update.database_url, None);
    assert_eq!(update.port, None);
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        port = 8080
        media_url = "/files/"
        server_url = "http://localhost:8080"
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    let result = config_from_file(Some(config_path));

    assert!(result.is_ok(), "Failed to parse config file: {}", result.err().unwrap());
    let update = result.unwrap();
    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.port, Some(8080));
    assert_eq!(update.media_url, Some("/files/".to_string()));
    assert_eq!(update.server_url, Some("http://localhost:8080".to_string()));
    assert_eq!(update.media_root, None);
}

#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        port = "not a number"
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    assert!(config_from_file(Some(config_path)).is_err());
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();

    assert_eq!(update.database_url, None);
    assert_eq!(update.port, None);
}

#[test]
fn test_config_precedence() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..empty_args()
    };

    let file_config = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        port: Some(5000),
        ..ConfigUpdate::default()
    };

    let config = base_config(None)
        .apply_update(file_config)
        .apply_update(config_from_args(args));

    assert_eq!(config.database_url, "args.db"); // From args
    assert_eq!(config.port, 5000); // From file
    assert_eq!(config.media_root, "media"); // From base
}

#[test]
fn test_full_config_with_no_overrides() {
    let config = base_config(None)
        .apply_update(ConfigUpdate::default())
        .apply_update(config_from_args(empty_args()));

    assert_eq!(config.database_url, "jobmarket.db");
    assert_eq!(config.port, 8000);
}
