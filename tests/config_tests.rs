use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::tempdir;

use diarist::config::{Config, IN_MEMORY_DB};
use diarist::db::Database;
use diarist::errors::{AppError, AppResult};

/// Saves the given variables and restores them on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn new(names: &[&'static str]) -> Self {
        let saved = names.iter().map(|name| (*name, env::var(name).ok())).collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

const CONFIG_VARS: &[&str] = &[
    "DIARIST_DB",
    "DIARIST_SENDER",
    "DIARIST_LOG_FORMAT",
    "HOME",
    "USER",
];

#[test]
#[serial]
fn test_config_load_with_environment_vars() {
    let _guard = EnvGuard::new(CONFIG_VARS);

    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("diary.db");

    env::set_var("DIARIST_DB", &db_path);
    env::set_var("DIARIST_SENDER", "sms:+15550002");
    env::set_var("DIARIST_LOG_FORMAT", "json");

    let config = Config::load().unwrap();

    assert_eq!(config.db_path, db_path);
    assert_eq!(config.sender, "sms:+15550002");
    assert_eq!(config.log_format, "json");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_config_load_with_fallbacks() {
    let _guard = EnvGuard::new(CONFIG_VARS);

    env::remove_var("DIARIST_DB");
    env::remove_var("DIARIST_SENDER");
    env::remove_var("DIARIST_LOG_FORMAT");

    let temp_dir = tempdir().unwrap();
    let home_path = temp_dir.path().to_string_lossy().to_string();
    env::set_var("HOME", &home_path);
    env::set_var("USER", "dana");

    let config = Config::load().unwrap();

    let expected_db_path = PathBuf::from(&home_path)
        .join(".local")
        .join("share")
        .join("diarist")
        .join("diarist.db");
    assert_eq!(config.db_path, expected_db_path);
    assert_eq!(config.sender, "dana");
    assert_eq!(config.log_format, "text");
}

#[test]
#[serial]
fn test_config_expands_tilde_and_variables() {
    let _guard = EnvGuard::new(CONFIG_VARS);

    let temp_dir = tempdir().unwrap();
    let home_path = temp_dir.path().to_string_lossy().to_string();
    env::set_var("HOME", &home_path);

    env::set_var("DIARIST_DB", "~/diaries/main.db");
    let config = Config::load().unwrap();
    assert_eq!(
        config.db_path,
        PathBuf::from(&home_path).join("diaries").join("main.db")
    );

    env::set_var("DIARIST_DB", "$HOME/other.db");
    let config = Config::load().unwrap();
    assert_eq!(config.db_path, PathBuf::from(&home_path).join("other.db"));
}

#[test]
#[serial]
fn test_config_in_memory_database() {
    let _guard = EnvGuard::new(CONFIG_VARS);

    env::set_var("DIARIST_DB", IN_MEMORY_DB);
    let config = Config::load().unwrap();

    assert!(config.is_in_memory());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_config_validation() -> AppResult<()> {
    let valid_config = Config {
        db_path: PathBuf::from("/absolute/diary.db"),
        sender: "local".to_string(),
        log_format: "text".to_string(),
    };
    valid_config.validate()?;

    let relative_path_config = Config {
        db_path: PathBuf::from("relative/diary.db"),
        ..Config::default()
    };
    match relative_path_config.validate() {
        Err(AppError::Config(msg)) => {
            let msg_lower = msg.to_lowercase();
            assert!(
                msg_lower.contains("path") && msg_lower.contains("absolute"),
                "Config error should indicate path validation issue, got: {}",
                msg
            );
        }
        _ => panic!("Expected Config error about relative path"),
    }

    Ok(())
}

#[test]
#[serial]
fn test_loaded_config_opens_database() -> AppResult<()> {
    let _guard = EnvGuard::new(CONFIG_VARS);

    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("nested").join("dir").join("diary.db");
    env::set_var("DIARIST_DB", &db_path);

    let config = Config::load()?;
    config.validate()?;

    // Parent directories are created on open
    assert!(!db_path.exists());
    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;
    assert!(db_path.exists());

    Ok(())
}
