//! Config Tests: environment and .env loading
//!
//! These mutate process environment, so they serialize on ENV_LOCK.

use beeconnect::AppConfig;
use once_cell::sync::Lazy;
use std::io::Write;
use std::sync::Mutex;
use tempfile::TempDir;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner())
}

fn clear_env() {
    for key in ["BEECONNECT_PROJECT_ID", "BEECONNECT_CHAIN", "BEECONNECT_TEST_ACCOUNT"] {
        std::env::remove_var(key);
    }
}

/// Test: .env seeds unset variables, existing ones win
#[test]
fn dotenv_populates_config_without_overriding() {
    let _guard = lock_env();
    clear_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(".env");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(file, "# demo settings").expect("write");
    writeln!(file, "BEECONNECT_PROJECT_ID=\"from-file\"").expect("write");
    writeln!(file, "BEECONNECT_TEST_ACCOUNT=0xfeed").expect("write");
    drop(file);

    std::env::set_var("BEECONNECT_PROJECT_ID", "from-env");
    let loaded = AppConfig::load_dotenv(&path).expect("load");
    let config = AppConfig::from_env();

    assert_eq!(loaded, 1);
    assert_eq!(config.project_id, "from-env");
    assert_eq!(config.test_recipient, "0xfeed");
    assert_eq!(config.default_chain, "eip155:1001");
    clear_env();
}

/// Test: absent .env file is not an error
#[test]
fn missing_dotenv_loads_nothing() {
    let _guard = lock_env();
    clear_env();
    let dir = TempDir::new().expect("tempdir");

    assert_eq!(AppConfig::load_dotenv(dir.path().join("absent.env")).expect("load"), 0);
    let config = AppConfig::from_env();
    assert_eq!(config.project_id, "");
    assert_eq!(config.test_recipient, "");
}

/// Test: BEECONNECT_CHAIN overrides the default chain
#[test]
fn chain_override_from_env() {
    let _guard = lock_env();
    clear_env();
    std::env::set_var("BEECONNECT_CHAIN", "eip155:8217");

    assert_eq!(AppConfig::from_env().default_chain, "eip155:8217");
    clear_env();
}
