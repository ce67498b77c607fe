#![allow(dead_code)]

use coursehub::config::Config;
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// Unique on-disk SQLite path under the system temp dir.
pub fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "coursehub-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

pub fn sqlite_url(path: &std::path::Path) -> String {
    format!("sqlite:{}", path.display())
}

/// Test config: cheap hashing, seed route on, no dependence on the
/// process environment.
pub fn test_config(database_url: Option<String>) -> Config {
    Config {
        database_url,
        bcrypt_cost: 4,
        enable_seed_route: true,
        seed_admin_password: Some("bootstrap-pass".to_string()),
        ..Config::default()
    }
}

pub fn cleanup(path: &std::path::Path) {
    let _ = std::fs::remove_file(path);
    for suffix in ["-wal", "-shm"] {
        let mut p = path.as_os_str().to_owned();
        p.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(p));
    }
}
