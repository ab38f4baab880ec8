//! Process configuration.
//! Mission: One explicit Config struct, loaded once at startup, no globals

use std::env;
use std::path::{Path, PathBuf};

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: String,
    pub jwt_secret: String,
}

impl Config {
    /// Build configuration from environment variables with sane defaults.
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_path = resolve_data_path(env::var("DB_PATH").ok(), "taskrail.db");

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

        Self {
            bind_addr,
            db_path,
            jwt_secret,
        }
    }
}

pub fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv::dotenv();

    // 2) Also try the crate directory .env (common when running with --manifest-path)
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

fn default_data_path(filename: &str) -> String {
    // Anchor defaults to the crate directory so running from elsewhere doesn't
    // accidentally create a new empty DB in a different working directory.
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    base.join(filename).to_string_lossy().to_string()
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) else {
        return default_data_path(default_filename);
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Treat relative paths as relative to the crate directory, not the caller's cwd.
    base.join(p).to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_path_default() {
        let resolved = resolve_data_path(None, "taskrail.db");
        assert!(resolved.ends_with("taskrail.db"));
        assert!(Path::new(&resolved).is_absolute());
    }

    #[test]
    fn test_resolve_data_path_absolute_passthrough() {
        let resolved = resolve_data_path(Some("/tmp/custom.db".to_string()), "taskrail.db");
        assert_eq!(resolved, "/tmp/custom.db");
    }

    #[test]
    fn test_resolve_data_path_relative_is_anchored() {
        let resolved = resolve_data_path(Some("data/app.db".to_string()), "taskrail.db");
        assert!(resolved.ends_with("data/app.db"));
        assert!(Path::new(&resolved).is_absolute());
    }

    #[test]
    fn test_resolve_data_path_blank_falls_back() {
        let resolved = resolve_data_path(Some("   ".to_string()), "taskrail.db");
        assert!(resolved.ends_with("taskrail.db"));
    }
}
