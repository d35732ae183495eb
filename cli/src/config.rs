// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use shiftcal_core::{APP_NAME, Config};
use tokio::fs;

const SHIFTCAL_CONFIG_ENV: &str = "SHIFTCAL_CONFIG";

/// Locate and parse the configuration file.
///
/// Priority: the `--config` flag, then the `SHIFTCAL_CONFIG` environment
/// variable, then `config.toml` in the user config directory. A missing
/// default file is not an error; the tool runs with defaults.
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(SHIFTCAL_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if !config.exists() {
            tracing::debug!(file = %config.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        config
    };

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {e}", path.display()))?;
    let config = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config file at {}: {e}", path.display()))?;
    Ok(config)
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn explicit_path_is_parsed() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
default_owner = "tech-1"

[remote]
base_url = "https://calendar.example.com/api"
"#,
        )
        .unwrap();

        let config = parse_config(Some(config_path)).await.unwrap();

        assert_eq!(config.default_owner.as_deref(), Some("tech-1"));
        assert!(config.remote.is_some());
    }

    #[tokio::test]
    async fn missing_explicit_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_config(Some(temp_dir.path().join("nope.toml"))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "default_owner = [not toml").unwrap();

        let result = parse_config(Some(config_path)).await;
        assert!(result.is_err());
    }
}
