// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use shiftcal_remote::RemoteConfig;

use crate::error::Error;

/// The name of the shiftcal application.
pub const APP_NAME: &str = "shiftcal";

/// Configuration for the shiftcal application.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Directory for storing application state.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Owner recorded on new events when the caller does not name one.
    #[serde(default)]
    pub default_owner: Option<String>,

    /// Remote calendar provider; absent means no mirroring.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Config {
    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a configured path cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), Error> {
        match &self.state_dir {
            Some(a) => {
                let expanded = expand_path(a).map_err(|e| {
                    Error::Config(format!("Failed to expand state directory path: {e}"))
                })?;
                self.state_dir = Some(expanded);
            }

            // No state directory means the database lives in memory only.
            None => match get_state_dir() {
                Some(a) => self.state_dir = Some(a.join(APP_NAME)),
                None => tracing::warn!("no state directory found, using in-memory database"),
            },
        };

        Ok(())
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, String> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".to_string())
}

fn get_state_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir
}
