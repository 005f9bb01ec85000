// src/config.rs

//! Defines the configuration structures for the `tprl` page viewer.
//!
//! Every section derives `Default`, and `#[serde(default)]` lets a
//! configuration file name only the settings it wants to change. The file is
//! JSON, the same format as the documents themselves.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Environment variable naming a configuration file to load.
pub const CONFIG_ENV_VAR: &str = "TPRL_CONFIG";

/// Process-wide configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Where documents come from.
    pub document: DocumentConfig,
    /// Text shown to the user outside of the page itself.
    pub messages: MessagesConfig,
    /// Terminal fallbacks.
    pub terminal: TerminalConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads the file named by `TPRL_CONFIG`, or the defaults if the variable
    /// is unset. A broken file is reported and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Self::default()
            }
        }
    }
}

// --- Document Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Document shown when none is given on the command line, relative to the
    /// working directory.
    pub default_path: PathBuf,
    /// Title for documents that have none, or an empty one.
    pub default_title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            default_path: PathBuf::from("main_page.tprl"),
            default_title: crate::document::DEFAULT_TITLE.to_string(),
        }
    }
}

// --- Messages Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Printed when the viewer exits.
    pub exit: String,
    /// First line of the recovery menu after a failed load.
    pub load_failed: String,
    /// Key help shown below `load_failed`.
    pub recovery_menu: String,
    /// Confirmation prompt. `{action}` is replaced by the pending action.
    pub confirm: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        MessagesConfig {
            exit: "Exited TPRL. ".to_string(),
            load_failed: "Could not load the requested page.".to_string(),
            recovery_menu: "[M] main page   [R] retry   [X] exit".to_string(),
            confirm: "Are you sure you want to {action}? [y/N]".to_string(),
        }
    }
}

impl MessagesConfig {
    pub fn confirm_prompt(&self, action: &str) -> String {
        self.confirm.replace("{action}", action)
    }
}

// --- Terminal Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Width used for `line` elements when the terminal size is unknown.
    pub fallback_columns: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            fallback_columns: 80,
        }
    }
}

// --- Logging Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file. Defaults to `tprl.log` in the system temp directory.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("tprl.log"))
    }
}
