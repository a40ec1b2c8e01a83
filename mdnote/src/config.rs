//! User configuration loaded from `config.toml`.
//!
//! Every key is optional. A missing file means defaults; an unreadable or
//! malformed file is reported on stderr and also means defaults, so a bad
//! config never prevents opening a document.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Values read from the config file. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub theme: Option<String>,
    /// Root directory of the annotation store.
    pub store_dir: Option<PathBuf>,
    /// Log file used by the interactive viewer.
    pub log_file: Option<PathBuf>,
}

/// Returns the path to the mdnote config file.
///
/// Prefers `$XDG_CONFIG_HOME/mdnote/config.toml`; falls back to
/// `~/.config/mdnote/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("mdnote").join("config.toml")
}

impl Config {
    /// Loads `path`, or the default config path when `None`.
    ///
    /// Never fails; problems are printed to stderr because logging is not
    /// set up yet when this runs.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map_or_else(config_path, Path::to_path_buf);
        let raw = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                eprintln!("mdnote: cannot read config {}: {e}", path.display());
                return Self::default();
            }
        };
        Self::parse(&raw).unwrap_or_else(|e| {
            eprintln!("mdnote: config parse error in {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
