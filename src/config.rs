use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Full cookie as sent by the browser, e.g. `session=abc123`
    pub session_cookie: String,
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Program that receives copied text on stdin (e.g. `wl-copy`)
    #[serde(default)]
    pub clipboard_command: Option<String>,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default)]
    pub vim_mode: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_list_limit() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text).context("Invalid config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
    }

    fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            anyhow::bail!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            );
        }
        if self.list_limit == 0 {
            anyhow::bail!("list_limit must be at least 1");
        }
        Ok(())
    }

    /// Where finished downloads are written
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Locate the config file: `--config`, then the platform config dir, then
/// `./config.yaml`
pub fn find_config_path(cli_path: Option<String>) -> Result<PathBuf> {
    // If CLI argument provided, use it
    if let Some(path) = cli_path {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        } else {
            anyhow::bail!("Config file not found at specified path: {}", path);
        }
    }

    // Try ~/.config/tgdrive/config.yaml
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("tgdrive").join("config.yaml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    // Fallback to ./config.yaml
    let local_config = PathBuf::from("config.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }

    // No config found, provide helpful error
    let expected_path = if let Some(config_dir) = dirs::config_dir() {
        config_dir
            .join("tgdrive")
            .join("config.yaml")
            .display()
            .to_string()
    } else {
        "~/.config/tgdrive/config.yaml".to_string()
    };

    anyhow::bail!(
        "Config file not found. Expected locations:\n\
         1. {} (preferred)\n\
         2. ./config.yaml (fallback)\n\
         \n\
         Use --config <path> to specify a custom location.",
        expected_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_yaml(
            "base_url: https://drive.example.com\nsession_cookie: session=abc\n",
        )
        .unwrap();
        assert_eq!(config.list_limit, 50);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.vim_mode);
        assert!(config.clipboard_command.is_none());
    }

    #[test]
    fn test_explicit_download_dir_wins() {
        let config = Config::from_yaml(
            "base_url: http://localhost:8080\nsession_cookie: s=1\ndownload_dir: /tmp/dl\n",
        )
        .unwrap();
        assert_eq!(config.download_dir(), PathBuf::from("/tmp/dl"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let err = Config::from_yaml("base_url: drive.example.com\nsession_cookie: s=1\n")
            .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_missing_cookie_is_an_error() {
        assert!(Config::from_yaml("base_url: http://localhost\n").is_err());
    }

    #[test]
    fn test_cli_path_must_exist() {
        let err = find_config_path(Some("/definitely/not/here.yaml".to_string())).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
