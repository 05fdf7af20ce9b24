use anyhow::{Context, Result};
use frontend::upload::DEFAULT_UPLOAD_PATH;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "appui.toml";

#[derive(Debug, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Page the session opens on; empty for the root page.
    #[serde(default)]
    pub page_path: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            page_path: String::new(),
            upload_path: default_upload_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UiSection {
    /// Append the open events of each widget to the outline.
    #[serde(default = "default_true")]
    pub show_events: bool,
}

impl Default for UiSection {
    fn default() -> Self {
        Self { show_events: true }
    }
}

fn default_origin() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_upload_path() -> String {
    DEFAULT_UPLOAD_PATH.to_string()
}

fn default_true() -> bool {
    true
}

pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: ClientConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<ClientConfig> {
    if path.exists() {
        load_config(path)
    } else {
        log::info!("No config at {}, using defaults", path.display());
        Ok(ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.origin, "http://127.0.0.1:8000");
        assert_eq!(config.server.page_path, "");
        assert_eq!(config.server.upload_path, "/upload");
        assert!(config.ui.show_events);
    }

    #[test]
    fn test_partial_sections() {
        let config: ClientConfig = toml::from_str(
            r#"
            [server]
            origin = "https://ui.example.com"
            page_path = "settings"

            [ui]
            show_events = false
            "#,
        )
        .unwrap();
        assert_eq!(config.server.origin, "https://ui.example.com");
        assert_eq!(config.server.page_path, "settings");
        assert_eq!(config.server.upload_path, "/upload");
        assert!(!config.ui.show_events);
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here/appui.toml");
        assert!(load_config(path).is_err());
        assert!(load_config_or_default(path).unwrap().ui.show_events);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = std::env::temp_dir().join(format!("appui-invalid-{}.toml", std::process::id()));
        std::fs::write(&path, "[server\norigin = 1").unwrap();
        let error = load_config(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{error:#}").contains("Failed to parse config file"));
    }
}
