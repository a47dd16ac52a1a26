use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.json";

/// Runtime configuration, loaded once at startup and handed to the
/// pipeline by value. Secrets can be supplied via environment
/// variables instead of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Copy finished files into a local folder.
    Local {
        #[serde(default = "default_local_root")]
        path: PathBuf,
    },
    /// Upload finished files into a Google Drive folder.
    Drive {
        #[serde(default = "default_drive_folder")]
        folder: String,
        #[serde(default)]
        access_token: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Local {
            path: default_local_root(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            storage: StorageConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("driveget")
}

fn default_local_root() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_drive_folder() -> String {
    "Driveget".into()
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("driveget").join(CONFIG_FILE))
}

/// Read the config file if it exists, otherwise fall back to defaults,
/// then apply environment overrides.
pub fn load() -> AppConfig {
    let mut config = config_path()
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|raw| serde_json::from_str::<AppConfig>(&raw).ok())
        .unwrap_or_default();

    if let Ok(token) = std::env::var("DRIVEGET_TELEGRAM_TOKEN") {
        config.telegram.bot_token = token;
    }
    if let Ok(chat) = std::env::var("DRIVEGET_TELEGRAM_CHAT") {
        config.telegram.chat_id = chat;
    }
    if let Ok(token) = std::env::var("DRIVEGET_DRIVE_TOKEN") {
        if let StorageConfig::Drive { access_token, .. } = &mut config.storage {
            *access_token = token;
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_storage_is_local() {
        let config = AppConfig::default();
        assert!(matches!(config.storage, StorageConfig::Local { .. }));
    }

    #[test]
    fn telegram_unconfigured_by_default() {
        assert!(!TelegramConfig::default().is_configured());
    }

    #[test]
    fn storage_kind_roundtrip() {
        let raw = r#"{"kind":"drive","folder":"Backups","access_token":"tok"}"#;
        let parsed: StorageConfig = serde_json::from_str(raw).unwrap();
        match parsed {
            StorageConfig::Drive {
                folder,
                access_token,
            } => {
                assert_eq!(folder, "Backups");
                assert_eq!(access_token, "tok");
            }
            _ => panic!("expected drive storage"),
        }
    }

    #[test]
    fn partial_config_fills_defaults() {
        let raw = r#"{"telegram":{"bot_token":"t","chat_id":"c"}}"#;
        let parsed: AppConfig = serde_json::from_str(raw).unwrap();
        assert!(parsed.telegram.is_configured());
        assert!(matches!(parsed.storage, StorageConfig::Local { .. }));
    }
}
