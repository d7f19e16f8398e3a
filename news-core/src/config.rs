use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

const APP_DIR: &str = "news-viewer";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub favorites: FavoritesConfig,
    pub ui: UiConfig,
    pub theme: ThemeConfig,
}

/// Where the headlines come from. The credential itself never lives here,
/// only the name of the environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    pub endpoint: String,
    pub query: BTreeMap<String, String>,
    pub credential_param: String,
    pub credential_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FavoritesConfig {
    pub file_name: String,
    pub clear_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub list_panel_width: f32,
    pub repaint_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub background_color: [u8; 3],
    pub panel_color: [u8; 3],
    pub accent_color: [u8; 3],
    pub text_color: [u8; 3],
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/top-headlines".to_owned(),
            query: BTreeMap::from([("country".to_owned(), "us".to_owned())]),
            credential_param: "apiKey".to_owned(),
            credential_env: "NEWS_API_KEY".to_owned(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            file_name: "favorites.txt".to_owned(),
            clear_on_start: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 720.0,
            list_panel_width: 420.0,
            repaint_interval_ms: 250,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 30],
            panel_color: [37, 37, 38],
            accent_color: [0, 122, 204],
            text_color: [204, 204, 204],
        }
    }
}

impl FeedConfig {
    /// Reads the credential from the configured environment variable.
    pub fn credential(&self) -> Result<SecretString, ConfigError> {
        match std::env::var(&self.credential_env) {
            Ok(value) if !value.is_empty() => Ok(SecretString::from(value)),
            _ => Err(ConfigError::MissingCredential(self.credential_env.clone())),
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(APP_DIR))
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Loads the user config, falling back to (and writing out) the defaults.
    pub fn load() -> Self {
        let path = match Self::config_file_path() {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, "no config location, using defaults");
                return Self::default();
            }
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, path = %path.display(), "failed to load config, using defaults");
                let config = Self::default();
                if let Err(save_err) = config.save_to(&path) {
                    warn!(error = %save_err, "failed to write default config");
                }
                config
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::config_file_path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Favorites file, relative names resolve against `base`.
    pub fn favorites_path(&self, base: impl AsRef<Path>) -> PathBuf {
        let name = Path::new(&self.favorites.file_name);
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            base.as_ref().join(name)
        }
    }
}

impl ThemeConfig {
    pub fn background_color32(&self) -> egui::Color32 {
        rgb(self.background_color)
    }

    pub fn panel_color32(&self) -> egui::Color32 {
        rgb(self.panel_color)
    }

    pub fn accent_color32(&self) -> egui::Color32 {
        rgb(self.accent_color)
    }

    pub fn text_color32(&self) -> egui::Color32 {
        rgb(self.text_color)
    }
}

fn rgb([r, g, b]: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(r, g, b)
}
