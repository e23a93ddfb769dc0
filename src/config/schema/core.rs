use super::{
    CatalogConfig, ImageBackend, ImageConfig, SelectionConfig, ServerConfig, StoreConfig,
};
use crate::catalog::Catalog;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".smilegen";
const DATABASE_FILE: &str = "smiles.db";
const RATING_LOG_FILE: &str = "ratings.log";
const PROMPT_LOG_FILE: &str = "prompt_history.log";
const GENERATED_DIR: &str = "generated";
const INSPIRATION_DIR: &str = "inspiration_images";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from `data_dir` or the config location, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Override for the data directory (`~` is expanded)
    #[serde(default)]
    pub data_dir: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let smile_dir = home.join(CONFIG_DIR_NAME);

        Self {
            workspace_dir: smile_dir.join("workspace"),
            config_path: smile_dir.join("config.toml"),
            data_dir: None,
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            image: ImageConfig::default(),
            selection: SelectionConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Load `~/.smilegen/config.toml`, writing a default one on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let smile_dir = home.join(CONFIG_DIR_NAME);
        let config_path = smile_dir.join("config.toml");

        if !smile_dir.exists() {
            fs::create_dir_all(&smile_dir).context("Failed to create .smilegen directory")?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Self {
                config_path,
                ..Self::default()
            };
            config.resolve_workspace_dir();
            config.save()?;
            Ok(config)
        }
    }

    /// Load a config file from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(e.to_string()))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.config_path = path.to_path_buf();
        config.resolve_workspace_dir();
        Ok(config)
    }

    fn resolve_workspace_dir(&mut self) {
        self.workspace_dir = match self.data_dir.as_deref() {
            Some(raw) => {
                let expanded = shellexpand::tilde(raw);
                PathBuf::from(expanded.as_ref())
            }
            None => self
                .config_path
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
                .join("workspace"),
        };
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    // Priority: environment variable > config file.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| {
            lookup(key).and_then(|value| {
                let value = value.trim();
                (!value.is_empty()).then(|| value.to_owned())
            })
        };

        if let Some(secret) = non_empty("SMILE_SECRET") {
            self.server.secret_key = secret;
        }
        if let Some(key) = non_empty("SMILE_IMAGE_API_KEY").or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.image.api_key = Some(key);
        }
        if let Some(model) = non_empty("SMILE_IMAGE_MODEL") {
            self.image.model = model;
        }
        if let Some(size) = non_empty("SMILE_IMAGE_SIZE") {
            self.image.size = size;
        }
        if let Some(url) = non_empty("SMILE_IMAGE_API_URL") {
            self.image.api_url = url;
        }
        if let Some(dir) = non_empty("SMILE_DATA_DIR") {
            self.data_dir = Some(dir);
            self.resolve_workspace_dir();
        }
    }

    /// Startup validation. Returns the resolved catalog so callers never
    /// draw from an unchecked one.
    pub fn validate(&self) -> Result<Catalog, ConfigError> {
        let catalog = Catalog::from_config(&self.catalog)?;

        if self.selection.max_per_category == 0 {
            return Err(ConfigError::Validation(
                "selection.max_per_category must be at least 1".into(),
            ));
        }

        if let Some(gating) = &self.selection.gating {
            if gating.primary_every == 0 || gating.companion_every == 0 {
                return Err(ConfigError::Validation(
                    "gating periods must be at least 1".into(),
                ));
            }
            if !catalog.contains_category(&gating.primary) {
                return Err(ConfigError::Validation(format!(
                    "gating primary '{}' is not a catalog category",
                    gating.primary
                )));
            }
            if let Some(companion) = &gating.companion
                && !catalog.contains_category(companion)
            {
                return Err(ConfigError::Validation(format!(
                    "gating companion '{companion}' is not a catalog category"
                )));
            }
        }

        if self.image.width == 0 || self.image.height == 0 {
            return Err(ConfigError::Validation(
                "image.width and image.height must be positive".into(),
            ));
        }

        if self.image.backend == ImageBackend::Remote {
            if self
                .image
                .api_key
                .as_deref()
                .is_none_or(|key| key.trim().is_empty())
            {
                return Err(ConfigError::MissingCredentials(
                    "Missing SMILE_IMAGE_API_KEY or OPENAI_API_KEY for AI image generation.".into(),
                ));
            }
            url::Url::parse(&self.image.api_url).map_err(|e| {
                ConfigError::Validation(format!("image.api_url '{}': {e}", self.image.api_url))
            })?;
        }

        if self.server.request_timeout_secs <= self.image.timeout_secs {
            return Err(ConfigError::Validation(
                "server.request_timeout_secs must exceed image.timeout_secs".into(),
            ));
        }

        Ok(catalog)
    }

    pub fn database_path(&self) -> PathBuf {
        self.workspace_dir.join(DATABASE_FILE)
    }

    pub fn rating_log_path(&self) -> PathBuf {
        self.workspace_dir.join(RATING_LOG_FILE)
    }

    pub fn prompt_log_path(&self) -> PathBuf {
        self.workspace_dir.join(PROMPT_LOG_FILE)
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.workspace_dir.join(GENERATED_DIR)
    }

    pub fn inspiration_dir(&self) -> PathBuf {
        self.workspace_dir.join(INSPIRATION_DIR)
    }
}
