use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const DEFAULT_IMAGE_API_URL: &str = "https://api.openai.com/v1/images/generations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageBackend {
    /// Procedural compositor, no network access
    #[default]
    Local,
    /// Text-to-image HTTP API
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub backend: ImageBackend,
    /// Images endpoint (OpenAI compatible)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API key; `SMILE_IMAGE_API_KEY` / `OPENAI_API_KEY` take precedence
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Size requested from the API, e.g. "1024x1024"
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Output canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Tera template for the scene prompt; built-in template when unset
    #[serde(default)]
    pub prompt_template: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_IMAGE_API_URL.into()
}

fn default_model() -> String {
    "gpt-image-1".into()
}

fn default_size() -> String {
    "1024x1024".into()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_width() -> u32 {
    900
}

fn default_height() -> u32 {
    520
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            backend: ImageBackend::default(),
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            size: default_size(),
            timeout_secs: default_timeout_secs(),
            width: default_width(),
            height: default_height(),
            prompt_template: None,
        }
    }
}
