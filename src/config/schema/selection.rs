use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Weight draws by rating history; uniform draws when false
    #[serde(default = "default_true")]
    pub weighted: bool,
    /// Upper bound of tags drawn per category (1 = single pick)
    #[serde(default = "default_max_per_category")]
    pub max_per_category: usize,
    /// Fixed RNG seed for reproducible draws
    #[serde(default)]
    pub seed: Option<u64>,
    /// History-gated categories; every category is drawn when unset
    #[serde(default)]
    pub gating: Option<GatingConfig>,
}

fn default_true() -> bool {
    true
}

fn default_max_per_category() -> usize {
    1
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            weighted: true,
            max_per_category: default_max_per_category(),
            seed: None,
            gating: None,
        }
    }
}

/// Periodic inclusion of categories, driven by the prompt history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatingConfig {
    /// Category drawn only on every `primary_every`-th generation
    pub primary: String,
    #[serde(default = "default_primary_every")]
    pub primary_every: u32,
    /// Category drawn only on every `companion_every`-th primary generation
    #[serde(default)]
    pub companion: Option<String>,
    #[serde(default = "default_companion_every")]
    pub companion_every: u32,
}

fn default_primary_every() -> u32 {
    4
}

fn default_companion_every() -> u32 {
    3
}
