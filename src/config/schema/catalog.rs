use crate::catalog::{Icon, defaults};
use serde::{Deserialize, Serialize};

/// A catalog tag: either bare text (icon inferred at load) or a table with
/// an explicit icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        icon: Option<Icon>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<TagEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

fn default_categories() -> Vec<CategoryConfig> {
    defaults::CATEGORIES
        .iter()
        .map(|(name, tags)| CategoryConfig {
            name: (*name).to_string(),
            tags: tags.iter().map(|t| TagEntry::Name((*t).to_string())).collect(),
        })
        .collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_tag_entries_parse() {
        let decoded: CatalogConfig = toml::from_str(
            r#"
            [[categories]]
            name = "villain"
            tags = ["a grumpy cat", { name = "a sinister dragon", icon = "frame" }]
            "#,
        )
        .unwrap();
        let tags = &decoded.categories[0].tags;
        assert_eq!(tags[0], TagEntry::Name("a grumpy cat".into()));
        assert_eq!(
            tags[1],
            TagEntry::Detailed {
                name: "a sinister dragon".into(),
                icon: Some(Icon::Frame),
            }
        );
    }

    #[test]
    fn default_catalog_has_four_categories() {
        let config = CatalogConfig::default();
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.categories[2].name, "areas");
    }
}
