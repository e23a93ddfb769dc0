//! Static category/tag catalog with every tag's drawing routine resolved up
//! front.

pub mod defaults;
pub mod icon;

pub use icon::Icon;

use crate::config::{CatalogConfig, TagEntry};
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogTag {
    pub name: String,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub tags: Vec<CatalogTag>,
}

impl Category {
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    icons: HashMap<(String, String), Icon>,
}

impl Catalog {
    /// Resolve the configured catalog. Empty categories, duplicate names and
    /// tags whose icon cannot be inferred are configuration errors.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        if config.categories.is_empty() {
            return Err(ConfigError::Validation(
                "catalog declares no categories".into(),
            ));
        }

        let mut seen_categories = HashSet::new();
        let mut categories = Vec::with_capacity(config.categories.len());
        let mut icons = HashMap::new();

        for category in &config.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation("category name is empty".into()));
            }
            if !seen_categories.insert(name.to_string()) {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' declared twice"
                )));
            }
            if category.tags.is_empty() {
                return Err(ConfigError::EmptyCategory(name.to_string()));
            }

            let mut seen_tags = HashSet::new();
            let mut tags = Vec::with_capacity(category.tags.len());
            for entry in &category.tags {
                let tag = resolve_tag(name, entry)?;
                if !seen_tags.insert(tag.name.clone()) {
                    return Err(ConfigError::Validation(format!(
                        "tag '{}' declared twice in category '{name}'",
                        tag.name
                    )));
                }
                icons.insert((name.to_string(), tag.name.clone()), tag.icon);
                tags.push(tag);
            }

            categories.push(Category {
                name: name.to_string(),
                tags,
            });
        }

        Ok(Self { categories, icons })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    pub fn icon_for(&self, category: &str, tag: &str) -> Option<Icon> {
        self.icons
            .get(&(category.to_string(), tag.to_string()))
            .copied()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

fn resolve_tag(category: &str, entry: &TagEntry) -> Result<CatalogTag, ConfigError> {
    let (name, explicit) = match entry {
        TagEntry::Name(name) => (name.trim(), None),
        TagEntry::Detailed { name, icon } => (name.trim(), *icon),
    };
    if name.is_empty() {
        return Err(ConfigError::Validation(format!(
            "empty tag in category '{category}'"
        )));
    }
    let icon = explicit
        .or_else(|| Icon::infer(name))
        .ok_or_else(|| ConfigError::UnresolvedIcon {
            category: category.to_string(),
            tag: name.to_string(),
        })?;
    Ok(CatalogTag {
        name: name.to_string(),
        icon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;

    fn category(name: &str, tags: Vec<TagEntry>) -> CategoryConfig {
        CategoryConfig {
            name: name.into(),
            tags,
        }
    }

    #[test]
    fn default_catalog_resolves_every_icon() {
        let catalog = Catalog::from_config(&CatalogConfig::default()).unwrap();
        assert_eq!(
            catalog.category_names(),
            vec!["actors", "activities", "areas", "accessories"]
        );
        for category in catalog.categories() {
            assert!(!category.tags.is_empty());
            for tag in &category.tags {
                assert_ne!(tag.icon, Icon::Frame, "{} fell back to a frame", tag.name);
            }
        }
        assert_eq!(
            catalog.icon_for("areas", "at a dive bar"),
            Some(Icon::Bar)
        );
    }

    #[test]
    fn empty_category_fails_fast() {
        let config = CatalogConfig {
            categories: vec![category("areas", vec![])],
        };
        let err = Catalog::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCategory(name) if name == "areas"));
    }

    #[test]
    fn unresolved_icon_is_a_config_error() {
        let config = CatalogConfig {
            categories: vec![category(
                "villain",
                vec![TagEntry::Name("a sinister dragon".into())],
            )],
        };
        let err = Catalog::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvedIcon { .. }));
    }

    #[test]
    fn explicit_icon_overrides_inference() {
        let config = CatalogConfig {
            categories: vec![category(
                "villain",
                vec![TagEntry::Detailed {
                    name: "a sinister dragon".into(),
                    icon: Some(Icon::Frame),
                }],
            )],
        };
        let catalog = Catalog::from_config(&config).unwrap();
        assert_eq!(
            catalog.icon_for("villain", "a sinister dragon"),
            Some(Icon::Frame)
        );
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let config = CatalogConfig {
            categories: vec![category(
                "areas",
                vec![
                    TagEntry::Name("on a windy beach".into()),
                    TagEntry::Name("on a windy beach".into()),
                ],
            )],
        };
        assert!(Catalog::from_config(&config).is_err());
    }
}
