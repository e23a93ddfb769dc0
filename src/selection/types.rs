use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tags chosen for one generation request, keyed by category. Categories
/// keep insertion order (catalog order for drawn selections); each list is
/// in pick order and holds no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    picks: IndexMap<String, Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, tags: Vec<String>) {
        self.picks.insert(category.into(), tags);
    }

    pub fn with(mut self, category: impl Into<String>, tags: &[&str]) -> Self {
        self.insert(
            category,
            tags.iter().map(|t| (*t).to_string()).collect(),
        );
        self
    }

    pub fn tags(&self, category: &str) -> &[String] {
        self.picks.get(category).map_or(&[], Vec::as_slice)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.picks.contains_key(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.picks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.picks.iter().map(|(c, t)| (c.as_str(), t.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.picks.values().all(Vec::is_empty)
    }

    /// Distinct (category, tag) pairs. A rating touches each pair once.
    pub fn pairs(&self) -> BTreeSet<(&str, &str)> {
        self.picks
            .iter()
            .flat_map(|(category, tags)| {
                tags.iter().map(move |tag| (category.as_str(), tag.as_str()))
            })
            .collect()
    }

    /// Tags of one category joined for display and prompts.
    pub fn joined(&self, category: &str) -> String {
        self.tags(category).join(" and ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_deduplicate_within_a_category() {
        let mut selection = Selection::new();
        selection.insert("areas", vec!["bar".into(), "bar".into()]);
        selection.insert("actors", vec!["bar".into()]);
        let pairs = selection.pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("areas", "bar")));
        assert!(pairs.contains(&("actors", "bar")));
    }

    #[test]
    fn serializes_as_plain_object() {
        let selection = Selection::new()
            .with("areas", &["beach"])
            .with("actors", &["owl", "cat"]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"areas":["beach"],"actors":["owl","cat"]}"#);

        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
        assert_eq!(back.categories().collect::<Vec<_>>(), vec!["areas", "actors"]);
    }

    #[test]
    fn categories_keep_insertion_order() {
        let selection = Selection::new()
            .with("villain", &["a cranky lady yelling"])
            .with("actors", &["a wise old owl"])
            .with("accessories", &["a tiny hat"]);
        assert_eq!(
            selection.categories().collect::<Vec<_>>(),
            vec!["villain", "actors", "accessories"]
        );
        let rows: Vec<&str> = selection.iter().map(|(category, _)| category).collect();
        assert_eq!(rows, vec!["villain", "actors", "accessories"]);
    }

    #[test]
    fn missing_category_reads_as_empty() {
        let selection = Selection::new().with("areas", &["beach"]);
        assert!(selection.tags("villain").is_empty());
        assert_eq!(selection.joined("villain"), "");
        assert!(!selection.is_empty());
        assert!(Selection::new().is_empty());
    }
}
