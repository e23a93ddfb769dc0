use crate::catalog::Catalog;
use crate::config::GatingConfig;

/// Counts read from the prompt history log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCounts {
    /// Generations logged so far
    pub total: u64,
    /// Logged generations that included the primary category
    pub with_primary: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatingDecision {
    pub include_primary: bool,
    pub include_companion: bool,
}

/// Pure gating rule: the primary category joins every `primary_every`-th
/// generation, the companion every `companion_every`-th primary one.
pub fn decide(counts: HistoryCounts, primary_every: u32, companion_every: u32) -> GatingDecision {
    let include_primary = (counts.total + 1) % u64::from(primary_every.max(1)) == 0;
    let include_companion =
        include_primary && (counts.with_primary + 1) % u64::from(companion_every.max(1)) == 0;
    GatingDecision {
        include_primary,
        include_companion,
    }
}

/// Categories to draw this time, in catalog order.
pub fn included_categories(
    catalog: &Catalog,
    gating: Option<&GatingConfig>,
    counts: HistoryCounts,
) -> Vec<String> {
    let Some(gating) = gating else {
        return catalog.category_names();
    };

    let decision = decide(counts, gating.primary_every, gating.companion_every);
    catalog
        .category_names()
        .into_iter()
        .filter(|name| {
            if *name == gating.primary {
                decision.include_primary
            } else if gating.companion.as_deref() == Some(name.as_str()) {
                decision.include_companion
            } else {
                true
            }
        })
        .collect()
}
