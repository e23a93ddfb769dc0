use super::types::Selection;
use crate::catalog::Catalog;
use crate::store::{AggregateStore, RatingAggregate};
use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Weight of one tag: `1 + average rating`, so an untried tag weighs 1 and
/// no tag can ever drop to zero.
pub fn tag_weight(aggregate: Option<&RatingAggregate>) -> f64 {
    1.0 + aggregate.map_or(0.0, RatingAggregate::average)
}

/// How many tags to draw from a pool: uniform in `1..=min(max, pool)` when
/// the pool has at least two members, else 1.
pub fn pick_count<R: Rng + ?Sized>(rng: &mut R, pool: usize, max: usize) -> usize {
    if pool < 2 {
        return 1;
    }
    let upper = max.clamp(1, pool);
    rng.random_range(1..=upper)
}

/// Index of one weighted draw.
pub fn draw_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize> {
    let dist = WeightedIndex::new(weights).context("invalid tag weights")?;
    Ok(dist.sample(rng))
}

/// `count` distinct candidates in pick order, each drawn by weight from the
/// ones still left.
pub fn draw_without_replacement<R: Rng + ?Sized>(
    candidates: &[String],
    weights: &[f64],
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    if candidates.len() != weights.len() {
        bail!(
            "{} candidates but {} weights",
            candidates.len(),
            weights.len()
        );
    }

    let mut pool: Vec<(&String, f64)> = candidates.iter().zip(weights.iter().copied()).collect();
    let mut picked = Vec::with_capacity(count.min(pool.len()));
    while picked.len() < count && !pool.is_empty() {
        let pool_weights: Vec<f64> = pool.iter().map(|(_, w)| *w).collect();
        let index = draw_index(&pool_weights, rng)?;
        let (tag, _) = pool.swap_remove(index);
        picked.push(tag.clone());
    }
    Ok(picked)
}

/// Candidates and weights of one category, fetched ahead of the draw so the
/// RNG is never held across an await.
#[derive(Debug, Clone)]
pub struct CategoryPlan {
    pub category: String,
    pub candidates: Vec<String>,
    pub weights: Vec<f64>,
}

/// Everything needed to draw one selection without touching the store.
#[derive(Debug, Clone, Default)]
pub struct DrawPlan {
    pub categories: Vec<CategoryPlan>,
    pub max_per_category: usize,
}

impl DrawPlan {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Selection> {
        let mut selection = Selection::new();
        for plan in &self.categories {
            let count = pick_count(rng, plan.candidates.len(), self.max_per_category);
            let tags = draw_without_replacement(&plan.candidates, &plan.weights, count, rng)?;
            tracing::debug!(category = %plan.category, ?tags, "drew tags");
            selection.insert(plan.category.clone(), tags);
        }
        Ok(selection)
    }
}

/// Draws tags from the catalog, weighted by rating history or uniformly.
#[derive(Clone)]
pub struct Selector {
    store: Arc<dyn AggregateStore>,
    weighted: bool,
    max_per_category: usize,
}

impl Selector {
    pub fn new(store: Arc<dyn AggregateStore>, weighted: bool, max_per_category: usize) -> Self {
        Self {
            store,
            weighted,
            max_per_category: max_per_category.max(1),
        }
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Weight of every candidate, in candidate order. Uniform mode never
    /// reads the store.
    pub async fn weights(&self, category: &str, candidates: &[String]) -> Result<Vec<f64>> {
        if !self.weighted {
            return Ok(vec![1.0; candidates.len()]);
        }
        let aggregates: HashMap<String, RatingAggregate> = self
            .store
            .aggregates(category)
            .await?
            .into_iter()
            .map(|a| (a.tag.clone(), a))
            .collect();
        Ok(candidates
            .iter()
            .map(|tag| tag_weight(aggregates.get(tag)))
            .collect())
    }

    /// One tag from `candidates`.
    pub async fn choose<R: Rng + Send + ?Sized>(
        &self,
        category: &str,
        candidates: &[String],
        rng: &mut R,
    ) -> Result<String> {
        if candidates.is_empty() {
            bail!("category '{category}' has no candidates");
        }
        let weights = self.weights(category, candidates).await?;
        let index = draw_index(&weights, rng)?;
        Ok(candidates[index].clone())
    }

    /// Up to `count` distinct tags from `candidates`.
    pub async fn choose_many<R: Rng + Send + ?Sized>(
        &self,
        category: &str,
        candidates: &[String],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        if candidates.is_empty() {
            bail!("category '{category}' has no candidates");
        }
        let weights = self.weights(category, candidates).await?;
        draw_without_replacement(candidates, &weights, count, rng)
    }

    /// Fetch weights for every included category, in catalog order.
    pub async fn plan(&self, catalog: &Catalog, included: &[String]) -> Result<DrawPlan> {
        let mut categories = Vec::with_capacity(included.len());
        for category in catalog.categories() {
            if !included.iter().any(|name| *name == category.name) {
                continue;
            }
            let candidates = category.tag_names();
            let weights = self.weights(&category.name, &candidates).await?;
            categories.push(CategoryPlan {
                category: category.name.clone(),
                candidates,
                weights,
            });
        }
        Ok(DrawPlan {
            categories,
            max_per_category: self.max_per_category,
        })
    }

    /// Draw every included category.
    pub async fn select<R: Rng + Send + ?Sized>(
        &self,
        catalog: &Catalog,
        rng: &mut R,
        included: &[String],
    ) -> Result<Selection> {
        self.plan(catalog, included).await?.draw(rng)
    }

    /// Aggregates and current draw weights for every category, catalog tags
    /// first, then tags only the store still remembers.
    pub async fn stats(&self, catalog: &Catalog) -> Result<Vec<CategoryStats>> {
        let mut stats = Vec::with_capacity(catalog.categories().len());
        for category in catalog.categories() {
            let mut stored: HashMap<String, RatingAggregate> = self
                .store
                .aggregates(&category.name)
                .await
                .with_context(|| format!("Failed to read aggregates for '{}'", category.name))?
                .into_iter()
                .map(|a| (a.tag.clone(), a))
                .collect();

            let mut tags: Vec<TagStats> = category
                .tag_names()
                .into_iter()
                .map(|tag| {
                    let aggregate = stored
                        .remove(&tag)
                        .unwrap_or_else(|| RatingAggregate::empty(&category.name, &tag));
                    self.tag_stats(aggregate)
                })
                .collect();
            let mut retired: Vec<RatingAggregate> = stored.into_values().collect();
            retired.sort_by(|a, b| a.tag.cmp(&b.tag));
            tags.extend(retired.into_iter().map(|a| self.tag_stats(a)));

            stats.push(CategoryStats {
                category: category.name.clone(),
                tags,
            });
        }
        Ok(stats)
    }

    fn tag_stats(&self, aggregate: RatingAggregate) -> TagStats {
        let weight = if self.weighted {
            tag_weight(Some(&aggregate))
        } else {
            1.0
        };
        TagStats {
            average: aggregate.average(),
            tag: aggregate.tag,
            total_score: aggregate.total_score,
            rating_count: aggregate.rating_count,
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagStats {
    pub tag: String,
    pub total_score: i64,
    pub rating_count: i64,
    pub average: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub tags: Vec<TagStats>,
}
