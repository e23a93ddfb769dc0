//! Rating validation and the feedback step that turns a rating into
//! aggregate increments.

pub mod rating;

pub use rating::Rating;

use crate::media::{ArtifactStore, GeneratedArtifact};
use crate::selection::Selection;
use crate::store::{AggregateStore, RatingEvent};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingOutcome {
    pub rating: Rating,
    /// Where the artifact landed in the inspiration pool, for top ratings
    pub promoted: Option<PathBuf>,
}

/// Records ratings into the aggregate store and promotes top-rated artifacts.
#[derive(Clone)]
pub struct RatingFeedback {
    store: Arc<dyn AggregateStore>,
    artifacts: Arc<ArtifactStore>,
}

impl RatingFeedback {
    pub fn new(store: Arc<dyn AggregateStore>, artifacts: Arc<ArtifactStore>) -> Self {
        Self { store, artifacts }
    }

    /// Validate a raw score, then record it. Out-of-range scores fail with
    /// [`crate::error::RatingError`] before the store is touched.
    pub async fn record_value(
        &self,
        raw: i64,
        selection: &Selection,
        artifact: Option<&GeneratedArtifact>,
    ) -> Result<RatingOutcome> {
        let rating = Rating::try_from(raw)?;
        self.record(rating, selection, artifact).await
    }

    pub async fn record(
        &self,
        rating: Rating,
        selection: &Selection,
        artifact: Option<&GeneratedArtifact>,
    ) -> Result<RatingOutcome> {
        let event = RatingEvent::new(rating, selection.clone());
        self.store.record_event(&event).await?;
        tracing::info!(
            rating = rating.value(),
            pairs = selection.pairs().len(),
            "rating recorded"
        );

        let mut promoted = None;
        if rating.is_top()
            && let Some(artifact) = artifact
        {
            // The rating is already committed; a failed copy only costs the pool an image.
            match self.artifacts.promote_to_curated(artifact).await {
                Ok(path) => promoted = path,
                Err(e) => tracing::warn!(error = %e, "failed to promote artifact"),
            }
        }

        Ok(RatingOutcome { rating, promoted })
    }
}
