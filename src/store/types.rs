use crate::feedback::Rating;
use crate::selection::Selection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running total and count behind one tag's learned weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub category: String,
    pub tag: String,
    pub total_score: i64,
    pub rating_count: i64,
}

impl RatingAggregate {
    pub fn empty(category: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            tag: tag.into(),
            total_score: 0,
            rating_count: 0,
        }
    }

    /// Mean rating, or the neutral 0 when the tag was never rated.
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        if self.rating_count > 0 {
            self.total_score as f64 / self.rating_count as f64
        } else {
            0.0
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEvent {
    pub rating: Rating,
    pub selections: Selection,
    pub created_at: DateTime<Utc>,
}

impl RatingEvent {
    pub fn new(rating: Rating, selections: Selection) -> Self {
        Self {
            rating,
            selections,
            created_at: Utc::now(),
        }
    }
}

/// A rating event as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRating {
    pub id: i64,
    #[serde(flatten)]
    pub event: RatingEvent,
}
