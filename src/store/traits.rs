use super::types::{RatingAggregate, RatingEvent, StoredRating};
use crate::catalog::Catalog;
use std::future::Future;
use std::pin::Pin;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

/// Persistence for rating aggregates and the rating audit trail.
pub trait AggregateStore: Send + Sync {
    /// Backend identifier (e.g. "sqlite", "text_log").
    fn name(&self) -> &str;

    /// Create a zero aggregate for every catalog tag that has none yet.
    /// Idempotent.
    fn seed<'a>(&'a self, catalog: &'a Catalog) -> StoreFuture<'a, ()>;

    /// All known aggregates of one category.
    fn aggregates<'a>(&'a self, category: &'a str) -> StoreFuture<'a, Vec<RatingAggregate>>;

    /// Append the audit record and increment every distinct (category, tag)
    /// pair of the event by `rating`/1. All of it becomes visible at once or
    /// not at all.
    fn record_event<'a>(&'a self, event: &'a RatingEvent) -> StoreFuture<'a, ()>;

    /// Most recent rating events, newest first.
    fn recent_events(&self, limit: usize) -> StoreFuture<'_, Vec<StoredRating>>;
}
