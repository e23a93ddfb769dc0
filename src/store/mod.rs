//! Rating aggregates and the rating audit trail.

pub mod factory;
pub mod sqlite;
pub mod text_log;
pub mod traits;
pub mod types;

pub use factory::create_store;
pub use sqlite::SqliteStore;
pub use text_log::TextLogStore;
pub use traits::{AggregateStore, StoreFuture};
pub use types::{RatingAggregate, RatingEvent, StoredRating};
