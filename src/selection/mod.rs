//! Weighted tag draws, history gating and the prompt history log.

pub mod gating;
pub mod history;
pub mod selector;
pub mod types;

pub use gating::{GatingDecision, HistoryCounts, included_categories};
pub use history::{PromptHistory, PromptRecord};
pub use selector::{CategoryStats, DrawPlan, Selector, TagStats, tag_weight};
pub use types::Selection;
