//! Axum web front end: landing page, generate, rate, static images and a
//! JSON view of the aggregates.

mod cookie;
mod handlers;
mod server;
mod session;
mod views;

pub use cookie::{CookieSigner, SESSION_COOKIE};
pub use server::{build_app, build_state, run_gateway, run_gateway_with_listener};
pub use session::{SessionState, SessionTable};
pub use views::Views;

use crate::feedback::RatingFeedback;
use crate::media::ArtifactStore;
use crate::studio::Studio;
use std::sync::Arc;

/// Maximum request body size (16KB); forms carry a rating or a retry flag
pub const MAX_BODY_SIZE: usize = 16_384;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Studio>,
    pub feedback: RatingFeedback,
    pub artifacts: Arc<ArtifactStore>,
    pub sessions: Arc<SessionTable>,
    pub cookies: Arc<CookieSigner>,
    pub views: Arc<Views>,
}

/// `POST /generate` form
#[derive(Debug, Default, serde::Deserialize)]
pub struct GenerateForm {
    /// Re-render the failed selection held by the session
    #[serde(default)]
    pub retry: bool,
}

/// `POST /rate` form
#[derive(Debug, Default, serde::Deserialize)]
pub struct RateForm {
    #[serde(default)]
    pub rating: String,
}
