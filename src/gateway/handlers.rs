use super::session::SessionState;
use super::{AppState, GenerateForm, RateForm};
use crate::error::TemplateError;
use crate::feedback::Rating;
use crate::studio::GenerationFailure;
use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use uuid::Uuid;

const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

fn session_id(state: &AppState, headers: &HeaderMap) -> Uuid {
    state
        .cookies
        .session_from(headers)
        .unwrap_or_else(Uuid::new_v4)
}

fn html_page(
    state: &AppState,
    id: Uuid,
    status: StatusCode,
    page: Result<String, TemplateError>,
) -> Response {
    match page {
        Ok(html) => (
            status,
            [(header::SET_COOKIE, state.cookies.set_cookie(id))],
            Html(html),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed").into_response()
        }
    }
}

async fn curated_count(state: &AppState) -> usize {
    match state.artifacts.curated_images().await {
        Ok(images) => images.len(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to list inspiration images");
            0
        }
    }
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /: landing page, or the pending or failed scene of this session
pub(super) async fn handle_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id(&state, &headers);
    let page = match state.sessions.get(id) {
        SessionState::AwaitingRating {
            selection,
            artifact,
        } => state.views.result(&selection, &artifact),
        SessionState::Failed { selection, reason } => state.views.failure(&selection, &reason),
        SessionState::Idle => state.views.landing(curated_count(&state).await, None),
    };
    html_page(&state, id, StatusCode::OK, page)
}

/// POST /generate
pub(super) async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Response {
    let id = session_id(&state, &headers);

    let retry = match (form.retry, state.sessions.get(id)) {
        (true, SessionState::Failed { selection, .. }) => Some(selection),
        _ => None,
    };
    let result = match retry {
        Some(selection) => {
            tracing::info!("retrying failed selection");
            state.studio.regenerate(selection).await
        }
        None => state.studio.generate().await,
    };

    match result {
        Ok(generation) => {
            let page = state
                .views
                .result(&generation.selection, &generation.artifact);
            state.sessions.set(
                id,
                SessionState::AwaitingRating {
                    selection: generation.selection,
                    artifact: generation.artifact,
                },
            );
            html_page(&state, id, StatusCode::OK, page)
        }
        Err(err) => match err.downcast::<GenerationFailure>() {
            Ok(failure) => {
                let reason = failure.error.to_string();
                let page = state.views.failure(&failure.selection, &reason);
                state.sessions.set(
                    id,
                    SessionState::Failed {
                        selection: failure.selection,
                        reason,
                    },
                );
                html_page(&state, id, StatusCode::BAD_GATEWAY, page)
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "generation aborted before rendering");
                let page = state
                    .views
                    .landing(curated_count(&state).await, Some(GENERIC_FAILURE));
                html_page(&state, id, StatusCode::INTERNAL_SERVER_ERROR, page)
            }
        },
    }
}

/// POST /rate: always redirects home. Only a valid rating of a pending
/// scene is recorded.
pub(super) async fn handle_rate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RateForm>,
) -> Redirect {
    let home = Redirect::to("/");

    let Some(id) = state.cookies.session_from(&headers) else {
        tracing::debug!("rating without a session");
        return home;
    };
    let rating = match Rating::parse(&form.rating) {
        Ok(rating) => rating,
        Err(e) => {
            tracing::warn!(error = %e, "rejected rating");
            return home;
        }
    };
    let Some((selection, artifact)) = state.sessions.take_pending(id) else {
        tracing::debug!("rating without a pending selection");
        return home;
    };

    match state
        .feedback
        .record(rating, &selection, Some(&artifact))
        .await
    {
        Ok(outcome) => {
            if let Some(path) = outcome.promoted {
                tracing::debug!(path = %path.display(), "scene joined the inspiration pool");
            }
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed to record rating");
            state.sessions.set(
                id,
                SessionState::AwaitingRating {
                    selection,
                    artifact,
                },
            );
        }
    }
    home
}

/// GET /api/aggregates
pub(super) async fn handle_aggregates(State(state): State<AppState>) -> Response {
    let selector = state.studio.selector();
    match selector.stats(state.studio.catalog()).await {
        Ok(categories) => Json(serde_json::json!({
            "weighted": selector.is_weighted(),
            "categories": categories,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed to read aggregates");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "aggregates unavailable"})),
            )
                .into_response()
        }
    }
}
