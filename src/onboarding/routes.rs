//! REST endpoints that drive the onboarding form session.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::controller::{AutofillOutcome, FormController};
use super::model::{ColorSlot, CompanyField, TierEdit};
use super::progress::ProgressTracker;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub controller: Arc<FormController>,
    pub progress: Arc<ProgressTracker>,
    /// Parent token for in-flight auto-fills; cancelled on shutdown.
    pub shutdown: CancellationToken,
}

#[derive(Debug, Deserialize)]
struct UrlBody {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct AutofillBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompanyFieldBody {
    field: CompanyField,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ColorBody {
    slot: ColorSlot,
    value: String,
}

/// GET /api/onboarding/form
async fn get_form(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.controller.snapshot().await)
}

/// PUT /api/onboarding/url
async fn put_url(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<UrlBody>,
) -> impl IntoResponse {
    state.controller.set_url(body.url).await;
    StatusCode::NO_CONTENT
}

/// POST /api/onboarding/autofill
///
/// The body is optional; without one the last stored URL is used. 409 if an
/// auto-fill is already running, 502 if extraction failed (the form is left
/// as it was).
async fn post_autofill(
    State(state): State<OnboardingRouteState>,
    body: Option<Json<AutofillBody>>,
) -> Response {
    let url = body.and_then(|Json(body)| body.url);
    let cancel = state.shutdown.child_token();
    match state.controller.auto_fill(url, &cancel).await {
        AutofillOutcome::Completed {
            company_info,
            theme_colors,
        } => Json(serde_json::json!({
            "status": "completed",
            "company_info": company_info,
            "theme_colors": theme_colors,
        }))
        .into_response(),
        AutofillOutcome::AlreadyRunning => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"status": "already_running"})),
        )
            .into_response(),
        AutofillOutcome::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "status": "failed",
                "kind": e.kind(),
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}

/// PATCH /api/onboarding/company
async fn patch_company(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<CompanyFieldBody>,
) -> impl IntoResponse {
    state
        .controller
        .edit_company_field(body.field, body.value)
        .await;
    Json(state.controller.snapshot().await)
}

/// POST /api/onboarding/tiers
async fn post_tier(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let index = state.controller.add_tier().await;
    (StatusCode::CREATED, Json(serde_json::json!({ "index": index })))
}

/// PATCH /api/onboarding/tiers/{index}
async fn patch_tier(
    State(state): State<OnboardingRouteState>,
    Path(index): Path<usize>,
    Json(edit): Json<TierEdit>,
) -> Response {
    match state.controller.edit_tier(index, edit).await {
        Ok(()) => Json(state.controller.snapshot().await).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// PATCH /api/onboarding/colors
async fn patch_colors(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<ColorBody>,
) -> impl IntoResponse {
    state.controller.set_color(body.slot, body.value).await;
    Json(state.controller.snapshot().await)
}

/// POST /api/onboarding/submit
async fn post_submit(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let (company_info, theme_colors) = state.controller.submit().await;
    Json(serde_json::json!({
        "company_info": company_info,
        "theme_colors": theme_colors,
    }))
}

/// GET /api/onboarding/progress
async fn get_progress(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.progress.view())
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/form", get(get_form))
        .route("/api/onboarding/url", put(put_url))
        .route("/api/onboarding/autofill", post(post_autofill))
        .route("/api/onboarding/company", patch(patch_company))
        .route("/api/onboarding/tiers", post(post_tier))
        .route("/api/onboarding/tiers/{index}", patch(patch_tier))
        .route("/api/onboarding/colors", patch(patch_colors))
        .route("/api/onboarding/submit", post(post_submit))
        .route("/api/onboarding/progress", get(get_progress))
        .with_state(state)
}
