//! # api-adapters Handlers
//!
//! This module coordinates the flow between HTTP requests and the services.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use domains::{
    reference::{ReferenceItem, CUISINES, FLAVOR_MOODS},
    Clock, FeedbackSubmission,
};
use services::{FeedbackGate, PreferenceService};
use tracing::error;

use crate::{
    dto::{
        DndResponse, DndUpdate, EligibilityResponse, ErrorBody, FeedbackHistoryEntry, ServerTime,
        SubmitResponse,
    },
    error::ApiError,
    extract::CurrentUser,
    middleware::open_cors_headers,
};

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub preferences: Arc<PreferenceService>,
    pub feedback: Arc<FeedbackGate>,
    pub clock: Arc<dyn Clock>,
}

fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))
}

pub async fn get_dnd(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DndResponse>, ApiError> {
    let dnd_enabled = state.preferences.get_dnd_enabled(&user).await?;
    Ok(Json(DndResponse { dnd_enabled }))
}

pub async fn put_dnd(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<DndUpdate>, JsonRejection>,
) -> Result<Json<DndResponse>, ApiError> {
    let DndUpdate { enabled } = json_payload(payload)?;
    state.preferences.update_dnd_setting(&user, enabled).await?;
    Ok(Json(DndResponse {
        dnd_enabled: enabled,
    }))
}

/// Never errors on storage trouble: the gate fails open.
pub async fn feedback_eligibility(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<EligibilityResponse> {
    let eligibility = state.feedback.eligibility(&user).await;
    Json(EligibilityResponse {
        can_show_feedback: eligibility.can_show_feedback,
        last_feedback_time: eligibility.last_feedback_time,
        remaining_seconds: eligibility.remaining_seconds,
    })
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let submission = json_payload(payload)?;
    let submitted = state.feedback.submit_feedback(&user, submission).await?;
    Ok((StatusCode::CREATED, Json(SubmitResponse { submitted })))
}

/// The caller's submissions, oldest first.
pub async fn feedback_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FeedbackHistoryEntry>>, ApiError> {
    let records = state.feedback.history(&user).await?;
    Ok(Json(records.into_iter().map(FeedbackHistoryEntry::from).collect()))
}

pub async fn list_cuisines() -> Json<&'static [ReferenceItem]> {
    Json(&CUISINES[..])
}

pub async fn list_flavor_moods() -> Json<&'static [ReferenceItem]> {
    Json(&FLAVOR_MOODS[..])
}

/// `{ "now": "<ISO-8601>" }`, or `{ "error": ... }` with a 500.
pub async fn server_time(State(state): State<AppState>) -> Response {
    let body = ServerTime {
        now: state.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let (status, payload) = match serde_json::to_string(&body) {
        Ok(json) => (StatusCode::OK, json),
        Err(err) => {
            error!(error = %err, "server-time serialization failed");
            let fallback = ErrorBody {
                error: err.to_string(),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::to_string(&fallback).unwrap_or_else(|_| r#"{"error":"unknown"}"#.into()),
            )
        }
    };

    (
        status,
        open_cors_headers(),
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response()
}

/// Preflight: empty body, open CORS headers, 200.
pub async fn server_time_preflight() -> Response {
    (StatusCode::OK, open_cors_headers()).into_response()
}
