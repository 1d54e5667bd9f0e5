use axum::{
    Json,
    extract::{Path, State},
};
use common::submit_batch;
use tracing::{info, instrument, warn};

use super::ensure_subject;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::attendance::{
    RosterResponse, SubmitAttendanceRequest, SubmitAttendanceResponse, validate_submission,
};
use crate::models::shared::parse_date;
use crate::state::AppState;

/// Roster of a subject with attendance for one date.
#[utoipa::path(
    get,
    path = "/{subject_code}/{date}",
    tag = "Attendance",
    operation_id = "getAttendance",
    summary = "Get attendance for a date",
    description = "Lists every enrolled student ordered by roll number. \
        Students without a mark for the date read as absent with `recorded: false`.",
    params(
        ("subject_code" = String, Path, description = "Subject code", example = "CO321"),
        ("date" = String, Path, description = "Date as YYYY-MM-DD", example = "2024-01-15"),
    ),
    responses(
        (status = 200, description = "Roster", body = RosterResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Subject not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_attendance(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path((subject_code, date)): Path<(String, String)>,
) -> Result<Json<RosterResponse>, AppError> {
    let date = parse_date(&date)?;
    ensure_subject(&state, &subject_code).await?;

    let roster = state.store.roster_for_date(&subject_code, date).await?;

    Ok(Json(RosterResponse {
        success: true,
        subject_code,
        date,
        students: roster.into_iter().map(Into::into).collect(),
    }))
}

/// Record attendance for many students on one date.
#[utoipa::path(
    post,
    path = "/{subject_code}/{date}",
    tag = "Attendance",
    operation_id = "submitAttendance",
    summary = "Submit attendance for a date",
    description = "Upserts one mark per student. Each write stands alone: when some fail, \
        the rest are kept and the response lists which students to retry.",
    params(
        ("subject_code" = String, Path, description = "Subject code", example = "CO321"),
        ("date" = String, Path, description = "Date as YYYY-MM-DD", example = "2024-01-15"),
    ),
    request_body = SubmitAttendanceRequest,
    responses(
        (status = 200, description = "All marks saved", body = SubmitAttendanceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Subject not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Some marks failed (PARTIAL_BATCH_FAILURE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(user_id = auth_user.user_id, count = payload.students.len())
)]
pub async fn submit_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((subject_code, date)): Path<(String, String)>,
    AppJson(payload): AppJson<SubmitAttendanceRequest>,
) -> Result<Json<SubmitAttendanceResponse>, AppError> {
    let date = parse_date(&date)?;
    let marks = validate_submission(&payload)?;
    ensure_subject(&state, &subject_code).await?;

    let outcome = submit_batch(state.store.as_ref(), &subject_code, date, &marks).await;

    if !outcome.is_complete() {
        warn!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Attendance submission partially failed"
        );
        return Err(AppError::PartialBatchFailure(outcome));
    }

    info!(updated = outcome.succeeded.len(), "Attendance saved");

    Ok(Json(SubmitAttendanceResponse {
        success: true,
        message: "Attendance saved".into(),
        updated: outcome.succeeded.len(),
    }))
}
