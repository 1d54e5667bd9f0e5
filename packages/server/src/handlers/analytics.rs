use axum::{
    Json,
    extract::{Path, Query, State},
};
use common::FactFilter;
use common::metrics::{analyze, monthly_defaulters};
use tracing::instrument;

use super::ensure_subject;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::analytics::{AnalyticsParams, AnalyticsResponse, DefaultersResponse};
use crate::models::shared::validate_month_year;
use crate::state::AppState;

/// Derived attendance metrics for one subject.
#[utoipa::path(
    get,
    path = "/{subject_code}",
    tag = "Analytics",
    operation_id = "getSubjectAnalytics",
    summary = "Subject analytics",
    description = "Overall stats, daily and weekly trends, top performers, defaulters and \
        the attendance distribution. Pass `month` and `year` together to scope to one month.",
    params(
        ("subject_code" = String, Path, description = "Subject code", example = "CO321"),
        AnalyticsParams,
    ),
    responses(
        (status = 200, description = "Analytics", body = AnalyticsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Subject not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_subject_analytics(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(subject_code): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let month = params.month_filter()?;
    ensure_subject(&state, &subject_code).await?;

    let (facts, enrolled) = tokio::try_join!(
        state
            .store
            .fetch_facts(&subject_code, month.map(FactFilter::Month)),
        state.store.fetch_enrollment(&subject_code),
    )?;

    Ok(Json(AnalyticsResponse {
        success: true,
        data: analyze(&facts, &enrolled, month),
    }))
}

/// Students under the attendance threshold within one month.
#[utoipa::path(
    get,
    path = "/{subject_code}/{month}/{year}",
    tag = "Analytics",
    operation_id = "getMonthlyDefaulters",
    summary = "Monthly defaulters",
    description = "Students whose attendance in the given month is below 75%, worst first.",
    params(
        ("subject_code" = String, Path, description = "Subject code", example = "CO321"),
        ("month" = u32, Path, description = "Month 1-12", example = 1),
        ("year" = i32, Path, description = "Year", example = 2024),
    ),
    responses(
        (status = 200, description = "Defaulters", body = DefaultersResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Subject not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_monthly_defaulters(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path((subject_code, month, year)): Path<(String, String, String)>,
) -> Result<Json<DefaultersResponse>, AppError> {
    let month: u32 = month
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid month '{month}'")))?;
    let year: i32 = year
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid year '{year}'")))?;
    let filter = validate_month_year(month, year)?;
    ensure_subject(&state, &subject_code).await?;

    let facts = state
        .store
        .fetch_facts(&subject_code, Some(FactFilter::Month(filter)))
        .await?;

    Ok(Json(DefaultersResponse {
        success: true,
        defaulters: monthly_defaulters(&facts, filter),
    }))
}
