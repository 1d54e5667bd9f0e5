use axum::{Json, extract::State};
use common::Subject;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::state::AppState;

/// List all subjects.
#[utoipa::path(
    get,
    path = "/",
    tag = "Subjects",
    operation_id = "listSubjects",
    summary = "List subjects",
    description = "Returns every subject ordered by code.",
    responses(
        (status = 200, description = "Subjects", body = Vec<Subject>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_subjects(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(state.store.list_subjects().await?))
}
