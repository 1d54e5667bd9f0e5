pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod subject;

use crate::error::AppError;
use crate::models::shared::validate_subject_code;
use crate::state::AppState;

/// Validate a subject code and confirm the subject exists.
pub(crate) async fn ensure_subject(state: &AppState, subject_code: &str) -> Result<(), AppError> {
    validate_subject_code(subject_code)?;
    if !state.store.subject_exists(subject_code).await? {
        return Err(AppError::NotFound(format!(
            "Subject '{subject_code}' not found"
        )));
    }
    Ok(())
}
