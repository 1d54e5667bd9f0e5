use common::MonthFilter;
use common::metrics::{MonthlyDefaulter, SubjectAnalytics};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::error::AppError;
use crate::models::shared::validate_month_year;

/// Optional month scope for subject analytics.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsParams {
    /// Month 1-12. Requires `year`.
    pub month: Option<u32>,
    /// Four-digit year. Requires `month`.
    pub year: Option<i32>,
}

impl AnalyticsParams {
    pub fn month_filter(&self) -> Result<Option<MonthFilter>, AppError> {
        match (self.month, self.year) {
            (None, None) => Ok(None),
            (Some(month), Some(year)) => validate_month_year(month, year).map(Some),
            _ => Err(AppError::Validation(
                "month and year must be given together".into(),
            )),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalyticsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: SubjectAnalytics,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DefaultersResponse {
    #[schema(example = true)]
    pub success: bool,
    pub defaulters: Vec<MonthlyDefaulter>,
}
