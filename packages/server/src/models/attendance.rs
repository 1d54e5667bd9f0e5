use chrono::NaiveDate;
use common::RosterEntry;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::AppError;
use crate::models::shared::{MAX_BATCH_SIZE, validate_bulk_ids};

/// One student's mark within a submission.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AttendanceMark {
    /// Student ID.
    #[schema(example = 12)]
    pub id: i32,
    /// `1` for present, `0` for absent. `true`/`false` are accepted too.
    #[serde(deserialize_with = "attendance_flag")]
    #[schema(value_type = i32, example = 1)]
    pub attendance: bool,
}

fn attendance_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(de::Error::custom(format!(
            "attendance must be 0 or 1, got {n}"
        ))),
    }
}

/// Request body for submitting one date's attendance.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SubmitAttendanceRequest {
    pub students: Vec<AttendanceMark>,
}

/// Validate a submission and flatten it into `(student_id, present)` pairs.
pub fn validate_submission(
    payload: &SubmitAttendanceRequest,
) -> Result<Vec<(i32, bool)>, AppError> {
    let ids: Vec<i32> = payload.students.iter().map(|s| s.id).collect();
    validate_bulk_ids(&ids, "students", MAX_BATCH_SIZE)?;
    Ok(payload
        .students
        .iter()
        .map(|s| (s.id, s.attendance))
        .collect())
}

/// A student on the roster for one date.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "GR1024")]
    pub gr_no: Option<String>,
    #[schema(example = "21")]
    pub roll_no: String,
    #[schema(example = "Asha Patil")]
    pub name: String,
    /// `1` if marked present, else `0`. Unrecorded students read as `0`.
    #[schema(example = 1)]
    pub attendance: u8,
    /// Whether a mark exists for this date.
    #[schema(example = true)]
    pub recorded: bool,
}

impl From<RosterEntry> for RosterStudent {
    fn from(entry: RosterEntry) -> Self {
        Self {
            id: entry.student.id,
            gr_no: entry.student.gr_no,
            roll_no: entry.student.roll_no,
            name: entry.student.name,
            attendance: u8::from(entry.present),
            recorded: entry.recorded,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "CO321")]
    pub subject_code: String,
    #[schema(value_type = String, example = "2024-01-15")]
    pub date: NaiveDate,
    pub students: Vec<RosterStudent>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmitAttendanceResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Attendance saved")]
    pub message: String,
    /// Number of students written.
    #[schema(example = 30)]
    pub updated: usize,
}
