use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// An enrolled student as seen by attendance and analytics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Student ID.
    #[schema(example = 7)]
    pub id: i32,
    /// General register number, when the institution assigns one.
    #[schema(example = "GR1042")]
    pub gr_no: Option<String>,
    /// Roll number within the division.
    #[schema(example = "21")]
    pub roll_no: String,
    /// Display name.
    #[schema(example = "Asha Patil")]
    pub name: String,
}

/// A subject students can be enrolled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Subject {
    /// Subject code, e.g. `CO321`.
    #[schema(example = "CO321")]
    pub code: String,
    /// Human-readable subject name.
    #[schema(example = "Machine Learning")]
    pub name: String,
}

/// One recorded present/absent observation.
///
/// At most one fact exists per `(student_id, subject_code, date)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFact {
    pub student_id: i32,
    pub subject_code: String,
    pub date: NaiveDate,
    pub present: bool,
}

impl AttendanceFact {
    pub fn new(
        student_id: i32,
        subject_code: impl Into<String>,
        date: NaiveDate,
        present: bool,
    ) -> Self {
        Self {
            student_id,
            subject_code: subject_code.into(),
            date,
            present,
        }
    }
}

/// A calendar month of a specific year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthFilter {
    /// 1-12.
    pub month: u32,
    pub year: i32,
}

impl MonthFilter {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// Half-open `[first, next_first)` date range, or `None` for an invalid month.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)?
        };
        Some((first, next))
    }
}

/// Restricts which facts a store read returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactFilter {
    Month(MonthFilter),
    Date(NaiveDate),
}

impl FactFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Self::Month(m) => m.contains(date),
            Self::Date(d) => *d == date,
        }
    }
}

/// An enrolled student together with their attendance on one date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub student: Student,
    /// Defaults to absent when nothing was recorded.
    pub present: bool,
    /// Whether a fact exists for this student on the date.
    pub recorded: bool,
}
