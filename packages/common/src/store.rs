use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use thiserror::Error;
use tracing::warn;

use crate::fact::{AttendanceFact, FactFilter, RosterEntry, Student, Subject};

/// Errors surfaced by an [`AttendanceStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The student is not enrolled in the subject being written.
    #[error("student {student_id} is not enrolled in {subject_code}")]
    NotEnrolled {
        student_id: i32,
        subject_code: String,
    },
    /// The underlying database rejected the operation.
    #[error("database error: {0}")]
    Database(String),
}

/// Read/write access to attendance facts and enrollment.
///
/// Implementations own no computation; metrics are derived from what these
/// reads return.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Facts for a subject, optionally restricted to a month or a single date.
    async fn fetch_facts(
        &self,
        subject_code: &str,
        filter: Option<FactFilter>,
    ) -> Result<Vec<AttendanceFact>, StoreError>;

    /// Students enrolled in a subject, ordered by roll number.
    async fn fetch_enrollment(&self, subject_code: &str) -> Result<Vec<Student>, StoreError>;

    async fn subject_exists(&self, subject_code: &str) -> Result<bool, StoreError>;

    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError>;

    /// Every enrolled student with their attendance on `date`.
    async fn roster_for_date(
        &self,
        subject_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<RosterEntry>, StoreError> {
        let (students, facts) = futures::try_join!(
            self.fetch_enrollment(subject_code),
            self.fetch_facts(subject_code, Some(FactFilter::Date(date))),
        )?;
        Ok(students
            .into_iter()
            .map(|student| {
                let fact = facts.iter().find(|f| f.student_id == student.id);
                RosterEntry {
                    present: fact.is_some_and(|f| f.present),
                    recorded: fact.is_some(),
                    student,
                }
            })
            .collect())
    }

    /// Insert the fact, or overwrite the existing one for the same
    /// `(student, subject, date)`. A single atomic write.
    async fn upsert_fact(&self, fact: &AttendanceFact) -> Result<(), StoreError>;
}

/// A failed write within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedWrite {
    pub student_id: i32,
    pub error: StoreError,
}

/// Per-student results of a batch submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Student IDs whose fact was written, in submission order.
    pub succeeded: Vec<i32>,
    pub failed: Vec<FailedWrite>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upsert one date's attendance for many students of a subject.
///
/// Writes are issued concurrently and each is independently atomic; the batch
/// as a whole is not. Returns only after every write has finished.
pub async fn submit_batch(
    store: &dyn AttendanceStore,
    subject_code: &str,
    date: NaiveDate,
    marks: &[(i32, bool)],
) -> BatchOutcome {
    let facts: Vec<AttendanceFact> = marks
        .iter()
        .map(|&(student_id, present)| {
            AttendanceFact::new(student_id, subject_code, date, present)
        })
        .collect();

    let results = join_all(facts.iter().map(|fact| store.upsert_fact(fact))).await;

    let mut outcome = BatchOutcome::default();
    for (fact, result) in facts.iter().zip(results) {
        match result {
            Ok(()) => outcome.succeeded.push(fact.student_id),
            Err(error) => {
                warn!(
                    student_id = fact.student_id,
                    subject_code,
                    %date,
                    error = %error,
                    "Attendance write failed"
                );
                outcome.failed.push(FailedWrite {
                    student_id: fact.student_id,
                    error,
                });
            }
        }
    }
    outcome
}
