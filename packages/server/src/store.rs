use async_trait::async_trait;
use chrono::Utc;
use common::{AttendanceFact, AttendanceStore, FactFilter, StoreError, Student, Subject};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::entity::{attendance_record, student, student_subject, subject};

/// [`AttendanceStore`] backed by the SeaORM connection pool.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(err: DbErr) -> StoreError {
    StoreError::Database(err.to_string())
}

#[async_trait]
impl AttendanceStore for SeaOrmStore {
    async fn fetch_facts(
        &self,
        subject_code: &str,
        filter: Option<FactFilter>,
    ) -> Result<Vec<AttendanceFact>, StoreError> {
        let mut query = attendance_record::Entity::find()
            .filter(attendance_record::Column::SubjectCode.eq(subject_code));

        match filter {
            Some(FactFilter::Month(month)) => {
                let Some((first, next_first)) = month.bounds() else {
                    return Ok(Vec::new());
                };
                query = query
                    .filter(attendance_record::Column::Date.gte(first))
                    .filter(attendance_record::Column::Date.lt(next_first));
            }
            Some(FactFilter::Date(date)) => {
                query = query.filter(attendance_record::Column::Date.eq(date));
            }
            None => {}
        }

        let rows = query
            .order_by_asc(attendance_record::Column::Date)
            .order_by_asc(attendance_record::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_enrollment(&self, subject_code: &str) -> Result<Vec<Student>, StoreError> {
        let ids: Vec<i32> = student_subject::Entity::find()
            .select_only()
            .column(student_subject::Column::StudentId)
            .filter(student_subject::Column::SubjectCode.eq(subject_code))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = student::Entity::find()
            .filter(student::Column::Id.is_in(ids))
            .order_by_asc(student::Column::RollNo)
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(students.into_iter().map(Into::into).collect())
    }

    async fn subject_exists(&self, subject_code: &str) -> Result<bool, StoreError> {
        let found = subject::Entity::find_by_id(subject_code.to_owned())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        let subjects = subject::Entity::find()
            .order_by_asc(subject::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(subjects.into_iter().map(Into::into).collect())
    }

    async fn upsert_fact(&self, fact: &AttendanceFact) -> Result<(), StoreError> {
        let enrolled = student_subject::Entity::find_by_id((
            fact.student_id,
            fact.subject_code.clone(),
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?;

        if enrolled.is_none() {
            return Err(StoreError::NotEnrolled {
                student_id: fact.student_id,
                subject_code: fact.subject_code.clone(),
            });
        }

        let model = attendance_record::ActiveModel {
            student_id: Set(fact.student_id),
            subject_code: Set(fact.subject_code.clone()),
            date: Set(fact.date),
            present: Set(fact.present),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        attendance_record::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    attendance_record::Column::StudentId,
                    attendance_record::Column::SubjectCode,
                    attendance_record::Column::Date,
                ])
                .update_columns([
                    attendance_record::Column::Present,
                    attendance_record::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}
