use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One attendance fact. At most one row exists per (student, subject, date);
/// resubmission overwrites `present`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub student_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_code: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,

    pub present: bool,

    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,
    #[sea_orm(belongs_to, from = "subject_code", to = "code")]
    pub subject: HasOne<super::subject::Entity>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for common::AttendanceFact {
    fn from(m: Model) -> Self {
        Self::new(m.student_id, m.subject_code, m.date, m.present)
    }
}
