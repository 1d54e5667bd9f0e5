use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment of a student in a subject.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_subject")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub student_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_code: String,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,
    #[sea_orm(belongs_to, from = "subject_code", to = "code")]
    pub subject: HasOne<super::subject::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
