use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    /// Course code such as `CO321`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,

    #[sea_orm(has_many, via = "student_subject")]
    pub students: HasMany<super::student::Entity>,

    #[sea_orm(has_many)]
    pub attendance_records: HasMany<super::attendance_record::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for common::Subject {
    fn from(m: Model) -> Self {
        Self {
            code: m.code,
            name: m.name,
        }
    }
}
