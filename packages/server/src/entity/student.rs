use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// General register number; not every student has one.
    pub gr_no: Option<String>,
    pub roll_no: String,
    pub name: String,

    #[sea_orm(has_many, via = "student_subject")]
    pub subjects: HasMany<super::subject::Entity>,

    #[sea_orm(has_many)]
    pub attendance_records: HasMany<super::attendance_record::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for common::Student {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            gr_no: m.gr_no,
            roll_no: m.roll_no,
            name: m.name,
        }
    }
}
