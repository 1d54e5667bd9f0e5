use chrono::Utc;
use sea_orm::sea_query::{Index, OnConflict};
use sea_orm::*;
use tracing::{info, warn};

use crate::config::BootstrapUser;
use crate::entity::{attendance_record, user};
use crate::utils::hash;

/// Create the bootstrap account if no user with that name exists.
///
/// An existing account keeps its password.
pub async fn seed_bootstrap_user(
    db: &DatabaseConnection,
    bootstrap: &BootstrapUser,
) -> Result<(), DbErr> {
    let hash = hash::hash_password(&bootstrap.password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let model = user::ActiveModel {
        username: Set(bootstrap.username.trim().to_string()),
        password: Set(hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = user::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => info!(username = %bootstrap.username, "Seeded bootstrap user"),
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// Schema sync only creates primary keys and unique columns, so secondary
/// composite indexes are created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Per-subject reads filtered by date range:
    // SELECT ... FROM attendance_record WHERE subject_code = ? AND date >= ? AND date < ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_attendance_subject_date")
        .table(attendance_record::Entity)
        .col(attendance_record::Column::SubjectCode)
        .col(attendance_record::Column::Date)
        .to_owned();

    let stmt = db.get_database_backend().build(&stmt);

    match db.execute_raw(stmt).await {
        Ok(_) => {
            info!("Ensured index idx_attendance_subject_date exists");
        }
        Err(e) => {
            warn!("Failed to create index idx_attendance_subject_date: {}", e);
        }
    }

    Ok(())
}
