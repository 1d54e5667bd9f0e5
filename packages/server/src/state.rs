use std::sync::Arc;

use common::AttendanceStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub store: Arc<dyn AttendanceStore>,
    pub config: AppConfig,
}
