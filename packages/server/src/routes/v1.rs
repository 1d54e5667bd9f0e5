use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/subjects", subject_routes())
        .nest("/attendance", attendance_routes())
        .nest("/analytics", analytics_routes())
        .nest("/defaulters", defaulter_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn subject_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::subject::list_subjects))
}

fn attendance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::attendance::get_attendance,
        handlers::attendance::submit_attendance
    ))
}

fn analytics_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::analytics::get_subject_analytics))
}

fn defaulter_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::analytics::get_monthly_defaulters))
}
