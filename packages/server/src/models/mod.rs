pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod shared;
