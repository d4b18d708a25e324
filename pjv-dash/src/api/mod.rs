//! HTTP API handlers for pjv-dash

pub mod absence;
pub mod auth;
pub mod health;
pub mod options;
pub mod ui;
pub mod view;

pub use absence::get_absence;
pub use auth::{auth_middleware, login, logout};
pub use health::health_routes;
pub use options::get_options;
pub use ui::{serve_app_js, serve_index};
pub use view::{export_csv, get_view, reload};
