mod auth;
mod error_handler;

pub use auth::route_guard;
pub use error_handler::log_errors;
