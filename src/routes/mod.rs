pub mod auth;
pub mod navigation;
pub mod shell;
pub mod user;
