pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod session;
pub mod ui;

pub use error::{ApiError, LoginError, Result};
