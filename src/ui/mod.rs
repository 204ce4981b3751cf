//! UI module exports.

pub mod app;
pub mod clients_panel;
pub mod components;
pub mod dashboard;
pub mod login_panel;

pub use app::App;
