mod app;
mod config;
mod effects;
mod reporter;
mod signal;

pub use app::run_app;
