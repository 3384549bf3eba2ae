pub mod config;
pub mod web;

pub use config::Config;
pub use web::AppState;
