//! FarmX web interface
//!
//! Server-rendered forms for projected yield and soil nutrient advice,
//! a small JSON API over the same validation rules, and the usual
//! health and metrics endpoints.

pub mod charts;
pub mod config;
pub mod errors;
pub mod forms;
pub mod pages;
pub mod server;
pub mod telemetry;

pub use config::{ConfigManager, Environment, WebConfig};
pub use errors::{ApiError, ConfigError, FormError, SubmitError};
pub use pages::Theme;
pub use server::{build_router, start_server, AppState, SharedState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
