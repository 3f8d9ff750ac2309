pub mod app_config;
pub mod config;
pub mod geo;
pub mod sort;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{normalize, GeoPoint};
pub use sort::{sort_items, SortOrder};
pub use types::{ContentType, FilterContext, TourItem};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
