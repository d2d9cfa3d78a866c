pub mod app_config;
pub mod config;
pub mod products;
pub mod settings;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{CaratRange, Facets, Product, ProductKind, SettingVariant, Shape};
pub use settings::{is_ring_builder_collection, load_builder_settings, BuilderSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read builder settings file {path}: {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse builder settings file: {0}")]
    SettingsFileParse(#[from] serde_yaml::Error),

    #[error("builder settings validation failed: {0}")]
    Validation(String),
}
