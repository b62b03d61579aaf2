pub mod app_config;
pub mod config;
pub mod vehicle;
pub mod vocabulary;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{
    default_listing_urls, load_app_config, load_app_config_from_env, DEFAULT_USER_AGENT,
};
pub use vehicle::{Condition, TitleParseResult, VehicleRecord, COLUMN_HEADERS};
pub use vocabulary::{load_vocabulary, BodyStyleGroup, Vocabulary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read vocabulary file {path}: {source}")]
    VocabularyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vocabulary file: {0}")]
    VocabularyFileParse(#[from] serde_yaml::Error),

    #[error("vocabulary validation failed: {0}")]
    Validation(String),
}
