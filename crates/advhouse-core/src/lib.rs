pub mod app_config;
pub mod config;
pub mod projects;

use thiserror::Error;

pub use app_config::{AppConfig, TableLayout};
pub use config::{load_app_config, load_app_config_from_env};
pub use projects::{load_projects, parse_projects, ProjectConfig, ProjectsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read projects file {path}: {source}")]
    ProjectsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse projects file: {0}")]
    ProjectsFileParse(#[from] serde_yaml::Error),

    #[error("projects validation failed: {0}")]
    Validation(String),
}
