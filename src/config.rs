//! Configuration module

use std::env;
use std::path::PathBuf;

/// Default location of the serialized model bundle
pub const DEFAULT_MODEL_PATH: &str = "model/breast_cancer_model.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the model bundle artifact
    pub model_path: PathBuf,

    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Debug serving mode (verbose, human-readable logs)
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            host: lookup("HOST").unwrap_or(defaults.host),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            debug: lookup("APP_DEBUG")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.debug),
        }
    }

    /// File name of the model artifact, as shown to clients
    pub fn model_file_name(&self) -> String {
        self.model_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.model_path.display().to_string())
    }

    /// Default log filter for the selected serving mode
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "tumor_classifier=debug,tower_http=debug"
        } else {
            "tumor_classifier=info,tower_http=info"
        }
    }
}
