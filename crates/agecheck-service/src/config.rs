//! Service configuration.
//!
//! Configuration is a JSON file layered under `AGE_SERVICE_*` environment
//! overrides. Nested keys use `__`, e.g.
//! `AGE_SERVICE_MODEL_METADATA__VERSION=1.1.0`.

use std::path::{Path, PathBuf};

use agecheck_models::ModelSummary;
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::error::{ConfigError, ConfigResult};

/// Default configuration location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/age_service.json";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "AGE_SERVICE_CONFIG";

const ENV_PREFIX: &str = "AGE_SERVICE";

const UNKNOWN: &str = "unknown";

/// Descriptive metadata about the deployed age model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    /// Mean absolute error on the calibration set, in years
    #[validate(range(min = 0.0))]
    pub mean_absolute_error: f64,
    pub calibration_date: String,
    pub fairness_warnings: Vec<String>,
    pub limitations: Vec<String>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
            mean_absolute_error: 0.0,
            calibration_date: UNKNOWN.to_string(),
            fairness_warnings: Vec::new(),
            limitations: Vec::new(),
        }
    }
}

impl ModelMetadata {
    /// Identity block reported in responses.
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.name.clone(),
            version: self.version.clone(),
            mean_absolute_error: self.mean_absolute_error,
            calibration_date: self.calibration_date.clone(),
        }
    }
}

/// Age service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceConfig {
    /// Minimum accepted length of the shorter image edge, in pixels
    #[validate(range(min = 1))]
    pub min_image_edge: u32,
    /// Detector selected when the caller does not inject one
    #[validate(length(min = 1))]
    pub detector_name: String,
    #[validate(nested)]
    pub model_metadata: ModelMetadata,
    /// Confidence level used when the request omits one
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub default_confidence_level: f64,
    /// Whether to echo the face box when the request does not say
    pub return_face_bbox_default: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_image_edge: 128,
            detector_name: "simple".to_string(),
            model_metadata: ModelMetadata::default(),
            default_confidence_level: 0.9,
            return_face_bbox_default: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `path`, `$AGE_SERVICE_CONFIG`, or
    /// [`DEFAULT_CONFIG_PATH`], in that order of preference.
    ///
    /// A missing file is an error; there is no built-in fallback.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let path = resolve_config_path(path);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        debug!(path = %path.display(), "Loading configuration");

        let settings = config::Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Json))
            .add_source(env_overrides())
            .build()?;

        let config = Self::finish(settings)?;
        info!(
            path = %path.display(),
            detector = %config.detector_name,
            model = %config.model_metadata.name,
            min_image_edge = config.min_image_edge,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from a JSON document, without environment
    /// overrides.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> ConfigResult<Self> {
        let config: ServiceConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Resolve which file [`ServiceConfig::load`] reads.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    match path {
        Some(path) => path.to_path_buf(),
        None => std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
    }
}
