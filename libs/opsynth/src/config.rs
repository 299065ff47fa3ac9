//! Configuration for operation synthesis.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults (`OpSynthConfig::default()`),
//! 2. an optional YAML file,
//! 3. environment variables prefixed with `OPSYNTH_`; nested keys are separated by a
//!    double underscore, e.g. `OPSYNTH_INFO__TITLE`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::paths::DuplicateRoutePolicy;
use crate::security::Securities;

/// Prefix of environment variables read by [`OpSynthConfig::load`]
pub const ENV_PREFIX: &str = "OPSYNTH_";

/// OpenAPI document metadata (title, version, description)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for OpenApiInfo {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_owned(),
            version: "0.1.0".to_owned(),
            description: None,
        }
    }
}

/// Body shape of list operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListEnvelope {
    /// Bare JSON array of items
    #[default]
    Array,
    /// Object with `items`, `total`, `limit` and `offset`
    Paginated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpSynthConfig {
    pub info: OpenApiInfo,
    /// Security applied when a builder does not set one explicitly.
    pub default_security: Securities,
    /// Media type of request and response bodies.
    pub media_type: String,
    pub on_duplicate_route: DuplicateRoutePolicy,
    pub list_envelope: ListEnvelope,
}

impl Default for OpSynthConfig {
    fn default() -> Self {
        Self {
            info: OpenApiInfo::default(),
            default_security: Securities::AccessToken,
            media_type: "application/json".to_owned(),
            on_duplicate_route: DuplicateRoutePolicy::Overwrite,
            list_envelope: ListEnvelope::Array,
        }
    }
}

impl OpSynthConfig {
    /// Load defaults, then the optional YAML file, then `OPSYNTH_*` variables.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if the file is unreadable or a value has the wrong shape.
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Extract the configuration from a caller-assembled figment.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        tracing::debug!(
            title = %config.info.title,
            default_security = ?config.default_security,
            on_duplicate_route = ?config.on_duplicate_route,
            "Loaded opsynth configuration"
        );
        Ok(config)
    }
}
