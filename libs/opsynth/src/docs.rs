//! Documentation context shared by every builder of one application.
//!
//! # Flow
//! 1. **Registration**: builders call `decorate(&docs, path)`; schemas land in the
//!    registry and operations in the route table.
//! 2. **Freeze**: [`ApiDocs::freeze`] consumes the context.
//! 3. **Generation**: [`FrozenDocs::to_openapi_json`] assembles the OpenAPI document.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::openapi::{RefOr, schema::Schema};

use crate::config::{OpSynthConfig, OpenApiInfo};
use crate::paths::{FrozenPaths, PathsManager};
use crate::registry::{SchemaRegistry, SchemaRegistryImpl};
use crate::security::Securities;

/// OpenAPI version of assembled documents
pub const OPENAPI_VERSION: &str = "3.0.3";

/// Configuration, schema registry and route table of the registration phase.
pub struct ApiDocs {
    config: OpSynthConfig,
    registry: Arc<dyn SchemaRegistry>,
    paths: PathsManager,
}

impl ApiDocs {
    #[must_use]
    pub fn new(config: OpSynthConfig) -> Self {
        Self::with_registry(config, Arc::new(SchemaRegistryImpl::new()))
    }

    /// Use a caller-provided schema registry.
    #[must_use]
    pub fn with_registry(config: OpSynthConfig, registry: Arc<dyn SchemaRegistry>) -> Self {
        let paths = PathsManager::new(config.on_duplicate_route);
        Self {
            config,
            registry,
            paths,
        }
    }

    #[must_use]
    pub fn config(&self) -> &OpSynthConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &dyn SchemaRegistry {
        self.registry.as_ref()
    }

    #[must_use]
    pub fn paths(&self) -> &PathsManager {
        &self.paths
    }

    /// End the registration phase and snapshot the registered components.
    #[must_use]
    pub fn freeze(self) -> FrozenDocs {
        let components = self.registry.components();
        FrozenDocs {
            info: self.config.info,
            paths: self.paths.freeze(),
            components,
        }
    }
}

impl Default for ApiDocs {
    fn default() -> Self {
        Self::new(OpSynthConfig::default())
    }
}

/// Read-only result of the registration phase.
#[derive(Clone, Debug)]
pub struct FrozenDocs {
    info: OpenApiInfo,
    paths: FrozenPaths,
    components: BTreeMap<String, RefOr<Schema>>,
}

impl FrozenDocs {
    #[must_use]
    pub fn info(&self) -> &OpenApiInfo {
        &self.info
    }

    #[must_use]
    pub fn paths(&self) -> &FrozenPaths {
        &self.paths
    }

    /// Component schemas, ordered by name
    #[must_use]
    pub fn components(&self) -> &BTreeMap<String, RefOr<Schema>> {
        &self.components
    }

    /// Assemble the complete OpenAPI document.
    ///
    /// # Errors
    /// Returns an error if an operation or component schema fails to serialize.
    pub fn to_openapi_json(&self) -> Result<Value, serde_json::Error> {
        let mut schemas = Map::new();
        for (name, schema) in &self.components {
            schemas.insert(name.clone(), serde_json::to_value(schema)?);
        }

        let security_schemes: Map<String, Value> =
            Securities::security_schemes().into_iter().collect();
        let info = serde_json::to_value(&self.info)?;
        let paths = self.paths.to_paths_json()?;

        Ok(json!({
            "openapi": OPENAPI_VERSION,
            "info": info,
            "paths": paths,
            "components": {
                "schemas": schemas,
                "securitySchemes": security_schemes,
            },
        }))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let docs = ApiDocs::default().freeze();
        assert!(docs.paths().is_empty());
        assert!(docs.components().is_empty());

        let json = docs.to_openapi_json().unwrap();
        assert_eq!(json["openapi"], "3.0.3");
        assert_eq!(json["info"]["title"], "API Documentation");
        assert_eq!(json["info"]["version"], "0.1.0");
        assert_eq!(json["paths"], json!({}));
        assert_eq!(
            json["components"]["securitySchemes"]["access_token"],
            json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" })
        );
        assert!(json["components"]["securitySchemes"]["refresh_token"].is_object());
    }

    #[test]
    fn test_paths_policy_follows_config() {
        let config = OpSynthConfig {
            on_duplicate_route: crate::paths::DuplicateRoutePolicy::Reject,
            ..OpSynthConfig::default()
        };
        let docs = ApiDocs::new(config);
        assert_eq!(
            docs.config().on_duplicate_route,
            crate::paths::DuplicateRoutePolicy::Reject
        );
        assert!(docs.paths().is_empty());
    }
}
