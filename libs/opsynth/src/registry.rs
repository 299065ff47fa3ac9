//! Schema registry: canonical component names and `$ref` pointers.
//!
//! Builders never compute names or refs themselves; they go through
//! [`schema_name`] and [`schema_ref`], which register the class (and every schema it
//! references) in the registry as a side effect. The resulting components are later
//! emitted under `#/components/schemas`.

use arc_swap::ArcSwap;
use std::collections::{BTreeMap, HashMap};
use utoipa::openapi::{RefOr, schema::Schema};

use crate::schema::{SchemaClass, SchemaCollection};

/// Prefix of component schema references
pub const COMPONENTS_SCHEMAS_REF: &str = "#/components/schemas/";

/// Contract of the schema registry consumed by the builders.
pub trait SchemaRegistry: Send + Sync {
    /// Ensure the schemas are registered under components and return the canonical
    /// component name of the root schema `name`.
    fn ensure_schema_raw(&self, name: &str, schemas: SchemaCollection) -> String;

    /// `$ref` pointer for a canonical component name.
    fn schema_ref(&self, name: &str) -> String {
        format!("{COMPONENTS_SCHEMAS_REF}{name}")
    }

    /// Snapshot of registered components, ordered by name.
    fn components(&self) -> BTreeMap<String, RefOr<Schema>>;
}

/// Resolve the stable document name of a schema class, registering it.
#[must_use]
pub fn schema_name(registry: &dyn SchemaRegistry, schema: &SchemaClass) -> String {
    registry.ensure_schema_raw(&schema.type_name(), schema.collect())
}

/// Resolve the `$ref` pointer of a schema class, registering it.
#[must_use]
pub fn schema_ref(registry: &dyn SchemaRegistry, schema: &SchemaClass) -> String {
    let name = schema_name(registry, schema);
    registry.schema_ref(&name)
}

/// Default registry keyed by `utoipa` schema names.
///
/// Components live behind an `ArcSwap` so reads never block; writes copy the map
/// through `rcu`, so concurrent registrations are not lost.
pub struct SchemaRegistryImpl {
    components_registry: ArcSwap<HashMap<String, RefOr<Schema>>>,
}

impl SchemaRegistryImpl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            components_registry: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components_registry.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components_registry.load().contains_key(name)
    }
}

impl Default for SchemaRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry for SchemaRegistryImpl {
    fn ensure_schema_raw(&self, root_name: &str, schemas: SchemaCollection) -> String {
        // Copy-on-write; rcu reruns the closure if another writer swapped the map first
        self.components_registry.rcu(|current| {
            let mut reg = (**current).clone();
            for (name, schema) in &schemas {
                // Conflict policy: identical → no-op; different → warn & override
                if let Some(existing) = reg.get(name) {
                    let a = serde_json::to_value(existing).ok();
                    let b = serde_json::to_value(schema).ok();
                    if a == b {
                        continue;
                    }
                    tracing::warn!(%name, "Schema content conflict; overriding with latest");
                }
                reg.insert(name.clone(), schema.clone());
            }
            reg
        });
        root_name.to_owned()
    }

    fn components(&self) -> BTreeMap<String, RefOr<Schema>> {
        self.components_registry
            .load()
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect()
    }
}
