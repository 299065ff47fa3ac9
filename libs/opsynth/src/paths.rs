//! Path/route manager: the route table that accumulates operation fragments.
//!
//! # Lifecycle
//! 1. **Registration**: builders call [`PathsManager::decorate`] for every annotated
//!    handler; fragments are recorded under their [`RouteKey`].
//! 2. **Freeze**: [`PathsManager::freeze`] consumes the manager into a read-only
//!    [`FrozenPaths`]; nothing can be decorated after that point.
//! 3. **Assembly**: [`FrozenPaths::to_paths_json`] renders the OpenAPI `paths` object.

use dashmap::DashMap;
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::document::OperationDocument;
use crate::error::DocsError;

/// HTTP verbs the builders emit
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// Lowercase name, as used for path item keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpVerb> for http::Method {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => Self::GET,
            HttpVerb::Post => Self::POST,
            HttpVerb::Put => Self::PUT,
            HttpVerb::Patch => Self::PATCH,
            HttpVerb::Delete => Self::DELETE,
        }
    }
}

/// What to do when a route key is decorated twice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateRoutePolicy {
    /// Last decoration wins; a warning is logged.
    #[default]
    Overwrite,
    /// Keep the first decoration and fail the second one.
    Reject,
}

/// Unit of aggregation in the route table
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    pub path: String,
    pub verb: HttpVerb,
}

impl RouteKey {
    /// Build a key, normalizing the path.
    #[must_use]
    pub fn new(verb: HttpVerb, path: &str) -> Self {
        Self {
            path: normalize_path(path),
            verb,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.path)
    }
}

/// Normalize a route path to its OpenAPI form.
///
/// Adds a leading slash, collapses repeated slashes, trims the trailing slash, and
/// rewrites `{*rest}` and `:id` placeholders to `{rest}` and `{id}`.
///
/// ```
/// # use opsynth::paths::normalize_path;
/// assert_eq!(normalize_path("books//{id}/"), "/books/{id}");
/// assert_eq!(normalize_path("/static/{*path}"), "/static/{path}");
/// assert_eq!(normalize_path("/books/:id"), "/books/{id}");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{name}}}"),
            _ => s.replace("{*", "{"),
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// Derive an operation id from the verb and the registry name of a schema.
///
/// The trailing `Schema` suffix is dropped and the rest is snake-cased:
/// `(post, false, "BookSchema")` → `create_book`, `(get, true, "BookSchema")` →
/// `list_book`. Non-GET collection operations get a `_collection` suffix.
#[must_use]
pub fn generate_operation_id(verb: HttpVerb, is_collection: bool, schema_name: &str) -> String {
    let prefix = match (verb, is_collection) {
        (HttpVerb::Get, false) => "get",
        (HttpVerb::Get, true) => "list",
        (HttpVerb::Post, _) => "create",
        (HttpVerb::Put, _) => "update",
        (HttpVerb::Patch, _) => "patch",
        (HttpVerb::Delete, _) => "delete",
    };
    let resource = match schema_name.strip_suffix("Schema") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => schema_name,
    };
    let suffix = if is_collection && verb != HttpVerb::Get {
        "_collection"
    } else {
        ""
    };
    format!("{prefix}_{}{suffix}", resource.to_snake_case())
}

/// Operation documents of one route, keyed by verb
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OpenApiFragment(BTreeMap<HttpVerb, OperationDocument>);

impl OpenApiFragment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding a single operation
    #[must_use]
    pub fn single(verb: HttpVerb, doc: OperationDocument) -> Self {
        Self(BTreeMap::from([(verb, doc)]))
    }

    #[must_use]
    pub fn with(mut self, verb: HttpVerb, doc: OperationDocument) -> Self {
        self.0.insert(verb, doc);
        self
    }

    #[must_use]
    pub fn get(&self, verb: HttpVerb) -> Option<&OperationDocument> {
        self.0.get(&verb)
    }

    pub fn verbs(&self) -> impl Iterator<Item = HttpVerb> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HttpVerb, &OperationDocument)> {
        self.0.iter().map(|(verb, doc)| (*verb, doc))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Route table filled during registration.
pub struct PathsManager {
    operations: DashMap<RouteKey, OperationDocument>,
    policy: DuplicateRoutePolicy,
}

impl PathsManager {
    #[must_use]
    pub fn new(policy: DuplicateRoutePolicy) -> Self {
        Self {
            operations: DashMap::new(),
            policy,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.operations.contains_key(key)
    }

    /// The attachment hook: record `open_api_data` for `path` and return the decorator
    /// that binds it to a handler.
    ///
    /// # Errors
    /// Returns `DocsError::DuplicateRoute` when a verb of the fragment is already
    /// registered for this path and the policy is [`DuplicateRoutePolicy::Reject`].
    /// Nothing from the fragment is recorded in that case.
    pub fn decorate(
        &self,
        path: &str,
        open_api_data: OpenApiFragment,
    ) -> Result<RouteDecorator, DocsError> {
        let normalized = normalize_path(path);

        if self.policy == DuplicateRoutePolicy::Reject {
            if let Some(verb) = open_api_data.verbs().find(|verb| {
                self.operations.contains_key(&RouteKey {
                    path: normalized.clone(),
                    verb: *verb,
                })
            }) {
                return Err(DocsError::DuplicateRoute {
                    verb,
                    path: normalized,
                });
            }
        }

        for (verb, doc) in open_api_data.iter() {
            let key = RouteKey {
                path: normalized.clone(),
                verb,
            };
            let operation_id = doc.operation_id.clone().unwrap_or_default();
            if self.operations.insert(key.clone(), doc.clone()).is_some() {
                tracing::warn!(
                    method = %verb,
                    path = %key.path,
                    operation_id = %operation_id,
                    "Route decorated twice; keeping the latest operation"
                );
            }
            tracing::debug!(
                method = %verb,
                path = %key.path,
                operation_id = %operation_id,
                summary = %doc.summary.as_deref().unwrap_or("No summary"),
                "Registered API operation in route table"
            );
        }

        Ok(RouteDecorator {
            route_path: path.to_owned(),
            path: normalized,
            fragment: Arc::new(open_api_data),
        })
    }

    /// End the registration phase.
    #[must_use]
    pub fn freeze(self) -> FrozenPaths {
        let operations: BTreeMap<RouteKey, OperationDocument> =
            self.operations.into_iter().collect();
        tracing::info!(
            "Freezing route table: {} registered operations",
            operations.len()
        );
        FrozenPaths { operations }
    }
}

impl Default for PathsManager {
    fn default() -> Self {
        Self::new(DuplicateRoutePolicy::default())
    }
}

/// Result of the attachment hook; binds the recorded fragment to a handler.
#[derive(Clone, Debug)]
#[must_use]
pub struct RouteDecorator {
    route_path: String,
    path: String,
    fragment: Arc<OpenApiFragment>,
}

impl RouteDecorator {
    /// Normalized OpenAPI path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn open_api_data(&self) -> &OpenApiFragment {
        &self.fragment
    }

    /// Attach the fragment to a route handler.
    #[must_use]
    pub fn wrap<H>(self, handler: H) -> Decorated<H> {
        Decorated {
            handler,
            route_path: self.route_path,
            path: self.path,
            fragment: self.fragment,
        }
    }
}

/// A route handler carrying its operation fragment.
#[derive(Clone, Debug)]
pub struct Decorated<H> {
    handler: H,
    route_path: String,
    path: String,
    fragment: Arc<OpenApiFragment>,
}

impl<H> Decorated<H> {
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Path as given by the caller, in router syntax
    #[must_use]
    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    /// Normalized OpenAPI path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn open_api_data(&self) -> &OpenApiFragment {
        &self.fragment
    }

    #[must_use]
    pub fn into_handler(self) -> H {
        self.handler
    }
}

#[cfg(feature = "axum")]
impl<H> Decorated<H> {
    /// Route the handler for every verb of its fragment.
    #[must_use]
    pub fn register<T, S>(self, router: axum::Router<S>) -> axum::Router<S>
    where
        H: axum::handler::Handler<T, S> + Clone + Send + Sync + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        use axum::routing::{MethodFilter, MethodRouter};

        let mut method_router = MethodRouter::new();
        for verb in self.fragment.verbs() {
            let Ok(filter) = MethodFilter::try_from(http::Method::from(verb)) else {
                tracing::warn!(method = %verb, path = %self.path, "No router filter for method");
                continue;
            };
            method_router = method_router.on(filter, self.handler.clone());
        }
        router.route(&self.route_path, method_router)
    }
}

/// Read-only route table, ordered by path then verb.
#[derive(Clone, Debug, Default)]
pub struct FrozenPaths {
    operations: BTreeMap<RouteKey, OperationDocument>,
}

impl FrozenPaths {
    #[must_use]
    pub fn get(&self, verb: HttpVerb, path: &str) -> Option<&OperationDocument> {
        self.operations.get(&RouteKey::new(verb, path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, &OperationDocument)> {
        self.operations.iter()
    }

    /// Render the OpenAPI `paths` object.
    ///
    /// # Errors
    /// Returns an error if a document holds a value that fails to serialize.
    pub fn to_paths_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut paths = serde_json::Map::new();
        for (key, doc) in &self.operations {
            let item = paths
                .entry(key.path.clone())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if let Some(obj) = item.as_object_mut() {
                obj.insert(key.verb.as_str().to_owned(), doc.to_json()?);
            }
        }
        Ok(serde_json::Value::Object(paths))
    }
}
