#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! OpenAPI operation synthesis from declarative schema metadata.
//!
//! Route handlers are documented by a builder per HTTP verb. The builder reads the
//! options of the request and response schema classes (tags, url id field), registers
//! both schemas as components and records a complete Operation Object in the shared
//! route table of an [`ApiDocs`] context.
//!
//! ```
//! use opsynth::{ApiDocs, ApiSchema, OpSynthConfig, SchemaOptions};
//!
//! #[derive(utoipa::ToSchema)]
//! struct AuthorSchema {
//!     author_id: i64,
//!     name: String,
//! }
//!
//! impl ApiSchema for AuthorSchema {
//!     fn options() -> SchemaOptions {
//!         SchemaOptions::new().tags(["Authors"]).url_id_field("author_id")
//!     }
//! }
//!
//! let docs = ApiDocs::new(OpSynthConfig::default());
//! opsynth::get::<AuthorSchema>().decorate(&docs, "/authors/{author_id}")?;
//! opsynth::list::<AuthorSchema>().decorate(&docs, "/authors")?;
//!
//! let openapi = docs.freeze().to_openapi_json()?;
//! assert_eq!(
//!     openapi["paths"]["/authors/{author_id}"]["get"]["operationId"],
//!     "get_author"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod docs;
pub mod document;
pub mod error;
pub mod operations;
pub mod paths;
pub mod registry;
pub mod schema;
pub mod security;

pub use config::{ListEnvelope, OpSynthConfig, OpenApiInfo};
pub use docs::{ApiDocs, FrozenDocs};
pub use document::{
    OperationDocument, Parameter, ParameterInput, ParameterLocation, RequestBody, Response,
    SchemaRef,
};
pub use error::{ConfigError, DocsError};
pub use operations::{
    OperationDecorator, delete, delete_class, get, get_class, list, list_class, patch,
    patch_class, post, post_class, put, put_class,
};
pub use paths::{DuplicateRoutePolicy, HttpVerb, RouteDecorator};
pub use registry::{SchemaRegistry, SchemaRegistryImpl, schema_name, schema_ref};
pub use schema::{ApiSchema, SchemaClass, SchemaKind, SchemaOptions, classify_schema};
pub use security::Securities;

/// Common imports for documenting handlers
pub mod prelude {
    pub use crate::{
        ApiDocs, ApiSchema, DocsError, ListEnvelope, OpSynthConfig, Parameter, SchemaOptions,
        Securities,
    };
}
