//! Operation builders, one per HTTP verb.
//!
//! Every builder runs the same template (see [`OperationDecorator::build`]); the verb
//! only decides, through its [`Verb`] policy, which success responses are emitted,
//! whether a request body is attached and what happens to the id path parameter.
//!
//! ```
//! use opsynth::{ApiDocs, ApiSchema, OpSynthConfig, SchemaOptions, Securities};
//!
//! #[derive(utoipa::ToSchema)]
//! struct BookSchema {
//!     id: i64,
//!     title: String,
//! }
//!
//! impl ApiSchema for BookSchema {
//!     fn options() -> SchemaOptions {
//!         SchemaOptions::new().tags(["Books"]).url_id_field("id")
//!     }
//! }
//!
//! let docs = ApiDocs::new(OpSynthConfig::default());
//! let decorator = opsynth::post::<BookSchema>()
//!     .security(Securities::NoToken)
//!     .error(409, "title must be unique!")
//!     .decorate(&docs, "/books")?;
//! assert_eq!(decorator.path(), "/books");
//! # Ok::<(), opsynth::DocsError>(())
//! ```

pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod read;
pub mod update;

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::config::ListEnvelope;
use crate::docs::ApiDocs;
use crate::document::{
    OperationDocument, Parameter, ParameterInput, ParameterLocation, RequestBody, Response,
};
use crate::error::DocsError;
use crate::paths::{HttpVerb, OpenApiFragment, RouteDecorator, generate_operation_id};
use crate::registry::{SchemaRegistry, schema_name};
use crate::schema::{ApiSchema, SchemaClass, SchemaKind, SchemaOptions, classify_schema};
use crate::security::Securities;

pub use create::{Create, post, post_class};
pub use delete::{Delete, delete, delete_class};
pub use list::{List, list, list_class};
pub use read::{Read, get, get_class};
pub use update::{Update, patch, patch_class, put, put_class};

mod sealed {
    pub trait Sealed {}
}

/// A schema class after registry resolution
#[derive(Clone, Debug)]
pub struct ResolvedSchema {
    pub name: String,
    pub reference: String,
    pub options: SchemaOptions,
    pub kind: SchemaKind,
}

impl ResolvedSchema {
    /// Register `class` and capture its name, `$ref` and options.
    #[must_use]
    pub fn resolve(registry: &dyn SchemaRegistry, class: &SchemaClass) -> Self {
        let name = schema_name(registry, class);
        let reference = registry.schema_ref(&name);
        let kind = classify_schema(&name);
        Self {
            name,
            reference,
            options: class.options(),
            kind,
        }
    }
}

/// Inputs a verb policy decides on
#[derive(Debug)]
pub struct VerbContext<'a> {
    pub request: &'a ResolvedSchema,
    pub response: &'a ResolvedSchema,
    /// Whether the caller set a response schema explicitly.
    pub response_overridden: bool,
    pub media_type: &'a str,
    pub envelope: ListEnvelope,
}

/// Per-verb policy of the builder template.
pub trait Verb: sealed::Sealed {
    /// Whether the operation targets a collection; feeds operation id generation.
    const IS_COLLECTION: bool;

    /// Whether the baseline document carries the id path parameter.
    const WITH_ID_IN_PATH: bool;

    /// Success responses keyed by status code.
    fn success_responses(ctx: &VerbContext<'_>) -> Vec<(u16, Response)>;

    fn request_body(ctx: &VerbContext<'_>) -> Option<RequestBody>;

    /// Whether the baseline id path parameter survives.
    fn keep_id_parameter(ctx: &VerbContext<'_>) -> bool;

    /// Parameters the verb adds after the caller's additional parameters.
    fn extra_parameters(_ctx: &VerbContext<'_>) -> Vec<Parameter> {
        Vec::new()
    }
}

/// Declarative configuration of one operation.
///
/// Created through the verb factories ([`post`], [`get`], [`list`], [`put`], [`patch`],
/// [`delete`]); terminated by [`OperationDecorator::decorate`].
#[must_use]
#[derive(Clone, Debug)]
pub struct OperationDecorator<K: Verb> {
    verb: HttpVerb,
    request_schema: SchemaClass,
    response_schema: Option<SchemaClass>,
    operation_id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    errors: BTreeMap<u16, String>,
    headers: Vec<ParameterInput>,
    security: Option<Securities>,
    additional_parameters: Vec<ParameterInput>,
    envelope: Option<ListEnvelope>,
    _verb: PhantomData<K>,
}

impl<K: Verb> OperationDecorator<K> {
    fn new(verb: HttpVerb, request_schema: SchemaClass) -> Self {
        Self {
            verb,
            request_schema,
            response_schema: None,
            operation_id: None,
            summary: None,
            description: None,
            errors: BTreeMap::new(),
            headers: Vec::new(),
            security: None,
            additional_parameters: Vec::new(),
            envelope: None,
            _verb: PhantomData,
        }
    }

    #[must_use]
    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    /// Response schema; defaults to the request schema.
    pub fn response_schema<T: ApiSchema>(self) -> Self {
        self.response_schema_class(SchemaClass::of::<T>())
    }

    pub fn response_schema_class(mut self, schema: SchemaClass) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Explicit operation id; generated from the verb and response schema otherwise.
    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.summary = Some(text.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Add error responses; any status code is accepted as is.
    pub fn errors<I, D>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = (u16, D)>,
        D: Into<String>,
    {
        self.errors
            .extend(errors.into_iter().map(|(code, desc)| (code, desc.into())));
        self
    }

    pub fn error(mut self, code: u16, description: impl Into<String>) -> Self {
        self.errors.insert(code, description.into());
        self
    }

    /// Add header parameters; their location is forced to `header`.
    pub fn headers<I, P>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParameterInput>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    pub fn header(mut self, header: impl Into<ParameterInput>) -> Self {
        self.headers.push(header.into());
        self
    }

    /// Security scheme; the configured default applies when unset.
    pub fn security(mut self, security: Securities) -> Self {
        self.security = Some(security);
        self
    }

    pub fn additional_parameters<I, P>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParameterInput>,
    {
        self.additional_parameters
            .extend(parameters.into_iter().map(Into::into));
        self
    }

    pub fn additional_parameter(mut self, parameter: impl Into<ParameterInput>) -> Self {
        self.additional_parameters.push(parameter.into());
        self
    }

    /// Synthesize the operation document.
    ///
    /// Registers the request and response schemas in the registry of `docs`.
    ///
    /// # Errors
    /// Returns `DocsError::InvalidParameter` if an additional parameter or header
    /// cannot be normalized.
    pub fn build(&self, docs: &ApiDocs) -> Result<OperationDocument, DocsError> {
        let config = docs.config();
        let registry = docs.registry();

        let response_class = self.response_schema.unwrap_or(self.request_schema);
        let request = ResolvedSchema::resolve(registry, &self.request_schema);
        let response = ResolvedSchema::resolve(registry, &response_class);
        let operation_id = self.operation_id.clone().unwrap_or_else(|| {
            generate_operation_id(self.verb, K::IS_COLLECTION, &response.name)
        });

        let mut doc = helpers::initial_docs(&request.options, K::WITH_ID_IN_PATH, config);

        doc.operation_id = Some(operation_id);
        doc.security = self
            .security
            .unwrap_or(config.default_security)
            .requirements();

        let ctx = VerbContext {
            request: &request,
            response: &response,
            response_overridden: self.response_schema.is_some(),
            media_type: &config.media_type,
            envelope: self.envelope.unwrap_or(config.list_envelope),
        };

        for (status, resp) in K::success_responses(&ctx) {
            doc.responses.insert(status.to_string(), resp);
        }
        doc.request_body = K::request_body(&ctx);

        if let Some(summary) = &self.summary {
            doc.summary = Some(summary.clone());
        }
        if let Some(description) = &self.description {
            doc.description = Some(description.clone());
        }

        helpers::apply_id_parameter(&mut doc, &request.options, K::keep_id_parameter(&ctx));
        doc.parameters.extend(helpers::normalize_parameters(
            "additional_parameters",
            &self.additional_parameters,
            None,
        )?);
        doc.parameters.extend(K::extra_parameters(&ctx));
        doc.retain_named_parameters();

        doc.tags = helpers::merge_tags(&request.options, &response.options);
        helpers::update_errors(&mut doc, &self.errors);

        doc.parameters.extend(helpers::normalize_parameters(
            "headers",
            &self.headers,
            Some(ParameterLocation::Header),
        )?);
        doc.retain_named_parameters();

        Ok(doc)
    }

    /// Synthesize the document and hand it to the path manager under `(verb, path)`.
    ///
    /// # Errors
    /// Returns the errors of [`OperationDecorator::build`], and `DocsError::DuplicateRoute`
    /// when the route is taken and duplicates are rejected.
    pub fn decorate(&self, docs: &ApiDocs, path: &str) -> Result<RouteDecorator, DocsError> {
        let doc = self.build(docs)?;
        docs.paths()
            .decorate(path, OpenApiFragment::single(self.verb, doc))
    }
}
