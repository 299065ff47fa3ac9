//! OpenAPI Operation Object model produced by the builders.
//!
//! The types serialize with OpenAPI 3.x field names (`operationId`, `requestBody`,
//! `in`, `allowEmptyValue`...). Maps are ordered so generated documents are stable
//! across runs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::DocsError;

/// Location of a parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// OpenAPI Parameter Object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Parameter {
    /// Create a parameter with the given name and location; path parameters are required.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: location == ParameterLocation::Path,
            deprecated: None,
            allow_empty_value: None,
            schema: None,
            example: None,
        }
    }

    /// Header parameter
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Header)
    }

    /// Query parameter
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Query)
    }

    /// Path parameter (always required)
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Path)
    }

    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn allow_empty_value(mut self, allow: bool) -> Self {
        self.allow_empty_value = Some(allow);
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Whether the parameter carries a usable name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Caller input for parameters and headers: a raw JSON mapping or a structured value.
///
/// Normalized exactly once, at the builder boundary, via [`ParameterInput::normalize`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterInput {
    Raw(serde_json::Value),
    Structured(Parameter),
}

impl From<Parameter> for ParameterInput {
    fn from(p: Parameter) -> Self {
        Self::Structured(p)
    }
}

impl From<serde_json::Value> for ParameterInput {
    fn from(v: serde_json::Value) -> Self {
        Self::Raw(v)
    }
}

impl ParameterInput {
    /// Convert into the canonical `Parameter`.
    ///
    /// `forced_location` overrides whatever location the caller gave; a raw mapping may
    /// then omit `in`. Path parameters always come out as required.
    ///
    /// # Errors
    /// Returns `DocsError::InvalidParameter` naming `field` and the entry `index` when a
    /// raw mapping cannot be deserialized (missing `name`/`in`, wrong types, not an object).
    pub fn normalize(
        self,
        field: &'static str,
        index: usize,
        forced_location: Option<ParameterLocation>,
    ) -> Result<Parameter, DocsError> {
        let mut param = match self {
            Self::Structured(p) => p,
            Self::Raw(mut raw) => {
                if let (Some(location), Some(obj)) = (forced_location, raw.as_object_mut()) {
                    obj.insert("in".to_owned(), serde_json::to_value(location).map_err(
                        |source| DocsError::InvalidParameter {
                            field,
                            index,
                            source,
                        },
                    )?);
                }
                serde_json::from_value(raw).map_err(|source| DocsError::InvalidParameter {
                    field,
                    index,
                    source,
                })?
            }
        };
        if let Some(location) = forced_location {
            param.location = location;
        }
        if param.location == ParameterLocation::Path {
            param.required = true;
        }
        Ok(param)
    }
}

/// Schema reference or inline schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline(serde_json::Value),
}

impl SchemaRef {
    #[must_use]
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::Ref {
            reference: reference.into(),
        }
    }
}

/// Media type entry of a `content` map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: SchemaRef,
}

/// OpenAPI Request Body Object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: BTreeMap<String, MediaType>,
    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    /// Required body with a single media type.
    #[must_use]
    pub fn with_schema(media_type: impl Into<String>, schema: SchemaRef) -> Self {
        Self {
            description: None,
            content: BTreeMap::from([(media_type.into(), MediaType { schema })]),
            required: true,
        }
    }
}

/// OpenAPI Response Object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

impl Response {
    /// Response without a body
    #[must_use]
    pub fn description(text: impl Into<String>) -> Self {
        Self {
            description: text.into(),
            content: None,
        }
    }

    /// Response with a single media type body
    #[must_use]
    pub fn with_schema(
        text: impl Into<String>,
        media_type: impl Into<String>,
        schema: SchemaRef,
    ) -> Self {
        Self {
            description: text.into(),
            content: Some(BTreeMap::from([(media_type.into(), MediaType { schema })])),
        }
    }
}

/// OpenAPI Security Requirement Object: scheme name to required scopes
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityRequirement(pub BTreeMap<String, Vec<String>>);

impl SecurityRequirement {
    /// Requirement on a single scheme with no scopes.
    #[must_use]
    pub fn new(scheme: impl Into<String>) -> Self {
        Self(BTreeMap::from([(scheme.into(), Vec::new())]))
    }
}

/// OpenAPI Operation Object under construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, Response>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl OperationDocument {
    /// Whether at least one `2xx` response is declared.
    #[must_use]
    pub fn has_success_response(&self) -> bool {
        self.responses.keys().any(|code| code.starts_with('2'))
    }

    /// Drop every parameter whose name is empty.
    pub fn retain_named_parameters(&mut self) {
        self.parameters.retain(Parameter::is_named);
    }

    /// Serialize into a JSON value.
    ///
    /// # Errors
    /// Returns an error if a user-supplied schema or example fails to serialize.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_serializes_openapi_names() {
        let p = Parameter::path("id").allow_empty_value(false);
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({ "name": "id", "in": "path", "required": true, "allowEmptyValue": false })
        );
    }

    #[test]
    fn test_normalize_raw_parameter() {
        let input = ParameterInput::from(json!({
            "name": "zomg",
            "in": "path",
            "required": false,
            "allowEmptyValue": false
        }));
        let p = input.normalize("additional_parameters", 0, None).unwrap();
        assert_eq!(p.name, "zomg");
        assert_eq!(p.location, ParameterLocation::Path);
        // path parameters are always required
        assert!(p.required);
        assert_eq!(p.allow_empty_value, Some(false));
    }

    #[test]
    fn test_normalize_raw_missing_in_fails() {
        let input = ParameterInput::from(json!({ "name": "q" }));
        let err = input.normalize("additional_parameters", 3, None).unwrap_err();
        match err {
            DocsError::InvalidParameter { field, index, source } => {
                assert_eq!(field, "additional_parameters");
                assert_eq!(index, 3);
                assert!(source.to_string().contains("`in`"), "{source}");
            }
            DocsError::DuplicateRoute { .. } => panic!("unexpected error kind"),
        }
    }

    #[test]
    fn test_normalize_raw_missing_name_fails() {
        let input = ParameterInput::from(json!({ "in": "query" }));
        let err = input.normalize("additional_parameters", 0, None).unwrap_err();
        assert!(err.to_string().contains("`name`"), "{err}");
    }

    #[test]
    fn test_normalize_non_object_fails() {
        let input = ParameterInput::from(json!("X-Foo"));
        assert!(input.normalize("headers", 0, Some(ParameterLocation::Header)).is_err());
    }

    #[test]
    fn test_forced_location_overrides_input() {
        let raw = ParameterInput::from(json!({ "name": "X-Foo", "in": "query" }));
        let p = raw
            .normalize("headers", 0, Some(ParameterLocation::Header))
            .unwrap();
        assert_eq!(p.location, ParameterLocation::Header);

        let structured = ParameterInput::from(Parameter::query("X-Bar"));
        let p = structured
            .normalize("headers", 1, Some(ParameterLocation::Header))
            .unwrap();
        assert_eq!(p.location, ParameterLocation::Header);
    }

    #[test]
    fn test_empty_document_omits_optional_fields() {
        let doc = OperationDocument::default();
        assert_eq!(doc.to_json().unwrap(), json!({ "parameters": [], "responses": {} }));
        assert!(!doc.has_success_response());
    }

    #[test]
    fn test_retain_named_parameters() {
        let mut doc = OperationDocument {
            parameters: vec![Parameter::path(""), Parameter::query("q"), Parameter::header("  ")],
            ..Default::default()
        };
        doc.retain_named_parameters();
        assert_eq!(doc.parameters, vec![Parameter::query("q")]);
    }
}
