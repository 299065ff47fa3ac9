//! List (`GET` collection) operations.

use serde_json::json;

use super::{OperationDecorator, Verb, VerbContext, helpers, sealed};
use crate::config::ListEnvelope;
use crate::document::{Parameter, RequestBody, Response, SchemaRef};
use crate::paths::HttpVerb;
use crate::schema::{ApiSchema, SchemaClass};

/// Marker for collection read operations
#[derive(Clone, Copy, Debug)]
pub struct List;

impl sealed::Sealed for List {}

fn envelope_schema(envelope: ListEnvelope, reference: &str) -> serde_json::Value {
    let items = json!({ "type": "array", "items": { "$ref": reference } });
    match envelope {
        ListEnvelope::Array => items,
        ListEnvelope::Paginated => json!({
            "type": "object",
            "required": ["items", "total"],
            "properties": {
                "items": items,
                "total": { "type": "integer" },
                "limit": { "type": "integer" },
                "offset": { "type": "integer" }
            }
        }),
    }
}

impl Verb for List {
    const IS_COLLECTION: bool = true;
    const WITH_ID_IN_PATH: bool = false;

    fn success_responses(ctx: &VerbContext<'_>) -> Vec<(u16, Response)> {
        let schema = envelope_schema(ctx.envelope, &ctx.response.reference);
        vec![(
            200,
            Response::with_schema(
                helpers::OK_DESCRIPTION,
                ctx.media_type,
                SchemaRef::Inline(schema),
            ),
        )]
    }

    fn request_body(_ctx: &VerbContext<'_>) -> Option<RequestBody> {
        None
    }

    fn keep_id_parameter(_ctx: &VerbContext<'_>) -> bool {
        false
    }

    fn extra_parameters(ctx: &VerbContext<'_>) -> Vec<Parameter> {
        match ctx.envelope {
            ListEnvelope::Array => Vec::new(),
            ListEnvelope::Paginated => vec![
                Parameter::query("limit")
                    .description("Maximum number of items to return")
                    .schema(json!({ "type": "integer", "minimum": 1 })),
                Parameter::query("offset")
                    .description("Number of items to skip")
                    .schema(json!({ "type": "integer", "minimum": 0 })),
            ],
        }
    }
}

impl OperationDecorator<List> {
    /// Body shape of the list response; the configured default applies when unset.
    pub fn envelope(mut self, envelope: ListEnvelope) -> Self {
        self.envelope = Some(envelope);
        self
    }
}

/// Document a `GET` handler returning a collection of `T`.
pub fn list<T: ApiSchema>() -> OperationDecorator<List> {
    list_class(SchemaClass::of::<T>())
}

pub fn list_class(request_schema: SchemaClass) -> OperationDecorator<List> {
    OperationDecorator::new(HttpVerb::Get, request_schema)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_array_envelope() {
        let schema = envelope_schema(ListEnvelope::Array, "#/components/schemas/Book");
        assert_eq!(
            schema,
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/Book" } })
        );
    }

    #[test]
    fn test_paginated_envelope_wraps_array() {
        let schema = envelope_schema(ListEnvelope::Paginated, "#/components/schemas/Book");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["items"]["type"], "array");
        assert_eq!(
            schema["properties"]["items"]["items"]["$ref"],
            "#/components/schemas/Book"
        );
        assert_eq!(schema["required"], json!(["items", "total"]));
    }
}
