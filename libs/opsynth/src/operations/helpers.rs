//! Helpers shared by all verb builders.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::OpSynthConfig;
use crate::document::{
    OperationDocument, Parameter, ParameterInput, ParameterLocation, RequestBody, Response,
    SchemaRef,
};
use crate::error::DocsError;
use crate::schema::SchemaOptions;

use super::ResolvedSchema;

pub const DELETED_DESCRIPTION: &str = "Resource was deleted";
pub const CREATED_DESCRIPTION: &str = "Resource was created";
pub const OK_DESCRIPTION: &str = "Successful response";

/// Baseline document every builder starts from.
///
/// With `with_id_in_path` it holds one path parameter named after the schema's
/// `url_id_field`, or an unnamed placeholder that the name filter removes later.
#[must_use]
pub fn initial_docs(
    options: &SchemaOptions,
    with_id_in_path: bool,
    config: &OpSynthConfig,
) -> OperationDocument {
    let parameters = if with_id_in_path {
        vec![
            Parameter::path(options.url_id_field.clone().unwrap_or_default())
                .allow_empty_value(false)
                .schema(serde_json::json!({ "type": "string" })),
        ]
    } else {
        Vec::new()
    };

    OperationDocument {
        parameters,
        security: config.default_security.requirements(),
        ..Default::default()
    }
}

/// Splice caller-declared errors into `responses`; caller codes win over existing ones.
pub fn update_errors(doc: &mut OperationDocument, errors: &BTreeMap<u16, String>) {
    for (code, description) in errors {
        doc.responses
            .insert(code.to_string(), Response::description(description.clone()));
    }
}

/// Union of the declared tags of both schemas.
#[must_use]
pub fn merge_tags(request: &SchemaOptions, response: &SchemaOptions) -> BTreeSet<String> {
    request
        .tags
        .iter()
        .chain(&response.tags)
        .cloned()
        .collect()
}

/// Rename the baseline id parameter after `url_id_field`, or drop the path parameters.
pub fn apply_id_parameter(doc: &mut OperationDocument, options: &SchemaOptions, keep: bool) {
    if !keep {
        doc.parameters
            .retain(|p| p.location != ParameterLocation::Path);
        return;
    }
    if let (Some(field), Some(first)) = (&options.url_id_field, doc.parameters.first_mut()) {
        first.name.clone_from(field);
    }
}

/// Normalize caller inputs for `field`, optionally forcing their location.
///
/// # Errors
/// Returns the first entry that fails to normalize, tagged with `field` and its index.
pub fn normalize_parameters(
    field: &'static str,
    inputs: &[ParameterInput],
    forced_location: Option<ParameterLocation>,
) -> Result<Vec<Parameter>, DocsError> {
    inputs
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, input)| input.normalize(field, index, forced_location))
        .collect()
}

/// Required JSON body referencing the request schema.
#[must_use]
pub fn json_request_body(request: &ResolvedSchema, media_type: &str) -> RequestBody {
    let mut body = RequestBody::with_schema(media_type, SchemaRef::reference(&request.reference));
    body.description.clone_from(&request.options.description);
    body
}

/// Response whose body references `schema`.
#[must_use]
pub fn json_response(description: &str, schema: &ResolvedSchema, media_type: &str) -> Response {
    Response::with_schema(description, media_type, SchemaRef::reference(&schema.reference))
}
