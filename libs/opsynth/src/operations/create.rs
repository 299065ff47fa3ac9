//! Create (`POST`) operations.

use super::{OperationDecorator, Verb, VerbContext, helpers, sealed};
use crate::document::{RequestBody, Response};
use crate::paths::HttpVerb;
use crate::schema::{ApiSchema, SchemaClass};

/// Marker for create operations
#[derive(Clone, Copy, Debug)]
pub struct Create;

impl sealed::Sealed for Create {}

impl Verb for Create {
    const IS_COLLECTION: bool = false;
    const WITH_ID_IN_PATH: bool = true;

    fn success_responses(ctx: &VerbContext<'_>) -> Vec<(u16, Response)> {
        if ctx.response.kind.is_deletion() {
            vec![(204, Response::description(helpers::DELETED_DESCRIPTION))]
        } else {
            vec![(
                201,
                helpers::json_response(helpers::CREATED_DESCRIPTION, ctx.response, ctx.media_type),
            )]
        }
    }

    fn request_body(ctx: &VerbContext<'_>) -> Option<RequestBody> {
        Some(helpers::json_request_body(ctx.request, ctx.media_type))
    }

    /// A create endpoint has no resource id in its path, unless its request schema
    /// declares one and is not a `Create*` schema (nested under a parent id).
    fn keep_id_parameter(ctx: &VerbContext<'_>) -> bool {
        ctx.request.options.url_id_field.is_some() && !ctx.request.kind.is_creation()
    }
}

/// Document a `POST` handler taking `T` as its request body.
pub fn post<T: ApiSchema>() -> OperationDecorator<Create> {
    post_class(SchemaClass::of::<T>())
}

pub fn post_class(request_schema: SchemaClass) -> OperationDecorator<Create> {
    OperationDecorator::new(HttpVerb::Post, request_schema)
}
