//! Update (`PUT` / `PATCH`) operations.

use super::{OperationDecorator, Verb, VerbContext, helpers, sealed};
use crate::document::{RequestBody, Response};
use crate::paths::HttpVerb;
use crate::schema::{ApiSchema, SchemaClass};

/// Marker for update operations
#[derive(Clone, Copy, Debug)]
pub struct Update;

impl sealed::Sealed for Update {}

impl Verb for Update {
    const IS_COLLECTION: bool = false;
    const WITH_ID_IN_PATH: bool = true;

    fn success_responses(ctx: &VerbContext<'_>) -> Vec<(u16, Response)> {
        if ctx.response.kind.is_deletion() {
            vec![(204, Response::description(helpers::DELETED_DESCRIPTION))]
        } else {
            vec![(
                200,
                helpers::json_response(helpers::OK_DESCRIPTION, ctx.response, ctx.media_type),
            )]
        }
    }

    fn request_body(ctx: &VerbContext<'_>) -> Option<RequestBody> {
        Some(helpers::json_request_body(ctx.request, ctx.media_type))
    }

    // An unnamed placeholder is still removed by the name filter.
    fn keep_id_parameter(_ctx: &VerbContext<'_>) -> bool {
        true
    }
}

/// Document a `PUT` handler taking `T` as its request body.
pub fn put<T: ApiSchema>() -> OperationDecorator<Update> {
    put_class(SchemaClass::of::<T>())
}

pub fn put_class(request_schema: SchemaClass) -> OperationDecorator<Update> {
    OperationDecorator::new(HttpVerb::Put, request_schema)
}

/// Document a `PATCH` handler taking `T` as its request body.
pub fn patch<T: ApiSchema>() -> OperationDecorator<Update> {
    patch_class(SchemaClass::of::<T>())
}

pub fn patch_class(request_schema: SchemaClass) -> OperationDecorator<Update> {
    OperationDecorator::new(HttpVerb::Patch, request_schema)
}
