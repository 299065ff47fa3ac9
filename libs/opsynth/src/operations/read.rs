//! Read (`GET` single resource) operations.

use super::{OperationDecorator, Verb, VerbContext, helpers, sealed};
use crate::document::{RequestBody, Response};
use crate::paths::HttpVerb;
use crate::schema::{ApiSchema, SchemaClass};

/// Marker for single-resource read operations
#[derive(Clone, Copy, Debug)]
pub struct Read;

impl sealed::Sealed for Read {}

impl Verb for Read {
    const IS_COLLECTION: bool = false;
    const WITH_ID_IN_PATH: bool = true;

    fn success_responses(ctx: &VerbContext<'_>) -> Vec<(u16, Response)> {
        vec![(
            200,
            helpers::json_response(helpers::OK_DESCRIPTION, ctx.response, ctx.media_type),
        )]
    }

    fn request_body(_ctx: &VerbContext<'_>) -> Option<RequestBody> {
        None
    }

    fn keep_id_parameter(ctx: &VerbContext<'_>) -> bool {
        ctx.request.options.url_id_field.is_some()
    }
}

/// Document a `GET` handler returning one `T`.
pub fn get<T: ApiSchema>() -> OperationDecorator<Read> {
    get_class(SchemaClass::of::<T>())
}

pub fn get_class(request_schema: SchemaClass) -> OperationDecorator<Read> {
    OperationDecorator::new(HttpVerb::Get, request_schema)
}
