//! Delete (`DELETE`) operations.

use super::{OperationDecorator, Verb, VerbContext, helpers, sealed};
use crate::document::{RequestBody, Response};
use crate::paths::HttpVerb;
use crate::schema::{ApiSchema, SchemaClass};

/// Marker for delete operations
#[derive(Clone, Copy, Debug)]
pub struct Delete;

impl sealed::Sealed for Delete {}

impl Verb for Delete {
    const IS_COLLECTION: bool = false;
    const WITH_ID_IN_PATH: bool = true;

    /// `200` with a body only when a non-deletion response schema was set explicitly.
    fn success_responses(ctx: &VerbContext<'_>) -> Vec<(u16, Response)> {
        if ctx.response_overridden && !ctx.response.kind.is_deletion() {
            vec![(
                200,
                helpers::json_response(helpers::OK_DESCRIPTION, ctx.response, ctx.media_type),
            )]
        } else {
            vec![(204, Response::description(helpers::DELETED_DESCRIPTION))]
        }
    }

    fn request_body(_ctx: &VerbContext<'_>) -> Option<RequestBody> {
        None
    }

    fn keep_id_parameter(_ctx: &VerbContext<'_>) -> bool {
        true
    }
}

/// Document a `DELETE` handler for resources described by `T`.
pub fn delete<T: ApiSchema>() -> OperationDecorator<Delete> {
    delete_class(SchemaClass::of::<T>())
}

pub fn delete_class(request_schema: SchemaClass) -> OperationDecorator<Delete> {
    OperationDecorator::new(HttpVerb::Delete, request_schema)
}
