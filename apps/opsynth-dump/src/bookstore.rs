//! Sample bookstore API documented with the operation builders.

use opsynth::prelude::*;
use opsynth::OperationDecorator;
use serde_json::json;

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct AuthorSchema {
    pub name: String,
}

impl ApiSchema for AuthorSchema {}

/// A book of the catalogue
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct BookSchema {
    pub id: i64,
    pub title: String,
    pub author: AuthorSchema,
}

impl ApiSchema for BookSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().tags(["Books"]).url_id_field("id")
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct CreateBookSchema {
    pub title: String,
    pub author: AuthorSchema,
}

impl ApiSchema for CreateBookSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new()
            .tags(["Books"])
            .description("Book to add to the catalogue")
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct BookDeletedSchema {
    pub id: i64,
}

impl ApiSchema for BookDeletedSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().tags(["Books"])
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct TokenSchema {
    pub access_token: String,
}

impl ApiSchema for TokenSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().tags(["Auth"])
    }
}

fn request_id_header() -> serde_json::Value {
    json!({
        "name": "X-Request-Id",
        "description": "Correlation id echoed in the response",
        "schema": { "type": "string" }
    })
}

fn record<K: opsynth::operations::Verb>(
    docs: &ApiDocs,
    path: &str,
    decorator: &OperationDecorator<K>,
) -> Result<(), DocsError> {
    let route = decorator.decorate(docs, path)?;
    tracing::debug!(path = %route.path(), verb = %decorator.verb(), "Documented route");
    Ok(())
}

/// Document every bookstore route in `docs`.
///
/// # Errors
/// Fails if a route is documented twice while duplicates are rejected.
pub fn document(docs: &ApiDocs) -> Result<usize, DocsError> {
    record(
        docs,
        "/books",
        &opsynth::list::<BookSchema>().summary("List books"),
    )?;
    record(
        docs,
        "/books",
        &opsynth::post::<CreateBookSchema>()
            .response_schema::<BookSchema>()
            .summary("Add a book")
            .error(409, "title must be unique!")
            .header(request_id_header()),
    )?;
    record(
        docs,
        "/books/{id}",
        &opsynth::get::<BookSchema>()
            .summary("Fetch a book")
            .error(404, "Book not found")
            .security(Securities::NoToken),
    )?;
    record(
        docs,
        "/books/{id}",
        &opsynth::put::<BookSchema>()
            .summary("Replace a book")
            .error(404, "Book not found"),
    )?;
    record(
        docs,
        "/books/{id}",
        &opsynth::delete::<BookSchema>()
            .response_schema::<BookDeletedSchema>()
            .summary("Remove a book")
            .error(404, "Book not found"),
    )?;
    record(
        docs,
        "/auth/refresh",
        &opsynth::post::<TokenSchema>()
            .operation_id("refresh_access_token")
            .summary("Exchange a refresh token")
            .security(Securities::RefreshToken)
            .additional_parameter(Parameter::query("scope").description("Requested scope")),
    )?;

    Ok(docs.paths().len())
}
