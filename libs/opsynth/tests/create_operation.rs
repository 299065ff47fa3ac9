#![allow(clippy::unwrap_used, clippy::expect_used)]

use opsynth::{
    ApiDocs, ApiSchema, DocsError, HttpVerb, OpSynthConfig, Parameter, ParameterLocation,
    SchemaOptions, Securities,
};
use serde_json::json;
use std::collections::BTreeSet;

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct BookSchema {
    id: i64,
    title: String,
}

impl ApiSchema for BookSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().tags(["Books"]).url_id_field("id")
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct BookDeletedSchema {
    id: i64,
}

impl ApiSchema for BookDeletedSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().tags(["Books", "Archive"])
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct CreateReviewSchema {
    book_id: i64,
    text: String,
}

impl ApiSchema for CreateReviewSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new()
            .tags(["Reviews"])
            .url_id_field("book_id")
            .description("Review to attach to a book")
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct ReviewSchema {
    review_id: i64,
}

impl ApiSchema for ReviewSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().tags(["Reviews", "Books"])
    }
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct NoteSchema {
    text: String,
}

impl ApiSchema for NoteSchema {}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct CreateDeletedMarkerSchema {
    parent_id: i64,
}

impl ApiSchema for CreateDeletedMarkerSchema {
    fn options() -> SchemaOptions {
        SchemaOptions::new().url_id_field("parent_id")
    }
}

fn docs() -> ApiDocs {
    ApiDocs::new(OpSynthConfig::default())
}

#[test]
fn test_book_create_end_to_end() {
    let docs = docs();
    let doc = opsynth::post::<BookSchema>()
        .security(Securities::NoToken)
        .error(409, "title must be unique!")
        .build(&docs)
        .unwrap();

    assert_eq!(doc.operation_id.as_deref(), Some("create_book"));
    assert!(doc.security.is_none());
    assert_eq!(doc.tags, BTreeSet::from(["Books".to_owned()]));

    // "BookSchema" is not a creation schema, so the id path parameter is kept
    assert_eq!(doc.parameters.len(), 1);
    assert_eq!(doc.parameters[0].name, "id");
    assert_eq!(doc.parameters[0].location, ParameterLocation::Path);

    let json = doc.to_json().unwrap();
    assert!(json.get("security").is_none());
    assert_eq!(
        json["responses"],
        json!({
            "201": {
                "description": "Resource was created",
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/BookSchema" }
                    }
                }
            },
            "409": { "description": "title must be unique!" }
        })
    );
    assert_eq!(
        json["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/BookSchema"
    );
    assert_eq!(json["requestBody"]["required"], true);
    assert_eq!(
        json["parameters"],
        json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "allowEmptyValue": false,
            "schema": { "type": "string" }
        }])
    );
}

#[test]
fn test_deleted_response_schema_yields_bare_204() {
    let docs = docs();
    let doc = opsynth::post::<BookSchema>()
        .response_schema::<BookDeletedSchema>()
        .build(&docs)
        .unwrap();

    let json = doc.to_json().unwrap();
    assert_eq!(
        json["responses"],
        json!({ "204": { "description": "Resource was deleted" } })
    );
    // request body still documents the request schema
    assert_eq!(
        json["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/BookSchema"
    );
    assert_eq!(doc.operation_id.as_deref(), Some("create_book_deleted"));
}

#[test]
fn test_response_schema_defaults_to_request_schema() {
    let docs = docs();
    let doc = opsynth::post::<NoteSchema>().build(&docs).unwrap();
    let json = doc.to_json().unwrap();
    assert_eq!(
        json["responses"]["201"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/NoteSchema"
    );
    assert_eq!(doc.operation_id.as_deref(), Some("create_note"));
}

#[test]
fn test_creation_schema_drops_id_parameter() {
    let docs = docs();
    let doc = opsynth::post::<CreateReviewSchema>()
        .response_schema::<ReviewSchema>()
        .build(&docs)
        .unwrap();

    assert!(doc.parameters.is_empty());
    assert_eq!(
        doc.request_body.as_ref().unwrap().description.as_deref(),
        Some("Review to attach to a book")
    );
    assert_eq!(doc.operation_id.as_deref(), Some("create_review"));
}

#[test]
fn test_creation_and_deletion_name_drops_id_and_returns_204() {
    let docs = docs();
    let doc = opsynth::post::<CreateDeletedMarkerSchema>()
        .build(&docs)
        .unwrap();

    assert!(doc.parameters.is_empty());
    assert_eq!(
        doc.to_json().unwrap()["responses"],
        json!({ "204": { "description": "Resource was deleted" } })
    );
}

#[test]
fn test_schema_without_id_field_has_no_path_parameter() {
    let docs = docs();
    let doc = opsynth::post::<NoteSchema>().build(&docs).unwrap();
    assert!(doc.parameters.is_empty());
    assert_eq!(doc.to_json().unwrap()["parameters"], json!([]));
}

#[test]
fn test_tags_are_union_of_both_schemas() {
    let docs = docs();
    let doc = opsynth::post::<CreateReviewSchema>()
        .response_schema::<ReviewSchema>()
        .build(&docs)
        .unwrap();
    assert_eq!(
        doc.tags,
        BTreeSet::from(["Books".to_owned(), "Reviews".to_owned()])
    );
}

#[test]
fn test_errors_overwrite_success_code() {
    let docs = docs();
    let doc = opsynth::post::<BookSchema>()
        .errors([(201, "Accepted for review"), (422, "Invalid title"), (999, "Odd")])
        .build(&docs)
        .unwrap();

    assert_eq!(doc.responses["201"].description, "Accepted for review");
    assert!(doc.responses["201"].content.is_none());
    assert_eq!(doc.responses["422"].description, "Invalid title");
    assert_eq!(doc.responses["999"].description, "Odd");
}

#[test]
fn test_headers_are_forced_into_header_location() {
    let docs = docs();
    let doc = opsynth::post::<NoteSchema>()
        .header(json!({ "name": "X-Request-Id", "required": true }))
        .header(json!({ "name": "X-Tenant", "in": "query" }))
        .header(Parameter::query("X-Trace"))
        .header(json!({ "name": "" }))
        .build(&docs)
        .unwrap();

    let names: Vec<&str> = doc.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["X-Request-Id", "X-Tenant", "X-Trace"]);
    assert!(
        doc.parameters
            .iter()
            .all(|p| p.location == ParameterLocation::Header)
    );
    assert!(doc.parameters[0].required);
}

#[test]
fn test_additional_parameters_keep_their_location() {
    let docs = docs();
    let doc = opsynth::post::<BookSchema>()
        .additional_parameter(json!({ "name": "dry_run", "in": "query" }))
        .additional_parameter(Parameter::path("shelf_id"))
        .additional_parameter(json!({ "name": "  ", "in": "query" }))
        .build(&docs)
        .unwrap();

    let pairs: Vec<(&str, ParameterLocation)> = doc
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.location))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("id", ParameterLocation::Path),
            ("dry_run", ParameterLocation::Query),
            ("shelf_id", ParameterLocation::Path),
        ]
    );
    assert!(doc.parameters[2].required);
}

#[test]
fn test_invalid_additional_parameter_is_reported() {
    let docs = docs();
    let err = opsynth::post::<BookSchema>()
        .additional_parameter(Parameter::query("ok"))
        .additional_parameter(json!({ "in": "query" }))
        .build(&docs)
        .unwrap_err();
    assert!(matches!(
        err,
        DocsError::InvalidParameter {
            field: "additional_parameters",
            index: 1,
            ..
        }
    ));
    assert!(err.to_string().contains("additional_parameters"));
}

#[test]
fn test_invalid_header_is_reported() {
    let docs = docs();
    let err = opsynth::post::<BookSchema>()
        .header(json!(["not", "a", "mapping"]))
        .build(&docs)
        .unwrap_err();
    assert!(matches!(
        err,
        DocsError::InvalidParameter {
            field: "headers",
            index: 0,
            ..
        }
    ));
}

#[test]
fn test_security_requirement_per_scheme() {
    let docs = docs();

    let default = opsynth::post::<NoteSchema>().build(&docs).unwrap();
    assert_eq!(
        default.to_json().unwrap()["security"],
        json!([{ "access_token": [] }])
    );

    let refresh = opsynth::post::<NoteSchema>()
        .security(Securities::RefreshToken)
        .build(&docs)
        .unwrap();
    assert_eq!(
        refresh.to_json().unwrap()["security"],
        json!([{ "refresh_token": [] }])
    );
}

#[test]
fn test_configured_default_security_applies() {
    let docs = ApiDocs::new(OpSynthConfig {
        default_security: Securities::NoToken,
        ..OpSynthConfig::default()
    });
    let doc = opsynth::post::<NoteSchema>().build(&docs).unwrap();
    assert!(doc.security.is_none());

    let doc = opsynth::post::<NoteSchema>()
        .security(Securities::AccessToken)
        .build(&docs)
        .unwrap();
    assert!(doc.security.is_some());
}

#[test]
fn test_explicit_operation_id_summary_and_description() {
    let docs = docs();
    let doc = opsynth::post::<BookSchema>()
        .operation_id("addBook")
        .summary("Add a book")
        .description("Adds a book to the catalogue.")
        .build(&docs)
        .unwrap();
    let json = doc.to_json().unwrap();
    assert_eq!(json["operationId"], "addBook");
    assert_eq!(json["summary"], "Add a book");
    assert_eq!(json["description"], "Adds a book to the catalogue.");
}

#[test]
fn test_build_registers_both_schemas() {
    let docs = docs();
    opsynth::post::<CreateReviewSchema>()
        .response_schema::<ReviewSchema>()
        .build(&docs)
        .unwrap();
    let components = docs.registry().components();
    assert!(components.contains_key("CreateReviewSchema"));
    assert!(components.contains_key("ReviewSchema"));
}

#[test]
fn test_decorate_records_post_under_path() {
    let docs = docs();
    let decorator = opsynth::post::<BookSchema>()
        .security(Securities::NoToken)
        .decorate(&docs, "/books/")
        .unwrap();

    assert_eq!(decorator.path(), "/books");
    let fragment = decorator.open_api_data();
    assert_eq!(fragment.verbs().collect::<Vec<_>>(), vec![HttpVerb::Post]);

    let frozen = docs.freeze();
    let recorded = frozen.paths().get(HttpVerb::Post, "/books").unwrap();
    assert_eq!(recorded, fragment.get(HttpVerb::Post).unwrap());
}
