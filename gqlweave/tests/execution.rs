//! Integration tests for request execution
//!
//! Schema under test:
//! - `Book`: `id: ID!`, `title: String!`, `rating: Int`
//! - `Query.book(id: ID!)` looks a book up in a fixed catalog
//! - `Query.drafts: [Book]` returns a draft whose title is missing
//! - `Query.headline: String!` always resolves to null

mod common;

use gqlweave::{id_arg, AssembledSchema, BuildConfig, FieldType, PathSegment, Request, SchemaBuilder};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};

use common::{execute, init_logging};

fn catalog() -> JsonValue {
    json!([
        { "id": "1", "title": "Dune", "rating": 5 },
        { "id": "2", "title": "Emma", "rating": 4 }
    ])
}

fn library() -> AssembledSchema {
    init_logging();
    let mut builder = SchemaBuilder::new(BuildConfig::default());
    builder
        .object_type("Book", |t| {
            t.field("id", FieldType::named("ID").non_null());
            t.field("title", FieldType::named("String").non_null());
            t.int("rating");
        })
        .query_field("book", "Book", |f| {
            f.arg("id", id_arg().non_null()).resolve(|_, args, _| {
                let id = args["id"].as_str().unwrap_or_default();
                Ok(catalog()
                    .as_array()
                    .and_then(|books| books.iter().find(|book| book["id"] == id))
                    .cloned()
                    .unwrap_or(JsonValue::Null))
            });
        })
        .query_field("drafts", FieldType::named("Book").list(), |f| {
            f.resolve(|_, _, _| {
                Ok(json!([
                    { "id": "3", "title": "Untitled" },
                    { "id": "4", "title": null }
                ]))
            });
        })
        .query_field("headline", FieldType::named("String").non_null(), |f| {
            f.resolve(|_, _, _| Ok(JsonValue::Null));
        });
    builder.build().expect("library schema should build")
}

#[test]
fn test_variables_select_the_named_operation() {
    let schema = library();
    let query = r#"
        query First { book(id: "1") { title } }
        query Second($id: ID!) { book(id: $id) { id title } }
    "#;

    let response = schema.executable().execute(
        Request::new(query)
            .operation_name("Second")
            .variables(json!({ "id": 2 })),
    );
    assert!(response.is_ok(), "unexpected errors: {:?}", response.errors);
    assert_eq!(response.data, json!({ "book": { "id": "2", "title": "Emma" } }));

    let (data, errors) = execute(schema.executable(), query);
    assert_eq!(data, JsonValue::Null);
    assert_eq!(
        errors,
        vec!["Operation name is required when the document contains several operations"]
    );
}

#[test]
fn test_missing_required_variable_is_a_request_error() {
    let schema = library();
    let (data, errors) = execute(
        schema.executable(),
        "query($id: ID!) { book(id: $id) { title } }",
    );
    assert_eq!(data, JsonValue::Null);
    assert_eq!(errors, vec!["Variable '$id' of required type 'ID!' was not provided"]);
}

#[test]
fn test_unknown_field_rejects_the_whole_request() {
    let schema = library();
    let (data, errors) = execute(
        schema.executable(),
        r#"{ book(id: "1") { title author } }"#,
    );
    assert_eq!(data, JsonValue::Null);
    assert_eq!(errors, vec!["Cannot query field 'author' on type 'Book'"]);
}

#[test]
fn test_null_in_list_item_nulls_only_that_item() {
    let schema = library();
    let response = schema.executable().execute("{ drafts { id title } }");

    assert_eq!(
        response.data,
        json!({ "drafts": [{ "id": "3", "title": "Untitled" }, null] })
    );
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].message,
        "Cannot return null for non-nullable field"
    );
    assert_eq!(
        response.errors[0].path,
        vec![
            PathSegment::Field("drafts".to_string()),
            PathSegment::Index(1),
            PathSegment::Field("title".to_string()),
        ]
    );
}

#[test]
fn test_null_root_field_nulls_the_data() {
    let schema = library();
    let response = schema
        .executable()
        .execute(r#"{ book(id: "1") { id } headline }"#);

    assert_eq!(response.data, JsonValue::Null);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].path,
        vec![PathSegment::Field("headline".to_string())]
    );
}

#[test]
fn test_directives_and_fragments_shape_the_selection() {
    let schema = library();
    let query = r#"
        query($brief: Boolean!) {
            book(id: "1") {
                ...Basics
                rating @skip(if: $brief)
                title @include(if: false)
            }
        }
        fragment Basics on Book { id }
    "#;

    let brief = schema
        .executable()
        .execute(Request::new(query).variables(json!({ "brief": true })));
    assert!(brief.is_ok(), "unexpected errors: {:?}", brief.errors);
    assert_eq!(brief.data, json!({ "book": { "id": "1" } }));

    let full = schema
        .executable()
        .execute(Request::new(query).variables(json!({ "brief": false })));
    assert_eq!(full.data, json!({ "book": { "id": "1", "rating": 5 } }));
}

#[test]
fn test_unknown_fragment_is_a_request_error() {
    let schema = library();
    let (data, errors) = execute(schema.executable(), r#"{ book(id: "1") { ...Missing } }"#);
    assert_eq!(data, JsonValue::Null);
    assert_eq!(errors, vec!["Unknown fragment 'Missing'"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_schema_is_shared_across_threads() {
    let schema = library().into_executable();
    let ids = [1, 2, 1, 2, 1, 2, 1, 2];

    let tasks: Vec<_> = ids
        .iter()
        .map(|&id| {
            let schema = schema.clone();
            tokio::task::spawn_blocking(move || {
                schema.execute(
                    Request::new("query($id: ID!) { book(id: $id) { id } }")
                        .variables(json!({ "id": id })),
                )
            })
        })
        .collect();

    for (task, id) in tasks.into_iter().zip(ids) {
        let response = task.await.expect("execution task should finish");
        assert!(response.is_ok(), "unexpected errors: {:?}", response.errors);
        assert_eq!(response.data, json!({ "book": { "id": id.to_string() } }));
    }
}
