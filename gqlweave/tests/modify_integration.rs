//! Integration tests for partial field overrides with `modify`
//!
//! Schema under test:
//! - `Node` interface: `id` (resolver always fails with "Abstract") and
//!   `subNode: Node`, resolved by `__typename`
//! - `User` modifies `id` (description + resolver) and redeclares `subNode: User`
//! - `Throws` inherits everything unchanged
//! - `AddArg` modifies `id` to accept an optional `someArg`
//! - `Query.node(id: ID!)` splits `"Type:id"` into `{ __typename, id }`

mod common;

use gqlweave::{
    id_arg, string_arg, AssembledSchema, BuildConfig, FieldError, FieldType, PathSegment,
    Provenance, Request, SchemaBuilder,
};
use serde_json::json;

use common::{execute, field_entry, init_logging};

fn node_schema() -> AssembledSchema {
    init_logging();
    let mut builder = SchemaBuilder::new(BuildConfig::default());
    builder
        .interface_type("Node", |t| {
            t.id("id")
                .description("Some Node ID Description")
                .resolve(|_, _, _| Err(FieldError::new("Abstract")));
            t.field("subNode", "Node");
            t.resolve_type(|value| {
                value["__typename"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| FieldError::new("missing __typename"))
            });
        })
        .object_type("User", |t| {
            t.implements(["Node"]);
            t.modify("id")
                .description("Some User ID Description")
                .resolve(|parent, _, _| {
                    Ok(json!(format!("User:{}", parent["id"].as_str().unwrap_or_default())))
                });
            t.field("subNode", "User");
        })
        .object_type("Throws", |t| {
            t.implements(["Node"]);
        })
        .object_type("AddArg", |t| {
            t.implements(["Node"]);
            t.modify("id")
                .arg("someArg", string_arg())
                .resolve(|parent, args, _| {
                    Ok(match args.get("someArg").and_then(|v| v.as_str()) {
                        Some(value) => json!(value),
                        None => json!(format!("AddArg:{}", parent["id"].as_str().unwrap_or_default())),
                    })
                });
        })
        .query_field("node", "Node", |f| {
            f.arg("id", id_arg().non_null()).resolve(|_, args, _| {
                let raw = args["id"].as_str().unwrap_or_default();
                let (typename, id) = raw.split_once(':').unwrap_or((raw, ""));
                Ok(json!({ "__typename": typename, "id": id }))
            });
        });
    builder.build().expect("node schema should build")
}

#[test]
fn test_modify_interface_field_description() {
    let schema = node_schema();
    let (data, errors) = execute(
        schema.executable(),
        r#"{
            node: __type(name: "Node") { fields { name description } }
            user: __type(name: "User") { fields { name description } }
        }"#,
    );

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(
        field_entry(&data["node"], "id")["description"],
        "Some Node ID Description"
    );
    assert_eq!(
        field_entry(&data["user"], "id")["description"],
        "Some User ID Description"
    );
}

#[test]
fn test_modify_interface_field_resolver() {
    let schema = node_schema();
    let (data, errors) = execute(
        schema.executable(),
        r#"{
            user: node(id: "User:1") { id }
            throws: node(id: "Throws:1") { id }
        }"#,
    );

    assert_eq!(data["user"]["id"], "User:1");
    assert_eq!(data["throws"]["id"], json!(null));
    assert_eq!(errors, vec!["Abstract".to_string()]);
}

#[test]
fn test_modify_adds_field_arguments() {
    let schema = node_schema();
    let (data, errors) = execute(
        schema.executable(),
        r#"{
            withArg: node(id: "AddArg:1") { ... on AddArg { id(someArg: "SomeArg!") } }
            withoutArg: node(id: "AddArg:1") { ... on AddArg { id } }
        }"#,
    );

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(data["withArg"]["id"], "SomeArg!");
    assert_eq!(data["withoutArg"]["id"], "AddArg:1");
}

#[test]
fn test_redeclared_field_narrows_type() {
    let schema = node_schema();
    let (data, errors) = execute(
        schema.executable(),
        r#"{
            node: __type(name: "Node") { fields { name type { name } } }
            user: __type(name: "User") { fields { name type { name } } }
        }"#,
    );

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(field_entry(&data["node"], "subNode")["type"]["name"], "Node");
    assert_eq!(field_entry(&data["user"], "subNode")["type"]["name"], "User");
}

#[test]
fn test_narrowed_field_executes_on_the_implementing_type() {
    let schema = node_schema();
    let response = schema.executable().execute(
        r#"{
            user: node(id: "User:1") { id subNode { id } ... on User { subNode { __typename } } }
            throws: node(id: "Throws:1") { subNode { id } }
        }"#,
    );

    // The default resolver reads `subNode` from the parent, which has none
    assert_eq!(
        response.data,
        json!({
            "user": { "id": "User:1", "subNode": null },
            "throws": { "subNode": null }
        })
    );
    assert!(response.errors.is_empty(), "{:?}", response.errors);
}

#[test]
fn test_resolver_errors_carry_their_path() {
    let schema = node_schema();
    let response = schema
        .executable()
        .execute(r#"{ first: node(id: "Throws:1") { id } }"#);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].path,
        vec![
            PathSegment::Field("first".to_string()),
            PathSegment::Field("id".to_string())
        ]
    );
}

#[test]
fn test_effective_fields_report_provenance() {
    let schema = node_schema();

    let user = schema.effective_fields("User").expect("User is declared");
    assert_eq!(
        user.get("id").map(|f| &f.provenance),
        Some(&Provenance::Modified {
            origin: "Node".to_string(),
            patched_by: vec!["User".to_string()],
        })
    );
    assert_eq!(user.get("subNode").map(|f| &f.provenance), Some(&Provenance::Own));

    let throws = schema.effective_fields("Throws").expect("Throws is declared");
    let id = throws.get("id").expect("id is inherited");
    assert_eq!(
        id.provenance,
        Provenance::Inherited {
            origin: "Node".to_string()
        }
    );
    assert_eq!(id.descriptor.ty, FieldType::named("ID"));

    let add_arg = schema.effective_fields("AddArg").expect("AddArg is declared");
    let id = add_arg.get("id").expect("id is inherited");
    assert!(id.descriptor.args.contains_key("someArg"));
    // Description survives an override that does not mention it
    assert_eq!(
        id.descriptor.description.as_deref(),
        Some("Some Node ID Description")
    );

    assert_eq!(schema.possible_types("Node"), vec!["User", "Throws", "AddArg"]);
    assert_eq!(schema.interfaces_of("AddArg"), Some(&["Node".to_string()][..]));
}

#[test]
fn test_unknown_typename_is_a_field_error() {
    let schema = node_schema();
    let (data, errors) = execute(
        schema.executable(),
        r#"{
            ghost: node(id: "Ghost:1") { id }
            user: node(id: "User:2") { id }
        }"#,
    );

    assert_eq!(data["ghost"], json!(null));
    assert_eq!(data["user"]["id"], "User:2");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Ghost"), "unexpected message: {}", errors[0]);
}

#[test]
fn test_resolvers_see_request_data() {
    init_logging();
    let mut builder = SchemaBuilder::default();
    builder.query_field("viewer", "String", |f| {
        f.resolve(|_, _, ctx| {
            let viewer = ctx
                .data::<String>()
                .ok_or_else(|| FieldError::new("not signed in"))?;
            Ok(json!(format!("{} via {}.{}", viewer, ctx.type_name(), ctx.field_name())))
        });
    });
    let schema = builder.build().expect("schema should build");

    let request = Request::new("{ viewer }").data("alice".to_string());
    let response = schema.executable().execute(request);
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data, json!({ "viewer": "alice via Query.viewer" }));

    let (data, errors) = execute(schema.executable(), "{ viewer }");
    assert_eq!(data["viewer"], json!(null));
    assert_eq!(errors, vec!["not signed in".to_string()]);
}
