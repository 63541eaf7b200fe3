//! SDL output for interfaces implementing interfaces
//!
//! Pet -> Equine -> {Horse, Donkey, Mule}, each level narrowing `mother`.
//! No root type is declared, so the default `Query { ok: Boolean! }` is
//! added to the output.

mod common;

use gqlweave::{
    AbstractTypeStrategy, BuildConfig, FieldType, SchemaBuilder, TypeKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{execute, field_entry, init_logging};

const EXPECTED_SDL: &str = r#"type Donkey implements Equine & Pet {
  mother: Equine
}

interface Equine implements Pet {
  mother: Pet
}

type Horse implements Equine & Pet {
  mother: Equine
}

type Mule implements Equine & Pet {
  mother: Equine
}

interface Pet {
  mother: Pet
}

type Query {
  ok: Boolean!
}"#;

fn pets() -> SchemaBuilder {
    pets_with(BuildConfig::lenient())
}

fn pets_with(config: BuildConfig) -> SchemaBuilder {
    init_logging();
    let mut builder = SchemaBuilder::new(config);
    builder
        .interface_type("Pet", |t| {
            t.field("mother", "Pet");
        })
        .interface_type("Equine", |t| {
            t.implements(["Pet"]);
            t.modify("mother").ty("Pet");
        });
    for name in ["Horse", "Donkey", "Mule"] {
        builder.object_type(name, |t| {
            t.implements(["Equine"]);
            t.modify("mother").ty("Equine");
        });
    }
    builder
}

#[test]
fn test_interface_chain_prints_valid_sdl() {
    let (schema, sdl) = pets()
        .build_with_artifacts()
        .expect("interface chain should build");
    assert_eq!(sdl, EXPECTED_SDL);
    assert_eq!(schema.strategy(), AbstractTypeStrategy::ResolveType);
}

#[test]
fn test_narrowing_is_visible_per_type() {
    let schema = pets().build().expect("interface chain should build");
    let mother = |type_name: &str| {
        schema
            .effective_fields(type_name)
            .and_then(|fields| fields.get("mother"))
            .map(|field| field.descriptor.ty.clone())
    };

    assert_eq!(mother("Pet"), Some(FieldType::named("Pet")));
    assert_eq!(mother("Equine"), Some(FieldType::named("Pet")));
    for name in ["Horse", "Donkey", "Mule"] {
        assert_eq!(mother(name), Some(FieldType::named("Equine")));
        assert_eq!(
            schema.interfaces_of(name),
            Some(&["Equine".to_string(), "Pet".to_string()][..])
        );
    }
    assert_eq!(schema.possible_types("Pet"), vec!["Horse", "Donkey", "Mule"]);
    assert_eq!(
        schema.hierarchy().get("Equine").map(|t| t.kind()),
        Some(TypeKind::Interface)
    );
}

#[test]
fn test_default_query_resolves() {
    let schema = pets().build().expect("interface chain should build");
    let (data, errors) = execute(schema.executable(), "{ ok }");
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(data, json!({ "ok": true }));
}

#[test]
fn test_introspection_reports_each_level_of_narrowing() {
    let schema = pets().build().expect("interface chain should build");
    let (data, errors) = execute(
        schema.executable(),
        r#"{
            pet: __type(name: "Pet") { kind fields { name type { name } } }
            equine: __type(name: "Equine") {
                kind
                interfaces { name }
                possibleTypes { name }
                fields { name type { name } }
            }
            horse: __type(name: "Horse") { kind interfaces { name } fields { name type { name } } }
        }"#,
    );

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(field_entry(&data["pet"], "mother")["type"]["name"], "Pet");
    assert_eq!(field_entry(&data["equine"], "mother")["type"]["name"], "Pet");
    assert_eq!(field_entry(&data["horse"], "mother")["type"]["name"], "Equine");
    assert_eq!(data["equine"]["kind"], "INTERFACE");
    assert_eq!(data["horse"]["kind"], "OBJECT");
    assert_eq!(data["equine"]["interfaces"], json!([{ "name": "Pet" }]));
    assert_eq!(
        data["horse"]["interfaces"],
        json!([{ "name": "Equine" }, { "name": "Pet" }])
    );
    assert_eq!(
        data["equine"]["possibleTypes"],
        json!([{ "name": "Horse" }, { "name": "Donkey" }, { "name": "Mule" }])
    );
}

#[test]
fn test_narrowed_field_resolves_through_the_chain() {
    let mut builder =
        pets_with(BuildConfig::lenient().with_strategy(AbstractTypeStrategy::Discriminant));
    builder.query_field("horse", "Horse", |f| {
        f.resolve(|_, _, _| {
            Ok(json!({
                "__typename": "Horse",
                "mother": { "__typename": "Donkey", "mother": { "__typename": "Mule" } }
            }))
        });
    });
    let schema = builder.build().expect("interface chain should build");

    let (data, errors) = execute(
        schema.executable(),
        "{ horse { mother { __typename mother { __typename } } } }",
    );
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(
        data,
        json!({
            "horse": {
                "mother": { "__typename": "Donkey", "mother": { "__typename": "Mule" } }
            }
        })
    );
}

#[test]
fn test_descriptions_arguments_and_deprecations_in_sdl() {
    init_logging();
    let mut builder = SchemaBuilder::default();
    builder
        .enum_type("Color", |t| {
            t.description("Paint colors");
            t.values(["RED", "GREEN"]);
            t.value("BLUE").deprecated("Use GREEN");
        })
        .scalar_type("Date", |t| {
            t.description("Calendar date");
        })
        .union_type("Anything", |t| {
            t.members(["Query"]);
        })
        .query_field("paint", "Color", |f| {
            f.description("Pick a color")
                .arg("preferred", gqlweave::arg("Color").default_value("RED"))
                .arg("limit", gqlweave::int_arg());
        })
        .query_field("since", "Date", |f| {
            f.deprecated("No longer tracked");
        })
        .query_field("search", "Anything", |f| {
            f.arg(
                "term",
                gqlweave::string_arg().non_null().description("Text to look for"),
            );
        });

    let (_, sdl) = builder
        .build_with_artifacts()
        .expect("schema should build");
    let expected = r#"union Anything = Query

"""Paint colors"""
enum Color {
  RED
  GREEN
  BLUE @deprecated(reason: "Use GREEN")
}

"""Calendar date"""
scalar Date

type Query {
  """Pick a color"""
  paint(preferred: Color = RED, limit: Int): Color
  since: Date @deprecated(reason: "No longer tracked")
  search(
    """Text to look for"""
    term: String!
  ): Anything
}"#;
    assert_eq!(sdl, expected);
}
