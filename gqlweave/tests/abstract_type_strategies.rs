//! Runtime resolution of interfaces and unions under each strategy

mod common;

use gqlweave::{
    int_arg, AbstractTypeStrategy, AssembledSchema, BuildConfig, BuildError, FieldError,
    FieldType, SchemaBuilder,
};
use serde_json::{json, Value as JsonValue};

use common::{execute, init_logging};

fn pet_value(id: i64) -> JsonValue {
    match id {
        1 => json!({ "__typename": "Horse", "name": "Secretariat", "mane": "chestnut" }),
        2 => json!({ "__typename": "Donkey", "name": "Eeyore", "ears": 30 }),
        _ => json!({ "name": "Mystery" }),
    }
}

fn classify(value: &JsonValue) -> Result<String, FieldError> {
    if value.get("mane").is_some() {
        Ok("Horse".to_string())
    } else if value.get("ears").is_some() {
        Ok("Donkey".to_string())
    } else {
        Err(FieldError::new("Cannot tell which pet this is"))
    }
}

/// Pet interface with Horse and Donkey, exposed through `Query.pet(id)`,
/// `Query.pets` and the `Barn` union. With `explicit` set, `Pet` and `Barn`
/// carry a resolveType function.
fn farm(
    config: BuildConfig,
    explicit: bool,
    configure: impl FnOnce(&mut SchemaBuilder),
) -> gqlweave::Result<AssembledSchema> {
    init_logging();
    let mut builder = SchemaBuilder::new(config);
    builder
        .interface_type("Pet", |t| {
            t.string("name");
            if explicit {
                t.resolve_type(classify);
            }
        })
        .object_type("Horse", |t| {
            t.implements(["Pet"]);
            t.string("mane");
        })
        .object_type("Donkey", |t| {
            t.implements(["Pet"]);
            t.int("ears");
        })
        .union_type("Barn", |t| {
            t.members(["Horse", "Donkey"]);
            if explicit {
                t.resolve_type(classify);
            }
        })
        .query_field("pet", "Pet", |f| {
            f.arg("id", int_arg().non_null())
                .resolve(|_, args, _| Ok(pet_value(args["id"].as_i64().unwrap_or_default())));
        })
        .query_field("pets", FieldType::named("Pet").list(), |f| {
            f.resolve(|_, _, _| Ok(json!([pet_value(1), pet_value(2)])));
        })
        .query_field("stall", "Barn", |f| {
            f.resolve(|_, _, _| Ok(pet_value(2)));
        });
    configure(&mut builder);
    builder.build()
}

#[test]
fn test_resolve_type_failure_nulls_only_that_field() {
    let schema = farm(BuildConfig::lenient(), true, |_| {}).expect("farm should build");

    let (data, errors) = execute(
        schema.executable(),
        "{ good: pet(id: 1) { name } bad: pet(id: 3) { name } other: pet(id: 2) { name } }",
    );

    assert_eq!(data["good"]["name"], "Secretariat");
    assert_eq!(data["other"]["name"], "Eeyore");
    assert_eq!(data["bad"], JsonValue::Null);
    assert_eq!(errors, vec!["Cannot tell which pet this is".to_string()]);
}

#[test]
fn test_resolve_type_in_lists() {
    let schema = farm(BuildConfig::lenient(), true, |_| {}).expect("farm should build");
    let (data, errors) = execute(
        schema.executable(),
        "{ pets { __typename name ... on Horse { mane } ... on Donkey { ears } } }",
    );

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(
        data["pets"],
        json!([
            { "__typename": "Horse", "name": "Secretariat", "mane": "chestnut" },
            { "__typename": "Donkey", "name": "Eeyore", "ears": 30 }
        ])
    );
}

#[test]
fn test_is_type_of_checks_in_declaration_order() {
    let config = BuildConfig::strict().with_strategy(AbstractTypeStrategy::IsTypeOf);
    let schema = farm(config, false, |b| {
        // Both checks accept any value with a name; Horse is declared first
        b.extend_type("Horse", |t| {
            t.is_type_of(|value| value.get("name").is_some());
        });
        b.extend_type("Donkey", |t| {
            t.is_type_of(|value| value.get("ears").is_some());
        });
    })
    .expect("farm should build");

    let (data, errors) = execute(
        schema.executable(),
        "{ pet(id: 2) { __typename } stall { __typename } }",
    );
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(data["pet"]["__typename"], "Horse");
    assert_eq!(data["stall"]["__typename"], "Horse");
}

#[test]
fn test_typename_discriminant() {
    let config = BuildConfig::strict().with_strategy(AbstractTypeStrategy::Discriminant);
    let schema = farm(config, false, |_| {}).expect("farm should build");

    let (data, errors) = execute(
        schema.executable(),
        "{ pet(id: 2) { __typename } stall { ... on Donkey { ears } } missing: pet(id: 3) { name } }",
    );
    assert_eq!(data["pet"]["__typename"], "Donkey");
    assert_eq!(data["stall"]["ears"], 30);
    assert_eq!(data["missing"], JsonValue::Null);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_strict_validation_requires_type_resolution() {
    let err = farm(BuildConfig::strict(), false, |_| {}).unwrap_err();
    assert!(
        matches!(err, BuildError::MissingTypeResolution { ref type_name, .. } if type_name == "Pet"),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_lenient_validation_defers_to_query_time() {
    let schema = farm(BuildConfig::lenient(), false, |_| {}).expect("farm should build");
    let (data, errors) = execute(schema.executable(), "{ pet(id: 1) { name } }");
    assert_eq!(data["pet"], JsonValue::Null);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Pet"), "unexpected message: {}", errors[0]);
}

#[test]
fn test_mixed_strategies_are_rejected() {
    let err = farm(BuildConfig::lenient(), true, |b| {
        b.extend_type("Donkey", |t| {
            t.is_type_of(|value| value.get("ears").is_some());
        });
    })
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::MixedStrategy {
            type_name: "Pet".to_string(),
            member: "Donkey".to_string()
        }
    );
}
