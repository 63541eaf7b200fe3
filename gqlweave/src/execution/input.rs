// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Input values: query literals, variables and argument coercion

use graphql_parser::query::{Type, Value};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::resolve::ResolvedHierarchy;
use crate::types::{scalars, FieldType, TypeKind};

/// Convert a literal to JSON, substituting variables. Unset variables
/// become null.
pub(super) fn value_to_json(
    value: &Value<'_, String>,
    variables: &JsonMap<String, JsonValue>,
) -> JsonValue {
    match value {
        Value::Variable(name) => variables.get(name).cloned().unwrap_or(JsonValue::Null),
        Value::Int(number) => number.as_i64().map_or(JsonValue::Null, JsonValue::from),
        Value::Float(float) => Number::from_f64(*float).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(string) => JsonValue::String(string.clone()),
        Value::Boolean(boolean) => JsonValue::Bool(*boolean),
        Value::Null => JsonValue::Null,
        Value::Enum(name) => JsonValue::String(name.clone()),
        Value::List(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| value_to_json(item, variables))
                .collect(),
        ),
        Value::Object(fields) => JsonValue::Object(
            fields
                .iter()
                .map(|(name, item)| (name.clone(), value_to_json(item, variables)))
                .collect(),
        ),
    }
}

pub(super) fn field_type_of(ty: &Type<'_, String>) -> FieldType {
    match ty {
        Type::NamedType(name) => FieldType::named(name.as_str()),
        Type::ListType(inner) => field_type_of(inner).list(),
        Type::NonNullType(inner) => field_type_of(inner).non_null(),
    }
}

/// Check `value` against an argument or variable type, normalising it on
/// the way: IDs become strings and a single value given for a list is
/// wrapped in one.
pub(super) fn coerce_input(
    hierarchy: &ResolvedHierarchy,
    ty: &FieldType,
    value: JsonValue,
) -> Result<JsonValue, String> {
    match ty {
        FieldType::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("expected a non-null value of type '{}'", ty));
            }
            coerce_input(hierarchy, inner, value)
        }
        _ if value.is_null() => Ok(JsonValue::Null),
        FieldType::List(inner) => match value {
            JsonValue::Array(items) => items
                .into_iter()
                .map(|item| coerce_input(hierarchy, inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            single => Ok(JsonValue::Array(vec![coerce_input(hierarchy, inner, single)?])),
        },
        FieldType::Named(name) => coerce_named(hierarchy, name, value),
    }
}

fn coerce_named(
    hierarchy: &ResolvedHierarchy,
    name: &str,
    value: JsonValue,
) -> Result<JsonValue, String> {
    let mismatch = |value: &JsonValue| format!("'{}' cannot represent {}", name, value);
    match name {
        scalars::INT => match value.as_i64() {
            Some(int) if i32::try_from(int).is_ok() => Ok(value),
            _ => Err(mismatch(&value)),
        },
        scalars::FLOAT => match value.as_f64() {
            Some(_) => Ok(value),
            None => Err(mismatch(&value)),
        },
        scalars::STRING | scalars::BOOLEAN => {
            let matches = if name == scalars::STRING {
                value.is_string()
            } else {
                value.is_boolean()
            };
            if matches {
                Ok(value)
            } else {
                Err(mismatch(&value))
            }
        }
        scalars::ID => match &value {
            JsonValue::String(_) => Ok(value),
            JsonValue::Number(number) if number.is_i64() || number.is_u64() => {
                Ok(JsonValue::String(number.to_string()))
            }
            _ => Err(mismatch(&value)),
        },
        _ => match hierarchy.get(name).map(|t| t.kind()) {
            Some(TypeKind::Scalar) => Ok(value),
            Some(TypeKind::Enum) => {
                let declared = hierarchy
                    .get(name)
                    .map_or(false, |t| {
                        t.definition
                            .values
                            .iter()
                            .any(|v| value.as_str() == Some(v.name.as_str()))
                    });
                if declared {
                    Ok(value)
                } else {
                    Err(mismatch(&value))
                }
            }
            _ => Err(format!("'{}' is not an input type", name)),
        },
    }
}
