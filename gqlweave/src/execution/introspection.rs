// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! `__schema`, `__type` and the introspection meta types
//!
//! Every object and interface reports its effective fields, so a field
//! narrowed on an implementing type shows the narrowed type there and the
//! wider type on the interface.

use graphql_parser::query::{Field, SelectionSet};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::executor::{sub_sets, Executor};
use super::input::value_to_json;
use crate::assembler::sdl::print_value;
use crate::builder::registry::{MUTATION, QUERY};
use crate::types::{arg, scalars, EnumValue, FieldDescriptor, FieldType, InputArg, TypeKind};

/// Output type and argument names of a selectable field
pub(super) struct FieldShape<'s> {
    pub(super) ty: FieldType,
    pub(super) args: Vec<&'s str>,
}

/// A value of one of the meta types
pub(super) enum Meta<'a> {
    Schema,
    Type(FieldType),
    Field(&'a FieldDescriptor),
    InputValue(String, InputArg),
    EnumValue(&'a EnumValue),
    Directive(&'static DirectiveInfo),
}

impl Meta<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            Meta::Schema => "__Schema",
            Meta::Type(_) => "__Type",
            Meta::Field(_) => "__Field",
            Meta::InputValue(..) => "__InputValue",
            Meta::EnumValue(_) => "__EnumValue",
            Meta::Directive(_) => "__Directive",
        }
    }
}

pub(super) struct DirectiveInfo {
    name: &'static str,
    description: &'static str,
    locations: &'static [&'static str],
    /// Name, type and default of each argument
    args: &'static [(&'static str, &'static str, Option<&'static str>)],
}

static DIRECTIVES: [DirectiveInfo; 3] = [
    DirectiveInfo {
        name: "include",
        description: "Include this field or fragment only when the argument is true",
        locations: &["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
        args: &[("if", "Boolean!", None)],
    },
    DirectiveInfo {
        name: "skip",
        description: "Skip this field or fragment when the argument is true",
        locations: &["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
        args: &[("if", "Boolean!", None)],
    },
    DirectiveInfo {
        name: "deprecated",
        description: "Marks an element of the schema as no longer supported",
        locations: &["FIELD_DEFINITION", "ARGUMENT_DEFINITION", "ENUM_VALUE"],
        args: &[("reason", "String", Some("No longer supported"))],
    },
];

const META_OBJECTS: [&str; 6] = [
    "__Schema",
    "__Type",
    "__Field",
    "__InputValue",
    "__EnumValue",
    "__Directive",
];

const NO_ARGS: &[&str] = &[];
const INCLUDE_DEPRECATED: &[&str] = &["includeDeprecated"];
const NAME: &[&str] = &["name"];

pub(super) fn is_meta_object(type_name: &str) -> bool {
    META_OBJECTS.contains(&type_name)
}

/// Shape of `__typename`, of the introspection entry points on `Query` and
/// of every meta type field
pub(super) fn meta_field(type_name: &str, field_name: &str) -> Option<FieldShape<'static>> {
    let (ty, args) = match (type_name, field_name) {
        (_, "__typename") => ("String!", NO_ARGS),
        (QUERY, "__schema") => ("__Schema!", NO_ARGS),
        (QUERY, "__type") => ("__Type", NAME),

        ("__Schema", "description") => ("String", NO_ARGS),
        ("__Schema", "types") => ("[__Type!]!", NO_ARGS),
        ("__Schema", "queryType") => ("__Type!", NO_ARGS),
        ("__Schema", "mutationType" | "subscriptionType") => ("__Type", NO_ARGS),
        ("__Schema", "directives") => ("[__Directive!]!", NO_ARGS),

        ("__Type", "kind") => ("__TypeKind!", NO_ARGS),
        ("__Type", "name" | "description" | "specifiedByURL") => ("String", NO_ARGS),
        ("__Type", "fields") => ("[__Field!]", INCLUDE_DEPRECATED),
        ("__Type", "interfaces" | "possibleTypes") => ("[__Type!]", NO_ARGS),
        ("__Type", "enumValues") => ("[__EnumValue!]", INCLUDE_DEPRECATED),
        ("__Type", "inputFields") => ("[__InputValue!]", INCLUDE_DEPRECATED),
        ("__Type", "ofType") => ("__Type", NO_ARGS),
        ("__Type", "isOneOf") => ("Boolean", NO_ARGS),

        ("__Field", "args") => ("[__InputValue!]!", INCLUDE_DEPRECATED),
        ("__Field" | "__InputValue", "type") => ("__Type!", NO_ARGS),
        ("__InputValue", "defaultValue") => ("String", NO_ARGS),

        ("__Directive", "locations") => ("[__DirectiveLocation!]!", NO_ARGS),
        ("__Directive", "args") => ("[__InputValue!]!", INCLUDE_DEPRECATED),
        ("__Directive", "isRepeatable") => ("Boolean!", NO_ARGS),

        ("__Field" | "__InputValue" | "__EnumValue" | "__Directive", "name") => {
            ("String!", NO_ARGS)
        }
        ("__Field" | "__InputValue" | "__EnumValue" | "__Directive", "description") => {
            ("String", NO_ARGS)
        }
        ("__Field" | "__InputValue" | "__EnumValue", "isDeprecated") => ("Boolean!", NO_ARGS),
        ("__Field" | "__InputValue" | "__EnumValue", "deprecationReason") => ("String", NO_ARGS),
        _ => return None,
    };
    Some(FieldShape {
        ty: parse_type(ty),
        args: args.to_vec(),
    })
}

/// Parse a type reference such as `[__Type!]!`
fn parse_type(reference: &str) -> FieldType {
    if let Some(inner) = reference.strip_suffix('!') {
        parse_type(inner).non_null()
    } else if let Some(inner) = reference
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        parse_type(inner).list()
    } else {
        FieldType::named(reference)
    }
}

fn kind_name(kind: Option<TypeKind>) -> &'static str {
    match kind {
        Some(TypeKind::Object) => "OBJECT",
        Some(TypeKind::Interface) => "INTERFACE",
        Some(TypeKind::Union) => "UNION",
        Some(TypeKind::Enum) => "ENUM",
        Some(TypeKind::Scalar) | None => "SCALAR",
    }
}

fn optional(text: Option<&str>) -> JsonValue {
    text.map_or(JsonValue::Null, |text| JsonValue::String(text.to_string()))
}

impl<'a, 'q: 'a> Executor<'a, 'q> {
    /// `__Type` for a declared type or built-in scalar
    pub(super) fn named_type(&self, name: &str) -> Option<Meta<'a>> {
        (self.schema.hierarchy.contains(name) || scalars::is_builtin_scalar(name))
            .then(|| Meta::Type(FieldType::named(name)))
    }

    pub(super) fn introspect(
        &self,
        meta: Meta<'a>,
        sets: &[&'a SelectionSet<'q, String>],
    ) -> JsonValue {
        let type_name = meta.type_name();
        let mut object = JsonMap::new();
        for (key, fields) in self.group(type_name, sets) {
            let field = fields[0];
            let value = match field.name.as_str() {
                "__typename" => JsonValue::String(type_name.to_string()),
                name => self.meta_value(&meta, name, field, &sub_sets(&fields)),
            };
            object.insert(key.to_string(), value);
        }
        JsonValue::Object(object)
    }

    fn introspect_all(
        &self,
        metas: impl Iterator<Item = Meta<'a>>,
        sets: &[&'a SelectionSet<'q, String>],
    ) -> JsonValue {
        JsonValue::Array(metas.map(|meta| self.introspect(meta, sets)).collect())
    }

    fn include_deprecated(&self, field: &Field<'q, String>) -> bool {
        field
            .arguments
            .iter()
            .find(|(name, _)| name == "includeDeprecated")
            .map_or(false, |(_, value)| {
                value_to_json(value, &self.variables).as_bool() == Some(true)
            })
    }

    fn meta_value(
        &self,
        meta: &Meta<'a>,
        name: &str,
        field: &'a Field<'q, String>,
        sets: &[&'a SelectionSet<'q, String>],
    ) -> JsonValue {
        let schema = self.schema;
        let hierarchy = &schema.hierarchy;
        match meta {
            Meta::Schema => match name {
                "types" => {
                    let names = hierarchy
                        .iter()
                        .map(|t| t.name())
                        .chain(scalars::BUILTIN_SCALARS);
                    self.introspect_all(names.map(|n| Meta::Type(FieldType::named(n))), sets)
                }
                "queryType" => self.introspect(Meta::Type(FieldType::named(QUERY)), sets),
                "mutationType" if hierarchy.contains(MUTATION) => {
                    self.introspect(Meta::Type(FieldType::named(MUTATION)), sets)
                }
                "directives" => self.introspect_all(DIRECTIVES.iter().map(Meta::Directive), sets),
                _ => JsonValue::Null,
            },
            Meta::Type(ty) => self.type_value(ty, name, field, sets),
            Meta::Field(descriptor) => match name {
                "name" => JsonValue::String(descriptor.name.clone()),
                "description" => optional(descriptor.description.as_deref()),
                "args" => self.introspect_all(
                    descriptor
                        .args
                        .iter()
                        .map(|(arg_name, input)| Meta::InputValue(arg_name.clone(), input.clone())),
                    sets,
                ),
                "type" => self.introspect(Meta::Type(descriptor.ty.clone()), sets),
                "isDeprecated" => JsonValue::Bool(descriptor.deprecation.is_some()),
                "deprecationReason" => optional(
                    descriptor
                        .deprecation
                        .as_ref()
                        .and_then(|d| d.reason.as_deref()),
                ),
                _ => JsonValue::Null,
            },
            Meta::InputValue(arg_name, input) => match name {
                "name" => JsonValue::String(arg_name.clone()),
                "description" => optional(input.description.as_deref()),
                "type" => self.introspect(Meta::Type(input.ty.clone()), sets),
                "defaultValue" => input.default.as_ref().map_or(JsonValue::Null, |default| {
                    let is_enum = hierarchy
                        .get(input.ty.named_type())
                        .map_or(false, |t| t.kind() == TypeKind::Enum);
                    JsonValue::String(print_value(default, is_enum))
                }),
                "isDeprecated" => JsonValue::Bool(false),
                _ => JsonValue::Null,
            },
            Meta::EnumValue(value) => match name {
                "name" => JsonValue::String(value.name.clone()),
                "description" => optional(value.description.as_deref()),
                "isDeprecated" => JsonValue::Bool(value.deprecation.is_some()),
                "deprecationReason" => {
                    optional(value.deprecation.as_ref().and_then(|d| d.reason.as_deref()))
                }
                _ => JsonValue::Null,
            },
            Meta::Directive(directive) => match name {
                "name" => JsonValue::String(directive.name.to_string()),
                "description" => JsonValue::String(directive.description.to_string()),
                "locations" => directive
                    .locations
                    .iter()
                    .map(|location| JsonValue::String(location.to_string()))
                    .collect(),
                "args" => {
                    let args = directive.args.iter().map(|(arg_name, ty, default)| {
                        let mut input = arg(parse_type(ty));
                        if let Some(default) = default {
                            input = input.default_value(*default);
                        }
                        Meta::InputValue(arg_name.to_string(), input)
                    });
                    self.introspect_all(args, sets)
                }
                "isRepeatable" => JsonValue::Bool(false),
                _ => JsonValue::Null,
            },
        }
    }

    fn type_value(
        &self,
        ty: &FieldType,
        name: &str,
        field: &'a Field<'q, String>,
        sets: &[&'a SelectionSet<'q, String>],
    ) -> JsonValue {
        let type_name = match ty {
            FieldType::NonNull(inner) | FieldType::List(inner) => {
                return match name {
                    "kind" if matches!(ty, FieldType::NonNull(_)) => JsonValue::from("NON_NULL"),
                    "kind" => JsonValue::from("LIST"),
                    "ofType" => self.introspect(Meta::Type((**inner).clone()), sets),
                    _ => JsonValue::Null,
                };
            }
            FieldType::Named(type_name) => type_name.as_str(),
        };

        let schema = self.schema;
        let resolved = schema.hierarchy.get(type_name);
        let kind = resolved.map(|t| t.kind());
        match (name, resolved) {
            ("kind", _) => JsonValue::from(kind_name(kind)),
            ("name", _) => JsonValue::from(type_name),
            ("description", Some(t)) => optional(t.definition.description.as_deref()),
            ("fields", Some(t)) if t.kind().has_fields() => {
                let include_deprecated = self.include_deprecated(field);
                let fields = t
                    .fields
                    .iter()
                    .map(|(_, effective)| &effective.descriptor)
                    .filter(|descriptor| include_deprecated || descriptor.deprecation.is_none())
                    .map(Meta::Field);
                self.introspect_all(fields, sets)
            }
            ("interfaces", Some(t)) if t.kind().has_fields() => self.introspect_all(
                t.interfaces
                    .iter()
                    .map(|interface| Meta::Type(FieldType::named(interface.as_str()))),
                sets,
            ),
            ("possibleTypes", Some(t)) if t.kind().is_abstract() => self.introspect_all(
                schema
                    .hierarchy
                    .possible_types(type_name)
                    .into_iter()
                    .map(|possible| Meta::Type(FieldType::named(possible))),
                sets,
            ),
            ("enumValues", Some(t)) if t.kind() == TypeKind::Enum => {
                let include_deprecated = self.include_deprecated(field);
                let values = t
                    .definition
                    .values
                    .iter()
                    .filter(|value| include_deprecated || value.deprecation.is_none())
                    .map(Meta::EnumValue);
                self.introspect_all(values, sets)
            }
            _ => JsonValue::Null,
        }
    }
}
