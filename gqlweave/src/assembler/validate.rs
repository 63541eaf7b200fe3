// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Schema validation run before anything is handed to the execution engine

use log::debug;

use crate::builder::registry::{MUTATION, QUERY};
use crate::error::{BuildError, Result};
use crate::resolve::{EffectiveField, ResolvedHierarchy, ResolvedType};
use crate::types::{scalars, TypeKind};

pub fn validate(hierarchy: &ResolvedHierarchy) -> Result<()> {
    check_roots(hierarchy)?;
    for resolved in hierarchy.iter() {
        check_not_empty(resolved)?;
        match resolved.kind() {
            TypeKind::Object | TypeKind::Interface => {
                check_field_references(hierarchy, resolved)?;
                check_conformance(hierarchy, resolved)?;
            }
            TypeKind::Union => check_union_members(hierarchy, resolved)?,
            TypeKind::Scalar | TypeKind::Enum => {}
        }
    }
    debug!("Validated {} types", hierarchy.len());
    Ok(())
}

fn check_roots(hierarchy: &ResolvedHierarchy) -> Result<()> {
    for root in [QUERY, MUTATION] {
        if let Some(resolved) = hierarchy.get(root) {
            if resolved.kind() != TypeKind::Object {
                return Err(BuildError::InvalidDefinition {
                    type_name: root.to_string(),
                    message: format!(
                        "root operation type must be an object type, found {}",
                        resolved.kind()
                    ),
                });
            }
        }
    }
    Ok(())
}

fn check_not_empty(resolved: &ResolvedType) -> Result<()> {
    let empty = match resolved.kind() {
        TypeKind::Object | TypeKind::Interface => resolved.fields.is_empty(),
        TypeKind::Union => resolved.definition.members.is_empty(),
        TypeKind::Enum => resolved.definition.values.is_empty(),
        TypeKind::Scalar => false,
    };
    if empty {
        return Err(BuildError::EmptyType(resolved.name().to_string()));
    }
    Ok(())
}

fn kind_of(hierarchy: &ResolvedHierarchy, name: &str) -> Option<TypeKind> {
    if scalars::is_builtin_scalar(name) {
        return Some(TypeKind::Scalar);
    }
    hierarchy.get(name).map(ResolvedType::kind)
}

fn check_field_references(hierarchy: &ResolvedHierarchy, resolved: &ResolvedType) -> Result<()> {
    for (field_name, field) in resolved.fields.iter() {
        let location = format!("{}.{}", resolved.name(), field_name);
        let referenced = field.descriptor.ty.named_type();
        if kind_of(hierarchy, referenced).is_none() {
            return Err(BuildError::TypeReference {
                location,
                referenced: referenced.to_string(),
            });
        }

        for (arg_name, arg) in &field.descriptor.args {
            let location = format!("{}({}:)", location, arg_name);
            let referenced = arg.ty.named_type();
            match kind_of(hierarchy, referenced) {
                None => {
                    return Err(BuildError::TypeReference {
                        location,
                        referenced: referenced.to_string(),
                    })
                }
                Some(kind) if !kind.is_input() => {
                    return Err(BuildError::InvalidInputType {
                        location,
                        referenced: referenced.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn check_union_members(hierarchy: &ResolvedHierarchy, resolved: &ResolvedType) -> Result<()> {
    for member in &resolved.definition.members {
        match kind_of(hierarchy, member) {
            None => {
                return Err(BuildError::TypeReference {
                    location: resolved.name().to_string(),
                    referenced: member.clone(),
                })
            }
            Some(TypeKind::Object) => {}
            Some(_) => {
                return Err(BuildError::InvalidUnionMember {
                    union: resolved.name().to_string(),
                    member: member.clone(),
                })
            }
        }
    }
    Ok(())
}

/// Every field of every interface in the closure must be satisfied by the
/// type's effective field of the same name
fn check_conformance(hierarchy: &ResolvedHierarchy, resolved: &ResolvedType) -> Result<()> {
    for interface_name in &resolved.interfaces {
        let Some(interface) = hierarchy.get(interface_name) else {
            continue;
        };
        for (field_name, expected) in interface.fields.iter() {
            let violation = |reason: String| BuildError::Conformance {
                type_name: resolved.name().to_string(),
                interface: interface_name.clone(),
                field: field_name.to_string(),
                reason,
            };
            let Some(actual) = resolved.fields.get(field_name) else {
                return Err(violation("field is missing".to_string()));
            };
            if let Some(reason) = field_mismatch(hierarchy, expected, actual) {
                return Err(violation(reason));
            }
        }
    }
    Ok(())
}

fn field_mismatch(
    hierarchy: &ResolvedHierarchy,
    expected: &EffectiveField,
    actual: &EffectiveField,
) -> Option<String> {
    let expected = &expected.descriptor;
    let actual = &actual.descriptor;

    if !hierarchy.graph().is_subtype(&actual.ty, &expected.ty) {
        return Some(format!(
            "expected type {} or a subtype of it, found {}",
            expected.ty, actual.ty
        ));
    }
    for (arg_name, arg) in &expected.args {
        match actual.args.get(arg_name) {
            None => return Some(format!("argument '{}' is missing", arg_name)),
            Some(found) if found.ty != arg.ty => {
                return Some(format!(
                    "argument '{}' expects type {}, found {}",
                    arg_name, arg.ty, found.ty
                ))
            }
            Some(_) => {}
        }
    }
    actual
        .args
        .iter()
        .filter(|(name, _)| !expected.args.contains_key(name.as_str()))
        .find(|(_, arg)| !arg.is_optional())
        .map(|(name, _)| format!("additional argument '{}' must not be required", name))
}
