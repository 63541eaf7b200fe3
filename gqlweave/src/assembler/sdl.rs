// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! SDL printer
//!
//! Renders the resolved hierarchy as schema definition language. Types are
//! sorted by name, fields keep declaration order and `implements` lists the
//! full interface closure. Built-in scalars are omitted.

use std::fmt::Write;

use serde_json::Value as JsonValue;

use crate::resolve::{EffectiveField, ResolvedHierarchy, ResolvedType};
use crate::types::{Deprecation, InputArg, TypeKind};

pub fn print_schema(hierarchy: &ResolvedHierarchy) -> String {
    let mut types: Vec<&ResolvedType> = hierarchy.iter().collect();
    types.sort_by(|a, b| a.name().cmp(b.name()));

    types
        .into_iter()
        .map(|resolved| print_type(hierarchy, resolved))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn print_type(hierarchy: &ResolvedHierarchy, resolved: &ResolvedType) -> String {
    let mut out = String::new();
    print_description(&mut out, resolved.definition.description.as_deref(), "");

    match resolved.kind() {
        TypeKind::Scalar => {
            let _ = write!(out, "scalar {}", resolved.name());
        }
        TypeKind::Union => {
            let _ = write!(
                out,
                "union {} = {}",
                resolved.name(),
                resolved.definition.members.join(" | ")
            );
        }
        TypeKind::Enum => {
            let _ = writeln!(out, "enum {} {{", resolved.name());
            for value in &resolved.definition.values {
                print_description(&mut out, value.description.as_deref(), "  ");
                let _ = writeln!(
                    out,
                    "  {}{}",
                    value.name,
                    print_deprecation(value.deprecation.as_ref())
                );
            }
            out.push('}');
        }
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if resolved.kind() == TypeKind::Object {
                "type"
            } else {
                "interface"
            };
            let _ = write!(out, "{} {}", keyword, resolved.name());
            if !resolved.interfaces.is_empty() {
                let _ = write!(out, " implements {}", resolved.interfaces.join(" & "));
            }
            out.push_str(" {\n");
            for (_, field) in resolved.fields.iter() {
                print_field(&mut out, hierarchy, field);
            }
            out.push('}');
        }
    }
    out
}

fn print_field(out: &mut String, hierarchy: &ResolvedHierarchy, field: &EffectiveField) {
    let descriptor = &field.descriptor;
    print_description(out, descriptor.description.as_deref(), "  ");
    let _ = write!(out, "  {}", descriptor.name);

    if !descriptor.args.is_empty() {
        let multiline = descriptor.args.values().any(|arg| arg.description.is_some());
        if multiline {
            out.push_str("(\n");
            for (name, arg) in &descriptor.args {
                print_description(out, arg.description.as_deref(), "    ");
                let _ = writeln!(out, "    {}", print_arg(hierarchy, name, arg));
            }
            out.push_str("  )");
        } else {
            let args: Vec<String> = descriptor
                .args
                .iter()
                .map(|(name, arg)| print_arg(hierarchy, name, arg))
                .collect();
            let _ = write!(out, "({})", args.join(", "));
        }
    }

    let _ = writeln!(
        out,
        ": {}{}",
        descriptor.ty,
        print_deprecation(descriptor.deprecation.as_ref())
    );
}

fn print_arg(hierarchy: &ResolvedHierarchy, name: &str, arg: &InputArg) -> String {
    let mut out = format!("{}: {}", name, arg.ty);
    if let Some(default) = &arg.default {
        let is_enum = hierarchy
            .get(arg.ty.named_type())
            .map_or(false, |t| t.kind() == TypeKind::Enum);
        let _ = write!(out, " = {}", print_value(default, is_enum));
    }
    out
}

fn print_deprecation(deprecation: Option<&Deprecation>) -> String {
    match deprecation {
        None => String::new(),
        Some(Deprecation { reason: None }) => " @deprecated".to_string(),
        Some(Deprecation {
            reason: Some(reason),
        }) => format!(" @deprecated(reason: {})", JsonValue::from(reason.as_str())),
    }
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };
    let escaped = description.replace("\"\"\"", "\\\"\"\"");
    if escaped.contains('\n') {
        let _ = writeln!(out, "{}\"\"\"", indent);
        for line in escaped.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "{}{}", indent, line);
            }
        }
        let _ = writeln!(out, "{}\"\"\"", indent);
    } else {
        let _ = writeln!(out, "{}\"\"\"{}\"\"\"", indent, escaped);
    }
}

/// GraphQL literal for a default value. Strings supplied for an enum
/// argument print as bare enum values.
pub(crate) fn print_value(value: &JsonValue, as_enum: bool) -> String {
    match value {
        JsonValue::String(s) if as_enum => s.clone(),
        JsonValue::Array(items) => {
            let items: Vec<String> = items.iter().map(|item| print_value(item, as_enum)).collect();
            format!("[{}]", items.join(", "))
        }
        JsonValue::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, item)| format!("{}: {}", key, print_value(item, false)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        other => other.to_string(),
    }
}
