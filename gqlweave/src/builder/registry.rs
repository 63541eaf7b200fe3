// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Type registry for one schema build
//!
//! Collects every definition produced by the builder calls together with the
//! modification patches they declared. Errors found while registering are
//! kept until [`TypeRegistry::finish`] so the builder API can stay fluent.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::json;

use super::block::ObjectDefinitionBlock;
use crate::error::{BuildError, Result};
use crate::types::{scalars, FieldDescriptor, ModificationPatch, TypeDefinition, TypeKind};

pub const QUERY: &str = "Query";
pub const MUTATION: &str = "Mutation";

/// Pending patches keyed by type name, then field name
pub type PatchTable = IndexMap<String, IndexMap<String, ModificationPatch>>;

#[derive(Default)]
pub struct TypeRegistry {
    definitions: IndexMap<String, TypeDefinition>,
    patches: PatchTable,
    extensions: Vec<ObjectDefinitionBlock>,
    errors: Vec<BuildError>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Registered type names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn register(
        &mut self,
        definition: TypeDefinition,
        patches: IndexMap<String, ModificationPatch>,
    ) {
        if scalars::is_builtin_scalar(&definition.name) {
            self.errors.push(BuildError::InvalidDefinition {
                type_name: definition.name.clone(),
                message: "built-in scalar names cannot be redeclared".to_string(),
            });
            return;
        }
        if self.definitions.contains_key(&definition.name) {
            self.errors
                .push(BuildError::DuplicateType(definition.name.clone()));
            return;
        }
        if let Err(e) = check_unique_fields(&definition.name, &definition.fields) {
            self.errors.push(e);
            return;
        }

        debug!(
            "Registered {} type '{}' ({} fields, {} patches)",
            definition.kind,
            definition.name,
            definition.fields.len(),
            patches.len()
        );
        if !patches.is_empty() {
            self.patches.insert(definition.name.clone(), patches);
        }
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Queue additions to an object type declared anywhere in the build
    pub(crate) fn extend(&mut self, block: ObjectDefinitionBlock) {
        self.extensions.push(block);
    }

    /// Apply extensions, add the default root type and hand over the
    /// definitions and patches. The first recorded error aborts the build.
    pub(crate) fn finish(mut self) -> Result<(IndexMap<String, TypeDefinition>, PatchTable)> {
        if let Some(first) = self.errors.drain(..).next() {
            return Err(first);
        }

        let extensions = std::mem::take(&mut self.extensions);
        for block in extensions {
            self.apply_extension(block)?;
        }

        if !self.definitions.contains_key(QUERY) {
            warn!("No '{}' type declared, adding one with an 'ok: Boolean!' field", QUERY);
            let mut query = TypeDefinition::new(QUERY, TypeKind::Object);
            let mut ok = FieldDescriptor::new(QUERY, "ok", scalars::BOOLEAN);
            ok.ty = ok.ty.non_null();
            ok.resolve(|_, _, _| Ok(json!(true)));
            query.fields.push(ok);
            self.definitions.insert(QUERY.to_string(), query);
        }

        Ok((self.definitions, self.patches))
    }

    fn apply_extension(&mut self, block: ObjectDefinitionBlock) -> Result<()> {
        let name = block.type_name().to_string();
        let (addition, patches) = block.into_parts(TypeKind::Object);

        if !self.definitions.contains_key(&name) {
            if name == QUERY || name == MUTATION {
                debug!("Creating root type '{}' from field extensions", name);
                self.definitions
                    .insert(name.clone(), TypeDefinition::new(name.clone(), TypeKind::Object));
            } else {
                return Err(BuildError::InvalidDefinition {
                    type_name: name,
                    message: "cannot extend a type that is never declared".to_string(),
                });
            }
        }

        let Some(target) = self.definitions.get_mut(&name) else {
            return Err(BuildError::InvalidDefinition {
                type_name: name,
                message: "extension target disappeared".to_string(),
            });
        };
        if target.kind != TypeKind::Object {
            return Err(BuildError::InvalidDefinition {
                type_name: name,
                message: format!("only object types can be extended, found {}", target.kind),
            });
        }

        target.fields.extend(addition.fields);
        check_unique_fields(&name, &target.fields)?;
        for interface in addition.interfaces {
            if !target.interfaces.contains(&interface) {
                target.interfaces.push(interface);
            }
        }
        if target.description.is_none() {
            target.description = addition.description;
        }
        if addition.is_type_of.is_some() {
            target.is_type_of = addition.is_type_of;
        }

        let pending = self.patches.entry(name).or_default();
        for (field, patch) in patches {
            pending.insert(field, patch);
        }
        Ok(())
    }
}

fn check_unique_fields(type_name: &str, fields: &[FieldDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(BuildError::DuplicateField {
                type_name: type_name.to_string(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, fields: &[&str]) -> TypeDefinition {
        let mut definition = TypeDefinition::new(name, TypeKind::Object);
        for field in fields {
            definition
                .fields
                .push(FieldDescriptor::new(name, *field, scalars::STRING));
        }
        definition
    }

    #[test]
    fn test_duplicate_type_is_reported_on_finish() {
        let mut registry = TypeRegistry::new();
        registry.register(object("User", &["name"]), IndexMap::new());
        registry.register(object("User", &["email"]), IndexMap::new());

        assert_eq!(registry.len(), 1);
        let err = registry.finish().unwrap_err();
        assert_eq!(err, BuildError::DuplicateType("User".to_string()));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register(object("User", &["name", "name"]), IndexMap::new());
        assert!(matches!(
            registry.finish(),
            Err(BuildError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_builtin_scalar_cannot_be_redeclared() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDefinition::new("String", TypeKind::Scalar), IndexMap::new());
        assert!(matches!(
            registry.finish(),
            Err(BuildError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_default_query_is_injected() {
        let registry = TypeRegistry::new();
        let (definitions, _) = registry.finish().unwrap();
        let query = &definitions[QUERY];
        assert_eq!(query.fields.len(), 1);
        assert_eq!(query.fields[0].name, "ok");
        assert_eq!(query.fields[0].ty.to_string(), "Boolean!");
    }

    #[test]
    fn test_extension_creates_query_root() {
        let mut registry = TypeRegistry::new();
        let mut block = ObjectDefinitionBlock::new(QUERY);
        block.string("hello");
        registry.extend(block);

        let (definitions, _) = registry.finish().unwrap();
        let query = &definitions[QUERY];
        assert_eq!(query.fields.len(), 1);
        assert_eq!(query.fields[0].name, "hello");
    }

    #[test]
    fn test_extension_of_undeclared_type_fails() {
        let mut registry = TypeRegistry::new();
        registry.extend(ObjectDefinitionBlock::new("Ghost"));
        assert!(matches!(
            registry.finish(),
            Err(BuildError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_extension_merges_fields_and_patches() {
        let mut registry = TypeRegistry::new();
        registry.register(object("User", &["name"]), IndexMap::new());

        let mut block = ObjectDefinitionBlock::new("User");
        block.string("email");
        block.implements(["Node"]);
        block.modify("id").description("extended");
        registry.extend(block);

        let (definitions, patches) = registry.finish().unwrap();
        let user = &definitions["User"];
        assert_eq!(user.fields.len(), 2);
        assert_eq!(user.interfaces, vec!["Node"]);
        assert!(patches["User"].contains_key("id"));
    }
}
