// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Definition blocks handed to type definition callbacks
//!
//! A block accumulates the fields, `implements` declarations and pending
//! modifications of one named type. Object and interface blocks share the
//! same field API; the marker parameter only gates the kind specific calls
//! (`is_type_of` on objects, `resolve_type` on interfaces).

use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value as JsonValue;

use crate::error::FieldError;
use crate::types::{
    scalars, EnumValue, FieldDescriptor, FieldType, IsTypeOfFn, ModificationPatch,
    ResolveTypeFn, TypeDefinition, TypeKind,
};

/// Marker for object type blocks
#[derive(Debug)]
pub struct ObjectKind;

/// Marker for interface type blocks
#[derive(Debug)]
pub struct InterfaceKind;

pub type ObjectDefinitionBlock = DefinitionBlock<ObjectKind>;
pub type InterfaceDefinitionBlock = DefinitionBlock<InterfaceKind>;

/// Builder surface for an object or interface type
pub struct DefinitionBlock<K> {
    type_name: String,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
    interfaces: Vec<String>,
    patches: IndexMap<String, ModificationPatch>,
    resolve_type: Option<ResolveTypeFn>,
    is_type_of: Option<IsTypeOfFn>,
    _kind: PhantomData<K>,
}

impl<K> DefinitionBlock<K> {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            fields: Vec::new(),
            interfaces: Vec::new(),
            patches: IndexMap::new(),
            resolve_type: None,
            is_type_of: None,
            _kind: PhantomData,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Declare a field owned by this type.
    ///
    /// Redeclaring an inherited field this way replaces it outright; use
    /// [`modify`](Self::modify) to override only some attributes.
    pub fn field(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
    ) -> &mut FieldDescriptor {
        let index = self.fields.len();
        self.fields
            .push(FieldDescriptor::new(self.type_name.clone(), name, ty));
        &mut self.fields[index]
    }

    pub fn list_field(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
    ) -> &mut FieldDescriptor {
        self.field(name, ty.into().list())
    }

    pub fn string(&mut self, name: impl Into<String>) -> &mut FieldDescriptor {
        self.field(name, scalars::STRING)
    }

    pub fn int(&mut self, name: impl Into<String>) -> &mut FieldDescriptor {
        self.field(name, scalars::INT)
    }

    pub fn float(&mut self, name: impl Into<String>) -> &mut FieldDescriptor {
        self.field(name, scalars::FLOAT)
    }

    pub fn boolean(&mut self, name: impl Into<String>) -> &mut FieldDescriptor {
        self.field(name, scalars::BOOLEAN)
    }

    pub fn id(&mut self, name: impl Into<String>) -> &mut FieldDescriptor {
        self.field(name, scalars::ID)
    }

    /// Start a partial override of an inherited or own field.
    ///
    /// Calling `modify` again for the same field discards the earlier patch.
    pub fn modify(&mut self, name: impl Into<String>) -> &mut ModificationPatch {
        match self.patches.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                debug!(
                    "Replacing pending modification of {}.{}",
                    self.type_name,
                    entry.key()
                );
                entry.insert(ModificationPatch::new());
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(ModificationPatch::new()),
        }
    }

    pub fn implements<I, S>(&mut self, interfaces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for interface in interfaces {
            let interface = interface.into();
            if !self.interfaces.contains(&interface) {
                self.interfaces.push(interface);
            }
        }
        self
    }

    /// Split into the type definition and the patches awaiting resolution
    pub(crate) fn into_parts(
        self,
        kind: TypeKind,
    ) -> (TypeDefinition, IndexMap<String, ModificationPatch>) {
        let mut definition = TypeDefinition::new(self.type_name, kind);
        definition.description = self.description;
        definition.fields = self.fields;
        definition.interfaces = self.interfaces;
        definition.resolve_type = self.resolve_type;
        definition.is_type_of = self.is_type_of;
        (definition, self.patches)
    }
}

impl DefinitionBlock<ObjectKind> {
    /// Runtime shape check used by the `isTypeOf` strategy
    pub fn is_type_of<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&JsonValue) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(predicate));
        self
    }
}

impl DefinitionBlock<InterfaceKind> {
    /// Explicit type resolver used by the `resolveType` strategy
    pub fn resolve_type<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&JsonValue) -> Result<String, FieldError> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }
}

/// Builder surface for a union type
pub struct UnionDefinitionBlock {
    type_name: String,
    description: Option<String>,
    members: Vec<String>,
    resolve_type: Option<ResolveTypeFn>,
}

impl UnionDefinitionBlock {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            members: Vec::new(),
            resolve_type: None,
        }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn members<I, S>(&mut self, members: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for member in members {
            let member = member.into();
            if !self.members.contains(&member) {
                self.members.push(member);
            }
        }
        self
    }

    pub fn resolve_type<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&JsonValue) -> Result<String, FieldError> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }

    pub(crate) fn into_definition(self) -> TypeDefinition {
        let mut definition = TypeDefinition::new(self.type_name, TypeKind::Union);
        definition.description = self.description;
        definition.members = self.members;
        definition.resolve_type = self.resolve_type;
        definition
    }
}

/// Builder surface for an enum type
pub struct EnumDefinitionBlock {
    type_name: String,
    description: Option<String>,
    values: Vec<EnumValue>,
}

impl EnumDefinitionBlock {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(&mut self, name: impl Into<String>) -> &mut EnumValue {
        let index = self.values.len();
        self.values.push(EnumValue::new(name));
        &mut self.values[index]
    }

    pub fn values<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.value(name);
        }
        self
    }

    pub(crate) fn into_definition(self) -> TypeDefinition {
        let mut definition = TypeDefinition::new(self.type_name, TypeKind::Enum);
        definition.description = self.description;
        definition.values = self.values;
        definition
    }
}

/// Builder surface for a custom scalar
pub struct ScalarDefinitionBlock {
    type_name: String,
    description: Option<String>,
}

impl ScalarDefinitionBlock {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
        }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn into_definition(self) -> TypeDefinition {
        let mut definition = TypeDefinition::new(self.type_name, TypeKind::Scalar);
        definition.description = self.description;
        definition
    }
}
