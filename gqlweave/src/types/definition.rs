// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Named type definitions held by the registry

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::field::{Deprecation, FieldDescriptor};
use crate::error::FieldError;

/// Maps an abstract value to the name of its concrete object type
pub type ResolveTypeFn = Arc<dyn Fn(&JsonValue) -> Result<String, FieldError> + Send + Sync>;

/// Runtime shape check declared by a concrete object type
pub type IsTypeOfFn = Arc<dyn Fn(&JsonValue) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Scalar,
    Enum,
}

impl TypeKind {
    /// Interfaces and unions
    pub fn is_abstract(self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Union)
    }

    /// Usable as an argument type
    pub fn is_input(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }

    pub fn has_fields(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecation: None,
        }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(&mut self, reason: impl Into<String>) -> &mut Self {
        self.deprecation = Some(Deprecation::new(reason));
        self
    }
}

/// One named type as declared by a builder call
#[derive(Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    /// Fields declared directly on this type, in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Interfaces named in `implements`, in declaration order
    pub interfaces: Vec<String>,
    /// Union members
    pub members: Vec<String>,
    /// Enum values
    pub values: Vec<EnumValue>,
    pub resolve_type: Option<ResolveTypeFn>,
    pub is_type_of: Option<IsTypeOfFn>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            fields: Vec::new(),
            interfaces: Vec::new(),
            members: Vec::new(),
            values: Vec::new(),
            resolve_type: None,
            is_type_of: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .field("members", &self.members)
            .field("values", &self.values)
            .field("resolve_type", &self.resolve_type.is_some())
            .field("is_type_of", &self.is_type_of.is_some())
            .finish()
    }
}
