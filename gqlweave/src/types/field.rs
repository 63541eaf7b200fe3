// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Field descriptors, type references and resolver contracts

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::arg::InputArg;
use crate::error::FieldError;
use crate::execution::RequestData;

/// Resolved argument values handed to a resolver
pub type Arguments = serde_json::Map<String, JsonValue>;

/// Field resolver: `(parent value, arguments, context) -> value`
pub type ResolveFn = Arc<
    dyn Fn(&JsonValue, &Arguments, &ResolveContext<'_>) -> Result<JsonValue, FieldError>
        + Send
        + Sync,
>;

/// Declared type of a field or argument
///
/// Named references are resolved lazily by the assembler, so a field may
/// point at its own type or at a type declared later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Named(String),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> Self {
        FieldType::Named(name.into())
    }

    /// Wrap in non-null. Already non-null types are returned unchanged.
    pub fn non_null(self) -> Self {
        match self {
            FieldType::NonNull(_) => self,
            other => FieldType::NonNull(Box::new(other)),
        }
    }

    pub fn list(self) -> Self {
        FieldType::List(Box::new(self))
    }

    /// Innermost named type
    pub fn named_type(&self) -> &str {
        match self {
            FieldType::Named(name) => name,
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, FieldType::NonNull(_))
    }

    /// Strip one non-null wrapper, if any
    pub fn nullable(&self) -> &FieldType {
        match self {
            FieldType::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Named(name) => write!(f, "{}", name),
            FieldType::List(inner) => write!(f, "[{}]", inner),
            FieldType::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        FieldType::named(name)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::Named(name)
    }
}

impl From<&String> for FieldType {
    fn from(name: &String) -> Self {
        FieldType::Named(name.clone())
    }
}

/// Deprecation marker with an optional reason
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deprecation {
    pub reason: Option<String>,
}

impl Deprecation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

/// Context handed to resolvers alongside the parent value and arguments
pub struct ResolveContext<'a> {
    type_name: &'a str,
    field_name: &'a str,
    data: Option<&'a RequestData>,
}

impl<'a> ResolveContext<'a> {
    /// A context not bound to a running query, for invoking resolvers directly
    pub fn detached(type_name: &'a str, field_name: &'a str) -> Self {
        Self {
            type_name,
            field_name,
            data: None,
        }
    }

    pub(crate) fn attached(type_name: &'a str, field_name: &'a str, data: &'a RequestData) -> Self {
        Self {
            type_name,
            field_name,
            data: Some(data),
        }
    }

    /// Type that owns the field being resolved
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    pub fn field_name(&self) -> &str {
        self.field_name
    }

    /// Data attached to the request being executed
    pub fn data<T: Any + Send + Sync>(&self) -> Option<&'a T> {
        self.data.and_then(|data| data.get::<T>())
    }
}

/// The atomic unit of a type definition
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Type the field is exposed on
    pub owner: String,
    pub name: String,
    pub ty: FieldType,
    pub description: Option<String>,
    pub args: IndexMap<String, InputArg>,
    pub resolver: Option<ResolveFn>,
    pub deprecation: Option<Deprecation>,
}

impl FieldDescriptor {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ty: ty.into(),
            description: None,
            args: IndexMap::new(),
            resolver: None,
            deprecation: None,
        }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn arg(&mut self, name: impl Into<String>, arg: InputArg) -> &mut Self {
        self.args.insert(name.into(), arg);
        self
    }

    pub fn resolve<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&JsonValue, &Arguments, &ResolveContext<'_>) -> Result<JsonValue, FieldError>
            + Send
            + Sync
            + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn deprecated(&mut self, reason: impl Into<String>) -> &mut Self {
        self.deprecation = Some(Deprecation::new(reason));
        self
    }

    /// Run the resolver, falling back to reading `parent[name]`
    pub fn invoke(
        &self,
        parent: &JsonValue,
        args: &Arguments,
        ctx: &ResolveContext<'_>,
    ) -> Result<JsonValue, FieldError> {
        match &self.resolver {
            Some(resolver) => resolver(parent, args, ctx),
            None => Ok(default_resolve(parent, &self.name)),
        }
    }

    /// Argument names and types in declaration order
    pub fn arg_signature(&self) -> Vec<(&str, &FieldType)> {
        self.args
            .iter()
            .map(|(name, arg)| (name.as_str(), &arg.ty))
            .collect()
    }

    /// True when both descriptors run the same resolver instance
    pub fn shares_resolver_with(&self, other: &FieldDescriptor) -> bool {
        match (&self.resolver, &other.resolver) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// True when everything except the output type matches: arguments with
    /// their defaults, description, deprecation and resolver
    pub fn matches_apart_from_type(&self, other: &FieldDescriptor) -> bool {
        self.args == other.args
            && self.description == other.description
            && self.deprecation == other.deprecation
            && self.shares_resolver_with(other)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("description", &self.description)
            .field("args", &self.args)
            .field("resolver", &self.resolver.as_ref().map(|_| "<fn>"))
            .field("deprecation", &self.deprecation)
            .finish()
    }
}

/// Property lookup used when a field declares no resolver
pub fn default_resolve(parent: &JsonValue, field_name: &str) -> JsonValue {
    parent.get(field_name).cloned().unwrap_or(JsonValue::Null)
}
