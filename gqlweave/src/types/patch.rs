// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Partial field redefinitions recorded by `modify`
//!
//! Every attribute is optional. `None` means "not supplied, keep the base
//! value"; for attributes that can be cleared, `Some(None)` means "supplied
//! as empty". Arguments are keyed by name and only the supplied entries are
//! present.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::arg::InputArg;
use super::field::{Arguments, Deprecation, FieldType, ResolveContext, ResolveFn};
use crate::error::FieldError;

#[derive(Clone, Default)]
pub struct ModificationPatch {
    pub ty: Option<FieldType>,
    pub description: Option<Option<String>>,
    pub args: IndexMap<String, InputArg>,
    pub resolver: Option<ResolveFn>,
    pub deprecation: Option<Option<Deprecation>>,
}

impl ModificationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the declared type, usually narrowing it
    pub fn ty(&mut self, ty: impl Into<FieldType>) -> &mut Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(&mut self) -> &mut Self {
        self.description = Some(None);
        self
    }

    /// Add an argument, or replace the inherited one of the same name
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
        self.deprecation = Some(Some(Deprecation::new(reason)));
        self
    }

    pub fn undeprecated(&mut self) -> &mut Self {
        self.deprecation = Some(None);
        self
    }

    /// No attribute was supplied
    pub fn is_empty(&self) -> bool {
        self.ty.is_none()
            && self.description.is_none()
            && self.args.is_empty()
            && self.resolver.is_none()
            && self.deprecation.is_none()
    }
}

impl fmt::Debug for ModificationPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModificationPatch")
            .field("ty", &self.ty)
            .field("description", &self.description)
            .field("args", &self.args)
            .field("resolver", &self.resolver.as_ref().map(|_| "<fn>"))
            .field("deprecation", &self.deprecation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::arg::string_arg;

    #[test]
    fn test_new_patch_is_empty() {
        assert!(ModificationPatch::new().is_empty());
    }

    #[test]
    fn test_cleared_description_differs_from_unset() {
        let mut cleared = ModificationPatch::new();
        cleared.clear_description();
        assert_eq!(cleared.description, Some(None));
        assert!(!cleared.is_empty());

        let unset = ModificationPatch::new();
        assert_eq!(unset.description, None);
    }

    #[test]
    fn test_args_are_keyed_by_name() {
        let mut patch = ModificationPatch::new();
        patch
            .arg("first", string_arg())
            .arg("first", string_arg().non_null());
        assert_eq!(patch.args.len(), 1);
        assert_eq!(patch.args["first"].ty.to_string(), "String!");
    }
}
