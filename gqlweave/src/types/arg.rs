// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Field argument definitions

use serde_json::Value as JsonValue;

use super::field::FieldType;
use super::scalars;

/// A single field argument
#[derive(Debug, Clone, PartialEq)]
pub struct InputArg {
    pub ty: FieldType,
    pub description: Option<String>,
    pub default: Option<JsonValue>,
}

impl InputArg {
    pub fn new(ty: impl Into<FieldType>) -> Self {
        Self {
            ty: ty.into(),
            description: None,
            default: None,
        }
    }

    pub fn non_null(mut self) -> Self {
        self.ty = self.ty.non_null();
        self
    }

    pub fn list(mut self) -> Self {
        self.ty = self.ty.list();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<JsonValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// An argument the caller may omit
    pub fn is_optional(&self) -> bool {
        !self.ty.is_non_null() || self.default.is_some()
    }
}

pub fn arg(ty: impl Into<FieldType>) -> InputArg {
    InputArg::new(ty)
}

pub fn string_arg() -> InputArg {
    InputArg::new(scalars::STRING)
}

pub fn int_arg() -> InputArg {
    InputArg::new(scalars::INT)
}

pub fn float_arg() -> InputArg {
    InputArg::new(scalars::FLOAT)
}

pub fn boolean_arg() -> InputArg {
    InputArg::new(scalars::BOOLEAN)
}

pub fn id_arg() -> InputArg {
    InputArg::new(scalars::ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_arguments() {
        assert!(string_arg().is_optional());
        assert!(!id_arg().non_null().is_optional());
        assert!(int_arg().non_null().default_value(10).is_optional());
    }

    #[test]
    fn test_builder_sets_attributes() {
        let a = string_arg()
            .list()
            .description("Filter values")
            .default_value(json!(["a"]));
        assert_eq!(a.ty.to_string(), "[String]");
        assert_eq!(a.description.as_deref(), Some("Filter values"));
        assert_eq!(a.default, Some(json!(["a"])));
    }
}
