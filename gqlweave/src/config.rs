// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Build configuration
//!
//! Controls how abstract types (interfaces and unions) are mapped to concrete
//! object types at execution time, and whether missing type resolution is
//! rejected while building or deferred to query time.

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Strategy used for every abstract type in one schema build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AbstractTypeStrategy {
    /// The abstract type supplies a `resolve_type` function
    #[default]
    #[serde(rename = "resolveType")]
    ResolveType,
    /// Each concrete type supplies an `is_type_of` predicate
    #[serde(rename = "isTypeOf")]
    IsTypeOf,
    /// The resolved value carries its concrete type in `__typename`
    #[serde(rename = "__typename")]
    Discriminant,
}

impl fmt::Display for AbstractTypeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractTypeStrategy::ResolveType => write!(f, "resolveType"),
            AbstractTypeStrategy::IsTypeOf => write!(f, "isTypeOf"),
            AbstractTypeStrategy::Discriminant => write!(f, "__typename"),
        }
    }
}

/// Schema build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default)]
    pub abstract_type_strategy: AbstractTypeStrategy,

    /// Reject reachable abstract types without type resolution at build time
    #[serde(default)]
    pub strict_abstract_type_validation: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl BuildConfig {
    /// Missing abstract type resolution aborts the build
    pub fn strict() -> Self {
        Self {
            abstract_type_strategy: AbstractTypeStrategy::ResolveType,
            strict_abstract_type_validation: true,
        }
    }

    /// Missing abstract type resolution surfaces as a query error
    pub fn lenient() -> Self {
        Self {
            abstract_type_strategy: AbstractTypeStrategy::ResolveType,
            strict_abstract_type_validation: false,
        }
    }

    pub fn with_strategy(mut self, strategy: AbstractTypeStrategy) -> Self {
        self.abstract_type_strategy = strategy;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_abstract_type_validation = strict;
        self
    }

    /// Parse the JSON configuration surface
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
