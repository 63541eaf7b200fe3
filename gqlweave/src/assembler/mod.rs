// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Schema assembler
//!
//! Takes the resolved hierarchy and the selected abstract type strategies,
//! validates them and wraps them into an executable schema that can also
//! print its SDL.

pub mod sdl;
pub mod validate;

use std::fmt;

use log::info;

use crate::abstract_types::StrategyPlan;
use crate::config::AbstractTypeStrategy;
use crate::error::Result;
use crate::execution::ExecutableSchema;
use crate::resolve::{EffectiveFieldSet, ResolvedHierarchy};

pub struct SchemaAssembler {
    hierarchy: ResolvedHierarchy,
    strategies: StrategyPlan,
}

impl SchemaAssembler {
    pub fn new(hierarchy: ResolvedHierarchy, strategies: StrategyPlan) -> Self {
        Self {
            hierarchy,
            strategies,
        }
    }

    pub fn assemble(self) -> Result<AssembledSchema> {
        validate::validate(&self.hierarchy)?;
        info!(
            "Assembled schema with {} types using the {} strategy",
            self.hierarchy.len(),
            self.strategies.strategy()
        );
        Ok(AssembledSchema {
            executable: ExecutableSchema::new(self.hierarchy, self.strategies),
        })
    }
}

/// A validated schema ready for query execution
#[derive(Clone)]
pub struct AssembledSchema {
    executable: ExecutableSchema,
}

impl AssembledSchema {
    /// Handle that executes requests against this schema
    pub fn executable(&self) -> &ExecutableSchema {
        &self.executable
    }

    pub fn into_executable(self) -> ExecutableSchema {
        self.executable
    }

    /// Schema definition language artifact
    pub fn sdl(&self) -> String {
        sdl::print_schema(self.hierarchy())
    }

    pub fn hierarchy(&self) -> &ResolvedHierarchy {
        self.executable.hierarchy()
    }

    pub fn effective_fields(&self, type_name: &str) -> Option<&EffectiveFieldSet> {
        self.hierarchy().get(type_name).map(|t| &t.fields)
    }

    /// Transitive interface closure of a type
    pub fn interfaces_of(&self, type_name: &str) -> Option<&[String]> {
        self.hierarchy()
            .get(type_name)
            .map(|t| t.interfaces.as_slice())
    }

    pub fn possible_types(&self, abstract_type: &str) -> Vec<&str> {
        self.hierarchy().possible_types(abstract_type)
    }

    pub fn strategy(&self) -> AbstractTypeStrategy {
        self.strategies().strategy()
    }

    pub fn strategies(&self) -> &StrategyPlan {
        self.executable.strategies()
    }
}

impl fmt::Debug for AssembledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssembledSchema")
            .field("types", &self.hierarchy().len())
            .field("strategy", &self.strategy())
            .finish()
    }
}
