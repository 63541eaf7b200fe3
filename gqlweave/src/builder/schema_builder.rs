// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Entry point for declaring a schema
//!
//! ```ignore
//! let mut builder = SchemaBuilder::new(BuildConfig::default());
//! builder.interface_type("Node", |t| {
//!     t.id("id").description("Some Node ID Description");
//! });
//! builder.object_type("User", |t| {
//!     t.implements(["Node"]);
//!     t.modify("id").description("Some User ID Description");
//! });
//! let schema = builder.build()?;
//! ```

use log::info;

use super::block::{
    EnumDefinitionBlock, InterfaceDefinitionBlock, ObjectDefinitionBlock, ScalarDefinitionBlock,
    UnionDefinitionBlock,
};
use super::registry::{TypeRegistry, MUTATION, QUERY};
use crate::abstract_types::AbstractTypeStrategySelector;
use crate::assembler::{AssembledSchema, SchemaAssembler};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::resolve::HierarchyResolver;
use crate::types::{FieldDescriptor, FieldType, TypeKind};

#[derive(Default)]
pub struct SchemaBuilder {
    config: BuildConfig,
    registry: TypeRegistry,
}

impl SchemaBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn object_type<F>(&mut self, name: impl Into<String>, define: F) -> &mut Self
    where
        F: FnOnce(&mut ObjectDefinitionBlock),
    {
        let mut block = ObjectDefinitionBlock::new(name);
        define(&mut block);
        let (definition, patches) = block.into_parts(TypeKind::Object);
        self.registry.register(definition, patches);
        self
    }

    pub fn interface_type<F>(&mut self, name: impl Into<String>, define: F) -> &mut Self
    where
        F: FnOnce(&mut InterfaceDefinitionBlock),
    {
        let mut block = InterfaceDefinitionBlock::new(name);
        define(&mut block);
        let (definition, patches) = block.into_parts(TypeKind::Interface);
        self.registry.register(definition, patches);
        self
    }

    pub fn union_type<F>(&mut self, name: impl Into<String>, define: F) -> &mut Self
    where
        F: FnOnce(&mut UnionDefinitionBlock),
    {
        let mut block = UnionDefinitionBlock::new(name);
        define(&mut block);
        self.registry
            .register(block.into_definition(), Default::default());
        self
    }

    pub fn enum_type<F>(&mut self, name: impl Into<String>, define: F) -> &mut Self
    where
        F: FnOnce(&mut EnumDefinitionBlock),
    {
        let mut block = EnumDefinitionBlock::new(name);
        define(&mut block);
        self.registry
            .register(block.into_definition(), Default::default());
        self
    }

    pub fn scalar_type<F>(&mut self, name: impl Into<String>, define: F) -> &mut Self
    where
        F: FnOnce(&mut ScalarDefinitionBlock),
    {
        let mut block = ScalarDefinitionBlock::new(name);
        define(&mut block);
        self.registry
            .register(block.into_definition(), Default::default());
        self
    }

    /// Add fields, interfaces or modifications to an object type declared
    /// anywhere in this build. `Query` and `Mutation` are created on demand.
    pub fn extend_type<F>(&mut self, name: impl Into<String>, define: F) -> &mut Self
    where
        F: FnOnce(&mut ObjectDefinitionBlock),
    {
        let mut block = ObjectDefinitionBlock::new(name);
        define(&mut block);
        self.registry.extend(block);
        self
    }

    pub fn query_field<F>(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
        define: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut FieldDescriptor),
    {
        self.root_field(QUERY, name.into(), ty.into(), define)
    }

    pub fn mutation_field<F>(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
        define: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut FieldDescriptor),
    {
        self.root_field(MUTATION, name.into(), ty.into(), define)
    }

    fn root_field<F>(&mut self, root: &str, name: String, ty: FieldType, define: F) -> &mut Self
    where
        F: FnOnce(&mut FieldDescriptor),
    {
        self.extend_type(root, |t| define(t.field(name, ty)))
    }

    /// Resolve, validate and assemble everything declared so far
    pub fn build(self) -> Result<AssembledSchema> {
        let (definitions, patches) = self.registry.finish()?;
        let hierarchy = HierarchyResolver::new(definitions, patches).resolve()?;
        let strategies = AbstractTypeStrategySelector::new(&self.config).select(&hierarchy)?;
        let schema = SchemaAssembler::new(hierarchy, strategies).assemble()?;
        info!(
            "Schema build finished ({}, strict abstract type validation: {})",
            self.config.abstract_type_strategy, self.config.strict_abstract_type_validation
        );
        Ok(schema)
    }

    /// Build and also return the SDL artifact
    pub fn build_with_artifacts(self) -> Result<(AssembledSchema, String)> {
        let schema = self.build()?;
        let sdl = schema.sdl();
        Ok((schema, sdl))
    }
}
