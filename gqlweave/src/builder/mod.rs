// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Schema declaration API
//!
//! [`SchemaBuilder`] owns the [`TypeRegistry`] for one build and hands a
//! definition block to each type callback.

pub mod block;
pub mod registry;
pub mod schema_builder;

pub use block::{
    DefinitionBlock, EnumDefinitionBlock, InterfaceDefinitionBlock, InterfaceKind,
    ObjectDefinitionBlock, ObjectKind, ScalarDefinitionBlock, UnionDefinitionBlock,
};
pub use registry::{PatchTable, TypeRegistry, MUTATION, QUERY};
pub use schema_builder::SchemaBuilder;
