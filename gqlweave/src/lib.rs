// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! gqlweave - code-first GraphQL schema construction
//!
//! Types are declared through definition callbacks. A type that implements
//! an interface inherits its fields and may partially override any of them
//! with `modify` instead of redeclaring the field. Interfaces implementing
//! other interfaces carry such overrides down the chain.
//!
//! # Quick Start
//!
//! ```no_run
//! use gqlweave::{BuildConfig, FieldError, SchemaBuilder};
//!
//! # fn main() -> gqlweave::Result<()> {
//! let mut builder = SchemaBuilder::new(BuildConfig::default());
//! builder.interface_type("Node", |t| {
//!     t.id("id")
//!         .description("Some Node ID Description")
//!         .resolve(|_, _, _| Err(FieldError::new("Abstract")));
//!     t.resolve_type(|value| Ok(value["kind"].as_str().unwrap_or("User").to_string()));
//! });
//! builder.object_type("User", |t| {
//!     t.implements(["Node"]);
//!     t.modify("id")
//!         .description("Some User ID Description")
//!         .resolve(|parent, _, _| Ok(parent["id"].clone()));
//! });
//! builder.query_field("user", "User", |_| {});
//!
//! let (schema, sdl) = builder.build_with_artifacts()?;
//! println!("{}", sdl);
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! SchemaBuilder ──► TypeRegistry ──► HierarchyResolver ──► StrategySelector ──► SchemaAssembler
//!  (blocks)          (definitions,     (closures, merge,      (resolveType /       (validation,
//!                     patches)          provenance)            isTypeOf /           executable
//!                                                              __typename)          schema, SDL)
//! ```
//!
//! # Module Organization
//!
//! - [`builder`] - Definition blocks, registry and [`SchemaBuilder`]
//! - [`types`] - Field descriptors, arguments, patches and type definitions
//! - [`resolve`] - Interface hierarchy resolution and the field merge engine
//! - [`abstract_types`] - Runtime type resolution for interfaces and unions
//! - [`assembler`] - Validation and SDL output
//! - [`execution`] - Query execution and introspection
//! - [`config`] - Build configuration
//! - [`error`] - Error types

pub mod abstract_types;
pub mod assembler;
pub mod builder;
pub mod config;
pub mod error;
pub mod execution;
pub mod resolve;
pub mod types;

pub use abstract_types::{
    AbstractTypeResolver, AbstractTypeStrategySelector, StrategyPlan, TypeResolution,
};
pub use assembler::{AssembledSchema, SchemaAssembler};
pub use builder::{
    EnumDefinitionBlock, InterfaceDefinitionBlock, ObjectDefinitionBlock, ScalarDefinitionBlock,
    SchemaBuilder, UnionDefinitionBlock,
};
pub use config::{AbstractTypeStrategy, BuildConfig};
pub use error::{BuildError, FieldError, QueryError, Result, TypeResolutionError};
pub use execution::{
    ExecutableSchema, PathSegment, Request, RequestData, Response, ResponseError,
};
pub use resolve::{merge, EffectiveField, EffectiveFieldSet, Provenance, ResolvedHierarchy};
pub use types::{
    arg, boolean_arg, float_arg, id_arg, int_arg, string_arg, Arguments, Deprecation,
    FieldDescriptor, FieldType, InputArg, ModificationPatch, ResolveContext, TypeKind,
};
