// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Schema data model
//!
//! Type definitions, field descriptors, arguments and modification patches
//! as produced by the builders and consumed by the resolver.

pub mod arg;
pub mod definition;
pub mod field;
pub mod patch;
pub mod scalars;

pub use arg::{arg, boolean_arg, float_arg, id_arg, int_arg, string_arg, InputArg};
pub use definition::{EnumValue, IsTypeOfFn, ResolveTypeFn, TypeDefinition, TypeKind};
pub use field::{
    default_resolve, Arguments, Deprecation, FieldDescriptor, FieldType, ResolveContext,
    ResolveFn,
};
pub use patch::ModificationPatch;
