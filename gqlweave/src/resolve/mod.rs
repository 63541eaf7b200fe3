// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Inheritance resolution
//!
//! - [`graph`]: the implements graph and evaluation order
//! - [`merge`]: applying a modification patch to a field
//! - [`hierarchy`]: interface closures and effective field sets

pub mod graph;
pub mod hierarchy;
pub mod merge;

pub use graph::{ImplementsGraph, Relation};
pub use hierarchy::{
    EffectiveField, EffectiveFieldSet, HierarchyResolver, Provenance, ResolvedHierarchy,
    ResolvedType,
};
pub use merge::merge;
