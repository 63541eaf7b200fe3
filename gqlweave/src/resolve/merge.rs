// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Field merge engine
//!
//! Applies a modification patch on top of a base field descriptor. Supplied
//! attributes replace the base value, unset attributes keep it. Arguments are
//! merged by name. The declared type is replaced without any compatibility
//! check; conformance is verified when the schema is assembled.

use log::trace;

use crate::types::{FieldDescriptor, ModificationPatch};

pub fn merge(base: &FieldDescriptor, patch: &ModificationPatch) -> FieldDescriptor {
    let mut merged = base.clone();

    if let Some(ty) = &patch.ty {
        trace!("{}.{}: type {} -> {}", base.owner, base.name, base.ty, ty);
        merged.ty = ty.clone();
    }
    if let Some(description) = &patch.description {
        merged.description = description.clone();
    }
    if let Some(resolver) = &patch.resolver {
        merged.resolver = Some(resolver.clone());
    }
    if let Some(deprecation) = &patch.deprecation {
        merged.deprecation = deprecation.clone();
    }
    for (name, arg) in &patch.args {
        // Existing names keep their position, new names are appended
        merged.args.insert(name.clone(), arg.clone());
    }

    merged
}
