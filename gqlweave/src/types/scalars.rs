// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Built-in scalar types

pub const STRING: &str = "String";
pub const INT: &str = "Int";
pub const FLOAT: &str = "Float";
pub const BOOLEAN: &str = "Boolean";
pub const ID: &str = "ID";

/// Scalars every schema knows without declaring them
pub const BUILTIN_SCALARS: [&str; 5] = [STRING, INT, FLOAT, BOOLEAN, ID];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}
