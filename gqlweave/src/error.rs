// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for schema construction, abstract type resolution and query
//! execution

use thiserror::Error;

/// Result type alias for schema build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Fatal errors raised while building a schema.
///
/// Any of these aborts the build; no schema object is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// `modify` targeted a field that is neither declared nor inherited
    #[error("Cannot modify field '{field}' on type '{type_name}': no such field is declared or inherited")]
    Modify { type_name: String, field: String },

    /// The implements graph contains a cycle
    #[error("Interface implementation cycle detected between: {}", .types.join(", "))]
    Cycle { types: Vec<String> },

    /// Two interfaces contribute incompatible fields with the same name
    #[error("Type '{type_name}' inherits conflicting definitions of field '{field}' from '{first}' and '{second}'; add a modify or field call for '{field}' to resolve it")]
    Conflict {
        type_name: String,
        field: String,
        first: String,
        second: String,
    },

    /// A field or argument references a type that was never declared
    #[error("Unknown type '{referenced}' referenced by '{location}'")]
    TypeReference { location: String, referenced: String },

    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("Field '{field}' is declared more than once on type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("Type '{type_name}' implements unknown interface '{interface}'")]
    UnknownInterface { type_name: String, interface: String },

    #[error("Type '{type_name}' implements '{target}', which is not an interface")]
    NotAnInterface { type_name: String, target: String },

    #[error("Union '{union}' member '{member}' is not an object type")]
    InvalidUnionMember { union: String, member: String },

    /// Arguments may only use scalar or enum types
    #[error("Argument '{location}' uses '{referenced}', which is not an input type")]
    InvalidInputType { location: String, referenced: String },

    /// Objects and interfaces need fields, unions members, enums values
    #[error("Type '{0}' must not be empty")]
    EmptyType(String),

    /// An implementing type does not satisfy an interface field
    #[error("Type '{type_name}' does not correctly implement '{interface}.{field}': {reason}")]
    Conformance {
        type_name: String,
        interface: String,
        field: String,
        reason: String,
    },

    #[error("Abstract type '{type_name}' is reachable from a root type but provides no {strategy} type resolution")]
    MissingTypeResolution { type_name: String, strategy: String },

    #[error("Abstract type '{type_name}' mixes resolveType with isTypeOf on '{member}'")]
    MixedStrategy { type_name: String, member: String },

    /// A definition block was used in a way its type kind does not support
    #[error("Invalid definition for type '{type_name}': {message}")]
    InvalidDefinition { type_name: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BuildError {
    fn from(e: serde_json::Error) -> Self {
        BuildError::Config(e.to_string())
    }
}

/// Errors raised while mapping an abstract value to a concrete object type.
///
/// These never abort a query: the engine nulls the offending field and
/// records one error entry for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeResolutionError {
    /// The explicit resolver failed; the message is surfaced verbatim
    #[error("{message}")]
    ResolverFailed { message: String },

    #[error("Abstract type '{abstract_type}' resolved to '{resolved}', which is not a possible type")]
    NotPossibleType {
        abstract_type: String,
        resolved: String,
    },

    #[error("Abstract type '{abstract_type}' must resolve to an object type at runtime, but no isTypeOf check matched the value")]
    NoMatch { abstract_type: String },

    #[error("Abstract type '{abstract_type}' expected a '__typename' string on the resolved value")]
    MissingDiscriminant { abstract_type: String },

    #[error("Abstract type '{abstract_type}' must resolve to an object type at runtime; provide a {strategy} type resolution for it")]
    Unresolvable {
        abstract_type: String,
        strategy: String,
    },
}

/// Request-level errors. The operation does not run; the response carries
/// the error and no data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Document contains no operation")]
    NoOperation,

    #[error("Unknown operation named '{0}'")]
    UnknownOperation(String),

    #[error("Operation name is required when the document contains several operations")]
    OperationNameRequired,

    #[error("Schema does not support {0} operations")]
    UnsupportedOperation(String),

    #[error("Variable '${name}' {message}")]
    Variable { name: String, message: String },

    #[error("Unknown fragment '{0}'")]
    UnknownFragment(String),

    #[error("Fragment '{0}' spreads itself")]
    FragmentCycle(String),

    #[error("Unknown type '{0}' in type condition")]
    UnknownTypeCondition(String),

    #[error("Cannot query field '{field}' on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    #[error("Unknown argument '{argument}' on field '{type_name}.{field}'")]
    UnknownArgument {
        type_name: String,
        field: String,
        argument: String,
    },

    #[error("Field '{type_name}.{field}' of type '{ty}' must have a selection of subfields")]
    MissingSelection {
        type_name: String,
        field: String,
        ty: String,
    },

    #[error("Field '{type_name}.{field}' must not have a selection since type '{ty}' has no subfields")]
    UnexpectedSelection {
        type_name: String,
        field: String,
        ty: String,
    },
}

/// Error returned by user supplied resolvers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError { message }
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::new(message)
    }
}
