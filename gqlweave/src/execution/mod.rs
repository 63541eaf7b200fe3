// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Query execution against an assembled schema
//!
//! Requests run directly over the resolved hierarchy: every object field is
//! served by its effective descriptor, so an overridden or narrowed field
//! behaves exactly as the hierarchy describes it, and introspection reports
//! each type's own field types rather than those of its interfaces.
//!
//! Execution is synchronous. Field errors null the nearest nullable position
//! and are collected into the response, request errors (syntax, unknown
//! fields, bad variables) produce no data at all.

mod executor;
mod input;
mod introspection;
mod request;

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::abstract_types::StrategyPlan;
use crate::resolve::ResolvedHierarchy;

pub use request::{PathSegment, Request, RequestData, Response, ResponseError};

pub(crate) struct SchemaInner {
    hierarchy: ResolvedHierarchy,
    strategies: StrategyPlan,
}

/// Cheaply cloneable handle that executes requests
#[derive(Clone)]
pub struct ExecutableSchema {
    inner: Arc<SchemaInner>,
}

impl ExecutableSchema {
    pub fn new(hierarchy: ResolvedHierarchy, strategies: StrategyPlan) -> Self {
        Self {
            inner: Arc::new(SchemaInner {
                hierarchy,
                strategies,
            }),
        }
    }

    pub fn hierarchy(&self) -> &ResolvedHierarchy {
        &self.inner.hierarchy
    }

    pub fn strategies(&self) -> &StrategyPlan {
        &self.inner.strategies
    }

    /// Run one operation and collect its data and errors
    pub fn execute(&self, request: impl Into<Request>) -> Response {
        let request = request.into();
        let response = executor::execute(&self.inner, &request);
        debug!(
            "Executed request with {} error(s)",
            response.errors.len()
        );
        response
    }
}

impl fmt::Debug for ExecutableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableSchema")
            .field("types", &self.inner.hierarchy.len())
            .field("strategy", &self.inner.strategies.strategy())
            .finish()
    }
}
