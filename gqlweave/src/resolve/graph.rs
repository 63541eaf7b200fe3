// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Supertype graph over all declared types
//!
//! Edges point from an abstract type to the types it covers: from an
//! interface to each type that declares `implements` on it, and from a union
//! to each member. A path from `A` to `B` therefore means `B` can stand in
//! wherever `A` is expected.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use petgraph::algo::{has_path_connecting, kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{BuildError, Result};
use crate::types::{FieldType, TypeDefinition, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Implements,
    Member,
}

#[derive(Debug, Clone)]
pub struct ImplementsGraph {
    graph: DiGraph<String, Relation>,
    nodes: HashMap<String, NodeIndex>,
}

impl ImplementsGraph {
    /// Build the graph, rejecting `implements` edges that do not point at a
    /// declared interface
    pub fn build(definitions: &IndexMap<String, TypeDefinition>) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for name in definitions.keys() {
            nodes.insert(name.clone(), graph.add_node(name.clone()));
        }

        for definition in definitions.values() {
            let implementer = nodes[&definition.name];
            for interface in &definition.interfaces {
                let target = definitions.get(interface).ok_or_else(|| BuildError::UnknownInterface {
                    type_name: definition.name.clone(),
                    interface: interface.clone(),
                })?;
                if target.kind != TypeKind::Interface {
                    return Err(BuildError::NotAnInterface {
                        type_name: definition.name.clone(),
                        target: interface.clone(),
                    });
                }
                graph.add_edge(nodes[interface], implementer, Relation::Implements);
            }
            // Unknown and non-object members are reported by schema validation
            for member in &definition.members {
                let is_object = definitions
                    .get(member)
                    .map_or(false, |m| m.kind == TypeKind::Object);
                if is_object {
                    graph.add_edge(implementer, nodes[member], Relation::Member);
                }
            }
        }

        Ok(Self { graph, nodes })
    }

    /// Types ordered so every interface precedes its implementers
    pub fn evaluation_order(&self) -> Result<Vec<String>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .map(|index| self.graph[index].clone())
                .collect()),
            Err(cycle) => {
                let culprit = cycle.node_id();
                let mut types: Vec<String> = kosaraju_scc(&self.graph)
                    .into_iter()
                    .find(|component| component.contains(&culprit))
                    .unwrap_or_else(|| vec![culprit])
                    .into_iter()
                    .map(|index| self.graph[index].clone())
                    .collect();
                types.sort();
                debug!("Implements cycle among {:?}", types);
                Err(BuildError::Cycle { types })
            }
        }
    }

    /// `narrow` is a distinct type that can stand in for `wide`
    pub fn is_supertype(&self, wide: &str, narrow: &str) -> bool {
        if wide == narrow {
            return false;
        }
        match (self.nodes.get(wide), self.nodes.get(narrow)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    /// Covariant subtyping for field types: equal, or narrower named type,
    /// or non-null in place of nullable, applied through list wrappers
    pub fn is_subtype(&self, narrow: &FieldType, wide: &FieldType) -> bool {
        match (narrow, wide) {
            (FieldType::NonNull(n), FieldType::NonNull(w)) => self.is_subtype(n, w),
            (FieldType::NonNull(n), w) => self.is_subtype(n, w),
            (_, FieldType::NonNull(_)) => false,
            (FieldType::List(n), FieldType::List(w)) => self.is_subtype(n, w),
            (FieldType::Named(n), FieldType::Named(w)) => n == w || self.is_supertype(w, n),
            _ => false,
        }
    }

    /// Subtype that is not identical
    pub fn is_strict_subtype(&self, narrow: &FieldType, wide: &FieldType) -> bool {
        narrow != wide && self.is_subtype(narrow, wide)
    }
}
