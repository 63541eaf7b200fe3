// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Interface hierarchy resolver
//!
//! Walks the implements graph from the root interfaces outward and computes,
//! once per type, its transitive interface closure and its effective field
//! set. Inherited fields come from each implemented interface's *effective*
//! set, so overrides made on an intermediate interface propagate to every
//! type below it. Pending `modify` patches are merged last.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use super::graph::ImplementsGraph;
use super::merge::merge;
use crate::builder::registry::PatchTable;
use crate::error::{BuildError, Result};
use crate::types::{FieldDescriptor, ModificationPatch, TypeDefinition, TypeKind};

/// Where an effective field came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Declared on the type itself
    Own,
    /// Copied verbatim from the interface that first declared it
    Inherited { origin: String },
    /// Inherited from `origin` and patched by each type in `patched_by`,
    /// outermost last
    Modified {
        origin: String,
        patched_by: Vec<String>,
    },
}

impl Provenance {
    pub fn origin(&self) -> Option<&str> {
        match self {
            Provenance::Own => None,
            Provenance::Inherited { origin } | Provenance::Modified { origin, .. } => Some(origin),
        }
    }

    /// Provenance as seen from a type that inherits the field through `via`
    fn inherited_through(&self, via: &str) -> Provenance {
        match self {
            Provenance::Own => Provenance::Inherited {
                origin: via.to_string(),
            },
            other => other.clone(),
        }
    }

    fn patched_by(self, type_name: &str) -> Provenance {
        match self {
            Provenance::Own => Provenance::Own,
            Provenance::Inherited { origin } => Provenance::Modified {
                origin,
                patched_by: vec![type_name.to_string()],
            },
            Provenance::Modified {
                origin,
                mut patched_by,
            } => {
                patched_by.push(type_name.to_string());
                Provenance::Modified { origin, patched_by }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectiveField {
    pub descriptor: FieldDescriptor,
    pub provenance: Provenance,
}

/// Final, post-merge fields a type exposes, in declaration order
#[derive(Debug, Clone, Default)]
pub struct EffectiveFieldSet {
    fields: IndexMap<String, EffectiveField>,
}

impl EffectiveFieldSet {
    pub fn get(&self, name: &str) -> Option<&EffectiveField> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EffectiveField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub definition: TypeDefinition,
    /// Transitive interface closure, direct interfaces first
    pub interfaces: Vec<String>,
    pub fields: EffectiveFieldSet,
}

impl ResolvedType {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn kind(&self) -> TypeKind {
        self.definition.kind
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

/// Output of the resolver: every type with its closure and effective fields
#[derive(Debug, Clone)]
pub struct ResolvedHierarchy {
    types: IndexMap<String, ResolvedType>,
    graph: ImplementsGraph,
}

impl ResolvedHierarchy {
    pub fn get(&self, name: &str) -> Option<&ResolvedType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Types in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn graph(&self) -> &ImplementsGraph {
        &self.graph
    }

    /// Concrete object types an abstract type can resolve to.
    ///
    /// Interfaces list their implementing objects in declaration order,
    /// unions their object members in member order.
    pub fn possible_types(&self, abstract_type: &str) -> Vec<&str> {
        match self.types.get(abstract_type).map(|t| t.kind()) {
            Some(TypeKind::Interface) => self
                .types
                .values()
                .filter(|t| t.kind() == TypeKind::Object && t.implements(abstract_type))
                .map(ResolvedType::name)
                .collect(),
            Some(TypeKind::Union) => self.types[abstract_type]
                .definition
                .members
                .iter()
                .filter(|m| {
                    matches!(self.types.get(m.as_str()), Some(t) if t.kind() == TypeKind::Object)
                })
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A same-named field offered by one of the directly implemented interfaces
struct Candidate {
    via: String,
    field: EffectiveField,
}

enum Reconciled {
    KeepExisting,
    TakeIncoming,
}

pub struct HierarchyResolver {
    definitions: IndexMap<String, TypeDefinition>,
    patches: PatchTable,
}

impl HierarchyResolver {
    pub fn new(definitions: IndexMap<String, TypeDefinition>, patches: PatchTable) -> Self {
        Self {
            definitions,
            patches,
        }
    }

    pub fn resolve(mut self) -> Result<ResolvedHierarchy> {
        if let Some(type_name) = self
            .patches
            .keys()
            .find(|name| !self.definitions.contains_key(name.as_str()))
        {
            return Err(BuildError::InvalidDefinition {
                type_name: type_name.clone(),
                message: "modifications recorded for an undeclared type".to_string(),
            });
        }

        let graph = ImplementsGraph::build(&self.definitions)?;
        let order = graph.evaluation_order()?;

        let mut resolved: HashMap<String, ResolvedType> = HashMap::with_capacity(order.len());
        for name in order {
            let Some(definition) = self.definitions.get(&name) else {
                continue;
            };
            let patches = self.patches.swap_remove(&name).unwrap_or_default();
            let resolved_type = resolve_type(definition, patches, &resolved, &graph)?;
            resolved.insert(name, resolved_type);
        }

        // Back to declaration order
        let mut types = IndexMap::with_capacity(resolved.len());
        for name in self.definitions.keys() {
            if let Some(resolved_type) = resolved.remove(name) {
                types.insert(name.clone(), resolved_type);
            }
        }

        debug!("Resolved hierarchy for {} types", types.len());
        Ok(ResolvedHierarchy { types, graph })
    }
}

fn resolve_type(
    definition: &TypeDefinition,
    patches: IndexMap<String, ModificationPatch>,
    resolved: &HashMap<String, ResolvedType>,
    graph: &ImplementsGraph,
) -> Result<ResolvedType> {
    let type_name = definition.name.as_str();

    let mut closure: IndexSet<String> = IndexSet::new();
    let mut inherited: IndexMap<String, Candidate> = IndexMap::new();

    for interface in &definition.interfaces {
        let parent = resolved
            .get(interface)
            .ok_or_else(|| BuildError::UnknownInterface {
                type_name: type_name.to_string(),
                interface: interface.clone(),
            })?;
        closure.insert(interface.clone());
        closure.extend(parent.interfaces.iter().cloned());

        for (field_name, field) in parent.fields.iter() {
            let incoming = Candidate {
                via: interface.clone(),
                field: EffectiveField {
                    descriptor: field.descriptor.clone(),
                    provenance: field.provenance.inherited_through(interface),
                },
            };
            let Some(existing) = inherited.get(field_name) else {
                inherited.insert(field_name.to_string(), incoming);
                continue;
            };

            match reconcile(graph, existing, &incoming) {
                Some(Reconciled::KeepExisting) => {}
                Some(Reconciled::TakeIncoming) => {
                    inherited.insert(field_name.to_string(), incoming);
                }
                None if definition.field(field_name).is_some()
                    || patches
                        .get(field_name)
                        .map_or(false, |patch| settles(patch, existing, &incoming)) =>
                {
                    debug!(
                        "{}.{}: '{}' and '{}' disagree, resolved by an explicit override",
                        type_name, field_name, existing.via, incoming.via
                    );
                }
                None => {
                    return Err(BuildError::Conflict {
                        type_name: type_name.to_string(),
                        field: field_name.to_string(),
                        first: existing.via.clone(),
                        second: incoming.via,
                    });
                }
            }
        }
    }

    let mut fields: IndexMap<String, EffectiveField> = inherited
        .into_iter()
        .map(|(name, mut candidate)| {
            candidate.field.descriptor.owner = type_name.to_string();
            (name, candidate.field)
        })
        .collect();

    for own in &definition.fields {
        if fields.contains_key(&own.name) {
            debug!(
                "{}.{} redeclares an inherited field; it no longer follows the interface",
                type_name, own.name
            );
        }
        fields.insert(
            own.name.clone(),
            EffectiveField {
                descriptor: own.clone(),
                provenance: Provenance::Own,
            },
        );
    }

    for (field_name, patch) in patches {
        let Some(current) = fields.get_mut(&field_name) else {
            return Err(BuildError::Modify {
                type_name: type_name.to_string(),
                field: field_name,
            });
        };
        trace!("Applying modification to {}.{}", type_name, field_name);
        let mut merged = merge(&current.descriptor, &patch);
        merged.owner = type_name.to_string();
        current.descriptor = merged;
        let provenance = std::mem::replace(&mut current.provenance, Provenance::Own);
        current.provenance = provenance.patched_by(type_name);
    }

    Ok(ResolvedType {
        definition: definition.clone(),
        interfaces: closure.into_iter().collect(),
        fields: EffectiveFieldSet { fields },
    })
}

/// Decide which of two same-named inherited fields a type receives.
/// `None` means the two are incompatible.
///
/// Between unrelated interfaces the only difference tolerated is a strictly
/// narrower output type; any other attribute that differs makes the result
/// depend on `implements` order, so it is reported instead.
fn reconcile(
    graph: &ImplementsGraph,
    existing: &Candidate,
    incoming: &Candidate,
) -> Option<Reconciled> {
    if graph.is_supertype(&existing.via, &incoming.via) {
        return Some(Reconciled::TakeIncoming);
    }
    if graph.is_supertype(&incoming.via, &existing.via) {
        return Some(Reconciled::KeepExisting);
    }

    let a = &existing.field.descriptor;
    let b = &incoming.field.descriptor;
    if !a.matches_apart_from_type(b) {
        return None;
    }
    if a.ty == b.ty {
        return Some(Reconciled::KeepExisting);
    }
    if graph.is_strict_subtype(&b.ty, &a.ty) {
        return Some(Reconciled::TakeIncoming);
    }
    if graph.is_strict_subtype(&a.ty, &b.ty) {
        return Some(Reconciled::KeepExisting);
    }
    None
}

/// A type's own patch settles a disagreement only when it leaves both
/// candidates identical
fn settles(patch: &ModificationPatch, existing: &Candidate, incoming: &Candidate) -> bool {
    let a = merge(&existing.field.descriptor, patch);
    let b = merge(&incoming.field.descriptor, patch);
    a.ty == b.ty && a.matches_apart_from_type(&b)
}
