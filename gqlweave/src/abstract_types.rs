// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Abstract type strategy selection
//!
//! Decides, once per build, how every interface and union maps a runtime
//! value to one of its concrete object types. The strategy itself comes from
//! [`BuildConfig`]; this module checks that each abstract type carries the
//! information that strategy needs and packages it into an
//! [`AbstractTypeResolver`] the executable schema calls at query time.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value as JsonValue;

use crate::builder::registry::{MUTATION, QUERY};
use crate::config::{AbstractTypeStrategy, BuildConfig};
use crate::error::{BuildError, Result, TypeResolutionError};
use crate::resolve::ResolvedHierarchy;
use crate::types::{IsTypeOfFn, ResolveTypeFn, TypeKind};

/// Property read by the discriminant strategy
pub const TYPENAME_PROPERTY: &str = "__typename";

/// How one abstract type is resolved at runtime
#[derive(Clone)]
pub enum TypeResolution {
    /// The abstract type's own `resolve_type` function
    ExplicitResolver(ResolveTypeFn),
    /// `is_type_of` predicates of the possible types, tried in order
    RuntimeShapeCheck(Vec<(String, IsTypeOfFn)>),
    /// The value names its type in `__typename`
    Discriminant,
    /// Nothing available; every resolution fails at query time
    Deferred { strategy: AbstractTypeStrategy },
}

impl fmt::Debug for TypeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeResolution::ExplicitResolver(_) => write!(f, "ExplicitResolver(<fn>)"),
            TypeResolution::RuntimeShapeCheck(checks) => f
                .debug_tuple("RuntimeShapeCheck")
                .field(&checks.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>())
                .finish(),
            TypeResolution::Discriminant => write!(f, "Discriminant"),
            TypeResolution::Deferred { strategy } => {
                f.debug_struct("Deferred").field("strategy", strategy).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AbstractTypeResolver {
    abstract_type: String,
    possible_types: Vec<String>,
    resolution: TypeResolution,
}

impl AbstractTypeResolver {
    pub fn new(
        abstract_type: impl Into<String>,
        possible_types: Vec<String>,
        resolution: TypeResolution,
    ) -> Self {
        Self {
            abstract_type: abstract_type.into(),
            possible_types,
            resolution,
        }
    }

    pub fn deferred(abstract_type: impl Into<String>, strategy: AbstractTypeStrategy) -> Self {
        Self::new(abstract_type, Vec::new(), TypeResolution::Deferred { strategy })
    }

    pub fn abstract_type(&self) -> &str {
        &self.abstract_type
    }

    pub fn possible_types(&self) -> &[String] {
        &self.possible_types
    }

    pub fn resolution(&self) -> &TypeResolution {
        &self.resolution
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.resolution, TypeResolution::Deferred { .. })
    }

    /// Name of the concrete object type `value` belongs to
    pub fn resolve(&self, value: &JsonValue) -> std::result::Result<String, TypeResolutionError> {
        match &self.resolution {
            TypeResolution::ExplicitResolver(resolve_type) => {
                let name = resolve_type(value).map_err(|e| TypeResolutionError::ResolverFailed {
                    message: e.message,
                })?;
                self.check_possible(name)
            }
            TypeResolution::RuntimeShapeCheck(checks) => checks
                .iter()
                .find(|(_, is_type_of)| is_type_of(value))
                .map(|(name, _)| name.clone())
                .ok_or_else(|| TypeResolutionError::NoMatch {
                    abstract_type: self.abstract_type.clone(),
                }),
            TypeResolution::Discriminant => {
                let name = value
                    .get(TYPENAME_PROPERTY)
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| TypeResolutionError::MissingDiscriminant {
                        abstract_type: self.abstract_type.clone(),
                    })?;
                self.check_possible(name.to_string())
            }
            TypeResolution::Deferred { strategy } => Err(TypeResolutionError::Unresolvable {
                abstract_type: self.abstract_type.clone(),
                strategy: strategy.to_string(),
            }),
        }
    }

    fn check_possible(&self, name: String) -> std::result::Result<String, TypeResolutionError> {
        if self.possible_types.iter().any(|p| *p == name) {
            Ok(name)
        } else {
            Err(TypeResolutionError::NotPossibleType {
                abstract_type: self.abstract_type.clone(),
                resolved: name,
            })
        }
    }
}

/// Resolvers for every abstract type of one build
#[derive(Debug, Clone)]
pub struct StrategyPlan {
    strategy: AbstractTypeStrategy,
    resolvers: IndexMap<String, Arc<AbstractTypeResolver>>,
}

impl StrategyPlan {
    pub fn strategy(&self) -> AbstractTypeStrategy {
        self.strategy
    }

    pub fn get(&self, abstract_type: &str) -> Option<&Arc<AbstractTypeResolver>> {
        self.resolvers.get(abstract_type)
    }

    /// Resolver for `abstract_type`; unknown names get a deferred resolver
    pub fn resolver_for(&self, abstract_type: &str) -> Arc<AbstractTypeResolver> {
        match self.resolvers.get(abstract_type) {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(AbstractTypeResolver::deferred(abstract_type, self.strategy)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AbstractTypeResolver)> {
        self.resolvers
            .iter()
            .map(|(name, resolver)| (name.as_str(), resolver.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

pub struct AbstractTypeStrategySelector<'c> {
    config: &'c BuildConfig,
}

impl<'c> AbstractTypeStrategySelector<'c> {
    pub fn new(config: &'c BuildConfig) -> Self {
        Self { config }
    }

    pub fn select(&self, hierarchy: &ResolvedHierarchy) -> Result<StrategyPlan> {
        let strategy = self.config.abstract_type_strategy;
        let reachable = reachable_types(hierarchy);
        let mut resolvers = IndexMap::new();

        for resolved in hierarchy.iter().filter(|t| t.kind().is_abstract()) {
            let name = resolved.name();
            let possible: Vec<String> = hierarchy
                .possible_types(name)
                .into_iter()
                .map(str::to_string)
                .collect();
            let predicates: Vec<(String, IsTypeOfFn)> = possible
                .iter()
                .filter_map(|member| {
                    let predicate = hierarchy.get(member)?.definition.is_type_of.clone()?;
                    Some((member.clone(), predicate))
                })
                .collect();
            let resolve_type = resolved.definition.resolve_type.clone();

            if let (Some(_), Some((member, _))) = (&resolve_type, predicates.first()) {
                return Err(BuildError::MixedStrategy {
                    type_name: name.to_string(),
                    member: member.clone(),
                });
            }

            let resolution = match strategy {
                AbstractTypeStrategy::ResolveType => {
                    if !predicates.is_empty() {
                        warn!("Ignoring isTypeOf checks under '{}' while using {}", name, strategy);
                    }
                    resolve_type.map(TypeResolution::ExplicitResolver)
                }
                AbstractTypeStrategy::IsTypeOf => {
                    if resolve_type.is_some() {
                        warn!("Ignoring resolveType on '{}' while using {}", name, strategy);
                    }
                    self.shape_checks(name, &possible, predicates, &reachable)?
                }
                AbstractTypeStrategy::Discriminant => {
                    if resolve_type.is_some() || !predicates.is_empty() {
                        warn!(
                            "Ignoring type resolution functions on '{}' while using {}",
                            name, strategy
                        );
                    }
                    Some(TypeResolution::Discriminant)
                }
            };

            let resolution = match resolution {
                Some(resolution) => resolution,
                None => self.missing(name, strategy, &reachable)?,
            };
            debug!("Abstract type '{}' resolves via {:?}", name, resolution);
            resolvers.insert(
                name.to_string(),
                Arc::new(AbstractTypeResolver::new(name, possible, resolution)),
            );
        }

        Ok(StrategyPlan {
            strategy,
            resolvers,
        })
    }

    fn shape_checks(
        &self,
        name: &str,
        possible: &[String],
        predicates: Vec<(String, IsTypeOfFn)>,
        reachable: &HashSet<String>,
    ) -> Result<Option<TypeResolution>> {
        if predicates.is_empty() {
            return Ok(None);
        }
        if predicates.len() < possible.len() {
            if self.config.strict_abstract_type_validation && reachable.contains(name) {
                return Err(BuildError::MissingTypeResolution {
                    type_name: name.to_string(),
                    strategy: AbstractTypeStrategy::IsTypeOf.to_string(),
                });
            }
            warn!(
                "Only {} of {} possible types of '{}' declare isTypeOf",
                predicates.len(),
                possible.len(),
                name
            );
        }
        Ok(Some(TypeResolution::RuntimeShapeCheck(predicates)))
    }

    fn missing(
        &self,
        name: &str,
        strategy: AbstractTypeStrategy,
        reachable: &HashSet<String>,
    ) -> Result<TypeResolution> {
        if !reachable.contains(name) {
            return Ok(TypeResolution::Deferred { strategy });
        }
        if self.config.strict_abstract_type_validation {
            return Err(BuildError::MissingTypeResolution {
                type_name: name.to_string(),
                strategy: strategy.to_string(),
            });
        }
        warn!(
            "Abstract type '{}' has no {} type resolution; queries selecting it will fail",
            name, strategy
        );
        Ok(TypeResolution::Deferred { strategy })
    }
}

/// Types reachable from the root operation types through field types.
/// Abstract types pull in their possible types.
pub fn reachable_types(hierarchy: &ResolvedHierarchy) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<String> = [QUERY, MUTATION]
        .into_iter()
        .filter(|root| hierarchy.contains(root))
        .map(str::to_string)
        .collect();

    while let Some(name) = queue.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let Some(resolved) = hierarchy.get(&name) else {
            continue;
        };
        if resolved.kind().has_fields() {
            for (_, field) in resolved.fields.iter() {
                queue.push_back(field.descriptor.ty.named_type().to_string());
            }
        }
        if resolved.kind().is_abstract() {
            queue.extend(hierarchy.possible_types(&name).into_iter().map(str::to_string));
        }
    }

    seen.retain(|name| hierarchy.get(name).map_or(false, |t| t.kind() != TypeKind::Scalar));
    seen
}
