// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Operation executor
//!
//! A request is parsed, its operation selected, its variables coerced and
//! its selections checked against the schema before any resolver runs.
//! Execution then walks the selection sets, grouping fields by response key
//! and completing every resolved value against the field's declared type.
//! A null in a non-null position propagates to the nearest nullable parent.

use std::collections::{HashMap, HashSet};

use graphql_parser::query::{
    parse_query, Definition, Directive, Document, Field, FragmentDefinition, OperationDefinition,
    Selection, SelectionSet, TypeCondition, Value, VariableDefinition,
};
use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::input::{coerce_input, field_type_of, value_to_json};
use super::introspection::{self, FieldShape, Meta};
use super::request::{PathSegment, Request, RequestData, Response, ResponseError};
use super::SchemaInner;
use crate::builder::registry::{MUTATION, QUERY};
use crate::error::QueryError;
use crate::types::{scalars, Arguments, FieldDescriptor, FieldType, ResolveContext, TypeKind};

/// A null reached a non-null position; the nearest nullable parent
/// becomes null
#[derive(Debug)]
pub(super) struct Propagate;

type Completion = Result<JsonValue, Propagate>;

/// Fields grouped by response key, in selection order
pub(super) type Grouped<'a, 'q> = IndexMap<&'a str, Vec<&'a Field<'q, String>>>;

pub(super) fn execute(schema: &SchemaInner, request: &Request) -> Response {
    let document = match parse_query::<String>(&request.query) {
        Ok(document) => document,
        Err(e) => return QueryError::Syntax(e.to_string()).into(),
    };
    let (mut executor, root, selection_set) = match Executor::prepare(schema, &document, request) {
        Ok(prepared) => prepared,
        Err(e) => {
            debug!("Rejected request: {}", e);
            return e.into();
        }
    };

    let data = executor
        .execute_object(root, &JsonValue::Null, &[selection_set], &mut Vec::new())
        .unwrap_or(JsonValue::Null);
    Response {
        data,
        errors: executor.errors,
    }
}

pub(super) struct Executor<'a, 'q> {
    pub(super) schema: &'a SchemaInner,
    fragments: HashMap<&'a str, &'a FragmentDefinition<'q, String>>,
    pub(super) variables: JsonMap<String, JsonValue>,
    data: &'a RequestData,
    errors: Vec<ResponseError>,
}

impl<'a, 'q: 'a> Executor<'a, 'q> {
    fn prepare(
        schema: &'a SchemaInner,
        document: &'a Document<'q, String>,
        request: &'a Request,
    ) -> Result<(Self, &'static str, &'a SelectionSet<'q, String>), QueryError> {
        let mut operations = Vec::new();
        let mut fragments = HashMap::new();
        for definition in &document.definitions {
            match definition {
                Definition::Operation(operation) => operations.push(operation),
                Definition::Fragment(fragment) => {
                    fragments.insert(fragment.name.as_str(), fragment);
                }
            }
        }

        let operation = select_operation(&operations, request.operation_name.as_deref())?;
        let (root, variable_definitions, selection_set): (
            &'static str,
            &'a [VariableDefinition<'q, String>],
            &'a SelectionSet<'q, String>,
        ) = match operation {
            OperationDefinition::SelectionSet(set) => (QUERY, &[], set),
            OperationDefinition::Query(query) => (
                QUERY,
                query.variable_definitions.as_slice(),
                &query.selection_set,
            ),
            OperationDefinition::Mutation(mutation) if schema.hierarchy.contains(MUTATION) => (
                MUTATION,
                mutation.variable_definitions.as_slice(),
                &mutation.selection_set,
            ),
            OperationDefinition::Mutation(_) => {
                return Err(QueryError::UnsupportedOperation("mutation".to_string()))
            }
            OperationDefinition::Subscription(_) => {
                return Err(QueryError::UnsupportedOperation("subscription".to_string()))
            }
        };

        let variables = coerce_variables(schema, variable_definitions, &request.variables)?;
        let executor = Executor {
            schema,
            fragments,
            variables,
            data: &request.data,
            errors: Vec::new(),
        };
        executor.validate_selection_set(root, selection_set, &mut Vec::new())?;
        Ok((executor, root, selection_set))
    }

    fn validate_selection_set(
        &self,
        type_name: &str,
        set: &'a SelectionSet<'q, String>,
        spreads: &mut Vec<&'a str>,
    ) -> Result<(), QueryError> {
        for item in &set.items {
            match item {
                Selection::Field(field) => self.validate_field(type_name, field, spreads)?,
                Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    let fragment = self
                        .fragments
                        .get(name)
                        .copied()
                        .ok_or_else(|| QueryError::UnknownFragment(name.to_string()))?;
                    if spreads.contains(&name) {
                        return Err(QueryError::FragmentCycle(name.to_string()));
                    }
                    let TypeCondition::On(condition) = &fragment.type_condition;
                    self.check_condition(condition)?;
                    spreads.push(name);
                    let checked =
                        self.validate_selection_set(condition, &fragment.selection_set, spreads);
                    spreads.pop();
                    checked?;
                }
                Selection::InlineFragment(inline) => {
                    let condition = match &inline.type_condition {
                        Some(TypeCondition::On(condition)) => {
                            self.check_condition(condition)?;
                            condition.as_str()
                        }
                        None => type_name,
                    };
                    self.validate_selection_set(condition, &inline.selection_set, spreads)?;
                }
            }
        }
        Ok(())
    }

    fn validate_field(
        &self,
        type_name: &str,
        field: &'a Field<'q, String>,
        spreads: &mut Vec<&'a str>,
    ) -> Result<(), QueryError> {
        let Some(shape) = self.field_shape(type_name, &field.name) else {
            return Err(QueryError::UnknownField {
                type_name: type_name.to_string(),
                field: field.name.clone(),
            });
        };
        if let Some((argument, _)) = field
            .arguments
            .iter()
            .find(|(name, _)| !shape.args.contains(&name.as_str()))
        {
            return Err(QueryError::UnknownArgument {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                argument: argument.clone(),
            });
        }

        let named = shape.ty.named_type();
        let has_selection = !field.selection_set.items.is_empty();
        match (self.is_composite(named), has_selection) {
            (true, true) => self.validate_selection_set(named, &field.selection_set, spreads),
            (false, false) => Ok(()),
            (true, false) => Err(QueryError::MissingSelection {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                ty: shape.ty.to_string(),
            }),
            (false, true) => Err(QueryError::UnexpectedSelection {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                ty: shape.ty.to_string(),
            }),
        }
    }

    /// Output type and argument names of a selectable field
    fn field_shape(&self, type_name: &str, field_name: &str) -> Option<FieldShape<'a>> {
        if let Some(shape) = introspection::meta_field(type_name, field_name) {
            return Some(shape);
        }
        let schema = self.schema;
        let field = schema.hierarchy.get(type_name)?.fields.get(field_name)?;
        Some(FieldShape {
            ty: field.descriptor.ty.clone(),
            args: field.descriptor.args.keys().map(String::as_str).collect(),
        })
    }

    fn is_composite(&self, type_name: &str) -> bool {
        introspection::is_meta_object(type_name)
            || self
                .schema
                .hierarchy
                .get(type_name)
                .map_or(false, |t| t.kind().has_fields() || t.kind().is_abstract())
    }

    fn check_condition(&self, condition: &str) -> Result<(), QueryError> {
        if self.is_composite(condition) {
            Ok(())
        } else {
            Err(QueryError::UnknownTypeCondition(condition.to_string()))
        }
    }

    /// Group the fields of `sets` that apply to `type_name` by response key
    pub(super) fn group(
        &self,
        type_name: &str,
        sets: &[&'a SelectionSet<'q, String>],
    ) -> Grouped<'a, 'q> {
        let mut grouped = IndexMap::new();
        let mut visited = HashSet::new();
        for set in sets {
            self.collect_fields(type_name, set, &mut grouped, &mut visited);
        }
        grouped
    }

    fn collect_fields(
        &self,
        type_name: &str,
        set: &'a SelectionSet<'q, String>,
        grouped: &mut Grouped<'a, 'q>,
        visited: &mut HashSet<&'a str>,
    ) {
        for item in &set.items {
            match item {
                Selection::Field(field) => {
                    if self.included(&field.directives) {
                        let key = field.alias.as_deref().unwrap_or(field.name.as_str());
                        grouped.entry(key).or_default().push(field);
                    }
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    if !self.included(&spread.directives) || !visited.insert(name) {
                        continue;
                    }
                    if let Some(fragment) = self.fragments.get(name).copied() {
                        let TypeCondition::On(condition) = &fragment.type_condition;
                        if self.applies(type_name, condition) {
                            self.collect_fields(type_name, &fragment.selection_set, grouped, visited);
                        }
                    }
                }
                Selection::InlineFragment(inline) => {
                    let applies = match &inline.type_condition {
                        Some(TypeCondition::On(condition)) => self.applies(type_name, condition),
                        None => true,
                    };
                    if applies && self.included(&inline.directives) {
                        self.collect_fields(type_name, &inline.selection_set, grouped, visited);
                    }
                }
            }
        }
    }

    fn applies(&self, type_name: &str, condition: &str) -> bool {
        condition == type_name
            || self
                .schema
                .hierarchy
                .possible_types(condition)
                .contains(&type_name)
    }

    /// `@skip` and `@include`
    fn included(&self, directives: &[Directive<'q, String>]) -> bool {
        directives.iter().all(|directive| {
            let condition = || {
                directive
                    .arguments
                    .iter()
                    .find(|(name, _)| name == "if")
                    .map_or(false, |(_, value)| {
                        value_to_json(value, &self.variables).as_bool() == Some(true)
                    })
            };
            match directive.name.as_str() {
                "skip" => !condition(),
                "include" => condition(),
                _ => true,
            }
        })
    }

    fn execute_object(
        &mut self,
        type_name: &str,
        parent: &JsonValue,
        sets: &[&'a SelectionSet<'q, String>],
        path: &mut Vec<PathSegment>,
    ) -> Completion {
        let grouped = self.group(type_name, sets);
        let mut object = JsonMap::new();
        for (key, fields) in grouped {
            path.push(PathSegment::Field(key.to_string()));
            let value = self.execute_field(type_name, parent, &fields, path);
            path.pop();
            object.insert(key.to_string(), value?);
        }
        Ok(JsonValue::Object(object))
    }

    fn execute_field(
        &mut self,
        type_name: &str,
        parent: &JsonValue,
        fields: &[&'a Field<'q, String>],
        path: &mut Vec<PathSegment>,
    ) -> Completion {
        let field = fields[0];
        match field.name.as_str() {
            "__typename" => return Ok(JsonValue::String(type_name.to_string())),
            "__schema" if type_name == QUERY => {
                return Ok(self.introspect(Meta::Schema, &sub_sets(fields)))
            }
            "__type" if type_name == QUERY => {
                let requested = field
                    .arguments
                    .iter()
                    .find(|(name, _)| name == "name")
                    .map(|(_, value)| value_to_json(value, &self.variables));
                let meta = requested
                    .as_ref()
                    .and_then(JsonValue::as_str)
                    .and_then(|name| self.named_type(name));
                return Ok(meta.map_or(JsonValue::Null, |meta| {
                    self.introspect(meta, &sub_sets(fields))
                }));
            }
            _ => {}
        }

        let schema = self.schema;
        let Some(effective) = schema
            .hierarchy
            .get(type_name)
            .and_then(|t| t.fields.get(&field.name))
        else {
            return Ok(JsonValue::Null);
        };
        let descriptor = &effective.descriptor;
        let args = match self.coerce_arguments(descriptor, field) {
            Ok(args) => args,
            Err(message) => return self.field_error(message, &descriptor.ty, path),
        };

        trace!("Resolving {}.{}", type_name, descriptor.name);
        let ctx = ResolveContext::attached(type_name, &descriptor.name, self.data);
        match descriptor.invoke(parent, &args, &ctx) {
            Ok(value) => self.complete_value(&descriptor.ty, value, fields, path),
            Err(e) => self.field_error(e.message, &descriptor.ty, path),
        }
    }

    /// Supplied arguments, then defaults. Variables that were not provided
    /// count as not supplied.
    fn coerce_arguments(
        &self,
        descriptor: &FieldDescriptor,
        field: &Field<'q, String>,
    ) -> Result<Arguments, String> {
        let mut args = Arguments::new();
        for (name, arg) in &descriptor.args {
            let supplied = field
                .arguments
                .iter()
                .find(|(supplied, _)| supplied == name)
                .and_then(|(_, value)| match value {
                    Value::Variable(variable) => self.variables.get(variable).cloned(),
                    literal => Some(value_to_json(literal, &self.variables)),
                });
            let value = match (supplied, &arg.default) {
                (Some(value), _) => value,
                (None, Some(default)) => default.clone(),
                (None, None) if arg.ty.is_non_null() => {
                    return Err(format!(
                        "Argument '{}' of type '{}' is required but not provided",
                        name, arg.ty
                    ))
                }
                (None, None) => continue,
            };
            let value = coerce_input(&self.schema.hierarchy, &arg.ty, value)
                .map_err(|message| format!("Invalid value for argument '{}': {}", name, message))?;
            args.insert(name.clone(), value);
        }
        Ok(args)
    }

    /// Record an error for the current field; null unless it is non-null
    fn field_error(&mut self, message: String, ty: &FieldType, path: &[PathSegment]) -> Completion {
        self.errors.push(ResponseError {
            message,
            path: path.to_vec(),
        });
        if ty.is_non_null() {
            Err(Propagate)
        } else {
            Ok(JsonValue::Null)
        }
    }

    /// Record an error and let the enclosing position decide nullability
    fn fail(&mut self, message: String, path: &[PathSegment]) -> Completion {
        self.errors.push(ResponseError {
            message,
            path: path.to_vec(),
        });
        Err(Propagate)
    }

    fn complete_value(
        &mut self,
        ty: &FieldType,
        value: JsonValue,
        fields: &[&'a Field<'q, String>],
        path: &mut Vec<PathSegment>,
    ) -> Completion {
        match ty {
            FieldType::NonNull(inner) => {
                if value.is_null() {
                    return self.fail("Cannot return null for non-nullable field".to_string(), path);
                }
                self.complete_inner(inner, value, fields, path)
            }
            _ if value.is_null() => Ok(JsonValue::Null),
            _ => Ok(self
                .complete_inner(ty, value, fields, path)
                .unwrap_or(JsonValue::Null)),
        }
    }

    fn complete_inner(
        &mut self,
        ty: &FieldType,
        value: JsonValue,
        fields: &[&'a Field<'q, String>],
        path: &mut Vec<PathSegment>,
    ) -> Completion {
        match ty {
            FieldType::NonNull(_) => self.complete_value(ty, value, fields, path),
            FieldType::List(item_ty) => {
                let items = match value {
                    JsonValue::Array(items) => items,
                    other => return self.fail(format!("Expected a list, found {}", other), path),
                };
                let mut completed = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    let value = self.complete_value(item_ty, item, fields, path);
                    path.pop();
                    completed.push(value?);
                }
                Ok(JsonValue::Array(completed))
            }
            FieldType::Named(name) => self.complete_named(name, value, fields, path),
        }
    }

    fn complete_named(
        &mut self,
        name: &str,
        value: JsonValue,
        fields: &[&'a Field<'q, String>],
        path: &mut Vec<PathSegment>,
    ) -> Completion {
        if scalars::is_builtin_scalar(name) {
            return match coerce_output(name, value) {
                Ok(value) => Ok(value),
                Err(message) => self.fail(message, path),
            };
        }

        let schema = self.schema;
        let Some(resolved) = schema.hierarchy.get(name) else {
            return Ok(value);
        };
        match resolved.kind() {
            TypeKind::Object => self.execute_object(name, &value, &sub_sets(fields), path),
            TypeKind::Interface | TypeKind::Union => {
                let resolver = schema.strategies.resolver_for(name);
                match resolver.resolve(&value) {
                    Ok(concrete) => {
                        self.execute_object(&concrete, &value, &sub_sets(fields), path)
                    }
                    Err(e) => self.fail(e.to_string(), path),
                }
            }
            TypeKind::Enum => {
                let declared = resolved
                    .definition
                    .values
                    .iter()
                    .any(|v| value.as_str() == Some(v.name.as_str()));
                if declared {
                    Ok(value)
                } else {
                    self.fail(format!("Enum '{}' cannot represent {}", name, value), path)
                }
            }
            TypeKind::Scalar => Ok(value),
        }
    }
}

pub(super) fn sub_sets<'a, 'q>(
    fields: &[&'a Field<'q, String>],
) -> Vec<&'a SelectionSet<'q, String>> {
    fields.iter().map(|field| &field.selection_set).collect()
}

fn operation_name<'a>(operation: &'a OperationDefinition<'_, String>) -> Option<&'a str> {
    match operation {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(query) => query.name.as_deref(),
        OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
    }
}

fn select_operation<'a, 'q>(
    operations: &[&'a OperationDefinition<'q, String>],
    name: Option<&str>,
) -> Result<&'a OperationDefinition<'q, String>, QueryError> {
    match name {
        Some(name) => operations
            .iter()
            .copied()
            .find(|operation| operation_name(operation) == Some(name))
            .ok_or_else(|| QueryError::UnknownOperation(name.to_string())),
        None => match operations {
            [] => Err(QueryError::NoOperation),
            [single] => Ok(*single),
            _ => Err(QueryError::OperationNameRequired),
        },
    }
}

/// Provided values, then declared defaults. Optional variables without
/// either stay unset.
fn coerce_variables(
    schema: &SchemaInner,
    definitions: &[VariableDefinition<'_, String>],
    provided: &JsonMap<String, JsonValue>,
) -> Result<JsonMap<String, JsonValue>, QueryError> {
    let mut variables = JsonMap::new();
    for definition in definitions {
        let ty = field_type_of(&definition.var_type);
        let value = match (provided.get(&definition.name), &definition.default_value) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) => value_to_json(default, &JsonMap::new()),
            (None, None) if ty.is_non_null() => {
                return Err(QueryError::Variable {
                    name: definition.name.clone(),
                    message: format!("of required type '{}' was not provided", ty),
                })
            }
            (None, None) => continue,
        };
        let value = coerce_input(&schema.hierarchy, &ty, value).map_err(|message| {
            QueryError::Variable {
                name: definition.name.clone(),
                message,
            }
        })?;
        variables.insert(definition.name.clone(), value);
    }
    Ok(variables)
}

/// Built-in scalar output coercion
fn coerce_output(name: &str, value: JsonValue) -> Result<JsonValue, String> {
    let coerced = match (name, &value) {
        (scalars::INT, JsonValue::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .filter(|int| i32::try_from(*int).is_ok())
            .map(JsonValue::from),
        (scalars::FLOAT, JsonValue::Number(_)) => Some(value.clone()),
        (scalars::STRING, JsonValue::String(_)) => Some(value.clone()),
        (scalars::STRING, JsonValue::Number(_) | JsonValue::Bool(_)) => {
            Some(JsonValue::String(value.to_string()))
        }
        (scalars::BOOLEAN, JsonValue::Bool(_)) => Some(value.clone()),
        (scalars::ID, JsonValue::String(_)) => Some(value.clone()),
        (scalars::ID, JsonValue::Number(number)) if number.is_i64() || number.is_u64() => {
            Some(JsonValue::String(number.to_string()))
        }
        _ => None,
    };
    coerced.ok_or_else(|| format!("{} cannot represent {}", name, value))
}
