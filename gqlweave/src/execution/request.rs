// Copyright (c) 2024-2025 gqlweave Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Request and response types

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use log::warn;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::QueryError;

/// Values attached to a request, keyed by their type
#[derive(Default)]
pub struct RequestData(HashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl RequestData {
    /// Store `value`, replacing an earlier value of the same type
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.0.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestData")
            .field("entries", &self.0.len())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Request {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: JsonMap<String, JsonValue>,
    pub data: RequestData,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Operation to run when the document holds several
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Variable values; anything but a JSON object is ignored
    pub fn variables(mut self, variables: JsonValue) -> Self {
        match variables {
            JsonValue::Object(map) => self.variables = map,
            JsonValue::Null => self.variables.clear(),
            other => warn!("Ignoring variables that are not an object: {}", other),
        }
        self
    }

    /// Attach a value resolvers can read through `ResolveContext::data`
    pub fn data<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.data.insert(value);
        self
    }
}

impl From<&str> for Request {
    fn from(query: &str) -> Self {
        Request::new(query)
    }
}

impl From<String> for Request {
    fn from(query: String) -> Self {
        Request::new(query)
    }
}

/// One step of the path from the response root to an errored field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        let path: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        write!(f, "{} (at {})", self.message, path.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub data: JsonValue,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_json(self) -> JsonValue {
        serde_json::to_value(&self).unwrap_or(JsonValue::Null)
    }
}

impl From<QueryError> for Response {
    fn from(error: QueryError) -> Self {
        Response {
            data: JsonValue::Null,
            errors: vec![ResponseError {
                message: error.to_string(),
                path: Vec::new(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_data_is_keyed_by_type() {
        let request = Request::new("{ ok }").data("alice".to_string()).data(7u32);
        assert_eq!(request.data.get::<String>().map(String::as_str), Some("alice"));
        assert_eq!(request.data.get::<u32>(), Some(&7));
        assert_eq!(request.data.get::<i64>(), None);
        assert_eq!(request.data.len(), 2);
    }

    #[test]
    fn test_non_object_variables_are_ignored() {
        let request = Request::new("{ ok }").variables(json!({ "id": 1 }));
        assert_eq!(request.variables.get("id"), Some(&json!(1)));
        let request = request.variables(json!([1, 2]));
        assert_eq!(request.variables.len(), 1);
    }

    #[test]
    fn test_response_serialization_omits_empty_errors() {
        let ok = Response {
            data: json!({ "ok": true }),
            errors: Vec::new(),
        };
        assert_eq!(ok.into_json(), json!({ "data": { "ok": true } }));

        let failed = Response {
            data: json!({ "user": null }),
            errors: vec![ResponseError {
                message: "Abstract".to_string(),
                path: vec![
                    PathSegment::Field("users".to_string()),
                    PathSegment::Index(1),
                    PathSegment::Field("id".to_string()),
                ],
            }],
        };
        assert_eq!(failed.errors[0].to_string(), "Abstract (at users.1.id)");
        assert_eq!(
            failed.into_json(),
            json!({
                "data": { "user": null },
                "errors": [{ "message": "Abstract", "path": ["users", 1, "id"] }]
            })
        );
    }

    #[test]
    fn test_query_error_becomes_response_without_data() {
        let response = Response::from(QueryError::NoOperation);
        assert_eq!(response.data, JsonValue::Null);
        assert_eq!(response.errors[0].message, "Document contains no operation");
    }
}
