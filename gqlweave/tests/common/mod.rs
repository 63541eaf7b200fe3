//! Shared helpers for the integration tests

#![allow(dead_code)]

use gqlweave::ExecutableSchema;
use serde_json::Value as JsonValue;

/// Install a test logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Run a query and return its data as JSON together with the error messages
pub fn execute(schema: &ExecutableSchema, query: &str) -> (JsonValue, Vec<String>) {
    let response = schema.execute(query);
    let errors = response.errors.iter().map(|e| e.message.clone()).collect();
    (response.data, errors)
}

/// Description of a field as reported by introspection
pub fn field_entry<'a>(type_info: &'a JsonValue, field: &str) -> &'a JsonValue {
    type_info["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["name"] == field))
        .unwrap_or_else(|| panic!("field '{}' missing from introspection", field))
}
