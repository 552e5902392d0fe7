//! Query request bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{FieldName, FieldValue};

/// Painless source used by [`UpdateByStringQuery`]. Field and value are read
/// from the script parameters so user content never becomes script code.
const UPDATE_FIELD_SCRIPT: &str = "ctx._source[params.field] = params.value";

/// A query-string search.
///
/// Serializes to `{"query": {"query_string": {"query": "<expression>"}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringSearchQuery {
    query: QueryClause,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct QueryClause {
    query_string: QueryString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct QueryString {
    query: String,
}

impl StringSearchQuery {
    /// Create a query from a query-string expression, e.g. `string: "value"`.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            query: QueryClause {
                query_string: QueryString {
                    query: expression.into(),
                },
            },
        }
    }

    /// The query-string expression.
    pub fn expression(&self) -> &str {
        &self.query.query_string.query
    }
}

/// Request body of `_update_by_query`: a query plus an inline script that
/// assigns one field of every matching document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateByStringQuery {
    query: QueryClause,
    script: InlineScript,
}

impl UpdateByStringQuery {
    /// Build an update that sets `field` to `value` on all documents matching `query`.
    pub fn new(query: &StringSearchQuery, field: &FieldName, value: &FieldValue) -> Self {
        Self {
            query: query.query.clone(),
            script: InlineScript::assign_field(field, value),
        }
    }

    /// The script that will run against each matching document.
    pub fn script(&self) -> &InlineScript {
        &self.script
    }
}

/// An inline painless script with parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineScript {
    source: String,
    lang: String,
    params: Map<String, Value>,
}

impl InlineScript {
    /// Script assigning `value` to `field` in the document source.
    pub fn assign_field(field: &FieldName, value: &FieldValue) -> Self {
        let mut params = Map::new();
        params.insert("field".to_string(), Value::from(field.as_str()));
        params.insert("value".to_string(), value.as_json().clone());

        Self {
            source: UPDATE_FIELD_SCRIPT.to_string(),
            lang: "painless".to_string(),
            params,
        }
    }

    /// Script source code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Script parameters.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }
}
