// Test-check IR handed from the transformer to the generator.
use serde::Serialize;
use serde_json::Value;

use crate::analyzer::FieldKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "testType", rename_all_fields = "camelCase")]
pub enum Assertion {
    /// Leaf scalar equals `value`.
    CheckForValue { path: String, value: Value, value_type: FieldKind },
    CheckForNull { path: String },
    /// Scalar children of an array, in element order.
    CheckArrayItems { path: String, items: Vec<ArrayItem> },
    /// Object or array with no children.
    CheckForEmpty { path: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayItem {
    pub value: Value,
    pub value_type: FieldKind,
}

impl Assertion {
    pub fn path(&self) -> &str {
        match self {
            Assertion::CheckForValue { path, .. }
            | Assertion::CheckForNull { path }
            | Assertion::CheckArrayItems { path, .. }
            | Assertion::CheckForEmpty { path } => path,
        }
    }
}
