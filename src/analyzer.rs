//! Flatten a JSON document into an ordered list of field descriptors.
//!
//! The walk is depth-first and pre-order: a container's marker field always
//! precedes every field describing its descendants, and siblings keep the
//! order they have in the source document. Downstream path resolution relies
//! on both properties.
use serde::Serialize;
use serde_json::{Map, Value};

use crate::path;

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

/// One node of the document. Containers carry no value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Composite path of the enclosing node, `None` at the document root.
    pub parent: Option<String>,
    /// Local key; `[i]` for array elements.
    pub key: String,
    pub kind: FieldKind,
    pub value: Option<Value>,
}

impl FieldKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => FieldKind::String,
            Value::Number(_) => FieldKind::Number,
            Value::Bool(_) => FieldKind::Boolean,
            Value::Null => FieldKind::Null,
            Value::Object(_) => FieldKind::Object,
            Value::Array(_) => FieldKind::Array,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, FieldKind::Object | FieldKind::Array)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Null => "null",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }
}

impl Field {
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }
}

// ------------------------------ Analyze ----------------------------------- //

/// Flatten `value` into fields. `parent` is the path the value lives at, or
/// `None` for a document root. Scalars have no children and yield nothing.
pub fn analyze(value: &Value, parent: Option<&str>) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut walker = Walker { out: &mut fields };
    match value {
        Value::Object(map) => walker.object_entries(map, parent),
        Value::Array(items) => walker.array_elements(items, parent),
        _ => {}
    }
    fields
}

struct Walker<'a> {
    out: &'a mut Vec<Field>,
}

impl Walker<'_> {
    fn object_entries(&mut self, map: &Map<String, Value>, parent: Option<&str>) {
        for (key, value) in map {
            self.node(value, parent, key.clone(), false);
        }
    }

    /// Root arrays have no parent segment, so their keys stay bare.
    fn array_elements(&mut self, items: &[Value], parent: Option<&str>) {
        for (index, value) in items.iter().enumerate() {
            self.node(value, parent, path::index_key(index), true);
        }
    }

    fn node(&mut self, value: &Value, parent: Option<&str>, key: String, parent_is_array: bool) {
        let kind = FieldKind::of(value);
        if !kind.is_container() {
            self.out.push(Field {
                parent: parent.map(str::to_string),
                key,
                kind,
                value: Some(value.clone()),
            });
            return;
        }

        let own_path = path::compose(parent, &key, parent_is_array);
        self.out.push(Field {
            parent: parent.map(str::to_string),
            key,
            kind,
            value: None,
        });
        match value {
            Value::Object(map) => self.object_entries(map, Some(&own_path)),
            Value::Array(items) => self.array_elements(items, Some(&own_path)),
            _ => {}
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
