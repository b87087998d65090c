//! Fields → assertions.
//!
//! A leaf's path depends on whether its parent is an array, and that is only
//! known once the parent's own field has been seen. Fields must therefore be
//! consumed in the analyzer's pre-order; `ContainerKinds` records each
//! container as it goes by and lives for exactly one `transform` call.
pub mod simplify;

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::analyzer::{Field, FieldKind};
use crate::ir::Assertion;
use crate::options::TransformerOptions;
use crate::path;

// ------------------------------ State ------------------------------------- //

/// Composite path → kind, for every container seen so far.
#[derive(Debug, Default)]
pub struct ContainerKinds {
    kinds: HashMap<String, FieldKind>,
}

impl ContainerKinds {
    pub fn record(&mut self, path: String, kind: FieldKind) {
        self.kinds.insert(path, kind);
    }

    pub fn is_array(&self, path: Option<&str>) -> bool {
        path.and_then(|p| self.kinds.get(p)) == Some(&FieldKind::Array)
    }

    /// Full path of `field`, given what is known about its parent.
    pub fn path_of(&self, field: &Field) -> String {
        let parent = field.parent.as_deref();
        path::compose(parent, &field.key, self.is_array(parent))
    }
}

/// An assertion plus the parent of the leaf it came from, which array
/// simplification needs to find the per-element checks it replaces.
#[derive(Debug)]
pub(crate) struct Pending {
    pub(crate) leaf_parent: Option<String>,
    pub(crate) assertion: Assertion,
}

// ----------------------------- Transform ---------------------------------- //

pub fn transform(fields: &[Field], options: &TransformerOptions) -> Vec<Assertion> {
    let mut kinds = ContainerKinds::default();

    // Any path that appears as a parent has at least one child.
    let parents: HashSet<&str> = if options.check_empty_containers {
        fields.iter().filter_map(|f| f.parent.as_deref()).collect()
    } else {
        HashSet::new()
    };

    let mut pending = Vec::with_capacity(fields.len());
    for field in fields {
        let path = kinds.path_of(field);
        if field.is_container() {
            if options.check_empty_containers && !parents.contains(path.as_str()) {
                pending.push(Pending {
                    leaf_parent: None,
                    assertion: Assertion::CheckForEmpty { path: path.clone() },
                });
            }
            kinds.record(path, field.kind);
        } else {
            pending.push(Pending {
                leaf_parent: field.parent.clone(),
                assertion: leaf_assertion(field, path),
            });
        }
    }

    if options.simplify_arrays {
        pending = simplify::fold_array_items(fields, pending, &kinds);
    }

    debug!(fields = fields.len(), assertions = pending.len(), "transformed fields");
    pending.into_iter().map(|p| p.assertion).collect()
}

fn leaf_assertion(field: &Field, path: String) -> Assertion {
    match field.kind {
        FieldKind::Null => Assertion::CheckForNull { path },
        kind => Assertion::CheckForValue {
            path,
            value: field.value.clone().unwrap_or(Value::Null),
            value_type: kind,
        },
    }
}

// ------------------------------- Tests ------------------------------------ //
