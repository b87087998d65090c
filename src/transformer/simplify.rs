use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use super::{ContainerKinds, Pending};
use crate::analyzer::{Field, FieldKind};
use crate::ir::{ArrayItem, Assertion};

/// Replace the per-element checks of every array's scalar children with one
/// `CheckArrayItems`, appended after everything else in array order.
///
/// Only direct scalar children are folded. Objects and arrays inside an array
/// keep their own assertions, including their own aggregate.
pub(super) fn fold_array_items(
    fields: &[Field],
    pending: Vec<Pending>,
    kinds: &ContainerKinds,
) -> Vec<Pending> {
    // Seeded in marker order so aggregates come out in document order even
    // when a nested array's scalars precede the outer array's.
    let mut groups: IndexMap<String, Vec<ArrayItem>> = fields
        .iter()
        .filter(|f| f.kind == FieldKind::Array)
        .map(|f| (kinds.path_of(f), Vec::new()))
        .collect();

    for field in fields.iter().filter(|f| !f.is_container()) {
        let Some(parent) = field.parent.as_deref() else { continue };
        if let Some(items) = groups.get_mut(parent) {
            items.push(ArrayItem {
                value: field.value.clone().unwrap_or(Value::Null),
                value_type: field.kind,
            });
        }
    }

    let mut out: Vec<Pending> = pending
        .into_iter()
        .filter(|p| !p.leaf_parent.as_deref().is_some_and(|parent| groups.contains_key(parent)))
        .collect();

    for (path, items) in groups {
        if items.is_empty() {
            continue;
        }
        trace!(%path, items = items.len(), "folded array items");
        out.push(Pending {
            leaf_parent: None,
            assertion: Assertion::CheckArrayItems { path, items },
        });
    }
    out
}
