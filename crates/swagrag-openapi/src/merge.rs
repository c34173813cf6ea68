//! Merge rules for paths, components and extension fields.
//!
//! - Paths: keyed by `host ‖ path`, first write wins by default.
//! - Components: keyed per kind, first write wins by default, never deep-merged.
//! - Extensions: deep-merged. Mappings union by key, sequences concatenate,
//!   scalars and mismatched kinds take the last value by default.

use crate::node::{Mapping, Node};
use crate::types::{ComponentKind, Components};
use std::collections::btree_map::Entry;
use std::fmt;

/// What happens when a later source sets a key that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Keep the value merged first and drop later ones.
    #[default]
    FirstWins,
    /// Replace the value with the one merged last.
    LastWins,
}

/// Conflict policy for each field category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Combined path keys.
    pub paths: ConflictPolicy,
    /// Component definitions of every kind.
    pub components: ConflictPolicy,
    /// Scalars and mismatched kinds inside extension fields.
    pub extensions: ConflictPolicy,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            paths: ConflictPolicy::FirstWins,
            components: ConflictPolicy::FirstWins,
            extensions: ConflictPolicy::LastWins,
        }
    }
}

/// Where a conflicting key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Paths,
    Component(ComponentKind),
}

/// A path or component key that more than one source defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Paths or the component kind holding the key.
    pub section: Section,
    /// The combined path key, or the component name.
    pub key: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self.section {
            Section::Paths => "path",
            Section::Component(kind) => kind.singular(),
        };
        write!(f, "{noun} already exists for {:?}", self.key)
    }
}

/// Insert each route of `paths` into `acc` under `host ‖ path`.
///
/// The host is concatenated as-is; slashes are not normalised.
pub fn merge_paths(
    acc: &mut Mapping,
    host: &str,
    paths: Mapping,
    policy: ConflictPolicy,
) -> Vec<Conflict> {
    paths
        .into_iter()
        .filter_map(|(path, route)| insert_keyed(acc, format!("{host}{path}"), route, policy))
        .map(|key| Conflict {
            section: Section::Paths,
            key,
        })
        .collect()
}

/// Insert every component definition of `incoming` into `acc`.
///
/// Each kind is independent: a schema named `Error` never conflicts with a
/// response named `Error`.
pub fn merge_components(
    acc: &mut Components,
    incoming: Components,
    policy: ConflictPolicy,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (kind, definitions) in incoming {
        let target = acc.kind_mut(kind);
        for (key, definition) in definitions {
            if let Some(key) = insert_keyed(target, key, definition, policy) {
                conflicts.push(Conflict {
                    section: Section::Component(kind),
                    key,
                });
            }
        }
    }
    conflicts
}

/// Deep-merge every top-level extension field of `incoming` into `acc`.
pub fn merge_extensions(acc: &mut Mapping, incoming: Mapping, policy: ConflictPolicy) {
    for (key, value) in incoming {
        let merged = match acc.remove(&key) {
            Some(existing) => deep_merge_with(existing, value, policy),
            None => value,
        };
        acc.insert(key, merged);
    }
}

/// Deep merge two trees, letting `incoming` win scalar conflicts.
///
/// Merge semantics:
/// - Absent: the other side is kept
/// - Mappings: union by key (recursive)
/// - Sequences: CONCATENATE (existing items first, duplicates kept)
/// - Scalars and mismatched kinds: incoming wins
pub fn deep_merge(existing: Node, incoming: Node) -> Node {
    deep_merge_with(existing, incoming, ConflictPolicy::LastWins)
}

/// Deep merge two trees, resolving scalar and kind conflicts with `policy`.
pub fn deep_merge_with(existing: Node, incoming: Node, policy: ConflictPolicy) -> Node {
    match (existing, incoming) {
        (existing, Node::Absent) => existing,
        (Node::Absent, incoming) => incoming,

        (Node::Sequence(mut items), Node::Sequence(more)) => {
            items.extend(more);
            Node::Sequence(items)
        }

        (Node::Mapping(mut map), Node::Mapping(overlay)) => {
            for (key, value) in overlay {
                let merged = match map.remove(&key) {
                    Some(current) => deep_merge_with(current, value, policy),
                    None => value,
                };
                map.insert(key, merged);
            }
            Node::Mapping(map)
        }

        (existing, incoming) => match policy {
            ConflictPolicy::FirstWins => existing,
            ConflictPolicy::LastWins => incoming,
        },
    }
}

/// Insert `value` under `key`. Returns the key when it was already taken.
fn insert_keyed(
    map: &mut Mapping,
    key: String,
    value: Node,
    policy: ConflictPolicy,
) -> Option<String> {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            None
        }
        Entry::Occupied(mut slot) => {
            if policy == ConflictPolicy::LastWins {
                slot.insert(value);
            }
            Some(slot.key().clone())
        }
    }
}
