//! Dotted-path access to nested attribute mappings.
//!
//! `set(tree, "a.b.c", v)` behaves like `tree[a][b][c] = v`, creating each
//! missing intermediate level as an empty mapping. An existing intermediate
//! value that is not a mapping is never replaced; the write fails with
//! [`JobSpecError::AttributeConflict`] and the tree is left untouched.

use serde_json::Map;
use serde_json::Value;

use crate::JobSpecError;
use crate::Result;

/// Splits a dotted key into its parent segments and leaf segment.
fn split_key(key: &str) -> Result<(Vec<&str>, &str)> {
    let mut segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(JobSpecError::InvalidAttributePath(key.to_string()));
    }

    let leaf = segments
        .pop()
        .ok_or_else(|| JobSpecError::InvalidAttributePath(key.to_string()))?;
    Ok((segments, leaf))
}

/// Sets `value` at the dotted `key` within `tree`.
pub fn set(tree: &mut Map<String, Value>, key: &str, value: Value) -> Result<()> {
    let (parents, leaf) = split_key(key)?;

    // Levels are only created past the last existing one, so a conflict is
    // always detected before anything is inserted.
    let mut current = tree;
    let mut prefix_len = 0;
    for segment in parents {
        prefix_len += segment.len();
        let next = current
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
        current = match next {
            Value::Object(map) => map,
            _ => {
                return Err(JobSpecError::AttributeConflict {
                    path: key.to_string(),
                    conflict: key[..prefix_len].to_string(),
                });
            }
        };
        prefix_len += 1;
    }

    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Gets the value at the dotted `key` within `tree`.
///
/// Returns `None` if any level is missing or is not a mapping.
pub fn get<'a>(tree: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let (parents, leaf) = split_key(key).ok()?;
    let mut current = tree;
    for segment in parents {
        current = current.get(segment)?.as_object()?;
    }

    current.get(leaf)
}
