//! # TreeStore — hierarchical JSON key-value tree
//!
//! The portal's records live in one JSON tree addressed by slash-separated
//! paths (`login_credentials/{uid}`, `resources/{type}/{year}/{module}/{id}`).
//! [`TreeStore`] is the async interface the adapters talk to; implementations
//! live in sibling modules ([`crate::memory`], [`crate::file_store`]).
//!
//! ## Semantics
//!
//! - `get` returns the whole subtree at a path, or `None` when nothing is
//!   stored there.
//! - `update` applies a batch of per-path writes: `Some(value)` sets the
//!   subtree, `None` removes it. The in-memory backend applies the whole
//!   batch under one lock, so dual-writes (e.g. credential + profile record)
//!   are atomic there. The filesystem backend is atomic per top-level key
//!   only; cross-key batches are best-effort.
//! - Removing the last child of a node removes the node itself: an empty
//!   branch is indistinguishable from a missing one. Callers that need an
//!   "empty module" write a placeholder entry.

use serde_json::Value;

use crate::error::StoreError;

/// Async interface to the hierarchical record tree.
pub trait TreeStore {
    /// Read the subtree at `path`.
    fn get(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>>;

    /// Apply a batch of writes. `Some(value)` sets, `None` removes.
    fn update(
        &self,
        ops: Vec<(String, Option<Value>)>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Split a path into non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Child keys of a JSON object node, sorted. Non-objects have no children.
pub fn child_keys(value: &Value) -> Vec<String> {
    match value.as_object() {
        Some(map) => {
            let mut keys: Vec<String> = map.keys().cloned().collect();
            keys.sort();
            keys
        }
        None => Vec::new(),
    }
}

/// Resolve a path inside an in-memory tree.
pub(crate) fn get_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for seg in segments(path) {
        node = node.as_object()?.get(seg)?;
    }
    Some(node)
}

/// Set the subtree at `path`, creating intermediate objects as needed.
pub(crate) fn set_at(root: &mut Value, path: &str, value: Value) {
    let segs = segments(path);
    if segs.is_empty() {
        *root = value;
        return;
    }
    if !root.is_object() {
        *root = Value::Object(Default::default());
    }
    let mut node = root;
    for seg in &segs[..segs.len() - 1] {
        let map = node.as_object_mut().expect("node coerced to object above");
        let child = map
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        if !child.is_object() {
            *child = Value::Object(Default::default());
        }
        node = child;
    }
    node.as_object_mut()
        .expect("node coerced to object above")
        .insert(segs[segs.len() - 1].to_string(), value);
}

/// Remove the subtree at `path`, pruning branches left empty.
pub(crate) fn remove_at(root: &mut Value, path: &str) {
    fn walk(node: &mut Value, segs: &[&str]) {
        let Some(map) = node.as_object_mut() else {
            return;
        };
        match segs {
            [] => {}
            [leaf] => {
                map.remove(*leaf);
            }
            [head, rest @ ..] => {
                if let Some(child) = map.get_mut(*head) {
                    walk(child, rest);
                    if child.as_object().is_some_and(|m| m.is_empty()) {
                        map.remove(*head);
                    }
                }
            }
        }
    }
    let segs = segments(path);
    walk(root, &segs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut root = Value::Object(Default::default());
        set_at(&mut root, "a/b/c", json!(1));
        assert_eq!(get_at(&root, "a/b/c"), Some(&json!(1)));
        assert_eq!(get_at(&root, "a/b"), Some(&json!({"c": 1})));
        assert_eq!(get_at(&root, "a/x"), None);
    }

    #[test]
    fn test_remove_prunes_empty_branches() {
        let mut root = Value::Object(Default::default());
        set_at(&mut root, "r/2024/compta/f1", json!({"name": "a"}));
        set_at(&mut root, "r/2024/droit/f2", json!({"name": "b"}));

        remove_at(&mut root, "r/2024/compta/f1");
        // compta had a single child, so the module node vanishes too.
        assert_eq!(get_at(&root, "r/2024/compta"), None);
        assert!(get_at(&root, "r/2024/droit/f2").is_some());
    }

    #[test]
    fn test_set_overwrites_scalar_with_object() {
        let mut root = json!({"a": 1});
        set_at(&mut root, "a/b", json!(2));
        assert_eq!(get_at(&root, "a/b"), Some(&json!(2)));
    }

    #[test]
    fn test_child_keys_sorted() {
        let v = json!({"b": 1, "a": 2});
        assert_eq!(child_keys(&v), vec!["a".to_string(), "b".to_string()]);
        assert!(child_keys(&json!(4)).is_empty());
    }
}
