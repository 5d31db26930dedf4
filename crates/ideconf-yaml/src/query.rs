//! Dotted-path lookups over composed documents.
//!
//! A path like `runConfigurations.templates` is resolved segment by segment
//! against mapping keys. A path that does not resolve is not an error: every
//! lookup simply returns `None`.

use crate::node::{MappingRef, NodeRef, SequenceRef};

/// Entries of the mapping found at `path` below `root`.
///
/// Returns `None` if a segment is missing, an intermediate value is not a
/// mapping, or the final value is not a mapping.
///
/// # Example
///
/// ```rust
/// use ideconf_yaml::{compose_single_str, find_mapping};
///
/// let doc = compose_single_str("a: {b: {c: {x: 1}}}").unwrap().unwrap();
/// let found = find_mapping("a.b.c", doc.root_mapping().unwrap()).unwrap();
/// assert_eq!(found.get_scalar("x"), Some("1"));
/// ```
pub fn find_mapping<'a>(path: &str, root: MappingRef<'a>) -> Option<MappingRef<'a>> {
    find_node(path, root)?.as_mapping()
}

/// Elements of the sequence found at `path` below `root`.
pub fn find_sequence<'a>(path: &str, root: MappingRef<'a>) -> Option<SequenceRef<'a>> {
    find_node(path, root)?.as_sequence()
}

/// Value node found at `path` below `root`, whatever its kind.
pub fn find_node<'a>(path: &str, root: MappingRef<'a>) -> Option<NodeRef<'a>> {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        current = value.as_mapping()?;
    }
    None
}
