//! Re-serialization of composed documents.

use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

use crate::node::{Document, NodeId, NodeKind, NodeRef};
use crate::{Error, Result};

impl Document {
    /// Convert the node graph into a yaml-rust2 value, preserving order.
    ///
    /// Scalars become strings. A node that refers back to one of its
    /// ancestors is emitted as null, so the result is always a finite tree.
    /// Duplicate mapping keys collapse with the last value winning. Merge
    /// keys are expanded into the entries they inherit, with explicit keys
    /// taking precedence, so the output needs no merge support to read back.
    pub fn to_yaml(&self) -> Yaml {
        self.root().to_yaml()
    }

    /// Serialize the document back to YAML text.
    pub fn to_yaml_string(&self) -> Result<String> {
        self.root().to_yaml_string()
    }
}

impl NodeRef<'_> {
    /// The subtree rooted at this node, as [`Document::to_yaml`] builds it.
    pub fn to_yaml(&self) -> Yaml {
        let mut ancestors = Vec::new();
        to_yaml_value(self.document(), self.id(), &mut ancestors)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        let yaml = self.to_yaml();
        let mut out = String::new();
        YamlEmitter::new(&mut out)
            .dump(&yaml)
            .map_err(|err| Error::Emit(err.to_string()))?;
        Ok(out)
    }
}

fn to_yaml_value(doc: &Document, id: NodeId, ancestors: &mut Vec<NodeId>) -> Yaml {
    if ancestors.contains(&id) {
        return Yaml::Null;
    }
    match doc.node(id).kind() {
        NodeKind::Scalar(value) => Yaml::String(value.clone()),
        NodeKind::Sequence(items) => {
            ancestors.push(id);
            let items = items
                .iter()
                .map(|&item| to_yaml_value(doc, item, ancestors))
                .collect();
            ancestors.pop();
            Yaml::Array(items)
        }
        NodeKind::Mapping(entries) => {
            ancestors.push(id);
            let mut hash = Hash::new();
            let merged = doc.node(id).is_merged();
            if merged {
                let mut visited = vec![id];
                for &(key, value) in entries {
                    if doc.node(key).is_merge_key() {
                        merge_source(doc, value, &mut hash, ancestors, &mut visited);
                    }
                }
            }
            for &(key, value) in entries {
                if merged && doc.node(key).is_merge_key() {
                    continue;
                }
                hash.insert(
                    to_yaml_value(doc, key, ancestors),
                    to_yaml_value(doc, value, ancestors),
                );
            }
            ancestors.pop();
            Yaml::Hash(hash)
        }
    }
}

/// Copy the entries a merge key inherits into `hash`: those of a mapping, or
/// of each mapping in a sequence, in order. Keys already present are
/// overwritten, so later sources win and the owner's explicit keys, written
/// afterwards, win over all of them.
fn merge_source(
    doc: &Document,
    source: NodeId,
    hash: &mut Hash,
    ancestors: &mut Vec<NodeId>,
    visited: &mut Vec<NodeId>,
) {
    match doc.node(source).kind() {
        NodeKind::Mapping(_) => merge_mapping(doc, source, hash, ancestors, visited),
        NodeKind::Sequence(items) => {
            for &item in items {
                if doc.node(item).node().is_mapping() {
                    merge_mapping(doc, item, hash, ancestors, visited);
                }
            }
        }
        NodeKind::Scalar(_) => {}
    }
}

fn merge_mapping(
    doc: &Document,
    mapping: NodeId,
    hash: &mut Hash,
    ancestors: &mut Vec<NodeId>,
    visited: &mut Vec<NodeId>,
) {
    if visited.contains(&mapping) {
        return;
    }
    visited.push(mapping);
    let NodeKind::Mapping(entries) = doc.node(mapping).kind() else {
        return;
    };
    for &(key, value) in entries {
        if doc.node(key).is_merge_key() {
            merge_source(doc, value, hash, ancestors, visited);
        }
    }
    for &(key, value) in entries {
        if !doc.node(key).is_merge_key() {
            hash.insert(
                to_yaml_value(doc, key, ancestors),
                to_yaml_value(doc, value, ancestors),
            );
        }
    }
}
