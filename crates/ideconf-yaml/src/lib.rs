//! # ideconf-yaml
//!
//! Composition of YAML configuration files into a graph of generic nodes.
//!
//! The [`Composer`] consumes an event stream (usually [`YamlEvents`], backed
//! by yaml-rust2) and produces a [`Document`]: an arena of scalars, sequences
//! and mappings in which aliases resolve to the very node their anchor names.
//! Merge keys (`<<`) are flagged on the owning mapping, and aliases that point
//! back into an enclosing node mark that node as part of a cycle.
//!
//! ## Design
//!
//! Nodes live in a `Vec` owned by the document and refer to each other by
//! [`NodeId`]. Borrowed views ([`NodeRef`], [`MappingRef`], [`SequenceRef`])
//! provide navigation, and [`find_mapping`] / [`find_sequence`] resolve
//! dotted paths such as `runConfigurations.templates`.
//!
//! ## Example
//!
//! ```rust
//! use ideconf_yaml::{compose_single_str, find_sequence};
//!
//! let content = r#"
//! defaults: &defaults
//!   jvmArgs: -Xmx1g
//! tasks:
//!   - build
//!   - test
//! "#;
//!
//! let doc = compose_single_str(content).unwrap().unwrap();
//! let root = doc.root_mapping().unwrap();
//! let tasks = find_sequence("tasks", root).unwrap();
//! assert_eq!(tasks.len(), 2);
//! ```

mod adapter;
mod composer;
mod emit;
mod error;
mod event;
mod mark;
mod node;
mod query;

pub use adapter::YamlEvents;
pub use composer::{Composer, compose_single_str, compose_str};
pub use error::{Error, Result};
pub use event::{CORE_TAG_PREFIX, Event, MERGE_TAG, MarkedEvent};
pub use mark::Mark;
pub use node::{Document, MappingRef, Node, NodeId, NodeKind, NodeRef, SequenceRef};
pub use query::{find_mapping, find_node, find_sequence};
