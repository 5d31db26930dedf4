//! Binding mapping entries onto option objects.
//!
//! Binding is forgiving: entries that name no property, or whose node kind
//! does not fit the property, are skipped and binding carries on. Map and
//! collection properties are replaced as a whole, so binding the same
//! entries twice gives the same object as binding them once.

use std::collections::HashSet;

use ideconf_yaml::{MappingRef, NodeId, NodeKind, NodeRef};
use tracing::debug;

use crate::property::{CollectionProperty, MapProperty, ScalarProperty, StoredProperty};
use crate::registry::PropertyRegistry;

impl<T> PropertyRegistry<T> {
    /// Apply `entries` to `target` and return it.
    pub fn bind<'t>(&self, target: &'t mut T, entries: MappingRef<'_>) -> &'t mut T {
        self.bind_observed(target, entries, &mut |_| {})
    }

    /// Like [`bind`](Self::bind), calling `observer` with the name of every
    /// property that was set.
    pub fn bind_observed<'t>(
        &self,
        target: &'t mut T,
        entries: MappingRef<'_>,
        observer: &mut dyn FnMut(&str),
    ) -> &'t mut T {
        let mut binder = Binder {
            registry: self,
            observer,
            visited: HashSet::new(),
        };
        binder.bind_mapping(target, entries);
        target
    }
}

struct Binder<'r, 'o, T> {
    registry: &'r PropertyRegistry<T>,
    observer: &'o mut dyn FnMut(&str),
    /// Mappings already applied in this call; guards against merge cycles.
    visited: HashSet<NodeId>,
}

impl<T> Binder<'_, '_, T> {
    fn bind_mapping(&mut self, target: &mut T, entries: MappingRef<'_>) {
        if !self.visited.insert(entries.node().id()) {
            debug!(mark = %entries.node().mark(), "mapping already bound, skipping");
            return;
        }

        // Inherited entries first, so explicit keys override them wherever
        // the merge key appears.
        for (key, value) in entries.iter().filter(|(key, _)| key.is_merge_key()) {
            self.bind_merged(target, value);
        }

        let registry = self.registry;
        for (key, value) in entries.iter().filter(|(key, _)| !key.is_merge_key()) {
            let Some(name) = key.as_scalar() else {
                debug!(mark = %key.mark(), "non-scalar key skipped");
                continue;
            };
            let Some(property) = registry.get(name) else {
                debug!(
                    type_name = registry.type_name(),
                    key = name,
                    "unknown property skipped"
                );
                continue;
            };

            let bound = match (property, value.kind()) {
                (StoredProperty::Scalar(p), NodeKind::Scalar(text)) => {
                    bind_scalar(p, target, text)
                }
                (StoredProperty::Map(p), NodeKind::Mapping(_)) => bind_map(p, target, value),
                (StoredProperty::Collection(p), NodeKind::Sequence(_)) => {
                    bind_collection(p, target, value)
                }
                _ => {
                    debug!(
                        property = property.name(),
                        mark = %value.mark(),
                        "node kind does not match property, skipped"
                    );
                    false
                }
            };
            if bound {
                (self.observer)(property.name());
            }
        }
    }

    /// Inherit the entries of a merged mapping, or of each mapping in a
    /// merged sequence, in document order.
    fn bind_merged(&mut self, target: &mut T, value: NodeRef<'_>) {
        if let Some(mapping) = value.as_mapping() {
            self.bind_mapping(target, mapping);
        } else if let Some(sequence) = value.as_sequence() {
            for item in sequence.iter() {
                match item.as_mapping() {
                    Some(mapping) => self.bind_mapping(target, mapping),
                    None => debug!(mark = %item.mark(), "merge source is not a mapping"),
                }
            }
        } else {
            debug!(mark = %value.mark(), "merge source is not a mapping");
        }
    }
}

fn bind_scalar<T>(property: &ScalarProperty<T>, target: &mut T, text: &str) -> bool {
    match property.set_from_str(target, text) {
        Ok(()) => true,
        Err(err) => {
            debug!(property = property.name(), error = %err, "value skipped");
            false
        }
    }
}

fn bind_map<T>(property: &MapProperty<T>, target: &mut T, value: NodeRef<'_>) -> bool {
    let Some(entries) = value.as_mapping() else {
        return false;
    };
    property.clear(target);
    for (key, value) in entries.iter() {
        match (key.as_scalar(), value.as_scalar()) {
            (Some(key), Some(value)) => property.put(target, key.to_string(), value.to_string()),
            _ => debug!(
                property = property.name(),
                mark = %key.mark(),
                "non-scalar map entry skipped"
            ),
        }
    }
    true
}

fn bind_collection<T>(property: &CollectionProperty<T>, target: &mut T, value: NodeRef<'_>) -> bool {
    let Some(items) = value.as_sequence() else {
        return false;
    };
    property.clear(target);
    for item in items.iter() {
        match item.as_scalar() {
            Some(text) => property.add(target, text.to_string()),
            None => debug!(
                property = property.name(),
                mark = %item.mark(),
                "non-scalar element skipped"
            ),
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Options, RegistryBuilder};
    use ideconf_yaml::compose_single_str;

    #[derive(Debug, Default, PartialEq)]
    struct Job {
        name: String,
        retries: i64,
    }

    impl Options for Job {
        fn describe(registry: &mut RegistryBuilder<Self>) {
            registry
                .string("name", |o, v| o.name = v)
                .integer("retries", |o, v| o.retries = v);
        }
    }

    #[test]
    fn test_invalid_scalar_keeps_previous_value() {
        let doc = compose_single_str("name: a\nretries: many\n")
            .unwrap()
            .unwrap();
        let registry = PropertyRegistry::<Job>::build();
        let mut job = Job {
            retries: 3,
            ..Job::default()
        };
        let mut seen = Vec::new();
        registry.bind_observed(&mut job, doc.root_mapping().unwrap(), &mut |p| {
            seen.push(p.to_string())
        });
        assert_eq!(job.name, "a");
        assert_eq!(job.retries, 3);
        assert_eq!(seen, vec!["name".to_string()]);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let doc = compose_single_str("name: first\nname: second\n")
            .unwrap()
            .unwrap();
        let registry = PropertyRegistry::<Job>::build();
        let mut job = Job::default();
        registry.bind(&mut job, doc.root_mapping().unwrap());
        assert_eq!(job.name, "second");
    }

    #[test]
    fn test_explicit_key_overrides_later_merge() {
        let content = "base: &base\n  name: inherited\n  retries: 2\njob:\n  name: own\n  <<: *base\n";
        let doc = compose_single_str(content).unwrap().unwrap();
        let entries = doc
            .root_mapping()
            .unwrap()
            .get("job")
            .unwrap()
            .as_mapping()
            .unwrap();
        let registry = PropertyRegistry::<Job>::build();
        let mut job = Job::default();
        registry.bind(&mut job, entries);
        assert_eq!(
            job,
            Job {
                name: "own".into(),
                retries: 2
            }
        );
    }

    #[test]
    fn test_self_merge_terminates() {
        let doc = compose_single_str("job: &job\n  name: loop\n  <<: *job\n")
            .unwrap()
            .unwrap();
        let entries = doc
            .root_mapping()
            .unwrap()
            .get("job")
            .unwrap()
            .as_mapping()
            .unwrap();
        let registry = PropertyRegistry::<Job>::build();
        let mut job = Job::default();
        registry.bind(&mut job, entries);
        assert_eq!(job.name, "loop");
    }
}
