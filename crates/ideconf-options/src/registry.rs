//! Property registries: declaration, construction and caching.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::property::{
    CollectionProperty, MapProperty, OptionEnum, PropertyShape, ScalarKind, ScalarProperty,
    StoredProperty, parse_boolean, parse_enum, parse_integer,
};

/// An option type whose fields can be bound from configuration files.
///
/// Implementations declare their properties once; the registry built from
/// the declaration is cached per type by [`RegistryCache`].
///
/// # Example
///
/// ```rust
/// use ideconf_options::{Options, RegistryBuilder};
///
/// #[derive(Default)]
/// struct GradleOptions {
///     tasks: Vec<String>,
///     offline: bool,
/// }
///
/// impl Options for GradleOptions {
///     fn describe(registry: &mut RegistryBuilder<Self>) {
///         registry
///             .collection("tasks", |o| &mut o.tasks)
///             .boolean("offline", |o, v| o.offline = v);
///     }
/// }
/// ```
pub trait Options: 'static {
    fn describe(registry: &mut RegistryBuilder<Self>)
    where
        Self: Sized;
}

/// Collects the property declarations of one option type.
pub struct RegistryBuilder<T> {
    properties: Vec<StoredProperty<T>>,
}

impl<T: 'static> RegistryBuilder<T> {
    fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    fn scalar(
        &mut self,
        name: &'static str,
        kind: ScalarKind,
        parse_and_set: crate::property::ParseAndSet<T>,
    ) -> &mut Self {
        self.properties.push(StoredProperty::Scalar(ScalarProperty {
            name,
            kind,
            parse_and_set,
        }));
        self
    }

    pub fn string(
        &mut self,
        name: &'static str,
        set: impl Fn(&mut T, String) + Send + Sync + 'static,
    ) -> &mut Self {
        self.scalar(
            name,
            ScalarKind::String,
            Box::new(move |target: &mut T, text: &str| {
                set(target, text.to_string());
                Ok(())
            }),
        )
    }

    pub fn boolean(
        &mut self,
        name: &'static str,
        set: impl Fn(&mut T, bool) + Send + Sync + 'static,
    ) -> &mut Self {
        self.scalar(
            name,
            ScalarKind::Boolean,
            Box::new(move |target: &mut T, text: &str| {
                set(target, parse_boolean(text)?);
                Ok(())
            }),
        )
    }

    pub fn integer(
        &mut self,
        name: &'static str,
        set: impl Fn(&mut T, i64) + Send + Sync + 'static,
    ) -> &mut Self {
        self.scalar(
            name,
            ScalarKind::Integer,
            Box::new(move |target: &mut T, text: &str| {
                set(target, parse_integer(text)?);
                Ok(())
            }),
        )
    }

    pub fn enumeration<E: OptionEnum>(
        &mut self,
        name: &'static str,
        set: impl Fn(&mut T, E) + Send + Sync + 'static,
    ) -> &mut Self {
        self.scalar(
            name,
            ScalarKind::Enum(E::VARIANTS),
            Box::new(move |target: &mut T, text: &str| {
                set(target, parse_enum::<E>(text)?);
                Ok(())
            }),
        )
    }

    /// A map field, reached through `field`. Binding replaces its contents.
    pub fn map<M>(&mut self, name: &'static str, field: fn(&mut T) -> &mut M) -> &mut Self
    where
        M: Default + Extend<(String, String)> + 'static,
    {
        self.properties.push(StoredProperty::Map(MapProperty {
            name,
            clear: Box::new(move |target: &mut T| *field(target) = M::default()),
            put: Box::new(move |target: &mut T, key: String, value: String| {
                field(target).extend(std::iter::once((key, value)));
            }),
        }));
        self
    }

    /// A collection field, reached through `field`. Binding replaces its contents.
    pub fn collection<C>(&mut self, name: &'static str, field: fn(&mut T) -> &mut C) -> &mut Self
    where
        C: Default + Extend<String> + 'static,
    {
        self.properties
            .push(StoredProperty::Collection(CollectionProperty {
                name,
                clear: Box::new(move |target: &mut T| *field(target) = C::default()),
                add: Box::new(move |target: &mut T, value: String| {
                    field(target).extend(std::iter::once(value));
                }),
            }));
        self
    }
}

/// The ordered, immutable list of properties of one option type.
pub struct PropertyRegistry<T> {
    type_name: &'static str,
    properties: Vec<StoredProperty<T>>,
}

impl<T: Options> PropertyRegistry<T> {
    /// Build the registry from `T`'s declaration.
    pub fn build() -> Self {
        let mut builder = RegistryBuilder::new();
        T::describe(&mut builder);
        Self {
            type_name: std::any::type_name::<T>(),
            properties: builder.properties,
        }
    }
}

impl<T> PropertyRegistry<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> &[StoredProperty<T>] {
        &self.properties
    }

    /// Property with exactly this name.
    pub fn get(&self, name: &str) -> Option<&StoredProperty<T>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn shapes(&self) -> Vec<PropertyShape> {
        self.properties.iter().map(StoredProperty::shape).collect()
    }
}

impl<T> fmt::Debug for PropertyRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Registries keyed by option type, built on first request.
///
/// A registry is never rebuilt or mutated once cached, so readers only
/// contend on the map itself.
#[derive(Default)]
pub struct RegistryCache {
    registries: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of `T`, built the first time it is requested.
    pub fn registry_for<T: Options>(&self) -> Arc<PropertyRegistry<T>> {
        let key = TypeId::of::<T>();
        let cached = self
            .registries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(registry) = cached.and_then(|r| r.downcast::<PropertyRegistry<T>>().ok()) {
            return registry;
        }

        let mut registries = self
            .registries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = registries.entry(key).or_insert_with(|| {
            debug!(type_name = std::any::type_name::<T>(), "building property registry");
            Arc::new(PropertyRegistry::<T>::build()) as Arc<dyn Any + Send + Sync>
        });
        Arc::clone(entry)
            .downcast::<PropertyRegistry<T>>()
            .unwrap_or_else(|_| Arc::new(PropertyRegistry::<T>::build()))
    }

    /// Number of option types with a cached registry.
    pub fn len(&self) -> usize {
        self.registries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RegistryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCache")
            .field("len", &self.len())
            .finish()
    }
}

/// Type-erased reference to an option type, as declared by a factory.
#[derive(Clone, Copy)]
pub struct OptionsClass {
    type_name: &'static str,
    shapes: fn(&RegistryCache) -> Vec<PropertyShape>,
}

impl OptionsClass {
    pub fn of<T: Options>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            shapes: shapes_of::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Property shapes of the referenced type, through `cache`.
    pub fn shapes(&self, cache: &RegistryCache) -> Vec<PropertyShape> {
        (self.shapes)(cache)
    }
}

fn shapes_of<T: Options>(cache: &RegistryCache) -> Vec<PropertyShape> {
    cache.registry_for::<T>().shapes()
}

impl fmt::Debug for OptionsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OptionsClass").field(&self.type_name).finish()
    }
}

impl PartialEq for OptionsClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}
