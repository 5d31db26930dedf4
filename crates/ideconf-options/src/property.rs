//! Descriptors for the bindable fields of an option type.

use std::fmt;

use crate::ValueError;

/// Value type of a scalar property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Boolean,
    Integer,
    /// String restricted to the listed names.
    Enum(&'static [&'static str]),
}

/// Shape of a property, independent of the type it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(ScalarKind),
    /// String keys to string values.
    Map,
    /// Ordered strings.
    Collection,
}

/// Name and shape of one property, used for schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyShape {
    pub name: &'static str,
    pub kind: PropertyKind,
}

/// Enumerations usable as scalar property values.
pub trait OptionEnum: Sized + 'static {
    /// Names accepted in configuration files, in declaration order.
    const VARIANTS: &'static [&'static str];

    fn from_name(name: &str) -> Option<Self>;
}

pub(crate) type ParseAndSet<T> = Box<dyn Fn(&mut T, &str) -> Result<(), ValueError> + Send + Sync>;
pub(crate) type Clear<T> = Box<dyn Fn(&mut T) + Send + Sync>;
pub(crate) type Put<T> = Box<dyn Fn(&mut T, String, String) + Send + Sync>;
pub(crate) type Add<T> = Box<dyn Fn(&mut T, String) + Send + Sync>;

/// One bindable field of `T`.
pub enum StoredProperty<T> {
    Scalar(ScalarProperty<T>),
    Map(MapProperty<T>),
    Collection(CollectionProperty<T>),
}

impl<T> StoredProperty<T> {
    pub fn name(&self) -> &'static str {
        match self {
            StoredProperty::Scalar(p) => p.name,
            StoredProperty::Map(p) => p.name,
            StoredProperty::Collection(p) => p.name,
        }
    }

    pub fn shape(&self) -> PropertyShape {
        let kind = match self {
            StoredProperty::Scalar(p) => PropertyKind::Scalar(p.kind),
            StoredProperty::Map(_) => PropertyKind::Map,
            StoredProperty::Collection(_) => PropertyKind::Collection,
        };
        PropertyShape {
            name: self.name(),
            kind,
        }
    }
}

impl<T> fmt::Debug for StoredProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self.shape();
        f.debug_struct("StoredProperty")
            .field("name", &shape.name)
            .field("kind", &shape.kind)
            .finish()
    }
}

/// A field set from a single scalar.
pub struct ScalarProperty<T> {
    pub(crate) name: &'static str,
    pub(crate) kind: ScalarKind,
    pub(crate) parse_and_set: ParseAndSet<T>,
}

impl<T> ScalarProperty<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Parse `text` and store the value into `target`.
    pub fn set_from_str(&self, target: &mut T, text: &str) -> Result<(), ValueError> {
        (self.parse_and_set)(target, text)
    }
}

/// A string-to-string map field, replaced as a whole when bound.
pub struct MapProperty<T> {
    pub(crate) name: &'static str,
    pub(crate) clear: Clear<T>,
    pub(crate) put: Put<T>,
}

impl<T> MapProperty<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn clear(&self, target: &mut T) {
        (self.clear)(target);
    }

    pub fn put(&self, target: &mut T, key: String, value: String) {
        (self.put)(target, key, value);
    }
}

/// A string collection field, replaced as a whole when bound.
pub struct CollectionProperty<T> {
    pub(crate) name: &'static str,
    pub(crate) clear: Clear<T>,
    pub(crate) add: Add<T>,
}

impl<T> CollectionProperty<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn clear(&self, target: &mut T) {
        (self.clear)(target);
    }

    pub fn add(&self, target: &mut T, value: String) {
        (self.add)(target, value);
    }
}

pub(crate) fn parse_boolean(text: &str) -> Result<bool, ValueError> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValueError::InvalidBoolean(text.to_string()))
    }
}

pub(crate) fn parse_integer(text: &str) -> Result<i64, ValueError> {
    text.trim()
        .parse()
        .map_err(|err: std::num::ParseIntError| ValueError::InvalidInteger {
            value: text.to_string(),
            reason: err.to_string(),
        })
}

pub(crate) fn parse_enum<E: OptionEnum>(text: &str) -> Result<E, ValueError> {
    E::from_name(text).ok_or_else(|| ValueError::UnknownVariant {
        value: text.to_string(),
        expected: E::VARIANTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boolean() {
        assert_eq!(parse_boolean("true"), Ok(true));
        assert_eq!(parse_boolean("False"), Ok(false));
        assert!(matches!(
            parse_boolean("yes"),
            Err(ValueError::InvalidBoolean(_))
        ));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer(" -7 "), Ok(-7));
        assert!(parse_integer("4.2").is_err());
    }
}
