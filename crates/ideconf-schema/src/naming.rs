//! Canonical property names for configuration type identifiers.

use crate::{Result, SchemaError};

/// Identifiers whose canonical name does not follow the folding rules.
const OVERRIDES: &[(&str, &str)] = &[("JUnit", "jUnit")];

/// Removed from the end of an identifier, in this order, at most once each.
const SUFFIXES: &[&str] = &["Type", "RunConfiguration", "Configuration"];

/// Convert a configuration type or factory identifier into the lower camel
/// case name used as a schema property and definition id.
///
/// ```rust
/// use ideconf_schema::to_property_name;
///
/// assert_eq!(to_property_name("GradleRunConfiguration").unwrap(), "gradle");
/// assert_eq!(to_property_name("spring-boot").unwrap(), "springBoot");
/// assert_eq!(to_property_name("CMake").unwrap(), "cmake");
/// assert!(to_property_name("Type").is_err());
/// ```
pub fn to_property_name(identifier: &str) -> Result<String> {
    if let Some(&(_, name)) = OVERRIDES.iter().find(|(from, _)| *from == identifier) {
        return Ok(name.to_string());
    }

    let mut name = identifier;
    for suffix in SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
        }
    }

    check_identifier(identifier, name)?;

    let all_uppercase =
        name.chars().any(char::is_alphabetic) && !name.chars().any(char::is_lowercase);
    if all_uppercase {
        return Ok(name
            .chars()
            .filter(|&c| !is_separator(c))
            .flat_map(char::to_lowercase)
            .collect());
    }

    let mut out = String::with_capacity(name.len());
    let mut leading = true;
    let mut upper_next = false;
    for c in name.chars() {
        if is_separator(c) {
            leading = false;
            upper_next = !out.is_empty();
            continue;
        }
        if leading && c.is_uppercase() {
            out.extend(c.to_lowercase());
            continue;
        }
        leading = false;
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Reject names that are empty or would break a JSON pointer or string.
pub(crate) fn check_identifier(identifier: &str, name: &str) -> Result<()> {
    if name.chars().all(|c| c.is_whitespace() || is_separator(c)) {
        return Err(SchemaError::EmptyIdentifier {
            identifier: identifier.to_string(),
        });
    }
    match name.chars().find(|&c| is_unsafe(c)) {
        Some(character) => Err(SchemaError::UnsafeIdentifier {
            identifier: identifier.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | ' ' | '-' | '_')
}

fn is_unsafe(c: char) -> bool {
    matches!(c, '"' | '\'' | '\\' | '/') || c.is_control()
}
