//! Errors converting scalar text into property values.

use thiserror::Error;

/// A scalar could not be converted to the property's value type.
///
/// The binder never surfaces this to callers: the offending entry is
/// skipped and binding continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("'{0}' is not a boolean (expected true or false)")]
    InvalidBoolean(String),

    #[error("'{value}' is not an integer: {reason}")]
    InvalidInteger { value: String, reason: String },

    #[error("'{value}' is not one of {}", .expected.join(", "))]
    UnknownVariant {
        value: String,
        expected: &'static [&'static str],
    },
}
