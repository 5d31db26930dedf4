//! The event stream consumed by the composer.
//!
//! Events are independent of any particular scanner: anchors and aliases are
//! carried by name and tags are fully resolved strings. [`YamlEvents`]
//! produces them from YAML text; tests and other front ends can feed the
//! [`Composer`] directly.
//!
//! [`YamlEvents`]: crate::YamlEvents
//! [`Composer`]: crate::Composer

use crate::Mark;

/// Resolved tag of a merge key (`<<`).
pub const MERGE_TAG: &str = "tag:yaml.org,2002:merge";

/// Prefix the `!!` tag handle expands to.
pub const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// One parser event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias {
        name: String,
    },
    Scalar {
        value: String,
        anchor: Option<String>,
        tag: Option<String>,
        /// The scalar was written without quotes or block indicators.
        plain: bool,
    },
    SequenceStart {
        anchor: Option<String>,
        tag: Option<String>,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<String>,
        tag: Option<String>,
    },
    MappingEnd,
}

impl Event {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Event::StreamStart => "stream start",
            Event::StreamEnd => "stream end",
            Event::DocumentStart => "document start",
            Event::DocumentEnd => "document end",
            Event::Alias { .. } => "alias",
            Event::Scalar { .. } => "scalar",
            Event::SequenceStart { .. } => "sequence start",
            Event::SequenceEnd => "sequence end",
            Event::MappingStart { .. } => "mapping start",
            Event::MappingEnd => "mapping end",
        }
    }

    /// Plain, untagged scalar with the given text.
    pub fn plain(value: impl Into<String>) -> Self {
        Event::Scalar {
            value: value.into(),
            anchor: None,
            tag: None,
            plain: true,
        }
    }
}

/// An event together with the position it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedEvent {
    pub event: Event,
    pub mark: Mark,
}

impl MarkedEvent {
    pub fn new(event: Event, mark: Mark) -> Self {
        Self { event, mark }
    }
}

/// Expand a tag handle and suffix into the full tag string.
pub(crate) fn resolve_tag(handle: &str, suffix: &str) -> String {
    if handle == "!!" {
        format!("{CORE_TAG_PREFIX}{suffix}")
    } else {
        format!("{handle}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_secondary_handle() {
        assert_eq!(resolve_tag("!!", "merge"), MERGE_TAG);
        assert_eq!(resolve_tag(CORE_TAG_PREFIX, "merge"), MERGE_TAG);
        assert_eq!(resolve_tag("!", "path"), "!path");
    }
}
