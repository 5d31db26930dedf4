//! Event source backed by the yaml-rust2 parser.
//!
//! yaml-rust2 reports anchors as numeric ids. The composer works with anchor
//! names, so the names are recovered from the text that precedes each
//! anchored node: the anchor property is always the last `&name` written
//! before the node's own token.

use std::collections::HashMap;
use std::collections::VecDeque;

use yaml_rust2::parser::{Event as YamlEvent, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::event::{Event, MarkedEvent, resolve_tag};
use crate::{Error, Mark, Result};

/// Events of a YAML text, produced eagerly by yaml-rust2.
///
/// Iterating yields every event the parser produced, followed by the parse
/// error, if any.
pub struct YamlEvents {
    events: VecDeque<MarkedEvent>,
    error: Option<Error>,
}

impl YamlEvents {
    pub fn new(content: &str) -> Self {
        let mut parser = Parser::new_from_str(content);
        let mut collector = EventCollector::new(content);

        let error = parser
            .load(&mut collector, true)
            .err()
            .map(|err| collector.convert_error(err));

        Self {
            events: collector.events.into(),
            error,
        }
    }
}

impl Iterator for YamlEvents {
    type Item = Result<MarkedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.events.pop_front() {
            Some(event) => Some(Ok(event)),
            None => self.error.take().map(Err),
        }
    }
}

struct EventCollector<'a> {
    source: SourceText<'a>,
    anchors: HashMap<usize, String>,
    previous: usize,
    events: Vec<MarkedEvent>,
}

impl<'a> EventCollector<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            source: SourceText::new(content),
            anchors: HashMap::new(),
            previous: 0,
            events: Vec::new(),
        }
    }

    fn anchor_name(&mut self, anchor_id: usize, index: usize) -> Option<String> {
        if anchor_id == 0 {
            return None;
        }
        let name = self
            .source
            .slice(self.previous, index)
            .and_then(last_anchor_property)
            .unwrap_or_else(|| anchor_id.to_string());
        self.anchors.insert(anchor_id, name.clone());
        Some(name)
    }

    fn alias_name(&self, anchor_id: usize) -> String {
        self.anchors
            .get(&anchor_id)
            .cloned()
            .unwrap_or_else(|| anchor_id.to_string())
    }

    fn convert_error(&self, err: yaml_rust2::ScanError) -> Error {
        if err.info().contains("unknown anchor") {
            let mark = Mark::from_marker(err.marker());
            let name = self
                .source
                .slice(mark.index, self.source.char_len())
                .map(|rest| property_name(rest.strip_prefix('*').unwrap_or(rest)))
                .unwrap_or_default();
            return Error::UndefinedAlias { name, mark };
        }
        Error::from(err)
    }
}

impl MarkedEventReceiver for EventCollector<'_> {
    fn on_event(&mut self, ev: YamlEvent, marker: Marker) {
        let mark = Mark::from_marker(&marker);
        let event = match ev {
            YamlEvent::Nothing => return,

            YamlEvent::StreamStart => Event::StreamStart,
            YamlEvent::StreamEnd => Event::StreamEnd,
            YamlEvent::DocumentStart => Event::DocumentStart,
            YamlEvent::DocumentEnd => Event::DocumentEnd,

            YamlEvent::Alias(anchor_id) => Event::Alias {
                name: self.alias_name(anchor_id),
            },

            YamlEvent::Scalar(value, style, anchor_id, tag) => Event::Scalar {
                value,
                anchor: self.anchor_name(anchor_id, mark.index),
                tag: tag.as_ref().map(|t| resolve_tag(&t.handle, &t.suffix)),
                plain: matches!(style, TScalarStyle::Plain),
            },

            YamlEvent::SequenceStart(anchor_id, tag) => Event::SequenceStart {
                anchor: self.anchor_name(anchor_id, mark.index),
                tag: tag.as_ref().map(|t| resolve_tag(&t.handle, &t.suffix)),
            },
            YamlEvent::SequenceEnd => Event::SequenceEnd,

            YamlEvent::MappingStart(anchor_id, tag) => Event::MappingStart {
                anchor: self.anchor_name(anchor_id, mark.index),
                tag: tag.as_ref().map(|t| resolve_tag(&t.handle, &t.suffix)),
            },
            YamlEvent::MappingEnd => Event::MappingEnd,
        };

        self.previous = mark.index;
        self.events.push(MarkedEvent::new(event, mark));
    }
}

/// Source text addressable by character index, as yaml-rust2 markers are.
struct SourceText<'a> {
    text: &'a str,
    offsets: Vec<usize>,
}

impl<'a> SourceText<'a> {
    fn new(text: &'a str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        offsets.push(text.len());
        Self { text, offsets }
    }

    fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        let start = *self.offsets.get(start)?;
        let end = *self.offsets.get(end)?;
        self.text.get(start..end)
    }
}

/// Name of the last `&anchor` property written in `segment`, ignoring comments.
fn last_anchor_property(segment: &str) -> Option<String> {
    segment.lines().rev().find_map(|line| {
        let line = strip_comment(line);
        line.char_indices()
            .rev()
            .filter(|&(i, c)| c == '&' && preceded_by_separator(line, i))
            .map(|(i, _)| property_name(&line[i + 1..]))
            .find(|name| !name.is_empty())
    })
}

fn strip_comment(line: &str) -> &str {
    let mut previous = None;
    for (i, c) in line.char_indices() {
        if c == '#' && previous.is_none_or(char::is_whitespace) {
            return &line[..i];
        }
        previous = Some(c);
    }
    line
}

fn preceded_by_separator(line: &str, index: usize) -> bool {
    line[..index]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || "[{,:-?".contains(c))
}

/// Characters of an anchor or alias name, up to whitespace or a flow indicator.
fn property_name(text: &str) -> String {
    text.chars()
        .take_while(|c| !c.is_whitespace() && !",[]{}".contains(*c))
        .collect()
}
