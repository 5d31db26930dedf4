//! Composer that turns an event stream into [`Document`]s.
//!
//! Anchors and the set of collections currently being composed are local to
//! one document: both are cleared when the document ends, completed or not,
//! so the composer can be reused for the next document of the stream.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::event::{Event, MarkedEvent};
use crate::node::{Document, Node, NodeId, NodeKind};
use crate::{Error, Mark, Result, YamlEvents};

/// Compose the only document of `content`.
///
/// Returns `Ok(None)` for an empty stream and an error if the text contains
/// more than one document.
///
/// # Example
///
/// ```rust
/// use ideconf_yaml::compose_single_str;
///
/// let doc = compose_single_str("base: &b {x: 1}\nderived: *b").unwrap().unwrap();
/// let root = doc.root_mapping().unwrap();
/// assert_eq!(root.get("base"), root.get("derived"));
/// ```
pub fn compose_single_str(content: &str) -> Result<Option<Document>> {
    Composer::new(YamlEvents::new(content)).compose_single_document()
}

/// Compose every document of `content`, in order.
pub fn compose_str(content: &str) -> Result<Vec<Document>> {
    let mut composer = Composer::new(YamlEvents::new(content));
    let mut documents = Vec::new();
    while let Some(document) = composer.compose_next()? {
        documents.push(document);
    }
    Ok(documents)
}

/// Builds node graphs from a stream of [`MarkedEvent`]s.
pub struct Composer<I> {
    events: I,
    lookahead: Option<MarkedEvent>,
    last_mark: Mark,

    /// Nodes of the document being composed.
    nodes: Vec<Node>,

    /// Anchor name to node, for the current document.
    anchors: HashMap<String, NodeId>,

    /// Collections whose children are being composed.
    recursion: HashSet<NodeId>,
}

impl<I> Composer<I>
where
    I: Iterator<Item = Result<MarkedEvent>>,
{
    pub fn new(events: I) -> Self {
        Self {
            events,
            lookahead: None,
            last_mark: Mark::default(),
            nodes: Vec::new(),
            anchors: HashMap::new(),
            recursion: HashSet::new(),
        }
    }

    /// Compose the next document, or return `None` once the stream is over.
    pub fn compose_next(&mut self) -> Result<Option<Document>> {
        self.skip_stream_start()?;
        if self.at_stream_end()? {
            return Ok(None);
        }
        self.compose_document().map(Some)
    }

    /// Compose a stream that must hold at most one document.
    pub fn compose_single_document(&mut self) -> Result<Option<Document>> {
        self.skip_stream_start()?;
        let document = if self.at_stream_end()? {
            None
        } else {
            Some(self.compose_document()?)
        };

        match self.peek()? {
            None => {}
            Some(MarkedEvent {
                event: Event::StreamEnd,
                ..
            }) => {
                self.next_event()?;
            }
            Some(MarkedEvent {
                event: Event::DocumentStart,
                mark,
            }) => {
                let second = *mark;
                let first = document.as_ref().map_or(second, Document::start);
                return Err(Error::MultipleDocuments { first, second });
            }
            Some(other) => {
                return Err(Error::UnexpectedEvent {
                    expected: "stream end",
                    found: other.event.describe(),
                    mark: other.mark,
                });
            }
        }

        Ok(document)
    }

    fn compose_document(&mut self) -> Result<Document> {
        let composed = self.compose_document_body();
        let nodes = self.reset();
        let (root, start) = composed?;
        Ok(Document::new(nodes, root, start))
    }

    fn compose_document_body(&mut self) -> Result<(NodeId, Mark)> {
        let start = self.expect("document start", |e| matches!(e, Event::DocumentStart))?;
        let root = self.compose_node()?;
        self.expect("document end", |e| matches!(e, Event::DocumentEnd))?;
        Ok((root, start))
    }

    /// Clear the per-document state, handing back the nodes composed so far.
    /// Runs whether or not the document was complete.
    fn reset(&mut self) -> Vec<Node> {
        self.anchors.clear();
        self.recursion.clear();
        std::mem::take(&mut self.nodes)
    }

    fn compose_node(&mut self) -> Result<NodeId> {
        let MarkedEvent { event, mark } = self.next_event()?;
        match event {
            Event::Alias { name } => self.resolve_alias(name, mark),
            Event::Scalar {
                value,
                anchor,
                tag,
                plain,
            } => {
                let id = self.push(Node::new(NodeKind::Scalar(value), mark, tag, plain));
                self.register_anchor(anchor, id);
                Ok(id)
            }
            Event::SequenceStart { anchor, tag } => self.compose_sequence(anchor, tag, mark),
            Event::MappingStart { anchor, tag } => self.compose_mapping(anchor, tag, mark),
            other => Err(Error::UnexpectedEvent {
                expected: "a node",
                found: other.describe(),
                mark,
            }),
        }
    }

    fn compose_sequence(
        &mut self,
        anchor: Option<String>,
        tag: Option<String>,
        mark: Mark,
    ) -> Result<NodeId> {
        let id = self.push(Node::new(NodeKind::Sequence(Vec::new()), mark, tag, true));
        self.register_anchor(anchor, id);
        self.recursion.insert(id);

        let mut items = Vec::new();
        while !self.next_is(|e| matches!(e, Event::SequenceEnd))? {
            items.push(self.compose_node()?);
        }
        self.next_event()?;

        self.nodes[id.0].kind = NodeKind::Sequence(items);
        self.recursion.remove(&id);
        Ok(id)
    }

    fn compose_mapping(
        &mut self,
        anchor: Option<String>,
        tag: Option<String>,
        mark: Mark,
    ) -> Result<NodeId> {
        let id = self.push(Node::new(NodeKind::Mapping(Vec::new()), mark, tag, true));
        self.register_anchor(anchor, id);
        self.recursion.insert(id);

        let mut entries = Vec::new();
        while !self.next_is(|e| matches!(e, Event::MappingEnd))? {
            let key = self.compose_node()?;
            if self.nodes[key.0].is_merge_key() {
                self.nodes[id.0].merged = true;
            }
            let value = self.compose_node()?;
            entries.push((key, value));
        }
        self.next_event()?;

        self.nodes[id.0].kind = NodeKind::Mapping(entries);
        self.recursion.remove(&id);
        Ok(id)
    }

    fn resolve_alias(&mut self, name: String, mark: Mark) -> Result<NodeId> {
        let Some(&id) = self.anchors.get(&name) else {
            return Err(Error::UndefinedAlias { name, mark });
        };
        if self.recursion.contains(&id) {
            debug!(alias = %name, %mark, "alias refers to an enclosing node");
            self.nodes[id.0].two_steps_construction = true;
        }
        Ok(id)
    }

    fn register_anchor(&mut self, anchor: Option<String>, id: NodeId) {
        let Some(name) = anchor else {
            return;
        };
        self.nodes[id.0].anchor = Some(name.clone());
        if let Some(previous) = self.anchors.insert(name, id) {
            debug!(
                anchor = ?self.nodes[id.0].anchor,
                previous = %self.nodes[previous.0].mark,
                "anchor redefined"
            );
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn skip_stream_start(&mut self) -> Result<()> {
        if let Some(MarkedEvent {
            event: Event::StreamStart,
            ..
        }) = self.peek()?
        {
            self.next_event()?;
        }
        Ok(())
    }

    /// True (and the stream end consumed) when no further document follows.
    fn at_stream_end(&mut self) -> Result<bool> {
        match self.peek()? {
            None => Ok(true),
            Some(MarkedEvent {
                event: Event::StreamEnd,
                ..
            }) => {
                self.next_event()?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn expect(&mut self, expected: &'static str, accept: fn(&Event) -> bool) -> Result<Mark> {
        let MarkedEvent { event, mark } = self.next_event()?;
        if accept(&event) {
            Ok(mark)
        } else {
            Err(Error::UnexpectedEvent {
                expected,
                found: event.describe(),
                mark,
            })
        }
    }

    /// Whether the next event satisfies `accept`; running out of events is an error.
    fn next_is(&mut self, accept: fn(&Event) -> bool) -> Result<bool> {
        match self.peek()? {
            Some(next) => Ok(accept(&next.event)),
            None => Err(Error::UnexpectedEnd {
                mark: self.last_mark,
            }),
        }
    }

    fn peek(&mut self) -> Result<Option<&MarkedEvent>> {
        if self.lookahead.is_none() {
            match self.events.next() {
                Some(Ok(event)) => self.lookahead = Some(event),
                Some(Err(err)) => return Err(err),
                None => return Ok(None),
            }
        }
        Ok(self.lookahead.as_ref())
    }

    fn next_event(&mut self) -> Result<MarkedEvent> {
        self.peek()?;
        match self.lookahead.take() {
            Some(event) => {
                self.last_mark = event.mark;
                Ok(event)
            }
            None => Err(Error::UnexpectedEnd {
                mark: self.last_mark,
            }),
        }
    }
}
