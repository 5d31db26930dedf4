//! Incremental JSON text writer.
//!
//! [`JsonBuilder`] appends to a single `String` and decides on separators
//! from the text written so far: a comma goes in front of a new key or
//! value exactly when the buffer ends with a closed value (`"`, `}`, `]`,
//! or the `e` of `true`/`false`). Callers therefore never track whether
//! they are writing the first member of an object.
//!
//! Indentation is only written when an indent string is configured, so the
//! same calls produce either compact or pretty output.

/// A nesting-aware JSON writer.
#[derive(Debug, Clone, Default)]
pub struct JsonBuilder {
    out: String,
    indent: Option<String>,
    depth: usize,
}

impl JsonBuilder {
    /// A builder producing compact output when `indent` is `None`.
    pub fn new(indent: Option<String>) -> Self {
        Self::nested(indent, 0)
    }

    /// A builder whose text will be spliced into another builder at `depth`
    /// with [`raw_members`](Self::raw_members).
    pub fn nested(indent: Option<String>, depth: usize) -> Self {
        Self {
            out: String::new(),
            indent,
            depth,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// Start an object member. Must be followed by a value.
    pub fn key(&mut self, name: &str) -> &mut Self {
        self.begin_item();
        push_quoted(&mut self.out, name);
        self.out.push(':');
        if self.indent.is_some() {
            self.out.push(' ');
        }
        self
    }

    /// A string value, escaped.
    pub fn value(&mut self, value: &str) -> &mut Self {
        self.begin_item();
        push_quoted(&mut self.out, value);
        self
    }

    pub fn boolean(&mut self, value: bool) -> &mut Self {
        self.begin_item();
        self.out.push_str(if value { "true" } else { "false" });
        self
    }

    /// Append `text` as a value without escaping. It must be valid JSON and
    /// end with `"`, `}`, `]` or `e` for the separator rule to hold.
    pub fn raw_value(&mut self, text: &str) -> &mut Self {
        self.begin_item();
        self.out.push_str(text);
        self
    }

    /// Write `"key": { ... }` with `body` producing the members.
    pub fn object(&mut self, key: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.key(key);
        self.enclose('{', '}', body)
    }

    /// Write `"key": [ ... ]` with `body` producing the elements.
    pub fn array(&mut self, key: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.key(key);
        self.enclose('[', ']', body)
    }

    /// Write an object in value position: the document root or an array element.
    pub fn object_item(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.begin_item();
        self.enclose('{', '}', body)
    }

    /// Write `"key": {"$ref": "<prefix><pointer>"}`.
    pub fn reference(&mut self, key: &str, prefix: &str, pointer: &str) -> &mut Self {
        self.object(key, |b| {
            b.key("$ref").value(&format!("{prefix}{pointer}"));
        })
    }

    /// Splice members produced by a [`nested`](Self::nested) builder.
    pub fn raw_members(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if self.ends_with_value() {
            self.out.push(',');
        }
        self.out.push_str(text);
        self
    }

    fn enclose(&mut self, open: char, close: char, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.out.push(open);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        if !self.out.ends_with(open) {
            self.newline();
        }
        self.out.push(close);
        self
    }

    /// Separator and indentation before a key or a value. A value directly
    /// after its key needs neither.
    fn begin_item(&mut self) {
        if self.out.trim_end_matches(' ').ends_with(':') {
            return;
        }
        if self.ends_with_value() {
            self.out.push(',');
        }
        self.newline();
    }

    fn ends_with_value(&self) -> bool {
        self.out.ends_with(['"', '}', ']', 'e'])
    }

    fn newline(&mut self) {
        let Some(indent) = &self.indent else {
            return;
        };
        if self.out.is_empty() && self.depth == 0 {
            return;
        }
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(indent);
        }
    }
}

fn push_quoted(out: &mut String, text: &str) {
    out.push_str(&serde_json::Value::from(text).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn compact() -> JsonBuilder {
        JsonBuilder::new(None)
    }

    #[test]
    fn test_compact_members_are_comma_separated() {
        let mut b = compact();
        b.object_item(|b| {
            b.key("type").value("object");
            b.key("required").boolean(true);
            b.key("kinds").raw_value(r#"["array","object"]"#);
            b.object("empty", |_| {});
            b.array("items", |b| {
                b.value("a").value("b");
                b.object_item(|b| {
                    b.key("x").boolean(false);
                });
            });
            b.reference("next", "#/defs/", "foo");
        });
        assert_snapshot!(b.as_str(), @r##"{"type":"object","required":true,"kinds":["array","object"],"empty":{},"items":["a","b",{"x":false}],"next":{"$ref":"#/defs/foo"}}"##);
    }

    #[test]
    fn test_pretty_output() {
        let mut b = JsonBuilder::new(Some("  ".into()));
        b.object_item(|b| {
            b.key("a").value("1");
            b.array("list", |b| {
                b.value("x");
            });
            b.object("empty", |_| {});
        });
        assert_eq!(
            b.as_str(),
            "{\n  \"a\": \"1\",\n  \"list\": [\n    \"x\"\n  ],\n  \"empty\": {}\n}"
        );
    }

    #[test]
    fn test_strings_are_escaped() {
        let mut b = compact();
        b.object_item(|b| {
            b.key("say \"hi\"").value("line\nbreak\\");
        });
        assert_snapshot!(b.as_str(), @r#"{"say \"hi\"":"line\nbreak\\"}"#);
    }

    #[test]
    fn test_nested_members_splice_at_depth() {
        let indent = Some("  ".to_string());
        let mut defs = JsonBuilder::nested(indent.clone(), 2);
        defs.object("foo", |b| {
            b.key("type").value("string");
        });

        let mut root = JsonBuilder::new(indent);
        root.object_item(|b| {
            b.key("first").value("1");
            b.object("defs", |b| {
                b.raw_members(defs.as_str());
            });
            b.object("none", |b| {
                b.raw_members("");
            });
        });
        let text = root.finish();
        assert_eq!(
            text,
            "{\n  \"first\": \"1\",\n  \"defs\": {\n    \"foo\": {\n      \"type\": \"string\"\n    }\n  },\n  \"none\": {}\n}"
        );
        serde_json::from_str::<serde_json::Value>(&text).unwrap();
    }

    #[test]
    fn test_raw_members_after_existing_member() {
        let mut extra = JsonBuilder::nested(None, 1);
        extra.key("b").value("2");

        let mut b = compact();
        b.object_item(|b| {
            b.key("a").value("1");
            b.raw_members(extra.as_str());
        });
        assert_snapshot!(b.as_str(), @r#"{"a":"1","b":"2"}"#);
    }
}
