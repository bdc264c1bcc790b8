//! [`Value`] → XML text rendering, built on the quick-xml writer.

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::EncodeError;
use crate::value::{Entry, Object, Value};

/// Configurable XML renderer.
///
/// The free functions [`encode`] and [`encode_fragment`] cover the common
/// cases; the builder adds optional indentation, which is purely cosmetic.
///
/// ```
/// use pmoxml::{Encoder, Object, Value};
///
/// let doc = Value::Object(Object::new().with_child("greeting", "hello"));
/// let xml = Encoder::new().declaration(false).encode(&doc).unwrap();
/// assert_eq!(xml, "<greeting>hello</greeting>");
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    declaration: bool,
    indent: Option<(u8, usize)>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            declaration: true,
            indent: None,
        }
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the `<?xml version="1.0" encoding="UTF-8"?>` declaration (default: yes).
    pub fn declaration(mut self, enabled: bool) -> Self {
        self.declaration = enabled;
        self
    }

    /// Indent nested elements with `size` repetitions of `ch`.
    pub fn indent(mut self, ch: u8, size: usize) -> Self {
        self.indent = Some((ch, size));
        self
    }

    /// Renders a top-level mapping of element names to values.
    ///
    /// Fails with [`EncodeError::InvalidRoot`] if `value` is text or carries
    /// attributes or text of its own.
    pub fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        let root = match value {
            Value::Object(object) if object.attributes.is_empty() && object.text.is_none() => {
                object
            }
            _ => return Err(EncodeError::InvalidRoot),
        };

        let writer = match self.indent {
            Some((ch, size)) => Writer::new_with_indent(Vec::new(), ch, size),
            None => Writer::new(Vec::new()),
        };
        let mut out = XmlOut { writer };

        if self.declaration {
            out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        for (tag, entry) in &root.children {
            out.entry(tag, entry)?;
        }

        String::from_utf8(out.writer.into_inner()).map_err(EncodeError::internal)
    }
}

/// Renders a complete document, XML declaration included.
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    Encoder::new().encode(value)
}

/// Renders without the XML declaration, for embedding in a larger document.
pub fn encode_fragment(value: &Value) -> Result<String, EncodeError> {
    Encoder::new().declaration(false).encode(value)
}

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn emit(&mut self, event: Event<'_>) -> Result<(), EncodeError> {
        self.writer.write_event(event).map_err(EncodeError::internal)
    }

    fn entry(&mut self, tag: &str, entry: &Entry) -> Result<(), EncodeError> {
        match entry {
            Entry::Single(value) => self.element(tag, value),
            Entry::Many(items) => self.flattened(tag, items),
        }
    }

    fn element(&mut self, tag: &str, value: &Value) -> Result<(), EncodeError> {
        let start = start_tag(tag)?;
        match value {
            Value::Text(text) => {
                self.emit(Event::Start(start))?;
                self.text(text)?;
                self.emit(Event::End(BytesEnd::new(tag)))
            }
            Value::Object(object) if object.children.is_empty() && object.text.is_none() => {
                self.emit(Event::Empty(with_attributes(start, object)))
            }
            Value::Object(object) => {
                self.emit(Event::Start(with_attributes(start, object)))?;
                self.content(object)?;
                self.emit(Event::End(BytesEnd::new(tag)))
            }
        }
    }

    /// A sequence is written as the content of a single `tag` element: object
    /// items contribute their children directly, scalar items their text.
    fn flattened(&mut self, tag: &str, items: &[Value]) -> Result<(), EncodeError> {
        self.emit(Event::Start(start_tag(tag)?))?;
        for item in items {
            match item {
                Value::Text(text) => self.text(text)?,
                Value::Object(object) => self.content(object)?,
            }
        }
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    fn content(&mut self, object: &Object) -> Result<(), EncodeError> {
        if let Some(text) = &object.text {
            self.text(text)?;
        }
        for (tag, entry) in &object.children {
            self.entry(tag, entry)?;
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), EncodeError> {
        if text.is_empty() {
            return Ok(());
        }
        // only & < > in character data, quotes stay as they are
        self.emit(Event::Text(BytesText::from_escaped(partial_escape(text))))
    }
}

fn start_tag(tag: &str) -> Result<BytesStart<'_>, EncodeError> {
    if tag.is_empty() || tag.contains(|c: char| c.is_whitespace() || "<>&\"'/=".contains(c)) {
        return Err(EncodeError::InternalError(format!(
            "invalid element name {:?}",
            tag
        )));
    }
    Ok(BytesStart::new(tag))
}

// quick-xml escapes & < > " ' in attribute values
fn with_attributes<'a>(start: BytesStart<'a>, object: &'a Object) -> BytesStart<'a> {
    start.with_attributes(
        object
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    )
}
