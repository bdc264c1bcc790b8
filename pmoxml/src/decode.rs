//! XML text → [`Value`] decoding, built on the quick-xml pull parser.

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use crate::error::DecodeError;
use crate::value::{Object, Value};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Element being built while its content is read.
struct Frame {
    name: String,
    object: Object,
    /// Current text run, flushed when a child starts or the element ends.
    pending: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self, DecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut object = Object::new();

        for attr in start.attributes() {
            let attr = attr.map_err(DecodeError::malformed)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(DecodeError::malformed)?;
            object.attributes.insert(key, value.into_owned());
        }

        Ok(Self {
            name,
            object,
            pending: String::new(),
        })
    }

    fn flush_text(&mut self) {
        let run = self.pending.trim();
        if !run.is_empty() {
            self.object.push_text(run);
        }
        self.pending.clear();
    }

    fn close(mut self) -> (String, Value) {
        self.flush_text();
        (self.name, self.object.into_value())
    }
}

/// Parses an XML document into a mapping `{ root name: root value }`.
///
/// A leading byte-order mark and surrounding whitespace are ignored. Comments,
/// processing instructions and the doctype contribute nothing; CDATA sections
/// and entity references are folded into the text content.
///
/// ```
/// use pmoxml::{decode, Value};
///
/// let doc = decode("<root><item>a</item><item>b</item></root>").unwrap();
/// let items = doc.get("root").unwrap().as_object().unwrap().get_entry("item").unwrap();
/// assert_eq!(items.len(), 2);
/// assert_eq!(items.first(), Some(&Value::from("a")));
/// ```
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text).trim();
    if text.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(DecodeError::malformed("multiple root elements"));
                }
                if let Some(parent) = stack.last_mut() {
                    parent.flush_text();
                }
                stack.push(Frame::open(&start, reader.decoder())?);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| DecodeError::malformed("unexpected closing tag"))?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.object.insert_child(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(content) => {
                let content = content.decode().map_err(DecodeError::malformed)?;
                push_content(&mut stack, &content)?;
            }
            Event::CData(content) => {
                let content = content.decode().map_err(DecodeError::malformed)?;
                push_content(&mut stack, &content)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = match reference
                    .resolve_char_ref()
                    .map_err(DecodeError::malformed)?
                {
                    Some(ch) => ch.to_string(),
                    None => {
                        let entity = reference.decode().map_err(DecodeError::malformed)?;
                        resolve_predefined_entity(&entity)
                            .ok_or_else(|| {
                                DecodeError::Malformed(format!("unknown entity &{};", entity))
                            })?
                            .to_string()
                    }
                };
                push_content(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            // declaration, doctype, comments and processing instructions
            other => trace!("skipping XML event {:?}", other),
        }
    }

    if let Some(frame) = stack.last() {
        return Err(DecodeError::Malformed(format!(
            "unclosed element <{}>",
            frame.name
        )));
    }

    let (name, value) = root.ok_or_else(|| DecodeError::malformed("no root element"))?;
    Ok(Value::Object(Object::new().with_child(name, value)))
}

/// Same as [`decode`] for raw bytes, such as an HTTP body.
///
/// The three-byte UTF-8 BOM is stripped; bytes that are not valid UTF-8 fail
/// with [`DecodeError::InvalidInput`].
pub fn decode_bytes(bytes: &[u8]) -> Result<Value, DecodeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text =
        std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidInput(e.to_string()))?;
    decode(text)
}

fn push_content(stack: &mut [Frame], content: &str) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.pending.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err(DecodeError::malformed("text outside of the root element")),
    }
}
