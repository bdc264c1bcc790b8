//! Generic, schema-less representation of an XML element tree.

use indexmap::IndexMap;

/// Decoded content of an XML element.
///
/// Text-only and empty elements collapse to [`Value::Text`]; anything carrying
/// attributes or child elements is a [`Value::Object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Object(Object),
}

/// An element with attributes and/or children.
///
/// Child names are kept exactly as written, prefix included: `soap:Body` and
/// `Body` are two different keys. Use [`find_in_any_namespace`] to look a
/// child up by its local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    /// Attribute name (as written, e.g. `xml:lang`) to value.
    pub attributes: IndexMap<String, String>,

    /// Character content interleaved with the children, runs joined by a space.
    pub text: Option<String>,

    /// Child elements in document order of first occurrence.
    pub children: IndexMap<String, Entry>,
}

/// Value(s) stored under a child name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// The name was seen once.
    Single(Value),
    /// The name was repeated; values are in document order.
    Many(Vec<Value>),
}

impl Value {
    pub fn text(content: impl Into<String>) -> Self {
        Value::Text(content.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            Value::Text(_) => None,
        }
    }

    pub fn into_object(self) -> Option<Object> {
        match self {
            Value::Object(object) => Some(object),
            Value::Text(_) => None,
        }
    }

    /// Character content of the element, whatever its shape.
    ///
    /// Returns the string of a [`Value::Text`] or the `text` field of an
    /// [`Value::Object`] (`<price currency="USD">299.99</price>` yields `299.99`).
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Object(object) => object.text.as_deref(),
        }
    }

    /// First value stored under `name` when this is an object.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(name))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(text) => text.is_empty(),
            Value::Object(object) => object.is_empty(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.children.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn get_entry(&self, name: &str) -> Option<&Entry> {
        self.children.get(name)
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.children.get(name).and_then(Entry::first)
    }

    /// Adds a child, promoting the entry to [`Entry::Many`] when `name` is
    /// already present.
    pub fn insert_child(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.children.get_mut(&name) {
            Some(entry) => entry.push(value),
            None => {
                self.children.insert(name, Entry::Single(value));
            }
        }
    }

    /// Stores `value` under `name`, replacing any previous entry in place.
    pub fn set_child(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.children
            .insert(name.into(), Entry::Single(value.into()));
    }

    /// Appends a run of character content, space separated from earlier runs.
    pub fn push_text(&mut self, run: &str) {
        match self.text.as_mut() {
            Some(text) => {
                text.push(' ');
                text.push_str(run);
            }
            None => self.text = Some(run.to_string()),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_child(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Collapses the object the way the decoder does: without attributes and
    /// children it becomes a [`Value::Text`] (empty when there is no text).
    pub fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            Value::Text(self.text.unwrap_or_default())
        } else {
            Value::Object(self)
        }
    }
}

impl Entry {
    pub fn first(&self) -> Option<&Value> {
        match self {
            Entry::Single(value) => Some(value),
            Entry::Many(values) => values.first(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Entry::Single(_) => 1,
            Entry::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        match self {
            Entry::Single(value) => std::slice::from_ref(value).iter(),
            Entry::Many(values) => values.iter(),
        }
    }

    /// Appends a value; a single value becomes a two-element sequence.
    pub fn push(&mut self, value: Value) {
        match self {
            Entry::Many(values) => values.push(value),
            Entry::Single(_) => {
                if let Entry::Single(first) = std::mem::replace(self, Entry::Many(Vec::new())) {
                    *self = Entry::Many(vec![first, value]);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a Entry {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Part of a qualified name after the last `:`.
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Looks a child entry up by local name, ignoring its namespace prefix.
///
/// An unprefixed key wins over prefixed ones; otherwise the first prefixed key
/// in document order is returned (`soap:Body`, `SOAP-ENV:Body`, `env:Body`...).
pub fn find_entry_in_any_namespace<'a>(object: &'a Object, local: &str) -> Option<&'a Entry> {
    object.children.get(local).or_else(|| {
        object
            .children
            .iter()
            .find(|(name, _)| name.contains(':') && local_name(name) == local)
            .map(|(_, entry)| entry)
    })
}

/// First value of the child named `local`, whatever its prefix.
pub fn find_in_any_namespace<'a>(object: &'a Object, local: &str) -> Option<&'a Value> {
    find_entry_in_any_namespace(object, local).and_then(Entry::first)
}

/// Attribute lookup by local name (`lang` matches `xml:lang`).
pub fn attribute_in_any_namespace<'a>(object: &'a Object, local: &str) -> Option<&'a str> {
    object.attribute(local).or_else(|| {
        object
            .attributes
            .iter()
            .find(|(name, _)| name.contains(':') && local_name(name) == local)
            .map(|(_, value)| value.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_child_promotes_to_sequence() {
        let mut object = Object::new();
        object.insert_child("item", "a");
        assert_eq!(object.get_entry("item"), Some(&Entry::Single("a".into())));

        object.insert_child("item", "b");
        object.insert_child("item", "c");
        assert_eq!(
            object.get_entry("item"),
            Some(&Entry::Many(vec!["a".into(), "b".into(), "c".into()]))
        );
        assert_eq!(object.get("item"), Some(&Value::from("a")));
    }

    #[test]
    fn test_set_child_keeps_position() {
        let mut object = Object::new().with_child("first", "1").with_child("second", "2");
        object.set_child("first", "one");

        let names: Vec<&str> = object.children.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(object.get("first"), Some(&Value::from("one")));
    }

    #[test]
    fn test_find_in_any_namespace() {
        let object = Object::new()
            .with_child("SOAP-ENV:Header", "")
            .with_child("SOAP-ENV:Body", "payload");

        assert_eq!(
            find_in_any_namespace(&object, "Body"),
            Some(&Value::from("payload"))
        );
        assert!(find_in_any_namespace(&object, "Fault").is_none());
        // the local name must match entirely, not as a suffix
        assert!(find_in_any_namespace(&object, "ody").is_none());
    }

    #[test]
    fn test_unprefixed_key_wins() {
        let object = Object::new()
            .with_child("env:Body", "prefixed")
            .with_child("Body", "plain");
        assert_eq!(
            find_in_any_namespace(&object, "Body"),
            Some(&Value::from("plain"))
        );
    }

    #[test]
    fn test_attribute_in_any_namespace() {
        let object = Object::new().with_attribute("xml:lang", "fr");
        assert_eq!(attribute_in_any_namespace(&object, "lang"), Some("fr"));
        assert_eq!(attribute_in_any_namespace(&object, "xml:lang"), Some("fr"));
        assert_eq!(attribute_in_any_namespace(&object, "id"), None);
    }

    #[test]
    fn test_into_value_collapses() {
        assert_eq!(Object::new().into_value(), Value::from(""));
        assert_eq!(Object::new().with_text("hi").into_value(), Value::from("hi"));
        assert!(matches!(
            Object::new().with_attribute("id", "1").into_value(),
            Value::Object(_)
        ));
    }

    #[test]
    fn test_text_content() {
        let price = Value::Object(
            Object::new()
                .with_attribute("currency", "USD")
                .with_text("299.99"),
        );
        assert_eq!(price.text_content(), Some("299.99"));
        assert_eq!(Value::from("x").text_content(), Some("x"));
        assert_eq!(local_name("soap:Fault"), "Fault");
        assert_eq!(local_name("Fault"), "Fault");
    }
}
