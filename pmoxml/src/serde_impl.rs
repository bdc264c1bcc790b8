//! serde support for the value model.
//!
//! Objects map to JSON/YAML maps following the quick-xml serde naming rules:
//! attributes are keyed `@name`, the text field is `$text`, any other key is
//! a child element. Repeated children are arrays.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::{Entry, Object, Value};

/// Prefix marking attribute keys in the map form of an [`Object`].
pub const ATTRIBUTE_MARKER: char = '@';

/// Key holding the text field in the map form of an [`Object`].
pub const TEXT_KEY: &str = "$text";

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.attributes.len() + usize::from(self.text.is_some()) + self.children.len();
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(&format!("{ATTRIBUTE_MARKER}{name}"), value)?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry(TEXT_KEY, text)?;
        }
        for (name, entry) in &self.children {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Single(value) => value.serialize(serializer),
            Entry::Many(values) => serializer.collect_seq(values),
        }
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an XML value: a scalar, a map or a sequence")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Entry, E> {
        Ok(Entry::Single(Value::Text(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Entry, E> {
        Ok(Entry::Single(Value::Text(v)))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Entry, E> {
        Ok(Entry::Single(Value::Text(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Entry, E> {
        Ok(Entry::Single(Value::Text(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Entry, E> {
        Ok(Entry::Single(Value::Text(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Entry, E> {
        Ok(Entry::Single(Value::Text(v.to_string())))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::Single(Value::default()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::Single(Value::default()))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Entry, D::Error> {
        Entry::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Entry, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<Value>()? {
            values.push(value);
        }
        Ok(Entry::Many(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entry, A::Error> {
        let mut object = Object::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == TEXT_KEY {
                object.text = Some(scalar(map.next_value()?, &key)?);
            } else if let Some(name) = key.strip_prefix(ATTRIBUTE_MARKER) {
                let value = scalar(map.next_value()?, &key)?;
                object.attributes.insert(name.to_string(), value);
            } else {
                let entry = map.next_value::<Entry>()?;
                object.children.insert(key, entry);
            }
        }
        Ok(Entry::Single(Value::Object(object)))
    }
}

fn scalar<E: de::Error>(value: Value, key: &str) -> Result<String, E> {
    match value {
        Value::Text(text) => Ok(text),
        Value::Object(_) => Err(E::custom(format!("`{key}` must hold a scalar value"))),
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Entry::deserialize(deserializer)? {
            Entry::Single(value) => Ok(value),
            Entry::Many(_) => Err(de::Error::custom(
                "a sequence is only allowed as the value of a child element",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(object),
            Value::Text(text) if text.is_empty() => Ok(Object::new()),
            Value::Text(_) => Err(de::Error::custom("expected a map of XML elements")),
        }
    }
}
