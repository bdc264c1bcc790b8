//! # pmoxml - generic XML value model
//!
//! Schema-less representation of any XML document as plain data, with a
//! decoder and an encoder that are inverse of each other up to a few documented
//! lossy points. It is the foundation of the `pmosoap` envelope layer, which
//! has to hold whatever a SOAP endpoint sends back.
//!
//! ## Shape rules
//!
//! - an empty element decodes to `Text("")`;
//! - a text-only element decodes to `Text(s)`;
//! - an element with attributes or children decodes to an [`Object`], its
//!   interleaved text (if any) going to [`Object::text`];
//! - a child name seen once is an [`Entry::Single`], a repeated one an
//!   [`Entry::Many`] in document order;
//! - element and attribute names keep their prefix (`soap:Body` ≠ `Body`).
//!
//! ## Lossy points
//!
//! Encoding does not restore repeated siblings: a sequence is rendered as the
//! flattened content of a single element. Ordering between attributes and
//! children and incidental whitespace are not preserved either.
//!
//! ## Example
//!
//! ```
//! use pmoxml::{decode, encode_fragment, Value};
//!
//! let doc = decode(r#"<price currency="USD">299.99</price>"#).unwrap();
//! let price = doc.get("price").unwrap();
//! assert_eq!(price.text_content(), Some("299.99"));
//! assert_eq!(price.as_object().unwrap().attribute("currency"), Some("USD"));
//!
//! let xml = encode_fragment(&doc).unwrap();
//! assert_eq!(decode(&xml).unwrap(), doc);
//! ```

mod decode;
mod encode;
mod error;
mod serde_impl;
mod value;

pub use decode::{decode, decode_bytes};
pub use encode::{Encoder, encode, encode_fragment};
pub use error::{DecodeError, EncodeError};
pub use serde_impl::{ATTRIBUTE_MARKER, TEXT_KEY};
pub use value::{
    Entry, Object, Value, attribute_in_any_namespace, find_entry_in_any_namespace,
    find_in_any_namespace, local_name,
};
