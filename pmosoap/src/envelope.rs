//! Structures de l'enveloppe SOAP

use pmoxml::{Object, Value, find_in_any_namespace};

use crate::options::{SOAP11_ENVELOPE_NS, SOAP12_ENVELOPE_NS, SoapVersion};

/// Préfixe utilisé pour les éléments de l'enveloppe produite
pub const ENVELOPE_PREFIX: &str = "soap";

/// Enveloppe SOAP complète, prête à être encodée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapEnvelope {
    /// Version, détermine le namespace déclaré
    pub version: SoapVersion,

    /// Contenu de l'en-tête (vide: `<soap:Header/>`)
    pub header: Object,

    /// Contenu du corps
    pub body: Object,
}

impl SoapEnvelope {
    /// Crée une nouvelle enveloppe sans en-tête
    pub fn new(version: SoapVersion, body: Object) -> Self {
        Self {
            version,
            header: Object::new(),
            body,
        }
    }

    /// Crée une nouvelle enveloppe avec header
    pub fn with_header(version: SoapVersion, header: Object, body: Object) -> Self {
        Self {
            version,
            header,
            body,
        }
    }

    /// Document `{ "soap:Envelope": ... }` à passer à l'encodeur
    ///
    /// Le `soap:Header` est toujours présent, certains serveurs rejetant les
    /// enveloppes qui n'en ont pas.
    pub fn into_document(self) -> Value {
        let envelope = Object::new()
            .with_attribute(format!("xmlns:{ENVELOPE_PREFIX}"), self.version.namespace())
            .with_child(format!("{ENVELOPE_PREFIX}:Header"), self.header)
            .with_child(format!("{ENVELOPE_PREFIX}:Body"), self.body);

        Value::Object(Object::new().with_child(format!("{ENVELOPE_PREFIX}:Envelope"), envelope))
    }
}

/// Vue sur l'enveloppe d'un document décodé, indépendante des préfixes
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnvelopeView<'a> {
    pub envelope: &'a Object,
    pub header: Option<&'a Value>,
    pub body: Option<&'a Value>,
}

impl<'a> EnvelopeView<'a> {
    /// Cherche `Envelope` (`soap:Envelope`, `SOAP-ENV:Envelope`, `Envelope`...)
    /// à la racine du document
    pub fn locate(document: &'a Value) -> Option<Self> {
        let envelope = document
            .as_object()
            .and_then(|root| find_in_any_namespace(root, "Envelope"))
            .and_then(Value::as_object)?;

        Some(Self {
            envelope,
            header: find_in_any_namespace(envelope, "Header"),
            body: find_in_any_namespace(envelope, "Body"),
        })
    }

    pub fn version(&self) -> SoapVersion {
        declared_version(self.envelope).unwrap_or_default()
    }
}

/// Version annoncée par les déclarations `xmlns` de l'enveloppe
///
/// Une déclaration SOAP 1.2 l'emporte sur une déclaration 1.1.
pub(crate) fn declared_version(envelope: &Object) -> Option<SoapVersion> {
    let mut found = None;
    for (name, uri) in &envelope.attributes {
        if name != "xmlns" && !name.starts_with("xmlns:") {
            continue;
        }
        match uri.as_str() {
            SOAP12_ENVELOPE_NS => return Some(SoapVersion::V1_2),
            SOAP11_ENVELOPE_NS => found = Some(SoapVersion::V1_1),
            _ => {}
        }
    }
    found
}
