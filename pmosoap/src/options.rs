//! Options de construction des enveloppes SOAP

use std::fmt;
use std::str::FromStr;

use pmoxml::{Object, Value};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Namespace de l'enveloppe SOAP 1.1
pub const SOAP11_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace de l'enveloppe SOAP 1.2
pub const SOAP12_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Version du protocole SOAP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "VersionRepr", into = "String")]
pub enum SoapVersion {
    #[default]
    V1_1,
    V1_2,
}

impl SoapVersion {
    /// URI du namespace de l'enveloppe
    pub fn namespace(self) -> &'static str {
        match self {
            SoapVersion::V1_1 => SOAP11_ENVELOPE_NS,
            SoapVersion::V1_2 => SOAP12_ENVELOPE_NS,
        }
    }

    /// Retrouve la version à partir d'une URI de namespace
    pub fn from_namespace(uri: &str) -> Option<Self> {
        match uri {
            SOAP11_ENVELOPE_NS => Some(SoapVersion::V1_1),
            SOAP12_ENVELOPE_NS => Some(SoapVersion::V1_2),
            _ => None,
        }
    }

    /// Valeur de l'en-tête HTTP `Content-Type` attendue par les serveurs
    pub fn content_type(self) -> &'static str {
        match self {
            SoapVersion::V1_1 => r#"text/xml; charset="utf-8""#,
            SoapVersion::V1_2 => "application/soap+xml; charset=utf-8",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SoapVersion::V1_1 => "1.1",
            SoapVersion::V1_2 => "1.2",
        }
    }
}

impl fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SOAP {}", self.as_str())
    }
}

impl FromStr for SoapVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.1" | "V1_1" | "v1_1" | "soap11" => Ok(SoapVersion::V1_1),
            "1.2" | "V1_2" | "v1_2" | "soap12" => Ok(SoapVersion::V1_2),
            other => Err(ConfigError::UnknownVersion(other.to_string())),
        }
    }
}

impl From<SoapVersion> for String {
    fn from(version: SoapVersion) -> Self {
        version.as_str().to_string()
    }
}

/// En YAML, `version: 1.2` est lu comme un flottant
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Number(f64),
    Name(String),
}

impl TryFrom<VersionRepr> for SoapVersion {
    type Error = ConfigError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionRepr::Number(n) => n.to_string().parse(),
            VersionRepr::Name(name) => name.parse(),
        }
    }
}

/// Entrée d'en-tête SOAP
///
/// Toutes les entrées sont fusionnées (fusion superficielle, la dernière
/// l'emporte) dans un unique élément `soap:Header`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    /// Un élément nommé et sa valeur
    Pair(String, Value),

    /// Un bloc complet (ex: jeton de sécurité) dont les enfants sont fusionnés
    Block(Object),
}

/// Options de construction d'une enveloppe
///
/// | champ       | défaut   |
/// |-------------|----------|
/// | `version`   | SOAP 1.1 |
/// | `headers`   | aucun    |
/// | `namespace` | aucun    |
/// | `pretty`    | `false`  |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeOptions {
    /// Version SOAP, détermine le namespace de l'enveloppe
    pub version: SoapVersion,

    /// Entrées d'en-tête, dans l'ordre de fusion
    pub headers: Vec<HeaderEntry>,

    /// Namespace cible posé en `xmlns` sur l'élément de l'opération
    pub namespace: Option<String>,

    /// Indente le XML produit
    pub pretty: bool,
}

impl EnvelopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge les options depuis un document YAML
    ///
    /// ```
    /// use pmosoap::{EnvelopeOptions, SoapVersion};
    ///
    /// let options = EnvelopeOptions::from_yaml("version: 1.2\nnamespace: urn:users\n").unwrap();
    /// assert_eq!(options.version, SoapVersion::V1_2);
    /// assert_eq!(options.namespace.as_deref(), Some("urn:users"));
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_version(mut self, version: SoapVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.push(HeaderEntry::Pair(name.into(), value.into()));
        self
    }

    pub fn with_header_block(mut self, block: Object) -> Self {
        self.headers.push(HeaderEntry::Block(block));
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Fusionne les entrées d'en-tête en un seul contenu
    pub(crate) fn merged_headers(&self) -> Object {
        let mut header = Object::new();
        for entry in &self.headers {
            match entry {
                HeaderEntry::Pair(name, value) => header.set_child(name.clone(), value.clone()),
                HeaderEntry::Block(block) => {
                    for (name, value) in &block.attributes {
                        header.attributes.insert(name.clone(), value.clone());
                    }
                    for (name, child) in &block.children {
                        header.children.insert(name.clone(), child.clone());
                    }
                }
            }
        }
        header
    }
}
