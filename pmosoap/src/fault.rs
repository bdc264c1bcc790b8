//! SOAP Faults 1.1 et 1.2

use std::fmt;

use pmoxml::{
    Object, Value, attribute_in_any_namespace, find_entry_in_any_namespace,
    find_in_any_namespace, local_name,
};

use crate::envelope::{ENVELOPE_PREFIX, declared_version};
use crate::options::SoapVersion;

/// Codes de fault standards
pub mod fault_codes {
    /// Namespace de l'enveloppe non reconnu (1.1 et 1.2)
    pub const VERSION_MISMATCH: &str = "VersionMismatch";

    /// Un en-tête `mustUnderstand` n'a pas été compris (1.1 et 1.2)
    pub const MUST_UNDERSTAND: &str = "MustUnderstand";

    /// Requête incorrecte (1.1)
    pub const CLIENT: &str = "Client";

    /// Échec côté serveur (1.1)
    pub const SERVER: &str = "Server";

    /// Requête incorrecte (1.2)
    pub const SENDER: &str = "Sender";

    /// Échec côté serveur (1.2)
    pub const RECEIVER: &str = "Receiver";

    /// Encodage des données non supporté (1.2)
    pub const DATA_ENCODING_UNKNOWN: &str = "DataEncodingUnknown";
}

/// Fault au format SOAP 1.1 (`faultcode`, `faultstring`...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultV1 {
    pub code: String,
    pub string: Option<String>,
    pub actor: Option<String>,
    pub detail: Option<Value>,
}

/// Fault au format SOAP 1.2 (`Code/Value`, `Reason/Text`...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultV2 {
    pub code: String,
    pub subcode: Option<String>,
    pub string: Option<String>,
    pub detail: Option<Value>,
}

/// Erreur SOAP (Fault), selon la version du protocole
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    V1(FaultV1),
    V2(FaultV2),
}

impl Fault {
    pub fn version(&self) -> SoapVersion {
        match self {
            Fault::V1(_) => SoapVersion::V1_1,
            Fault::V2(_) => SoapVersion::V1_2,
        }
    }

    /// Code tel que reçu, préfixe compris (ex: `soap:Sender`)
    pub fn code(&self) -> &str {
        match self {
            Fault::V1(fault) => &fault.code,
            Fault::V2(fault) => &fault.code,
        }
    }

    /// Code sans son préfixe de namespace
    pub fn local_code(&self) -> &str {
        local_name(self.code())
    }

    pub fn subcode(&self) -> Option<&str> {
        match self {
            Fault::V1(_) => None,
            Fault::V2(fault) => fault.subcode.as_deref(),
        }
    }

    /// Message lisible (`faultstring` ou `Reason/Text`)
    pub fn message(&self) -> Option<&str> {
        match self {
            Fault::V1(fault) => fault.string.as_deref(),
            Fault::V2(fault) => fault.string.as_deref(),
        }
    }

    pub fn actor(&self) -> Option<&str> {
        match self {
            Fault::V1(fault) => fault.actor.as_deref(),
            Fault::V2(_) => None,
        }
    }

    pub fn detail(&self) -> Option<&Value> {
        match self {
            Fault::V1(fault) => fault.detail.as_ref(),
            Fault::V2(fault) => fault.detail.as_ref(),
        }
    }

    /// La requête est en cause (`Client` en 1.1, `Sender` en 1.2)
    ///
    /// Les codes 1.1 pointés (`Client.Authentication`) sont aussi reconnus.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self.code_class(),
            fault_codes::CLIENT | fault_codes::SENDER
        )
    }

    /// Le serveur est en cause (`Server` en 1.1, `Receiver` en 1.2)
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self.code_class(),
            fault_codes::SERVER | fault_codes::RECEIVER
        )
    }

    fn code_class(&self) -> &str {
        let code = self.local_code();
        code.split_once('.').map_or(code, |(class, _)| class)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.code())?;
        if let Some(subcode) = self.subcode() {
            write!(f, "/{}", subcode)?;
        }
        write!(f, "] {}", self.message().unwrap_or("(no reason given)"))?;
        if let Some(actor) = self.actor() {
            write!(f, " (actor: {})", actor)?;
        }
        Ok(())
    }
}

/// Extrait un fault de l'élément `Fault` d'une réponse
///
/// La version 1.2 est retenue si l'enveloppe déclare le namespace 1.2 ou si
/// le fault a la structure `Code/Value`; sinon 1.1. L'extraction n'échoue
/// jamais: les champs absents restent à `None`.
pub(crate) fn extract_fault(envelope: &Object, fault: &Value) -> Fault {
    let empty = Object::new();
    let fault = fault.as_object().unwrap_or(&empty);

    if declared_version(envelope) == Some(SoapVersion::V1_2) || has_v2_shape(fault) {
        Fault::V2(extract_v2(fault))
    } else {
        Fault::V1(extract_v1(fault))
    }
}

fn has_v2_shape(fault: &Object) -> bool {
    find_in_any_namespace(fault, "Code")
        .and_then(Value::as_object)
        .is_some_and(|code| find_in_any_namespace(code, "Value").is_some())
}

/// Premier champ présent parmi `names`, quel que soit son préfixe
fn field<'a>(fault: &'a Object, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| find_in_any_namespace(fault, name))
}

fn field_text(fault: &Object, names: &[&str]) -> Option<String> {
    field(fault, names)
        .map(|value| value.text_content().unwrap_or_default().to_string())
}

fn extract_v1(fault: &Object) -> FaultV1 {
    FaultV1 {
        code: field_text(fault, &["faultcode", "Code"]).unwrap_or_default(),
        string: field_text(fault, &["faultstring", "Reason"]),
        actor: field_text(fault, &["faultactor", "Actor"]),
        detail: field(fault, &["detail", "Detail"]).cloned(),
    }
}

fn extract_v2(fault: &Object) -> FaultV2 {
    let code = find_in_any_namespace(fault, "Code");

    FaultV2 {
        code: code.map(nested_value).unwrap_or_default(),
        subcode: code
            .and_then(Value::as_object)
            .and_then(|code| find_in_any_namespace(code, "Subcode"))
            .map(nested_value),
        string: find_in_any_namespace(fault, "Reason").map(reason_text),
        detail: field(fault, &["Detail", "detail"]).cloned(),
    }
}

/// Texte de `X/Value`, ou de `X` lui-même quand il n'a pas d'enfant `Value`
fn nested_value(value: &Value) -> String {
    let inner = value
        .as_object()
        .and_then(|object| find_in_any_namespace(object, "Value"))
        .unwrap_or(value);
    inner.text_content().unwrap_or_default().to_string()
}

/// Choisit le `Reason/Text` anglais, à défaut le premier du document
fn reason_text(reason: &Value) -> String {
    let texts = reason
        .as_object()
        .and_then(|object| find_entry_in_any_namespace(object, "Text"));

    let Some(texts) = texts else {
        return reason.text_content().unwrap_or_default().to_string();
    };

    let chosen = texts
        .iter()
        .find(|text| lang_of(text).is_some_and(is_english))
        .or_else(|| texts.first());

    chosen
        .and_then(Value::text_content)
        .unwrap_or_default()
        .to_string()
}

fn lang_of(text: &Value) -> Option<&str> {
    text.as_object()
        .and_then(|object| attribute_in_any_namespace(object, "lang"))
}

fn is_english(lang: &str) -> bool {
    lang.eq_ignore_ascii_case("en")
        || lang
            .get(..3)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("en-"))
}

/// Construit l'élément `soap:Fault` correspondant à un fault
pub(crate) fn fault_value(fault: &Fault) -> Value {
    let name = |local: &str| format!("{ENVELOPE_PREFIX}:{local}");
    let mut element = Object::new();

    match fault {
        Fault::V1(fault) => {
            element.insert_child("faultcode", fault.code.as_str());
            if let Some(string) = &fault.string {
                element.insert_child("faultstring", string.as_str());
            }
            if let Some(actor) = &fault.actor {
                element.insert_child("faultactor", actor.as_str());
            }
            if let Some(detail) = &fault.detail {
                element.insert_child("detail", detail.clone());
            }
        }
        Fault::V2(fault) => {
            let mut code = Object::new().with_child(name("Value"), fault.code.as_str());
            if let Some(subcode) = &fault.subcode {
                code.insert_child(
                    name("Subcode"),
                    Object::new().with_child(name("Value"), subcode.as_str()),
                );
            }
            element.insert_child(name("Code"), code);

            if let Some(string) = &fault.string {
                let mut text = Object::new().with_attribute("xml:lang", "en");
                if !string.is_empty() {
                    text.text = Some(string.clone());
                }
                element.insert_child(
                    name("Reason"),
                    Object::new().with_child(name("Text"), text),
                );
            }
            if let Some(detail) = &fault.detail {
                element.insert_child(name("Detail"), detail.clone());
            }
        }
    }

    Value::Object(element)
}
