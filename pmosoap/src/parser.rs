//! Parser SOAP: réponses côté client, requêtes côté serveur

use pmoxml::{Entry, Object, Value, decode, local_name};
use tracing::{debug, warn};

use crate::envelope::EnvelopeView;
use crate::errors::{RequestError, ResponseError};
use crate::fault::extract_fault;
use crate::options::SoapVersion;

/// Réponse HTTP telle que fournie par le transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Statut 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn is_fault(name: &str) -> bool {
    local_name(name) == "Fault"
}

/// Analyse la réponse d'un appel SOAP
///
/// Un Fault dans le Body l'emporte toujours sur le statut HTTP. Sinon le
/// résultat est l'unique enfant du Body; s'il y en a plusieurs, ils sont
/// renvoyés ensemble sous forme d'objet (nom → résultat).
///
/// ```
/// use pmosoap::{parse_response, HttpResponse, ResponseError};
///
/// let body = "<soap:Envelope><soap:Body><soap:Fault><faultcode>Client</faultcode>\
///             <faultstring>Invalid user ID</faultstring></soap:Fault></soap:Body></soap:Envelope>";
/// let err = parse_response(&HttpResponse::new(200, body)).unwrap_err();
/// assert_eq!(err.fault().map(|f| f.code()), Some("Client"));
/// ```
pub fn parse_response(response: &HttpResponse) -> Result<Value, ResponseError> {
    let document = decode(&response.body)?;

    let body = EnvelopeView::locate(&document)
        .and_then(|view| view.body.map(|body| (view, body)));
    let Some((view, body)) = body else {
        return Err(non_soap(response));
    };

    let Some(body) = body.as_object() else {
        // Body vide ou purement textuel
        debug!("SOAP response (HTTP {}) has a childless Body", response.status);
        return Ok(body.clone());
    };

    if let Some((_, fault)) = body.children.iter().find(|(name, _)| is_fault(name)) {
        let fault = extract_fault(
            view.envelope,
            fault.first().unwrap_or(&Value::Text(String::new())),
        );
        debug!("SOAP fault (HTTP {}): {}", response.status, fault);
        return Err(ResponseError::SoapFault(fault));
    }

    let results: Vec<_> = body
        .children
        .iter()
        .filter(|(name, _)| !is_fault(name))
        .collect();

    let value = match results.as_slice() {
        [] => Value::Text(body.text.clone().unwrap_or_default()),
        [(_, Entry::Single(value))] => value.clone(),
        _ => {
            let mut all = Object::new();
            for &(name, entry) in &results {
                all.children.insert(name.clone(), entry.clone());
            }
            Value::Object(all)
        }
    };

    debug!("SOAP response (HTTP {}) decoded", response.status);
    Ok(value)
}

fn non_soap(response: &HttpResponse) -> ResponseError {
    if response.is_success() {
        warn!(
            "HTTP {} response without SOAP Envelope/Body",
            response.status
        );
        ResponseError::InvalidSoapResponse
    } else {
        warn!("HTTP {} error with non-SOAP body", response.status);
        ResponseError::HttpError(response.status, response.body.clone())
    }
}

/// Requête SOAP extraite d'une enveloppe (côté serveur)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    /// Version annoncée par l'enveloppe (1.1 par défaut)
    pub version: SoapVersion,

    /// Nom local de l'opération (ex: "GetUser" pour `<m:GetUser>`)
    pub operation: String,

    /// Namespace de l'opération (ex: "http://example.com/users")
    pub namespace: Option<String>,

    /// Paramètres, sans les déclarations `xmlns`
    pub params: Value,

    /// Contenu brut du `Header`, s'il est présent
    pub header: Option<Value>,
}

/// Parse une requête SOAP reçue par un serveur
pub fn parse_request(xml: &str) -> Result<SoapRequest, RequestError> {
    let document = decode(xml)?;
    let view = EnvelopeView::locate(&document).ok_or(RequestError::MissingEnvelope)?;
    let body = view.body.ok_or(RequestError::MissingBody)?;

    // Le Body contient un élément enfant qui est l'opération
    let (name, entry) = body
        .as_object()
        .and_then(|body| body.children.iter().find(|(name, _)| !is_fault(name)))
        .ok_or(RequestError::NoOperation)?;
    let element = entry.first().ok_or(RequestError::NoOperation)?;

    let prefix = name.rsplit_once(':').map(|(prefix, _)| prefix);
    let namespace = operation_namespace(prefix, element, view.envelope);

    let params = match element {
        Value::Object(object) => strip_declarations(object.clone()),
        text => text.clone(),
    };

    Ok(SoapRequest {
        version: view.version(),
        operation: local_name(name).to_string(),
        namespace,
        params,
        header: view.header.cloned(),
    })
}

/// Namespace lié au préfixe de l'opération, déclaré sur l'opération ou sur
/// l'enveloppe
fn operation_namespace(
    prefix: Option<&str>,
    element: &Value,
    envelope: &Object,
) -> Option<String> {
    let declaration = match prefix {
        Some(prefix) => format!("xmlns:{}", prefix),
        None => "xmlns".to_string(),
    };

    element
        .as_object()
        .and_then(|object| object.attribute(&declaration))
        .or_else(|| envelope.attribute(&declaration))
        .map(str::to_string)
}

fn strip_declarations(mut object: Object) -> Value {
    object
        .attributes
        .retain(|name, _| name != "xmlns" && !name.starts_with("xmlns:"));
    object.into_value()
}
