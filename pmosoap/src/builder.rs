//! Construction des enveloppes SOAP (requêtes, réponses, faults)

use pmoxml::{Encoder, Object, Value};
use tracing::debug;

use crate::envelope::{ENVELOPE_PREFIX, SoapEnvelope};
use crate::errors::EnvelopeError;
use crate::fault::{Fault, fault_value};
use crate::options::EnvelopeOptions;

fn encode_envelope(envelope: SoapEnvelope, pretty: bool) -> Result<String, EnvelopeError> {
    let encoder = if pretty {
        Encoder::new().indent(b' ', 2)
    } else {
        Encoder::new()
    };
    Ok(encoder.encode(&envelope.into_document())?)
}

/// Pose le namespace cible en `xmlns` sur les paramètres de l'opération
fn with_namespace(params: Value, namespace: Option<&str>) -> Value {
    let Some(namespace) = namespace else {
        return params;
    };

    let object = match params {
        Value::Object(object) => object,
        Value::Text(text) if text.is_empty() => Object::new(),
        Value::Text(text) => Object::new().with_text(text),
    };
    Value::Object(object.with_attribute("xmlns", namespace))
}

/// Construit une requête SOAP pour une opération
///
/// # Arguments
///
/// * `operation` - Nom de l'opération (ex: "GetUser"), élément unique du Body
/// * `params` - Paramètres, déjà mis en forme (document/rpc, literal/encoded)
/// * `options` - Version, en-têtes et namespace cible
///
/// # Returns
///
/// Le document XML complet, déclaration comprise
///
/// ```
/// use pmosoap::{build, EnvelopeOptions};
/// use pmoxml::{Object, Value};
///
/// let params = Value::Object(Object::new().with_child("id", "123"));
/// let xml = build("GetUser", params, &EnvelopeOptions::default()).unwrap();
/// assert!(xml.contains("<soap:Body><GetUser><id>123</id></GetUser></soap:Body>"));
/// ```
pub fn build(
    operation: &str,
    params: Value,
    options: &EnvelopeOptions,
) -> Result<String, EnvelopeError> {
    let params = with_namespace(params, options.namespace.as_deref());
    let body = Object::new().with_child(operation, params);
    let envelope = SoapEnvelope::with_header(options.version, options.merged_headers(), body);

    debug!(
        "Building {} envelope for operation {} ({} header entries)",
        options.version,
        operation,
        options.headers.len()
    );
    encode_envelope(envelope, options.pretty)
}

/// Construit la réponse SOAP d'une opération servie
///
/// Le résultat est placé dans un élément `{operation}Response`.
pub fn build_response(
    operation: &str,
    result: Value,
    options: &EnvelopeOptions,
) -> Result<String, EnvelopeError> {
    build(&format!("{}Response", operation), result, options)
}

/// Construit une enveloppe contenant un SOAP Fault
///
/// La forme du fault (1.1 ou 1.2) et le namespace de l'enveloppe suivent la
/// version du fault, pas celle des options.
pub fn build_fault(fault: &Fault, options: &EnvelopeOptions) -> Result<String, EnvelopeError> {
    let body = Object::new().with_child(format!("{ENVELOPE_PREFIX}:Fault"), fault_value(fault));
    let envelope = SoapEnvelope::with_header(fault.version(), options.merged_headers(), body);

    debug!("Building {} fault envelope: {}", fault.version(), fault);
    encode_envelope(envelope, options.pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultV1;
    use crate::options::SoapVersion;

    fn params() -> Value {
        Value::Object(Object::new().with_child("id", "123"))
    }

    #[test]
    fn test_build_request() {
        let xml = build("GetUser", params(), &EnvelopeOptions::default()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#
        ));
        assert!(xml.contains("<soap:Header/>"));
        assert!(xml.contains("<soap:Body><GetUser><id>123</id></GetUser></soap:Body>"));
        assert!(xml.ends_with("</soap:Envelope>"));

        let header = xml.find("<soap:Header").unwrap();
        let body = xml.find("<soap:Body>").unwrap();
        assert!(header < body);
    }

    #[test]
    fn test_build_request_v12() {
        let options = EnvelopeOptions::new().with_version(SoapVersion::V1_2);
        let xml = build("GetUser", params(), &options).unwrap();
        assert!(xml.contains(r#"xmlns:soap="http://www.w3.org/2003/05/soap-envelope""#));
        assert!(!xml.contains("schemas.xmlsoap.org"));
    }

    #[test]
    fn test_build_with_namespace() {
        let options = EnvelopeOptions::new().with_namespace("http://example.com/users");
        let xml = build("GetUser", params(), &options).unwrap();
        assert!(xml.contains(r#"<GetUser xmlns="http://example.com/users"><id>123</id></GetUser>"#));

        let xml = build("Ping", Value::from(""), &options).unwrap();
        assert!(xml.contains(r#"<Ping xmlns="http://example.com/users"/>"#));

        let xml = build("Echo", Value::from("hi"), &options).unwrap();
        assert!(xml.contains(r#"<Echo xmlns="http://example.com/users">hi</Echo>"#));
    }

    #[test]
    fn test_build_with_headers() {
        let options = EnvelopeOptions::new()
            .with_header("SessionId", "abc")
            .with_header("SessionId", "def");
        let xml = build("GetUser", params(), &options).unwrap();
        assert!(xml.contains("<soap:Header><SessionId>def</SessionId></soap:Header>"));
    }

    #[test]
    fn test_build_invalid_operation_name() {
        let err = build("", params(), &EnvelopeOptions::default()).unwrap_err();
        assert!(matches!(err, EnvelopeError::BuildFailed(_)));
    }

    #[test]
    fn test_build_response_and_fault() {
        let xml = build_response(
            "GetUser",
            Value::Object(Object::new().with_child("name", "Ann")),
            &EnvelopeOptions::default(),
        )
        .unwrap();
        assert!(xml.contains("<GetUserResponse><name>Ann</name></GetUserResponse>"));

        let fault = Fault::V1(FaultV1 {
            code: "soap:Client".to_string(),
            string: Some("Invalid user ID".to_string()),
            ..Default::default()
        });
        let xml = build_fault(&fault, &EnvelopeOptions::default()).unwrap();
        assert!(xml.contains(
            "<soap:Fault><faultcode>soap:Client</faultcode><faultstring>Invalid user ID</faultstring></soap:Fault>"
        ));
    }

    #[test]
    fn test_build_pretty() {
        let options = EnvelopeOptions::new().pretty(true);
        let xml = build("GetUser", params(), &options).unwrap();
        assert!(xml.contains("\n  <soap:Header/>"), "{xml}");
    }
}
