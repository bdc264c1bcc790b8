use pmosoap::{
    EnvelopeOptions, Fault, FaultV1, FaultV2, HttpResponse, ResponseError, SoapVersion, build,
    build_fault, build_response, parse_request, parse_response,
};
use pmoxml::{DecodeError, Entry, Object, Value};

const CLIENT_FAULT: &str = "<soap:Envelope><soap:Body><soap:Fault><faultcode>Client</faultcode><faultstring>Invalid user ID</faultstring></soap:Fault></soap:Body></soap:Envelope>";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn user_params() -> Value {
    Value::Object(Object::new().with_child("id", "123"))
}

#[test]
fn test_envelope_shape_v11() {
    let xml = build("GetUser", user_params(), &EnvelopeOptions::default()).unwrap();

    let parts = [
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
        "<soap:Header",
        "<soap:Body><GetUser><id>123</id></GetUser></soap:Body>",
        "</soap:Envelope>",
    ];
    let mut cursor = 0;
    for part in parts {
        let offset = xml[cursor..]
            .find(part)
            .unwrap_or_else(|| panic!("{part} not found in order in {xml}"));
        cursor += offset + part.len();
    }
}

#[test]
fn test_envelope_shape_v12() {
    let options = EnvelopeOptions::new().with_version(SoapVersion::V1_2);
    let xml = build("GetUser", user_params(), &options).unwrap();
    assert!(xml.contains(r#"xmlns:soap="http://www.w3.org/2003/05/soap-envelope""#));
    assert!(xml.contains("<soap:Header/>"));
}

#[test]
fn test_fault_takes_precedence_over_status() {
    init_tracing();

    for status in [500, 200] {
        let err = parse_response(&HttpResponse::new(status, CLIENT_FAULT)).unwrap_err();
        let ResponseError::SoapFault(fault) = err else {
            panic!("expected a SOAP fault for HTTP {status}, got {err:?}");
        };
        assert_eq!(fault.code(), "Client");
        assert_eq!(fault.message(), Some("Invalid user ID"));
        assert_eq!(fault.version(), SoapVersion::V1_1);
        assert!(fault.is_client_fault());
    }
}

#[test]
fn test_soap12_reason_language() {
    let fault_with = |texts: &str| {
        format!(
            r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope"><env:Body><env:Fault>
<env:Code><env:Value>env:Sender</env:Value></env:Code>
<env:Reason>{texts}</env:Reason>
</env:Fault></env:Body></env:Envelope>"#
        )
    };

    let only_fr_de = fault_with(
        r#"<env:Text xml:lang="fr">Erreur</env:Text><env:Text xml:lang="de">Fehler</env:Text>"#,
    );
    let err = parse_response(&HttpResponse::new(500, only_fr_de)).unwrap_err();
    assert_eq!(err.fault().and_then(Fault::message), Some("Erreur"));
    assert_eq!(err.fault().map(Fault::code), Some("env:Sender"));

    let with_en = fault_with(
        r#"<env:Text xml:lang="fr">Erreur</env:Text><env:Text xml:lang="en">Error</env:Text><env:Text xml:lang="de">Fehler</env:Text>"#,
    );
    let err = parse_response(&HttpResponse::new(500, with_en)).unwrap_err();
    assert_eq!(err.fault().and_then(Fault::message), Some("Error"));

    let untagged = fault_with("<env:Text>Only one</env:Text>");
    let err = parse_response(&HttpResponse::new(500, untagged)).unwrap_err();
    assert_eq!(err.fault().and_then(Fault::message), Some("Only one"));
}

#[test]
fn test_non_soap_bodies() {
    init_tracing();

    let unrelated = parse_response(&HttpResponse::new(200, "<html><body>Hi</body></html>"));
    assert_eq!(unrelated, Err(ResponseError::InvalidSoapResponse));

    let no_body = parse_response(&HttpResponse::new(200, "<Envelope><Header/></Envelope>"));
    assert_eq!(no_body, Err(ResponseError::InvalidSoapResponse));

    let gateway = parse_response(&HttpResponse::new(502, "<error>upstream down</error>"));
    assert_eq!(
        gateway,
        Err(ResponseError::HttpError(
            502,
            "<error>upstream down</error>".to_string()
        ))
    );

    let plain_text = parse_response(&HttpResponse::new(200, "OK"));
    assert!(matches!(
        plain_text,
        Err(ResponseError::ParseError(DecodeError::Malformed(_)))
    ));

    let empty = parse_response(&HttpResponse::new(200, ""));
    assert_eq!(empty, Err(ResponseError::ParseError(DecodeError::EmptyInput)));
}

#[test]
fn test_result_extraction() {
    let single = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Header/>
  <soapenv:Body>
    <ns1:GetUserResponse xmlns:ns1="http://example.com/users">
      <user id="123"><name>Ann</name><role>admin</role><role>dev</role></user>
    </ns1:GetUserResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

    let result = parse_response(&HttpResponse::new(200, single)).unwrap();
    let user = result.get("user").and_then(Value::as_object).unwrap();
    assert_eq!(user.attribute("id"), Some("123"));
    assert_eq!(user.get_entry("role").map(Entry::len), Some(2));

    let several = "<Envelope><Body><First>1</First><Second>2</Second></Body></Envelope>";
    let result = parse_response(&HttpResponse::new(200, several)).unwrap();
    assert_eq!(
        result,
        Value::Object(Object::new().with_child("First", "1").with_child("Second", "2"))
    );

    let empty = "<Envelope><Body/></Envelope>";
    assert_eq!(
        parse_response(&HttpResponse::new(200, empty)),
        Ok(Value::from(""))
    );
}

#[test]
fn test_built_faults_parse_back() {
    let detail = Value::Object(Object::new().with_child("errorCode", "401"));
    let faults = [
        Fault::V1(FaultV1 {
            code: "soap:Server".to_string(),
            string: Some("Backend unavailable".to_string()),
            actor: Some("http://example.com/backend".to_string()),
            detail: Some(detail.clone()),
        }),
        Fault::V2(FaultV2 {
            code: "soap:Sender".to_string(),
            subcode: Some("m:InvalidUser".to_string()),
            string: Some("Unknown user".to_string()),
            detail: Some(detail),
        }),
        Fault::V2(FaultV2 {
            code: "soap:Receiver".to_string(),
            ..Default::default()
        }),
    ];

    for fault in faults {
        let xml = build_fault(&fault, &EnvelopeOptions::default()).unwrap();
        let err = parse_response(&HttpResponse::new(500, xml)).unwrap_err();
        assert_eq!(err, ResponseError::SoapFault(fault));
    }
}

#[test]
fn test_request_roundtrip_through_server_side() {
    let options = EnvelopeOptions::new()
        .with_version(SoapVersion::V1_2)
        .with_namespace("http://example.com/users")
        .with_header("SessionId", "s-1")
        .pretty(true);
    let params = Value::Object(
        Object::new()
            .with_child("id", "123")
            .with_child("filter", Object::new().with_attribute("active", "true")),
    );

    let xml = build("GetUser", params.clone(), &options).unwrap();
    let request = parse_request(&xml).unwrap();

    assert_eq!(request.version, SoapVersion::V1_2);
    assert_eq!(request.operation, "GetUser");
    assert_eq!(request.namespace.as_deref(), Some("http://example.com/users"));
    assert_eq!(request.params, params);
    assert_eq!(
        request.header.as_ref().and_then(|h| h.get("SessionId")),
        Some(&Value::from("s-1"))
    );

    let response = build_response(
        &request.operation,
        Value::Object(Object::new().with_child("name", "Ann")),
        &EnvelopeOptions::new().with_version(request.version),
    )
    .unwrap();
    let result = parse_response(&HttpResponse::new(200, response)).unwrap();
    assert_eq!(result.get("name"), Some(&Value::from("Ann")));
}

#[test]
fn test_params_from_json() {
    let params: Value = serde_json::from_value(serde_json::json!({
        "user": { "@type": "admin", "name": "Ann", "tags": ["a", "b"] }
    }))
    .unwrap();

    let xml = build("CreateUser", params, &EnvelopeOptions::default()).unwrap();
    assert!(xml.contains(r#"<user type="admin"><name>Ann</name><tags>ab</tags></user>"#));
}
