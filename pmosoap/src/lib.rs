//! # pmosoap - Simple Object Access Protocol
//!
//! Ce crate implémente le protocole d'enveloppe SOAP 1.1 / 1.2 au-dessus du
//! modèle de valeurs XML générique de [`pmoxml`], sans code généré par service.
//!
//! ## Fonctionnalités
//!
//! - ✅ Construction d'enveloppes de requête (SOAP 1.1 et 1.2)
//! - ✅ Analyse des réponses: résultat, SOAP Fault, réponse non SOAP, erreur HTTP
//! - ✅ Classification des faults 1.1 (`faultcode`) et 1.2 (`Code/Value`)
//! - ✅ Recherche indépendante des préfixes (`soap:`, `SOAP-ENV:`, sans préfixe)
//! - ✅ Côté serveur: parsing des requêtes, réponses et faults
//!
//! ## Architecture
//!
//! - [`EnvelopeOptions`] : version, en-têtes, namespace cible
//! - [`SoapEnvelope`] : enveloppe prête à être encodée
//! - [`Fault`] : erreur SOAP ([`FaultV1`] ou [`FaultV2`])
//! - [`ResponseError`] : classification d'une réponse en échec
//! - [`SoapRequest`] : requête reçue côté serveur
//!
//! Toutes les fonctions sont pures et synchrones: aucun état partagé, aucune
//! entrée/sortie. Le transport HTTP reste à la charge de l'appelant.
//!
//! ## Example
//!
//! ```
//! use pmosoap::{build, parse_response, EnvelopeOptions, HttpResponse, SoapVersion};
//! use pmoxml::{Object, Value};
//!
//! // Construire une requête
//! let options = EnvelopeOptions::new()
//!     .with_version(SoapVersion::V1_2)
//!     .with_namespace("http://example.com/users");
//! let params = Value::Object(Object::new().with_child("id", "123"));
//! let request = build("GetUser", params, &options).unwrap();
//! assert!(request.contains("http://www.w3.org/2003/05/soap-envelope"));
//!
//! // Analyser la réponse
//! let body = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
//!   <soap:Body><GetUserResponse><name>Ann</name></GetUserResponse></soap:Body>
//! </soap:Envelope>"#;
//! let result = parse_response(&HttpResponse::new(200, body)).unwrap();
//! assert_eq!(result.get("name"), Some(&Value::from("Ann")));
//! ```

mod builder;
mod envelope;
mod errors;
mod fault;
mod options;
mod parser;

pub use builder::{build, build_fault, build_response};
pub use envelope::{ENVELOPE_PREFIX, SoapEnvelope};
pub use errors::{ConfigError, EnvelopeError, RequestError, ResponseError};
pub use fault::{Fault, FaultV1, FaultV2, fault_codes};
pub use options::{
    EnvelopeOptions, HeaderEntry, SOAP11_ENVELOPE_NS, SOAP12_ENVELOPE_NS, SoapVersion,
};
pub use parser::{HttpResponse, SoapRequest, parse_request, parse_response};
