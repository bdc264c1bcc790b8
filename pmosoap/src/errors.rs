use pmoxml::{DecodeError, EncodeError};
use thiserror::Error;

use crate::fault::Fault;

/// Échec de construction d'une enveloppe
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Failed to build SOAP envelope: {0}")]
    BuildFailed(#[from] EncodeError),
}

/// Classification d'une réponse SOAP qui n'a pas abouti
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// Le corps HTTP n'est pas du XML décodable
    #[error("SOAP response is not valid XML: {0}")]
    ParseError(#[from] DecodeError),

    /// Le serveur a renvoyé un SOAP Fault
    #[error("SOAP fault: {0}")]
    SoapFault(Fault),

    /// Statut de succès mais pas d'enveloppe reconnaissable
    #[error("Response has no recognizable SOAP Envelope/Body")]
    InvalidSoapResponse,

    /// Statut d'erreur sans enveloppe SOAP
    #[error("HTTP status {0} with non-SOAP body: {1}")]
    HttpError(u16, String),
}

impl ResponseError {
    /// Le fault transporté, s'il y en a un
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ResponseError::SoapFault(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Erreur de parsing d'une requête SOAP (côté serveur)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("XML parse error: {0}")]
    Parse(#[from] DecodeError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,

    #[error("No operation found in SOAP Body")]
    NoOperation,
}

/// Erreur de chargement des options
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid SOAP options: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown SOAP version: {0}")]
    UnknownVersion(String),
}
