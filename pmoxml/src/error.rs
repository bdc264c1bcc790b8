use thiserror::Error;

/// Errors raised while turning XML text into a [`Value`](crate::Value).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Empty XML input")]
    EmptyInput,

    #[error("Input is not UTF-8 text: {0}")]
    InvalidInput(String),
}

impl DecodeError {
    pub(crate) fn malformed(message: impl std::fmt::Display) -> Self {
        DecodeError::Malformed(message.to_string())
    }
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        DecodeError::Malformed(err.to_string())
    }
}

/// Errors raised while rendering a [`Value`](crate::Value) as XML text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The top-level value is not a plain element mapping.
    #[error("XML root must be a mapping of element names to values")]
    InvalidRoot,

    #[error("Internal encoder error: {0}")]
    InternalError(String),
}

impl EncodeError {
    pub(crate) fn internal(message: impl std::fmt::Display) -> Self {
        EncodeError::InternalError(message.to_string())
    }
}
