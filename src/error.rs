//! Error types for link matcher configuration.

use thiserror::Error;

/// Errors that can occur while configuring a link matcher or converting a found link.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkifyError {
    /// The schema name is empty, not ASCII, or contains whitespace.
    #[error("Invalid schema name: {0:?}")]
    InvalidSchema(String),

    /// An alias points at a schema that is not registered.
    #[error("Schema {schema:?} aliases unknown schema {target:?}")]
    UnknownAlias { schema: String, target: String },

    /// The top-level domain is empty, dotted, or contains whitespace.
    #[error("Invalid top-level domain: {0:?}")]
    InvalidTld(String),

    /// URL parsing failed using the url crate.
    #[error("URL parsing error: {0}")]
    UrlParseError(String),
}

impl From<url::ParseError> for LinkifyError {
    fn from(err: url::ParseError) -> Self {
        LinkifyError::UrlParseError(err.to_string())
    }
}
