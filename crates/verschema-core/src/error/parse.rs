use super::Error;

/// Error when a schema version document is malformed.
///
/// This occurs when:
/// - The document lacks a `version` or `tables` key
/// - A table lacks its `fields` map
/// - A table declares no primary key field
/// - Two documents in the same directory declare the same version label
#[derive(Debug)]
pub(super) struct ParseError {
    message: Box<str>,
}

impl std::error::Error for ParseError {}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema document: {}", self.message)
    }
}

impl Error {
    /// Creates a parse error for a malformed schema version document.
    pub fn parse(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Parse(_))
    }
}
