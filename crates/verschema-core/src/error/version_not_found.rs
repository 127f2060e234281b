use super::Error;

/// Error when a lookup or diff names a version label that is not registered.
#[derive(Debug)]
pub(super) struct VersionNotFoundError {
    version: Box<str>,
}

impl std::error::Error for VersionNotFoundError {}

impl core::fmt::Display for VersionNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "schema version not found: {}", self.version)
    }
}

impl Error {
    /// Creates a version-not-found error for the given label.
    pub fn version_not_found(version: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::VersionNotFound(VersionNotFoundError {
            version: version.into().into(),
        }))
    }

    /// Returns `true` if this error is a version-not-found error.
    pub fn is_version_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::VersionNotFound(_))
    }
}
