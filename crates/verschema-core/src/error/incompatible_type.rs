use super::Error;

/// Error when a field changes type in a way that is neither identical nor a
/// known widening conversion.
///
/// Only raised by a generator running in strict mode. Otherwise the field
/// receives an `identity` cast and is listed in
/// [`MappingStats::incompatible_fields`](crate::mapping::MappingStats).
#[derive(Debug)]
pub(super) struct IncompatibleTypeError {
    field: Box<str>,
    from: Box<str>,
    to: Box<str>,
}

impl std::error::Error for IncompatibleTypeError {}

impl core::fmt::Display for IncompatibleTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "incompatible type change for {}: {} -> {}",
            self.field, self.from, self.to
        )
    }
}

impl Error {
    /// Creates an incompatible type error for `field`.
    pub fn incompatible_type(
        field: impl Into<String>,
        from: impl core::fmt::Display,
        to: impl core::fmt::Display,
    ) -> Error {
        Error::from(super::ErrorKind::IncompatibleType(IncompatibleTypeError {
            field: field.into().into(),
            from: from.to_string().into(),
            to: to.to_string().into(),
        }))
    }

    /// Returns `true` if this error is an incompatible type error.
    pub fn is_incompatible_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IncompatibleType(_))
    }
}
