use super::Type;
use crate::Value;

/// A field of a table in one schema version.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name of the field, unique within its table
    pub name: String,

    /// The field's semantic type tag
    pub ty: Type,

    /// Whether or not the field accepts null
    pub nullable: bool,

    /// Literal used when a row has no value for this field
    pub default: Option<Value>,
}

impl Field {
    /// Creates a nullable field without a default.
    pub fn new(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: true,
            default: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub(super) fn has_diff(&self, other: &Field) -> bool {
        self.ty != other.ty || self.nullable != other.nullable
    }
}
