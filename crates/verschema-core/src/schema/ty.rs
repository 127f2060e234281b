use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Semantic type tag of a field.
///
/// Schema documents carry the tag as a string. The conventional
/// vocabulary parses into dedicated variants (case-insensitively); any
/// other tag is kept verbatim as [`Type::Custom`] and only ever compares
/// equal to the same spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Type {
    /// 32-bit integer
    Int,

    /// 64-bit integer
    BigInt,

    /// Single precision float
    Float,

    /// Double precision float
    Double,

    /// Bounded text
    VarChar,

    /// Unbounded text
    Text,

    /// Civil date
    Date,

    /// Civil date and wall clock time
    DateTime,

    /// Any tag outside the conventional vocabulary
    Custom(String),
}

impl Type {
    pub fn as_str(&self) -> &str {
        match self {
            Type::Int => "INT",
            Type::BigInt => "BIGINT",
            Type::Float => "FLOAT",
            Type::Double => "DOUBLE",
            Type::VarChar => "VARCHAR",
            Type::Text => "TEXT",
            Type::Date => "DATE",
            Type::DateTime => "DATETIME",
            Type::Custom(name) => name,
        }
    }
}

impl FromStr for Type {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "INT" => Type::Int,
            "BIGINT" => Type::BigInt,
            "FLOAT" => Type::Float,
            "DOUBLE" => Type::Double,
            "VARCHAR" => Type::VarChar,
            "TEXT" => Type::Text,
            "DATE" => Type::Date,
            "DATETIME" => Type::DateTime,
            _ => Type::Custom(s.to_string()),
        })
    }
}

impl From<&str> for Type {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Type {
    fn from(s: String) -> Self {
        Type::from(s.as_str())
    }
}

impl From<Type> for String {
    fn from(ty: Type) -> Self {
        match ty {
            Type::Custom(name) => name,
            ty => ty.as_str().to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!(Type::from("bigint"), Type::BigInt);
        assert_eq!(Type::from(" DateTime "), Type::DateTime);
        assert_eq!(Type::from("VARCHAR").to_string(), "VARCHAR");
    }

    #[test]
    fn unknown_tags_are_kept_verbatim() {
        let ty = Type::from("Decimal(10,2)");
        assert_eq!(ty, Type::Custom("Decimal(10,2)".to_string()));
        assert_eq!(ty.to_string(), "Decimal(10,2)");
        assert_ne!(ty, Type::from("DECIMAL(10,2)"));
    }
}
