use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A literal carried by a row, a field default or a mapping rule.
///
/// Values cross the persistence boundary as JSON, so the variants mirror
/// JSON's data model. Numbers keep their JSON text, so a value read from a
/// document writes back exactly as it was read.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// A JSON number, integer or float
    Number(serde_json::Number),

    /// String value
    String(String),

    /// A list of values
    List(Vec<Value>),

    /// A nested object
    Object(IndexMap<String, Value>),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(v) => v.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(v) => v.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => v.as_f64(),
            _ => None,
        }
    }

    /// Renders a scalar the way it reads as text, used by the text casts.
    ///
    /// Lists and objects render as compact JSON.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(v) => Some(v.to_string()),
            Self::Number(v) => Some(v.to_string()),
            Self::String(v) => Some(v.clone()),
            Self::List(_) | Self::Object(_) => {
                Some(serde_json::Value::from(self.clone()).to_string())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::Number(src.into())
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::Number(src.into())
    }
}

impl From<u64> for Value {
    fn from(src: u64) -> Self {
        Self::Number(src.into())
    }
}

/// NaN and infinities have no JSON form and convert to null.
impl From<f64> for Value {
    fn from(src: f64) -> Self {
        serde_json::Number::from_f64(src)
            .map(Self::Number)
            .unwrap_or(Self::Null)
    }
}

impl From<serde_json::Number> for Value {
    fn from(src: serde_json::Number) -> Self {
        Self::Number(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        src.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match src {
            Json::Null => Self::Null,
            Json::Bool(v) => Self::Bool(v),
            Json::Number(n) => Self::Number(n),
            Json::String(v) => Self::String(v),
            Json::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(src: Value) -> Self {
        use serde_json::Value as Json;

        match src {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(v),
            Value::Number(v) => Json::Number(v),
            Value::String(v) => Json::String(v),
            Value::List(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Value::Object(fields) => Json::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Json::from(value)))
                    .collect(),
            ),
        }
    }
}
