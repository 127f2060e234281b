use crate::{Error, Result, Row, Slot, Value};

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr, sync::Arc};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value conversion applied while mapping a field.
///
/// Built-in casts are closed variants. [`Transform::Named`] refers to a
/// caller-supplied rule registered in [`Transforms`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Transform {
    Identity,
    ToString,
    ToInt,
    ToBigint,
    ToDouble,
    ToText,
    ToDatetime,
    Named(String),
}

/// A caller-supplied rule producing a target value.
///
/// Receives the source field's slot (absent for fields that only exist in
/// the target) and the whole source row.
pub type ComputeFn = dyn Fn(Slot<'_>, &Row) -> Result<Value> + Send + Sync;

/// Registry of named transforms, keyed by name.
///
/// The mapping generator also consults it: a new target field whose name
/// has a registered rule is filled by that rule.
#[derive(Clone, Default)]
pub struct Transforms {
    rules: IndexMap<String, Arc<ComputeFn>>,
}

impl Transform {
    pub fn named(name: impl Into<String>) -> Self {
        Transform::Named(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Transform::Identity => "identity",
            Transform::ToString => "to_string",
            Transform::ToInt => "to_int",
            Transform::ToBigint => "to_bigint",
            Transform::ToDouble => "to_double",
            Transform::ToText => "to_text",
            Transform::ToDatetime => "to_datetime",
            Transform::Named(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Transform::Named(_))
    }

    /// Applies a built-in cast. Null converts to null.
    ///
    /// Returns `None` for [`Transform::Named`], which needs a [`Transforms`]
    /// registry to resolve.
    pub fn cast(&self, value: &Value) -> Option<Result<Value>> {
        if value.is_null() {
            return self.is_builtin().then_some(Ok(Value::Null));
        }

        Some(match self {
            Transform::Identity => Ok(value.clone()),
            Transform::ToString | Transform::ToText => Ok(Value::from(value.to_text())),
            Transform::ToInt => to_integer(value, i32::MIN.into(), i32::MAX.into(), "INT"),
            Transform::ToBigint => to_integer(value, i64::MIN, i64::MAX, "BIGINT"),
            Transform::ToDouble => to_double(value),
            Transform::ToDatetime => to_datetime(value),
            Transform::Named(_) => return None,
        })
    }
}

fn to_integer(value: &Value, min: i64, max: i64, to_type: &'static str) -> Result<Value> {
    let converted = match value {
        Value::Number(v) => v.as_i64().or_else(|| {
            // Truncates toward zero
            let v = v.as_f64()?.trunc();
            (v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64).then_some(v as i64)
        }),
        Value::Bool(v) => Some(i64::from(*v)),
        Value::String(v) => v.trim().parse::<i64>().ok(),
        _ => None,
    };

    match converted {
        Some(v) if (min..=max).contains(&v) => Ok(Value::from(v)),
        _ => Err(Error::type_conversion(value.clone(), to_type)),
    }
}

fn to_double(value: &Value) -> Result<Value> {
    let converted = match value {
        Value::Number(v) => v.as_f64(),
        Value::String(v) => v.trim().parse::<f64>().ok(),
        _ => None,
    };

    match converted {
        Some(v) if v.is_finite() => Ok(Value::from(v)),
        _ => Err(Error::type_conversion(value.clone(), "DOUBLE")),
    }
}

fn to_datetime(value: &Value) -> Result<Value> {
    let Some(s) = value.as_str().map(str::trim) else {
        return Err(Error::type_conversion(value.clone(), "DATETIME"));
    };

    for format in [
        DATETIME_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if NaiveDateTime::parse_from_str(s, format).is_ok() {
            return Ok(Value::from(s));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| Value::from(datetime.format(DATETIME_FORMAT).to_string()))
        .ok_or_else(|| Error::type_conversion(value.clone(), "DATETIME"))
}

impl FromStr for Transform {
    type Err = Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(match s {
            "identity" => Transform::Identity,
            "to_string" => Transform::ToString,
            "to_int" => Transform::ToInt,
            "to_bigint" => Transform::ToBigint,
            "to_double" => Transform::ToDouble,
            "to_text" => Transform::ToText,
            "to_datetime" => Transform::ToDatetime,
            name => Transform::Named(name.to_string()),
        })
    }
}

impl From<&str> for Transform {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(transform) => transform,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Transform {
    fn from(s: String) -> Self {
        Transform::from(s.as_str())
    }
}

impl From<Transform> for String {
    fn from(transform: Transform) -> Self {
        match transform {
            Transform::Named(name) => name,
            transform => transform.as_str().to_string(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Transforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule under `name`, replacing any previous rule.
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(Slot<'_>, &Row) -> Result<Value> + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    pub fn with<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(Slot<'_>, &Row) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(name, rule);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ComputeFn> {
        self.rules.get(name).map(|rule| &**rule)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.keys().map(String::as_str)
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(transform: Transform, value: impl Into<Value>) -> Result<Value> {
        transform.cast(&value.into()).unwrap()
    }

    #[test]
    fn identifiers_round_trip() {
        for name in [
            "identity",
            "to_string",
            "to_int",
            "to_bigint",
            "to_double",
            "to_text",
            "to_datetime",
        ] {
            let transform = Transform::from(name);
            assert!(transform.is_builtin(), "{name}");
            assert_eq!(transform.to_string(), name);
        }

        assert_eq!(Transform::from("full_name"), Transform::named("full_name"));
    }

    #[test]
    fn null_stays_null() {
        assert_eq!(cast(Transform::ToInt, Value::Null).unwrap(), Value::Null);
        assert_eq!(cast(Transform::ToText, Value::Null).unwrap(), Value::Null);
        assert!(Transform::named("x").cast(&Value::Null).is_none());
    }

    #[test]
    fn integer_casts() {
        assert_eq!(cast(Transform::ToBigint, 45).unwrap(), Value::from(45));
        assert_eq!(cast(Transform::ToInt, " 12 ").unwrap(), Value::from(12));
        assert_eq!(cast(Transform::ToInt, 3.9).unwrap(), Value::from(3));
        assert_eq!(cast(Transform::ToInt, true).unwrap(), Value::from(1));

        let err = cast(Transform::ToInt, i64::from(i32::MAX) + 1).unwrap_err();
        assert!(err.is_type_conversion());
        assert!(cast(Transform::ToBigint, "abc").unwrap_err().is_type_conversion());
        assert!(cast(Transform::ToBigint, u64::MAX).unwrap_err().is_type_conversion());
    }

    #[test]
    fn double_and_text_casts() {
        assert_eq!(cast(Transform::ToDouble, 2).unwrap(), Value::from(2.0));
        assert_eq!(cast(Transform::ToDouble, "2.5").unwrap(), Value::from(2.5));
        assert!(cast(Transform::ToDouble, "inf").unwrap_err().is_type_conversion());
        assert_eq!(cast(Transform::ToText, 45).unwrap(), Value::from("45"));
        assert_eq!(cast(Transform::ToString, "A").unwrap(), Value::from("A"));
    }

    #[test]
    fn datetime_cast() {
        assert_eq!(
            cast(Transform::ToDatetime, "2024-02-06").unwrap(),
            Value::from("2024-02-06 00:00:00")
        );
        assert_eq!(
            cast(Transform::ToDatetime, "2024-02-06 12:30:00").unwrap(),
            Value::from("2024-02-06 12:30:00")
        );
        assert!(cast(Transform::ToDatetime, "06/02/2024").is_err());
        assert!(cast(Transform::ToDatetime, 20240206).is_err());
    }

    #[test]
    fn registry_lists_rules() {
        let transforms = Transforms::new()
            .with("full_name", |_, row| {
                let first = row.get("first").and_then(Value::to_text).unwrap_or_default();
                let last = row.get("last").and_then(Value::to_text).unwrap_or_default();
                Ok(Value::from(format!("{first} {last}")))
            })
            .with("zero", |_, _| Ok(Value::from(0)));

        assert!(transforms.contains("full_name"));
        assert!(!transforms.contains("to_int"));
        assert_eq!(transforms.names().collect::<Vec<_>>(), ["full_name", "zero"]);
        assert_eq!(format!("{transforms:?}"), r#"{"full_name", "zero"}"#);

        let row: Row = [("first", "Ada"), ("last", "Lovelace")].into_iter().collect();
        let rule = transforms.get("full_name").unwrap();
        assert_eq!(rule(Slot::Absent, &row).unwrap(), Value::from("Ada Lovelace"));
    }
}
