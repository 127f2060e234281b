use crate::{Error, Result, Value};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single row keyed by field name.
///
/// Field order is preserved so a restored row serializes in the order its
/// mapping emitted the fields.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

/// The state of one field when looked up in a [`Row`].
///
/// A key that is missing and a key explicitly set to null are both "no
/// value" for default-fill purposes, but they are reported separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Present(&'a Value),
    Null,
    Absent,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn slot(&self, name: &str) -> Slot<'_> {
        match self.fields.get(name) {
            Some(Value::Null) => Slot::Null,
            Some(value) => Slot::Present(value),
            None => Slot::Absent,
        }
    }

    /// Sets a field, keeping its position if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<'a> Slot<'a> {
    /// Returns the value when one is present.
    pub fn value(&self) -> Option<&'a Value> {
        match *self {
            Slot::Present(value) => Some(value),
            Slot::Null | Slot::Absent => None,
        }
    }

    /// `true` when the field is absent or explicitly null.
    pub fn is_missing(&self) -> bool {
        !matches!(self, Slot::Present(_))
    }

    /// The value as it would be copied into a target row.
    pub fn to_value(&self) -> Value {
        self.value().cloned().unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl TryFrom<serde_json::Value> for Row {
    type Error = Error;

    fn try_from(src: serde_json::Value) -> Result<Self> {
        match src {
            serde_json::Value::Object(fields) => Ok(fields.into_iter().collect()),
            other => Err(crate::err!("expected a row object, got {other}")),
        }
    }
}

impl From<Row> for serde_json::Value {
    fn from(src: Row) -> Self {
        serde_json::Value::Object(
            src.fields
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slot_distinguishes_null_from_absent() {
        let row = Row::try_from(json!({"id": 1, "email": null})).unwrap();

        assert_eq!(row.slot("id"), Slot::Present(&Value::from(1)));
        assert_eq!(row.slot("email"), Slot::Null);
        assert_eq!(row.slot("phone"), Slot::Absent);
        assert!(row.slot("email").is_missing());
        assert!(row.slot("phone").is_missing());
        assert_eq!(row.slot("phone").to_value(), Value::Null);
    }

    #[test]
    fn non_object_is_rejected() {
        let err = Row::try_from(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "expected a row object, got [1,2]");
    }

    #[test]
    fn field_order_is_preserved() {
        let row: Row = [("z", 1), ("a", 2)].into_iter().collect();
        assert_eq!(row.keys().collect::<Vec<_>>(), ["z", "a"]);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
