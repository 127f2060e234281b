use super::Transform;
use crate::Value;

use serde::{Deserialize, Deserializer, Serialize};

/// How a single target field gets its value.
///
/// At apply time exactly one of three sources drives the value: the
/// `default_value` when the source value is missing, otherwise the
/// `transform`, otherwise a plain copy. [`MappingKind`] only labels the
/// rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field read from the source row. `None` when the target field has no
    /// source counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_field: Option<String>,

    /// Field written to the target row
    pub target_field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,

    /// Literal used when the source value is missing. `Some(Value::Null)`
    /// is an explicit null default.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,

    #[serde(rename = "mapping_type", default)]
    pub kind: MappingKind,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// Copied unchanged
    #[default]
    Direct,

    /// Converted by a widening cast
    Cast,

    /// Filled from a literal
    Default,

    /// Filled by a caller-supplied rule
    Computed,
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FieldMapping {
    /// Copies `source` into `target` unchanged.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_field: Some(source.into()),
            target_field: target.into(),
            transform: None,
            default_value: None,
            kind: MappingKind::Direct,
        }
    }

    pub fn direct(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name)
    }

    pub fn cast(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            kind: MappingKind::Cast,
            ..Self::direct(name).with_transform(transform)
        }
    }

    /// Fills a target-only field with `value`.
    // NOTE: named after the mapping kind, not `Default::default`.
    #[allow(clippy::should_implement_trait)]
    pub fn default(target: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            source_field: None,
            target_field: target.into(),
            transform: None,
            default_value: Some(value.into()),
            kind: MappingKind::Default,
        }
    }

    /// Fills a target-only field with the rule registered under its name.
    pub fn computed(target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            source_field: None,
            transform: Some(Transform::Named(target.clone())),
            target_field: target,
            default_value: None,
            kind: MappingKind::Computed,
        }
    }

    pub fn with_transform(mut self, transform: impl Into<Transform>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_kind(mut self, kind: MappingKind) -> Self {
        self.kind = kind;
        self
    }
}
