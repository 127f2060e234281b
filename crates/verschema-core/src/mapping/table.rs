use super::FieldMapping;

use serde::{Deserialize, Serialize};

/// Field rules turning rows of `source_table` into rows of `target_table`.
///
/// Applying the mapping is a projection: the output row holds exactly the
/// target fields listed in `field_mappings`, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMapping {
    pub source_table: String,
    pub target_table: String,

    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,

    /// Row filter expression. Stored and persisted, never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl TableMapping {
    pub fn new(source_table: impl Into<String>, target_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            target_table: target_table.into(),
            field_mappings: vec![],
            condition: None,
        }
    }

    pub fn with_field(mut self, field_mapping: FieldMapping) -> Self {
        self.field_mappings.push(field_mapping);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn field(&self, target_field: &str) -> Option<&FieldMapping> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.target_field == target_field)
    }

    pub fn target_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.field_mappings
            .iter()
            .map(|mapping| mapping.target_field.as_str())
    }
}
