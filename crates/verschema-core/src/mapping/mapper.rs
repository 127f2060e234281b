use super::{FieldMapping, TableMapping, Transform, Transforms};
use crate::{err, Result, Row, Slot, Value};

use indexmap::IndexMap;
use serde::Serialize;

/// Holds the table mappings between two schema versions and applies them
/// to rows.
///
/// Mappings are keyed by source table name. Rows of a table without a
/// registered mapping pass through unchanged.
#[derive(Debug, Clone)]
pub struct Mapper {
    source_version: String,
    target_version: String,
    mappings: IndexMap<String, TableMapping>,
    transforms: Transforms,
}

/// A row produced by applying a mapping, plus anything worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub row: Row,
    pub warnings: Vec<MappingWarning>,
}

/// A recoverable problem found while applying a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingWarning {
    /// The named transform is not registered; the source value was copied.
    UnknownTransform { field: String, transform: String },
}

impl Mapper {
    pub fn new(source_version: impl Into<String>, target_version: impl Into<String>) -> Self {
        Self {
            source_version: source_version.into(),
            target_version: target_version.into(),
            mappings: IndexMap::new(),
            transforms: Transforms::new(),
        }
    }

    pub fn with_transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn source_version(&self) -> &str {
        &self.source_version
    }

    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn transforms_mut(&mut self) -> &mut Transforms {
        &mut self.transforms
    }

    /// Registers a mapping under its source table, returning the mapping it
    /// replaced.
    pub fn add_table_mapping(&mut self, mapping: TableMapping) -> Option<TableMapping> {
        self.mappings.insert(mapping.source_table.clone(), mapping)
    }

    pub fn table_mapping(&self, source_table: &str) -> Option<&TableMapping> {
        self.mappings.get(source_table)
    }

    pub fn table_mappings(&self) -> impl ExactSizeIterator<Item = &TableMapping> + '_ {
        self.mappings.values()
    }

    /// Maps one row of `table_name`.
    ///
    /// Warnings are logged and dropped; use [`Mapper::apply`] to inspect
    /// them.
    pub fn map_row(&self, table_name: &str, row: &Row) -> Result<Row> {
        let mapped = self.apply(table_name, row)?;
        for warning in &mapped.warnings {
            tracing::warn!(table = table_name, ?warning, "row mapped with warning");
        }
        Ok(mapped.row)
    }

    /// Maps one row of `table_name`, keeping the warnings.
    pub fn apply(&self, table_name: &str, row: &Row) -> Result<MappedRow> {
        match self.mappings.get(table_name) {
            Some(mapping) => apply_mapping(mapping, row, &self.transforms),
            None => Ok(MappedRow {
                row: row.clone(),
                warnings: vec![],
            }),
        }
    }
}

/// Projects `row` through `mapping`.
///
/// The result holds exactly the mapping's target fields, in mapping order.
pub fn apply_mapping(
    mapping: &TableMapping,
    row: &Row,
    transforms: &Transforms,
) -> Result<MappedRow> {
    let mut mapped = MappedRow {
        row: Row::new(),
        warnings: vec![],
    };

    for field_mapping in &mapping.field_mappings {
        let value = apply_field(field_mapping, row, transforms, &mut mapped.warnings)
            .map_err(|cause| {
                cause.context(err!(
                    "mapping field `{}` of table `{}`",
                    field_mapping.target_field,
                    mapping.target_table
                ))
            })?;
        mapped.row.insert(field_mapping.target_field.clone(), value);
    }

    Ok(mapped)
}

fn apply_field(
    field_mapping: &FieldMapping,
    row: &Row,
    transforms: &Transforms,
    warnings: &mut Vec<MappingWarning>,
) -> Result<Value> {
    let slot = match &field_mapping.source_field {
        Some(name) => row.slot(name),
        None => Slot::Absent,
    };

    if slot.is_missing() {
        if let Some(default) = &field_mapping.default_value {
            return Ok(default.clone());
        }
    }

    let Some(transform) = &field_mapping.transform else {
        return Ok(slot.to_value());
    };

    match transform {
        Transform::Named(name) => match transforms.get(name) {
            Some(rule) => rule(slot, row),
            None => {
                warnings.push(MappingWarning::UnknownTransform {
                    field: field_mapping.target_field.clone(),
                    transform: name.clone(),
                });
                Ok(slot.to_value())
            }
        },
        builtin => builtin.cast(&slot.to_value()).unwrap_or_else(|| Ok(slot.to_value())),
    }
}
