use crate::BackupFile;
use anyhow::{bail, Result};
use std::path::Path;
use verschema_core::{
    mapping::{Mapper, Transform},
    Row,
};

/// Brings backed-up rows into a target schema version.
///
/// Rows captured under the target version are returned as stored. Rows
/// from any other version go through the mapper, one row at a time.
#[derive(Debug)]
pub struct Restore {
    target_version: String,
    mapper: Option<Mapper>,
}

impl Restore {
    /// Create a restore into `target_version` with no mapper
    pub fn new(target_version: impl Into<String>) -> Self {
        Self {
            target_version: target_version.into(),
            mapper: None,
        }
    }

    /// Use `mapper` for backups taken under another version
    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    /// Load a backup file and restore its rows
    pub fn restore_file(&self, path: impl AsRef<Path>) -> Result<Vec<Row>> {
        self.restore(BackupFile::load(path)?)
    }

    /// Restore the rows of `backup` into the target version
    pub fn restore(&self, backup: BackupFile) -> Result<Vec<Row>> {
        if backup.schema_version == self.target_version {
            tracing::debug!(
                table = %backup.table_name,
                version = %backup.schema_version,
                rows = backup.data.len(),
                "backup already matches target version"
            );
            return Ok(backup.data);
        }

        let Some(mapper) = &self.mapper else {
            tracing::warn!(
                table = %backup.table_name,
                from = %backup.schema_version,
                to = %self.target_version,
                "no mapper for differing schema versions; restoring rows unchanged"
            );
            return Ok(backup.data);
        };

        if mapper.source_version() != backup.schema_version
            || mapper.target_version() != self.target_version
        {
            bail!(
                "mapper converts {} -> {}, but the backup needs {} -> {}",
                mapper.source_version(),
                mapper.target_version(),
                backup.schema_version,
                self.target_version
            );
        }

        // Every named transform must resolve to a registered rule
        if let Some(mapping) = mapper.table_mapping(&backup.table_name) {
            for field in &mapping.field_mappings {
                if let Some(Transform::Named(name)) = &field.transform {
                    if !mapper.transforms().contains(name) {
                        bail!(
                            "no rule registered for transform `{name}` of field `{}` in table `{}`",
                            field.target_field,
                            backup.table_name
                        );
                    }
                }
            }
        }

        let rows = backup
            .data
            .iter()
            .map(|row| mapper.map_row(&backup.table_name, row))
            .collect::<verschema_core::Result<Vec<_>>>()?;

        tracing::info!(
            table = %backup.table_name,
            from = %backup.schema_version,
            to = %self.target_version,
            rows = rows.len(),
            "restored backup through mapping"
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use verschema_core::{
        mapping::{FieldMapping, TableMapping, Transforms},
        Value,
    };

    fn rows() -> Vec<Row> {
        vec![Row::try_from(json!({"id": 1, "name": "A", "age": 45, "gender": "M"})).unwrap()]
    }

    fn mapper() -> Mapper {
        let mut mapper = Mapper::new("1.0.0", "1.1.0");
        mapper.add_table_mapping(
            TableMapping::new("patients", "patients")
                .with_field(FieldMapping::direct("id"))
                .with_field(FieldMapping::default("email", Value::Null)),
        );
        mapper
    }

    #[test]
    fn same_version_skips_the_mapper() {
        let backup = BackupFile::new("1.1.0", "patients", rows());
        let restored = Restore::new("1.1.0").with_mapper(mapper()).restore(backup).unwrap();
        assert_eq!(restored, rows());
    }

    #[test]
    fn other_version_is_mapped() {
        let backup = BackupFile::new("1.0.0", "patients", rows());
        let restored = Restore::new("1.1.0").with_mapper(mapper()).restore(backup).unwrap();
        assert_eq!(
            restored,
            [Row::try_from(json!({"id": 1, "email": null})).unwrap()]
        );
    }

    #[test]
    fn missing_mapper_returns_rows_unchanged() {
        let backup = BackupFile::new("1.0.0", "patients", rows());
        let restored = Restore::new("1.1.0").restore(backup).unwrap();
        assert_eq!(restored, rows());
    }

    #[test]
    fn unregistered_computed_rule_is_rejected() {
        let mut mapper = Mapper::new("1.0.0", "1.1.0");
        mapper.add_table_mapping(
            TableMapping::new("patients", "patients")
                .with_field(FieldMapping::direct("id"))
                .with_field(FieldMapping::computed("code")),
        );

        let backup = BackupFile::new("1.0.0", "patients", rows());
        let err = Restore::new("1.1.0")
            .with_mapper(mapper)
            .restore(backup)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no rule registered for transform `code` of field `code` in table `patients`"
        );
    }

    #[test]
    fn registered_computed_rule_fills_field() {
        let mut mapper = Mapper::new("1.0.0", "1.1.0").with_transforms(
            Transforms::new().with("code", |_, row| {
                let id = row.get("id").and_then(Value::as_i64).unwrap_or_default();
                Ok(Value::from(format!("P{id:04}")))
            }),
        );
        mapper.add_table_mapping(
            TableMapping::new("patients", "patients")
                .with_field(FieldMapping::direct("id"))
                .with_field(FieldMapping::computed("code")),
        );

        let backup = BackupFile::new("1.0.0", "patients", rows());
        let restored = Restore::new("1.1.0").with_mapper(mapper).restore(backup).unwrap();
        assert_eq!(
            restored,
            [Row::try_from(json!({"id": 1, "code": "P0001"})).unwrap()]
        );
    }

    #[test]
    fn mapper_for_other_versions_is_rejected() {
        let backup = BackupFile::new("0.9.0", "patients", rows());
        let err = Restore::new("1.1.0")
            .with_mapper(mapper())
            .restore(backup)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "mapper converts 1.0.0 -> 1.1.0, but the backup needs 0.9.0 -> 1.1.0"
        );
    }
}
