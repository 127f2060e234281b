use super::{FieldMapping, MappingStats, TableMapping, Transforms};
use crate::{
    schema::{Field, SchemaVersion},
    typemap, Error, Result, Value,
};

use std::collections::{HashMap, HashSet};

/// Derives field rules for moving rows from one schema version to another.
///
/// Generation is a pure function of the two versions, the set of computed
/// rule names and the strictness flag. Counters are returned per call.
#[derive(Debug, Clone)]
pub struct MappingGenerator<'a> {
    source: &'a SchemaVersion,
    target: &'a SchemaVersion,

    /// Target field names that have a caller-supplied computed rule
    computed: HashSet<String>,

    /// Fail on incompatible type changes instead of casting with `identity`
    strict: bool,
}

/// A generated table mapping and the counters describing how complete it is.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMapping {
    pub mapping: TableMapping,
    pub stats: MappingStats,
}

impl<'a> MappingGenerator<'a> {
    pub fn new(source: &'a SchemaVersion, target: &'a SchemaVersion) -> Self {
        Self {
            source,
            target,
            computed: HashSet::new(),
            strict: false,
        }
    }

    /// Declares target fields that have computed rules.
    pub fn with_computed<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.computed.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares every rule of `transforms` as a computed rule.
    pub fn with_transforms(self, transforms: &Transforms) -> Self {
        self.with_computed(transforms.names())
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn source(&self) -> &'a SchemaVersion {
        self.source
    }

    pub fn target(&self) -> &'a SchemaVersion {
        self.target
    }

    /// Generates the mapping for `table_name`, which must exist in both
    /// versions.
    ///
    /// Fields present in both versions come first, then fields new in the
    /// target; both groups follow the target table's field order. Fields
    /// only in the source are dropped. A new field that is not nullable
    /// and has neither a default nor a computed rule gets no rule and is
    /// counted in [`MappingStats::manual`]; check
    /// [`MappingStats::is_complete`] before relying on the mapping.
    pub fn generate_automatic_mapping(&self, table_name: &str) -> Result<GeneratedMapping> {
        let source_table = self.source.require_table(table_name)?;
        let target_table = self.target.require_table(table_name)?;

        let source_fields = HashMap::<&str, &Field>::from_iter(
            source_table
                .fields
                .iter()
                .map(|field| (field.name.as_str(), field)),
        );
        let target_names: HashSet<&str> = target_table.field_names().collect();

        let mut mapping = TableMapping::new(table_name, table_name);
        let mut stats = MappingStats::default();

        // Fields present in both versions
        for target_field in &target_table.fields {
            let Some(source_field) = source_fields.get(target_field.name.as_str()) else {
                continue;
            };

            let field_mapping = if source_field.ty == target_field.ty {
                FieldMapping::direct(&target_field.name)
            } else {
                if !typemap::is_compatible(&source_field.ty, &target_field.ty) {
                    if self.strict {
                        return Err(Error::incompatible_type(
                            format!("{table_name}.{}", target_field.name),
                            &source_field.ty,
                            &target_field.ty,
                        ));
                    }

                    tracing::warn!(
                        table = table_name,
                        field = %target_field.name,
                        from = %source_field.ty,
                        to = %target_field.ty,
                        "incompatible type change; copying value unchanged"
                    );
                    stats.incompatible_fields.push(target_field.name.clone());
                }

                FieldMapping::cast(
                    &target_field.name,
                    typemap::cast_for(&source_field.ty, &target_field.ty),
                )
            };

            mapping.field_mappings.push(field_mapping);
            stats.auto_generated += 1;
        }

        // Fields only in the source are deprecated and dropped
        for source_field in &source_table.fields {
            if !target_names.contains(source_field.name.as_str()) {
                tracing::debug!(
                    table = table_name,
                    field = %source_field.name,
                    "field removed in target version"
                );
            }
        }

        // Fields only in the target
        for target_field in &target_table.fields {
            if source_fields.contains_key(target_field.name.as_str()) {
                continue;
            }

            let field_mapping = if let Some(default) = &target_field.default {
                FieldMapping::default(&target_field.name, default.clone())
            } else if self.computed.contains(&target_field.name) {
                FieldMapping::computed(&target_field.name)
            } else if target_field.nullable {
                FieldMapping::default(&target_field.name, Value::Null)
            } else {
                tracing::warn!(
                    table = table_name,
                    field = %target_field.name,
                    "required field has no default or computed rule; manual mapping needed"
                );
                stats.manual += 1;
                stats.manual_fields.push(target_field.name.clone());
                continue;
            };

            mapping.field_mappings.push(field_mapping);
            stats.auto_generated += 1;
        }

        tracing::debug!(
            table = table_name,
            source = %self.source.version,
            target = %self.target.version,
            auto_generated = stats.auto_generated,
            manual = stats.manual,
            "generated table mapping"
        );

        Ok(GeneratedMapping { mapping, stats })
    }

    /// Generates mappings for every table present in both versions, in
    /// source table order.
    ///
    /// Tables needing manual work do not stop the run; inspect each
    /// result's stats.
    pub fn generate_all(&self) -> Result<Vec<GeneratedMapping>> {
        self.source
            .tables
            .keys()
            .filter(|name| self.target.tables.contains_key(*name))
            .map(|name| self.generate_automatic_mapping(name))
            .collect()
    }
}

impl GeneratedMapping {
    pub fn is_complete(&self) -> bool {
        self.stats.is_complete()
    }
}
