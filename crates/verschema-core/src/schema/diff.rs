use super::{Field, SchemaVersion, Table, Type};

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// Structural difference between two schema versions.
///
/// Only table presence and each field's presence, `type` and `nullable`
/// are compared. Changes to defaults, primary keys or foreign keys are not
/// reported.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SchemaDiff {
    /// Tables present in the newer version only, in its table order
    pub added_tables: Vec<String>,

    /// Tables present in the older version only, in its table order
    pub removed_tables: Vec<String>,

    /// Tables present in both versions whose fields changed
    pub modified_tables: IndexMap<String, TableDiff>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TableDiff {
    pub added_fields: Vec<String>,
    pub removed_fields: Vec<String>,
    pub modified_fields: IndexMap<String, FieldChange>,
}

/// Old and new shape of a field present in both versions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub old: FieldShape,
    pub new: FieldShape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldShape {
    #[serde(rename = "type")]
    pub ty: Type,
    pub nullable: bool,
}

impl SchemaDiff {
    pub fn from(from: &SchemaVersion, to: &SchemaVersion) -> Self {
        let mut diff = SchemaDiff::default();

        for (name, from_table) in &from.tables {
            match to.tables.get(name) {
                Some(to_table) => {
                    if let Some(table_diff) = TableDiff::from(from_table, to_table) {
                        diff.modified_tables.insert(name.clone(), table_diff);
                    }
                }
                None => diff.removed_tables.push(name.clone()),
            }
        }

        for name in to.tables.keys() {
            if !from.tables.contains_key(name) {
                diff.added_tables.push(name.clone());
            }
        }

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added_tables.is_empty()
            && self.removed_tables.is_empty()
            && self.modified_tables.is_empty()
    }
}

impl TableDiff {
    /// Compares two definitions of the same table, returning `None` when no
    /// field was added, removed or changed.
    pub fn from(from: &Table, to: &Table) -> Option<Self> {
        let from_map = HashMap::<&str, &Field>::from_iter(
            from.fields.iter().map(|from| (from.name.as_str(), from)),
        );
        let to_map =
            HashMap::<&str, &Field>::from_iter(to.fields.iter().map(|to| (to.name.as_str(), to)));

        let mut diff = TableDiff::default();

        for from in &from.fields {
            match to_map.get(from.name.as_str()) {
                Some(to) => {
                    if from.has_diff(to) {
                        diff.modified_fields.insert(
                            from.name.clone(),
                            FieldChange {
                                old: FieldShape::from(from),
                                new: FieldShape::from(*to),
                            },
                        );
                    }
                }
                None => diff.removed_fields.push(from.name.clone()),
            }
        }

        for to in &to.fields {
            if !from_map.contains_key(to.name.as_str()) {
                diff.added_fields.push(to.name.clone());
            }
        }

        (!diff.is_empty()).then_some(diff)
    }

    pub fn is_empty(&self) -> bool {
        self.added_fields.is_empty()
            && self.removed_fields.is_empty()
            && self.modified_fields.is_empty()
    }
}

impl From<&Field> for FieldShape {
    fn from(field: &Field) -> Self {
        FieldShape {
            ty: field.ty.clone(),
            nullable: field.nullable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn patients_v1() -> Table {
        Table::new("patients")
            .with_field(Field::new("id", Type::Int).with_nullable(false))
            .with_field(Field::new("name", Type::VarChar))
            .with_field(Field::new("age", Type::Int))
            .with_primary_key(["id"])
    }

    #[test]
    fn unchanged_table_has_no_diff() {
        assert_eq!(TableDiff::from(&patients_v1(), &patients_v1()), None);
    }

    #[test]
    fn default_and_key_changes_are_not_detected() {
        let mut to = patients_v1()
            .with_primary_key(["id", "name"])
            .with_foreign_key("age", "ages.value");
        to.fields[2].default = Some(crate::Value::from(0));

        assert_eq!(TableDiff::from(&patients_v1(), &to), None);
    }

    #[test]
    fn field_changes() {
        let mut to = patients_v1().with_field(Field::new("email", Type::VarChar));
        to.fields.retain(|field| field.name != "name");
        to.fields[1].ty = Type::BigInt;
        to.fields[0].nullable = true;

        let diff = TableDiff::from(&patients_v1(), &to).unwrap();
        assert_eq!(diff.added_fields, ["email"]);
        assert_eq!(diff.removed_fields, ["name"]);
        assert_eq!(
            diff.modified_fields.keys().collect::<Vec<_>>(),
            ["id", "age"]
        );
        assert_eq!(
            diff.modified_fields["age"],
            FieldChange {
                old: FieldShape {
                    ty: Type::Int,
                    nullable: true
                },
                new: FieldShape {
                    ty: Type::BigInt,
                    nullable: true
                },
            }
        );
    }

    #[test]
    fn serializes_with_type_key() {
        let change = FieldChange {
            old: FieldShape {
                ty: Type::Int,
                nullable: true,
            },
            new: FieldShape {
                ty: Type::BigInt,
                nullable: false,
            },
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({
                "old": {"type": "INT", "nullable": true},
                "new": {"type": "BIGINT", "nullable": false}
            })
        );
    }
}
