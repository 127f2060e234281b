//! The on-disk JSON form of a schema version.
//!
//! ```json
//! {
//!   "version": "1.1.0",
//!   "description": "adds email",
//!   "tables": {
//!     "patients": {
//!       "fields": {
//!         "id": { "type": "INT", "nullable": false, "primary_key": true },
//!         "email": { "type": "VARCHAR" }
//!       },
//!       "foreign_keys": { "ward_id": "wards.id" }
//!     }
//!   }
//! }
//! ```

use super::{Field, SchemaVersion, Table, Type};
use crate::{Error, Result, Value};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SchemaDocument {
    version: String,

    #[serde(default)]
    description: String,

    tables: IndexMap<String, TableDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableDocument {
    fields: IndexMap<String, FieldDocument>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    foreign_keys: IndexMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldDocument {
    #[serde(rename = "type")]
    ty: Type,

    #[serde(default = "default_nullable")]
    nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,

    #[serde(default, skip_serializing_if = "is_false")]
    primary_key: bool,
}

fn default_nullable() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Parses one schema version document. `origin` names the file the
/// document came from and prefixes every error message.
pub(super) fn parse(contents: &str, origin: Option<&Path>) -> Result<SchemaVersion> {
    let prefix = |message: String| match origin {
        Some(path) => Error::parse(format!("{}: {message}", path.display())),
        None => Error::parse(message),
    };

    let document: SchemaDocument =
        serde_json::from_str(contents).map_err(|err| prefix(err.to_string()))?;

    let mut version = SchemaVersion::new(document.version).with_description(document.description);

    for (table_name, table_document) in document.tables {
        let mut table = Table::new(&table_name);

        for (field_name, field_document) in table_document.fields {
            if field_document.primary_key {
                table.primary_key.push(field_name.clone());
            }

            table.fields.push(Field {
                name: field_name,
                ty: field_document.ty,
                nullable: field_document.nullable,
                default: field_document.default,
            });
        }

        if table.primary_key.is_empty() {
            return Err(prefix(format!(
                "table `{table_name}` declares no primary key field"
            )));
        }

        table.foreign_keys = table_document.foreign_keys;
        version.tables.insert(table_name, table);
    }

    Ok(version)
}

impl From<&SchemaVersion> for SchemaDocument {
    fn from(version: &SchemaVersion) -> Self {
        let tables = version
            .tables
            .iter()
            .map(|(name, table)| {
                let fields = table
                    .fields
                    .iter()
                    .map(|field| {
                        let document = FieldDocument {
                            ty: field.ty.clone(),
                            nullable: field.nullable,
                            default: field.default.clone(),
                            primary_key: table.is_primary_key(&field.name),
                        };
                        (field.name.clone(), document)
                    })
                    .collect();

                let document = TableDocument {
                    fields,
                    foreign_keys: table.foreign_keys.clone(),
                };
                (name.clone(), document)
            })
            .collect();

        SchemaDocument {
            version: version.version.clone(),
            description: version.description.clone(),
            tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse_json(value: serde_json::Value) -> Result<SchemaVersion> {
        parse(&value.to_string(), None)
    }

    #[test]
    fn parses_fields_in_document_order() {
        let version = parse_json(json!({
            "version": "1.0.0",
            "description": "initial",
            "tables": {
                "patients": {
                    "fields": {
                        "id": {"type": "INT", "nullable": false, "primary_key": true},
                        "name": {"type": "VARCHAR"},
                        "status": {"type": "VARCHAR", "nullable": false, "default": "active"}
                    },
                    "foreign_keys": {"ward_id": "wards.id"}
                }
            }
        }))
        .unwrap();

        let patients = version.table("patients").unwrap();
        assert_eq!(
            patients.field_names().collect::<Vec<_>>(),
            ["id", "name", "status"]
        );
        assert_eq!(patients.primary_key, ["id"]);
        assert!(patients.field("name").unwrap().nullable);
        assert_eq!(
            patients.field("status").unwrap().default,
            Some(Value::from("active"))
        );
        assert_eq!(patients.foreign_keys["ward_id"], "wards.id");
        assert_eq!(version.description, "initial");
    }

    #[test]
    fn description_is_optional() {
        let version = parse_json(json!({
            "version": "1.0.0",
            "tables": {}
        }))
        .unwrap();
        assert_eq!(version.description, "");
        assert!(version.tables.is_empty());
    }

    #[test]
    fn missing_version_is_a_parse_error() {
        let err = parse_json(json!({"tables": {}})).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("missing field `version`"), "{err}");
    }

    #[test]
    fn missing_tables_is_a_parse_error() {
        let err = parse_json(json!({"version": "1.0.0"})).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("missing field `tables`"), "{err}");
    }

    #[test]
    fn table_without_fields_is_a_parse_error() {
        let err = parse_json(json!({
            "version": "1.0.0",
            "tables": {"patients": {"foreign_keys": {}}}
        }))
        .unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("missing field `fields`"), "{err}");
    }

    #[test]
    fn table_without_primary_key_is_a_parse_error() {
        let err = parse(
            &json!({
                "version": "1.0.0",
                "tables": {"notes": {"fields": {"body": {"type": "TEXT"}}}}
            })
            .to_string(),
            Some(Path::new("schemas/v1.json")),
        )
        .unwrap_err();
        assert!(err.is_parse());
        assert_eq!(
            err.to_string(),
            "invalid schema document: schemas/v1.json: table `notes` declares no primary key field"
        );
    }

    #[test]
    fn renders_back_to_an_equivalent_document() {
        let source = json!({
            "version": "2.0.0",
            "description": "",
            "tables": {
                "visits": {
                    "fields": {
                        "id": {"type": "BIGINT", "nullable": false, "primary_key": true},
                        "patient_id": {"type": "INT", "nullable": true},
                        "visited_on": {"type": "DATE", "nullable": true, "default": "1970-01-01"}
                    },
                    "foreign_keys": {"patient_id": "patients.id"}
                }
            }
        });

        let version = parse_json(source.clone()).unwrap();
        let rendered: serde_json::Value = serde_json::from_str(&version.to_json().unwrap()).unwrap();
        assert_eq!(rendered, source);
    }
}
