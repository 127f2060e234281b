use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use verschema_cli::{BackupFile, Config, MappingFile, Restore, VerschemaCli};
use verschema_core::{mapping::Transforms, Row, Value};

fn write_json(path: &Path, value: &serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn workspace() -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let schemas = dir.path().join("schemas");
    fs::create_dir_all(&schemas).unwrap();

    write_json(
        &schemas.join("v1.json"),
        &json!({
            "version": "1.0.0",
            "tables": {
                "patients": {
                    "fields": {
                        "id": {"type": "INT", "nullable": false, "primary_key": true},
                        "name": {"type": "VARCHAR"},
                        "age": {"type": "INT"},
                        "gender": {"type": "VARCHAR"}
                    }
                }
            }
        }),
    );
    write_json(
        &schemas.join("v2.json"),
        &json!({
            "version": "1.1.0",
            "tables": {
                "patients": {
                    "fields": {
                        "id": {"type": "INT", "nullable": false, "primary_key": true},
                        "name": {"type": "VARCHAR"},
                        "age": {"type": "BIGINT"},
                        "email": {"type": "VARCHAR"}
                    }
                }
            }
        }),
    );

    write_json(
        &schemas.join("v3.json"),
        &json!({
            "version": "1.2.0",
            "tables": {
                "patients": {
                    "fields": {
                        "id": {"type": "INT", "nullable": false, "primary_key": true},
                        "name": {"type": "VARCHAR"},
                        "code": {"type": "VARCHAR", "nullable": false}
                    }
                }
            }
        }),
    );

    let config = Config::new()
        .schema_dir(schemas)
        .backup_dir(dir.path().join("backups"))
        .mapping_dir(dir.path().join("mappings"));

    (dir, config)
}

fn only_file_in(dir: &Path) -> PathBuf {
    let entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "{entries:?}");
    entries.into_iter().next().unwrap()
}

#[test]
fn same_version_restore_is_lossless() {
    let data = concat!(
        r#"[{"id":18446744073709551615,"name":"A","age":45,"gender":"M"},"#,
        r#"{"id":2,"name":null,"score":1e2,"ratio":1.50,"tags":["x","y"],"meta":{"z":1,"a":2}}]"#,
    );
    let rows: Vec<Row> = serde_json::from_str(data).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = BackupFile::new("1.1.0", "patients", rows)
        .save_in(dir.path())
        .unwrap();

    let restored = Restore::new("1.1.0").restore_file(&path).unwrap();
    assert_eq!(serde_json::to_string(&restored).unwrap(), data);
}

#[test]
fn restore_through_saved_mapping_file() {
    let (_dir, config) = workspace();
    let registry = verschema_core::schema::Registry::load(&config.schema_dir).unwrap();

    let generated = registry
        .generator("1.0.0", "1.1.0")
        .unwrap()
        .generate_all()
        .unwrap();
    let path = config.mapping_file_path("1.0.0", "1.1.0");
    MappingFile::new("1.0.0", "1.1.0")
        .with_generated(generated)
        .save(&path)
        .unwrap();

    let mapper = MappingFile::load(&path).unwrap().into_mapper(Transforms::new());
    let backup = BackupFile::new(
        "1.0.0",
        "patients",
        vec![Row::try_from(json!({"id": 1, "name": "A", "age": 45, "gender": "M"})).unwrap()],
    );

    let restored = Restore::new("1.1.0").with_mapper(mapper).restore(backup).unwrap();
    assert_eq!(
        serde_json::to_value(&restored).unwrap(),
        json!([{"id": 1, "name": "A", "age": 45, "email": null}])
    );
}

#[test]
fn cli_generate_backup_restore() {
    let (dir, config) = workspace();
    let cli = VerschemaCli::with_config(config.clone());

    cli.parse_from(["verschema", "mapping", "generate", "1.0.0", "1.1.0"])
        .unwrap();
    assert!(config.mapping_file_path("1.0.0", "1.1.0").exists());

    let rows_path = dir.path().join("rows.json");
    write_json(
        &rows_path,
        &json!([{"id": 1, "name": "A", "age": 45, "gender": "M"}]),
    );
    cli.parse_from([
        "verschema",
        "backup",
        "1.0.0",
        "patients",
        rows_path.to_str().unwrap(),
    ])
    .unwrap();

    let backup_path = only_file_in(&config.backup_dir);
    let backup = BackupFile::load(&backup_path).unwrap();
    assert_eq!(backup.row_count, 1);
    assert_eq!(backup.schema_version, "1.0.0");

    let output = dir.path().join("restored.json");
    cli.parse_from([
        "verschema",
        "restore",
        backup_path.to_str().unwrap(),
        "--target",
        "1.1.0",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let restored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        restored,
        json!([{"id": 1, "name": "A", "age": 45, "email": null}])
    );
}

#[test]
fn cli_reports_unknown_version() {
    let (_dir, config) = workspace();
    let err = VerschemaCli::with_config(config)
        .parse_from(["verschema", "schema", "show", "9.9.9"])
        .unwrap_err();
    assert_eq!(err.to_string(), "schema version not found: 9.9.9");
}

#[test]
fn cli_strict_generation_fails_on_narrowing() {
    let (_dir, config) = workspace();
    let err = VerschemaCli::with_config(config.clone())
        .parse_from(["verschema", "mapping", "generate", "1.1.0", "1.0.0", "--strict"])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "incompatible type change for patients.age: BIGINT -> INT"
    );
    assert!(!config.mapping_file_path("1.1.0", "1.0.0").exists());
}

fn patient_code() -> Transforms {
    Transforms::new().with("code", |_, row| {
        let id = row.get("id").and_then(Value::as_i64).unwrap_or_default();
        Ok(Value::from(format!("P{id:04}")))
    })
}

#[test]
fn cli_configured_computed_field_without_rule_stays_unmapped() {
    let (_dir, mut config) = workspace();
    config.mapping.computed = vec!["code".to_string()];

    VerschemaCli::with_config(config.clone())
        .parse_from(["verschema", "mapping", "generate", "1.1.0", "1.2.0"])
        .unwrap();

    let file = MappingFile::load(config.mapping_file_path("1.1.0", "1.2.0")).unwrap();
    assert_eq!(
        file.tables[0].target_fields().collect::<Vec<_>>(),
        ["id", "name"]
    );

    let generated = verschema_core::schema::Registry::load(&config.schema_dir)
        .unwrap()
        .generator("1.1.0", "1.2.0")
        .unwrap()
        .generate_automatic_mapping("patients")
        .unwrap();
    assert_eq!(generated.stats.manual_fields, ["code"]);
    assert!(!generated.is_complete());
}

#[test]
fn cli_restore_fills_computed_field_from_registered_rule() {
    let (dir, mut config) = workspace();
    config.mapping.computed = vec!["code".to_string()];
    let cli = VerschemaCli::with_config(config.clone()).with_transforms(patient_code());

    cli.parse_from(["verschema", "mapping", "generate", "1.1.0", "1.2.0"])
        .unwrap();

    let backup_path = BackupFile::new(
        "1.1.0",
        "patients",
        vec![Row::try_from(json!({"id": 7, "name": "A", "age": 45, "email": null})).unwrap()],
    )
    .save_in(&config.backup_dir)
    .unwrap();

    let output = dir.path().join("restored.json");
    cli.parse_from([
        "verschema",
        "restore",
        backup_path.to_str().unwrap(),
        "--target",
        "1.2.0",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let restored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(restored, json!([{"id": 7, "name": "A", "code": "P0007"}]));
}

#[test]
fn cli_restore_rejects_computed_field_without_rule() {
    let (_dir, config) = workspace();

    // Mapping generated by a build that had the rule registered
    VerschemaCli::with_config(config.clone())
        .with_transforms(patient_code())
        .parse_from(["verschema", "mapping", "generate", "1.1.0", "1.2.0"])
        .unwrap();

    let backup_path = BackupFile::new(
        "1.1.0",
        "patients",
        vec![Row::try_from(json!({"id": 7, "name": "A"})).unwrap()],
    )
    .save_in(&config.backup_dir)
    .unwrap();

    let err = VerschemaCli::with_config(config)
        .parse_from([
            "verschema",
            "restore",
            backup_path.to_str().unwrap(),
            "--target",
            "1.2.0",
        ])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no rule registered for transform `code` of field `code` in table `patients`"
    );
}
