//! Tests for the CSV catalog and end-to-end runs over directories.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use datastd_core::{Connector, RelationReader, RelationWriter, Standardizer, WriteMode};
use datastd_ingest::{CsvCatalog, CsvConnector, load_mapping_payload};
use datastd_model::{ConfigError, RunDefaults, StoreError};

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn ints(catalog: &CsvCatalog, schema: &str, table: &str, column: &str) -> Vec<Option<i64>> {
    let frame = catalog.read_relation(table, Some(schema)).unwrap();
    frame
        .column(column)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

#[test]
fn reads_relations_with_and_without_schema() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("t1.csv"), "a,b\n1,3\n2,4\n");
    write(&dir.path().join("raw/t2.csv"), "c\nx\ny\nz\n");
    let catalog = CsvCatalog::new(dir.path());

    let t1 = catalog.read_relation("t1", None).unwrap();
    let t2 = catalog.read_relation("t2", Some("raw")).unwrap();

    assert_eq!(t1.shape(), (2, 2));
    assert_eq!(t2.shape(), (3, 1));
}

#[test]
fn missing_relation_is_not_found() {
    let dir = TempDir::new().unwrap();
    let catalog = CsvCatalog::new(dir.path());

    let error = catalog.read_relation("ghost", Some("raw")).unwrap_err();

    assert!(matches!(error, StoreError::NotFound { ref relation } if relation == "raw.ghost"));
}

#[test]
fn write_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let catalog = CsvCatalog::new(dir.path());
    write(&dir.path().join("s/out.csv"), "old\n1\n2\n3\n");
    let frame = CsvCatalog::read_csv(&{
        let input = dir.path().join("input.csv");
        write(&input, "x\n7\n");
        input
    })
    .unwrap();

    catalog
        .write_relation(&frame, "out", "s", WriteMode::Replace)
        .unwrap();

    let text = fs::read_to_string(dir.path().join("s/out.csv")).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["x", "7"]);
}

#[test]
fn source_connector_requires_existing_root() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let error = CsvConnector::source(&missing).acquire().unwrap_err();

    assert!(matches!(error, StoreError::Connection { .. }));
}

#[test]
fn target_connector_creates_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("out/std");
    let connector = CsvConnector::target(&root);

    let catalog = connector.acquire().unwrap();

    assert!(root.is_dir());
    assert_eq!(catalog.root(), root.as_path());
    connector.dispose(catalog).unwrap();
}

#[test]
fn runs_payload_between_directories() {
    let dir = TempDir::new().unwrap();
    let source_root = dir.path().join("raw");
    let target_root = dir.path().join("std");
    write(&source_root.join("t1.csv"), "a,b\n1,3\n2,4\n");
    let mapping = dir.path().join("mapping.json");
    write(
        &mapping,
        r#"{"t1.csv": {"schema": "s", "tablename": "out",
                       "mapping": [{"source_column": "a", "target_column": "x"}]}}"#,
    );

    let payload = load_mapping_payload(&mapping).unwrap();
    let report = Standardizer::default()
        .run_with_connectors(
            &payload,
            &CsvConnector::source(&source_root),
            &CsvConnector::target(&target_root),
        )
        .unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].source_table, "t1");
    assert_eq!(report.results[0].rows_written, 2);
    let target = CsvCatalog::new(&target_root);
    assert_eq!(ints(&target, "s", "out", "x"), vec![Some(1), Some(2)]);
}

#[test]
fn relational_run_merges_csv_sources() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("patients.csv"), "pid,age\n1,30\n2,40\n");
    write(&dir.path().join("visits.csv"), "patient,count\n2,4\n3,1\n");
    let mapping = dir.path().join("mapping.json");
    write(
        &mapping,
        r#"{
            "patients.csv": {"relational": "True", "mapping": [
                {"source_column": "pid", "target_column": "person_id",
                 "source_key": "pid", "target_key": "person_id"},
                {"source_column": "age", "target_column": "age"}]},
            "visits.csv": {"relational": "True", "mapping": [
                {"source_column": "count", "target_column": "visits",
                 "source_key": "patient", "target_key": "person_id"}]}
        }"#,
    );

    let payload = load_mapping_payload(&mapping).unwrap();
    let connector = CsvConnector::target(dir.path());
    Standardizer::new(RunDefaults::new(
        Some("std".to_string()),
        Some("person".to_string()),
    ))
    .run_with_connectors(&payload, &connector, &connector)
    .unwrap();

    let catalog = CsvCatalog::new(dir.path());
    assert_eq!(
        ints(&catalog, "std", "person", "person_id"),
        vec![Some(1), Some(2), Some(3)]
    );
    assert_eq!(
        ints(&catalog, "std", "person", "visits"),
        vec![None, Some(4), Some(1)]
    );
}

#[test]
fn invalid_payload_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("mapping.json");
    write(&mapping, r#"{"t1": {"relational": "sometimes"}}"#);

    let error = load_mapping_payload(&mapping).unwrap_err();

    assert!(matches!(
        error,
        datastd_ingest::IngestError::Payload(ref config)
            if matches!(config.root(), ConfigError::InvalidRelationalFlag { .. })
    ));
}

#[test]
fn missing_payload_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();

    let error = load_mapping_payload(&dir.path().join("absent.json")).unwrap_err();

    assert!(matches!(error, datastd_ingest::IngestError::FileRead { .. }));
}
