use std::fs;
use std::path::PathBuf;

use bene_ingest::{IngestOptions, LoadError, read_csv_table};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_headers_and_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "beneficiaries.csv",
        "id,gender,dob\n1,M,2001-01-01\n2,F,\n",
    );
    let table = read_csv_table(&path, &IngestOptions::default()).expect("read csv");
    assert_eq!(table.headers, vec!["id", "gender", "dob"]);
    assert_eq!(table.height(), 2);
    assert_eq!(table.rows[1], vec!["2", "F", ""]);
}

#[test]
fn skips_blank_rows_and_pads_short_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "b.csv", "\n,,\na,b,c\n1,2\n\n3,4,5\n");
    let table = read_csv_table(&path, &IngestOptions::default()).expect("read csv");
    assert_eq!(table.headers, vec!["a", "b", "c"]);
    assert_eq!(table.rows, vec![vec!["1", "2", ""], vec!["3", "4", "5"]]);
}

#[test]
fn extra_cells_are_malformed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wide.csv", "a,b\n1,2\n3,4,5\n");
    let err = read_csv_table(&path, &IngestOptions::default()).unwrap_err();
    match err {
        LoadError::Malformed { message, .. } => {
            assert!(message.contains("line 3"), "{message}");
            assert!(message.contains("3 cells"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn trailing_empty_cells_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "trailing.csv", "a,b\n1,2,\n3,4, \n");
    let table = read_csv_table(&path, &IngestOptions::default()).expect("read csv");
    assert_eq!(table.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
}

#[test]
fn honours_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "d.csv", "dist_id;dist_name\n1;Pune\n");
    let options = IngestOptions::default().with_delimiter(b';');
    let table = read_csv_table(&path, &options).expect("read csv");
    assert_eq!(table.headers, vec!["dist_id", "dist_name"]);
    assert_eq!(table.rows[0], vec!["1", "Pune"]);
}

#[test]
fn quoted_fields_keep_delimiters() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "q.csv", "name,qualification\n\"Rao, A\",HSC\n");
    let table = read_csv_table(&path, &IngestOptions::default()).expect("read csv");
    assert_eq!(table.rows[0], vec!["Rao, A", "HSC"]);
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = read_csv_table(&dir.path().join("absent.csv"), &IngestOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn empty_file_has_no_header() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.csv", "\n\n");
    let err = read_csv_table(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NoHeader { .. }));
}

#[test]
fn duplicate_headers_are_malformed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "dup.csv", "gender,Gender\nM,F\n");
    let err = read_csv_table(&path, &IngestOptions::default()).unwrap_err();
    match err {
        LoadError::Malformed { message, .. } => assert!(message.contains("duplicate")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_header_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "blank.csv", "gender,,dob\nM,x,2001-01-01\n");
    let err = read_csv_table(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { .. }));
}
