use std::fs;
use std::path::PathBuf;

use fiscal_ingest::{CsvLoadOptions, IngestError, read_csv_frame, write_csv_frame};
use polars::prelude::DataType;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("fiscal_ingest_csv_{stamp}_{name}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn text_mode_keeps_markers_and_leading_zeros() {
    let path = temp_file(
        "variables.csv",
        "Código del Formato,Código de la Variable,Año Gravable Hasta\n210,0033,Vigente\n110,7,2021\n",
    );
    let df = read_csv_frame(&path, CsvLoadOptions::text()).expect("read csv");
    assert_eq!(df.height(), 2);
    for column in df.get_columns() {
        assert_eq!(column.dtype(), &DataType::String);
    }
    let vars = df.column("Código de la Variable").unwrap().str().unwrap();
    assert_eq!(vars.get(0), Some("0033"));
    let hasta = df.column("Año Gravable Hasta").unwrap().str().unwrap();
    assert_eq!(hasta.get(0), Some("Vigente"));

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn inferred_mode_types_numbers() {
    let path = temp_file("rows.csv", "numero_identificacion,nombre\n900123,ACME\n800200,BETA\n");
    let df = read_csv_frame(&path, CsvLoadOptions::default()).expect("read csv");
    assert_eq!(
        df.column("numero_identificacion").unwrap().dtype(),
        &DataType::Int64
    );
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn write_then_read_preserves_rows() {
    let path = temp_file("in.csv", "a,b\n1,x\n2,y\n");
    let mut df = read_csv_frame(&path, CsvLoadOptions::text()).expect("read csv");
    let out = path.with_file_name("out.csv");
    write_csv_frame(&mut df, &out).expect("write csv");
    let contents = fs::read_to_string(&out).expect("read output");
    assert_eq!(contents, "a,b\n1,x\n2,y\n");
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn missing_file_is_io_error() {
    let err = read_csv_frame(
        &PathBuf::from("/nonexistent/fiscal/variables.csv"),
        CsvLoadOptions::text(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}
