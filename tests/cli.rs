//! CLI tests that run the built binary without a database.

use std::process::{Command, Output};

fn execute_csv_import(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_csv-import"))
        .args(args)
        .env("RUST_LOG", "csv_import=debug")
        .env_remove("MYSQL_CONNECTION_STRING")
        .env_remove("CSV_IMPORT_CONFIG")
        .output()
        .expect("failed to run csv-import")
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("marketing_data_clean.csv");

    let output = execute_csv_import(&[
        "--file",
        missing.to_str().unwrap(),
        "--table",
        "marketing",
        // Nothing listens on port 1; the run must fail before trying.
        "--mysql-host",
        "127.0.0.1",
        "--mysql-port",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("marketing_data_clean.csv"), "{stderr}");
    assert!(!stderr.contains("Connecting to MySQL"), "{stderr}");
}

#[test]
fn test_dry_run_reports_count() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "id,name\n1,a\n2,b\n3,c\n").unwrap();

    let output = execute_csv_import(&[
        "--file",
        path.to_str().unwrap(),
        "--table",
        "marketing",
        "--dry-run",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("read 3 rows"), "{stdout}");
}

#[test]
fn test_table_from_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("data.csv");
    std::fs::write(&csv_path, "id\n1\n").unwrap();
    let config_path = dir.path().join("import.yaml");
    std::fs::write(&config_path, "import:\n  table: marketing\n  streaming: true\n").unwrap();
    let summary_path = dir.path().join("summary.json");

    let output = execute_csv_import(&[
        "--file",
        csv_path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--dry-run",
        "--summary-json",
        summary_path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["read"], 1);
    assert_eq!(summary["attempted"], 0);
}

#[test]
fn test_missing_table_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "id\n1\n").unwrap();

    let output = execute_csv_import(&["--file", path.to_str().unwrap(), "--dry-run"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No destination table"), "{stderr}");
}
