use assert_cmd::prelude::*;
use assert_fs::{
    fixture::{FileWriteBin, FileWriteStr, PathChild},
    TempDir,
};
use std::process::Command;

const HEADER: &str = "Id,eTag,Title,Subtitle,Author,Publisher,Published-Date,Description,ISBN_10,ISBN_13,PageCount,Categories,Language,Sale_Info,Saleability,isEBook,epub,pdf,Access_Info,Viewability,PublicDomain";

// We check the --help output in order to confirm that the clap cli is setup correctly.
// Any arguments that are incorrectly will cause clap to panic regardless of the arguments or
// options provided.
#[test]
fn check_clap_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bookmeta")?;

    cmd.arg("--help");
    cmd.assert().success();

    Ok(())
}

#[test]
fn missing_input_exits_with_status_2() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    let output = Command::cargo_bin("bookmeta")?
        .current_dir(dir.path())
        .args(["--input", "missing.csv"])
        .output()?;

    assert_eq!(Some(2), output.status.code());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open the 'missing.csv'"));
    assert!(!dir.child("searching.csv").path().exists());

    Ok(())
}

#[test]
fn unreadable_input_reports_the_underlying_cause() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    dir.child("copy.csv").write_binary(b"ISBN,Title\n\xff\xfe,Broken\n")?;

    let output = Command::cargo_bin("bookmeta")?
        .current_dir(dir.path())
        .output()?;

    assert_eq!(Some(2), output.status.code());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot read the 'copy.csv' file as CSV"));
    assert!(stderr.contains("Table error"));
    assert!(stderr.contains("CSV parse error"));
    assert!(!dir.child("searching.csv").path().exists());

    Ok(())
}

// Rows without an ISBN are never looked up, so this runs without touching the network.
#[test]
fn rows_without_isbn_are_copied_to_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    dir.child("copy.csv").write_str("ISBN,Title\n,Untitled\n")?;

    let output = Command::cargo_bin("bookmeta")?
        .current_dir(dir.path())
        .output()?;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("Updated CSV file saved at: searching.csv"));

    let written = std::fs::read_to_string(dir.child("searching.csv").path())?;
    let lines: Vec<_> = written.lines().collect();
    assert_eq!(vec![HEADER, ",,Untitled,,,,,,,,,,,,,,,,,,"], lines);

    Ok(())
}

// Nothing listens on port 9 of the loopback interface, every attempt fails to connect.
#[test]
fn unreachable_service_keeps_original_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    dir.child("copy.csv")
        .write_str("ISBN,Title\n0000000000,Unreachable\n")?;

    let output = Command::cargo_bin("bookmeta")?
        .current_dir(dir.path())
        .args([
            "--quiet",
            "--endpoint",
            "http://127.0.0.1:9/volumes?q=isbn:",
            "--retry-delay",
            "0",
            "--timeout",
            "2",
        ])
        .output()?;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Failed to fetch data for ISBN 0000000000 after 3 attempts."));

    let written = std::fs::read_to_string(dir.child("searching.csv").path())?;
    let lines: Vec<_> = written.lines().collect();
    assert_eq!(vec![HEADER, ",,Unreachable,,,,,,,,,,,,,,,,,,"], lines);

    Ok(())
}
