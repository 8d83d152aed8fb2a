use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use bookmeta::{table::read_rows, OutputTable, SourceRow};

use eyre::{eyre, Context, Result};
use log::trace;

pub fn read_source_table(path: &Path) -> Result<Vec<SourceRow>> {
    trace!("opening {} as the source table", path.display());
    let file = File::open(path).wrap_err_with(|| {
        format!(
            "Failed to open the '{}' file for reading.",
            path.display()
        )
    })?;

    read_rows(BufReader::new(file))
        .wrap_err_with(|| eyre!("Cannot read the '{}' file as CSV", path.display()))
}

pub fn write_output_table(path: &Path, table: &OutputTable) -> Result<()> {
    trace!("writing {} rows to {}", table.len(), path.display());
    let file = File::create(path).wrap_err_with(|| {
        format!(
            "Failed to create the '{}' file for writing.",
            path.display()
        )
    })?;

    table
        .write(BufWriter::new(file))
        .wrap_err_with(|| eyre!("Cannot write the table to '{}'", path.display()))
}

#[cfg(test)]
mod tests {

    use super::*;

    use assert_fs::{
        fixture::{FileWriteStr, PathChild},
        NamedTempFile, TempDir,
    };

    #[test]
    #[should_panic(expected = "Failed to open the 'file does not exist.csv' file for reading")]
    fn err_when_trying_to_open_csv_file_that_does_not_exist() {
        read_source_table(Path::new("file does not exist.csv")).unwrap();
    }

    #[test]
    fn read_temp_csv_file() {
        let file = NamedTempFile::new("catalog.csv").expect("Cannot create temp file for test");
        file.write_str("ISBN,Title\n9780131103627,K&R\n,Unknown\n")
            .unwrap();

        let rows = read_source_table(file.path()).unwrap();
        file.close().unwrap();

        assert_eq!(2, rows.len());
        assert_eq!(Some("9780131103627"), rows[0].isbn());
        assert_eq!(None, rows[1].isbn());
    }

    #[test]
    fn write_table_to_temp_dir() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let out = dir.child("searching.csv");
        let table = OutputTable::merge(vec![SourceRow::from([("Title", "K&R")])], Vec::new());

        write_output_table(out.path(), &table).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        let mut lines = written.lines();
        assert!(lines.next().unwrap().starts_with("Id,eTag,Title,"));
        assert_eq!(Some(",,K&R,,,,,,,,,,,,,,,,,,"), lines.next());
        assert_eq!(None, lines.next());
    }

    #[test]
    #[should_panic(expected = "Failed to create the")]
    fn err_when_output_directory_does_not_exist() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let out = dir.child("missing").child("searching.csv");

        write_output_table(out.path(), &OutputTable::default()).unwrap();
    }
}
