use ledgerlift_core::{OutputRecord, Record};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Not a CSV file: {}", .0.display())]
    NotCsvFile(PathBuf),
}

/// Reads a headed CSV export into records keyed by header name.
///
/// Blank lines are skipped. Rows shorter than the header leave the trailing
/// columns absent; extra cells past the header are ignored. An empty input
/// yields no records.
pub fn read_records<R: Read>(data: R, delimiter: u8) -> Result<Vec<Record>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let mut records: Vec<Record> = Vec::new();

    for result in reader.records() {
        let row = result?;
        if row.is_empty() {
            continue;
        }
        records.push(headers.iter().zip(row.iter()).collect());
    }

    Ok(records)
}

pub fn read_records_from_path(path: &Path, delimiter: u8) -> Result<Vec<Record>, CsvError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if !is_csv_file_name(name) {
        return Err(CsvError::NotCsvFile(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    read_records(file, delimiter)
}

/// Writes converted rows with the import schema's header row, even when
/// there are no rows.
pub fn write_output<W: Write>(writer: W, rows: &[OutputRecord]) -> Result<(), CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(OutputRecord::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// `statement.csv` → `converted-statement.csv`.
pub fn output_file_name(original: &str) -> String {
    let stem = strip_csv_extension(original).unwrap_or(original);
    format!("converted-{stem}.csv")
}

pub fn is_csv_file_name(name: &str) -> bool {
    strip_csv_extension(name).is_some()
}

fn strip_csv_extension(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(4)?;
    let ext = name.get(split..)?;
    if ext.eq_ignore_ascii_case(".csv") {
        name.get(..split)
    } else {
        None
    }
}
