//! CSV loading with encoding and delimiter auto-detection.
//!
//! Produces a [`Table`] of optional cells. Cells are trimmed; empty cells and
//! the usual dataframe NA markers become missing values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};
use crate::models::Table;

/// Cell contents treated as a missing value (after trimming).
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Delimiters considered by [`detect_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Caller overrides for detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Use this delimiter instead of detecting one
    pub delimiter: Option<char>,
    /// Use this encoding label instead of detecting one
    pub encoding: Option<String>,
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
///
/// Valid UTF-8 is taken as UTF-8 without asking chardet, which tends to
/// misjudge short samples.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Invalid UTF-8 falls back to lossy decoding; unknown labels are an error.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => {
            let enc = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| CsvError::EncodingError(label.to_string()))?;
            enc.decode(bytes).0.into_owned()
        }
    };

    Ok(content.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

fn to_cell(raw: &str) -> Option<String> {
    let value = raw.trim();
    if NA_MARKERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse decoded CSV text with an explicit delimiter.
///
/// Short rows are padded with missing cells; a row with more fields than the
/// header is an error. Empty lines are skipped, but a line of delimiters such
/// as `,,` is kept as a row of missing cells.
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }
    if !delimiter.is_ascii() {
        return Err(CsvError::parse(1, format!("delimiter '{}' is not ASCII", delimiter)));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(&e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut table = Table::new(headers);

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(&e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() > table.headers.len() {
            return Err(CsvError::parse(
                line,
                format!("expected {} fields, saw {}", table.headers.len(), record.len()),
            ));
        }
        table.push_row(record.iter().map(to_cell).collect());
    }

    Ok(table)
}

fn csv_error(err: &csv::Error) -> CsvError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    CsvError::parse(line, err.to_string())
}

/// Parse CSV bytes, detecting whatever `options` leaves unset.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = options
        .encoding
        .clone()
        .unwrap_or_else(|| detect_encoding(bytes));
    let content = decode_content(bytes, &encoding)?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(&content));

    let table = parse_table(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Read and parse a CSV file.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file("catalog.csv", &ParseOptions::default())?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.table.len());
/// ```
pub fn parse_csv_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, options)
}
