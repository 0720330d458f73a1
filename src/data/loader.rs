use std::io;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{EmploymentType, ExperienceLevel, Record, UnknownCode};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const JOB_TITLE: &str = "job_title";
pub const EXPERIENCE_LEVEL: &str = "experience_level";
pub const EMPLOYMENT_TYPE: &str = "employment_type";
pub const EMPLOYEE_RESIDENCE: &str = "employee_residence";
pub const REMOTE_RATIO: &str = "remote_ratio";
pub const COMPANY_LOCATION: &str = "company_location";
pub const COMPANY_SIZE: &str = "company_size";
pub const SALARY_IN_USD: &str = "salary_in_usd";
pub const WORK_YEAR: &str = "work_year";

/// Columns every source must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    JOB_TITLE,
    EXPERIENCE_LEVEL,
    EMPLOYMENT_TYPE,
    EMPLOYEE_RESIDENCE,
    REMOTE_RATIO,
    COMPANY_LOCATION,
    COMPANY_SIZE,
    SALARY_IN_USD,
    WORK_YEAR,
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a source could not be turned into records. Any of these aborts the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    /// Data rows are numbered from 1; the header is not counted.
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: {source}")]
    UnknownCode {
        row: usize,
        #[source]
        source: UnknownCode,
    },
    #[error("malformed input: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load salary records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "job_title": ..., "salary_in_usd": 120000, ... }, ...]`
/// * `.parquet` – one column per field, strings or integers
pub fn load_file(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv_reader(std::fs::File::open(path)?),
        "json" => load_json_str(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Row coercion shared by all formats
// ---------------------------------------------------------------------------

/// Build a record from a row whose cells are looked up as text by column name.
fn build_record<F>(row: usize, cell: F) -> Result<Record>
where
    F: Fn(&'static str) -> Option<String>,
{
    let text = |column: &'static str| cell(column).ok_or(LoadError::MissingColumn(column));
    let code_err = |source: UnknownCode| LoadError::UnknownCode { row, source };

    let remote_ratio = parse_integer(row, REMOTE_RATIO, &text(REMOTE_RATIO)?)?;
    let salary_usd = parse_integer(row, SALARY_IN_USD, &text(SALARY_IN_USD)?)?;
    let work_year = parse_integer(row, WORK_YEAR, &text(WORK_YEAR)?)?;

    Ok(Record {
        job_title: text(JOB_TITLE)?,
        experience_level: text(EXPERIENCE_LEVEL)?
            .parse::<ExperienceLevel>()
            .map_err(code_err)?,
        employment_type: text(EMPLOYMENT_TYPE)?
            .parse::<EmploymentType>()
            .map_err(code_err)?,
        employee_residence: text(EMPLOYEE_RESIDENCE)?,
        remote_ratio: u8::try_from(remote_ratio)
            .ok()
            .filter(|r| *r <= 100)
            .ok_or_else(|| invalid(row, REMOTE_RATIO, remote_ratio))?,
        company_location: text(COMPANY_LOCATION)?,
        company_size: text(COMPANY_SIZE)?,
        salary_usd: u64::try_from(salary_usd)
            .map_err(|_| invalid(row, SALARY_IN_USD, salary_usd))?,
        work_year: i32::try_from(work_year).map_err(|_| invalid(row, WORK_YEAR, work_year))?,
    })
}

fn invalid(row: usize, column: &'static str, value: impl ToString) -> LoadError {
    LoadError::Parse {
        row,
        column,
        value: value.to_string(),
    }
}

/// Parse an integer cell. Integral floats (`"2021.0"`) are accepted.
fn parse_integer(row: usize, column: &'static str, raw: &str) -> Result<i64> {
    let s = raw.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid(row, column, raw)),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read CSV from any reader. Header names are matched after trimming.
pub fn load_csv_reader<R: io::Read>(source: R) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut positions = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for column in REQUIRED_COLUMNS {
        let idx = headers
            .iter()
            .position(|h| h == column)
            .ok_or(LoadError::MissingColumn(column))?;
        positions.push((column, idx));
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let record = build_record(i + 1, |column| {
            positions
                .iter()
                .find(|(name, _)| *name == column)
                .and_then(|(_, idx)| row.get(*idx))
                .map(str::to_string)
        })?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Values may be
/// strings or numbers.
pub fn load_json_str(text: &str) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".into()))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let row_no = i + 1;
            let obj = row
                .as_object()
                .ok_or_else(|| LoadError::Malformed(format!("row {row_no} is not a JSON object")))?;
            build_record(row_no, |column| obj.get(column).map(json_to_text))
        })
        .collect()
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): string columns may be Utf8 or
/// LargeUtf8, numeric columns any of Int32/Int64/Float32/Float64.
pub fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns: Vec<(&'static str, ArrayRef)> =
            Vec::with_capacity(REQUIRED_COLUMNS.len());
        for column in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(column)
                .map_err(|_| LoadError::MissingColumn(column))?;
            columns.push((column, batch.column(idx).clone()));
        }

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let record = build_record(row_no, |column| {
                columns
                    .iter()
                    .find(|(name, _)| *name == column)
                    .map(|(_, array)| cell_text(array, row))
            })?;
            records.push(record);
        }
    }
    Ok(records)
}

/// Render one Arrow cell as text so every format goes through the same coercion.
fn cell_text(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        other => format!("{other:?}"),
    }
}
