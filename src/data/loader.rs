use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::date::parse_date;
use super::model::{
    default_labels, AthleteId, ColumnLabels, MeasurementRecord, RawTable, Skinfolds,
    MIN_SOURCE_COLUMNS, SOURCE_COLUMNS,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one row per measurement (recommended)
/// * `.json`    – pandas `orient="split"`: `{ "columns": [...], "data": [[...], ...] }`
/// * `.parquet` – flat schema, columns picked by position
///
/// Every format must carry at least twelve columns; only the ten listed in
/// [`SOURCE_COLUMNS`] are kept.
pub fn load_file(path: &Path) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} measurements from {} with columns {:?}",
        table.len(),
        path.display(),
        table.labels
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the kept labels out of a full header row.
fn select_labels(headers: &[String]) -> Result<ColumnLabels, LoadError> {
    if headers.len() < MIN_SOURCE_COLUMNS {
        return Err(LoadError::Layout(format!(
            "expected at least {MIN_SOURCE_COLUMNS} columns, found {}",
            headers.len()
        )));
    }
    let defaults = default_labels();
    let mut labels = defaults.clone();
    for ((label, pos), fallback) in labels.iter_mut().zip(SOURCE_COLUMNS).zip(defaults) {
        let text = headers[pos].trim();
        *label = if text.is_empty() { fallback } else { text.to_string() };
    }
    Ok(labels)
}

/// Lenient numeric cell: anything that is not a number becomes NaN.
fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Build a record from the ten kept cells, already in [`SOURCE_COLUMNS`] order.
fn record_from_cells(
    id: AthleteId,
    date: Option<NaiveDate>,
    numbers: [f64; 8],
) -> MeasurementRecord {
    let [weight, triceps, subscap, biceps, illiac, abdomen, thigh, calf] = numbers;
    MeasurementRecord {
        id,
        date,
        weight,
        skinfolds: Skinfolds::from_sites([triceps, subscap, biceps, illiac, abdomen, thigh, calf]),
    }
}

/// Source positions of the eight numeric columns (weight + skinfolds).
fn numeric_positions() -> [usize; 8] {
    let mut out = [0; 8];
    out.copy_from_slice(&SOURCE_COLUMNS[2..]);
    out
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one measurement per row.
/// Missing trailing cells read as blank; rows longer than the header are a
/// layout error.
fn load_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let labels = select_labels(&headers)?;
    let numeric = numeric_positions();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        if row.len() > headers.len() {
            return Err(LoadError::Layout(format!(
                "CSV row {row_no} has {} fields, header has {}",
                row.len(),
                headers.len()
            )));
        }
        let cell = |pos: usize| row.get(pos).unwrap_or("");
        records.push(record_from_cells(
            AthleteId::parse(cell(SOURCE_COLUMNS[0])),
            parse_date(cell(SOURCE_COLUMNS[1])),
            numeric.map(|pos| parse_number(cell(pos))),
        ));
    }

    Ok(RawTable { labels, records })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (`df.to_json(orient='split')`):
///
/// ```json
/// {
///   "columns": ["ID", "Date", "Height", "Weight", ...],
///   "data": [[101, "2020-07-24", 181.0, 78.4, ...], ...]
/// }
/// ```
///
/// Numeric dates are read as epoch milliseconds, the pandas default.
#[derive(Debug, Deserialize)]
struct SplitDocument {
    columns: Vec<String>,
    data: Vec<Vec<JsonValue>>,
}

fn load_json(path: &Path) -> Result<RawTable, LoadError> {
    let doc: SplitDocument = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let labels = select_labels(&doc.columns)?;
    let numeric = numeric_positions();

    let mut records = Vec::with_capacity(doc.data.len());
    for (row_no, row) in doc.data.iter().enumerate() {
        if row.len() > doc.columns.len() {
            return Err(LoadError::Layout(format!(
                "JSON row {row_no} has {} values, expected {}",
                row.len(),
                doc.columns.len()
            )));
        }
        let cell = |pos: usize| row.get(pos).unwrap_or(&JsonValue::Null);
        records.push(record_from_cells(
            json_to_id(cell(SOURCE_COLUMNS[0])),
            json_to_date(cell(SOURCE_COLUMNS[1])),
            numeric.map(|pos| json_to_f64(cell(pos))),
        ));
    }

    Ok(RawTable { labels, records })
}

fn json_to_id(val: &JsonValue) -> AthleteId {
    match val {
        JsonValue::Number(n) => n
            .as_i64()
            .map(AthleteId::Integer)
            .or_else(|| n.as_f64().and_then(AthleteId::from_f64))
            .unwrap_or_else(|| AthleteId::Text(n.to_string())),
        JsonValue::String(s) => AthleteId::parse(s),
        JsonValue::Null => AthleteId::Text(String::new()),
        other => AthleteId::Text(other.to_string()),
    }
}

fn json_to_date(val: &JsonValue) -> Option<NaiveDate> {
    match val {
        JsonValue::String(s) => parse_date(s),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn json_to_f64(val: &JsonValue) -> f64 {
    match val {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => parse_number(s),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat schema.
///
/// Columns are taken by position like the CSV loader. The ID column may be
/// integer, float or string; the date column may be Date32, Date64,
/// Timestamp or string; numeric columns are cast to Float64 with
/// unparseable values becoming NaN.
fn load_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let labels = select_labels(&headers)?;
    let reader = builder.build()?;
    let numeric = numeric_positions();

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        let ids = extract_ids(batch.column(SOURCE_COLUMNS[0]))?;
        let dates = extract_dates(batch.column(SOURCE_COLUMNS[1]))?;
        let mut columns = Vec::with_capacity(numeric.len());
        for pos in numeric {
            columns.push(extract_f64(batch.column(pos))?);
        }

        for (row, (id, date)) in ids.into_iter().zip(dates).enumerate() {
            let mut numbers = [f64::NAN; 8];
            for (slot, col) in numbers.iter_mut().zip(&columns) {
                *slot = col[row];
            }
            records.push(record_from_cells(id, date, numbers));
        }
    }

    Ok(RawTable { labels, records })
}

// -- Parquet / Arrow helpers --

fn extract_ids(col: &Arc<dyn Array>) -> Result<Vec<AthleteId>, LoadError> {
    let null_id = || AthleteId::Text(String::new());
    let ids: Vec<AthleteId> = match col.data_type() {
        dt if dt.is_integer() => {
            let arr = cast(col, &DataType::Int64)?;
            arr.as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map(AthleteId::Integer).unwrap_or_else(null_id))
                .collect()
        }
        dt if dt.is_floating() => {
            let arr = cast(col, &DataType::Float64)?;
            arr.as_primitive::<Float64Type>()
                .iter()
                .map(|v| match v {
                    Some(f) => AthleteId::from_f64(f).unwrap_or_else(|| AthleteId::Text(f.to_string())),
                    None => null_id(),
                })
                .collect()
        }
        _ => {
            let arr = cast(col, &DataType::Utf8)?;
            arr.as_string::<i32>()
                .iter()
                .map(|v| v.map(AthleteId::parse).unwrap_or_else(null_id))
                .collect()
        }
    };
    Ok(ids)
}

fn extract_dates(col: &Arc<dyn Array>) -> Result<Vec<Option<NaiveDate>>, LoadError> {
    let dates: Vec<Option<NaiveDate>> = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let arr = cast(col, &DataType::Utf8)?;
            arr.as_string::<i32>()
                .iter()
                .map(|v| v.and_then(parse_date))
                .collect()
        }
        _ => {
            let arr = cast(col, &DataType::Date32)?;
            let days = arr.as_primitive::<Date32Type>();
            (0..days.len())
                .map(|i| {
                    if days.is_null(i) {
                        None
                    } else {
                        days.value_as_date(i)
                    }
                })
                .collect()
        }
    };
    Ok(dates)
}

fn extract_f64(col: &Arc<dyn Array>) -> Result<Vec<f64>, LoadError> {
    let arr = cast(col, &DataType::Float64)?;
    Ok(arr
        .as_primitive::<Float64Type>()
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}
