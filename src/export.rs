use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::data::model::{AthleteId, Measurement, WorkingSet};
use crate::error::ExportError;

pub const DEFAULT_REPORT_PATH: &str = "anthropometric_dataframe.xlsx";
pub const SHEET_NAME: &str = "Sheet1";
pub const DATE_FORMAT: &str = "mmm d yyyy";

/// Headers of the two derived columns, appended after the source labels.
pub const DERIVED_HEADERS: [&str; 2] = ["Lean Mass Index", "Sum of 7"];

const ID_COLUMN_WIDTH: f64 = 15.0;

// ---------------------------------------------------------------------------
// Export boundary
// ---------------------------------------------------------------------------

/// Serialises the working set somewhere outside the process.
pub trait ReportExporter {
    fn export(&self, set: &WorkingSet) -> Result<(), ExportError>;
}

/// Writes the working set to a single-sheet `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    pub path: PathBuf,
}

impl XlsxExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportExporter for XlsxExporter {
    fn export(&self, set: &WorkingSet) -> Result<(), ExportError> {
        write_workbook(set, &self.path).map_err(|source| ExportError::Xlsx {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Wrote {} row(s) to {}", set.len(), self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Workbook layout
// ---------------------------------------------------------------------------

fn write_workbook(set: &WorkingSet, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let headers = set
        .labels
        .iter()
        .map(String::as_str)
        .chain(DERIVED_HEADERS);
    for (col, header) in headers.enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (i, m) in set.measurements.iter().enumerate() {
        write_row(sheet, i as u32 + 1, m, &date_format)?;
    }

    sheet.set_column_width(0, ID_COLUMN_WIDTH)?;
    workbook.save(path)?;
    Ok(())
}

fn write_row(
    sheet: &mut Worksheet,
    row: u32,
    m: &Measurement,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match &m.record.id {
        AthleteId::Integer(i) => {
            sheet.write_number(row, 0, *i as f64)?;
        }
        AthleteId::Text(s) => {
            sheet.write_string(row, 0, s.as_str())?;
        }
    }

    if let Some(date) = m.record.date {
        match excel_date(date) {
            Some(dt) => {
                sheet.write_datetime_with_format(row, 1, &dt, date_format)?;
            }
            None => {
                sheet.write_string(row, 1, date.to_string())?;
            }
        }
    }

    let numbers = std::iter::once(m.record.weight)
        .chain(m.record.skinfolds.sites())
        .chain([m.metrics.lean_mass_index, m.metrics.sum_of_seven]);
    for (offset, value) in numbers.enumerate() {
        write_float(sheet, row, 2 + offset as u16, value)?;
    }
    Ok(())
}

/// NaN leaves the cell blank; infinities are written as text since Excel has
/// no representation for them.
fn write_float(sheet: &mut Worksheet, row: u32, col: u16, value: f64) -> Result<(), XlsxError> {
    if value.is_nan() {
        return Ok(());
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        sheet.write_string(row, col, text)?;
    } else {
        sheet.write_number(row, col, value)?;
    }
    Ok(())
}

/// Excel serial dates start in 1900; earlier dates have no serial form.
fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}
