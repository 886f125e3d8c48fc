use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Months, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEADERS: [&str; 12] = [
    "ID",
    "Date",
    "Height",
    "Weight",
    "Triceps (mm)",
    "SubScap (mm)",
    "Biceps (mm)",
    "Illiac (mm)",
    "Supraspinale (mm)",
    "Abdomen (mm)",
    "Thigh (mm)",
    "Calf (mm)",
];

/// Typical site thickness (mm) for a trained athlete, in header order
/// starting at Triceps.
const BASE_SKINFOLDS: [f64; 8] = [9.0, 10.0, 4.5, 12.0, 7.5, 15.0, 13.0, 7.0];

#[derive(Parser)]
#[command(about = "Write a synthetic anthropometric dataset (.csv or .parquet)")]
struct Args {
    /// Output file; the extension picks the format
    #[arg(default_value = "sample_anthropometrics.csv")]
    output: PathBuf,

    /// Number of athletes
    #[arg(short, long, default_value_t = 12)]
    athletes: i64,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

struct Row {
    id: i64,
    date: NaiveDate,
    /// Height, weight, then the eight skinfold sites.
    values: [f64; 10],
}

fn generate(athletes: i64, rng: &mut StdRng) -> Result<Vec<Row>> {
    let first_day = NaiveDate::from_ymd_opt(2019, 1, 15).context("invalid start date")?;
    let mut rows = Vec::new();

    for id in 1..=athletes {
        let height: f64 = rng.gen_range(160.0..195.0);
        let mut weight: f64 = height - 100.0 + rng.gen_range(-8.0..8.0);
        let adiposity: f64 = rng.gen_range(0.7..1.6);
        // Every few athletes are measured only once.
        let sessions = if id % 4 == 0 { 1 } else { rng.gen_range(2..=6) };
        let start = rng.gen_range(0..12);

        for session in 0..sessions {
            let date = first_day
                .checked_add_months(Months::new(start + session * 3))
                .context("date out of range")?;
            weight += rng.gen_range(-1.5..1.5);
            let trend = 1.0 - 0.03 * session as f64;

            let mut values = [0.0; 10];
            values[0] = height;
            values[1] = (weight * 10.0).round() / 10.0;
            for (slot, base) in values[2..].iter_mut().zip(BASE_SKINFOLDS) {
                let mm = base * adiposity * trend + rng.gen_range(-1.0..1.0);
                *slot = (mm.max(2.0) * 10.0).round() / 10.0;
            }
            rows.push(Row { id, date, values });
        }
    }

    // Interleave athletes the way a measurement log would be kept.
    rows.sort_by_key(|r| r.date);
    Ok(rows)
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for row in rows {
        let mut record = vec![row.id.to_string(), row.date.format("%Y-%m-%d").to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let mut fields = vec![
        Field::new(HEADERS[0], DataType::Int64, false),
        Field::new(HEADERS[1], DataType::Date32, false),
    ];
    fields.extend(HEADERS[2..].iter().map(|h| Field::new(*h, DataType::Float64, false)));
    let schema = Arc::new(Schema::new(fields));

    let epoch = NaiveDate::default();
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
        Arc::new(Date32Array::from_iter_values(
            rows.iter()
                .map(|r| r.date.signed_duration_since(epoch).num_days() as i32),
        )),
    ];
    for col in 0..10 {
        columns.push(Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.values[col]),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let rows = generate(args.athletes, &mut rng)?;

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &rows)?,
        "parquet" | "pq" => write_parquet(&args.output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!(
        "Wrote {} measurements for {} athletes to {}",
        rows.len(),
        args.athletes,
        args.output.display()
    );
    Ok(())
}
