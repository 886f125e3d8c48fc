use std::path::PathBuf;

use clap::Parser;

use crate::export::DEFAULT_REPORT_PATH;

#[derive(Debug, Parser)]
#[command(name = "anthro-viewer")]
#[command(about = "Chart lean mass index and sum of seven skinfolds for repeatedly measured athletes")]
pub struct Args {
    /// Measurement file (.csv, .json or .parquet). Asked for interactively when omitted.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Spreadsheet to write the processed table to
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Skip the chart window
    #[arg(long)]
    pub no_display: bool,
}
