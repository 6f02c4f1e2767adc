use clap::{Parser, Subcommand};
use sheet_records::cli;
use sheet_records::ExtractRequest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheet-records")]
#[command(about = "Extract header-keyed records from a spreadsheet range.")]
#[command(long_about = "Sheet Records - spreadsheet ranges as JSON records

Reads a rectangular range such as A1:B7 from a workbook sheet and prints one
JSON object per data row, keyed by the range's headers.

COMMANDS:
  extract   - Extract a cell and/or a range as JSON
  sheets    - List the sheet names of a workbook

EXAMPLES:
  sheet-records extract people.xlsx --range A1:C20
  sheet-records extract people.xlsx --range A2:C20 --headers name,age,joined
  sheet-records extract people.xlsx --sheet Staff --cell B1
  sheet-records extract people.xlsx --used --pretty")]
#[command(version)]
struct Cli {
    /// Log extraction steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Extract a cell and/or a range as JSON.

HEADERS:
  Without --headers, the first row of the range names the fields and is not
  returned as data. With --headers, every row of the range is data and the
  list must have exactly one name per column. --headers also applies to
  --used, and needs --range or --used to apply to.

DUPLICATES:
  When several columns share a header, the leftmost column's value is kept
  and a warning is printed to stderr.

DATES:
  Cells whose number format is a date (mm/dd/yyyy, yyyy-mm-dd, ...) become
  ISO-8601 date-times.

At least one of --cell, --range or --used is required.")]
    /// Extract a cell and/or a range as JSON
    Extract {
        /// Path to the workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
        file: PathBuf,

        /// Sheet name (defaults to the first sheet)
        #[arg(short, long, env = "SHEET_RECORDS_SHEET")]
        sheet: Option<String>,

        /// Single cell to read, e.g. B7
        #[arg(short, long)]
        cell: Option<String>,

        /// Range to read, e.g. A1:C20
        #[arg(short, long)]
        range: Option<String>,

        /// Comma-separated header names, one per range column
        #[arg(short = 'H', long, value_delimiter = ',')]
        headers: Option<Vec<String>>,

        /// Read the sheet's used range when no --range is given
        #[arg(short, long)]
        used: bool,

        /// Pretty-print the JSON output
        #[arg(short, long, env = "SHEET_RECORDS_PRETTY")]
        pretty: bool,
    },

    /// List the sheet names of a workbook
    Sheets {
        /// Path to the workbook
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "sheet_records=debug"
    } else {
        "sheet_records=error"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract {
            file,
            sheet,
            cell,
            range,
            headers,
            used,
            pretty,
        } => {
            let request = ExtractRequest {
                cell,
                range,
                headers,
                use_used_range: used,
            };
            cli::extract(file, sheet, request, pretty, cli.verbose)?
        }

        Commands::Sheets { file } => cli::sheets(file)?,
    }

    Ok(())
}
