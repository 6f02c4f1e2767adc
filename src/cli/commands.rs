use crate::core::ExtractRequest;
use crate::error::ExtractResult;
use crate::excel::ExcelWorkbook;
use crate::types::Warning;
use crate::ExtractOutput;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the extract command: JSON on stdout, status and warnings on stderr
pub fn extract(
    file: PathBuf,
    sheet: Option<String>,
    request: ExtractRequest,
    pretty: bool,
    verbose: bool,
) -> ExtractResult<()> {
    if verbose {
        eprintln!("{}", "📖 Sheet Records - Extract".bold().green());
        eprintln!("   File:  {}", file.display());
        eprintln!("   Sheet: {}", sheet.as_deref().unwrap_or("<first>"));
        if let Some(ref cell) = request.cell {
            eprintln!("   Cell:  {}", cell.bright_blue());
        }
        if let Some(ref range) = request.range {
            eprintln!("   Range: {}", range.bright_blue());
        }
        eprintln!();
    }

    let mut workbook = ExcelWorkbook::open(&file)?;
    let worksheet = workbook.sheet(sheet.as_deref())?;
    let output = request.run(&worksheet)?;

    if let Some(ref range) = output.range {
        print_warnings(&range.warnings);
        if verbose {
            eprintln!(
                "{}",
                format!("✅ {} records extracted", range.records.len())
                    .bold()
                    .green()
            );
        }
    }

    println!("{}", render_output(&output, pretty)?);
    Ok(())
}

/// Execute the sheets command
pub fn sheets(file: PathBuf) -> ExtractResult<()> {
    let workbook = ExcelWorkbook::open(&file)?;
    for name in workbook.sheet_names() {
        println!("{}", name);
    }
    Ok(())
}

/// Serialize an extraction for stdout
pub fn render_output(output: &ExtractOutput, pretty: bool) -> ExtractResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(output)?
    } else {
        serde_json::to_string(output)?
    };
    Ok(json)
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{} {}", "⚠️  warning:".yellow().bold(), warning);
    }
}
