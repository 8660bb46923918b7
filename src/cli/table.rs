use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use super::config::ReportSettings;
use txrm_params::table::make_table;

/// Extract the report table from a TXRM file and write it as CSV.
pub fn run(input: PathBuf, output: Option<PathBuf>, settings: ReportSettings) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output_path(&input));

    info!("TXRM Parameters Extractor");
    info!("=========================");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Samples: {}", settings.samples.join(", "));
    info!("Alignment time: {}", settings.params.alignment_time);
    info!("Processing time: {}", settings.params.processing_time);

    let report = match make_table(&input, &settings.samples, &settings.params) {
        Ok(report) => report,
        Err(e) => {
            if let Some(feedback) = e.feedback() {
                eprintln!("{}", feedback);
            }
            return Err(e).context("Failed to extract parameters from TXRM file");
        }
    };

    for line in report.feedback.lines() {
        info!("{}", line);
    }

    std::fs::write(&output, &report.csv)
        .with_context(|| format!("Error writing to file: {}", output.display()))?;

    info!(
        "Successfully wrote {} rows to {}",
        report.table.rows().len(),
        output.display()
    );
    Ok(())
}

/// `<dir>/<stem>_Params.csv` next to the input file.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_Params.csv", stem))
}
