use anyhow::Result;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use txrm_params::container::TxrmFile;
use txrm_params::report::{extract, Feedback, ReportParams, Row};

/// Print what the report would contain for one sample, without writing a file.
pub fn run(input: PathBuf, sample_id: String, params: ReportParams) -> Result<()> {
    let mut file = TxrmFile::open(&input)?;

    println!("{}", heading(&format!("TXRM Parameters: {}", input.display())));
    println!();

    match extract(&mut file, &sample_id, &params) {
        Ok(extraction) => {
            print_feedback(&extraction.feedback);
            println!();
            print_rows(&extraction.rows);
            Ok(())
        }
        Err(e) => {
            if let Some(feedback) = e.feedback() {
                print_feedback(feedback);
                println!();
            }
            eprintln!("{}", failure(&e.to_string()));
            std::process::exit(1);
        }
    }
}

fn print_feedback(feedback: &Feedback) {
    for line in feedback.lines() {
        println!("  {}", line);
    }
}

fn print_rows(rows: &[Row]) {
    let width = rows.iter().map(|r| r.component.len()).max().unwrap_or(0);
    for row in rows {
        println!("  {:width$}  {}", row.component, row.value, width = width);
    }
}

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

#[cfg(feature = "colorized_output")]
fn failure(text: &str) -> String {
    format!("{}: {}", style("FAILED").red().bold(), text)
}

#[cfg(not(feature = "colorized_output"))]
fn failure(text: &str) -> String {
    format!("FAILED: {}", text)
}
