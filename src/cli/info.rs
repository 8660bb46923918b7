use anyhow::{Context, Result};
use std::path::PathBuf;

use txrm_params::container::{EntryKind, TxrmFile};
use txrm_params::fields::FIELD_SPECS;

/// Display the storages and streams inside a TXRM file
pub fn run(file: PathBuf) -> Result<()> {
    let container = TxrmFile::open(&file).context("Failed to open TXRM file")?;
    let entries = container.entries();

    println!("TXRM File Information");
    println!("=====================");
    println!("File: {}", file.display());
    println!();

    let streams = entries.iter().filter(|e| e.kind == EntryKind::Stream).count();
    println!(
        "Entries: {} ({} streams, {} storages)",
        entries.len(),
        streams,
        entries.len() - streams
    );
    println!();

    for entry in &entries {
        let kind = match entry.kind {
            EntryKind::Stream => "stream",
            EntryKind::Storage => "storage",
            EntryKind::Absent => "?",
        };
        let marker = if FIELD_SPECS.iter().any(|s| s.source.path() == Some(entry.path.as_str())) {
            "*"
        } else {
            " "
        };
        println!("{} {:8} {:>10}  {}", marker, kind, entry.len, entry.path);
    }

    println!();
    println!("* = read by the parameter report");
    Ok(())
}
