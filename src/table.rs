//! # LIMS table expansion
//!
//! Container contents do not depend on the sample, so the extraction
//! pipeline runs once with a placeholder sample ID and the resulting rows are
//! stamped once per requested sample. Only the `Sample ID` column differs
//! between the blocks of a [`Table`].
//!
//! ```rust,no_run
//! use txrm_params::report::ReportParams;
//! use txrm_params::table::make_table;
//!
//! let report = make_table("scan.txrm", &[1000, 1001, 1002], &ReportParams::default())?;
//! std::fs::write("scan_Params.csv", &report.csv)?;
//! println!("{}", report.feedback);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::container::{Container, TxrmFile};
use crate::report::{extract, Feedback, ReportError, ReportParams, Row};

/// Sample ID used for the single extraction run that gets replicated.
pub const PLACEHOLDER_SAMPLE_ID: &str = "0000";

/// Header line columns. The first column is intentionally blank.
pub const HEADER: [&str; 6] = ["", "Sample ID", "Phase", "Analysis", "Component Name", "Value"];

/// Header rows followed by one block of rows per sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    samples: usize,
}

impl Table {
    /// Replicate `template` once per sample ID, in the order given.
    pub fn expand<S: Display>(template: &[Row], sample_ids: &[S]) -> Self {
        let mut rows = Vec::with_capacity(template.len() * sample_ids.len());
        for sample_id in sample_ids {
            let sample_id = sample_id.to_string();
            rows.extend(template.iter().map(|row| row.with_sample_id(sample_id.as_str())));
        }
        Self {
            rows,
            samples: sample_ids.len(),
        }
    }

    /// All data rows, sample blocks in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of sample blocks.
    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Rows belonging to the `index`-th requested sample.
    pub fn sample_block(&self, index: usize) -> Option<&[Row]> {
        if index >= self.samples {
            return None;
        }
        let block = self.rows.len() / self.samples;
        self.rows.get(index * block..(index + 1) * block)
    }

    /// Write the header and all rows as CSV.
    ///
    /// Fields are quoted only when they contain a delimiter, quote or line
    /// break; lines end with `\n`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(writer);

        csv.write_record(HEADER)?;
        for row in &self.rows {
            csv.write_record(row.record())?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Render the table as CSV text.
    pub fn to_csv(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        // Every column is built from ASCII stream text or formatted numbers.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// A finished table plus the feedback trail of the extraction behind it.
#[derive(Debug, Clone)]
pub struct TableReport {
    /// Rendered CSV text
    pub csv: String,
    /// Structured rows
    pub table: Table,
    /// What was read from the container
    pub feedback: Feedback,
}

/// Build the LIMS table for a `.txrm` file.
///
/// Opens the file read-only, extracts once, replicates for each sample ID and
/// closes the file before returning.
///
/// # Errors
/// - `ReportError::Container` if the file is missing, has the wrong extension
///   or is not a compound document
/// - any field-level [`ReportError`] from [`extract`]
pub fn make_table<P: AsRef<Path>, S: Display>(
    path: P,
    sample_ids: &[S],
    params: &ReportParams,
) -> Result<TableReport, ReportError> {
    let path = path.as_ref();
    let mut container = TxrmFile::open(path)?;
    let report = make_table_from(&mut container, sample_ids, params)?;

    info!(
        "Built table for {} sample(s) from {}",
        report.table.sample_count(),
        path.display()
    );
    Ok(report)
}

/// Build the LIMS table from any [`Container`].
pub fn make_table_from<C: Container + ?Sized, S: Display>(
    container: &mut C,
    sample_ids: &[S],
    params: &ReportParams,
) -> Result<TableReport, ReportError> {
    let extraction = extract(container, PLACEHOLDER_SAMPLE_ID, params)?;
    let table = Table::expand(&extraction.rows, sample_ids);
    let csv = table.to_csv()?;

    Ok(TableReport {
        csv,
        table,
        feedback: extraction.feedback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ContainerError, EntryKind, MemoryContainer};
    use crate::fields::FIELD_SPECS;
    use proptest::prelude::*;

    /// Counts how often the pipeline pulls bytes out of the container.
    struct CountingContainer {
        inner: MemoryContainer,
        reads: usize,
    }

    impl Container for CountingContainer {
        fn entry_kind(&self, path: &str) -> EntryKind {
            self.inner.entry_kind(path)
        }

        fn read_stream(&mut self, path: &str) -> Result<Vec<u8>, ContainerError> {
            self.reads += 1;
            self.inner.read_stream(path)
        }
    }

    fn scan() -> MemoryContainer {
        let text = |s: &str| {
            let mut bytes = s.as_bytes().to_vec();
            bytes.push(0);
            bytes
        };
        MemoryContainer::new()
            .with_stream("ImageInfo/Voltage", 90.0f32.to_le_bytes())
            .with_stream("AcquisitionSettings/SrcPower", 10.0f32.to_le_bytes())
            .with_stream("AcquisitionSettings/SourceFilterName", text("LE2"))
            .with_stream("AcquisitionSettings/FramesPerImage", 1i32.to_le_bytes())
            .with_stream("AcquisitionSettings/ExpTime", 1.5f32.to_le_bytes())
            .with_stream("ImageInfo/ObjectiveName", text("4X"))
            .with_stream("AcquisitionSettings/Binning", 1i32.to_le_bytes())
            .with_stream(
                "AcquisitionSettings/StitchParams/AutoStitchSettings/NumSegments",
                2i32.to_le_bytes(),
            )
            .with_stream("ImageInfo/NoOfImages", 801i32.to_le_bytes())
            .with_stream("ImageInfo/PixelSize", 5.0f32.to_le_bytes())
            .with_stream(
                "ImageInfo/Date",
                b"01/01/2026 08:00:00\0\001/01/2026 09:00:00\0".to_vec(),
            )
            .with_stream("ReconSettings/BeamHardening", 0.2f32.to_le_bytes())
            .with_stream("ReconSettings/BeamHardeningFileName", text("Standard"))
    }

    fn template() -> Vec<Row> {
        vec![
            Row::new(PLACEHOLDER_SAMPLE_ID, "Voltage", "90"),
            Row::new(PLACEHOLDER_SAMPLE_ID, "Power", "200"),
            Row::new(PLACEHOLDER_SAMPLE_ID, "Projections", "10000"),
        ]
    }

    #[test]
    fn test_expand_three_samples() {
        let table = Table::expand(&template(), &["A", "B", "C"]);

        assert_eq!(table.sample_count(), 3);
        assert_eq!(table.rows().len(), 9);
        for (index, id) in ["A", "B", "C"].iter().enumerate() {
            let block = table.sample_block(index).unwrap();
            assert!(block.iter().all(|r| r.sample_id == *id));
            let values: Vec<&str> = block.iter().map(|r| r.value.as_str()).collect();
            assert_eq!(values, vec!["90", "200", "10000"]);
        }
        assert!(table.sample_block(3).is_none());
    }

    #[test]
    fn test_placeholder_in_value_untouched() {
        let table = Table::expand(&template(), &[42]);

        let projections = &table.rows()[2];
        assert_eq!(projections.sample_id, "42");
        assert_eq!(projections.value, "10000");
    }

    #[test]
    fn test_csv_layout() {
        let table = Table::expand(&template()[..1], &[1000, 1001]);

        assert_eq!(
            table.to_csv().unwrap(),
            ",Sample ID,Phase,Analysis,Component Name,Value\n\
             0,1000,Global,Scanning Parameters,Voltage,90\n\
             0,1001,Global,Scanning Parameters,Voltage,90\n"
        );
    }

    #[test]
    fn test_csv_quotes_commas() {
        let row = Row::new(PLACEHOLDER_SAMPLE_ID, "Source Filter", "LE3, thin");
        let table = Table::expand(&[row], &["S"]);

        let csv = table.to_csv().unwrap();
        assert!(csv.ends_with("0,S,Global,Scanning Parameters,Source Filter,\"LE3, thin\"\n"));
    }

    #[test]
    fn test_no_samples_is_header_only() {
        let table = Table::expand::<&str>(&template(), &[]);

        assert_eq!(
            table.to_csv().unwrap(),
            ",Sample ID,Phase,Analysis,Component Name,Value\n"
        );
        assert!(table.sample_block(0).is_none());
    }

    #[test]
    fn test_container_read_once_for_all_samples() {
        let mut container = CountingContainer {
            inner: scan(),
            reads: 0,
        };

        let ids = [1000, 1001, 1002];
        let report = make_table_from(&mut container, &ids, &ReportParams::default()).unwrap();

        let container_fields = FIELD_SPECS.iter().filter(|s| s.source.path().is_some()).count();
        assert_eq!(container_fields, 13);
        assert_eq!(container.reads, container_fields);
        assert_eq!(report.table.sample_count(), 3);
        assert_eq!(report.table.rows().len(), 45);
    }

    proptest! {
        #[test]
        fn prop_blocks_differ_only_in_sample_id(
            ids in proptest::collection::vec("[A-Za-z0-9-]{1,8}", 1..6)
        ) {
            let template = template();
            let table = Table::expand(&template, &ids);

            prop_assert_eq!(table.rows().len(), template.len() * ids.len());
            for (index, id) in ids.iter().enumerate() {
                let block = table.sample_block(index).unwrap();
                for (row, original) in block.iter().zip(&template) {
                    prop_assert_eq!(&row.sample_id, id);
                    prop_assert_eq!(&row.component, &original.component);
                    prop_assert_eq!(&row.value, &original.value);
                }
            }
        }
    }
}
