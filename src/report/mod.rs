//! # Field extraction pipeline
//!
//! Walks [`FIELD_SPECS`](crate::fields::FIELD_SPECS) in order against one
//! container and produces one [`Row`] per field for a single sample.
//!
//! The walk is all-or-nothing: the first required field that is absent or
//! empty aborts with [`ReportError::MissingRequiredField`] and none of the
//! rows built so far are returned. What was read up to that point survives
//! only as the human-readable [`Feedback`] trail attached to the error.
//!
//! ```rust,no_run
//! use txrm_params::container::TxrmFile;
//! use txrm_params::report::{extract, ReportParams};
//!
//! let mut file = TxrmFile::open("scan.txrm")?;
//! let extraction = extract(&mut file, "1000", &ReportParams::default())?;
//! for row in &extraction.rows {
//!     println!("{}: {}", row.component, row.value);
//! }
//! # Ok::<(), txrm_params::report::ReportError>(())
//! ```

mod error;


use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::decode::{self, DecodeError};
use crate::fields::{FieldSource, FieldSpec, FieldValue, Presence, FIELD_SPECS};

pub use error::{MissingReason, ReportError};

/// Default alignment and processing time.
pub const DEFAULT_OPERATOR_TIME: i64 = 15;

/// Literal first column of every data row.
pub const ROW_PREFIX: &str = "0";

/// Literal `Phase` column.
pub const PHASE: &str = "Global";

/// Literal `Analysis` column.
pub const ANALYSIS: &str = "Scanning Parameters";

/// Caller-supplied values that become report rows without touching the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParams {
    /// Alignment time row value
    pub alignment_time: i64,
    /// Processing time row value
    pub processing_time: i64,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            alignment_time: DEFAULT_OPERATOR_TIME,
            processing_time: DEFAULT_OPERATOR_TIME,
        }
    }
}

impl ReportParams {
    /// Create parameters with explicit times.
    pub fn new(alignment_time: i64, processing_time: i64) -> Self {
        Self {
            alignment_time,
            processing_time,
        }
    }
}

/// One report line: `0,<sample_id>,Global,Scanning Parameters,<component>,<value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Sample ID column
    pub sample_id: String,
    /// Component Name column
    pub component: String,
    /// Value column
    pub value: String,
}

impl Row {
    /// Create a row.
    pub fn new(
        sample_id: impl Into<String>,
        component: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            component: component.into(),
            value: value.into(),
        }
    }

    /// Same row, stamped with another sample ID.
    pub fn with_sample_id(&self, sample_id: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            component: self.component.clone(),
            value: self.value.clone(),
        }
    }

    /// All six columns in output order.
    pub fn record(&self) -> [&str; 6] {
        [
            ROW_PREFIX,
            &self.sample_id,
            PHASE,
            ANALYSIS,
            &self.component,
            &self.value,
        ]
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.record().join(","))
    }
}

/// Human-readable trail of what was read, for display in a log panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    lines: Vec<String>,
}

impl Feedback {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// All lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Rows and feedback for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// One row per field, in field order
    pub rows: Vec<Row>,
    /// What was read
    pub feedback: Feedback,
}

/// Result of looking one field up.
enum Lookup {
    Found(FieldValue),
    Missing(MissingReason),
}

/// A field that exists but cannot be used.
enum FieldFailure {
    Decode(DecodeError),
    Date(decode::MalformedTimestamp),
}

impl From<DecodeError> for FieldFailure {
    fn from(error: DecodeError) -> Self {
        FieldFailure::Decode(error)
    }
}

/// Run every field of the report against `container` for one sample.
///
/// # Errors
/// - `ReportError::MissingRequiredField` for the first required field that is absent or empty
/// - `ReportError::MalformedStream` if a stream cannot be decoded as its field type
/// - `ReportError::MalformedDate` if a scan timestamp does not parse
pub fn extract<C: Container + ?Sized>(
    container: &mut C,
    sample_id: &str,
    params: &ReportParams,
) -> Result<Extraction, ReportError> {
    let mut rows = Vec::with_capacity(FIELD_SPECS.len());
    let mut feedback = Feedback::new();

    for spec in FIELD_SPECS.iter() {
        let lookup = match lookup_field(container, spec, params) {
            Ok(lookup) => lookup,
            Err(FieldFailure::Decode(source)) => {
                return Err(ReportError::MalformedStream {
                    label: spec.label,
                    source,
                    feedback,
                });
            }
            Err(FieldFailure::Date(source)) => {
                return Err(ReportError::MalformedDate {
                    label: spec.label,
                    source,
                    feedback,
                });
            }
        };

        let value = match (lookup, &spec.presence) {
            (Lookup::Found(value), _) => {
                feedback.push(describe(spec, &value));
                value
            }
            (Lookup::Missing(reason), Presence::OptionalWithDefault(default)) => {
                warn!("{} {}, using default {}", spec.label, reason, default);
                feedback.push(format!("Could not find {} - using {}", spec.label, default));
                default.clone()
            }
            (Lookup::Missing(reason), Presence::Required) => {
                debug!("{} {}; aborting extraction", spec.label, reason);
                feedback.push(format!("Could not find {}. Terminating...", spec.label));
                return Err(ReportError::MissingRequiredField {
                    label: spec.label,
                    path: spec.source.path(),
                    reason,
                    feedback,
                });
            }
        };

        let rendered = spec.render(&value);
        debug!("{} = {}", spec.label, rendered);
        rows.push(Row::new(sample_id, spec.label, rendered));
    }

    Ok(Extraction { rows, feedback })
}

fn lookup_field<C: Container + ?Sized>(
    container: &mut C,
    spec: &FieldSpec,
    params: &ReportParams,
) -> Result<Lookup, FieldFailure> {
    let lookup = match spec.source {
        FieldSource::Float(path) => match decode::float_array(container, path)? {
            None => Lookup::Missing(MissingReason::Absent),
            Some(values) => first_or_empty(values.first().map(|v| FieldValue::Float(*v))),
        },
        FieldSource::Int(path) => match decode::int_array(container, path)? {
            None => Lookup::Missing(MissingReason::Absent),
            Some(values) => first_or_empty(values.first().map(|v| FieldValue::Int(i64::from(*v)))),
        },
        FieldSource::Text(path) => match decode::text(container, path)? {
            None => Lookup::Missing(MissingReason::Absent),
            Some(text) if text.is_empty() => Lookup::Missing(MissingReason::Empty),
            Some(text) => Lookup::Found(FieldValue::Text(text)),
        },
        FieldSource::DateRange(path) => match decode::date_pair(container, path) {
            Ok(None) => Lookup::Missing(MissingReason::Absent),
            Err(DecodeError::NoDateTokens(_)) => Lookup::Missing(MissingReason::Empty),
            Err(other) => return Err(other.into()),
            Ok(Some(range)) => {
                let duration = range.duration().map_err(FieldFailure::Date)?;
                debug!("Scan ran from {} to {}", range.start, range.end);
                Lookup::Found(FieldValue::Duration(duration))
            }
        },
        FieldSource::AlignmentTime => Lookup::Found(FieldValue::Int(params.alignment_time)),
        FieldSource::ProcessingTime => Lookup::Found(FieldValue::Int(params.processing_time)),
    };
    Ok(lookup)
}

fn first_or_empty(value: Option<FieldValue>) -> Lookup {
    match value {
        Some(value) => Lookup::Found(value),
        None => Lookup::Missing(MissingReason::Empty),
    }
}

/// Feedback line for a field that was read.
fn describe(spec: &FieldSpec, value: &FieldValue) -> String {
    match (value, spec.unit) {
        (FieldValue::Duration(_), Some(unit)) => {
            format!("{}: {} {}", spec.label, spec.render(value), unit)
        }
        (_, Some(unit)) => format!("{}: {} {}", spec.label, value, unit),
        (_, None) => format!("{}: {}", spec.label, value),
    }
}
