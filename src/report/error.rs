use std::fmt;

use thiserror::Error;

use crate::container::ContainerError;
use crate::decode::{DecodeError, MalformedTimestamp};

use super::Feedback;

/// Why a required field could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    /// No stream at the path, or a storage where a stream was expected
    Absent,
    /// The stream exists but decodes to nothing
    Empty,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::Absent => f.write_str("not found"),
            MissingReason::Empty => f.write_str("empty"),
        }
    }
}

/// Errors that can occur while building a report.
///
/// File-level failures ([`ReportError::Container`]) happen before any field
/// is read and carry no feedback. Field-level failures keep the feedback
/// trail of every field read before the failure; see
/// [`ReportError::feedback`].
#[derive(Error, Debug)]
pub enum ReportError {
    /// Opening the container failed (missing file, wrong extension, unsupported format)
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// A required field is absent or empty
    #[error("Missing required field '{label}' ({reason})")]
    MissingRequiredField {
        /// Component Name of the field
        label: &'static str,
        /// Container path, when the field is read from the container
        path: Option<&'static str>,
        /// Absent or empty
        reason: MissingReason,
        /// Trail of the fields read before this one
        feedback: Feedback,
    },

    /// A timestamp token does not match `MM/DD/YYYY HH:MM:SS`
    #[error("Malformed date in {label}: {source}")]
    MalformedDate {
        /// Component Name of the field
        label: &'static str,
        /// Parse failure
        #[source]
        source: MalformedTimestamp,
        /// Trail of the fields read before this one
        feedback: Feedback,
    },

    /// A stream exists but cannot be decoded as its field type
    #[error("Could not decode {label}: {source}")]
    MalformedStream {
        /// Component Name of the field
        label: &'static str,
        /// Decoder failure
        #[source]
        source: DecodeError,
        /// Trail of the fields read before this one
        feedback: Feedback,
    },

    /// CSV rendering failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Feedback collected before a field-level failure.
    pub fn feedback(&self) -> Option<&Feedback> {
        match self {
            ReportError::MissingRequiredField { feedback, .. }
            | ReportError::MalformedDate { feedback, .. }
            | ReportError::MalformedStream { feedback, .. } => Some(feedback),
            ReportError::Container(_) | ReportError::Csv(_) | ReportError::Io(_) => None,
        }
    }

    /// Component Name of the field that stopped the extraction.
    pub fn field_label(&self) -> Option<&'static str> {
        match self {
            ReportError::MissingRequiredField { label, .. }
            | ReportError::MalformedDate { label, .. }
            | ReportError::MalformedStream { label, .. } => Some(*label),
            ReportError::Container(_) | ReportError::Csv(_) | ReportError::Io(_) => None,
        }
    }
}
