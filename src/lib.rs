//! # txrm-params - TXRM acquisition parameters for LIMS import
//!
//! `txrm_params` reads the acquisition metadata of Xradia tomography scans
//! (`.txrm` files) and turns a fixed set of instrument parameters into the
//! CSV rows expected by the laboratory information system importer.
//!
//! ## Key Features
//!
//! - **Read-only container access**: TXRM files are OLE compound documents;
//!   they are opened read-only through the `cfb` crate and closed as soon as
//!   extraction finishes.
//!
//! - **Typed stream decoders**: little-endian `f32`/`i32` arrays,
//!   NUL-terminated ASCII text, scan date ranges and `f32` images, each
//!   distinguishing "absent" from "present but empty".
//!
//! - **Fail-fast pipeline**: fifteen fields in a fixed order; the first
//!   missing required field aborts the report, keeping a feedback trail for
//!   the operator.
//!
//! - **Multi-sample tables**: one extraction, stamped once per sample ID.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use txrm_params::report::ReportParams;
//! use txrm_params::table::make_table;
//!
//! let report = make_table("scan.txrm", &["1000", "1001"], &ReportParams::new(15, 15))?;
//! print!("{}", report.csv);
//! # Ok::<(), txrm_params::report::ReportError>(())
//! ```
//!
//! produces
//!
//! ```text
//! ,Sample ID,Phase,Analysis,Component Name,Value
//! 0,1000,Global,Scanning Parameters,Voltage,90
//! 0,1000,Global,Scanning Parameters,Power,200
//! ...
//! 0,1001,Global,Scanning Parameters,Processing Time,15
//! ```
//!
//! ## Architecture
//!
//! - [`container`]: the [`Container`](container::Container) trait, the
//!   `cfb`-backed [`TxrmFile`](container::TxrmFile) and an in-memory fake
//! - [`decode`]: typed stream decoders
//! - [`fields`]: the fixed, ordered list of report fields
//! - [`report`]: the extraction pipeline producing rows and feedback
//! - [`table`]: multi-sample expansion and CSV rendering

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod container;
pub mod decode;
pub mod fields;
pub mod report;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::container::{Container, ContainerError, EntryKind, MemoryContainer, TxrmFile};
    pub use crate::decode::{DateRange, DecodeError, FloatImage};
    pub use crate::fields::{FieldSpec, FieldValue, FIELD_SPECS};
    pub use crate::report::{
        extract, Extraction, Feedback, MissingReason, ReportError, ReportParams, Row,
    };
    pub use crate::table::{make_table, make_table_from, Table, TableReport};
}
