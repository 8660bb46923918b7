//! Access to named streams inside a TXRM compound document.
//!
//! Xradia scanners write their acquisition data as an OLE compound file: a
//! small file system of storages (directories) and streams (files). The
//! reporting pipeline only needs three capabilities from it, captured by the
//! [`Container`] trait:
//!
//! - does an entry exist at a path, and what kind is it
//! - read the full bytes of a stream
//!
//! [`TxrmFile`] implements the trait over the `cfb` crate, and
//! [`MemoryContainer`] implements it over an in-memory map for tests and
//! benchmarks.
//!
//! # Example
//!
//! ```no_run
//! use txrm_params::container::{Container, EntryKind, TxrmFile};
//!
//! let mut file = TxrmFile::open("scan.txrm")?;
//! if file.entry_kind("ImageInfo/Voltage") == EntryKind::Stream {
//!     let bytes = file.read_stream("ImageInfo/Voltage")?;
//!     println!("{} bytes", bytes.len());
//! }
//! # Ok::<(), txrm_params::container::ContainerError>(())
//! ```

mod error;
mod memory;
mod txrm;

pub use error::ContainerError;
pub use memory::MemoryContainer;
pub use txrm::{EntryInfo, TxrmFile, CFB_SIGNATURE, TXRM_EXTENSION};

/// Kind of entry found at a stream path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A leaf stream holding bytes
    Stream,
    /// A storage (directory) holding other entries
    Storage,
    /// Nothing at this path
    Absent,
}

/// Read-only view of a structured container holding named streams.
///
/// Paths are `/`-separated and relative to the root storage, e.g.
/// `"ImageInfo/Voltage"`.
pub trait Container {
    /// Kind of the entry at `path`.
    fn entry_kind(&self, path: &str) -> EntryKind;

    /// Whether any entry exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.entry_kind(path) != EntryKind::Absent
    }

    /// Read the full contents of the stream at `path`.
    ///
    /// # Errors
    /// `ContainerError::NoSuchStream` if `path` is absent or a storage.
    fn read_stream(&mut self, path: &str) -> Result<Vec<u8>, ContainerError>;
}

impl<C: Container + ?Sized> Container for &mut C {
    fn entry_kind(&self, path: &str) -> EntryKind {
        (**self).entry_kind(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn read_stream(&mut self, path: &str) -> Result<Vec<u8>, ContainerError> {
        (**self).read_stream(path)
    }
}
