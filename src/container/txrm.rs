//! TXRM files opened through the `cfb` compound-file reader.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use cfb::CompoundFile;
use log::{debug, info};

use super::{Container, ContainerError, EntryKind};

/// Magic bytes at the start of every compound document.
pub const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// File extension required for TXRM inputs (compared case-insensitively).
pub const TXRM_EXTENSION: &str = "txrm";

/// One entry of a TXRM container, as listed by [`TxrmFile::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Path relative to the root storage, `/`-separated
    pub path: String,
    /// Stream or storage
    pub kind: EntryKind,
    /// Stream length in bytes (0 for storages)
    pub len: u64,
}

/// A read-only TXRM container.
///
/// The underlying file is released when the value is dropped, so scoping a
/// `TxrmFile` to one extraction call closes it on every exit path.
pub struct TxrmFile<F = File> {
    inner: CompoundFile<F>,
    source: Option<PathBuf>,
}

impl TxrmFile<File> {
    /// Open a `.txrm` file for reading.
    ///
    /// # Errors
    /// - `ContainerError::NotFound` if `path` is not an existing regular file
    /// - `ContainerError::WrongExtension` if the extension is not `.txrm`
    /// - `ContainerError::UnsupportedFormat` if the file is not a compound document
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        check_path(path)?;

        let file = File::open(path)?;
        let mut container = Self::from_reader(file)?;
        container.source = Some(path.to_path_buf());

        info!("Opened TXRM container {}", path.display());
        Ok(container)
    }
}

impl<F: Read + Seek> TxrmFile<F> {
    /// Wrap any seekable reader holding a compound document.
    ///
    /// Checks the 8-byte signature before handing the reader to the
    /// compound-file parser.
    pub fn from_reader(mut reader: F) -> Result<Self, ContainerError> {
        check_signature(&mut reader)?;

        let inner = CompoundFile::open(reader).map_err(|e| ContainerError::UnsupportedFormat {
            reason: format!("unreadable compound document: {}", e),
        })?;

        Ok(Self {
            inner,
            source: None,
        })
    }

    /// Path this container was opened from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// List every storage and stream below the root, depth first.
    pub fn entries(&self) -> Vec<EntryInfo> {
        self.inner
            .walk()
            .filter(|entry| !entry.is_root())
            .map(|entry| EntryInfo {
                path: relative_path(entry.path()),
                kind: if entry.is_stream() {
                    EntryKind::Stream
                } else {
                    EntryKind::Storage
                },
                len: if entry.is_stream() { entry.len() } else { 0 },
            })
            .collect()
    }

    /// Consume the container and return the underlying reader.
    pub fn into_inner(self) -> F {
        self.inner.into_inner()
    }
}

impl<F: Read + Seek> Container for TxrmFile<F> {
    fn entry_kind(&self, path: &str) -> EntryKind {
        if self.inner.is_stream(path) {
            EntryKind::Stream
        } else if self.inner.is_storage(path) {
            EntryKind::Storage
        } else {
            EntryKind::Absent
        }
    }

    fn read_stream(&mut self, path: &str) -> Result<Vec<u8>, ContainerError> {
        if !self.inner.is_stream(path) {
            return Err(ContainerError::NoSuchStream(path.to_string()));
        }

        // The recorded stream length is not checked against the file, so it
        // cannot size the buffer.
        let mut stream = self.inner.open_stream(path)?;
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;

        debug!("Read {} bytes from {}", data.len(), path);
        Ok(data)
    }
}

impl<F> std::fmt::Debug for TxrmFile<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxrmFile")
            .field("source", &self.source)
            .finish()
    }
}

/// Existence and extension checks, done before any byte of the file is read.
fn check_path(path: &Path) -> Result<(), ContainerError> {
    if !path.is_file() {
        return Err(ContainerError::NotFound(path.to_path_buf()));
    }

    let extension_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(TXRM_EXTENSION))
        .unwrap_or(false);
    if !extension_ok {
        return Err(ContainerError::WrongExtension(path.to_path_buf()));
    }

    Ok(())
}

fn check_signature<R: Read + Seek>(reader: &mut R) -> Result<(), ContainerError> {
    let mut magic = [0u8; 8];
    reader.seek(SeekFrom::Start(0))?;
    if reader.read_exact(&mut magic).is_err() || magic != CFB_SIGNATURE {
        return Err(ContainerError::UnsupportedFormat {
            reason: "missing compound document signature".to_string(),
        });
    }
    reader.seek(SeekFrom::Start(0))?;
    Ok(())
}

/// `cfb` reports absolute paths (`/ImageInfo/Voltage`); the rest of the
/// crate uses root-relative ones.
fn relative_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
