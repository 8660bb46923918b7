//! Typed decoders for TXRM streams.
//!
//! Xradia streams carry no type information; the reader has to know that
//! `ImageInfo/Voltage` is a run of `f32` and `AcquisitionSettings/Binning`
//! a run of `i32`. Each decoder here reads one stream and interprets it:
//!
//! | Decoder | Stream layout | Result |
//! |---------|---------------|--------|
//! | [`float_array`] | little-endian `f32` values | `Vec<f32>` |
//! | [`int_array`] | little-endian `i32` values | `Vec<i32>` |
//! | [`text`] | ASCII, NUL-terminated | `String` |
//! | [`date_pair`] | NUL-separated ASCII timestamps | [`DateRange`] |
//! | [`float_image`] | row-major `f32` matrix | [`FloatImage`] |
//!
//! All decoders return `Ok(None)` when nothing decodable lives at the path:
//! either no entry exists, or the entry is a storage rather than a stream.
//! A stream that exists but holds no data is `Ok(Some(..))` with an empty
//! value, so callers can tell "missing" from "present and empty".

mod date;
mod image;

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use thiserror::Error;

use crate::container::{Container, ContainerError, EntryKind};

pub use date::{DateRange, MalformedTimestamp, TIMESTAMP_FORMAT};
pub use image::FloatImage;

/// Errors that can occur while decoding a stream that does exist.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container failed to deliver the stream bytes
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Stream length does not fit the element size or requested shape
    #[error("Invalid data length at '{path}': expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Stream path
        path: String,
        /// Byte count the decoder needed
        expected: usize,
        /// Byte count the stream held
        actual: usize,
    },

    /// Text stream contains bytes outside ASCII
    #[error("Non-ASCII text at '{0}'")]
    NonAscii(String),

    /// Date stream holds no timestamp token
    #[error("No timestamp found at '{0}'")]
    NoDateTokens(String),
}

/// Read the stream at `path`, or `None` if there is no stream there.
fn read_leaf<C: Container + ?Sized>(
    container: &mut C,
    path: &str,
) -> Result<Option<Vec<u8>>, DecodeError> {
    match container.entry_kind(path) {
        EntryKind::Stream => Ok(Some(container.read_stream(path)?)),
        EntryKind::Storage | EntryKind::Absent => Ok(None),
    }
}

fn check_multiple_of_four(path: &str, bytes: &[u8]) -> Result<usize, DecodeError> {
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::InvalidLength {
            path: path.to_string(),
            expected: bytes.len() / 4 * 4,
            actual: bytes.len(),
        });
    }
    Ok(bytes.len() / 4)
}

/// Decode a stream of little-endian `f32` values.
pub fn float_array<C: Container + ?Sized>(
    container: &mut C,
    path: &str,
) -> Result<Option<Vec<f32>>, DecodeError> {
    let Some(bytes) = read_leaf(container, path)? else {
        return Ok(None);
    };

    let count = check_multiple_of_four(path, &bytes)?;
    let mut values = Vec::with_capacity(count);
    let mut cursor = Cursor::new(&bytes);
    for _ in 0..count {
        values.push(cursor.read_f32::<LittleEndian>().map_err(ContainerError::from)?);
    }
    Ok(Some(values))
}

/// Decode a stream of little-endian `i32` values.
pub fn int_array<C: Container + ?Sized>(
    container: &mut C,
    path: &str,
) -> Result<Option<Vec<i32>>, DecodeError> {
    let Some(bytes) = read_leaf(container, path)? else {
        return Ok(None);
    };

    let count = check_multiple_of_four(path, &bytes)?;
    let mut values = Vec::with_capacity(count);
    let mut cursor = Cursor::new(&bytes);
    for _ in 0..count {
        values.push(cursor.read_i32::<LittleEndian>().map_err(ContainerError::from)?);
    }
    Ok(Some(values))
}

/// Decode a NUL-terminated ASCII string.
///
/// Everything after the first NUL is ignored. An empty stream, or one that
/// starts with NUL, decodes to `Some("")`.
pub fn text<C: Container + ?Sized>(
    container: &mut C,
    path: &str,
) -> Result<Option<String>, DecodeError> {
    let Some(bytes) = read_leaf(container, path)? else {
        return Ok(None);
    };

    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let token = &bytes[..end];
    if !token.is_ascii() {
        return Err(DecodeError::NonAscii(path.to_string()));
    }
    Ok(Some(String::from_utf8_lossy(token).into_owned()))
}

/// Decode the first and last timestamp of a date stream.
///
/// See [`DateRange::from_bytes`] for the token rules.
pub fn date_pair<C: Container + ?Sized>(
    container: &mut C,
    path: &str,
) -> Result<Option<DateRange>, DecodeError> {
    let Some(bytes) = read_leaf(container, path)? else {
        return Ok(None);
    };

    DateRange::from_bytes(&bytes)
        .map(Some)
        .ok_or_else(|| DecodeError::NoDateTokens(path.to_string()))
}

/// Decode a row-major `rows x cols` matrix of little-endian `f32` values.
///
/// An empty stream decodes to an empty 0x0 image. Bytes past
/// `rows * cols * 4` are ignored.
pub fn float_image<C: Container + ?Sized>(
    container: &mut C,
    path: &str,
    shape: (usize, usize),
) -> Result<Option<FloatImage>, DecodeError> {
    let Some(bytes) = read_leaf(container, path)? else {
        return Ok(None);
    };

    if bytes.is_empty() {
        return Ok(Some(FloatImage::empty()));
    }

    let (rows, cols) = shape;
    let needed = rows.saturating_mul(cols).saturating_mul(4);
    if bytes.len() < needed {
        return Err(DecodeError::InvalidLength {
            path: path.to_string(),
            expected: needed,
            actual: bytes.len(),
        });
    }

    let mut data = Vec::with_capacity(rows * cols);
    let mut cursor = Cursor::new(&bytes[..needed]);
    for _ in 0..rows * cols {
        data.push(cursor.read_f32::<LittleEndian>().map_err(ContainerError::from)?);
    }
    Ok(Some(FloatImage::new(rows, cols, data)))
}
