use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

/// Format of the timestamps stored in `ImageInfo/Date`.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Tokens this short are padding between timestamps, not timestamps.
const MIN_TOKEN_LEN: usize = 3;

/// A timestamp token that does not match [`TIMESTAMP_FORMAT`].
#[derive(Debug, Error)]
#[error("Malformed timestamp '{value}': {source}")]
pub struct MalformedTimestamp {
    /// The offending token
    pub value: String,
    /// Parser error
    #[source]
    pub source: chrono::ParseError,
}

/// First and last acquisition timestamps of a scan, as raw text tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    /// Timestamp of the first projection, e.g. `01/01/2026 00:00:00`
    pub start: String,
    /// Timestamp of the last projection
    pub end: String,
}

impl DateRange {
    /// Pick the first and last timestamps out of a date stream.
    ///
    /// The stream holds one fixed-width slot per projection, each an ASCII
    /// timestamp padded with NULs. Splitting on NUL and dropping tokens of
    /// two bytes or fewer leaves the timestamps in order; fractional seconds
    /// (`.123`) are cut off. Returns `None` when no token survives.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let tokens: Vec<&[u8]> = bytes
            .split(|&b| b == 0)
            .filter(|token| token.len() >= MIN_TOKEN_LEN)
            .collect();

        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(Self {
            start: before_dot(first),
            end: before_dot(last),
        })
    }

    /// Parsed start timestamp.
    pub fn start_time(&self) -> Result<NaiveDateTime, MalformedTimestamp> {
        parse_timestamp(&self.start)
    }

    /// Parsed end timestamp.
    pub fn end_time(&self) -> Result<NaiveDateTime, MalformedTimestamp> {
        parse_timestamp(&self.end)
    }

    /// Time between the first and last projection.
    ///
    /// Timestamps carry no zone, so the difference is taken on wall-clock
    /// values. Negative if the end precedes the start.
    pub fn duration(&self) -> Result<Duration, MalformedTimestamp> {
        let start = self.start_time()?;
        let end = self.end_time()?;
        Ok(end.signed_duration_since(start))
    }
}

fn before_dot(token: &[u8]) -> String {
    let end = token.iter().position(|&b| b == b'.').unwrap_or(token.len());
    String::from_utf8_lossy(&token[..end]).into_owned()
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, MalformedTimestamp> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| MalformedTimestamp {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_and_last_tokens() {
        let bytes = b"01/01/2026 00:00:00.250\0\0\001/01/2026 00:45:00\0\0\001/01/2026 01:30:00.999\0\0";
        let range = DateRange::from_bytes(bytes).unwrap();

        assert_eq!(range.start, "01/01/2026 00:00:00");
        assert_eq!(range.end, "01/01/2026 01:30:00");
        assert_eq!(range.duration().unwrap().num_seconds(), 5400);
    }

    #[test]
    fn test_short_tokens_dropped() {
        let bytes = b"ab\0\x01\x02\003/15/2025 10:00:00\0zz\0";
        let range = DateRange::from_bytes(bytes).unwrap();

        assert_eq!(range.start, "03/15/2025 10:00:00");
        assert_eq!(range.end, "03/15/2025 10:00:00");
        assert_eq!(range.duration().unwrap().num_seconds(), 0);
    }

    #[test]
    fn test_no_tokens() {
        assert!(DateRange::from_bytes(b"").is_none());
        assert!(DateRange::from_bytes(b"\0\0ab\0c").is_none());
    }

    #[test]
    fn test_malformed_timestamp() {
        let range = DateRange {
            start: "2026-01-01 00:00:00".to_string(),
            end: "01/01/2026 01:00:00".to_string(),
        };

        let err = range.duration().unwrap_err();
        assert_eq!(err.value, "2026-01-01 00:00:00");
    }

    #[test]
    fn test_end_before_start_is_negative() {
        let range = DateRange {
            start: "01/02/2026 00:00:00".to_string(),
            end: "01/01/2026 23:00:00".to_string(),
        };

        assert_eq!(range.duration().unwrap().num_seconds(), -3600);
    }

    proptest! {
        #[test]
        fn prop_surviving_tokens_are_longer_than_two(
            tokens in proptest::collection::vec("[a-z0-9 /:]{0,6}", 1..12)
        ) {
            let bytes = tokens.join("\0").into_bytes();
            let kept: Vec<&String> = tokens.iter().filter(|t| t.len() > 2).collect();

            match DateRange::from_bytes(&bytes) {
                Some(range) => {
                    prop_assert_eq!(&range.start, kept[0]);
                    prop_assert_eq!(&range.end, kept[kept.len() - 1]);
                }
                None => prop_assert!(kept.is_empty()),
            }
        }
    }
}
