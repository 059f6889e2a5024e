//! Error types for the peekable reader.
//!
//! This module provides [ReaderError], which keeps the expected end-of-stream
//! outcome apart from genuine I/O faults of the underlying byte source.

use std::io;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ReaderError>;

// =#========================================================================#=
// READER ERROR
// =#========================================================================$=
/// Errors returned by [PeekReader](crate::PeekReader) operations.
///
/// Each variant that originates from a reader carries the reader's label and
/// the logical offset at the time of the call, so that the message alone
/// locates the problem in the source.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Fewer bytes remain in the source than were requested.
    ///
    /// This is a normal outcome, not a fault. The reader state is unchanged.
    #[error("end of stream in '{label}' at offset {offset}: requested {requested} bytes, {available} available")]
    EndOfStream {
        label: String,
        offset: u64,
        requested: usize,
        available: usize,
    },

    /// A peek would need more than one prefetched block beyond the current one.
    #[error("peek of {requested} bytes in '{label}' at offset {offset} exceeds lookahead limit of {limit} bytes")]
    LookaheadExceeded {
        label: String,
        offset: u64,
        requested: usize,
        limit: usize,
    },

    /// A reader was configured with a block size of zero.
    #[error("block size must be at least 1 byte")]
    InvalidBlockSize,

    /// The byte source failed to read, seek, report its position, or close.
    #[error("I/O error on '{label}': {source}")]
    Io {
        label: String,
        #[source]
        source: io::Error,
    },
}

impl ReaderError {
    /// Wraps an I/O error raised by the source labelled `label`.
    pub fn io(label: &str, source: io::Error) -> Self {
        ReaderError::Io {
            label: label.to_string(),
            source,
        }
    }

    /// Returns `true` if this is the expected end-of-stream condition.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReaderError::EndOfStream { .. })
    }

    /// Returns `true` if this wraps an I/O fault of the byte source.
    pub fn is_io(&self) -> bool {
        matches!(self, ReaderError::Io { .. })
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_stream_is_not_io() {
        let err = ReaderError::EndOfStream {
            label: "tiny.bin".to_string(),
            offset: 4,
            requested: 7,
            available: 6,
        };
        assert!(err.is_end_of_stream());
        assert!(!err.is_io());
        assert_eq!(
            err.to_string(),
            "end of stream in 'tiny.bin' at offset 4: requested 7 bytes, 6 available"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = ReaderError::io("disk", io::Error::other("sector unreadable"));
        assert!(err.is_io());
        assert!(!err.is_end_of_stream());
        assert_eq!(err.to_string(), "I/O error on 'disk': sector unreadable");

        let source = std::error::Error::source(&err).expect("io error is the source");
        assert_eq!(source.to_string(), "sector unreadable");
    }
}
