//! Bytestream is a library for sequential, block-buffered reading of binary
//! data with cheap lookahead.
//!
//! This crate offers the reading layer for binary-format parsers: consume the
//! next `n` bytes, or peek at them without moving on, while the underlying
//! source is only touched in whole blocks.
//! Core functionality provided:
//! - [PeekReader]: Buffers one current block and at most one lookahead block
//!   prefetched by peek. Consume promotes a prefetched block instead of
//!   reading the same bytes twice.
//! - [ByteSource](source::ByteSource): The raw primitives (read, seek, tell,
//!   close) a reader needs. Implemented for files, cursors and
//!   [InMemorySource](source::InMemorySource); implement it for your own
//!   handles.
//! - [ReaderError]: Keeps the expected end-of-stream outcome apart from I/O
//!   faults of the source.
//!
//! Guarantees:
//! - Consume is all or nothing: on end of stream the logical offset does not
//!   move and no partial data is returned.
//! - Peek never moves the logical offset.
//! - [reset](PeekReader::reset) rewinds or skips with a single seek.
//!
//! Limitations:
//! - Peek looks at most one block beyond the current one; see
//!   [PeekReader] for the exact limit.
//! - No write path, no shared access to one reader.
//!
//! # Usage patterns
//! 1. Open a file with default settings via [open] or
//!    [PeekReader::from_file].
//! 2. Configure a reader yourself with [PeekReader::builder].
//!
//! ## Example Default Configuration
//! ```no_run
//! let mut reader = bytestream::open("image.bin")?;
//! let magic = reader.peek(4)?;
//! if magic == b"\x7fELF" {
//!     reader.consume(4)?;
//! }
//! # Ok::<(), bytestream::ReaderError>(())
//! ```
//!
//! ## Example Reader Configuration
//! ```
//! use bytestream::PeekReader;
//! use std::io::Cursor;
//!
//! let mut reader = PeekReader::builder(Cursor::new(b"HDR\x02payload"))
//!     .block_size(4)
//!     .label("packet")
//!     .build()?;
//!
//! assert_eq!(reader.consume(3)?, b"HDR");
//! let len = reader.consume_byte()? as usize;
//! assert_eq!(reader.peek(len)?, b"pa");
//! assert_eq!(reader.current_offset(), 4);
//! # Ok::<(), bytestream::ReaderError>(())
//! ```

pub mod error;
pub mod reader;
pub mod source;

pub use error::{ReaderError, Result};
pub use reader::{DEFAULT_BLOCK_SIZE, PeekReader, PeekReaderBuilder};

use std::fs::File;
use std::path::Path;

// ============================================================================
// Quick API
// ============================================================================
/// Opens a file for reading with default settings.
///
/// See [`PeekReader::from_file`] for full documentation.
pub fn open<P: AsRef<Path>>(path: P) -> Result<PeekReader<File>> {
    PeekReader::from_file(path)
}
