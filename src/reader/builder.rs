//! Builder for configuring a [PeekReader].

use crate::error::{ReaderError, Result};
use crate::reader::peek_reader::{DEFAULT_BLOCK_SIZE, PeekReader};
use crate::source::ByteSource;

/// Label used when none is configured.
const DEFAULT_LABEL: &str = "<unlabelled>";

// =#========================================================================#=
// PEEK READER BUILDER
// =#========================================================================$=
/// Builder for [PeekReader] with custom block size, label and start offset.
///
/// # Example
/// ```
/// use bytestream::PeekReader;
/// use bytestream::source::InMemorySource;
///
/// let source = InMemorySource::from_slice(b"\x89PNG\r\n\x1a\n....");
/// let mut reader = PeekReader::builder(source)
///     .block_size(512)
///     .label("logo.png")
///     .start_offset(1)
///     .build()?;
///
/// assert_eq!(reader.consume(3)?, b"PNG");
/// assert_eq!(reader.current_offset(), 4);
/// # Ok::<(), bytestream::ReaderError>(())
/// ```
#[must_use]
pub struct PeekReaderBuilder<S> {
    source: S,
    block_size: usize,
    label: Option<String>,
    start_offset: Option<u64>,
}

impl<S: ByteSource> PeekReaderBuilder<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            block_size: DEFAULT_BLOCK_SIZE,
            label: None,
            start_offset: None,
        }
    }

    /// Sets the number of bytes requested per raw read.
    /// Defaults to [DEFAULT_BLOCK_SIZE].
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the label identifying the source in logs and errors.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Positions the reader at `offset` when built, as [reset](PeekReader::reset) does.
    pub fn start_offset(mut self, offset: u64) -> Self {
        self.start_offset = Some(offset);
        self
    }

    /// Builds the reader.
    ///
    /// # Errors
    /// * [ReaderError::InvalidBlockSize] - The block size is 0
    /// * [ReaderError::Io] - Seeking to the start offset failed
    pub fn build(self) -> Result<PeekReader<S>> {
        if self.block_size == 0 {
            return Err(ReaderError::InvalidBlockSize);
        }

        let label = self.label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
        let mut reader = PeekReader::from_parts(self.source, self.block_size, label);
        if let Some(offset) = self.start_offset {
            reader.reset(offset)?;
        }

        Ok(reader)
    }
}
