//! Block-buffered reader with single-block peek lookahead.
//!
//! This module provides [PeekReader], which wraps any [ByteSource] and serves
//! consume and peek requests from one current block plus at most one
//! prefetched lookahead block.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{ReaderError, Result};
use crate::reader::builder::PeekReaderBuilder;
use crate::source::ByteSource;

/// Default block size (8 KiB), matching the standard library's I/O buffer size.
pub const DEFAULT_BLOCK_SIZE: usize = 8 * 1024;

// =#========================================================================#=
// PEEK READER
// =#========================================================================$=
/// A sequential reader over a [ByteSource] that can look ahead without
/// advancing.
///
/// Bytes are fetched from the source in blocks of [block_size](Self::block_size).
/// The reader keeps a *current block* with a cursor marking the next
/// unconsumed byte. A [peek](Self::peek) that runs past the end of the current
/// block prefetches exactly one further *lookahead block*; the next
/// [consume](Self::consume) that needs it promotes it instead of reading the
/// same bytes again.
///
/// # Logical vs. raw offset
/// [current_offset](Self::current_offset) counts the bytes handed out by
/// consume operations. The source's own position
/// ([raw_source_offset](Self::raw_source_offset)) runs ahead of it by whatever
/// is buffered but not yet consumed.
///
/// # Lookahead limit
/// A peek of `n <= block_size` bytes always succeeds if the bytes exist. More
/// generally `peek(n)` is served whenever `n` fits in the rest of the current
/// block plus one block; longer requests fail with
/// [ReaderError::LookaheadExceeded] without touching the source.
///
/// # Example
/// ```
/// use bytestream::PeekReader;
/// use std::io::Cursor;
///
/// let mut reader = PeekReader::with_block_size(Cursor::new(b"ABCDEFGHIJ"), 4, "letters")?;
///
/// assert_eq!(reader.consume_byte()?, b'A');
/// assert_eq!(reader.peek(3)?, b"BCD");
/// assert_eq!(reader.current_offset(), 1);
///
/// assert_eq!(reader.consume(3)?, b"BCD");
/// assert!(reader.consume(7).unwrap_err().is_end_of_stream());
/// assert_eq!(reader.consume(6)?, b"EFGHIJ");
/// assert_eq!(reader.current_offset(), 10);
/// # Ok::<(), bytestream::ReaderError>(())
/// ```
pub struct PeekReader<S: ByteSource> {
    /// The owned source, released on close
    source: S,

    /// Identifies the source in logs and errors
    label: String,

    /// Number of bytes requested from the source per raw read
    block_size: usize,

    /// Block the cursor points into
    current_block: Vec<u8>,

    /// Index of the next unconsumed byte in `current_block`
    cursor: usize,

    /// Bytes consumed before the first byte of `current_block`
    consumed_before_block: u64,

    /// Block prefetched by peek, never empty when present
    lookahead: Option<Vec<u8>>,

    /// Whether the lookahead block is full or ends at the end of the source.
    /// False while it is absent or was cut short by an I/O error.
    lookahead_complete: bool,
}

impl PeekReader<File> {
    /// Opens the file at `path` and wraps it with the default block size.
    ///
    /// The path is used as label.
    ///
    /// # Errors
    /// Returns [ReaderError::Io] if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PeekReader<File>> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let file = File::open(path).map_err(|err| ReaderError::io(&label, err))?;
        Ok(Self::from_parts(file, DEFAULT_BLOCK_SIZE, label))
    }
}

impl<S: ByteSource> PeekReader<S> {
    /// Creates a reader with [DEFAULT_BLOCK_SIZE] around an open source.
    ///
    /// Offsets are counted from the source's current raw position as 0. Use
    /// the [builder](Self::builder) with a start offset if the source is not
    /// positioned at its beginning.
    pub fn new(source: S, label: impl Into<String>) -> Self {
        Self::from_parts(source, DEFAULT_BLOCK_SIZE, label.into())
    }

    /// Creates a reader requesting `block_size` bytes per raw read.
    ///
    /// # Errors
    /// Returns [ReaderError::InvalidBlockSize] if `block_size` is 0.
    pub fn with_block_size(source: S, block_size: usize, label: impl Into<String>) -> Result<Self> {
        Self::builder(source).block_size(block_size).label(label).build()
    }

    /// Returns a [PeekReaderBuilder] for configuring a new reader.
    pub fn builder(source: S) -> PeekReaderBuilder<S> {
        PeekReaderBuilder::new(source)
    }

    pub(crate) fn from_parts(source: S, block_size: usize, label: String) -> Self {
        debug_assert!(block_size > 0);
        debug!(label = %label, block_size, "created peek reader");
        Self {
            source,
            label,
            block_size,
            current_block: Vec::new(),
            cursor: 0,
            consumed_before_block: 0,
            lookahead: None,
            lookahead_complete: false,
        }
    }

    // -------------------------------------------------------------------------
    // Positioning and lifecycle
    // -------------------------------------------------------------------------

    /// Repositions the source at `offset` and drops all buffered data.
    ///
    /// Afterwards the reader behaves as if freshly constructed at `offset`.
    /// Works for rewinding as well as skipping ahead. Issues exactly one seek.
    ///
    /// # Errors
    /// Returns [ReaderError::Io] if the seek fails; buffers are kept in that case.
    pub fn reset(&mut self, offset: u64) -> Result<()> {
        self.source
            .seek_to(offset)
            .map_err(|err| self.io_error(err))?;

        self.consumed_before_block = offset;
        self.current_block.clear();
        self.cursor = 0;
        self.lookahead = None;
        self.lookahead_complete = false;

        debug!(label = %self.label, offset, "reset peek reader");
        Ok(())
    }

    /// Releases the source, consuming the reader.
    ///
    /// # Errors
    /// Returns [ReaderError::Io] if the source fails to close.
    pub fn close(self) -> Result<()> {
        debug!(label = %self.label, offset = self.current_offset(), "closing peek reader");
        let label = self.label;
        self.source
            .close()
            .map_err(|err| ReaderError::io(&label, err))
    }

    /// Returns the source without closing it. Buffered bytes are lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Number of bytes consumed so far, counted from the start of the source.
    #[inline]
    pub fn current_offset(&self) -> u64 {
        self.consumed_before_block + self.cursor as u64
    }

    /// The source's own position, ahead of [current_offset](Self::current_offset)
    /// by the buffered bytes. Meant for diagnostics.
    pub fn raw_source_offset(&mut self) -> Result<u64> {
        self.source.tell().map_err(|err| self.io_error(err))
    }

    // -------------------------------------------------------------------------
    // Consume
    // -------------------------------------------------------------------------

    /// Returns the next `n` bytes and advances past them.
    ///
    /// All or nothing: if fewer than `n` bytes remain, nothing is consumed and
    /// the bytes pulled from the source while trying stay buffered for the
    /// next call. `n == 0` returns an empty vector without I/O.
    ///
    /// # Errors
    /// * [ReaderError::EndOfStream] - Fewer than `n` bytes remain
    /// * [ReaderError::Io] - The source failed
    pub fn consume(&mut self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        if self.available() == 0 {
            self.advance_block()?;
            if self.available() == 0 {
                return Err(self.end_of_stream(n, 0));
            }
        }

        let available = self.available();
        if n <= available {
            let bytes = self.current_block[self.cursor..self.cursor + n].to_vec();
            self.cursor += n;
            return Ok(bytes);
        }

        self.consume_spanning(n)
    }

    /// Returns the next byte and advances past it.
    ///
    /// # Errors
    /// Same as [consume](Self::consume).
    #[inline]
    pub fn consume_byte(&mut self) -> Result<u8> {
        if let Some(&byte) = self.current_block.get(self.cursor) {
            self.cursor += 1;
            return Ok(byte);
        }
        Ok(self.consume(1)?[0])
    }

    /// Replaces the exhausted current block with the pending lookahead block,
    /// or with a fresh block from the source.
    fn advance_block(&mut self) -> Result<()> {
        debug_assert_eq!(self.cursor, self.current_block.len());
        self.consumed_before_block += self.current_block.len() as u64;
        self.cursor = 0;

        self.lookahead_complete = false;
        match self.lookahead.take() {
            Some(block) => {
                trace!(label = %self.label, len = block.len(), "promoted lookahead block");
                self.current_block = block;
                Ok(())
            }
            None => {
                self.current_block.clear();
                fill_block(
                    &mut self.source,
                    &mut self.current_block,
                    self.block_size,
                    &self.label,
                )
                .map_err(|err| self.io_error(err))
            }
        }
    }

    /// Serves a consume request larger than the rest of the current block.
    fn consume_spanning(&mut self, n: usize) -> Result<Vec<u8>> {
        let start = self.current_offset();
        // `n` may be far larger than what the source holds
        let mut assembled = Vec::with_capacity(n.min(self.available() + self.block_size));
        assembled.extend_from_slice(&self.current_block[self.cursor..]);

        loop {
            self.lookahead_complete = false;
            let mut block = match self.lookahead.take() {
                Some(block) => {
                    trace!(label = %self.label, len = block.len(), "absorbed lookahead block");
                    block
                }
                None => {
                    let mut block = Vec::new();
                    if let Err(err) =
                        fill_block(&mut self.source, &mut block, self.block_size, &self.label)
                    {
                        assembled.extend_from_slice(&block);
                        self.retain_unconsumed(assembled);
                        return Err(self.io_error(err));
                    }
                    block
                }
            };

            if block.is_empty() {
                let available = assembled.len();
                self.retain_unconsumed(assembled);
                return Err(self.end_of_stream(n, available));
            }

            let remaining = n - assembled.len();
            if remaining <= block.len() {
                assembled.extend(block.drain(..remaining));
                self.current_block = block;
                self.cursor = 0;
                self.consumed_before_block = start + n as u64;
                return Ok(assembled);
            }

            assembled.extend_from_slice(&block);
        }
    }

    /// Makes `bytes` the current block, starting at the current logical offset.
    ///
    /// Used when a spanning consume fails after it already pulled data.
    fn retain_unconsumed(&mut self, bytes: Vec<u8>) {
        self.consumed_before_block = self.current_offset();
        self.current_block = bytes;
        self.cursor = 0;
    }

    // -------------------------------------------------------------------------
    // Peek
    // -------------------------------------------------------------------------

    /// Returns the next `n` bytes without advancing.
    ///
    /// If the request runs past the current block and no lookahead block is
    /// pending, exactly one block is prefetched. A lookahead block cut short by
    /// an I/O error is topped up on the next peek that needs it. `n == 0`
    /// returns an empty vector without I/O.
    ///
    /// # Errors
    /// * [ReaderError::LookaheadExceeded] - `n` is larger than the rest of the
    ///   current block plus one block
    /// * [ReaderError::EndOfStream] - Fewer than `n` bytes remain
    /// * [ReaderError::Io] - The source failed
    pub fn peek(&mut self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let available = self.available();
        if n <= available {
            return Ok(self.current_block[self.cursor..self.cursor + n].to_vec());
        }

        let limit = available + self.block_size;
        if n > limit {
            return Err(ReaderError::LookaheadExceeded {
                label: self.label.clone(),
                offset: self.current_offset(),
                requested: n,
                limit,
            });
        }

        let buffered = available + self.lookahead.as_ref().map_or(0, Vec::len);
        if n > buffered && !self.lookahead_complete {
            self.prefetch()?;
        }

        let lookahead = self.lookahead.as_deref().unwrap_or_default();
        if n > available + lookahead.len() {
            // Short complete lookahead block: the source is exhausted
            return Err(self.end_of_stream(n, available + lookahead.len()));
        }

        let mut bytes = Vec::with_capacity(n);
        bytes.extend_from_slice(&self.current_block[self.cursor..]);
        bytes.extend_from_slice(&lookahead[..n - available]);
        Ok(bytes)
    }

    /// Returns the next byte without advancing.
    ///
    /// # Errors
    /// Same as [peek](Self::peek), except that the lookahead limit cannot be hit.
    #[inline]
    pub fn peek_byte(&mut self) -> Result<u8> {
        if let Some(&byte) = self.current_block.get(self.cursor) {
            return Ok(byte);
        }
        Ok(self.peek(1)?[0])
    }

    /// Reads one block from the source into the lookahead slot, or tops up a
    /// lookahead block that an earlier I/O error cut short.
    fn prefetch(&mut self) -> Result<()> {
        let mut block = self.lookahead.take().unwrap_or_default();
        let result = fill_block(&mut self.source, &mut block, self.block_size, &self.label);
        self.lookahead_complete = result.is_ok() && !block.is_empty();
        if !block.is_empty() {
            trace!(label = %self.label, len = block.len(), "prefetched lookahead block");
            self.lookahead = Some(block);
        }
        result.map_err(|err| self.io_error(err))
    }

    /// Whether no further byte can be consumed.
    ///
    /// May prefetch a lookahead block, like `peek(1)`.
    ///
    /// # Errors
    /// Returns [ReaderError::Io] if the source failed.
    pub fn is_eof(&mut self) -> Result<bool> {
        match self.peek_byte() {
            Ok(_) => Ok(false),
            Err(err) if err.is_end_of_stream() => Ok(true),
            Err(err) => Err(err),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Number of bytes requested from the source per raw read.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Label identifying the source.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a block prefetched by peek is waiting to be consumed.
    pub fn has_lookahead(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Number of bytes buffered but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.available() + self.lookahead.as_ref().map_or(0, Vec::len)
    }

    /// Reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutable reference to the underlying source.
    ///
    /// Reading from or seeking the source directly desynchronizes it from the
    /// buffers; call [reset](Self::reset) afterwards.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    #[inline(always)]
    fn available(&self) -> usize {
        self.current_block.len() - self.cursor
    }

    fn end_of_stream(&self, requested: usize, available: usize) -> ReaderError {
        ReaderError::EndOfStream {
            label: self.label.clone(),
            offset: self.current_offset(),
            requested,
            available,
        }
    }

    fn io_error(&self, err: io::Error) -> ReaderError {
        ReaderError::io(&self.label, err)
    }
}

impl<S: ByteSource> fmt::Debug for PeekReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeekReader")
            .field("label", &self.label)
            .field("block_size", &self.block_size)
            .field("offset", &self.current_offset())
            .field("buffered", &self.buffered())
            .field("lookahead", &self.has_lookahead())
            .finish()
    }
}

/// Appends bytes from `source` to `block` until it holds `block_size` bytes.
///
/// Keeps reading until the block is full or the source reports end of data,
/// so a short block after `Ok` means the source is exhausted. On error `block`
/// holds the bytes read before the failure.
fn fill_block<S: ByteSource>(
    source: &mut S,
    block: &mut Vec<u8>,
    block_size: usize,
    label: &str,
) -> io::Result<()> {
    let mut filled = block.len().min(block_size);
    block.resize(block_size, 0);

    let result = loop {
        if filled == block_size {
            break Ok(());
        }
        match source.read_some(&mut block[filled..]) {
            Ok(0) => break Ok(()),
            Ok(k) => filled += k,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => break Err(err),
        }
    };

    block.truncate(filled);
    trace!(label, block_size, len = filled, "read block");
    result
}
