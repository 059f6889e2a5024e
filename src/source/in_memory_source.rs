//! In-memory implementation of byte source.

use crate::source::byte_source::ByteSource;
use std::io;

// =#========================================================================#=
// IN MEMORY SOURCE
// =#========================================================================$=
/// A byte source that owns its data.
///
/// Useful for data that is already in memory, e.g. a decompressed payload
/// that should be handed to a parser expecting a [PeekReader](crate::PeekReader).
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    /// The owned byte data
    input: Vec<u8>,
    /// Raw position, may lie past the end after a seek
    pos: u64,
}

impl InMemorySource {
    /// Creates a new in-memory source from a Vec of bytes.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to serve
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            input: bytes,
            pos: 0,
        }
    }

    /// Creates a new in-memory source by copying a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Total number of bytes held by the source.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the source holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Returns the owned bytes, discarding the position.
    pub fn into_vec(self) -> Vec<u8> {
        self.input
    }
}

impl ByteSource for InMemorySource {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = usize::try_from(self.pos)
            .unwrap_or(usize::MAX)
            .min(self.input.len());
        let end = (start + buf.len()).min(self.input.len());
        let k = end - start;
        buf[..k].copy_from_slice(&self.input[start..end]);
        self.pos += k as u64;
        Ok(k)
    }

    #[inline]
    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.pos = offset;
        Ok(offset)
    }

    #[inline]
    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}

impl From<Vec<u8>> for InMemorySource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}
