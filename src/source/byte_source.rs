//! Byte source abstraction for the reader.
//!
//! This module provides the [ByteSource] trait and its implementations for
//! files and cursors over in-memory data.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the raw primitives a [PeekReader](crate::PeekReader) needs
/// from the data it buffers.
///
/// This trait abstracts over different ways of holding byte data:
/// - Open files (`File`)
/// - Cursors over in-memory buffers (`Cursor<Vec<u8>>`, `Cursor<&[u8]>`)
/// - Owned in-memory data ([InMemorySource](crate::source::InMemorySource))
///
/// Implementations only need to provide single read calls; the reader itself
/// takes care of filling whole blocks.
pub trait ByteSource {
    /// Reads some bytes into `buf`.
    ///
    /// # Returns
    /// * `Ok(0)` - The source is exhausted (or `buf` is empty)
    /// * `Ok(k)` - `k` bytes were written to the front of `buf`
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Moves the raw position to the absolute `offset`.
    ///
    /// # Returns
    /// The new raw position
    fn seek_to(&mut self, offset: u64) -> io::Result<u64>;

    /// Returns the raw position of the source.
    fn tell(&mut self) -> io::Result<u64>;

    /// Releases the source.
    ///
    /// The default simply drops the handle.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl ByteSource for File {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(offset))
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.stream_position()
    }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    #[inline]
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.set_position(offset);
        Ok(offset)
    }

    #[inline]
    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }
}

impl<B: ByteSource> ByteSource for Box<B> {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_some(buf)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        (**self).seek_to(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        (**self).tell()
    }

    fn close(self) -> io::Result<()> {
        (*self).close()
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_source_read_and_seek() {
        let mut source = Cursor::new(b"kakapo".to_vec());
        let mut buf = [0u8; 4];

        assert_eq!(source.read_some(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"kaka");
        assert_eq!(source.tell().unwrap(), 4);

        assert_eq!(source.read_some(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"po");
        assert_eq!(source.read_some(&mut buf).unwrap(), 0);

        assert_eq!(source.seek_to(2).unwrap(), 2);
        assert_eq!(source.read_some(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"kapo");
    }

    #[test]
    fn test_cursor_seek_past_end_reads_nothing() {
        let mut source = Cursor::new(&b"kea"[..]);
        source.seek_to(10).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(source.read_some(&mut buf).unwrap(), 0);
        assert_eq!(source.tell().unwrap(), 10);
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut source: Box<Cursor<Vec<u8>>> = Box::new(Cursor::new(b"tui".to_vec()));
        let mut buf = [0u8; 8];
        assert_eq!(source.read_some(&mut buf).unwrap(), 3);
        assert_eq!(source.tell().unwrap(), 3);
        source.close().unwrap();
    }
}
