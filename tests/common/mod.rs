#![allow(dead_code)]

use bytestream::source::ByteSource;
use std::io::{self, Cursor, Read};

/// Raw operations observed by a [RecordingSource].
#[derive(Debug, Clone, PartialEq)]
pub enum RawOp {
    Read { requested: usize, got: usize },
    Seek(u64),
}

/// Source over in-memory data that records every raw call.
pub struct RecordingSource {
    inner: Cursor<Vec<u8>>,
    pub ops: Vec<RawOp>,
}

impl RecordingSource {
    pub fn new(data: &[u8]) -> Self {
        Self {
            inner: Cursor::new(data.to_vec()),
            ops: Vec::new(),
        }
    }

    pub fn reads(&self) -> Vec<(usize, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RawOp::Read { requested, got } => Some((*requested, *got)),
                RawOp::Seek(_) => None,
            })
            .collect()
    }

    pub fn seeks(&self) -> Vec<u64> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RawOp::Seek(offset) => Some(*offset),
                RawOp::Read { .. } => None,
            })
            .collect()
    }
}

impl ByteSource for RecordingSource {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let got = self.inner.read(buf)?;
        self.ops.push(RawOp::Read {
            requested: buf.len(),
            got,
        });
        Ok(got)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.ops.push(RawOp::Seek(offset));
        self.inner.set_position(offset);
        Ok(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.inner.position())
    }
}

/// Source that hands out at most `chunk` bytes per read call and is
/// interrupted before every other call.
pub struct TricklingSource {
    inner: Cursor<Vec<u8>>,
    chunk: usize,
    interrupt_next: bool,
}

impl TricklingSource {
    pub fn new(data: &[u8], chunk: usize) -> Self {
        Self {
            inner: Cursor::new(data.to_vec()),
            chunk,
            interrupt_next: true,
        }
    }
}

impl ByteSource for TricklingSource {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.interrupt_next = true;
        let k = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..k])
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.inner.set_position(offset);
        Ok(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.inner.position())
    }
}

/// Source that serves `good` bytes and then fails every read.
pub struct FailingSource {
    inner: Cursor<Vec<u8>>,
    good: u64,
    pub fail_seek: bool,
    pub fail_close: bool,
}

impl FailingSource {
    pub fn new(data: &[u8], good: u64) -> Self {
        Self {
            inner: Cursor::new(data.to_vec()),
            good,
            fail_seek: false,
            fail_close: false,
        }
    }
}

impl ByteSource for FailingSource {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let left = self.good.saturating_sub(self.inner.position());
        if left == 0 {
            return Err(io::Error::other("device error"));
        }
        let k = buf.len().min(left as usize);
        self.inner.read(&mut buf[..k])
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        if self.fail_seek {
            return Err(io::Error::other("seek refused"));
        }
        self.inner.set_position(offset);
        Ok(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.inner.position())
    }

    fn close(self) -> io::Result<()> {
        if self.fail_close {
            return Err(io::Error::other("close refused"));
        }
        Ok(())
    }
}

/// Deterministic test data of `len` bytes.
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Source that serves at most `chunk` bytes per read and fails once when
/// its raw position reaches `fail_at`.
pub struct HiccupSource {
    inner: Cursor<Vec<u8>>,
    chunk: usize,
    fail_at: Option<u64>,
}

impl HiccupSource {
    pub fn new(data: &[u8], chunk: usize, fail_at: u64) -> Self {
        Self {
            inner: Cursor::new(data.to_vec()),
            chunk,
            fail_at: Some(fail_at),
        }
    }
}

impl ByteSource for HiccupSource {
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_at == Some(self.inner.position()) {
            self.fail_at = None;
            return Err(io::Error::other("transient"));
        }
        let k = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..k])
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.inner.set_position(offset);
        Ok(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.inner.position())
    }
}
