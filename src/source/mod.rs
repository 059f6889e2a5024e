//! Byte sources the reader can buffer.
pub mod byte_source;
pub mod in_memory_source;

pub use byte_source::ByteSource;
pub use in_memory_source::InMemorySource;
