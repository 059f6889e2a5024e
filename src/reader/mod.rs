//! The block-buffered peekable reader and its builder.
pub mod builder;
pub mod peek_reader;

pub use builder::PeekReaderBuilder;
pub use peek_reader::{DEFAULT_BLOCK_SIZE, PeekReader};
