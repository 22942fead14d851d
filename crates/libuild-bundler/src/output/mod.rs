//! Writing build output to disk.

pub mod writer;

pub use writer::{OutputFile, write_outputs};
