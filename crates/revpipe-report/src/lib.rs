//! Tabular sink for the partner revenue pipeline.

pub mod writer;

pub use writer::{write_sheet, WriteMode};
