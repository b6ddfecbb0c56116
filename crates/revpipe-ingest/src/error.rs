use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source file not found: {0}")]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataframe error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
