use thiserror::Error;

/// Structural failures abort the run; data-quality issues never appear
/// here — they surface as stage-report warnings instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required column is absent. Invalidates every downstream stage,
    /// so the run fails immediately.
    #[error("missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// The partner-filtered lookup has no usable rows. Indicates a
    /// configuration or data problem that cannot be guessed around.
    #[error("lookup '{lookup_name}' has no usable rows for partner '{partner}'")]
    LookupEmpty { lookup_name: String, partner: String },

    /// The lookup provider failed to produce a table.
    #[error("lookup source: {0}")]
    Source(String),

    #[error("dataframe error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

impl TransformError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        TransformError::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn lookup_empty(source: impl Into<String>, partner: impl Into<String>) -> Self {
        TransformError::LookupEmpty {
            lookup_name: source.into(),
            partner: partner.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
