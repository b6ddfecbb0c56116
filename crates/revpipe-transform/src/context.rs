//! Stage execution context and the lookup provider seam.

use std::collections::HashMap;

use chrono::NaiveDate;
use polars::prelude::DataFrame;

use revpipe_model::{LookupRef, Partner};

use crate::error::{Result, TransformError};

/// Provider of external reference tables.
///
/// The engine never touches the filesystem; callers supply a source
/// (directory-backed in the CLI, in-memory in tests and embeddings).
pub trait LookupSource {
    fn load(&self, lookup: &LookupRef) -> Result<DataFrame>;
}

/// Everything a stage needs besides the record table itself.
///
/// `today` is injected rather than read from the clock so fixed-mode
/// revenue dates and calendar year replacement are deterministic.
pub struct StageContext<'a> {
    pub partner: Partner,
    pub today: NaiveDate,
    pub lookups: &'a dyn LookupSource,
}

impl<'a> StageContext<'a> {
    pub fn new(partner: Partner, today: NaiveDate, lookups: &'a dyn LookupSource) -> Self {
        Self {
            partner,
            today,
            lookups,
        }
    }
}

/// In-memory lookup source keyed by workbook/sheet.
#[derive(Debug, Default)]
pub struct MemoryLookups {
    tables: HashMap<(String, Option<String>), DataFrame>,
}

impl MemoryLookups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lookup: &LookupRef, table: DataFrame) {
        self.tables
            .insert((lookup.file.clone(), lookup.sheet.clone()), table);
    }
}

impl LookupSource for MemoryLookups {
    fn load(&self, lookup: &LookupRef) -> Result<DataFrame> {
        self.tables
            .get(&(lookup.file.clone(), lookup.sheet.clone()))
            .cloned()
            .ok_or_else(|| TransformError::Source(format!("no table for '{}'", lookup.label())))
    }
}
