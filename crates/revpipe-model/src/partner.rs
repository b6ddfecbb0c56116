//! Partner (media client) identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A media client whose extract has its own raw schema and business rules.
///
/// The partner name is the sole configuration axis threading through every
/// enrichment stage: lookup tables are filtered to rows whose company or
/// system column *contains* this name (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partner {
    Hearst,
    Boston,
    Houston,
    Pittsburgh,
}

impl Partner {
    /// All supported partners, in the order they are listed by the CLI.
    pub const ALL: [Partner; 4] = [
        Partner::Hearst,
        Partner::Boston,
        Partner::Houston,
        Partner::Pittsburgh,
    ];

    /// Display name, as it appears in lookup company/system columns.
    pub fn name(self) -> &'static str {
        match self {
            Partner::Hearst => "Hearst",
            Partner::Boston => "Boston",
            Partner::Houston => "Houston",
            Partner::Pittsburgh => "Pittsburgh",
        }
    }

    /// Lowercase identifier used for data directory names.
    pub fn slug(self) -> &'static str {
        match self {
            Partner::Hearst => "hearst",
            Partner::Boston => "boston",
            Partner::Houston => "houston",
            Partner::Pittsburgh => "pittsburgh",
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
