//! Enrichment engine for partner revenue extracts.
//!
//! The engine is a sequence of declarative, lookup-driven record
//! transformation stages composed per partner into a deterministic
//! pipeline:
//!
//! - **normalize**: join-key canonicalization shared by every matcher
//! - **aggregate**: line-level rows collapsed into order-level records
//! - **matcher**: generic ordered cascading match against a lookup table
//! - **stages**: partner-parameterized business rules built on the matcher
//! - **runner**: the generic executor threading a DataFrame through an
//!   ordered stage plan, finishing with column projection
//!
//! Stages see external reference data only through the
//! [`context::LookupSource`] trait; file loading lives elsewhere.

pub mod aggregate;
pub mod columns;
pub mod context;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod project;
pub mod runner;
pub mod stages;

pub use context::{LookupSource, MemoryLookups, StageContext};
pub use error::{Result, TransformError};
pub use normalize::normalize_key;
pub use project::project;
pub use runner::execute_plan;
