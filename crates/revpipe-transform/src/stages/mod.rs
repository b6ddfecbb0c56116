//! Partner-parameterized tagging stages.
//!
//! Each stage is a pure function from (record table, partner, lookup
//! source) to a new record table plus a [`StageReport`]; no stage
//! retains state across calls.

mod immigration;
mod market;
mod msp;
mod revenue_date;
mod strategic;
mod welcome_back;

use polars::prelude::DataFrame;

use revpipe_model::{StageReport, StageSpec};

use crate::context::StageContext;
use crate::error::Result;

pub use immigration::resolve_immigration_flags;
pub use market::{derive_market_key, swap_column_pair};
pub use msp::{classify_sections, enrich_msp_reference, tag_msp_roster};
pub use revenue_date::assign_revenue_date;
pub use strategic::{enforce_strategic_orders, tag_strategic};
pub use welcome_back::tag_welcome_back;

/// Run one stage described by its descriptor.
pub fn run_stage(
    df: &DataFrame,
    spec: &StageSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    match spec {
        StageSpec::MarketKey(spec) => derive_market_key(df, spec, ctx),
        StageSpec::Aggregate(spec) => {
            let out = crate::aggregate::aggregate(df, spec)?;
            let report = StageReport::new("aggregate", df.height(), out.height());
            Ok((out, report))
        }
        StageSpec::SwapColumns(spec) => swap_column_pair(df, spec),
        StageSpec::MspRoster(spec) => tag_msp_roster(df, spec, ctx),
        StageSpec::MspReference(spec) => enrich_msp_reference(df, spec, ctx),
        StageSpec::Strategic(spec) => tag_strategic(df, spec, ctx),
        StageSpec::StrategicOrders(spec) => enforce_strategic_orders(df, spec, ctx),
        StageSpec::WelcomeBack(spec) => tag_welcome_back(df, spec, ctx),
        StageSpec::RevenueDate(spec) => assign_revenue_date(df, spec, ctx),
        StageSpec::ImmigrationFlags(spec) => resolve_immigration_flags(df, spec, ctx),
        StageSpec::ClassCategory(spec) => classify_sections(df, spec, ctx),
    }
}
