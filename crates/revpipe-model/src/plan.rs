//! Declarative per-partner pipeline plans.
//!
//! A partner pipeline is an ordered list of stage descriptors with bound
//! parameters, interpreted by one generic executor in the transform crate.
//! Keeping the description declarative (rather than one hand-written
//! function per partner) preserves the "stage = pure function over
//! (table, partner, lookup)" contract while eliminating duplication.

use serde::{Deserialize, Serialize};

use crate::partner::Partner;

/// Salesperson sentinel written when an order is forced to strategic
/// handling, in the roster's "Last, First" shape.
pub const STRATEGIC_AGENT: &str = "Strategic, Accounts";

/// A reference to an external lookup table: a workbook name and an
/// optional sheet within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRef {
    pub file: String,
    pub sheet: Option<String>,
}

impl LookupRef {
    pub fn flat(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: None,
        }
    }

    pub fn sheet(file: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: Some(sheet.into()),
        }
    }

    /// Human-readable label for diagnostics and errors.
    pub fn label(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}/{}", self.file, sheet),
            None => self.file.clone(),
        }
    }
}

/// One `(record column, lookup column)` pair of a matching cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub record_column: String,
    pub lookup_column: String,
}

impl KeyPair {
    pub fn new(record_column: impl Into<String>, lookup_column: impl Into<String>) -> Self {
        Self {
            record_column: record_column.into(),
            lookup_column: lookup_column.into(),
        }
    }
}

/// How duplicate normalized keys in a lookup table are resolved.
///
/// The asymmetry is intentional and preserved per stage: account and
/// roster lookups keep the first occurrence, calendar and job-reference
/// lookups keep the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    KeepFirst,
    KeepLast,
}

/// Market enrichment producing the aggregation group key (Hearst).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketKeySpec {
    pub lookup: LookupRef,
    /// Publication column in both the records and the market sheet.
    pub pub_column: String,
    /// Market column in the market sheet; also added to the records.
    pub market_column: String,
    pub job_column: String,
    /// Output group key column: `{market}{job number}`.
    pub output_column: String,
}

/// Line-level rows collapsed into order-level records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub group_column: String,
    /// Copy this column into `group_column` when the latter is absent
    /// (the pass-through-order-id case).
    pub derive_group_from: Option<String>,
    /// Summed money column, derived from `money_source` before grouping.
    pub money_column: String,
    pub money_source: String,
    pub count_column: String,
    /// Drop aggregated rows whose summed money value is exactly zero.
    pub drop_zero: bool,
}

/// Exchange the contents of two columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapSpec {
    pub left: String,
    pub right: String,
}

/// MSP / Non-MSP classification from the agent roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSpec {
    pub lookup: LookupRef,
    /// Salesperson column in the records.
    pub name_column: String,
    pub output_column: String,
    /// Roster column holding the partner system names.
    pub system_column: String,
    pub agent_column: String,
    /// Roster entry excluded regardless of case.
    pub excluded_agent: String,
}

/// Agent resolution for unassigned rows, keyed by job identifier (Hearst).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSpec {
    pub lookup: LookupRef,
    /// Job identifier column candidates, tried in order.
    pub job_columns: Vec<String>,
    pub name_column: String,
    pub msp_column: String,
    pub lookup_job_column: String,
    pub lookup_agent_column: String,
    /// Salesperson values (normalized) that mark a row as unassigned.
    pub unassigned_names: Vec<String>,
    /// Agent written to rows that stay unresolved.
    pub fallback_agent: String,
    pub section_column: String,
    /// Section whose rows are reset to the fallback agent unless the
    /// salesperson is allow-listed. Runs after the job pass.
    pub override_section: String,
    pub allowed_agents: Vec<String>,
}

/// Time-bounded strategic account verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicSpec {
    pub lookup: LookupRef,
    /// Matching cascade, strongest key first.
    pub keys: Vec<KeyPair>,
    pub record_date_column: String,
    pub lookup_date_column: String,
    pub company_column: String,
    pub output_column: String,
    /// Category exclusion: rows whose column contains the term are never
    /// strategic (e.g. legal ads).
    pub exclusion_column: Option<String>,
    pub exclusion_term: Option<String>,
    /// When set, flagged rows get this column overwritten with
    /// [`STRATEGIC_AGENT`].
    pub sales_column: Option<String>,
}

/// Orders that must be strategic regardless of date logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicOrdersSpec {
    pub lookup: LookupRef,
    pub order_column: String,
    pub flag_column: String,
    pub lookup_order_column: String,
    pub company_column: String,
    pub sales_column: Option<String>,
}

/// Time-bounded welcome-back promotion detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeBackSpec {
    pub lookup: LookupRef,
    pub order_column: String,
    pub record_date_column: String,
    pub lookup_order_column: String,
    pub company_column: String,
    pub lookup_date_column: String,
    pub output_column: String,
}

/// Calendar lookup parameters for [`RevenueDateMode::Calendar`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSpec {
    pub lookup: LookupRef,
    /// Period column candidates, tried in order against trimmed headers.
    pub period_candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueDateMode {
    /// First day of the current calendar month.
    FixedMonthStart,
    /// Period lookup against the partner-named calendar column.
    Calendar(CalendarSpec),
}

/// Reporting-period date assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueDateSpec {
    pub period_column: String,
    pub output_column: String,
    pub mode: RevenueDateMode,
}

/// Immigration flag conflict resolution (Boston).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmigrationSpec {
    pub lookup: LookupRef,
    pub order_column: String,
    pub flag_column: String,
    pub lookup_order_column: String,
    pub lookup_flag_column: String,
}

/// Section-to-ad-category classification (Pittsburgh).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCategorySpec {
    pub lookup: LookupRef,
    pub section_column: String,
    pub lookup_key_column: String,
    pub lookup_value_column: String,
    pub output_column: String,
    /// Written when there is no match and no existing value.
    pub default_category: String,
}

/// One enrichment stage with its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageSpec {
    MarketKey(MarketKeySpec),
    Aggregate(AggregateSpec),
    SwapColumns(SwapSpec),
    MspRoster(RosterSpec),
    MspReference(ReferenceSpec),
    Strategic(StrategicSpec),
    StrategicOrders(StrategicOrdersSpec),
    WelcomeBack(WelcomeBackSpec),
    RevenueDate(RevenueDateSpec),
    ImmigrationFlags(ImmigrationSpec),
    ClassCategory(ClassCategorySpec),
}

impl StageSpec {
    /// Stable stage name for logging and reports.
    pub fn name(&self) -> &'static str {
        match self {
            StageSpec::MarketKey(_) => "market_key",
            StageSpec::Aggregate(_) => "aggregate",
            StageSpec::SwapColumns(_) => "swap_columns",
            StageSpec::MspRoster(_) => "msp_roster",
            StageSpec::MspReference(_) => "msp_reference",
            StageSpec::Strategic(_) => "strategic",
            StageSpec::StrategicOrders(_) => "strategic_orders",
            StageSpec::WelcomeBack(_) => "welcome_back",
            StageSpec::RevenueDate(_) => "revenue_date",
            StageSpec::ImmigrationFlags(_) => "immigration_flags",
            StageSpec::ClassCategory(_) => "class_category",
        }
    }
}

/// A partner's full pipeline: ordered stages plus the final projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerPlan {
    pub partner: Partner,
    pub stages: Vec<StageSpec>,
    /// Output column order; columns absent from the final table are
    /// silently dropped.
    pub output_columns: Vec<String>,
}

impl PartnerPlan {
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(StageSpec::name).collect()
    }
}
