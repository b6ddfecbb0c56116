//! Data model for the partner revenue pipeline.
//!
//! This crate holds the declarative description of a partner pipeline
//! (ordered stage descriptors with bound parameters), the partner
//! identities, column type hints for ingestion, and the diagnostics
//! types stages report back. It is deliberately dependency-light so the
//! engine, ingest, and CLI crates can all share it.

pub mod catalog;
pub mod diagnostics;
pub mod hints;
pub mod partner;
pub mod plan;

pub use catalog::ColumnCatalog;
pub use diagnostics::{MatchDiagnostics, MatchPass, StageReport};
pub use hints::{ColumnHint, ColumnKind};
pub use partner::Partner;
pub use plan::{
    AggregateSpec, CalendarSpec, ClassCategorySpec, DuplicatePolicy, ImmigrationSpec, KeyPair,
    LookupRef, MarketKeySpec, PartnerPlan, ReferenceSpec, RevenueDateMode, RevenueDateSpec,
    RosterSpec, StageSpec, StrategicOrdersSpec, StrategicSpec, SwapSpec, WelcomeBackSpec,
    STRATEGIC_AGENT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_round_trips_through_json() {
        let plan = PartnerPlan {
            partner: Partner::Hearst,
            stages: vec![
                StageSpec::Aggregate(AggregateSpec {
                    group_column: "Job Number +".to_string(),
                    derive_group_from: None,
                    money_column: "Sum of 'Revenue'".to_string(),
                    money_source: "Revenue".to_string(),
                    count_column: "Count of matches".to_string(),
                    drop_zero: true,
                }),
                StageSpec::WelcomeBack(WelcomeBackSpec {
                    lookup: LookupRef::sheet("Welcome Back", "Welcome Back List"),
                    order_column: "Job Number +".to_string(),
                    record_date_column: "First Issue Date".to_string(),
                    lookup_order_column: "Order Number".to_string(),
                    company_column: "Company".to_string(),
                    lookup_date_column: "Welcome Back End Date".to_string(),
                    output_column: "Welcome Back".to_string(),
                }),
            ],
            output_columns: vec!["Job Number +".to_string(), "Welcome Back".to_string()],
        };
        let json = serde_json::to_string(&plan).expect("serialize plan");
        let round: PartnerPlan = serde_json::from_str(&json).expect("deserialize plan");
        assert_eq!(round.partner, Partner::Hearst);
        assert_eq!(round.stages.len(), 2);
        assert_eq!(round.stage_names(), vec!["aggregate", "welcome_back"]);
    }

    #[test]
    fn partner_names() {
        assert_eq!(Partner::Boston.name(), "Boston");
        assert_eq!(Partner::Pittsburgh.slug(), "pittsburgh");
        assert_eq!(Partner::ALL.len(), 4);
    }
}
