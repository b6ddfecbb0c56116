//! Per-partner plan literals: lookup file names, raw column hints,
//! output column lists, and stage ordering.

use revpipe_model::{
    AggregateSpec, CalendarSpec, ClassCategorySpec, ColumnHint, ColumnKind, ImmigrationSpec,
    KeyPair, LookupRef, MarketKeySpec, Partner, PartnerPlan, ReferenceSpec, RevenueDateMode,
    RevenueDateSpec, RosterSpec, StageSpec, StrategicOrdersSpec, StrategicSpec, SwapSpec,
    WelcomeBackSpec,
};

// Shared lookup workbooks.
pub const MSP_AGENT_LOOKUP_FILE: &str = "MSP Agent Lookup";
pub const MSP_AGENT_LOOKUP_SHEET: &str = "All Rep Names";
pub const MSP_NOT_ASSIGNED_FILE: &str = "MSP Not Assigned";
pub const MSP_NOT_ASSIGNED_SHEET: &str = "Not Assigned Reference List";
pub const STRATEGIC_FILE: &str = "Strategic Accounts";
pub const STRATEGIC_SHEET: &str = "Strategic Account List";
pub const STRATEGIC_ORDERS_FILE: &str = "Strategic Orders";
pub const WELCOME_BACK_FILE: &str = "Welcome Back";
pub const WELCOME_BACK_SHEET: &str = "Welcome Back List";
pub const REVENUE_CALENDAR_FILE: &str = "Revenue Date Calendar";

// Partner-specific workbooks.
pub const HEARST_FILE: &str = "Hearst Files";
pub const HEARST_RAW_SHEET: &str = "Raw";
pub const HEARST_MARKET_SHEET: &str = "Hearst Pub Market List";
pub const HEARST_OUTPUT_FILE: &str = "Hearst Sisense";
pub const BOSTON_FILE: &str = "Boston Orders";
pub const BOSTON_IMMIGRATION_FILE: &str = "Immigration Orders";
pub const BOSTON_OUTPUT_FILE: &str = "Boston Processed";
pub const HOUSTON_FILE: &str = "Houston Revenue";
pub const HOUSTON_OUTPUT_FILE: &str = "Houston Processed";
pub const PITTSBURGH_FILE: &str = "Pittsburgh Files";
pub const PITTSBURGH_RAW_SHEET: &str = "Raw";
pub const PITTSBURGH_CLASS_FILE: &str = "Pittsburgh Class Codes";
pub const PITTSBURGH_OUTPUT_FILE: &str = "Pittsburgh Sisense";

const CALENDAR_PERIOD_CANDIDATES: [&str; 4] = ["Period #", "Period", "Period#", "Period Num"];

/// The plan for a partner, stages in execution order.
pub fn plan_for(partner: Partner) -> PartnerPlan {
    match partner {
        Partner::Hearst => hearst_plan(),
        Partner::Boston => boston_plan(),
        Partner::Houston => houston_plan(),
        Partner::Pittsburgh => pittsburgh_plan(),
    }
}

/// Raw sheet location and column hints for a partner's extract.
///
/// Boston arrives as a flat export with no dtype table, so it loads
/// without hints.
pub fn raw_source(partner: Partner) -> (&'static str, Option<&'static str>, Vec<ColumnHint>) {
    match partner {
        Partner::Hearst => (HEARST_FILE, Some(HEARST_RAW_SHEET), hearst_hints()),
        Partner::Boston => (BOSTON_FILE, None, Vec::new()),
        Partner::Houston => (HOUSTON_FILE, None, houston_hints()),
        Partner::Pittsburgh => (
            PITTSBURGH_FILE,
            Some(PITTSBURGH_RAW_SHEET),
            pittsburgh_hints(),
        ),
    }
}

/// Output workbook and sheet for a partner.
pub fn output_target(partner: Partner) -> (&'static str, &'static str) {
    match partner {
        Partner::Hearst => (HEARST_OUTPUT_FILE, "Sisense"),
        Partner::Boston => (BOSTON_OUTPUT_FILE, "Processed"),
        Partner::Houston => (HOUSTON_OUTPUT_FILE, "Processed"),
        Partner::Pittsburgh => (PITTSBURGH_OUTPUT_FILE, "Sisense"),
    }
}

fn strategic_stage(
    keys: Vec<KeyPair>,
    record_date_column: &str,
    output_column: &str,
    exclusion: Option<(&str, &str)>,
    sales_column: Option<&str>,
) -> StageSpec {
    StageSpec::Strategic(StrategicSpec {
        lookup: LookupRef::sheet(STRATEGIC_FILE, STRATEGIC_SHEET),
        keys,
        record_date_column: record_date_column.to_string(),
        lookup_date_column: "Strategic End Date".to_string(),
        company_column: "Company".to_string(),
        output_column: output_column.to_string(),
        exclusion_column: exclusion.map(|(column, _)| column.to_string()),
        exclusion_term: exclusion.map(|(_, term)| term.to_string()),
        sales_column: sales_column.map(String::from),
    })
}

fn strategic_orders_stage(
    order_column: &str,
    flag_column: &str,
    sales_column: Option<&str>,
) -> StageSpec {
    StageSpec::StrategicOrders(StrategicOrdersSpec {
        lookup: LookupRef::flat(STRATEGIC_ORDERS_FILE),
        order_column: order_column.to_string(),
        flag_column: flag_column.to_string(),
        lookup_order_column: "Order Number".to_string(),
        company_column: "Company".to_string(),
        sales_column: sales_column.map(String::from),
    })
}

fn welcome_back_stage(order_column: &str, record_date_column: &str) -> StageSpec {
    StageSpec::WelcomeBack(WelcomeBackSpec {
        lookup: LookupRef::sheet(WELCOME_BACK_FILE, WELCOME_BACK_SHEET),
        order_column: order_column.to_string(),
        record_date_column: record_date_column.to_string(),
        lookup_order_column: "Order Number".to_string(),
        company_column: "Company".to_string(),
        lookup_date_column: "Welcome Back End Date".to_string(),
        output_column: "Welcome Back".to_string(),
    })
}

fn aggregate_stage(derive_group_from: Option<&str>) -> StageSpec {
    StageSpec::Aggregate(AggregateSpec {
        group_column: "Job Number +".to_string(),
        derive_group_from: derive_group_from.map(String::from),
        money_column: "Sum of 'Revenue'".to_string(),
        money_source: "Revenue".to_string(),
        count_column: "Count of matches".to_string(),
        drop_zero: true,
    })
}

fn calendar_revenue_date_stage() -> StageSpec {
    StageSpec::RevenueDate(RevenueDateSpec {
        period_column: "Period #".to_string(),
        output_column: "Revenue Date".to_string(),
        mode: RevenueDateMode::Calendar(CalendarSpec {
            lookup: LookupRef::flat(REVENUE_CALENDAR_FILE),
            period_candidates: CALENDAR_PERIOD_CANDIDATES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }),
    })
}

fn hearst_plan() -> PartnerPlan {
    let stages = vec![
        StageSpec::MarketKey(MarketKeySpec {
            lookup: LookupRef::sheet(HEARST_FILE, HEARST_MARKET_SHEET),
            pub_column: "Pub".to_string(),
            market_column: "Market".to_string(),
            job_column: "Job Number".to_string(),
            output_column: "Job Number +".to_string(),
        }),
        aggregate_stage(None),
        StageSpec::SwapColumns(SwapSpec {
            left: "Job Number +".to_string(),
            right: "Job Number".to_string(),
        }),
        StageSpec::MspRoster(RosterSpec {
            lookup: LookupRef::sheet(MSP_AGENT_LOOKUP_FILE, MSP_AGENT_LOOKUP_SHEET),
            name_column: "Full Name LF".to_string(),
            output_column: "MSP/non-MSP".to_string(),
            system_column: "System(s)".to_string(),
            agent_column: "Agent Names".to_string(),
            excluded_agent: "wave2, wave2".to_string(),
        }),
        StageSpec::MspReference(ReferenceSpec {
            lookup: LookupRef::sheet(MSP_NOT_ASSIGNED_FILE, MSP_NOT_ASSIGNED_SHEET),
            job_columns: vec!["Job Number +".to_string(), "Job Number".to_string()],
            name_column: "Full Name LF".to_string(),
            msp_column: "MSP/non-MSP".to_string(),
            lookup_job_column: "Job #".to_string(),
            lookup_agent_column: "MSP Agent".to_string(),
            unassigned_names: vec!["Assigned, Not".to_string(), "Wave2, Wave2".to_string()],
            fallback_agent: "Wave2, Wave2".to_string(),
            section_column: "Section".to_string(),
            override_section: "Wave2 Death Notices".to_string(),
            allowed_agents: vec![
                "Palmiero, Kristi".to_string(),
                "zzzColello, Barbara".to_string(),
                "zzzCollazo, Maria".to_string(),
                "zzzHenderson, Pam".to_string(),
                "zzzTrapasso, Rose".to_string(),
            ],
        }),
        strategic_stage(
            vec![
                KeyPair::new("Child Acct #", "Account Number"),
                KeyPair::new("Child Acct Name", "Complete Name"),
            ],
            "First Issue Date",
            "Verified Strategic",
            Some(("Ad Type", "legal")),
            None,
        ),
        strategic_orders_stage("Job Number +", "Verified Strategic", None),
        welcome_back_stage("Job Number +", "First Issue Date"),
        calendar_revenue_date_stage(),
    ];
    PartnerPlan {
        partner: Partner::Hearst,
        stages,
        output_columns: hearst_output_columns(),
    }
}

fn boston_plan() -> PartnerPlan {
    let stages = vec![
        StageSpec::ImmigrationFlags(ImmigrationSpec {
            lookup: LookupRef::flat(BOSTON_IMMIGRATION_FILE),
            order_column: "OrderURN".to_string(),
            flag_column: "ImmigrationAD".to_string(),
            lookup_order_column: "Order Number".to_string(),
            lookup_flag_column: "Immigration Order".to_string(),
        }),
        strategic_stage(
            vec![
                KeyPair::new("CustomerURN", "Account Number"),
                KeyPair::new("Customer_Name", "Complete Name"),
            ],
            "Insert_Date",
            "Strategic_Flag",
            None,
            Some("OperatorName"),
        ),
        strategic_orders_stage("OrderURN", "Strategic_Flag", Some("OperatorName")),
    ];
    PartnerPlan {
        partner: Partner::Boston,
        stages,
        output_columns: boston_output_columns(),
    }
}

fn houston_plan() -> PartnerPlan {
    PartnerPlan {
        partner: Partner::Houston,
        stages: Vec::new(),
        output_columns: houston_output_columns(),
    }
}

fn pittsburgh_plan() -> PartnerPlan {
    let stages = vec![
        aggregate_stage(Some("Job Number")),
        strategic_stage(
            vec![
                KeyPair::new("Child Acct #", "Account Number"),
                KeyPair::new("Child Acct Name", "Complete Name"),
            ],
            "First Issue Date",
            "Verified Strategic",
            None,
            None,
        ),
        strategic_orders_stage("Job Number +", "Verified Strategic", None),
        welcome_back_stage("Job Number +", "First Issue Date"),
        StageSpec::ClassCategory(ClassCategorySpec {
            lookup: LookupRef::flat(PITTSBURGH_CLASS_FILE),
            section_column: "Section".to_string(),
            lookup_key_column: "Section".to_string(),
            lookup_value_column: "Ad Category".to_string(),
            output_column: "MSP/non-MSP".to_string(),
            default_category: "Other".to_string(),
        }),
        StageSpec::RevenueDate(RevenueDateSpec {
            period_column: "Period #".to_string(),
            output_column: "Revenue Date".to_string(),
            mode: RevenueDateMode::FixedMonthStart,
        }),
    ];
    PartnerPlan {
        partner: Partner::Pittsburgh,
        stages,
        output_columns: pittsburgh_output_columns(),
    }
}

fn hint(column: &str, kind: ColumnKind) -> ColumnHint {
    ColumnHint::new(column, kind)
}

fn hearst_hints() -> Vec<ColumnHint> {
    vec![
        hint("Year", ColumnKind::Integer),
        hint("Period #", ColumnKind::Integer),
        hint("Job Number", ColumnKind::Integer),
        hint("Child Acct #", ColumnKind::Text),
        hint("Inches", ColumnKind::Real),
        hint("Ad Type", ColumnKind::Text),
        hint("Section", ColumnKind::Text),
        hint("Class Code", ColumnKind::Text),
        hint("WoRev Bill Cycle", ColumnKind::Text),
        hint("Child Acct Name", ColumnKind::Text),
        hint("First Issue Date", ColumnKind::Date),
        hint("Full Name LF", ColumnKind::Text),
        hint("Business Unit GL", ColumnKind::Text),
        hint("GL_LOB_L1", ColumnKind::Text),
        hint("Pub", ColumnKind::Text),
        hint("Revenue", ColumnKind::Real),
    ]
}

fn pittsburgh_hints() -> Vec<ColumnHint> {
    // The Pittsburgh extract mirrors the Hearst raw schema.
    hearst_hints()
}

fn houston_hints() -> Vec<ColumnHint> {
    vec![
        hint("Parent Acct", ColumnKind::Text),
        hint("Parent Acct #", ColumnKind::Real),
        hint("Child Acct", ColumnKind::Text),
        hint("Child Acct #", ColumnKind::Real),
        hint("Business Unit", ColumnKind::Text),
        hint("Job #", ColumnKind::Text),
        hint("Order #", ColumnKind::Text),
        hint("External Order #", ColumnKind::Text),
        hint("Entry Date", ColumnKind::Date),
        hint("Issue Date", ColumnKind::Date),
        hint("Invoice Date", ColumnKind::Date),
        hint("Invoice #", ColumnKind::Text),
        hint("Fiscal Period #", ColumnKind::Real),
        hint("Fiscal Week #", ColumnKind::Real),
        hint("Revenue", ColumnKind::Real),
        hint("Channel Group", ColumnKind::Text),
        hint("Edition Pub", ColumnKind::Text),
        hint("Section", ColumnKind::Text),
        hint("Ad Vertical", ColumnKind::Text),
        hint("Classification", ColumnKind::Text),
        hint("Sales Team Name", ColumnKind::Text),
        hint("Sales Rep", ColumnKind::Text),
        hint("Order Taker", ColumnKind::Text),
    ]
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn hearst_output_columns() -> Vec<String> {
    columns(&[
        "Job Number",
        "Sum of 'Revenue'",
        "Year",
        "Period #",
        "Job Number +",
        "Child Acct #",
        "Inches",
        "Ad Type",
        "Section",
        "Class Code",
        "WoRev Bill Cycle",
        "Child Acct Name",
        "First Issue Date",
        "Full Name LF",
        "Commission Rep",
        "MSP/non-MSP",
        "Business Unit GL",
        "GL_LOB_L1",
        "Pub",
        "Revenue",
        "Count of matches",
        "Verified Strategic",
        "Welcome Back",
        "Renewal",
        "Revenue Date",
        "Wave2 Prior Bill",
    ])
}

fn pittsburgh_output_columns() -> Vec<String> {
    // Pittsburgh reports into the same dashboard layout as Hearst.
    hearst_output_columns()
}

fn boston_output_columns() -> Vec<String> {
    columns(&[
        "OrderURN",
        "CustomerURN",
        "Customer_Number",
        "Customer_Name",
        "Agency_URN",
        "Agency_Number",
        "Agency_Name",
        "TitleType1",
        "Title",
        "PageGroup",
        "Class",
        "Position",
        "Style",
        "Border",
        "FT_Campaign_ID",
        "Insert_Date",
        "Stop_Date",
        "Number_Dates",
        "Size",
        "HJ_Columns",
        "HJ_Depth",
        "HJ_Width",
        "HJ_Lines",
        "Insert_Net_Price",
        "Insert_Gross_Price",
        "Insert_Tax",
        "Insert_Tax_Rate",
        "Row_Net_Price",
        "Row_Gross_Price",
        "Reason_Code",
        "Reason_Description",
        "Ad_Color",
        "PONumber",
        "StyleType",
        "First_Date",
        "Last_Date",
        "Edzone",
        "Invoice_Text",
        "Physical_Inserts",
        "Number_Of_Pages",
        "Advertiser_Type",
        "Create_Time",
        "UpdateTime",
        "Booking_Notes",
        "PackageName",
        "Payment",
        "AdSource",
        "Scrutiny",
        "ImmigrationAD",
        "SummaryClass",
        "External_AD_ID",
        "OrderKeyer",
        "Team_Keyer",
        "OperatorName",
        "Scrutiny_Release_Operator",
        "Team_Name",
        "OrderTaker",
        "Sales_Rep",
        "SRWork_Responsibility",
        "HouseAD",
        "Insert_Text_Version",
        "Contract_ID",
        "Revenue_Date",
        "Strategic_Flag",
    ])
}

fn houston_output_columns() -> Vec<String> {
    columns(&[
        "Parent Account",
        "Parent Acc. #",
        "Child Account",
        "Child Acc. #",
        "Child Account.1",
        "Child Acct #",
        "Business Unit",
        "Job #",
        "Order #",
        "Issue Date",
        "Invoice Date",
        "Invoice #",
        "Revenue",
        "Channel Group",
        "Edition Pub",
        "Fiscal Week #",
        "Section",
        "Ad Vertical",
        "Classification Description",
        "Team Name",
        "Fiscal Period #",
        "Entry Date",
        "Employee Name",
        "NCS ordertaker",
        "iPub Legal ordertaker",
        "iPub Obit ordertaker",
        "RevenueDate",
        "Strategic Flag",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hearst_stage_order_matches_the_pipeline() {
        let plan = plan_for(Partner::Hearst);
        assert_eq!(
            plan.stage_names(),
            vec![
                "market_key",
                "aggregate",
                "swap_columns",
                "msp_roster",
                "msp_reference",
                "strategic",
                "strategic_orders",
                "welcome_back",
                "revenue_date",
            ]
        );
    }

    #[test]
    fn boston_resolves_immigration_before_strategic_tagging() {
        let plan = plan_for(Partner::Boston);
        assert_eq!(
            plan.stage_names(),
            vec!["immigration_flags", "strategic", "strategic_orders"]
        );
    }

    #[test]
    fn houston_is_projection_only() {
        let plan = plan_for(Partner::Houston);
        assert!(plan.stages.is_empty());
        assert!(!plan.output_columns.is_empty());
    }

    #[test]
    fn pittsburgh_uses_fixed_revenue_date() {
        let plan = plan_for(Partner::Pittsburgh);
        assert_eq!(
            plan.stage_names(),
            vec![
                "aggregate",
                "strategic",
                "strategic_orders",
                "welcome_back",
                "class_category",
                "revenue_date",
            ]
        );
        let last = plan.stages.last().unwrap();
        if let StageSpec::RevenueDate(spec) = last {
            assert_eq!(spec.mode, RevenueDateMode::FixedMonthStart);
        } else {
            panic!("expected revenue date stage");
        }
    }

    #[test]
    fn every_partner_has_a_plan_and_raw_source() {
        for partner in Partner::ALL {
            let plan = plan_for(partner);
            assert_eq!(plan.partner, partner);
            assert!(!plan.output_columns.is_empty());
            let (file, _, _) = raw_source(partner);
            assert!(!file.is_empty());
        }
    }
}
