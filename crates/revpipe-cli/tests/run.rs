//! End-to-end partner runs over on-disk fixtures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use revpipe_cli::commands::{run_partner_at, RunOptions};
use revpipe_model::Partner;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn options(data_dir: &Path) -> RunOptions {
    RunOptions {
        data_dir: data_dir.to_path_buf(),
        lookup_dir: None,
        output_dir: None,
        dry_run: false,
    }
}

/// Parse a written sheet into per-column value vectors.
fn read_sheet(path: &Path) -> HashMap<String, Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let mut columns: HashMap<String, Vec<String>> =
        headers.iter().map(|name| (name.clone(), Vec::new())).collect();
    for record in reader.records() {
        let record = record.unwrap();
        for (name, value) in headers.iter().zip(record.iter()) {
            columns.get_mut(name).unwrap().push(value.to_string());
        }
    }
    columns
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn houston_run_projects_the_raw_extract() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("houston/raw/Houston Revenue.csv"),
        "Business Unit,Job #,Order #,Issue Date,Revenue,Section\n\
         Print,J1,O1,2025-01-05,12.5,News\n\
         Print,J2,O2,2025-01-06,3,Sports\n",
    );
    let result = run_partner_at(Partner::Houston, &options(dir.path()), today()).unwrap();
    assert_eq!(result.rows_in, 2);
    assert_eq!(result.rows_out, 2);
    assert!(result.reports.is_empty());

    let sheet = read_sheet(result.output_path.as_deref().unwrap());
    // Projection keeps only columns the raw extract actually has, in the
    // configured order; unknown dashboard columns are silently dropped.
    assert!(sheet.contains_key("Job #"));
    assert!(sheet.contains_key("Revenue"));
    assert!(!sheet.contains_key("Parent Account"));
    assert_eq!(sheet["Order #"], vec!["O1", "O2"]);
}

#[test]
fn hearst_run_enriches_aggregates_and_writes_the_sisense_sheet() {
    let dir = tempfile::tempdir().unwrap();

    write(
        &dir.path().join("hearst/raw/Hearst Files/Raw.csv"),
        "Year,Period #,Job Number,Child Acct #,Inches,Ad Type,Section,Class Code,\
         WoRev Bill Cycle,Child Acct Name,First Issue Date,Full Name LF,\
         Business Unit GL,GL_LOB_L1,Pub,Revenue\n\
         2025,1,100,C1,1.5,Retail,News,X,M,Acme Co,2025-01-05,\"Smith, Bob\",GL1,L1,Times,10\n\
         2025,1,100,C1,2.0,Retail,News,X,M,Acme Co,2025-01-05,\"Smith, Bob\",GL1,L1,Times,5\n\
         2025,2,200,C2,1.0,Legal Notice,News,Y,M,Beta LLC,2025-02-01,\"Assigned, Not\",GL1,L1,Times,7\n",
    );
    write(
        &dir
            .path()
            .join("hearst/raw/Hearst Files/Hearst Pub Market List.csv"),
        "Pub,Market\nTimes,TX\n",
    );
    write(
        &dir
            .path()
            .join("lookups/MSP Agent Lookup/All Rep Names.csv"),
        "System(s),Agent Names\nHearst,\"Smith, Bob\"\nHearst,\"Wave2, Wave2\"\n",
    );
    write(
        &dir
            .path()
            .join("lookups/MSP Not Assigned/Not Assigned Reference List.csv"),
        "Job #,MSP Agent\n200,\"Lee, Ann\"\n",
    );
    write(
        &dir
            .path()
            .join("lookups/Strategic Accounts/Strategic Account List.csv"),
        "Company,Account Number,Complete Name,Strategic End Date\n\
         Hearst Newspapers,C1,Acme Co,2025-03-01\n",
    );
    write(
        &dir.path().join("lookups/Strategic Orders.csv"),
        "Company,Order Number\nHearst Newspapers,200\n",
    );
    write(
        &dir
            .path()
            .join("lookups/Welcome Back/Welcome Back List.csv"),
        "Company,Order Number,Welcome Back End Date\nHearst,100,2025-06-01\n",
    );
    write(
        &dir.path().join("lookups/Revenue Date Calendar.csv"),
        "Period,Hearst Revenue Date\n1,2024-01-15\n2,2024-02-15\n",
    );

    let result = run_partner_at(Partner::Hearst, &options(dir.path()), today()).unwrap();
    assert_eq!(result.rows_in, 3);
    assert_eq!(result.rows_out, 2);

    let sheet = read_sheet(result.output_path.as_deref().unwrap());
    // Two line-level rows collapse into the TX100 order.
    assert_eq!(sheet["Sum of 'Revenue'"], vec!["15", "7"]);
    assert_eq!(sheet["Count of matches"], vec!["2", "1"]);
    // The swap leaves the market-prefixed key under Job Number.
    assert_eq!(sheet["Job Number"], vec!["TX100", "TX200"]);
    assert_eq!(sheet["Job Number +"], vec!["100", "200"]);
    // Roster tags the assigned rep; the reference list resolves the
    // unassigned row by job number.
    assert_eq!(sheet["Full Name LF"], vec!["Smith, Bob", "Lee, Ann"]);
    assert_eq!(sheet["MSP/non-MSP"], vec!["MSP", "MSP"]);
    // Row 1 verifies by account date; row 2 is legal (never strategic by
    // date) but its order number is force-listed.
    assert_eq!(sheet["Verified Strategic"], vec!["1", "1"]);
    assert_eq!(sheet["Welcome Back"], vec!["1", "0"]);
    // Calendar dates carry the current year in M/D/YY form.
    assert_eq!(sheet["Revenue Date"], vec!["1/15/25", "2/15/25"]);
    // Dashboard columns with no source data are dropped by projection.
    assert!(!sheet.contains_key("Commission Rep"));
}
