//! End-to-end tests: raw dataset text through parser, filter and pagination

use regulation_explorer::filter::{filter, filter_owned, ExtraJurisdictional, FilterCriteria, MatchMode};
use regulation_explorer::page::{Page, PAGE_SIZE};
use regulation_explorer::parser::{parse, parse_with_stats};
use regulation_explorer::record::Record;

/// Build one 36-column data row from `(column, value)` pairs
fn data_row(values: &[(usize, &str)]) -> String {
    let mut columns = vec![String::new(); 36];
    for &(column, value) in values {
        columns[column] = if value.contains(',') || value.contains('"') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        };
    }
    columns.join(",")
}

fn dataset() -> String {
    let preamble = [
        "ESG Regulations Database,,",
        "Exported 2024-05-01,,",
        "Confidential,,",
        ",Meta ID,Country Code,Name,Alias,Authority",
    ];
    let rows = [
        data_row(&[
            (1, "reg/001"), (2, "FR"), (3, "Climate Disclosure Law"), (5, "AMF"),
            (7, "Europe"), (8, "France"), (9, "Requires \"climate\" reporting, annually"),
            (11, "500"), (13, "40"), (15, "20"), (19, "Yes"), (20, "Mandatory"),
            (22, "Climate Risk;Water"), (25, "15/03/2021"), (32, "Financial Institutions"),
            (33, "Banking;Insurance"), (34, "SFDR; Taxonomy"),
        ]),
        data_row(&[
            (1, "reg/002"), (2, "DE"), (3, "Supply Chain Act"), (5, "BAFA"),
            (7, "Europe"), (8, "Germany"), (11, "1,000"), (19, "No"), (20, "Voluntary"),
            (23, "Human Rights"), (25, "2019-07-01"), (33, "Manufacturing"),
        ]),
        data_row(&[
            (1, "reg/003"), (2, "JP"), (3, "Stewardship Code"), (5, "FSA"),
            (7, "Asia Pacific"), (8, "Japan"), (20, "Comply or Explain"),
            (24, "Board Diversity"), (25, "2010-02-01"), (32, "Asset Owners; Investment Managers"),
        ]),
        "x,xyz/004,US,Not a record".to_string(),
        ",reg/005".to_string(),
        ",,,,".to_string(),
    ];

    let mut text = preamble.join("\r\n");
    text.push_str("\r\n");
    text.push_str(&rows.join("\r\n"));
    text
}

fn ids(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.meta_id.clone()).collect()
}

#[test]
fn parses_dataset_and_drops_non_records() {
    let (records, stats) = parse_with_stats(&dataset());

    assert_eq!(
        records.iter().map(|r| r.meta_id.as_str()).collect::<Vec<_>>(),
        vec!["reg/001", "reg/002", "reg/003"]
    );
    assert_eq!(stats.preamble, 4);
    assert_eq!(stats.invalid_ids, 1);
    assert_eq!(stats.short_rows, 1);
    assert_eq!(records[0].summary, "Requires \"climate\" reporting, annually");
    assert_eq!(records[0].related_regulations(), vec!["SFDR", "Taxonomy"]);
}

#[test]
fn filters_across_groups() {
    let records = parse(&dataset());
    let criteria = FilterCriteria {
        obligations: vec!["Mandatory".to_string(), "Voluntary".to_string()],
        regions: vec!["Europe".to_string()],
        search: "LAW".to_string(),
        ..Default::default()
    };

    assert_eq!(ids(&filter(&records, &criteria)), vec!["reg/001"]);
}

#[test]
fn thresholds_and_extra_jurisdictional() {
    let records = parse(&dataset());

    let small_company = FilterCriteria {
        employee_count: "600".to_string(),
        ..Default::default()
    };
    assert_eq!(ids(&filter(&records, &small_company)), vec!["reg/001", "reg/003"]);

    let no_extra = FilterCriteria {
        extra_jurisdictional: Some(ExtraJurisdictional::No),
        ..Default::default()
    };
    assert_eq!(ids(&filter(&records, &no_extra)), vec!["reg/002", "reg/003"]);
}

#[test]
fn years_tags_and_exact_mode() {
    let records = parse(&dataset());

    let recent = FilterCriteria {
        year_range: (2015, 2024),
        ..Default::default()
    };
    assert_eq!(ids(&filter(&records, &recent)), vec!["reg/001", "reg/002"]);

    let substring = FilterCriteria {
        applicabilities: vec!["Investment".to_string()],
        ..Default::default()
    };
    assert_eq!(ids(&filter(&records, &substring)), vec!["reg/003"]);

    let exact = FilterCriteria {
        match_mode: MatchMode::Exact,
        ..substring.clone()
    };
    assert!(filter(&records, &exact).is_empty());

    let whole_tag = FilterCriteria {
        applicabilities: vec!["Investment Managers".to_string()],
        match_mode: MatchMode::Exact,
        ..Default::default()
    };
    assert_eq!(ids(&filter(&records, &whole_tag)), vec!["reg/003"]);
}

#[test]
fn filtering_is_idempotent_and_order_preserving() {
    let records = parse(&dataset());
    let criteria = FilterCriteria {
        regions: vec!["Europe".to_string(), "Asia Pacific".to_string()],
        ..Default::default()
    };

    let once = filter_owned(records.clone(), &criteria);
    let twice = filter_owned(once.clone(), &criteria);
    assert_eq!(once, twice);
    assert_eq!(once, records);
}

#[test]
fn paginates_filtered_results() {
    let mut text = dataset();
    for i in 0..120 {
        text.push_str(&format!("\n,reg/bulk{:03},XX,Bulk {},,,,Europe", i, i));
    }
    let records = parse(&text);
    let matched = filter(&records, &FilterCriteria {
        regions: vec!["Europe".to_string()],
        ..Default::default()
    });
    assert_eq!(matched.len(), 122);

    let page = Page::new(matched.len(), 3, PAGE_SIZE);
    let shown = page.slice(&matched);
    assert_eq!(page.total_pages, 3);
    assert_eq!(shown.len(), 22);
    assert_eq!(shown[0].meta_id, "reg/bulk098");
}
