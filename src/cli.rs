//! Command-line interface definition for regulation-explorer
//!
//! Provides argument parsing and turns the filter flags into a
//! [`FilterCriteria`] value.

use crate::filter::{default_year_range, parse_year_range, ExtraJurisdictional, FilterCriteria, MatchMode};
use crate::output::ExportFormat;
use crate::page::PAGE_SIZE;
use clap::Parser;
use std::path::PathBuf;

/// Explore a regulations dataset from the command line
///
/// Load a regulations CSV file, filter it across text search, categorical,
/// numeric, tag and date dimensions, and page through or export the results.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "regulation-explorer",
    author = "m0h1nd4",
    version,
    about = "Search and filter regulatory record datasets",
    long_about = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                        REGULATION EXPLORER v1.0.0                            ║
║                  Search and filter regulatory record datasets                ║
╚══════════════════════════════════════════════════════════════════════════════╝

Load a regulations CSV export (4 preamble rows, then one row per record) and
filter it. Selections within one filter are OR'ed, different filters are AND'ed.

EXAMPLES:
    # Everything, first page
    regulation-explorer -i regulations.csv

    # Mandatory European regulations mentioning climate
    regulation-explorer -i regulations.csv -s climate --obligation Mandatory --region Europe

    # Thresholds: regulations that apply to a 250-employee, EUR 40m company
    regulation-explorer -i regulations.csv --employees 250 --turnover 40

    # Tags and publication years
    regulation-explorer -i regulations.csv --environmental "Climate Risk" --years 2015-2024

    # Detail view of one record
    regulation-explorer -i regulations.csv --show reg/0042

    # Export the filtered set
    regulation-explorer -i regulations.csv --region Europe --export europe.json
"#
)]
pub struct Args {
    /// Regulations CSV file
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Free-text search (case-insensitive)
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    pub search: String,

    /// Obligation to include (repeatable)
    #[arg(long = "obligation", value_name = "VALUE")]
    pub obligations: Vec<String>,

    /// Authority to include (repeatable)
    #[arg(long = "authority", value_name = "VALUE")]
    pub authorities: Vec<String>,

    /// Applicability to include (repeatable)
    #[arg(long = "applicability", value_name = "VALUE")]
    pub applicabilities: Vec<String>,

    /// Region to include (repeatable)
    #[arg(long = "region", value_name = "VALUE")]
    pub regions: Vec<String>,

    /// Country to include (repeatable)
    #[arg(long = "country", value_name = "VALUE")]
    pub countries: Vec<String>,

    /// Sector to include (repeatable)
    #[arg(long = "sector", value_name = "VALUE")]
    pub sectors: Vec<String>,

    /// Environmental tag to include (repeatable)
    #[arg(long = "environmental", value_name = "TAG")]
    pub environmental_tags: Vec<String>,

    /// Social tag to include (repeatable)
    #[arg(long = "social", value_name = "TAG")]
    pub social_tags: Vec<String>,

    /// Governance tag to include (repeatable)
    #[arg(long = "governance", value_name = "TAG")]
    pub governance_tags: Vec<String>,

    /// Your employee count; hides regulations with a higher threshold
    #[arg(long, value_name = "NUM", default_value = "")]
    pub employees: String,

    /// Your turnover in millions; hides regulations with a higher threshold
    #[arg(long, value_name = "NUM", default_value = "")]
    pub turnover: String,

    /// Your balance sheet in millions; hides regulations with a higher threshold
    #[arg(long, value_name = "NUM", default_value = "")]
    pub balance_sheet: String,

    /// Extra-jurisdictional impact: yes or no
    #[arg(long, value_name = "YES|NO")]
    pub extra_jurisdictional: Option<String>,

    /// Publication year range, inclusive (default: 1950-current year)
    #[arg(long, value_name = "MIN-MAX")]
    pub years: Option<String>,

    /// Match tags, sectors and applicability as whole entries instead of substrings
    #[arg(long, default_value_t = false)]
    pub exact: bool,

    /// Page of results to show
    #[arg(short, long, value_name = "NUM", default_value_t = 1)]
    pub page: usize,

    /// Results per page
    #[arg(long, value_name = "NUM", default_value_t = PAGE_SIZE)]
    pub page_size: usize,

    /// Show the detail view of the record with this id
    #[arg(long, value_name = "ID")]
    pub show: Option<String>,

    /// List the values available for each filter
    #[arg(long, default_value_t = false)]
    pub facets: bool,

    /// Write every matching record to this file
    #[arg(short, long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Export format (default: from the file extension, else csv)
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Show session statistics
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Build the filter criteria from the filter flags
    pub fn criteria(&self) -> anyhow::Result<FilterCriteria> {
        let extra_jurisdictional = self
            .extra_jurisdictional
            .as_deref()
            .map(str::parse::<ExtraJurisdictional>)
            .transpose()?;

        let year_range = match self.years.as_deref() {
            Some(spec) => parse_year_range(spec)?,
            None => default_year_range(),
        };

        Ok(FilterCriteria {
            search: self.search.clone(),
            obligations: self.obligations.clone(),
            authorities: self.authorities.clone(),
            applicabilities: self.applicabilities.clone(),
            regions: self.regions.clone(),
            countries: self.countries.clone(),
            sectors: self.sectors.clone(),
            environmental_tags: self.environmental_tags.clone(),
            social_tags: self.social_tags.clone(),
            governance_tags: self.governance_tags.clone(),
            employee_count: self.employees.trim().to_string(),
            turnover: self.turnover.trim().to_string(),
            balance_sheet: self.balance_sheet.trim().to_string(),
            extra_jurisdictional,
            year_range,
            match_mode: if self.exact { MatchMode::Exact } else { MatchMode::Parity },
        })
    }

    /// Export format, falling back to the file extension and then CSV
    pub fn export_format(&self) -> ExportFormat {
        self.format
            .or_else(|| self.export.as_deref().and_then(ExportFormat::from_path))
            .unwrap_or(ExportFormat::Csv)
    }
}
