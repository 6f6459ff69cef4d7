//! # Regulation Explorer
//!
//! Load, filter, page through and export a dataset of regulatory records.
//!
//! ## Features
//!
//! - **Delimited-record parser**: quoted fields, doubled-quote escapes, CRLF/LF,
//!   preamble skipping and silent exclusion of rows that are not records
//! - **Filter engine**: free-text search, multi-select categorical filters,
//!   numeric thresholds, tag membership and publication-year ranges
//! - **Encoding detection**: automatic detection and transcoding of the input file
//! - **Pagination, detail view and facets** for the terminal
//! - **Export** of filtered results to CSV or JSON
//!
//! ## Usage
//!
//! ```bash
//! # Mandatory European regulations mentioning climate
//! regulation-explorer -i regulations.csv -s climate --obligation Mandatory --region Europe
//!
//! # Detail view of one record
//! regulation-explorer -i regulations.csv --show reg/0042
//! ```
//!
//! ## Example
//!
//! ```rust
//! use regulation_explorer::filter::{filter, FilterCriteria};
//! use regulation_explorer::parser::parse;
//!
//! let text = "title\nsource\nnotes\n,Meta ID,Code,Name,,,,Region\n,reg/001,FR,Climate Law,,,,Europe\n";
//! let records = parse(text);
//!
//! let criteria = FilterCriteria {
//!     regions: vec!["Europe".to_string()],
//!     ..Default::default()
//! };
//! let matched = filter(&records, &criteria);
//! assert_eq!(matched.len(), 1);
//! ```

pub mod cli;
pub mod encoding;
pub mod explorer;
pub mod facets;
pub mod filter;
pub mod output;
pub mod page;
pub mod parser;
pub mod progress;
pub mod record;

pub use cli::Args;
pub use explorer::{Explorer, ExplorerConfig};
pub use filter::{filter, ExtraJurisdictional, FilterCriteria, MatchMode};
pub use parser::parse;
pub use record::Record;
