//! Explorer session
//!
//! Holds the loaded record set for the lifetime of a session and answers
//! queries against it: filtered pages, detail lookups, facets and exports.

use crate::cli::Args;
use crate::encoding::load_records;
use crate::facets::Facets;
use crate::filter::{filter, FilterCriteria};
use crate::output::{print_detail, print_facets, print_page, ExportFormat, OutputWriter};
use crate::page::Page;
use crate::progress::{create_spinner, print_header, print_info, print_success, print_warning, SessionStats};
use crate::record::Record;

use bytesize::ByteSize;
use colored::*;
use std::path::{Path, PathBuf};

/// Explorer configuration
pub struct ExplorerConfig {
    pub criteria: FilterCriteria,
    pub page: usize,
    pub page_size: usize,
    pub show: Option<String>,
    pub facets: bool,
    pub export: Option<(PathBuf, ExportFormat)>,
    pub quiet: bool,
    pub stats: bool,
}

impl ExplorerConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        Ok(Self {
            criteria: args.criteria()?,
            page: args.page,
            page_size: args.page_size,
            show: args.show.clone(),
            facets: args.facets,
            export: args.export.clone().map(|path| (path, args.export_format())),
            quiet: args.quiet,
            stats: args.stats,
        })
    }
}

/// A loaded dataset
pub struct Explorer {
    records: Vec<Record>,
    stats: SessionStats,
}

impl Explorer {
    /// Wrap an already-parsed record set
    pub fn new(records: Vec<Record>) -> Self {
        let mut stats = SessionStats::new();
        stats.parse.records = records.len();
        Self { records, stats }
    }

    /// Load and parse a dataset file.
    ///
    /// A file that cannot be read leaves the session with no records.
    pub fn load(path: &Path, quiet: bool) -> Self {
        let spinner = create_spinner(&format!("Loading {:?}...", path), quiet);
        let (records, parse) = load_records(path);
        spinner.finish_and_clear();

        let mut stats = SessionStats::new();
        stats.file_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        stats.parse = parse;

        log::info!(
            "Loaded {} records from {:?} ({} rows dropped)",
            records.len(),
            path,
            parse.dropped()
        );

        Self { records, stats }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Records matching `criteria`, in file order
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Record> {
        filter(&self.records, criteria)
    }

    /// Look up a record by id
    pub fn find(&self, meta_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.meta_id == meta_id)
    }

    pub fn facets(&self) -> Facets {
        Facets::from_records(&self.records)
    }

    /// Answer one command-line query
    pub fn run(&mut self, config: &ExplorerConfig) -> anyhow::Result<()> {
        if self.records.is_empty() {
            print_warning("No records loaded");
        } else if !config.quiet {
            print_info(&format!(
                "{} records ({})",
                self.records.len(),
                ByteSize(self.stats.file_bytes)
            ));
        }

        if let Some(ref id) = config.show {
            let record = self
                .find(id)
                .ok_or_else(|| anyhow::anyhow!("No regulation with id '{}'", id))?;
            print_detail(record);
            return Ok(());
        }

        if config.facets {
            print_header("Filter options");
            print_facets(&self.facets());
            return Ok(());
        }

        let matched = filter(&self.records, &config.criteria);
        self.stats.matched = matched.len();

        if !config.quiet {
            let active = config.criteria.active_filter_count();
            if active > 0 {
                print_info(&format!("{} active filter{}", active, if active == 1 { "" } else { "s" }));
            }
        }

        if let Some((ref path, format)) = config.export {
            let written = export_records(&matched, path, format)?;
            self.stats.exported = written;
            if !config.quiet {
                print_success(&format!("Exported {} records to {:?}", written, path));
            }
        } else {
            let page = Page::new(matched.len(), config.page, config.page_size);
            if config.page > page.total_pages.max(1) {
                log::warn!(
                    "Page {} out of range, showing page {}",
                    config.page,
                    page.number
                );
            }
            print_page(&matched, &page);
        }

        if config.stats {
            self.stats.print_summary();
        } else if !config.quiet && matched.is_empty() {
            println!("\n  {}", "No regulations match the current filters".yellow());
        }

        Ok(())
    }
}

/// Export records to a file, returning how many were written
pub fn export_records(records: &[&Record], path: &Path, format: ExportFormat) -> anyhow::Result<u64> {
    let mut writer = OutputWriter::new(path.to_path_buf())?;
    writer.export(records, format)?;
    Ok(writer.records_written())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const DATA: &str = "\
Regulations,,
Exported,2024,
Source,ESG Book,
,Meta ID,Country Code,Name,Alias,Authority,Source,Region,Country
,reg/001,FR,Climate Law,,AMF,,Europe,France
,reg/002,DE,Supply Chain Act,,BAFA,,Europe,Germany
bad,row
,reg/003,JP,Stewardship Code,,FSA,,Asia Pacific,Japan
";

    fn explorer() -> Explorer {
        Explorer::new(crate::parser::parse(DATA))
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", DATA).unwrap();

        let explorer = Explorer::load(file.path(), true);
        assert_eq!(explorer.records().len(), 3);
        assert_eq!(explorer.stats().parse.short_rows, 1);
        assert_eq!(explorer.stats().file_bytes, DATA.len() as u64);
    }

    #[test]
    fn test_load_missing_file_is_empty_session() {
        let explorer = Explorer::load(Path::new("/nonexistent/regulations.csv"), true);
        assert!(explorer.records().is_empty());
        assert!(explorer.filter(&FilterCriteria::default()).is_empty());
    }

    #[test]
    fn test_filter_and_find() {
        let explorer = explorer();
        let criteria = FilterCriteria {
            regions: vec!["Europe".to_string()],
            ..Default::default()
        };

        let ids: Vec<_> = explorer.filter(&criteria).into_iter().map(|r| r.meta_id.as_str()).collect();
        assert_eq!(ids, vec!["reg/001", "reg/002"]);
        assert_eq!(explorer.find("reg/003").map(|r| r.country.as_str()), Some("Japan"));
        assert!(explorer.find("reg/999").is_none());
    }

    #[test]
    fn test_facets_from_session() {
        let facets = explorer().facets();
        assert_eq!(facets.countries.names(), vec!["France", "Germany", "Japan"]);
        assert_eq!(facets.regions.count("Europe"), 2);
    }

    #[test]
    fn test_run_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("europe.json");
        let mut explorer = explorer();
        let config = ExplorerConfig {
            criteria: FilterCriteria {
                regions: vec!["Europe".to_string()],
                ..Default::default()
            },
            page: 1,
            page_size: 50,
            show: None,
            facets: false,
            export: Some((path.clone(), ExportFormat::Json)),
            quiet: true,
            stats: false,
        };

        explorer.run(&config).unwrap();
        assert_eq!(explorer.stats().matched, 2);
        assert_eq!(explorer.stats().exported, 2);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["name"], "Climate Law");
    }

    #[test]
    fn test_run_unknown_detail_id() {
        let mut explorer = explorer();
        let config = ExplorerConfig {
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: 50,
            show: Some("reg/404".to_string()),
            facets: false,
            export: None,
            quiet: true,
            stats: false,
        };

        assert!(explorer.run(&config).is_err());
    }
}
