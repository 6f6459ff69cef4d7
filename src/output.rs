//! Output module
//!
//! Renders result pages, record detail views and facet listings to the
//! terminal, and exports filtered results to CSV or JSON files.

use crate::facets::{fixed_options, Facets};
use crate::page::Page;
use crate::record::{Field, Record, TagCategory};
use clap::ValueEnum;
use colored::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for export files (1MB)
const EXPORT_BUFFER_SIZE: usize = 1024 * 1024;

/// Characters of the summary shown on a result card
const SUMMARY_EXCERPT: usize = 160;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Buffered export file writer
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: u64,
}

impl OutputWriter {
    /// Create a new output writer, truncating any existing file
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            ensure_output_dir(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| anyhow::anyhow!("Cannot create export file {:?}: {}", path, e))?;

        Ok(Self {
            writer: BufWriter::with_capacity(EXPORT_BUFFER_SIZE, file),
            path,
            records_written: 0,
        })
    }

    /// Write records in the given format and flush
    pub fn export(&mut self, records: &[&Record], format: ExportFormat) -> anyhow::Result<()> {
        log::debug!("Exporting {} records as {:?} to {:?}", records.len(), format, self.path);
        match format {
            ExportFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(&mut self.writer);
                for record in records {
                    csv_writer.serialize(record)?;
                }
                csv_writer.flush()?;
            }
            ExportFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, records)?;
                writeln!(self.writer)?;
            }
        }

        self.records_written += records.len() as u64;
        self.flush()
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// "Showing X - Y of N regulations"
pub fn summary_line(page: &Page) -> String {
    format!(
        "Showing {} - {} of {} regulation{}",
        page.first_item(),
        page.last_item(),
        page.total_items,
        if page.total_items == 1 { "" } else { "s" }
    )
}

/// Cut text to `max` characters on a char boundary, marking the cut
pub fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

/// Print one page of results
pub fn print_page(records: &[&Record], page: &Page) {
    println!();
    println!("  {}", summary_line(page).bold());
    if page.total_pages > 1 {
        println!(
            "  {}",
            format!("Page {} of {}", page.number, page.total_pages).bright_black()
        );
    }

    for record in page.slice(records) {
        print_card(record);
    }

    if page.has_next() {
        println!();
        println!(
            "  {} {}",
            "→".green(),
            format!("use --page {} for more", page.number + 1).bright_black()
        );
    }
}

fn print_card(record: &Record) {
    println!();
    println!("  {} {}", "■".green(), record.name.bold());
    println!("    {}", record.meta_id.bright_black());

    let location: Vec<&str> = [record.country.as_str(), record.region.as_str()]
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect();
    if !location.is_empty() {
        println!("    {} {}", "Jurisdiction:".cyan(), location.join(", "));
    }
    if !record.authority.is_empty() {
        println!("    {} {}", "Authority:   ".cyan(), record.authority);
    }
    if !record.obligation.is_empty() {
        println!("    {} {}", "Obligation:  ".cyan(), record.obligation);
    }
    if !record.summary.is_empty() {
        println!("    {}", excerpt(&record.summary, SUMMARY_EXCERPT));
    }
}

const OVERVIEW: [Field; 11] = [
    Field::MetaId,
    Field::Alias,
    Field::Authority,
    Field::Country,
    Field::CountryCode,
    Field::Region,
    Field::Obligation,
    Field::Applicability,
    Field::SourceUrl,
    Field::Summary,
    Field::Conditions,
];

const THRESHOLDS: [Field; 9] = [
    Field::EmployeeCount,
    Field::Currency,
    Field::Turnover,
    Field::BalanceSheetCurrency,
    Field::BalanceSheet,
    Field::PublicPrivate,
    Field::Aum,
    Field::NonEuApplies,
    Field::Penalties,
];

const TIMELINE: [Field; 6] = [
    Field::PublicationDate,
    Field::EntryIntoForce,
    Field::CurrentStage,
    Field::ApplicabilityDate,
    Field::FirstReportingExpected,
    Field::LastUpdated,
];

const RELATIONSHIPS: [Field; 3] = [
    Field::ParentRegulation,
    Field::RelationshipType,
    Field::SubjectTagging,
];

/// Print the full detail view of one record
pub fn print_detail(record: &Record) {
    println!();
    println!("{}", "═".repeat(60).green());
    println!("  {}", record.name.green().bold());
    println!("{}", "═".repeat(60).green());

    print_section(record, "Overview", &OVERVIEW);
    print_section(record, "Applicability thresholds", &THRESHOLDS);
    print_section(record, "Timeline", &TIMELINE);
    print_section(record, "Relationships", &RELATIONSHIPS);

    let tags = record.subject_tags();
    if !tags.is_empty() {
        println!("\n  {}", "ESG subjects".green().bold());
        for category in TagCategory::ALL {
            let labels: Vec<&str> = tags
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, label)| *label)
                .collect();
            if !labels.is_empty() {
                println!("    {:<14} {}", format!("{}:", category).cyan(), labels.join(" · "));
            }
        }
    }

    let sectors = record.sectors();
    if !sectors.is_empty() {
        println!("\n  {}", "Sectors".green().bold());
        for sector in sectors {
            println!("    {} {}", "•".green(), sector);
        }
    }

    let related = record.related_regulations();
    if !related.is_empty() {
        println!("\n  {}", "Related regulations".green().bold());
        for name in related {
            println!("    {} {}", "→".green(), name);
        }
    }
    println!();
}

fn print_section(record: &Record, title: &str, fields: &[Field]) {
    let populated: Vec<(Field, &str)> = fields
        .iter()
        .map(|&field| (field, record.get(field)))
        .filter(|(_, value)| !value.is_empty())
        .collect();
    if populated.is_empty() {
        return;
    }

    println!("\n  {}", title.green().bold());
    for (field, value) in populated {
        println!("    {:<26} {}", format!("{}:", field.label()).cyan(), value);
    }
}

/// Print the option lists collected from the dataset
pub fn print_facets(facets: &Facets) {
    for (label, facet) in facets.labelled() {
        if facet.is_empty() {
            continue;
        }
        println!("\n  {} {}", label.green().bold(), format!("({})", facet.len()).bright_black());
        for (value, count) in &facet.values {
            println!("    {} {} {}", "•".green(), value, format!("({})", count).bright_black());
        }
    }

    println!("\n  {}", "Fixed options".green().bold());
    for (label, options) in fixed_options() {
        println!("    {:<14} {}", format!("{}:", label).cyan(), options.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Record> {
        vec![
            Record {
                meta_id: "reg/001".to_string(),
                name: "Climate Act, 2021".to_string(),
                summary: "Says \"disclose\"".to_string(),
                ..Default::default()
            },
            Record {
                meta_id: "reg/002".to_string(),
                name: "Board Code".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_export_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("results.csv");
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();

        let mut writer = OutputWriter::new(path.clone()).unwrap();
        writer.export(&refs, ExportFormat::Csv).unwrap();
        assert_eq!(writer.records_written(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("metaId,countryCode,name,regulationAlias,"));
        assert!(header.ends_with(",lastUpdated"));
        assert!(content.contains("\"Climate Act, 2021\""));
        assert!(content.contains("\"Says \"\"disclose\"\"\""));
    }

    #[test]
    fn test_export_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.json");
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();

        let mut writer = OutputWriter::new(path.clone()).unwrap();
        writer.export(&refs, ExportFormat::Json).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["metaId"], "reg/002");
        assert_eq!(value[0]["regulationAlias"], "");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.CSV")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("a.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("a.txt")), None);
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(&Page::new(120, 2, 50)), "Showing 51 - 100 of 120 regulations");
        assert_eq!(summary_line(&Page::new(1, 1, 50)), "Showing 1 - 1 of 1 regulation");
        assert_eq!(summary_line(&Page::new(0, 1, 50)), "Showing 0 - 0 of 0 regulations");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("Énergie renouvelable", 7), "Énergie…");
    }
}
