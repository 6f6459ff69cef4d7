//! Record filtering module
//!
//! Evaluates a [`FilterCriteria`] bundle against the loaded records. A record
//! is kept when it satisfies every active predicate; within a multi-select
//! group any one selected value is enough. Empty groups are inactive.

use crate::record::{split_tags, Record};
use chrono::Datelike;
use std::fmt;
use std::str::FromStr;

/// Lower bound of the default publication year range
pub const DEFAULT_MIN_YEAR: i32 = 1950;

/// Extra-jurisdictional selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraJurisdictional {
    Yes,
    No,
}

impl ExtraJurisdictional {
    fn keyword(self) -> &'static str {
        match self {
            ExtraJurisdictional::Yes => "yes",
            ExtraJurisdictional::No => "no",
        }
    }
}

impl FromStr for ExtraJurisdictional {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(ExtraJurisdictional::Yes),
            "no" | "n" => Ok(ExtraJurisdictional::No),
            _ => Err(CriteriaError::ExtraJurisdictional(s.to_string())),
        }
    }
}

impl fmt::Display for ExtraJurisdictional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtraJurisdictional::Yes => f.write_str("Yes"),
            ExtraJurisdictional::No => f.write_str("No"),
        }
    }
}

/// How tag-like selections are compared against record values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Substring containment against the raw field, and substring matching of
    /// "yes"/"no" for the extra-jurisdictional selector
    #[default]
    Parity,
    /// Selections must equal one `;`-separated entry of the field, and the
    /// extra-jurisdictional field must start with the word "yes"/"no"
    Exact,
}

/// Invalid filter input at the command-line boundary
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("invalid year range '{0}': use MIN-MAX (e.g. 2000-2024)")]
    YearRangeFormat(String),

    #[error("invalid year range: start ({0}) must be <= end ({1})")]
    InvertedYearRange(i32, i32),

    #[error("invalid extra-jurisdictional value '{0}': use yes or no")]
    ExtraJurisdictional(String),
}

/// All filter selections evaluated together
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Free-text search, matched case-insensitively
    pub search: String,
    pub obligations: Vec<String>,
    pub authorities: Vec<String>,
    pub applicabilities: Vec<String>,
    pub regions: Vec<String>,
    pub countries: Vec<String>,
    pub sectors: Vec<String>,
    pub environmental_tags: Vec<String>,
    pub social_tags: Vec<String>,
    pub governance_tags: Vec<String>,
    /// Employee-count threshold as typed; empty means inactive
    pub employee_count: String,
    /// Turnover threshold (millions) as typed; empty means inactive
    pub turnover: String,
    /// Balance-sheet threshold (millions) as typed; empty means inactive
    pub balance_sheet: String,
    pub extra_jurisdictional: Option<ExtraJurisdictional>,
    /// Inclusive publication year range
    pub year_range: (i32, i32),
    pub match_mode: MatchMode,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            obligations: Vec::new(),
            authorities: Vec::new(),
            applicabilities: Vec::new(),
            regions: Vec::new(),
            countries: Vec::new(),
            sectors: Vec::new(),
            environmental_tags: Vec::new(),
            social_tags: Vec::new(),
            governance_tags: Vec::new(),
            employee_count: String::new(),
            turnover: String::new(),
            balance_sheet: String::new(),
            extra_jurisdictional: None,
            year_range: default_year_range(),
            match_mode: MatchMode::default(),
        }
    }
}

/// `[1950, current year]`
pub fn default_year_range() -> (i32, i32) {
    (DEFAULT_MIN_YEAR, chrono::Local::now().year())
}

/// Parse a `MIN-MAX` year range
pub fn parse_year_range(spec: &str) -> Result<(i32, i32), CriteriaError> {
    let (start, end) = spec
        .split_once('-')
        .ok_or_else(|| CriteriaError::YearRangeFormat(spec.to_string()))?;

    let start: i32 = start
        .trim()
        .parse()
        .map_err(|_| CriteriaError::YearRangeFormat(spec.to_string()))?;
    let end: i32 = end
        .trim()
        .parse()
        .map_err(|_| CriteriaError::YearRangeFormat(spec.to_string()))?;

    if start > end {
        return Err(CriteriaError::InvertedYearRange(start, end));
    }

    Ok((start, end))
}

impl FilterCriteria {
    /// Number of active selections, as shown on the filter badge.
    ///
    /// Search text and the year range are not counted.
    pub fn active_filter_count(&self) -> usize {
        let selections = [
            &self.obligations,
            &self.authorities,
            &self.applicabilities,
            &self.regions,
            &self.countries,
            &self.sectors,
            &self.environmental_tags,
            &self.social_tags,
            &self.governance_tags,
        ]
        .iter()
        .map(|group| group.len())
        .sum::<usize>();

        let singles = [
            !self.employee_count.is_empty(),
            !self.turnover.is_empty(),
            !self.balance_sheet.is_empty(),
            self.extra_jurisdictional.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count();

        selections + singles
    }

    /// True when no selection, search text or non-default year range is set
    pub fn is_unfiltered(&self) -> bool {
        self.active_filter_count() == 0
            && self.search.is_empty()
            && self.year_range == default_year_range()
    }

    /// Check whether a record satisfies every active predicate
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record)
            && matches_exact(&self.obligations, &record.obligation)
            && matches_exact(&self.authorities, &record.authority)
            && matches_exact(&self.regions, &record.region)
            && matches_exact(&self.countries, &record.country)
            && self.matches_tags(&self.applicabilities, &record.applicability)
            && within_threshold(&self.employee_count, &record.employee_count, NumberKind::Integer)
            && within_threshold(&self.turnover, &record.turnover, NumberKind::Decimal)
            && within_threshold(&self.balance_sheet, &record.balance_sheet, NumberKind::Decimal)
            && self.matches_extra_jurisdictional(&record.non_eu_applies)
            && self.matches_year(record)
            && self.matches_tags(&self.environmental_tags, &record.environmental)
            && self.matches_tags(&self.social_tags, &record.social)
            && self.matches_tags(&self.governance_tags, &record.governance)
            && self.matches_tags(&self.sectors, &record.sector)
    }

    fn matches_search(&self, record: &Record) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let term = self.search.trim().to_lowercase();
        let haystack = [
            record.meta_id.as_str(),
            record.name.as_str(),
            record.alias.as_str(),
            record.authority.as_str(),
            record.country.as_str(),
            record.region.as_str(),
            record.summary.as_str(),
            record.conditions.as_str(),
            record.obligation.as_str(),
            record.applicability.as_str(),
            record.environmental.as_str(),
            record.social.as_str(),
            record.governance.as_str(),
            record.sector.as_str(),
            record.penalties.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        haystack.contains(&term)
    }

    #[inline]
    fn matches_tags(&self, selected: &[String], value: &str) -> bool {
        if selected.is_empty() {
            return true;
        }

        match self.match_mode {
            MatchMode::Parity => selected.iter().any(|tag| value.contains(tag.as_str())),
            MatchMode::Exact => {
                let tags = split_tags(value);
                selected.iter().any(|tag| tags.contains(&tag.as_str()))
            }
        }
    }

    fn matches_extra_jurisdictional(&self, value: &str) -> bool {
        let Some(choice) = self.extra_jurisdictional else {
            return true;
        };
        if value.is_empty() {
            return true;
        }

        let value = value.to_lowercase();
        match self.match_mode {
            MatchMode::Parity => value.contains(choice.keyword()),
            MatchMode::Exact => {
                let first_word = value
                    .trim()
                    .split(|c: char| !c.is_alphanumeric())
                    .next()
                    .unwrap_or("");
                first_word == choice.keyword()
            }
        }
    }

    fn matches_year(&self, record: &Record) -> bool {
        match record.publication_year() {
            Some(year) => {
                let (min, max) = self.year_range;
                year >= i64::from(min) && year <= i64::from(max)
            }
            None => true,
        }
    }
}

#[inline]
fn matches_exact(selected: &[String], value: &str) -> bool {
    selected.is_empty() || selected.iter().any(|s| s == value)
}

/// How much of a numeric prefix to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// Digits only
    Integer,
    /// Digits with a decimal point and exponent
    Decimal,
}

/// Threshold check shared by employee count, turnover and balance sheet.
///
/// Inactive when the filter is empty or unreadable. A record without a
/// readable value passes; otherwise it passes when its value does not exceed
/// the filter value.
fn within_threshold(filter: &str, value: &str, kind: NumberKind) -> bool {
    if filter.is_empty() || value.is_empty() {
        return true;
    }

    let record_value = parse_number_prefix(&value.replace(',', ""), kind);
    let filter_value = parse_number_prefix(filter, kind);

    match (record_value, filter_value) {
        (Some(record_value), Some(filter_value)) => filter_value >= record_value,
        _ => true,
    }
}

/// Read the leading number of a string, ignoring whatever follows it.
///
/// `"250 employees"` reads as 250, `"EUR 40m"` does not read at all.
pub fn parse_number_prefix(text: &str, kind: NumberKind) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if kind == NumberKind::Decimal {
        if bytes.get(end) == Some(&b'.') {
            let frac_start = end + 1;
            let mut frac_end = frac_start;
            while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
                frac_end += 1;
            }
            digits += frac_end - frac_start;
            if digits > 0 {
                end = frac_end;
            }
        }

        if digits > 0 && matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
                exp_end += 1;
            }
            let exp_digits_start = exp_end;
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            if exp_end > exp_digits_start {
                end = exp_end;
            }
        }
    }

    if digits == 0 {
        return None;
    }

    text[..end].parse().ok()
}

/// Keep the records matching `criteria`, in their original order
pub fn filter<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    let matched: Vec<&Record> = records.iter().filter(|r| criteria.matches(r)).collect();
    log::debug!(
        "Filter pass: {} of {} records match ({} active selections)",
        matched.len(),
        records.len(),
        criteria.active_filter_count()
    );
    matched
}

/// Owned variant of [`filter`]
pub fn filter_owned(records: Vec<Record>, criteria: &FilterCriteria) -> Vec<Record> {
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}
