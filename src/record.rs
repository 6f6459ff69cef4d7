//! Regulation record model
//!
//! A record is one regulatory entry. Every attribute is kept as the raw text
//! found in the source file; numeric and date-like fields are interpreted on
//! demand by the filter engine.

use serde::Serialize;
use std::fmt;

/// Named attribute of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MetaId,
    CountryCode,
    Name,
    Alias,
    Authority,
    SourceUrl,
    Region,
    Country,
    Summary,
    Conditions,
    EmployeeCount,
    Currency,
    Turnover,
    BalanceSheetCurrency,
    BalanceSheet,
    PublicPrivate,
    Penalties,
    Aum,
    NonEuApplies,
    Obligation,
    SubjectTagging,
    Environmental,
    Social,
    Governance,
    PublicationDate,
    EntryIntoForce,
    CurrentStage,
    ApplicabilityDate,
    FirstReportingExpected,
    ParentRegulation,
    RelationshipType,
    Applicability,
    Sector,
    RelatedRegulations,
    LastUpdated,
}

/// Column index of every attribute in a raw data row.
///
/// Column 0 of the source file is always empty and never read. This table is
/// the only place raw offsets appear.
pub const COLUMN_LAYOUT: [(Field, usize); 35] = [
    (Field::MetaId, 1),
    (Field::CountryCode, 2),
    (Field::Name, 3),
    (Field::Alias, 4),
    (Field::Authority, 5),
    (Field::SourceUrl, 6),
    (Field::Region, 7),
    (Field::Country, 8),
    (Field::Summary, 9),
    (Field::Conditions, 10),
    (Field::EmployeeCount, 11),
    (Field::Currency, 12),
    (Field::Turnover, 13),
    (Field::BalanceSheetCurrency, 14),
    (Field::BalanceSheet, 15),
    (Field::PublicPrivate, 16),
    (Field::Penalties, 17),
    (Field::Aum, 18),
    (Field::NonEuApplies, 19),
    (Field::Obligation, 20),
    (Field::SubjectTagging, 21),
    (Field::Environmental, 22),
    (Field::Social, 23),
    (Field::Governance, 24),
    (Field::PublicationDate, 25),
    (Field::EntryIntoForce, 26),
    (Field::CurrentStage, 27),
    (Field::ApplicabilityDate, 28),
    (Field::FirstReportingExpected, 29),
    (Field::ParentRegulation, 30),
    (Field::RelationshipType, 31),
    (Field::Applicability, 32),
    (Field::Sector, 33),
    (Field::RelatedRegulations, 34),
    (Field::LastUpdated, 35),
];

impl Field {
    /// Column index of this field in a raw row
    pub fn column(self) -> usize {
        COLUMN_LAYOUT
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, column)| *column)
            .unwrap_or(0)
    }

    /// Human-readable label used by the detail view
    pub fn label(self) -> &'static str {
        match self {
            Field::MetaId => "ID",
            Field::CountryCode => "Country code",
            Field::Name => "Name",
            Field::Alias => "Alias",
            Field::Authority => "Authority",
            Field::SourceUrl => "Source",
            Field::Region => "Region",
            Field::Country => "Country",
            Field::Summary => "Summary",
            Field::Conditions => "Conditions",
            Field::EmployeeCount => "Employee count",
            Field::Currency => "Currency",
            Field::Turnover => "Turnover",
            Field::BalanceSheetCurrency => "Balance sheet currency",
            Field::BalanceSheet => "Balance sheet",
            Field::PublicPrivate => "Public / private",
            Field::Penalties => "Penalties",
            Field::Aum => "AUM",
            Field::NonEuApplies => "Extra-jurisdictional",
            Field::Obligation => "Obligation",
            Field::SubjectTagging => "Subject tagging",
            Field::Environmental => "Environmental",
            Field::Social => "Social",
            Field::Governance => "Governance",
            Field::PublicationDate => "Publication date",
            Field::EntryIntoForce => "Entry into force",
            Field::CurrentStage => "Current stage",
            Field::ApplicabilityDate => "Applicability date",
            Field::FirstReportingExpected => "First reporting expected",
            Field::ParentRegulation => "Parent regulation",
            Field::RelationshipType => "Relationship type",
            Field::Applicability => "Applicability",
            Field::Sector => "Sector",
            Field::RelatedRegulations => "Related regulations",
            Field::LastUpdated => "Last updated",
        }
    }
}

/// Subject classification group of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagCategory {
    Environmental,
    Social,
    Governance,
}

impl TagCategory {
    pub const ALL: [TagCategory; 3] = [
        TagCategory::Environmental,
        TagCategory::Social,
        TagCategory::Governance,
    ];

    pub fn field(self) -> Field {
        match self {
            TagCategory::Environmental => Field::Environmental,
            TagCategory::Social => Field::Social,
            TagCategory::Governance => Field::Governance,
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().label())
    }
}

/// One regulatory entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub meta_id: String,
    pub country_code: String,
    pub name: String,
    #[serde(rename = "regulationAlias")]
    pub alias: String,
    pub authority: String,
    pub source_url: String,
    pub region: String,
    pub country: String,
    pub summary: String,
    pub conditions: String,
    pub employee_count: String,
    pub currency: String,
    pub turnover: String,
    pub balance_sheet_currency: String,
    pub balance_sheet: String,
    pub public_private: String,
    pub penalties: String,
    pub aum: String,
    pub non_eu_applies: String,
    pub obligation: String,
    pub subject_tagging: String,
    pub environmental: String,
    pub social: String,
    pub governance: String,
    pub publication_date: String,
    pub entry_into_force: String,
    pub current_stage: String,
    pub applicability_date: String,
    pub first_reporting_expected: String,
    pub parent_regulation: String,
    pub relationship_type: String,
    pub applicability: String,
    pub sector: String,
    pub related_regulations: String,
    pub last_updated: String,
}

impl Record {
    /// Decode a raw row into a record using [`COLUMN_LAYOUT`].
    ///
    /// Positions past the end of the row decode to empty strings.
    pub fn from_row(row: &[String]) -> Self {
        let mut record = Record::default();
        for (field, column) in COLUMN_LAYOUT {
            if let Some(value) = row.get(column) {
                *record.field_mut(field) = value.clone();
            }
        }
        record
    }

    /// Value of a named attribute
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::MetaId => &self.meta_id,
            Field::CountryCode => &self.country_code,
            Field::Name => &self.name,
            Field::Alias => &self.alias,
            Field::Authority => &self.authority,
            Field::SourceUrl => &self.source_url,
            Field::Region => &self.region,
            Field::Country => &self.country,
            Field::Summary => &self.summary,
            Field::Conditions => &self.conditions,
            Field::EmployeeCount => &self.employee_count,
            Field::Currency => &self.currency,
            Field::Turnover => &self.turnover,
            Field::BalanceSheetCurrency => &self.balance_sheet_currency,
            Field::BalanceSheet => &self.balance_sheet,
            Field::PublicPrivate => &self.public_private,
            Field::Penalties => &self.penalties,
            Field::Aum => &self.aum,
            Field::NonEuApplies => &self.non_eu_applies,
            Field::Obligation => &self.obligation,
            Field::SubjectTagging => &self.subject_tagging,
            Field::Environmental => &self.environmental,
            Field::Social => &self.social,
            Field::Governance => &self.governance,
            Field::PublicationDate => &self.publication_date,
            Field::EntryIntoForce => &self.entry_into_force,
            Field::CurrentStage => &self.current_stage,
            Field::ApplicabilityDate => &self.applicability_date,
            Field::FirstReportingExpected => &self.first_reporting_expected,
            Field::ParentRegulation => &self.parent_regulation,
            Field::RelationshipType => &self.relationship_type,
            Field::Applicability => &self.applicability,
            Field::Sector => &self.sector,
            Field::RelatedRegulations => &self.related_regulations,
            Field::LastUpdated => &self.last_updated,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::MetaId => &mut self.meta_id,
            Field::CountryCode => &mut self.country_code,
            Field::Name => &mut self.name,
            Field::Alias => &mut self.alias,
            Field::Authority => &mut self.authority,
            Field::SourceUrl => &mut self.source_url,
            Field::Region => &mut self.region,
            Field::Country => &mut self.country,
            Field::Summary => &mut self.summary,
            Field::Conditions => &mut self.conditions,
            Field::EmployeeCount => &mut self.employee_count,
            Field::Currency => &mut self.currency,
            Field::Turnover => &mut self.turnover,
            Field::BalanceSheetCurrency => &mut self.balance_sheet_currency,
            Field::BalanceSheet => &mut self.balance_sheet,
            Field::PublicPrivate => &mut self.public_private,
            Field::Penalties => &mut self.penalties,
            Field::Aum => &mut self.aum,
            Field::NonEuApplies => &mut self.non_eu_applies,
            Field::Obligation => &mut self.obligation,
            Field::SubjectTagging => &mut self.subject_tagging,
            Field::Environmental => &mut self.environmental,
            Field::Social => &mut self.social,
            Field::Governance => &mut self.governance,
            Field::PublicationDate => &mut self.publication_date,
            Field::EntryIntoForce => &mut self.entry_into_force,
            Field::CurrentStage => &mut self.current_stage,
            Field::ApplicabilityDate => &mut self.applicability_date,
            Field::FirstReportingExpected => &mut self.first_reporting_expected,
            Field::ParentRegulation => &mut self.parent_regulation,
            Field::RelationshipType => &mut self.relationship_type,
            Field::Applicability => &mut self.applicability,
            Field::Sector => &mut self.sector,
            Field::RelatedRegulations => &mut self.related_regulations,
            Field::LastUpdated => &mut self.last_updated,
        }
    }

    /// Names listed in the related-regulations field
    pub fn related_regulations(&self) -> Vec<&str> {
        split_tags(&self.related_regulations)
    }

    /// Environmental, social and governance tags, in that order
    pub fn subject_tags(&self) -> Vec<(TagCategory, &str)> {
        TagCategory::ALL
            .iter()
            .flat_map(|&category| {
                split_tags(self.get(category.field()))
                    .into_iter()
                    .map(move |tag| (category, tag))
            })
            .collect()
    }

    pub fn sectors(&self) -> Vec<&str> {
        split_tags(&self.sector)
    }

    /// Publication year, if one can be read from the publication date.
    ///
    /// Dates are either `DD/MM/YYYY` (third `/` segment) or `YYYY-MM-DD`
    /// (first `-` segment). A year of zero counts as unreadable.
    pub fn publication_year(&self) -> Option<i64> {
        publication_year(&self.publication_date)
    }
}

/// Split a `;`-separated list, trimming entries and dropping empty ones
pub fn split_tags(value: &str) -> Vec<&str> {
    value
        .split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Read a year out of a publication date string
pub fn publication_year(date: &str) -> Option<i64> {
    if date.is_empty() {
        return None;
    }

    let segment = match date.split('/').nth(2) {
        Some(year) if !year.is_empty() => year,
        _ => date.split('-').next().unwrap_or(""),
    };

    let trimmed = segment.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let year: i64 = digits[..end].parse().ok()?;
    let year = if negative { -year } else { year };

    (year != 0).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_layout_covers_every_column_once() {
        let mut columns: Vec<usize> = COLUMN_LAYOUT.iter().map(|(_, c)| *c).collect();
        columns.sort_unstable();
        assert_eq!(columns, (1..=35).collect::<Vec<_>>());
    }

    #[test]
    fn test_from_row_named_decode() {
        let mut raw = vec![String::new(); 36];
        raw[1] = "reg/001".to_string();
        raw[3] = "Disclosure Act".to_string();
        raw[20] = "Mandatory".to_string();
        raw[35] = "2024-01-01".to_string();

        let record = Record::from_row(&raw);
        assert_eq!(record.meta_id, "reg/001");
        assert_eq!(record.name, "Disclosure Act");
        assert_eq!(record.obligation, "Mandatory");
        assert_eq!(record.last_updated, "2024-01-01");
        assert_eq!(record.get(Field::Obligation), "Mandatory");
    }

    #[test]
    fn test_from_row_short_row_pads_with_empty() {
        let record = Record::from_row(&row(&["", "reg/002", "FR"]));
        assert_eq!(record.meta_id, "reg/002");
        assert_eq!(record.country_code, "FR");
        assert_eq!(record.name, "");
        assert_eq!(record.last_updated, "");
    }

    #[test]
    fn test_field_column_lookup() {
        assert_eq!(Field::MetaId.column(), 1);
        assert_eq!(Field::Sector.column(), 33);
        assert_eq!(Field::LastUpdated.column(), 35);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("Climate Risk; Water ;;"), vec!["Climate Risk", "Water"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" ; ").is_empty());
    }

    #[test]
    fn test_subject_tags_in_category_order() {
        let record = Record {
            environmental: "Climate;Water".to_string(),
            social: "".to_string(),
            governance: "Board Diversity".to_string(),
            ..Default::default()
        };

        assert_eq!(
            record.subject_tags(),
            vec![
                (TagCategory::Environmental, "Climate"),
                (TagCategory::Environmental, "Water"),
                (TagCategory::Governance, "Board Diversity"),
            ]
        );
    }

    #[test]
    fn test_related_regulations() {
        let record = Record {
            related_regulations: "SFDR; Taxonomy Regulation ; ".to_string(),
            ..Default::default()
        };
        assert_eq!(record.related_regulations(), vec!["SFDR", "Taxonomy Regulation"]);
    }

    #[test]
    fn test_publication_year_formats() {
        assert_eq!(publication_year("15/03/2021"), Some(2021));
        assert_eq!(publication_year("2019-07-01"), Some(2019));
        assert_eq!(publication_year("2018"), Some(2018));
        assert_eq!(publication_year("01/02/2020 extra"), Some(2020));
        // No third segment: the leading number of the whole string is used
        assert_eq!(publication_year("01/02"), Some(1));
    }

    #[test]
    fn test_publication_year_unreadable() {
        assert_eq!(publication_year(""), None);
        assert_eq!(publication_year("TBC"), None);
        assert_eq!(publication_year("0000-01-01"), None);
    }
}
