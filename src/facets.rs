//! Filter option lists
//!
//! Static option lists offered for the fixed-vocabulary filters, and distinct
//! values collected from the loaded records for the data-driven ones
//! (countries, authorities, tags).

use crate::record::{split_tags, Field, Record};
use ahash::RandomState;
use hashbrown::HashMap;

pub const REGIONS: [&str; 6] = [
    "Asia Pacific",
    "Europe",
    "North America",
    "South America",
    "Africa & Middle East",
    "International",
];

pub const OBLIGATIONS: [&str; 3] = ["Mandatory", "Voluntary", "Comply or Explain"];

pub const CURRENCIES: [&str; 2] = ["USD", "EUR"];

pub const APPLICABILITIES: [&str; 6] = [
    "Financial Institutions",
    "Credit Institutions",
    "Asset Owners",
    "Investment Managers",
    "Data Providers",
    "Others",
];

/// Fixed-vocabulary option lists with their display labels
pub fn fixed_options() -> [(&'static str, &'static [&'static str]); 4] {
    [
        ("Regions", &REGIONS[..]),
        ("Obligations", &OBLIGATIONS[..]),
        ("Applicability", &APPLICABILITIES[..]),
        ("Currencies", &CURRENCIES[..]),
    ]
}

/// Distinct values of one attribute with the number of records carrying each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facet {
    /// `(value, record count)`, sorted by value
    pub values: Vec<(String, usize)>,
}

impl Facet {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values only, in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|(v, _)| v.as_str()).collect()
    }

    pub fn count(&self, value: &str) -> usize {
        self.values
            .binary_search_by(|(v, _)| v.as_str().cmp(value))
            .map(|i| self.values[i].1)
            .unwrap_or(0)
    }
}

/// Counts values for one facet while scanning records
struct FacetCounter {
    counts: HashMap<String, usize, RandomState>,
}

impl FacetCounter {
    fn new() -> Self {
        Self {
            counts: HashMap::with_hasher(RandomState::new()),
        }
    }

    fn add(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        if let Some(count) = self.counts.get_mut(value) {
            *count += 1;
        } else {
            self.counts.insert(value.to_string(), 1);
        }
    }

    fn finish(self) -> Facet {
        let mut values: Vec<_> = self.counts.into_iter().collect();
        values.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Facet { values }
    }
}

/// Option lists derived from a record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub countries: Facet,
    pub authorities: Facet,
    pub regions: Facet,
    pub obligations: Facet,
    pub environmental: Facet,
    pub social: Facet,
    pub governance: Facet,
    pub sectors: Facet,
}

impl Facets {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut countries = FacetCounter::new();
        let mut authorities = FacetCounter::new();
        let mut regions = FacetCounter::new();
        let mut obligations = FacetCounter::new();
        let mut environmental = FacetCounter::new();
        let mut social = FacetCounter::new();
        let mut governance = FacetCounter::new();
        let mut sectors = FacetCounter::new();

        for record in records {
            countries.add(&record.country);
            authorities.add(&record.authority);
            regions.add(&record.region);
            obligations.add(&record.obligation);
            add_tags(&mut environmental, record.get(Field::Environmental));
            add_tags(&mut social, record.get(Field::Social));
            add_tags(&mut governance, record.get(Field::Governance));
            add_tags(&mut sectors, record.get(Field::Sector));
        }

        Self {
            countries: countries.finish(),
            authorities: authorities.finish(),
            regions: regions.finish(),
            obligations: obligations.finish(),
            environmental: environmental.finish(),
            social: social.finish(),
            governance: governance.finish(),
            sectors: sectors.finish(),
        }
    }

    /// Facets paired with their display labels
    pub fn labelled(&self) -> [(&'static str, &Facet); 8] {
        [
            ("Countries", &self.countries),
            ("Authorities", &self.authorities),
            ("Regions", &self.regions),
            ("Obligations", &self.obligations),
            ("Environmental", &self.environmental),
            ("Social", &self.social),
            ("Governance", &self.governance),
            ("Sectors", &self.sectors),
        ]
    }
}

/// A tag repeated within one record is counted once for that record
fn add_tags(counter: &mut FacetCounter, value: &str) {
    let mut tags = split_tags(value);
    tags.sort_unstable();
    tags.dedup();
    for tag in tags {
        counter.add(tag);
    }
}
