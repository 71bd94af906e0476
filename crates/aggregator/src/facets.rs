use sigma_protocol::{ArchiveStats, RankedCounts, Record};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Year key of a slash-delimited date: the third segment, when it is exactly
/// four characters long.
pub fn extract_year(date: &str) -> Option<&str> {
    if !date.contains('/') {
        return None;
    }
    date.split('/')
        .nth(2)
        .filter(|segment| segment.chars().count() == 4)
}

/// Single-pass accumulator for distinct facet values and their counts
#[derive(Debug, Default)]
pub struct FacetCollector {
    total: usize,
    categories: BTreeSet<String>,
    authors: BTreeSet<String>,
    cves: BTreeSet<String>,
    years: BTreeSet<i32>,
    category_counts: BTreeMap<String, usize>,
    year_counts: BTreeMap<String, usize>,
    // author -> (count, first-seen position)
    author_counts: HashMap<String, (usize, usize)>,
}

impl FacetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: &Record) {
        self.total += 1;

        self.categories.insert(record.category.clone());
        *self
            .category_counts
            .entry(record.category.clone())
            .or_insert(0) += 1;

        self.authors.insert(record.author.clone());
        let next_position = self.author_counts.len();
        self.author_counts
            .entry(record.author.clone())
            .or_insert((0, next_position))
            .0 += 1;

        for cve in record.all_cves() {
            self.cves.insert(cve.to_string());
        }

        if let Some(year) = extract_year(&record.date) {
            if let Ok(numeric) = year.parse::<i32>() {
                self.years.insert(numeric);
            }
            *self.year_counts.entry(year.to_string()).or_insert(0) += 1;
        }
    }

    pub fn observe_all<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        for record in records {
            self.observe(record);
        }
    }

    /// Build the summary, keeping only the `top_authors` most frequent authors.
    ///
    /// Authors are ranked by count descending; equal counts keep the order in
    /// which the authors were first seen.
    pub fn finish(self, top_authors: usize) -> ArchiveStats {
        let mut ranked: Vec<(String, (usize, usize))> = self.author_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.1 .1.cmp(&b.1 .1)));
        ranked.truncate(top_authors);

        ArchiveStats {
            total_exploits: self.total,
            categories: self.categories.into_iter().collect(),
            authors: self.authors.into_iter().collect(),
            cves: self.cves.into_iter().collect(),
            years: self.years.into_iter().collect(),
            category_counts: self.category_counts,
            year_counts: self.year_counts,
            author_counts: RankedCounts::new(
                ranked
                    .into_iter()
                    .map(|(author, (count, _))| (author, count))
                    .collect(),
            ),
        }
    }
}
