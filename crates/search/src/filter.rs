use sigma_protocol::{Record, SearchFilters};

/// Filters prepared for repeated matching; lowercases the
/// case-insensitive criteria once.
pub struct RecordFilter<'a> {
    filters: &'a SearchFilters,
    query: String,
    cve: String,
}

impl<'a> RecordFilter<'a> {
    pub fn new(filters: &'a SearchFilters) -> Self {
        Self {
            filters,
            query: filters.query.to_lowercase(),
            cve: filters.cve.to_lowercase(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_query(record)
            && self.matches_category(record)
            && self.matches_author(record)
            && self.matches_cve(record)
            && self.matches_year(record)
    }

    fn matches_query(&self, record: &Record) -> bool {
        if self.query.is_empty() {
            return true;
        }
        contains_lower(&record.title, &self.query)
            || contains_lower(&record.author, &self.query)
            || contains_lower(&record.content, &self.query)
            || record.all_cves().any(|cve| contains_lower(cve, &self.query))
    }

    fn matches_category(&self, record: &Record) -> bool {
        self.filters.category.is_empty() || record.category == self.filters.category
    }

    fn matches_author(&self, record: &Record) -> bool {
        self.filters.author.is_empty() || record.author == self.filters.author
    }

    fn matches_cve(&self, record: &Record) -> bool {
        self.cve.is_empty() || record.all_cves().any(|cve| contains_lower(cve, &self.cve))
    }

    fn matches_year(&self, record: &Record) -> bool {
        self.filters.year.is_empty() || record.date.contains(self.filters.year.as_str())
    }
}

fn contains_lower(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Whether one record satisfies every set criterion.
pub fn matches(record: &Record, filters: &SearchFilters) -> bool {
    RecordFilter::new(filters).matches(record)
}

/// Records satisfying every set criterion, in input order.
pub fn search_records<'a>(records: &'a [Record], filters: &SearchFilters) -> Vec<&'a Record> {
    if filters.is_empty() {
        return records.iter().collect();
    }
    let filter = RecordFilter::new(filters);
    records.iter().filter(|record| filter.matches(record)).collect()
}
