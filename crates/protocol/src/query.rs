use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Independent record predicates, AND-ed together.
///
/// An empty string means the criterion is not set and matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchFilters {
    /// Case-insensitive text across title, author, content and CVE ids.
    pub query: String,
    /// Exact category name.
    pub category: String,
    /// Exact author name.
    pub author: String,
    /// Case-insensitive CVE substring.
    pub cve: String,
    /// Substring of the free-text date.
    pub year: String,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.category.is_empty()
            && self.author.is_empty()
            && self.cve.is_empty()
            && self.year.is_empty()
    }
}

/// Scalar record fields a result list can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Id,
    Title,
    Author,
    Date,
    DateParsed,
    CveId,
    Category,
    Platform,
    Source,
    Content,
    ContentPreview,
}

impl SortKey {
    pub const ALL: [SortKey; 11] = [
        SortKey::Id,
        SortKey::Title,
        SortKey::Author,
        SortKey::Date,
        SortKey::DateParsed,
        SortKey::CveId,
        SortKey::Category,
        SortKey::Platform,
        SortKey::Source,
        SortKey::Content,
        SortKey::ContentPreview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Date => "date",
            SortKey::DateParsed => "date_parsed",
            SortKey::CveId => "cve_id",
            SortKey::Category => "category",
            SortKey::Platform => "platform",
            SortKey::Source => "source",
            SortKey::Content => "content",
            SortKey::ContentPreview => "content_preview",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|key| key.as_str()).collect();
                format!("unknown sort key `{raw}` (expected one of: {})", known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order `{other}` (expected asc or desc)")),
        }
    }
}

/// Filter → sort → paginate request over the whole record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseQuery {
    pub filters: SearchFilters,
    pub sort: SortKey,
    pub order: SortOrder,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for BrowseQuery {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            sort: SortKey::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a result list plus the totals needed to navigate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total_items: usize,
    pub has_prev: bool,
    pub has_next: bool,
}
