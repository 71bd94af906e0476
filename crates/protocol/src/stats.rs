use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Precomputed facet summary written to `stats.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveStats {
    pub total_exploits: usize,
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub cves: Vec<String>,
    pub years: Vec<i32>,
    pub category_counts: BTreeMap<String, usize>,
    pub year_counts: BTreeMap<String, usize>,
    /// Only the most prolific authors; see `AggregatorConfig::top_authors`.
    #[schemars(with = "BTreeMap<String, usize>")]
    pub author_counts: RankedCounts,
}

impl ArchiveStats {
    /// Categories with the largest counts, count descending, ties by name.
    pub fn top_categories(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .category_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.years.iter().min()?;
        let max = self.years.iter().max()?;
        Some((*min, *max))
    }
}

/// Name → count pairs that keep their rank order through JSON.
///
/// Serialized as a plain JSON object; entries appear in the order they were
/// ranked instead of being re-sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts(Vec<(String, usize)>);

impl RankedCounts {
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankedCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RankedCountsVisitor)
    }
}

struct RankedCountsVisitor;

impl<'de> Visitor<'de> for RankedCountsVisitor {
    type Value = RankedCounts;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of names to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, count)) = access.next_entry::<String, usize>()? {
            entries.push((name, count));
        }
        Ok(RankedCounts(entries))
    }
}
