use sigma_protocol::{Record, SortKey, SortOrder};
use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(i64),
    Text(String),
}

fn sort_value(record: &Record, key: SortKey) -> SortValue {
    let text = |value: &str| SortValue::Text(value.to_lowercase());
    match key {
        SortKey::Id => SortValue::Number(record.id),
        SortKey::DateParsed => SortValue::Number(record.date_parsed),
        SortKey::Title => text(&record.title),
        SortKey::Author => text(&record.author),
        SortKey::Date => text(&record.date),
        SortKey::CveId => text(record.cve_id.as_deref().unwrap_or_default()),
        SortKey::Category => text(&record.category),
        SortKey::Platform => text(record.platform.as_deref().unwrap_or_default()),
        SortKey::Source => text(&record.source),
        SortKey::Content => text(&record.content),
        SortKey::ContentPreview => text(&record.content_preview),
    }
}

/// Sorted copy of `records`.
///
/// Text compares lowercased, missing values compare as the empty string and
/// equal keys keep their input order in both directions.
pub fn sort_records<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    key: SortKey,
    order: SortOrder,
) -> Vec<&'a Record> {
    let mut keyed: Vec<(SortValue, &'a Record)> = records
        .into_iter()
        .map(|record| (sort_value(record, key), record))
        .collect();

    keyed.sort_by(|a, b| {
        let ordering: Ordering = a.0.cmp(&b.0);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}
