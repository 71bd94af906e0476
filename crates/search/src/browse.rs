use crate::filter::search_records;
use crate::paginate::paginate;
use crate::sort::sort_records;
use crate::Result;
use sigma_protocol::{BrowseQuery, Page, Record};

/// Filter → sort → paginate over the full record list.
pub fn browse<'a>(records: &'a [Record], query: &BrowseQuery) -> Result<Page<&'a Record>> {
    let matched = search_records(records, &query.filters);
    log::debug!(
        "{} of {} records match, sorting by {} {}",
        matched.len(),
        records.len(),
        query.sort,
        query.order
    );
    let sorted = sort_records(matched, query.sort, query.order);
    paginate(sorted, query.page, query.page_size)
}

pub fn find_by_id(records: &[Record], id: i64) -> Option<&Record> {
    records.iter().find(|record| record.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sigma_protocol::{SearchFilters, SortKey, SortOrder};

    fn corpus() -> Vec<Record> {
        (1..=7)
            .map(|id| Record {
                id,
                title: format!("entry {id}"),
                author: if id % 2 == 0 { "even" } else { "odd" }.to_string(),
                date: format!("01/01/{}", 2000 + id),
                date_parsed: id * 10,
                cves: Vec::new(),
                cve_id: None,
                category: "remote".to_string(),
                platform: None,
                source: "0day.today".to_string(),
                content: String::new(),
                content_preview: String::new(),
            })
            .collect()
    }

    #[test]
    fn default_query_returns_newest_ids_first() {
        let records = corpus();
        let page = browse(&records, &BrowseQuery::default()).unwrap();
        let ids: Vec<i64> = page.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn filters_then_sorts_then_pages() {
        let records = corpus();
        let query = BrowseQuery {
            filters: SearchFilters {
                author: "odd".to_string(),
                ..Default::default()
            },
            sort: SortKey::DateParsed,
            order: SortOrder::Asc,
            page: 2,
            page_size: 3,
        };
        let page = browse(&records, &query).unwrap();
        let ids: Vec<i64> = page.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7]);
        assert_eq!(page.total_items, 4);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn lookup_by_id() {
        let records = corpus();
        assert_eq!(find_by_id(&records, 4).map(|r| r.title.as_str()), Some("entry 4"));
        assert!(find_by_id(&records, 40).is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_the_first_record() {
        let mut records = corpus();
        let mut twin = records[2].clone();
        twin.title = "entry 3 again".to_string();
        records.push(twin);

        assert_eq!(find_by_id(&records, 3).map(|r| r.title.as_str()), Some("entry 3"));

        let query = BrowseQuery {
            sort: SortKey::Id,
            order: SortOrder::Asc,
            ..BrowseQuery::default()
        };
        let page = browse(&records, &query).unwrap();
        let titles: Vec<&str> = page
            .data
            .iter()
            .filter(|r| r.id == 3)
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["entry 3", "entry 3 again"]);
    }
}
