use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One normalized exploit entry as written to `exploits.json`.
///
/// Optional fields are serialized as `null` rather than omitted so every
/// record in the output file has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Free text; usually `DD/MM/YYYY` but not guaranteed.
    pub date: String,
    #[serde(default)]
    pub date_parsed: i64,
    #[serde(default)]
    pub cves: Vec<String>,
    #[serde(default)]
    pub cve_id: Option<String>,
    pub category: String,
    #[serde(default)]
    pub platform: Option<String>,
    pub source: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_preview: String,
}

impl Record {
    /// Every CVE identifier attached to the record, list entries first.
    pub fn all_cves(&self) -> impl Iterator<Item = &str> {
        self.cves
            .iter()
            .map(String::as_str)
            .chain(self.cve_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Record {
        Record {
            id: 7,
            title: "FTP overflow".to_string(),
            author: "alice".to_string(),
            date: "01/02/2019".to_string(),
            date_parsed: 1_548_979_200,
            cves: vec!["CVE-2019-0001".to_string()],
            cve_id: Some("CVE-2019-0002".to_string()),
            category: "remote".to_string(),
            platform: None,
            source: "0day.today".to_string(),
            content: "payload".to_string(),
            content_preview: "payload...".to_string(),
        }
    }

    #[test]
    fn optional_fields_serialize_as_null() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value["platform"].is_null());
        assert_eq!(value["cve_id"], "CVE-2019-0002");
    }

    #[test]
    fn all_cves_chains_list_and_single_id() {
        let record = sample();
        let cves: Vec<&str> = record.all_cves().collect();
        assert_eq!(cves, vec!["CVE-2019-0001", "CVE-2019-0002"]);
    }
}
