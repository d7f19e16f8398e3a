use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_DETAILS: &str = "No Description";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FeedRecord {
    pub title: String,
    pub details: String,
}

/// Top-level response of the news endpoint. Only `articles` is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedDocument {
    pub articles: Vec<RawArticle>,
}

/// One entry of the `articles` list; both fields may be absent or `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl FeedRecord {
    pub fn from_raw(article: RawArticle) -> Self {
        Self {
            title: article.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            details: article
                .description
                .unwrap_or_else(|| DEFAULT_DETAILS.to_owned()),
        }
    }
}

/// Title to details mapping as it is published into the record store.
pub type RecordMap = BTreeMap<String, String>;

pub fn decode_feed(bytes: &[u8]) -> Result<FeedDocument, FetchError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Builds a fresh mapping; a repeated title overwrites the earlier entry.
pub fn records_from_document(document: FeedDocument) -> RecordMap {
    let mut records = RecordMap::new();
    for article in document.articles {
        let record = FeedRecord::from_raw(article);
        records.insert(record.title, record.details);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_fields_fall_back_to_defaults() {
        let body = br#"{"articles":[{"title":"A","description":"d1"},{"title":null,"description":null},{}]}"#;
        let records = records_from_document(decode_feed(body).unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(records["A"], "d1");
        assert_eq!(records[DEFAULT_TITLE], DEFAULT_DETAILS);
    }

    #[test]
    fn duplicate_titles_keep_the_last_entry() {
        let body = br#"{"articles":[{"title":"A","description":"first"},{"title":"A","description":"second"}]}"#;
        let records = records_from_document(decode_feed(body).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records["A"], "second");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = br#"{"status":"ok","totalResults":1,"articles":[{"title":"A","url":"http://e/1","description":"d"}]}"#;
        let records = records_from_document(decode_feed(body).unwrap());
        assert_eq!(records["A"], "d");
    }

    #[test]
    fn structural_errors_are_rejected() {
        for body in [
            &br#"[]"#[..],
            br#"{"status":"ok"}"#,
            br#"{"articles":null}"#,
            br#"{"articles":{"title":"A"}}"#,
            br#"{"articles":[{"title":42}]}"#,
            b"not json",
        ] {
            assert!(
                matches!(decode_feed(body), Err(FetchError::Parse(_))),
                "accepted {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn empty_article_list_is_a_valid_document() {
        let records = records_from_document(decode_feed(br#"{"articles":[]}"#).unwrap());
        assert!(records.is_empty());
    }
}
