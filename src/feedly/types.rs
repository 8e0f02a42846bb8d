//! Remote record shapes returned by the feedly v3 API.
//!
//! feedly omits most fields when they are empty and sends `null` for some
//! others, so every field that is not an identifier falls back to its default
//! in both cases.
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Decodes `null` as the type's default. Missing keys are handled by the
/// container-level `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub website: String,
    #[serde(deserialize_with = "nullable")]
    pub velocity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub curated: bool,
    #[serde(deserialize_with = "nullable")]
    pub language: String,
}

/// A user-defined board. Boards are the collections a stream filter points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where an entry was syndicated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryOrigin {
    #[serde(rename = "streamId", deserialize_with = "nullable")]
    pub stream_id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename = "htmlUrl", deserialize_with = "nullable")]
    pub html_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    #[serde(deserialize_with = "nullable")]
    pub direction: String,
    #[serde(deserialize_with = "nullable")]
    pub content: String,
}

/// A single syndicated item.
///
/// Timestamps are kept as feedly sends them (milliseconds since the epoch,
/// 0 when absent); use the `*_at` accessors for typed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub sid: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub summary: Text,
    #[serde(deserialize_with = "nullable")]
    pub engagement: i64,
    #[serde(deserialize_with = "nullable")]
    pub engagement_rate: f32,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<Tag>,
    #[serde(deserialize_with = "nullable")]
    pub author: String,
    #[serde(deserialize_with = "nullable")]
    pub unread: bool,
    #[serde(deserialize_with = "nullable")]
    pub origin_id: String,
    #[serde(deserialize_with = "nullable")]
    pub origin: EntryOrigin,
    #[serde(deserialize_with = "nullable")]
    pub published: i64,
    #[serde(deserialize_with = "nullable")]
    pub updated: i64,
    #[serde(deserialize_with = "nullable")]
    pub crawled: i64,
    #[serde(deserialize_with = "nullable")]
    pub recrawled: i64,
    #[serde(deserialize_with = "nullable")]
    pub categories: Vec<Category>,
    #[serde(deserialize_with = "nullable")]
    pub canonical: Vec<Link>,
    #[serde(deserialize_with = "nullable")]
    pub thumbnail: Vec<Image>,
    #[serde(deserialize_with = "nullable")]
    pub fingerprint: String,
    #[serde(deserialize_with = "nullable")]
    pub keywords: Vec<String>,
}

impl Entry {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        from_millis(self.published)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        from_millis(self.updated)
    }

    pub fn crawled_at(&self) -> Option<DateTime<Utc>> {
        from_millis(self.crawled)
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    if ms <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(ms).single()
}

/// Body of `GET /v3/streams/contents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamContents {
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub updated: i64,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<Entry>,
    #[serde(deserialize_with = "nullable")]
    pub alternate: Vec<Link>,
    #[serde(deserialize_with = "nullable")]
    pub direction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

/// Body of `GET /v3/streams/ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamIds {
    #[serde(deserialize_with = "nullable")]
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_decodes_with_missing_fields() {
        let json = r#"{
            "id": "entry/1",
            "title": "Artist - Album [2019]",
            "origin": {
                "streamId": "feed/http://funkysouls.com/feed",
                "title": "FunkySouls",
                "htmlUrl": "http://funkysouls.com/"
            },
            "published": 1546300800000
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "entry/1");
        assert_eq!(entry.origin.html_url, "http://funkysouls.com/");
        assert!(entry.tags.is_empty());
        assert_eq!(
            entry.published_at().map(|t| t.timestamp()),
            Some(1_546_300_800)
        );
        assert_eq!(entry.updated_at(), None);
    }

    #[test]
    fn test_stream_ids_without_continuation() {
        let page: StreamIds = serde_json::from_str(r#"{"ids":["a","b"]}"#).unwrap();
        assert_eq!(page.ids, vec!["a", "b"]);
        assert_eq!(page.continuation, None);
    }

    #[test]
    fn test_tag_label_optional() {
        let tags: Vec<Tag> =
            serde_json::from_str(r#"[{"id":"user/1/tag/global.saved"},{"id":"user/1/tag/x","label":"X"}]"#)
                .unwrap();
        assert_eq!(tags[0].label, None);
        assert_eq!(tags[1].label.as_deref(), Some("X"));
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let json = r#"{
            "id": "user/1/tag/playlist",
            "title": null,
            "items": [{
                "id": "a",
                "title": "A - B",
                "author": null,
                "summary": null,
                "tags": null,
                "published": null,
                "origin": {"streamId": null, "title": null, "htmlUrl": "http://funkysouls.com/"}
            }],
            "alternate": null,
            "continuation": null
        }"#;

        let page: StreamContents = serde_json::from_str(json).unwrap();
        assert_eq!(page.title, "");
        assert_eq!(page.continuation, None);
        let entry = &page.items[0];
        assert_eq!(entry.author, "");
        assert_eq!(entry.summary, Text::default());
        assert!(entry.tags.is_empty());
        assert_eq!(entry.published_at(), None);
        assert_eq!(entry.origin.html_url, "http://funkysouls.com/");
        assert_eq!(entry.origin.stream_id, "");
    }

    #[test]
    fn test_null_entry_id_still_rejected() {
        assert!(serde_json::from_str::<Entry>(r#"{"id": null, "title": "A - B"}"#).is_err());
    }
}
