use serde::Deserialize;

use crate::api::error::DecodeError;

/// Discriminant carried in the `type` field of every item.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Story,
    Comment,
    Job,
    Poll,
    PollOpt,
    #[serde(other)]
    Unknown,
}

/// A story, comment or job posting.
///
/// All variants share one shape; fields a variant does not use stay at their
/// zero value.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Item {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub by: String,
    pub title: String,
    pub text: String,
    pub url: String,
    pub score: i64,
    pub time: i64,
    pub kids: Vec<u64>,
    pub descendants: u64,
    pub deleted: bool,
    pub dead: bool,
    pub parent: Option<u64>,
}

impl Item {
    /// Name shown in the bracketed author tag.
    pub fn author_label(&self) -> &str {
        if self.by.is_empty() && self.deleted {
            "deleted"
        } else {
            &self.by
        }
    }
}

/// Ordered ids of a story ranking such as `topstories.json`.
pub type StoryIds = Vec<u64>;

/// Decode one item body fetched from `locator`.
pub fn decode_item(locator: &str, bytes: &[u8]) -> Result<Item, DecodeError> {
    let item: Option<Item> =
        serde_json::from_slice(bytes).map_err(|source| DecodeError::Malformed {
            locator: locator.to_string(),
            source,
        })?;
    item.ok_or_else(|| DecodeError::Missing {
        locator: locator.to_string(),
    })
}

pub fn decode_story_ids(locator: &str, bytes: &[u8]) -> Result<StoryIds, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError::Malformed {
        locator: locator.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_story() {
        let body = br#"{
            "by": "dhouston",
            "descendants": 71,
            "id": 8863,
            "kids": [9224, 8917],
            "score": 104,
            "time": 1175714200,
            "title": "My YC app: Dropbox - Throw away your USB drive",
            "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;
        let item = decode_item("item/8863.json", body).unwrap();
        assert_eq!(item.id, 8863);
        assert_eq!(item.kind, ItemKind::Story);
        assert_eq!(item.kids, vec![9224, 8917]);
        assert_eq!(item.descendants, 71);
        assert!(item.text.is_empty());
    }

    #[test]
    fn test_decode_defaults_missing_fields_and_ignores_unknown() {
        let body = br#"{"id": 5, "type": "comment", "parent": 1, "flagged": true}"#;
        let item = decode_item("item/5.json", body).unwrap();
        assert_eq!(item.kind, ItemKind::Comment);
        assert_eq!(item.parent, Some(1));
        assert!(item.by.is_empty());
        assert!(item.kids.is_empty());
        assert_eq!(item.score, 0);
    }

    #[test]
    fn test_decode_unknown_kind() {
        let item = decode_item("x", br#"{"id": 1, "type": "bounty"}"#).unwrap();
        assert_eq!(item.kind, ItemKind::Unknown);
    }

    #[test]
    fn test_decode_null_is_missing() {
        let err = decode_item("item/0.json", b"null").unwrap_err();
        assert!(matches!(err, DecodeError::Missing { .. }));
        assert!(err.to_string().contains("item/0.json"));
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode_item("item/3.json", b"{\"id\": 3").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_author_label_for_deleted() {
        let item = Item {
            deleted: true,
            ..Default::default()
        };
        assert_eq!(item.author_label(), "deleted");

        let item = Item {
            by: "pg".into(),
            ..Default::default()
        };
        assert_eq!(item.author_label(), "pg");
    }

    #[test]
    fn test_decode_story_ids() {
        assert_eq!(decode_story_ids("t", b"[3, 1, 2]").unwrap(), vec![3, 1, 2]);
        assert!(decode_story_ids("t", b"{}").is_err());
    }
}
