mod id;

pub use id::PostId;

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Avatar assigned to posts created from this client.
pub const DEFAULT_PROFILE: &str = "./images/default.jpeg";
/// Avatar shown when the post's own avatar fails to load.
pub const FALLBACK_AVATAR: &str = "./default-avatar.jpg";
/// Hard cutoff for card previews, in characters.
pub const PREVIEW_LENGTH: usize = 50;

/// A blog post as served by the backend.
///
/// Every field besides `id` may be missing, `null` or of an unexpected type on
/// the wire; the client tolerates that and renders empty text instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
}

impl Post {
    /// Avatar path, falling back to the default asset when absent or blank.
    pub fn avatar(&self) -> &str {
        match self.profile.as_deref() {
            Some(profile) if !profile.trim().is_empty() => profile,
            _ => DEFAULT_PROFILE,
        }
    }

    pub fn preview(&self) -> String {
        preview(&self.content)
    }

    pub fn display_date(&self) -> String {
        display_date(self.date.as_ref())
    }

    /// Whether `term` (already trimmed and lowercased) occurs in the title,
    /// content or author.
    pub fn matches(&self, term: &str) -> bool {
        [&self.title, &self.content, &self.author]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }
}

/// Body of a create request; the backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub profile: String,
}

/// Cuts `content` to [`PREVIEW_LENGTH`] characters, appending an ellipsis
/// only when something was cut.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn display_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?))
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => {
            warn!("Ignoring non-text value {}", other);
            None
        }
    }
}

// Accepts RFC 3339 timestamps, bare dates and epoch milliseconds; anything
// else becomes `None` rather than failing the whole collection.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let date = match &value {
        Value::Null => return Ok(None),
        Value::String(raw) => parse_date(raw),
        Value::Number(millis) => millis
            .as_i64()
            .or_else(|| millis.as_f64().map(|millis| millis as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    };

    if date.is_none() {
        warn!("Unparseable post date {}", value);
    }
    Ok(date)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.to_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn tolerates_missing_and_null_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": 7,
            "title": null,
            "date": "not a date"
        }))
        .unwrap();

        assert_eq!(post.id, PostId::Number(7));
        assert_eq!(post.title, "");
        assert_eq!(post.author, "");
        assert_eq!(post.content, "");
        assert_eq!(post.avatar(), DEFAULT_PROFILE);
        assert_eq!(post.date, None);
        assert_eq!(post.display_date(), "Invalid Date");
    }

    #[test]
    fn odd_values_do_not_fail_the_collection() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            { "id": 1, "date": "2024-01-01" },
            { "id": 2, "date": 1700000000000u64 },
            {
                "id": 3,
                "date": { "at": "noon" },
                "title": 42,
                "author": ["Ann"],
                "profile": false
            },
            { "id": 4, "date": true, "content": { "body": "x" } }
        ]))
        .unwrap();

        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0].display_date(), "1/1/2024");
        assert_eq!(posts[1].date, DateTime::from_timestamp_millis(1_700_000_000_000));
        assert_eq!(posts[1].display_date(), "11/14/2023");

        assert_eq!(posts[2].date, None);
        assert_eq!(posts[2].title, "");
        assert_eq!(posts[2].author, "");
        assert_eq!(posts[2].profile, None);
        assert_eq!(posts[2].avatar(), DEFAULT_PROFILE);
        assert_eq!(posts[3].display_date(), "Invalid Date");
        assert_eq!(posts[3].content, "");
    }

    #[test]
    fn parses_backend_timestamps() {
        let post: Post = serde_json::from_value(json!({
            "id": "a1",
            "title": "Hello",
            "author": "Ann",
            "content": "Body",
            "profile": "./images/ann.png",
            "date": "2024-03-05T10:20:30.000Z"
        }))
        .unwrap();

        assert_eq!(post.id, PostId::Text("a1".to_string()));
        assert_eq!(post.date, Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap()));
        assert_eq!(post.display_date(), "3/5/2024");
        assert_eq!(post.avatar(), "./images/ann.png");

        let bare: Post = serde_json::from_value(json!({ "id": 1, "date": "2023-12-31" })).unwrap();
        assert_eq!(bare.display_date(), "12/31/2023");
    }

    #[test]
    fn preview_cuts_at_fifty_characters() {
        let exact = "a".repeat(50);
        assert_eq!(preview(&exact), exact);

        let long = "b".repeat(51);
        assert_eq!(preview(&long), format!("{}...", "b".repeat(50)));

        // multi-byte characters count once each
        let wide = "é".repeat(60);
        let cut = preview(&wide);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));

        assert_eq!(preview(""), "");
    }

    #[test]
    fn matches_any_text_field() {
        let post: Post = serde_json::from_value(json!({
            "id": 1,
            "title": "Rust Ownership",
            "author": "Ferris",
            "content": "Borrowing rules"
        }))
        .unwrap();

        assert!(post.matches("ownership"));
        assert!(post.matches("ferris"));
        assert!(post.matches("borrow"));
        assert!(post.matches(""));
        assert!(!post.matches("python"));
    }
}
