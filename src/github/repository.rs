// src/github/repository.rs
// =============================================================================
// The repository record returned by GET /users/{user}/repos.
//
// We only interpret three fields:
// - name: unique per owner, matched against the exclusion set
// - has_pages: whether a GitHub Pages site is published
// - updated_at: used for sorting (newest first)
//
// Every other field (description, html_url, stargazers_count, ...) is kept
// untouched in `extra` so templates can use it and so the cached copy is
// identical to what we fetched.
//
// Rust concepts:
// - #[serde(flatten)]: collect "all the other fields" into a map
// - Option: a timestamp that might not parse
// =============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub has_pages: bool,
    #[serde(default)]
    pub updated_at: String,
    /// Display-only fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Repository {
    /// Parses `updated_at`.
    ///
    /// Accepts RFC 3339 timestamps (what GitHub sends, e.g.
    /// "2021-03-04T05:06:07Z") and bare dates ("2021-03-04", read as
    /// midnight UTC). Anything else is None.
    pub fn updated_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.updated_at.trim();

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.with_timezone(&Utc));
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    }

    /// All fields as one JSON object, the shape templates are rendered against.
    pub fn fields(&self) -> Value {
        let mut fields = self.extra.clone();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert("has_pages".to_string(), Value::Bool(self.has_pages));
        fields.insert("updated_at".to_string(), Value::String(self.updated_at.clone()));
        Value::Object(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn repo(updated_at: &str) -> Repository {
        Repository {
            name: "site".to_string(),
            has_pages: true,
            updated_at: updated_at.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_parse_github_timestamp() {
        assert_eq!(
            repo("2021-03-04T05:06:07Z").updated_timestamp(),
            Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
        );
    }

    #[test]
    fn test_parse_offset_timestamp() {
        assert_eq!(
            repo("2021-03-04T07:06:07+02:00").updated_timestamp(),
            Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
        );
    }

    #[test]
    fn test_parse_bare_date() {
        assert_eq!(
            repo("2020-01-01").updated_timestamp(),
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_timestamp() {
        assert_eq!(repo("yesterday").updated_timestamp(), None);
        assert_eq!(repo("").updated_timestamp(), None);
    }

    #[test]
    fn test_deserialize_keeps_extra_fields() {
        let repo: Repository = serde_json::from_value(json!({
            "name": "blog",
            "has_pages": true,
            "updated_at": "2022-01-01T00:00:00Z",
            "description": "My blog",
            "stargazers_count": 3
        }))
        .unwrap();

        assert_eq!(repo.name, "blog");
        assert_eq!(repo.extra.get("description"), Some(&json!("My blog")));
        assert_eq!(repo.extra.get("stargazers_count"), Some(&json!(3)));
        assert!(!repo.extra.contains_key("name"));
    }

    #[test]
    fn test_missing_flags_default() {
        let repo: Repository = serde_json::from_value(json!({"name": "bare"})).unwrap();
        assert!(!repo.has_pages);
        assert_eq!(repo.updated_at, "");
    }

    #[test]
    fn test_fields_include_everything() {
        let repo: Repository = serde_json::from_value(json!({
            "name": "blog",
            "has_pages": true,
            "updated_at": "2022-01-01",
            "html_url": "https://github.com/octocat/blog"
        }))
        .unwrap();

        assert_eq!(
            repo.fields(),
            json!({
                "name": "blog",
                "has_pages": true,
                "updated_at": "2022-01-01",
                "html_url": "https://github.com/octocat/blog"
            })
        );
    }
}
