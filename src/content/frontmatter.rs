//! Front-matter parsing for post files

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::FrontMatterError;

/// Accept both `category: Foo` and `category: [Foo, Bar]`
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter of a post file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FrontMatter {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    /// Only the first entry is used; posts belong to one category
    #[serde(deserialize_with = "string_or_vec", alias = "categories")]
    pub category: Vec<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub created: Option<String>,
    #[serde(alias = "excerpt")]
    pub description: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Ok(Self::parse_yaml(content));
        }

        if content.starts_with(";;;") {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let rest = content[3..].trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        // A leading `---` can also be a markdown rule; require `key: value` lines.
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = &content[3..];
        let end_pos = rest.find(";;;").ok_or(FrontMatterError::Unterminated)?;
        let fm: FrontMatter = serde_json::from_str(&rest[..end_pos])?;
        let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
        Ok((fm, remaining))
    }

    /// Primary category, if any
    pub fn primary_category(&self) -> Option<&str> {
        self.category.first().map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date_string)
    }

    pub fn parse_created(&self) -> Option<DateTime<Utc>> {
        self.created.as_deref().and_then(parse_date_string)
    }
}

fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    let after = &trimmed[colon_pos + 1..];
    is_valid_key && (after.is_empty() || after.starts_with(' '))
}

/// Parse a date string in various formats; naive values are taken as UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Spirituality 101
slug: spirituality-101
category: Spirit Teachings
status: Live
date: 2024-01-15 10:30:00
description: An introduction
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Spirituality 101"));
        assert_eq!(fm.primary_category(), Some("Spirit Teachings"));
        assert_eq!(fm.status.as_deref(), Some("Live"));
        assert_eq!(fm.description.as_deref(), Some("An introduction"));
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_category_list_takes_first() {
        let content = "---\ntitle: T\ncategories:\n  - History\n  - Other\n---\nBody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.primary_category(), Some("History"));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Test Post\", \"category\": \"X\"}\n;;;\nThis is content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.primary_category(), Some("X"));
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_json_frontmatter_errors() {
        assert!(matches!(
            FrontMatter::parse(";;;\n{\"title\": \"x\"}"),
            Err(FrontMatterError::Unterminated)
        ));
        assert!(matches!(
            FrontMatter::parse(";;;\n{\"title\": }\n;;;\nBody"),
            Err(FrontMatterError::Json(_))
        ));
    }

    #[test]
    fn test_parse_dates() {
        let fm = FrontMatter {
            date: Some("2024-06-01".to_string()),
            created: Some("2024-05-30T08:00:00Z".to_string()),
            ..Default::default()
        };
        assert_eq!(
            fm.parse_date().unwrap().format("%Y-%m-%d").to_string(),
            "2024-06-01"
        );
        assert_eq!(
            fm.parse_created().unwrap().format("%H:%M").to_string(),
            "08:00"
        );
        assert!(parse_date_string("not a date").is_none());
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = "\n---\n\nSome text with https://example.com links\n\n---\nMore content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("Some text"));
    }
}
