//! Post model and record builder

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::frontmatter::{self, FrontMatter};

/// Values used when a post's front-matter leaves a field out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDefaults {
    pub title: String,
    pub author: String,
    pub category: String,
    /// Reading speed used for `reading_time`
    pub words_per_minute: u32,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            author: "Anonymous".to_string(),
            category: "general".to_string(),
            words_per_minute: 200,
        }
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// URL-friendly name, taken from the filename
    pub slug: String,

    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    pub excerpt: String,

    /// Raw markdown body, front-matter removed
    pub content: String,

    pub author: String,

    pub tags: Vec<String>,

    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    /// Estimated minutes to read `content`
    pub reading_time: u32,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,
}

impl Post {
    /// Build a post from parsed front-matter and body, filling in defaults
    pub fn build(
        slug: impl Into<String>,
        fm: &FrontMatter,
        body: &str,
        defaults: &PostDefaults,
    ) -> Self {
        // An empty value counts as missing
        let field = |key: &str| {
            fm.text(key)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string)
        };

        Self {
            slug: slug.into(),
            title: field("title").unwrap_or_else(|| defaults.title.clone()),
            date: field("date").unwrap_or_else(now_iso),
            excerpt: field("excerpt").unwrap_or_default(),
            content: body.to_string(),
            author: field("author").unwrap_or_else(|| defaults.author.clone()),
            tags: fm.list("tags"),
            category: field("category").unwrap_or_else(|| defaults.category.clone()),
            cover_image: field("coverImage"),
            reading_time: reading_time(body, defaults.words_per_minute),
            full_source: PathBuf::new(),
        }
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        parse_date_string(&self.date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Front-matter in the order the admin panel writes it
    pub fn front_matter(&self) -> FrontMatter {
        let mut fm = FrontMatter::default();
        fm.insert_text("title", self.title.as_str());
        fm.insert_text("excerpt", self.excerpt.as_str());
        fm.insert_text("date", self.date.as_str());
        fm.insert_text("author", self.author.as_str());
        fm.insert_text("category", self.category.as_str());
        fm.insert_list("tags", self.tags.iter().map(String::as_str));
        fm.insert_text("coverImage", self.cover_image.as_deref().unwrap_or_default());
        fm
    }

    /// Serialize back to the on-disk file format
    pub fn to_source(&self) -> String {
        frontmatter::render(&self.front_matter(), &self.content)
    }
}

/// Minutes needed to read `content`, rounded up. Empty content reads in 0.
pub fn reading_time(content: &str, words_per_minute: u32) -> u32 {
    let words = content.split_whitespace().count() as u32;
    words.div_ceil(words_per_minute.max(1))
}

/// Whether a slug can be used verbatim in a URL path segment
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Slug for a file stem: the stem itself when URL-safe, otherwise slugified
pub fn slug_from_stem(stem: &str) -> Option<String> {
    if is_valid_slug(stem) {
        return Some(stem.to_string());
    }
    let slug = slug::slugify(stem);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 with offset first
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
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(content: &str) -> Post {
        let (fm, body) = FrontMatter::parse(content);
        Post::build("test", &fm, body, &PostDefaults::default())
    }

    #[test]
    fn test_build_example_post() {
        let post = build(
            r#"---
title: "Hello World"
excerpt: "First post"
date: "2024-01-01"
author: "Jane"
category: "tech"
tags: ["intro", "meta"]
---
This is the body with six words here.
"#,
        );

        assert_eq!(post.title, "Hello World");
        assert_eq!(post.excerpt, "First post");
        assert_eq!(post.date, "2024-01-01");
        assert_eq!(post.author, "Jane");
        assert_eq!(post.category, "tech");
        assert_eq!(post.tags, vec!["intro", "meta"]);
        assert_eq!(post.cover_image, None);
        assert_eq!(post.content, "This is the body with six words here.");
        assert_eq!(post.reading_time, 1);
    }

    #[test]
    fn test_defaults() {
        let post = build("Just some text.");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.author, "Anonymous");
        assert_eq!(post.category, "general");
        assert_eq!(post.excerpt, "");
        assert!(post.tags.is_empty());
        assert!(post.cover_image.is_none());
        // Defaulted date is "now" and must parse
        assert!(post.parse_date().is_some());
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let post = build("---\ntitle: \"\"\ncategory: \"  \"\ncoverImage: \"\"\n---\nBody");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.category, "general");
        assert!(post.cover_image.is_none());
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time("", 200), 0);
        assert_eq!(reading_time("   \n\t ", 200), 0);
        assert_eq!(reading_time("one", 200), 1);
        assert_eq!(reading_time(&"word ".repeat(200), 200), 1);
        assert_eq!(reading_time(&"word ".repeat(201), 200), 2);
        assert_eq!(reading_time("a  b\n\nc\td", 3), 2);
    }

    #[test]
    fn test_reading_time_never_supplied() {
        let post = build("---\nreadingTime: 42\n---\n");
        assert_eq!(post.reading_time, 0);
    }

    #[test]
    fn test_parse_date() {
        let mut post = build("");
        post.date = "2024-01-15 10:30:00".to_string();
        let dt = post.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        post.date = "2024-01-15T10:30:00+02:00".to_string();
        let dt = post.parse_date().unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "08:30");

        post.date = "2024/03/01".to_string();
        assert!(post.parse_date().is_some());

        post.date = "last tuesday".to_string();
        assert!(post.parse_date().is_none());
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("v1.2_notes"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("hello world"));

        assert_eq!(slug_from_stem("hello-world").as_deref(), Some("hello-world"));
        assert_eq!(slug_from_stem("Hello World").as_deref(), Some("hello-world"));
        assert_eq!(slug_from_stem("!!!"), None);
    }

    #[test]
    fn test_to_source_round_trip() {
        let post = build(
            "---\ntitle: T\ndate: 2024-02-02\ntags: [x, y]\ncoverImage: /images/t.png\n---\n\nSome body\n",
        );
        let source = post.to_source();
        assert!(source.contains("coverImage: \"/images/t.png\"\n"));

        let again = build(&source);
        assert_eq!(again, post);
    }

    #[test]
    fn test_to_source_round_trip_dash_list() {
        let post = build("---\ntitle: T\ndate: 2024-02-02\ntags:\n  - \"a, b\"\n  - plain\n---\nBody\n");
        assert_eq!(post.tags, vec!["a, b", "plain"]);

        let again = build(&post.to_source());
        assert_eq!(again, post);
    }

    #[test]
    fn test_serialize_camel_case() {
        let post = build("---\ncoverImage: a.png\n---\nword");
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["coverImage"], "a.png");
        assert_eq!(json["readingTime"], 1);
        assert!(json.get("fullSource").is_none());
    }
}
