//! Front-matter parsing
//!
//! A post file optionally starts with a metadata block:
//!
//! ```text
//! ---
//! title: "Hello World"
//! tags: ["intro", "meta"]
//! ---
//! Body text.
//! ```
//!
//! Fields are `key: value` lines. Values may be single- or double-quoted,
//! and a bracketed value (`[a, b]`) or an indented `- item` sequence is a
//! list. Parsing never fails: anything that is not a well-formed block is
//! treated as body text.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Line that opens and closes the metadata block
const MARKER: &str = "---";

lazy_static! {
    static ref FIELD_RE: Regex = Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_-]*):\s*(.*)$").unwrap();
    static ref ITEM_RE: Regex = Regex::new(r"^\s*-\s+(.*)$").unwrap();
}

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Front-matter data from a post, in the order the keys appear
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let (block, body) = split(content);
        (Self::from_block(block), body)
    }

    /// Decode the text between the two markers
    pub fn from_block(block: &str) -> Self {
        let mut fields = IndexMap::new();
        let mut lines = block.lines().peekable();

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some(caps) = FIELD_RE.captures(line) else {
                continue;
            };
            let key = caps[1].to_string();
            let value = caps[2].trim();

            let parsed = if is_list_start(value) {
                // Bracketed lists may continue over several lines, up to the
                // closing bracket or the next field
                let mut text = value[1..].to_string();
                let (mut items, mut closed) = scan_list(&text);
                while !closed {
                    match lines.peek().copied() {
                        Some(next) if !FIELD_RE.is_match(next) => {
                            text.push('\n');
                            text.push_str(next);
                            lines.next();
                            (items, closed) = scan_list(&text);
                        }
                        _ => break,
                    }
                }
                FieldValue::List(items)
            } else if value.is_empty() {
                let mut items = Vec::new();
                while let Some(item) = lines
                    .peek()
                    .copied()
                    .and_then(|next| ITEM_RE.captures(next))
                {
                    let item = unquote(&item[1]);
                    if !item.is_empty() {
                        items.push(item.to_string());
                    }
                    lines.next();
                }
                if items.is_empty() {
                    FieldValue::Text(String::new())
                } else {
                    FieldValue::List(items)
                }
            } else {
                FieldValue::Text(unquote(value).to_string())
            };

            fields.insert(key, parsed);
        }

        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Keys in the order they appeared
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// A scalar field. Lists are not coerced into text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FieldValue::Text(value) => Some(value.as_str()),
            FieldValue::List(_) => None,
        }
    }

    /// A list field. A non-empty scalar reads as a one-element list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(FieldValue::List(items)) => items.clone(),
            Some(FieldValue::Text(value)) if !value.is_empty() => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), FieldValue::Text(value.into()));
    }

    pub fn insert_list<I, S>(&mut self, key: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.fields.insert(key.into(), FieldValue::List(items));
    }

    /// Serialize as a delimited block, every value quoted. List items that
    /// contain a double quote are single-quoted instead.
    pub fn to_block(&self) -> String {
        let mut out = String::from(MARKER);
        out.push('\n');
        for (key, value) in &self.fields {
            match value {
                FieldValue::Text(text) => {
                    out.push_str(&format!("{}: \"{}\"\n", key, text));
                }
                FieldValue::List(items) => {
                    let items: Vec<String> = items.iter().map(|item| quote_item(item)).collect();
                    out.push_str(&format!("{}: [{}]\n", key, items.join(", ")));
                }
            }
        }
        out.push_str(MARKER);
        out.push('\n');
        out
    }
}

/// Split raw file text into (metadata block, body).
///
/// The block must open on the very first line. Without a closing marker the
/// whole text is body.
pub fn split(raw: &str) -> (&str, &str) {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return ("", raw);
    };
    if first.trim_end() != MARKER {
        return ("", raw);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == MARKER {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return (block, body.trim());
        }
        offset += line.len();
    }

    tracing::debug!("Unterminated front-matter block, treating as content");
    ("", raw)
}

/// Render a full post file: block, blank line, body
pub fn render(front_matter: &FrontMatter, body: &str) -> String {
    format!("{}\n{}", front_matter.to_block(), body)
}

fn is_list_start(value: &str) -> bool {
    // `[draft] notes` is text, `[a, b` continues on the next line
    value.starts_with('[') && (value.ends_with(']') || !value.contains(']'))
}

/// Scan the inside of a bracketed list. Commas and line breaks separate
/// items unless they sit inside a quoted item. Returns the items and whether
/// the closing bracket was found.
fn scan_list(text: &str) -> (Vec<String>, bool) {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote = None;

    for c in text.chars() {
        match (quote, c) {
            (_, '\n') => {
                quote = None;
                push_item(&mut items, &mut current);
            }
            (Some(open), _) => {
                if c == open {
                    quote = None;
                }
                current.push(c);
            }
            (None, '"' | '\'') if current.trim().is_empty() => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => push_item(&mut items, &mut current),
            (None, ']') => {
                push_item(&mut items, &mut current);
                return (items, true);
            }
            (None, _) => current.push(c),
        }
    }

    push_item(&mut items, &mut current);
    (items, false)
}

fn push_item(items: &mut Vec<String>, current: &mut String) {
    let item = unquote(current);
    if !item.is_empty() {
        items.push(item.to_string());
    }
    current.clear();
}

fn quote_item(item: &str) -> String {
    if item.contains('"') && !item.contains('\'') {
        format!("'{}'", item)
    } else {
        format!("\"{}\"", item)
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = r#"---
title: "Hello World"
excerpt: 'First post'
date: 2024-01-01
tags: ["intro", "meta"]
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.text("title"), Some("Hello World"));
        assert_eq!(fm.text("excerpt"), Some("First post"));
        assert_eq!(fm.text("date"), Some("2024-01-01"));
        assert_eq!(fm.list("tags"), vec!["intro", "meta"]);
        assert_eq!(body, "This is the content.");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "  Just a body\nwith lines\n";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unterminated_block_is_body() {
        let content = "---\ntitle: Lost\n\nNo closing marker here.";
        let (block, body) = split(content);
        assert_eq!(block, "");
        assert_eq!(body, content);

        let (fm, _) = FrontMatter::parse(content);
        assert!(fm.is_empty());
    }

    #[test]
    fn test_marker_must_open_file() {
        let content = "Intro paragraph\n---\ntitle: Not metadata\n---\n";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.text("title"), Some("Windows"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_multiline_bracket_list() {
        let content = r#"---
tags: [
  "rust",
  'parsing',
  web
]
category: tech
---
Body"#;

        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.list("tags"), vec!["rust", "parsing", "web"]);
        assert_eq!(fm.text("category"), Some("tech"));
    }

    #[test]
    fn test_dash_list() {
        let content = r#"---
title: Dash
tags:
  - rust
  - "serde"
author: Jane
---
"#;

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.list("tags"), vec!["rust", "serde"]);
        assert_eq!(fm.text("author"), Some("Jane"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_unclosed_bracket_list_stops_at_next_field() {
        let content = "---\ntags: [a, b\ncategory: tech\ntitle: Hello\n---\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.list("tags"), vec!["a", "b"]);
        assert_eq!(fm.text("category"), Some("tech"));
        assert_eq!(fm.text("title"), Some("Hello"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_quoted_list_items_keep_commas() {
        let content = r#"---
tags: ["a, b", 'c]d', plain, 'say "hi"']
---
"#;
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.list("tags"), vec!["a, b", "c]d", "plain", "say \"hi\""]);
    }

    #[test]
    fn test_dash_list_renders_back() {
        let content = r#"---
tags:
  - "a, b"
  - say "hi"
  - ""
  - x]y
---
Body"#;
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.list("tags"), vec!["a, b", "say \"hi\"", "x]y"]);

        let text = render(&fm, "Body");
        assert!(text.contains("tags: [\"a, b\", 'say \"hi\"', \"x]y\"]\n"));
        let (parsed, body) = FrontMatter::parse(&text);
        assert_eq!(parsed, fm);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_single_string_tag_reads_as_list() {
        let (fm, _) = FrontMatter::parse("---\ntags: Notes\n---\n");
        assert_eq!(fm.list("tags"), vec!["Notes"]);
        assert_eq!(fm.text("tags"), Some("Notes"));
    }

    #[test]
    fn test_empty_list_and_empty_value() {
        let (fm, _) = FrontMatter::parse("---\ntags: []\ncoverImage: \"\"\nexcerpt:\n---\n");
        assert_eq!(fm.get("tags"), Some(&FieldValue::List(Vec::new())));
        assert_eq!(fm.text("coverImage"), Some(""));
        assert_eq!(fm.text("excerpt"), Some(""));
    }

    #[test]
    fn test_bracketed_text_is_not_a_list() {
        let (fm, _) = FrontMatter::parse("---\ntitle: [draft] Notes on Rust\n---\n");
        assert_eq!(fm.text("title"), Some("[draft] Notes on Rust"));
    }

    #[test]
    fn test_value_with_colon_and_inner_quotes() {
        let content = "---\ntitle: \"Rust: the \"good\" parts\"\ncoverImage: https://example.com/a.png\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.text("title"), Some("Rust: the \"good\" parts"));
        assert_eq!(fm.text("coverImage"), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_comments_unknown_keys_and_repeats() {
        let content = "---\n# draft\nlayout: wide\ntitle: One\ntitle: Two\nnot a field\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.text("title"), Some("Two"));
        assert_eq!(fm.text("layout"), Some("wide"));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["layout", "title"]);
    }

    #[test]
    fn test_render_parses_back() {
        let mut fm = FrontMatter::default();
        fm.insert_text("title", "Round \"trip\"");
        fm.insert_text("coverImage", "");
        fm.insert_list("tags", ["a", "b c"]);

        let text = render(&fm, "Body here.\n");
        assert!(text.starts_with("---\ntitle: \"Round \"trip\"\"\n"));

        let (parsed, body) = FrontMatter::parse(&text);
        assert_eq!(parsed, fm);
        assert_eq!(body, "Body here.");
    }
}
