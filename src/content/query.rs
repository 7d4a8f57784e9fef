//! Sorting, filtering, taxonomy and search over a list of posts

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use super::Post;

/// Which fields a search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// title, excerpt, tags and category
    #[default]
    Metadata,
    /// Metadata plus the post body
    FullText,
}

/// Sort newest first. Posts whose date does not parse go last, by raw
/// string descending. Equal keys keep their current order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_cached_key(|post| Reverse(date_key(post)));
}

fn date_key(post: &Post) -> (Option<DateTime<Utc>>, String) {
    match post.parse_date() {
        Some(date) => (Some(date), String::new()),
        None => (None, post.date.clone()),
    }
}

pub fn filter_by_category(mut posts: Vec<Post>, category: &str) -> Vec<Post> {
    posts.retain(|post| post.category == category);
    posts
}

pub fn filter_by_tag(mut posts: Vec<Post>, tag: &str) -> Vec<Post> {
    posts.retain(|post| post.has_tag(tag));
    posts
}

/// Distinct categories, sorted
pub fn distinct_categories(posts: &[Post]) -> Vec<String> {
    let categories: BTreeSet<&str> = posts.iter().map(|p| p.category.as_str()).collect();
    categories.into_iter().map(str::to_string).collect()
}

/// Distinct tags across every post, sorted
pub fn distinct_tags(posts: &[Post]) -> Vec<String> {
    let tags: BTreeSet<&str> = posts
        .iter()
        .flat_map(|p| p.tags.iter().map(String::as_str))
        .collect();
    tags.into_iter().map(str::to_string).collect()
}

/// Number of posts per category, sorted by category
pub fn category_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts {
        *counts.entry(post.category.as_str()).or_insert(0) += 1;
    }
    counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Number of posts per tag, sorted by tag. A post repeating a tag counts once.
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts {
        let tags: BTreeSet<&str> = post.tags.iter().map(String::as_str).collect();
        for tag in tags {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Case-insensitive substring search. An empty query matches nothing.
pub fn search(mut posts: Vec<Post>, query: &str, scope: SearchScope) -> Vec<Post> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    posts.retain(|post| matches(post, &needle, scope));
    posts
}

fn matches(post: &Post, needle: &str, scope: SearchScope) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(needle);

    hit(post.title.as_str())
        || hit(post.excerpt.as_str())
        || post.tags.iter().any(|tag| hit(tag.as_str()))
        || hit(post.category.as_str())
        || (scope == SearchScope::FullText && hit(post.content.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, PostDefaults};

    fn post(slug: &str, date: &str, category: &str, tags: &[&str]) -> Post {
        let (fm, body) = FrontMatter::parse("");
        let mut post = Post::build(slug, &fm, body, &PostDefaults::default());
        post.title = format!("Post {}", slug);
        post.date = date.to_string();
        post.category = category.to_string();
        post.tags = tags.iter().map(|t| t.to_string()).collect();
        post
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            post("old", "2023-05-01", "a", &[]),
            post("bad", "someday", "a", &[]),
            post("new", "2024-01-01T08:00:00Z", "a", &[]),
            post("mid", "2023/12/31", "a", &[]),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(slugs(&posts), vec!["new", "mid", "old", "bad"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut posts = vec![
            post("first", "2024-01-01", "a", &[]),
            post("second", "2024-01-01T00:00:00Z", "a", &[]),
            post("third", "2024-01-01", "a", &[]),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(slugs(&posts), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unparseable_dates_sort_by_string() {
        let mut posts = vec![
            post("a", "alpha", "x", &[]),
            post("b", "beta", "x", &[]),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(slugs(&posts), vec!["b", "a"]);
    }

    #[test]
    fn test_filters_preserve_order() {
        let posts = vec![
            post("p1", "2024-03-01", "tech", &["rust", "web"]),
            post("p2", "2024-02-01", "life", &["rust"]),
            post("p3", "2024-01-01", "tech", &["go"]),
        ];

        let tech = filter_by_category(posts.clone(), "tech");
        assert_eq!(slugs(&tech), vec!["p1", "p3"]);
        assert!(filter_by_category(posts.clone(), "Tech").is_empty());

        let rust = filter_by_tag(posts.clone(), "rust");
        assert_eq!(slugs(&rust), vec!["p1", "p2"]);
        assert!(filter_by_tag(posts, "ru").is_empty());
    }

    #[test]
    fn test_vocabularies() {
        let posts = vec![
            post("p1", "2024-03-01", "tech", &["web", "rust", "rust"]),
            post("p2", "2024-02-01", "Life", &["rust", "Zed"]),
            post("p3", "2024-01-01", "tech", &[]),
        ];

        assert_eq!(distinct_categories(&posts), vec!["Life", "tech"]);
        assert_eq!(distinct_tags(&posts), vec!["Zed", "rust", "web"]);
        assert_eq!(
            tag_counts(&posts),
            vec![
                ("Zed".to_string(), 1),
                ("rust".to_string(), 2),
                ("web".to_string(), 1)
            ]
        );
        assert_eq!(
            category_counts(&posts),
            vec![("Life".to_string(), 1), ("tech".to_string(), 2)]
        );
    }

    #[test]
    fn test_search() {
        let mut p1 = post("p1", "2024-03-01", "tech", &["Intro"]);
        p1.excerpt = "Getting started".to_string();
        p1.content = "The borrow checker explained".to_string();
        let p2 = post("p2", "2024-02-01", "Travel", &[]);
        let posts = vec![p1, p2];

        assert_eq!(slugs(&search(posts.clone(), "intro", SearchScope::Metadata)), vec!["p1"]);
        assert_eq!(slugs(&search(posts.clone(), "STARTED", SearchScope::Metadata)), vec!["p1"]);
        assert_eq!(slugs(&search(posts.clone(), "travel", SearchScope::Metadata)), vec!["p2"]);
        assert_eq!(slugs(&search(posts.clone(), "post", SearchScope::Metadata)), vec!["p1", "p2"]);

        assert!(search(posts.clone(), "borrow", SearchScope::Metadata).is_empty());
        assert_eq!(slugs(&search(posts.clone(), "borrow", SearchScope::FullText)), vec!["p1"]);

        assert!(search(posts.clone(), "", SearchScope::FullText).is_empty());
        assert!(search(posts.clone(), "   ", SearchScope::Metadata).is_empty());
        assert!(search(posts, "zzz", SearchScope::FullText).is_empty());
    }
}
