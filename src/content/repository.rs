//! Content repository - loads posts from the content directory and answers queries
//!
//! Nothing is cached: every query walks the directory and parses every file
//! again, so results always reflect what is on disk at the time of the call.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::{is_valid_slug, slug_from_stem};
use super::query::{self, SearchScope};
use super::{FrontMatter, Post, PostDefaults};

/// Where posts live and how they are built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Directory holding one file per post
    pub content_dir: PathBuf,
    /// Extension of post files, without the dot
    pub extension: String,
    /// Descend into subdirectories
    pub recursive: bool,
    pub defaults: PostDefaults,
}

impl RepositoryConfig {
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            extension: "mdx".to_string(),
            recursive: false,
            defaults: PostDefaults::default(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_defaults(mut self, defaults: PostDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Path a post with this slug is stored at
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.content_dir.join(format!("{}.{}", slug, self.extension))
    }
}

/// Read-only access to the posts in a content directory
#[derive(Debug, Clone)]
pub struct ContentRepository {
    config: RepositoryConfig,
}

impl ContentRepository {
    pub fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// All posts, newest first
    pub fn all(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.load_posts().into_values().collect();
        query::sort_newest_first(&mut posts);
        posts
    }

    /// The post with the given slug, if any
    pub fn by_slug(&self, slug: &str) -> Option<Post> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected invalid slug {:?}", slug);
            return None;
        }
        self.load_posts().swap_remove(slug)
    }

    /// File the post with the given slug was loaded from. This can differ
    /// from `path_for` when the file name was slugified or the post sits in
    /// a subdirectory.
    pub fn path_of(&self, slug: &str) -> Option<PathBuf> {
        self.by_slug(slug).map(|post| post.full_source)
    }

    /// The post with the given slug, only if it is filed under `category`
    pub fn by_category_and_slug(&self, category: &str, slug: &str) -> Option<Post> {
        self.by_slug(slug).filter(|post| post.category == category)
    }

    pub fn by_category(&self, category: &str) -> Vec<Post> {
        query::filter_by_category(self.all(), category)
    }

    pub fn by_tag(&self, tag: &str) -> Vec<Post> {
        query::filter_by_tag(self.all(), tag)
    }

    pub fn categories(&self) -> Vec<String> {
        query::distinct_categories(&self.all())
    }

    pub fn tags(&self) -> Vec<String> {
        query::distinct_tags(&self.all())
    }

    pub fn category_counts(&self) -> Vec<(String, usize)> {
        query::category_counts(&self.all())
    }

    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        query::tag_counts(&self.all())
    }

    /// Search title, excerpt, tags and category
    pub fn search(&self, query: &str) -> Vec<Post> {
        self.search_with(query, SearchScope::Metadata)
    }

    /// Search metadata and post bodies
    pub fn search_full_text(&self, query: &str) -> Vec<Post> {
        self.search_with(query, SearchScope::FullText)
    }

    pub fn search_with(&self, query: &str, scope: SearchScope) -> Vec<Post> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        query::search(self.all(), query, scope)
    }

    /// Load every post keyed by slug, in enumeration order.
    /// A later file with an already-seen slug replaces the earlier one.
    fn load_posts(&self) -> IndexMap<String, Post> {
        let mut posts: IndexMap<String, Post> = IndexMap::new();

        for path in self.content_files() {
            let Some(post) = self.load_post(&path) else {
                continue;
            };
            if let Some(previous) = posts.shift_remove(&post.slug) {
                tracing::warn!(
                    "Duplicate slug {:?}: {:?} replaces {:?}",
                    post.slug,
                    post.full_source,
                    previous.full_source
                );
            }
            posts.insert(post.slug.clone(), post);
        }

        tracing::debug!(
            "Loaded {} posts from {:?}",
            posts.len(),
            self.config.content_dir
        );
        posts
    }

    /// Post files in walk order, sorted by file name within each directory
    fn content_files(&self) -> Vec<PathBuf> {
        let dir = &self.config.content_dir;
        if !dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", dir);
            return Vec::new();
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };

        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Failed to read content entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.is_content_file(path))
            .collect()
    }

    fn is_content_file(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(true);

        !hidden
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == self.config.extension)
                .unwrap_or(false)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Option<Post> {
        let Some(slug) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(slug_from_stem)
        else {
            tracing::warn!("Skipping {:?}: no usable slug in file name", path);
            return None;
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to load post {:?}: {}", path, e);
                return None;
            }
        };

        let (fm, body) = FrontMatter::parse(&content);
        let mut post = Post::build(slug, &fm, body, &self.config.defaults);
        post.full_source = path.to_path_buf();
        Some(post)
    }
}
