//! Admin write path - creates, updates and deletes post files
//!
//! Files are written in the same format the parser reads, so anything
//! saved here loads back with the same fields.

use chrono::Local;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use super::post::is_valid_slug;
use super::repository::{ContentRepository, RepositoryConfig};
use super::{frontmatter, FrontMatter, Post};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("Tag {0:?} cannot be blank, hold both quote characters or a line break")]
    InvalidTag(String),

    #[error("A post already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Editable fields of a post, as entered in the admin form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub content: String,
}

impl PostDraft {
    /// A draft dated today
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: Local::now().format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// Slug the draft is saved under, derived from its title
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    pub fn front_matter(&self) -> FrontMatter {
        let mut fm = FrontMatter::default();
        fm.insert_text("title", single_line(&self.title));
        fm.insert_text("excerpt", single_line(&self.excerpt));
        fm.insert_text("date", single_line(&self.date));
        fm.insert_text("author", single_line(&self.author));
        fm.insert_text("category", single_line(&self.category));
        fm.insert_list("tags", self.tags.iter().map(|t| t.trim()));
        fm.insert_text(
            "coverImage",
            single_line(self.cover_image.as_deref().unwrap_or_default()),
        );
        fm
    }

    /// Full file text
    pub fn render(&self) -> String {
        frontmatter::render(&self.front_matter(), &self.content)
    }

    fn validate(&self) -> Result<(), WriteError> {
        for tag in &self.tags {
            let both_quotes = tag.contains('"') && tag.contains('\'');
            if tag.trim().is_empty() || both_quotes || tag.contains(['\n', '\r']) {
                return Err(WriteError::InvalidTag(tag.clone()));
            }
        }
        Ok(())
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date: post.date.clone(),
            author: post.author.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            cover_image: post.cover_image.clone(),
            content: post.content.clone(),
        }
    }
}

/// Turn a title into a file-name slug
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

/// Parse a comma-separated tag field, dropping blanks
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn single_line(value: &str) -> String {
    if value.contains(['\n', '\r']) {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        value.to_string()
    }
}

/// Writes post files into a content directory
#[derive(Debug, Clone)]
pub struct PostWriter {
    config: RepositoryConfig,
}

impl PostWriter {
    pub fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Save a draft under its title's slug.
    ///
    /// `original_slug` is the slug the post was loaded from when editing.
    /// If the title changed the slug, the old file is removed once the new
    /// one is in place.
    pub fn save(
        &self,
        draft: &PostDraft,
        original_slug: Option<&str>,
    ) -> Result<PathBuf, WriteError> {
        let slug = draft.slug();
        if !is_valid_slug(&slug) {
            return Err(WriteError::InvalidSlug(slug));
        }
        if let Some(original) = original_slug {
            if !is_valid_slug(original) {
                return Err(WriteError::InvalidSlug(original.to_string()));
            }
        }
        draft.validate()?;

        let repository = ContentRepository::new(self.config.clone());
        let existing = original_slug.and_then(|original| repository.path_of(original));

        // Keeping the slug overwrites the file the post was loaded from
        let target = match &existing {
            Some(path) if original_slug == Some(slug.as_str()) => path.clone(),
            _ => self.config.path_for(&slug),
        };
        if original_slug != Some(slug.as_str()) {
            if target.exists() {
                return Err(WriteError::AlreadyExists(target));
            }
            if let Some(taken) = repository.path_of(&slug) {
                return Err(WriteError::AlreadyExists(taken));
            }
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        // Replace atomically so readers never see a partial file
        let tmp = target.with_file_name(format!(".{}.{}.tmp", slug, self.config.extension));
        fs::write(&tmp, draft.render())?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::info!("Saved post {:?}", target);

        if let Some(old) = existing.filter(|old| *old != target) {
            fs::remove_file(&old)?;
            tracing::info!("Removed renamed post {:?}", old);
        }

        Ok(target)
    }

    /// Delete the post stored under `slug`
    pub fn delete(&self, slug: &str) -> Result<(), WriteError> {
        if !is_valid_slug(slug) {
            return Err(WriteError::InvalidSlug(slug.to_string()));
        }

        let Some(path) = ContentRepository::new(self.config.clone()).path_of(slug) else {
            return Err(WriteError::NotFound(slug.to_string()));
        };

        fs::remove_file(&path)?;
        tracing::info!("Deleted post {:?}", path);
        Ok(())
    }
}
