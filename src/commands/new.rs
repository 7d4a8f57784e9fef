//! Create or edit a post

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::content::writer::split_tags;
use crate::content::PostDraft;
use crate::Folio;

/// Field values given on the command line; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    /// Comma-separated
    pub tags: Option<String>,
    pub cover_image: Option<String>,
    pub body: Option<String>,
}

impl PostFields {
    fn apply(self, draft: &mut PostDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            draft.excerpt = excerpt;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(author) = self.author {
            draft.author = author;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(tags) = self.tags {
            draft.tags = split_tags(&tags);
        }
        if let Some(cover) = self.cover_image {
            draft.cover_image = Some(cover).filter(|c| !c.is_empty());
        }
        if let Some(body) = self.body {
            draft.content = body;
        }
    }
}

/// Create a new post from `fields`; a title is required
pub fn create_post(folio: &Folio, fields: PostFields) -> Result<PathBuf> {
    let title = fields
        .title
        .clone()
        .context("A title is required to create a post")?;

    let mut draft = PostDraft::new(title);
    fields.apply(&mut draft);

    let path = folio.writer().save(&draft, None)?;
    println!("Created: {:?}", path);
    Ok(path)
}

/// Update the post stored under `slug`. Changing the title renames the file.
pub fn edit_post(folio: &Folio, slug: &str, fields: PostFields) -> Result<PathBuf> {
    let post = folio
        .repository()
        .by_slug(slug)
        .with_context(|| format!("Post not found: {}", slug))?;

    let mut draft = PostDraft::from(&post);
    fields.apply(&mut draft);

    let path = folio.writer().save(&draft, Some(post.slug.as_str()))?;
    println!("Saved: {:?}", path);
    Ok(path)
}
