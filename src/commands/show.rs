//! Print a single post

use anyhow::Result;

use crate::Folio;

/// Print the post with `slug` as JSON
pub fn run(folio: &Folio, slug: &str) -> Result<()> {
    match folio.repository().by_slug(slug) {
        Some(post) => {
            println!("{}", serde_json::to_string_pretty(&post)?);
            Ok(())
        }
        None => anyhow::bail!("Post not found: {}", slug),
    }
}
