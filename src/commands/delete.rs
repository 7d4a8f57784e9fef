//! Delete a post

use anyhow::Result;

use crate::Folio;

/// Remove the post file for `slug`
pub fn run(folio: &Folio, slug: &str) -> Result<()> {
    folio.writer().delete(slug)?;
    println!("Deleted: {}", slug);
    Ok(())
}
