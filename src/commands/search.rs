//! Search posts

use anyhow::Result;

use crate::content::SearchScope;
use crate::Folio;

/// Print posts matching `query`
pub fn run(folio: &Folio, query: &str, full_text: bool) -> Result<()> {
    let scope = if full_text {
        SearchScope::FullText
    } else {
        SearchScope::Metadata
    };

    let posts = folio.repository().search_with(query, scope);
    println!("Results for {:?} ({}):", query, posts.len());
    for post in posts {
        println!("  {} - {} [{}]", post.date, post.title, post.slug);
    }

    Ok(())
}
