//! Content module - parses post files and answers queries over them

mod frontmatter;
mod post;
pub mod query;
pub mod repository;
pub mod writer;

pub use frontmatter::{render, split, FieldValue, FrontMatter};
pub use post::{is_valid_slug, reading_time, slug_from_stem, Post, PostDefaults};
pub use query::SearchScope;
pub use repository::{ContentRepository, RepositoryConfig};
pub use writer::{PostDraft, PostWriter, WriteError};
