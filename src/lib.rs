//! folio-rs: content repository for a Markdown/MDX blog
//!
//! This crate reads a directory of post files with front-matter, builds
//! normalized post records from them, and answers listing, taxonomy and
//! search queries. It also writes posts back in the same format.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::Path;

use content::{ContentRepository, PostWriter, RepositoryConfig};

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding the post files
    pub content_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Repository settings for this site
    pub fn repository_config(&self) -> RepositoryConfig {
        self.config.repository_config(&self.base_dir)
    }

    /// Read-only access to the site's posts
    pub fn repository(&self) -> ContentRepository {
        ContentRepository::new(self.repository_config())
    }

    /// Write access to the site's posts
    pub fn writer(&self) -> PostWriter {
        PostWriter::new(self.repository_config())
    }
}
