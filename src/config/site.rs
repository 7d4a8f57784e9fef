//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::{PostDefaults, RepositoryConfig};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Content
    pub content_dir: String,
    pub extension: String,
    pub recursive: bool,

    // Writing
    pub words_per_minute: u32,
    pub default_title: String,
    pub default_author: String,
    pub default_category: String,

    // Server
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let defaults = PostDefaults::default();
        Self {
            title: "Folio".to_string(),

            content_dir: "content/posts".to_string(),
            extension: "mdx".to_string(),
            recursive: false,

            words_per_minute: defaults.words_per_minute,
            default_title: defaults.title,
            default_author: defaults.author,
            default_category: defaults.category,

            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults applied to posts that omit a field
    pub fn post_defaults(&self) -> PostDefaults {
        PostDefaults {
            title: self.default_title.clone(),
            author: self.default_author.clone(),
            category: self.default_category.clone(),
            words_per_minute: self.words_per_minute,
        }
    }

    /// Repository settings, with `content_dir` resolved against `base_dir`
    pub fn repository_config<P: AsRef<Path>>(&self, base_dir: P) -> RepositoryConfig {
        RepositoryConfig::new(base_dir.as_ref().join(&self.content_dir))
            .with_extension(&self.extension)
            .with_recursive(self.recursive)
            .with_defaults(self.post_defaults())
    }
}

/// JSON API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
