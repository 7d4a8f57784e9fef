//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?} exists", config_path);
    }

    // Create default _config.yml
    let config_content = r#"# Folio Configuration

# Site
title: Folio

# Content
content_dir: content/posts
extension: mdx
recursive: false

# Writing
words_per_minute: 200
default_title: Untitled
default_author: Anonymous
default_category: general

# Server
server:
  ip: localhost
  port: 4000
"#;

    fs::write(&config_path, config_content)?;

    let posts_dir = target_dir.join("content/posts");
    fs::create_dir_all(&posts_dir)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: "Hello World"
excerpt: "Your very first post"
date: "{}"
author: "Anonymous"
category: "general"
tags: ["intro"]
coverImage: ""
---

Welcome! This is your very first post. Edit or delete it, then start writing.

## Quick Start

### Create a new post

```bash
$ folio new "My New Post" --tags rust,notes
```

### Browse your posts

```bash
$ folio list
$ folio search notes
```

### Run the JSON API

```bash
$ folio serve
```
"#,
        now.format("%Y-%m-%d")
    );

    fs::write(posts_dir.join("hello-world.mdx"), sample_post)?;
    tracing::info!("Created sample post in {:?}", posts_dir);

    Ok(())
}
