//! Create a new post skeleton

use anyhow::Result;
use chrono::SecondsFormat;
use std::fs;

use crate::Blog;

/// Create `content/<slug>.md` with frontmatter filled in from the title
pub fn run(blog: &Blog, title: &str) -> Result<()> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title does not produce a usable slug: {:?}", title);
    }

    fs::create_dir_all(&blog.content_dir)?;

    let file_path = blog.content_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        r#"---
title: "{}"
date: {}
author: "{}"
description: ""
tags: []
slug: "{}"
---
"#,
        title,
        now.to_rfc3339_opts(SecondsFormat::Secs, false),
        blog.config.author,
        slug,
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;

    #[test]
    fn test_new_post_round_trips_through_loader() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();

        run(&blog, "My First Post").unwrap();

        let loader = ContentLoader::new(&blog.content_dir);
        let post = loader.find_by_slug("my-first-post").unwrap();
        assert_eq!(post.title, "My First Post");
        assert!(post.date.is_some());
        assert_eq!(post.source, "my-first-post.md");
    }

    #[test]
    fn test_new_post_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();

        run(&blog, "Twice").unwrap();
        assert!(run(&blog, "Twice").is_err());
    }
}
