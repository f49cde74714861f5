//! Content loader - scans the content directory and assembles posts

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post};

/// Errors surfaced by the loader's public operations
#[derive(Debug, Error)]
pub enum ContentError {
    /// No file in the content directory declares the requested slug
    #[error("no post with slug '{0}'")]
    NotFound(String),

    /// The content directory itself could not be read
    #[error("failed to scan content directory: {0}")]
    Scan(#[from] walkdir::Error),
}

/// Loads posts from the content directory.
///
/// Every call re-reads the filesystem; the loader holds no cache, so
/// concurrent calls share nothing mutable.
pub struct ContentLoader {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for the given content directory
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every post in the content directory.
    ///
    /// A missing directory means "no content yet" and yields an empty list.
    /// Files that fail to read or parse are logged and skipped; a single
    /// bad file never aborts the listing. Posts come back in file-name
    /// order.
    pub fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        if !self.content_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("failed to load post {:?}: {}", path, e);
                }
            }
        }

        Ok(posts)
    }

    /// Look up a single post by its frontmatter slug.
    ///
    /// Files are scanned in file-name order and the first match wins, so
    /// two files declaring the same slug resolve deterministically to the
    /// lexicographically first one. Files that fail to read or parse are
    /// lookup misses, not errors.
    pub fn find_by_slug(&self, slug: &str) -> Result<Post, ContentError> {
        if self.content_dir.exists() {
            for entry in WalkDir::new(&self.content_dir)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry?;
                let path = entry.path();
                if !entry.file_type().is_file() || !is_markdown_file(path) {
                    continue;
                }

                match self.load_post(path) {
                    Ok(post) if post.slug == slug => return Ok(post),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("skipping {:?} during lookup: {}", path, e);
                    }
                }
            }
        }

        Err(ContentError::NotFound(slug.to_string()))
    }

    /// Load and render a single post file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let text = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&text)?;

        let date = fm.parse_date();
        let content = self.renderer.render(body)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Post {
            title: fm.title.unwrap_or_default(),
            date,
            author: fm.author.unwrap_or_default(),
            description: fm.description.unwrap_or_default(),
            tags: fm.tags,
            slug: fm.slug.unwrap_or_default(),
            raw: body.to_string(),
            content,
            source,
        })
    }
}

/// Check if a file is a markdown post source
fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_post(dir: &Path, name: &str, slug: &str, title: &str) {
        let content = format!(
            "---\ntitle: \"{title}\"\ndate: 2025-01-01T00:00:00Z\nauthor: \"A\"\ndescription: \"D\"\ntags: [\"x\",\"y\"]\nslug: \"{slug}\"\n---\n# Hi\nSome **bold** text.\n"
        );
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(tmp.path().join("does-not-exist"));
        let posts = loader.load_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_load_posts_parses_fields() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "hello.md", "hello", "Hello");

        let loader = ContentLoader::new(tmp.path());
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.title, "Hello");
        assert_eq!(post.author, "A");
        assert_eq!(post.description, "D");
        assert_eq!(post.tags, vec!["x", "y"]);
        assert_eq!(post.slug, "hello");
        assert_eq!(post.source, "hello.md");
        assert!(post.date.is_some());
        assert_eq!(post.raw, "# Hi\nSome **bold** text.");
        assert!(post.content.contains("<h1>Hi</h1>"));
        assert!(post.content.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "good.md", "good", "Good");
        fs::write(tmp.path().join("bad.md"), "no frontmatter at all").unwrap();
        fs::write(tmp.path().join("unclosed.md"), "---\ntitle: x\n").unwrap();

        let loader = ContentLoader::new(tmp.path());
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }

    #[test]
    fn test_non_markdown_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "post.md", "post", "Post");
        fs::write(tmp.path().join("notes.txt"), "plain text").unwrap();
        fs::create_dir(tmp.path().join("assets")).unwrap();

        let loader = ContentLoader::new(tmp.path());
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_posts_come_back_in_file_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "b-second.md", "second", "Second");
        write_post(tmp.path(), "a-first.md", "first", "First");

        let loader = ContentLoader::new(tmp.path());
        let posts = loader.load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second"]);
    }

    #[test]
    fn test_find_by_slug() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "one.md", "one", "One");
        write_post(tmp.path(), "two.md", "two", "Two");

        let loader = ContentLoader::new(tmp.path());
        let post = loader.find_by_slug("two").unwrap();
        assert_eq!(post.title, "Two");
    }

    #[test]
    fn test_find_by_slug_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "one.md", "one", "One");

        let loader = ContentLoader::new(tmp.path());
        let err = loader.find_by_slug("missing-slug").unwrap_err();
        assert!(matches!(err, ContentError::NotFound(ref s) if s == "missing-slug"));
    }

    #[test]
    fn test_find_by_slug_missing_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(tmp.path().join("nope"));
        assert!(matches!(
            loader.find_by_slug("anything"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_slug_first_file_wins() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "aaa.md", "dup", "From aaa");
        write_post(tmp.path(), "zzz.md", "dup", "From zzz");

        let loader = ContentLoader::new(tmp.path());
        let post = loader.find_by_slug("dup").unwrap();
        assert_eq!(post.title, "From aaa");
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("bare.md"),
            "---\nslug: bare\n---\nJust a body.",
        )
        .unwrap();

        let loader = ContentLoader::new(tmp.path());
        let post = loader.find_by_slug("bare").unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.author, "");
        assert_eq!(post.description, "");
        assert!(post.tags.is_empty());
        assert!(post.date.is_none());
        assert_eq!(post.raw, "Just a body.");
    }
}
