//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A blog post assembled from one markdown file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date; `None` when the frontmatter has no usable date
    pub date: Option<DateTime<Local>>,

    /// Post author
    pub author: String,

    /// Short description shown in listings
    pub description: String,

    /// Post tags
    pub tags: Vec<String>,

    /// URL slug the post is looked up by
    pub slug: String,

    /// Raw markdown body, trimmed
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file name
    pub source: String,
}
