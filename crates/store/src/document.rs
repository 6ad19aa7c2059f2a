//! Structured text documents (blog posts and standalone pages).
//!
//! A document is a Markdown file with a key/value frontmatter block,
//! stored at a path derived from its kind and slug. Creation is
//! creation-only: the write carries no version token, so a second document
//! with the same slug fails with `VersionConflict`.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Commit, ContentPayload};
use crate::store::ContentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    BlogPost,
    Page,
}

impl DocumentKind {
    /// Directory the site serves this kind of document from.
    pub fn collection(&self) -> &'static str {
        match self {
            DocumentKind::BlogPost => "client/public/blog",
            DocumentKind::Page => "client/public/pages",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::BlogPost => "blog post",
            DocumentKind::Page => "page",
        }
    }
}

/// Repository path for a document, derived deterministically from kind
/// and slug.
pub fn document_path(kind: DocumentKind, slug: &str) -> String {
    format!("{}/{}.md", kind.collection(), slug)
}

/// Render the full document text: frontmatter, blank line, body.
pub fn render_document(title: &str, slug: &str, date: NaiveDate, body: &str) -> String {
    format!(
        "---\ntitle: {}\nslug: {}\ndate: {}\n---\n\n{}\n",
        title,
        slug,
        date.format("%Y-%m-%d"),
        body
    )
}

impl ContentStore {
    /// Create a new document at the path derived from `kind` and `slug`.
    ///
    /// The slug is a creation-only unique key: calling this twice with the
    /// same slug fails with `VersionConflict` on the second call.
    pub async fn create_document(
        &self,
        kind: DocumentKind,
        slug: &str,
        title: &str,
        body: &str,
        date: NaiveDate,
    ) -> Result<Commit> {
        let path = document_path(kind, slug);
        let text = render_document(title, slug, date, body);
        let message = format!("Add {}: {}", kind.label(), title);

        self.put(&path, &ContentPayload::Text(text), &message, None)
            .await
    }
}
