//! siteforge store - versioned file access to a static-site repository
//!
//! This crate is a client for GitHub's repository contents endpoint,
//! treated as a path-addressed, versioned blob store. Files are fetched,
//! created, updated and deleted by repository path; every mutation of an
//! existing path must present the file's current version token (its
//! content sha), and the remote rejects writes based on stale state
//! instead of merging.
//!
//! # Examples
//!
//! ```rust,no_run
//! use siteforge_store::{ContentStore, ContentPayload, StoreConfig};
//!
//! # async fn example() -> siteforge_store::Result<()> {
//! let store = ContentStore::new(StoreConfig::new("owner", "site", "ghp_token"))?;
//!
//! // Create, then overwrite with the freshly observed token.
//! store
//!     .put(
//!         "docs/a.txt",
//!         &ContentPayload::Text("hello".into()),
//!         "init",
//!         None,
//!     )
//!     .await?;
//! store
//!     .update_existing("docs/a.txt", &ContentPayload::Text("world".into()), "update")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod http;
pub mod models;
pub mod store;

pub use document::{document_path, render_document, DocumentKind};
pub use error::{Result, StoreError};
pub use http::{ApiRequest, ApiResponse, ApiTransport, Method, ReqwestTransport};
pub use models::{
    render_text, Commit, ContentPayload, EntryType, FileRecord, RemoteEntry, RenderedFile,
};
pub use store::{ContentStore, StoreConfig, DEFAULT_TIMEOUT};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
