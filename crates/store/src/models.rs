//! Data types exchanged with the remote store.

/// A file as fetched from the remote repository.
///
/// Immutable snapshot: a later write to the same path produces a new record
/// with a new `sha`. The `sha` is the version token that must accompany any
/// update or delete of this path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub content: Vec<u8>,
    pub sha: String,
    pub size: u64,
}

impl FileRecord {
    /// Decoded content as UTF-8 text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    Symlink,
    Submodule,
}

impl EntryType {
    pub(crate) fn from_str(s: &str) -> Self {
        match s {
            "dir" => EntryType::Directory,
            "symlink" => EntryType::Symlink,
            "submodule" => EntryType::Submodule,
            _ => EntryType::File,
        }
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    pub entry_type: EntryType,
    pub sha: String,
    pub size: Option<u64>,
}

/// Content handed to `put`, tagged with how it should reach the wire.
///
/// The store never inspects payloads to guess whether they are already
/// base64; callers state it explicitly.
#[derive(Debug, Clone)]
pub enum ContentPayload {
    /// UTF-8 text; the store base64-encodes it for transmission.
    Text(String),
    /// Raw bytes; the store base64-encodes them for transmission.
    Bytes(Vec<u8>),
    /// Base64 text produced by the caller (binary assets); sent as-is.
    PreEncoded(String),
}

impl ContentPayload {
    pub fn len(&self) -> usize {
        match self {
            ContentPayload::Text(s) => s.len(),
            ContentPayload::Bytes(b) => b.len(),
            ContentPayload::PreEncoded(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Text content prepared for display.
///
/// `Structured` carries a pretty-printed rendering of a file the store
/// recognized as JSON; `Plain` is the decoded text unchanged. A file with a
/// `.json` suffix that fails to parse comes back `Plain`, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedFile {
    Structured(String),
    Plain(String),
}

impl RenderedFile {
    pub fn text(&self) -> &str {
        match self {
            RenderedFile::Structured(s) => s,
            RenderedFile::Plain(s) => s,
        }
    }
}

/// Prepare decoded file text for display.
///
/// Attempts a schema-free JSON parse only for `.json` paths; everything
/// else, and anything that does not parse, is returned unchanged.
pub fn render_text(path: &str, text: String) -> RenderedFile {
    if path.ends_with(".json") {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return RenderedFile::Structured(pretty);
            }
        }
    }
    RenderedFile::Plain(text)
}
