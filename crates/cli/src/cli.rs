use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[clap(name = "siteforge", about = "Manage static-site content stored in a GitHub repository")]
pub struct Cli {
    /// Target repository as owner/name (falls back to SITEFORGE_REPO)
    #[clap(long, global = true)]
    pub repo: Option<String>,

    /// GitHub token (falls back to GITHUB_TOKEN)
    #[clap(long, global = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[clap(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print a file from the repository
    Get {
        /// Repository path, e.g. "client/public/config.json"
        path: String,
        /// Skip JSON pretty-printing
        #[clap(long)]
        raw: bool,
    },
    /// List a directory in the repository
    List {
        /// Repository path of the directory
        path: String,
    },
    /// Upload a new file (fails if the path already exists)
    Upload {
        /// Repository path to create
        path: String,
        /// Local file to read
        file: PathBuf,
        /// Commit message
        #[clap(long)]
        message: Option<String>,
        /// Local file already contains base64 text; send it unmodified
        #[clap(long)]
        pre_encoded: bool,
    },
    /// Overwrite an existing file
    Update {
        /// Repository path to overwrite
        path: String,
        /// Local file to read
        file: PathBuf,
        /// Commit message
        #[clap(long)]
        message: Option<String>,
    },
    /// Delete one or more files
    Delete {
        /// Repository paths to delete
        #[clap(required = true)]
        paths: Vec<String>,
        /// Commit message used for every deletion
        #[clap(long)]
        message: Option<String>,
    },
    /// Create a new blog post or page from a Markdown body
    Post {
        /// Document title
        #[clap(long)]
        title: String,
        /// URL slug, also the file name, e.g. "my-first-post"
        #[clap(long)]
        slug: String,
        /// Local file holding the Markdown body
        #[clap(long)]
        body_file: PathBuf,
        /// Create a standalone page instead of a blog post
        #[clap(long)]
        page: bool,
    },
}
