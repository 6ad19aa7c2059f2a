mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{bail, WrapErr};
use siteforge_store::{
    ContentPayload, ContentStore, DocumentKind, EntryType, RenderedFile, StoreConfig,
};

use crate::cli::Commands;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (owner, repo) = resolve_repo(cli.repo)?;
    tracing::debug!("Using repository {}/{}", owner, repo);

    let token = cli
        .token
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .unwrap_or_default();

    // An empty token fails here with Unauthorized, before any request.
    let store = ContentStore::new(
        StoreConfig::new(owner, repo, token)
            .with_timeout(Duration::from_secs(cli.timeout_secs)),
    )?;

    match cli.command {
        Commands::Get { path, raw } => {
            if raw {
                let record = store.get(&path).await?;
                println!("{}", String::from_utf8_lossy(&record.content));
            } else {
                match store.get_rendered(&path).await? {
                    RenderedFile::Structured(pretty) => println!("{}", pretty),
                    RenderedFile::Plain(text) => println!("{}", text),
                }
            }
        }
        Commands::List { path } => {
            let entries = store.list(&path).await?;
            println!("{}/", path.trim_end_matches('/'));
            for entry in entries {
                let marker = match entry.entry_type {
                    EntryType::Directory => "/",
                    _ => "",
                };
                let size = entry
                    .size
                    .map(|s| format!("{} bytes", s))
                    .unwrap_or_default();
                println!("  {}{}  {}  {}", entry.name, marker, size, &entry.sha[..16.min(entry.sha.len())]);
            }
        }
        Commands::Upload {
            path,
            file,
            message,
            pre_encoded,
        } => {
            let payload = if pre_encoded {
                let text = tokio::fs::read_to_string(&file)
                    .await
                    .wrap_err_with(|| format!("failed to read {}", file.display()))?;
                ContentPayload::PreEncoded(text.trim().to_string())
            } else {
                let bytes = tokio::fs::read(&file)
                    .await
                    .wrap_err_with(|| format!("failed to read {}", file.display()))?;
                ContentPayload::Bytes(bytes)
            };

            let message = message.unwrap_or_else(|| format!("Upload {}", path));
            let commit = store.put(&path, &payload, &message, None).await?;
            println!("Uploaded {} (commit {})", path, commit.sha);
        }
        Commands::Update {
            path,
            file,
            message,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;
            let message = message.unwrap_or_else(|| format!("Update {}", path));
            let commit = store
                .update_existing(&path, &ContentPayload::Bytes(bytes), &message)
                .await?;
            println!("Updated {} (commit {})", path, commit.sha);
        }
        Commands::Delete { paths, message } => {
            for path in paths {
                let message = message
                    .clone()
                    .unwrap_or_else(|| format!("Delete {}", path));
                let commit = store.delete_by_path(&path, &message).await?;
                println!("Deleted {} (commit {})", path, commit.sha);
            }
        }
        Commands::Post {
            title,
            slug,
            body_file,
            page,
        } => {
            let body = tokio::fs::read_to_string(&body_file)
                .await
                .wrap_err_with(|| format!("failed to read {}", body_file.display()))?;
            let kind = if page {
                DocumentKind::Page
            } else {
                DocumentKind::BlogPost
            };

            let date = chrono::Local::now().date_naive();
            let commit = store
                .create_document(kind, &slug, &title, body.trim_end(), date)
                .await?;
            println!(
                "Created {} at {} (commit {})",
                kind.label(),
                siteforge_store::document_path(kind, &slug),
                commit.sha
            );
        }
    }

    Ok(())
}

fn resolve_repo(flag: Option<String>) -> eyre::Result<(String, String)> {
    let value = match flag.or_else(|| std::env::var("SITEFORGE_REPO").ok()) {
        Some(value) => value,
        None => bail!("no repository configured; pass --repo owner/name or set SITEFORGE_REPO"),
    };

    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => bail!("invalid repository '{}'; expected owner/name", value),
    }
}
