//! Email Vectors CLI Entry Point
//!
//! Command-line access to the email vector store: ingest files, run semantic
//! searches, and maintain the collection.

mod ingest;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use email_vectors::{EmailVectorStore, VectorDbConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "email-vectors")]
#[command(about = "Semantic search over stored emails")]
#[command(version)]
struct Args {
    /// Database directory (overrides EMAIL_VECTORS_DB_PATH)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Collection name (overrides EMAIL_VECTORS_COLLECTION)
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Embedding model, or `hashing` for offline use (overrides EMAIL_VECTORS_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed and store emails from .csv, .json, .txt or .eml files
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Find the emails closest to a natural-language query
    Search {
        query: String,
        /// Number of results (defaults to EMAIL_VECTORS_SEARCH_LIMIT or 10)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Show collection name, item count and storage path
    Info,
    /// Remove every email from the collection
    Clear,
    /// Delete the whole database directory and start empty
    DeleteDb {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_filter = if args.verbose {
        "email_vectors=debug"
    } else {
        "email_vectors=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

fn resolve_config(args: &Args) -> VectorDbConfig {
    if let Err(e) = dotenv::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = VectorDbConfig::from_env();
    if let Some(path) = &args.db_path {
        config = config.with_db_path(path);
    }
    if let Some(name) = &args.collection {
        config = config.with_collection_name(name);
    }
    if let Some(model) = &args.model {
        config = config.with_embedding_model(model);
    }
    config
}

/// Run one command; `Ok(false)` means the store reported failure
fn run(args: Args) -> Result<bool> {
    let config = resolve_config(&args);

    if let Command::DeleteDb { yes: false } = args.command {
        bail!(
            "Refusing to delete {} without --yes",
            config.db_path.display()
        );
    }

    tracing::info!("Vector database: {}", config.db_path.display());
    let mut store =
        EmailVectorStore::from_config(config).context("Failed to open the email vector store")?;

    match args.command {
        Command::Add { files } => {
            let mut records = Vec::new();
            for file in &files {
                records.extend(ingest::load_records(file)?);
            }
            tracing::info!("Read {} records from {} files", records.len(), files.len());

            let added = store.add_emails(&records);
            if added {
                print_json(&store.collection_info())?;
            }
            Ok(added)
        }
        Command::Search { query, limit } => {
            let hits = match limit {
                Some(limit) => store.search_emails(&query, limit),
                None => store.search(&query),
            };
            print_json(&hits)?;
            Ok(true)
        }
        Command::Info => match store.collection_info() {
            Some(info) => {
                print_json(&info)?;
                Ok(true)
            }
            None => Ok(false),
        },
        Command::Clear => Ok(store.clear_collection()),
        Command::DeleteDb { .. } => Ok(store.delete_database()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_search_with_globals() {
        let args = Args::try_parse_from([
            "email-vectors",
            "search",
            "budget meeting",
            "-n",
            "3",
            "--model",
            "hashing",
        ])
        .unwrap();

        assert_eq!(args.model.as_deref(), Some("hashing"));
        match args.command {
            Command::Search { query, limit } => {
                assert_eq!(query, "budget meeting");
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_add_requires_files() {
        assert!(Args::try_parse_from(["email-vectors", "add"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "email-vectors",
            "--db-path",
            "/tmp/mail_db",
            "--collection",
            "inbox",
            "info",
        ])
        .unwrap();

        let config = resolve_config(&args);
        assert_eq!(config.db_path, PathBuf::from("/tmp/mail_db"));
        assert_eq!(config.collection_name, "inbox");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("vector_db");
        let args = Args::try_parse_from([
            "email-vectors",
            "--db-path",
            db_path.to_str().unwrap(),
            "delete-db",
        ])
        .unwrap();

        assert!(run(args).is_err());
        assert!(!db_path.exists());
    }

    #[test]
    fn test_add_then_search_offline() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("vector_db");
        let input = dir.path().join("emails.json");
        std::fs::write(
            &input,
            r#"[{"text_content": "hello world", "subject": "test"},
                {"text_content": "unrelated newsletter", "subject": "news"}]"#,
        )
        .unwrap();

        let base = ["email-vectors", "--model", "hashing", "--db-path"];
        let db = db_path.to_str().unwrap();

        let add = Args::try_parse_from(base.iter().copied().chain([db, "add", input.to_str().unwrap()]))
            .unwrap();
        assert!(run(add).unwrap());

        let info = Args::try_parse_from(base.iter().copied().chain([db, "info"])).unwrap();
        assert!(run(info).unwrap());

        let store = EmailVectorStore::from_config(
            VectorDbConfig::default()
                .with_db_path(&db_path)
                .with_embedding_model("hashing"),
        )
        .unwrap();
        assert_eq!(store.collection_info().unwrap().count, 2);
    }
}
