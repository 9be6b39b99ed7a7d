//! Subcommand definitions and handlers

use crate::{CliError, Result};
use clap::Subcommand;
use sealdrop_client::{
    ContentAddress, FileQuery, Identity, Session, SortKey, SortOrder, TimeRange, UploadOptions,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a key pair and register the public key
    Register {
        /// Replace a key already stored on this device
        #[arg(long)]
        overwrite: bool,
    },

    /// Encrypt and upload a file
    Upload {
        path: PathBuf,
        /// Let other identities read the file record
        #[arg(long)]
        public: bool,
        /// Extension to record (defaults to the file's own)
        #[arg(long)]
        extension: Option<String>,
    },

    /// Download and decrypt a file
    Fetch {
        address: ContentAddress,
        /// Output file (defaults to `<address>.<extension>`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the plaintext to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Grant another identity access to a file
    Share {
        address: ContentAddress,
        recipient: Identity,
    },

    /// List your files
    List {
        /// today, last7days, last30days, or all
        #[arg(long, default_value = "all")]
        range: TimeRange,
        /// timestamp or address
        #[arg(long, default_value = "timestamp", value_parser = parse_sort_key)]
        sort: SortKey,
        /// Oldest or smallest first
        #[arg(long)]
        asc: bool,
    },

    /// List files shared with you
    Shared,

    /// Delete file records
    Delete {
        #[arg(required = true)]
        addresses: Vec<ContentAddress>,
    },

    /// Write an encrypted backup of your private key
    ExportKey {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Install an encrypted private key backup on this device
    ImportKey {
        path: PathBuf,
        /// Replace a key already stored on this device
        #[arg(long)]
        overwrite: bool,
    },
}

fn parse_sort_key(value: &str) -> std::result::Result<SortKey, String> {
    match value.to_ascii_lowercase().as_str() {
        "timestamp" | "time" => Ok(SortKey::Timestamp),
        "address" | "cid" => Ok(SortKey::ContentAddress),
        other => Err(format!("unknown sort key: {}", other)),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn default_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Run one subcommand against `session`
pub async fn run(command: Command, session: &Session) -> Result<()> {
    debug!(?command, identity = %session.identity(), "running command");
    match command {
        Command::Register { overwrite } => {
            let record = session.register_identity(overwrite).await?;
            print_json(&record)
        }

        Command::Upload {
            path,
            public,
            extension,
        } => {
            let data = tokio::fs::read(&path).await?;
            let extension = extension.unwrap_or_else(|| default_extension(&path));
            let options = if public {
                UploadOptions::public(extension)
            } else {
                UploadOptions::private(extension)
            };
            let record = session.upload(&data, options).await?;
            print_json(&record)
        }

        Command::Fetch {
            address,
            output,
            stdout,
        } => {
            let file = session.retrieve(&address).await?;
            if stdout {
                let mut out = std::io::stdout().lock();
                out.write_all(&file.data)?;
                out.flush()?;
                return Ok(());
            }
            let path = output.unwrap_or_else(|| PathBuf::from(file.file_name()));
            tokio::fs::write(&path, &file.data).await?;
            info!(path = %path.display(), bytes = file.data.len(), "file written");
            Ok(())
        }

        Command::Share { address, recipient } => {
            let grant = session.share(&address, &recipient).await?;
            print_json(&grant)
        }

        Command::List { range, sort, asc } => {
            let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
            let query = FileQuery::default().with_range(range).sorted_by(sort, order);
            let files = session.list_files(&query).await?;
            print_json(&files)
        }

        Command::Shared => {
            let grants = session.list_shared_with_me().await?;
            print_json(&grants)
        }

        Command::Delete { addresses } => {
            let report = session.delete_files(&addresses).await;
            for address in &report.deleted {
                println!("deleted {}", address);
            }
            for (address, err) in &report.failed {
                eprintln!("failed {}: {}", address, err);
            }
            match report.failed.into_iter().next() {
                Some((_, err)) => Err(err.into()),
                None => Ok(()),
            }
        }

        Command::ExportKey { output } => {
            let pem = session.export_private_key().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, pem.as_bytes()).await?;
                    info!(path = %path.display(), "key backup written");
                }
                None => print!("{}", pem),
            }
            Ok(())
        }

        Command::ImportKey { path, overwrite } => {
            let pem = tokio::fs::read_to_string(&path).await?;
            session.import_private_key(&pem, overwrite).await?;
            println!("imported key for {}", session.identity());
            Ok(())
        }
    }
}

/// Reject a missing identity with a usage error
pub fn require_identity(identity: Option<Identity>) -> Result<Identity> {
    identity.ok_or_else(|| {
        CliError::Usage("no identity given; pass --identity or set SEALDROP_IDENTITY".to_string())
    })
}
