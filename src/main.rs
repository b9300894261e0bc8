//! Gallery Indexer CLI
//!
//! Builds a JSON gallery manifest from a media directory tree.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use gallery_indexer::{build_manifest_with_stats, GalleryConfig, ScanError};

const ABOUT: &str = r#"
Gallery Indexer - deterministic gallery manifests

Examples:
  gallery_indexer index -r ./public/gallery                  Print the manifest
  gallery_indexer index -r ./gallery --pretty -o out.json    Write it to a file
  gallery_indexer index -r ./gallery --media-prefix /gallery Prefix media paths
  gallery_indexer index -r ./gallery --progress              JSON progress on stderr
"#;

/// Deterministic gallery manifest builder
#[derive(Parser)]
#[command(name = "gallery_indexer")]
#[command(author, version, about = ABOUT, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a manifest for a gallery root
    Index {
        /// Gallery root directory
        #[arg(short = 'r', long)]
        root: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Report progress as JSON lines on stderr
        #[arg(long)]
        progress: bool,

        /// Treat symbolic links as links instead of their targets
        #[arg(long)]
        no_follow_links: bool,

        /// Prefix joined in front of every media path
        #[arg(long)]
        media_prefix: Option<String>,

        /// Write the manifest to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Log scan statistics when done
        #[arg(long)]
        stats: bool,
    },
}

/// Exit code for a missing gallery root
const EXIT_NOT_FOUND: u8 = 2;
/// Exit code for any other failure
const EXIT_FAILURE: u8 = 1;

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn report_failure(err: &ScanError, pretty: bool) -> ExitCode {
    match std::error::Error::source(err) {
        Some(cause) => error!("{} (caused by: {})", err, cause),
        None => error!("{}", err),
    }

    if let Ok(body) = to_json(&err.to_response(), pretty) {
        println!("{}", body);
    }

    if err.is_not_found() {
        ExitCode::from(EXIT_NOT_FOUND)
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let Some(Commands::Index {
        root,
        pretty,
        progress,
        no_follow_links,
        media_prefix,
        output,
        stats,
    }) = cli.command
    else {
        println!("{}", ABOUT);
        println!("Run 'gallery_indexer index --help' for the index command options");
        return ExitCode::SUCCESS;
    };

    info!("Indexing gallery at {:?}", root);

    let mut builder = GalleryConfig::builder()
        .root(root)
        .follow_links(!no_follow_links)
        .show_progress(progress);
    if let Some(prefix) = media_prefix {
        builder = builder.media_prefix(prefix);
    }
    let config = builder.build();

    let (manifest, scan_stats) = match build_manifest_with_stats(&config) {
        Ok(built) => built,
        Err(e) => return report_failure(&e, pretty),
    };

    if stats {
        info!("Stats: {:?}", scan_stats);
    }

    let body = match to_json(&manifest, pretty) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize manifest: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, body) {
                error!("Failed to write {:?}: {}", path, e);
                return ExitCode::from(EXIT_FAILURE);
            }
            info!("Wrote manifest to {:?}", path);
        }
        None => println!("{}", body),
    }

    ExitCode::SUCCESS
}
