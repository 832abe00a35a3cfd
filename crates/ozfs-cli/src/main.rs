//! ozfs_write - write a file of a given size to an Ozone bucket
//!
//! The file is written in fixed-size chunks from one reusable buffer filled
//! with a repeating `a..z` pattern, which makes the tool useful for
//! exercising the write path of a cluster:
//!
//! ```text
//! ozfs_write <filename> <filesize> <buffersize> <host-name> <port> <bucket-name> <volume-name>
//! ```
//!
//! Exit status is 0 on success and negative on failure: -1 usage error,
//! -2 open failure, -3 invalid size or write failure, -4 connection failure.

use anyhow::{Context, Result};
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use ozfs_cloud::{CloudConfig, ObjectStoreClient};
use ozfs_core::config::{Backend, Config};
use ozfs_core::error::{EXIT_USAGE, EXIT_WRITE};
use ozfs_core::session::write_file;
use ozfs_core::{validate, ConnectOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod progress;

use progress::ProgressReporter;

/// Write a file of a given size to an Ozone bucket in fixed-size chunks
#[derive(Parser)]
#[command(name = "ozfs_write")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the file to create in the bucket
    #[arg(value_name = "FILENAME")]
    filename: String,

    /// Total number of bytes to write
    #[arg(value_name = "FILESIZE", allow_hyphen_values = true)]
    file_total_size: String,

    /// Bytes per write call (1 to 2147483647)
    #[arg(value_name = "BUFFERSIZE", allow_hyphen_values = true)]
    chunk_size: String,

    /// Host name of the storage gateway
    #[arg(value_name = "HOST-NAME")]
    host: String,

    /// Port of the storage gateway
    #[arg(value_name = "PORT")]
    port: u16,

    /// Bucket to write into
    #[arg(value_name = "BUCKET-NAME")]
    bucket: String,

    /// Volume containing the bucket
    #[arg(value_name = "VOLUME-NAME")]
    volume: String,

    /// Storage backend (s3 or memory); overrides the configuration file
    #[arg(long, value_parser = parse_backend)]
    backend: Option<Backend>,

    /// Configuration file (default: <config dir>/ozfs/config.toml)
    #[arg(long, env = "OZFS_CONFIG")]
    config: Option<PathBuf>,

    /// Replication factor hint
    #[arg(long)]
    replication: Option<u16>,

    /// Block size hint in bytes
    #[arg(long)]
    block_size: Option<u64>,

    /// Show a progress bar while writing
    #[arg(long)]
    progress: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_backend(value: &str) -> std::result::Result<Backend, String> {
    value.parse().map_err(|e: ozfs_core::Error| e.to_string())
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(
                e.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
            ) {
                e.exit();
            }
            // Exit with the usage status even if stderr is closed
            let _ = e.print();
            process::exit(EXIT_USAGE);
        }
    };

    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!("Error: {:#}", e);
            process::exit(map_error_to_exit_code(&e));
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.client.backend = backend;
    }
    config.validate()?;
    let request = validate(&cli.file_total_size, &cli.chunk_size)?;

    let backend = config.client.backend;
    let mut open = config.client.open_options();
    if let Some(replication) = cli.replication {
        open.replication = replication;
    }
    if let Some(block_size) = cli.block_size {
        open.block_size = block_size;
    }
    if open.buffer_size == 0 {
        open.buffer_size = request.chunk_size().get();
    }

    let target = ConnectOptions {
        host: cli.host.clone(),
        port: cli.port,
        bucket: cli.bucket.clone(),
        volume: cli.volume.clone(),
    };
    let client = ObjectStoreClient::new(backend, CloudConfig::from(&config.upload));

    info!(
        "Writing {} bytes to {} on {} in {} chunks of {} bytes",
        request.total_size(),
        cli.filename,
        target,
        request.chunk_count(),
        request.chunk_size()
    );

    let mut progress = ProgressReporter::new(
        cli.progress && !cli.quiet,
        &cli.filename,
        request.total_size(),
    );
    let summary = write_file(&client, &target, &cli.filename, &open, &request, |written| {
        progress.update(written)
    })
    .with_context(|| format!("Failed to write {}", cli.filename))?;
    progress.finish();

    info!("Wrote {} bytes in {} chunks", summary.bytes, summary.chunks);
    Ok(())
}

fn map_error_to_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ozfs_core::Error>() {
        Some(core_err) => core_err.kind().exit_code(),
        None => EXIT_WRITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from([
            "ozfs_write", "/f", "100", "30", "localhost", "9878", "bucket1", "s3v", "--backend",
            "memory",
        ])
        .unwrap();
        assert_eq!(cli.filename, "/f");
        assert_eq!(cli.port, 9878);
        assert_eq!(cli.backend, Some(Backend::Memory));
    }

    #[test]
    fn test_exit_code_mapping() {
        let err = anyhow::Error::new(ozfs_core::Error::ShortWrite {
            expected: 30,
            actual: 29,
        })
        .context("Failed to write f");
        assert_eq!(map_error_to_exit_code(&err), EXIT_WRITE);

        let err: anyhow::Error = ozfs_core::Error::Config("bad".to_string()).into();
        assert_eq!(map_error_to_exit_code(&err), EXIT_USAGE);
    }
}
