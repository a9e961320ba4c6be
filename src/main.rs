// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments (help or a wrong argument count prints usage)
// 2. Open the URL file and create the output file next to it
// 3. Run the crawl, cancelling it on Ctrl-C
// 4. Print a summary and exit with the proper code (0 = success, 1 = error)
// =============================================================================

mod cli;
mod logging;

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cli::{Cli, Invocation};
use craurl::{CrawlReport, Crawler, CrawlerConfig, JsonLinesSink, Sink, TableSink};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole chain: "crawl failed: invalid URL ..."
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = match Cli::invocation(std::env::args_os()) {
        Invocation::Crawl(cli) => cli,
        Invocation::Usage => {
            Cli::print_usage()?;
            return Ok(0);
        }
        Invocation::Version => {
            println!("craurl {}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }
        Invocation::Invalid(e) => {
            e.print()?;
            return Ok(2);
        }
    };

    logging::init_logging(cli.verbose);

    let source = open_source(&cli.file).await?;
    let output_path = cli.output_path();
    let output = File::create(&output_path)
        .await
        .with_context(|| format!("failed to create {}", output_path.display()))?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    println!("🔍 Checking URLs from {}", cli.file.display());

    let config = cli.crawler_config();
    let report = if cli.json {
        crawl(source, JsonLinesSink::new(output), config, cancel).await?
    } else {
        let sink = TableSink::new(output)
            .await
            .with_context(|| format!("failed to write header to {}", output_path.display()))?;
        crawl(source, sink, config, cancel).await?
    };

    println!();
    println!("📊 Summary:");
    println!("   🌐 Checked: {}", report.dispatched);
    println!("   💾 Stored: {}", report.stored);
    println!("📄 Output stored in {}", output_path.display());
    info!(path = %output_path.display(), "output stored");

    Ok(0)
}

// Opens the URL file, failing with "file not found" if it doesn't exist
async fn open_source(path: &Path) -> Result<File> {
    tokio::fs::metadata(path)
        .await
        .with_context(|| format!("file not found: {}", path.display()))?;

    File::open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))
}

async fn crawl<S: Sink>(
    source: File,
    sink: S,
    config: CrawlerConfig,
    cancel: CancellationToken,
) -> Result<CrawlReport> {
    let crawler = Crawler::new(source, sink, config)?;
    let report = crawler.crawl(cancel).await.context("crawl failed")?;
    Ok(report)
}

// First Ctrl-C cancels the crawl; in-flight requests are aborted
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling crawl");
            cancel.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_source(&dir.path().join("nope.txt")).await.unwrap_err();
        assert!(err.to_string().starts_with("file not found"));
    }

    #[tokio::test]
    async fn test_crawl_writes_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("urls.txt");
        tokio::fs::write(&input, "").await.unwrap();
        let output_path = dir.path().join(cli::TABLE_OUTPUT);

        let source = open_source(&input).await.unwrap();
        let output = File::create(&output_path).await.unwrap();
        let sink = TableSink::new(output).await.unwrap();
        let report = crawl(source, sink, CrawlerConfig::default(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.stored, 0);
        let text = tokio::fs::read_to_string(&output_path).await.unwrap();
        assert!(text.starts_with("URL "));
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_crawl_error_keeps_cause() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("urls.txt");
        tokio::fs::write(&input, "pippo.pluto.paperino\n").await.unwrap();

        let source = open_source(&input).await.unwrap();
        let sink = JsonLinesSink::new(Vec::new());
        let err = crawl(source, sink, CrawlerConfig::default(), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("pippo.pluto.paperino"));
    }
}
