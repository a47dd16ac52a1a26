use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::core::direct::DirectDownloader;
use crate::core::pipeline::Pipeline;
use crate::core::youtube::YoutubeDownloader;
use crate::notify::telegram::TelegramNotifier;
use crate::notify::{ConsoleNotifier, Notifier};

pub mod chooser;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod notify;
pub mod report;
pub mod storage;

/// Interactive entry point: one prompt, one batch, one report.
/// Per-link failures are report content, not process failures, so a
/// completed batch always exits 0.
pub async fn run() -> anyhow::Result<()> {
    let config = config::load();

    let input = prompt("Enter a URL or the path to a name:url list: ").await?;
    let lines = collect_lines(&input).await?;
    if lines.is_empty() {
        println!("Nothing to do.");
        return Ok(());
    }

    let client = reqwest::Client::builder().build()?;
    let storage = storage::from_config(&config.storage, client.clone());
    if let Err(e) = storage.ensure_root().await {
        tracing::warn!("storage root unavailable, uploads will fail: {}", e);
    }

    let mut pipeline = Pipeline::new(
        config.download_dir.clone(),
        Arc::new(DirectDownloader::new(client)),
        Arc::new(YoutubeDownloader::new()),
        Arc::new(chooser::StdinChooser),
        storage,
    );

    tracing::info!(count = lines.len(), "starting batch");
    pipeline.run_batch(&lines).await;
    println!("\nDownload completed.");

    let notifier: Box<dyn Notifier> = if config.telegram.is_configured() {
        Box::new(TelegramNotifier::new(&config.telegram))
    } else {
        tracing::info!("telegram not configured, reporting to stdout");
        Box::new(ConsoleNotifier)
    };

    let log = pipeline.outcome_log_mut();
    tracing::info!(
        ok = log.successes().len(),
        failed = log.failures().len(),
        "batch finished"
    );
    report::dispatch(log, notifier.as_ref()).await;

    Ok(())
}

async fn prompt(message: &str) -> anyhow::Result<String> {
    let message = message.to_string();
    let line = tokio::task::spawn_blocking(move || {
        print!("{}", message);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok::<_, io::Error>(line)
    })
    .await??;
    Ok(line.trim().to_string())
}

/// A path to an existing file expands to its non-empty lines; anything
/// else is treated as a single URL.
async fn collect_lines(input: &str) -> anyhow::Result<Vec<String>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    if Path::new(input).is_file() {
        let raw = tokio::fs::read_to_string(input).await?;
        return Ok(raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect());
    }

    Ok(vec![input.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn single_url_becomes_one_line() {
        let lines = collect_lines("https://example.com/a.png").await.unwrap();
        assert_eq!(lines, ["https://example.com/a.png"]);
    }

    #[tokio::test]
    async fn file_input_expands_to_trimmed_lines() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("links.txt");
        std::fs::write(&list, "a:https://x/a\n\n  b:https://x/b  \n").unwrap();

        let lines = collect_lines(list.to_str().unwrap()).await.unwrap();
        assert_eq!(lines, ["a:https://x/a", "b:https://x/b"]);
    }

    #[tokio::test]
    async fn empty_input_yields_no_lines() {
        assert!(collect_lines("").await.unwrap().is_empty());
    }
}
