pub mod telegram;

use std::path::Path;

use async_trait::async_trait;

/// Messaging collaborator for the end-of-batch report.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, text: &str) -> anyhow::Result<()>;
    async fn send_document(&self, path: &Path) -> anyhow::Result<()>;
}

/// Fallback when no messaging credentials are configured: the report
/// goes to stdout so a batch still ends with a visible summary.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_text(&self, text: &str) -> anyhow::Result<()> {
        println!("{}", text);
        Ok(())
    }

    async fn send_document(&self, path: &Path) -> anyhow::Result<()> {
        let contents = tokio::fs::read_to_string(path).await?;
        println!("--- {} ---", path.display());
        println!("{}", contents);
        Ok(())
    }
}
