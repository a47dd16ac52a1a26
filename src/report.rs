use std::path::Path;

use crate::core::outcome::OutcomeLog;
use crate::notify::telegram::TEXT_LIMIT;
use crate::notify::Notifier;

/// Dispatch the end-of-batch report and clear the outcome log. Each
/// non-empty sequence goes out as its own message; a block too large
/// for a text message is sent as the underlying log file instead. A
/// failed send is logged and never blocks the clear, so the next batch
/// always starts clean.
pub async fn dispatch(log: &mut OutcomeLog, notifier: &dyn Notifier) {
    if !log.successes().is_empty() {
        let text = render_block("✅ Success links:", log.successes());
        send_block(notifier, &text, &log.success_path()).await;
    }
    if !log.failures().is_empty() {
        let text = render_block("❌ Failed links:", log.failures());
        send_block(notifier, &text, &log.failure_path()).await;
    }

    if let Err(e) = log.clear() {
        tracing::warn!("failed to clear outcome logs: {}", e);
    }
}

fn render_block(title: &str, entries: &[String]) -> String {
    let mut text = String::from(title);
    for entry in entries {
        text.push('\n');
        text.push_str(entry);
    }
    text
}

async fn send_block(notifier: &dyn Notifier, text: &str, file: &Path) {
    let result = if text.chars().count() <= TEXT_LIMIT {
        notifier.send_text(text).await
    } else {
        notifier.send_document(file).await
    };

    if let Err(e) = result {
        tracing::warn!("report dispatch failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::link::Outcome;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingNotifier {
        texts: Mutex<Vec<String>>,
        documents: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_text(&self, text: &str) -> anyhow::Result<()> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_document(&self, path: &Path) -> anyhow::Result<()> {
            self.documents.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_text(&self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("network down")
        }

        async fn send_document(&self, _path: &Path) -> anyhow::Result<()> {
            anyhow::bail!("network down")
        }
    }

    #[test]
    fn block_renders_title_and_entries() {
        let entries = vec!["a:https://x/a".to_string(), "b:https://x/b".to_string()];
        assert_eq!(
            render_block("✅ Success links:", &entries),
            "✅ Success links:\na:https://x/a\nb:https://x/b"
        );
    }

    #[tokio::test]
    async fn dispatch_sends_one_message_per_nonempty_sequence() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Success, "a:https://x/a").unwrap();
        log.record(Outcome::Failure, "b:https://x/b").unwrap();

        let notifier = RecordingNotifier::default();
        dispatch(&mut log, &notifier).await;

        let texts = notifier.texts.lock().unwrap();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("✅"));
        assert!(texts[0].contains("a:https://x/a"));
        assert!(texts[1].starts_with("❌"));
        assert!(texts[1].contains("b:https://x/b"));
    }

    #[tokio::test]
    async fn dispatch_skips_empty_sequences_and_clears() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Success, "a:https://x/a").unwrap();

        let notifier = RecordingNotifier::default();
        dispatch(&mut log, &notifier).await;

        assert_eq!(notifier.texts.lock().unwrap().len(), 1);
        assert!(log.is_empty());
        assert!(!log.success_path().exists());
    }

    #[tokio::test]
    async fn oversized_block_goes_out_as_document() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        let long_name = "n".repeat(600);
        for i in 0..10 {
            log.record(Outcome::Success, &format!("{}{}:https://x/{}", long_name, i, i))
                .unwrap();
        }

        let notifier = RecordingNotifier::default();
        dispatch(&mut log, &notifier).await;

        assert!(notifier.texts.lock().unwrap().is_empty());
        let documents = notifier.documents.lock().unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].ends_with("success_links.txt"));
    }

    #[tokio::test]
    async fn failed_send_still_clears_log() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Failure, "a:https://x/a").unwrap();

        dispatch(&mut log, &FailingNotifier).await;

        assert!(log.is_empty());
        assert!(!log.failure_path().exists());
    }
}
