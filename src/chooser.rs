use std::io::{self, Write};

use async_trait::async_trait;

use crate::core::traits::FormatChooser;
use crate::models::media::FormatInfo;

/// Interactive chooser: prints the format table once and blocks on a
/// stdin answer. An empty answer means "use the default selector".
pub struct StdinChooser;

#[async_trait]
impl FormatChooser for StdinChooser {
    async fn choose(&self, formats: &[FormatInfo]) -> anyhow::Result<Option<String>> {
        println!("Available formats:");
        for format in formats {
            println!("{}", format.describe());
        }

        let answer = tokio::task::spawn_blocking(|| {
            print!("Choose format ID (empty for best): ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            Ok::<_, io::Error>(line)
        })
        .await??;

        let answer = answer.trim();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer.to_string()))
        }
    }
}
