use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, Recipient};

use crate::config::TelegramConfig;
use crate::notify::Notifier;

/// Telegram caps message text at 4096 characters; longer payloads are
/// truncated before sending.
pub const TEXT_LIMIT: usize = 4096;

pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        let chat = match config.chat_id.parse::<i64>() {
            Ok(id) => Recipient::Id(ChatId(id)),
            Err(_) => Recipient::ChannelUsername(config.chat_id.clone()),
        };
        Self {
            bot: Bot::new(config.bot_token.clone()),
            chat,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, text: &str) -> anyhow::Result<()> {
        let text = truncate_chars(text, TEXT_LIMIT);
        self.bot.send_message(self.chat.clone(), text).await?;
        Ok(())
    }

    async fn send_document(&self, path: &Path) -> anyhow::Result<()> {
        self.bot
            .send_document(self.chat.clone(), InputFile::file(path.to_path_buf()))
            .await?;
        Ok(())
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
