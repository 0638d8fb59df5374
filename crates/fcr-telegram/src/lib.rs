//! Telegram adapter (teloxide).
//!
//! This crate implements the `fcr-core` ChannelPort over the Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::InputFile, RequestError};
use tracing::{debug, info};

use fcr_core::{
    config::TelegramCredentials,
    domain::{ChannelMessageRef, ChatId, FileId},
    relay::port::{ChannelError, ChannelPort},
};

#[derive(Clone)]
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_credentials(creds: &TelegramCredentials) -> Self {
        debug!(api_id = creds.api_id, "building telegram bot client");
        Self::new(Bot::new(creds.bot_token.clone()))
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: RequestError) -> ChannelError {
        match e {
            RequestError::RetryAfter(wait) => ChannelError::RetryAfter(wait),
            other => ChannelError::Api(format!("telegram error: {other}")),
        }
    }
}

#[async_trait]
impl ChannelPort for TelegramChannel {
    async fn connect(&self) -> Result<(), ChannelError> {
        let me = self.bot.get_me().await.map_err(Self::map_err)?;
        info!(username = %me.username(), "telegram bot authorized");
        Ok(())
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        file_id: &FileId,
    ) -> Result<ChannelMessageRef, ChannelError> {
        let msg = self
            .bot
            .send_video(Self::tg_chat(chat_id), InputFile::file_id(file_id.as_str()))
            .await
            .map_err(Self::map_err)?;
        Ok(ChannelMessageRef(msg.id.0))
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        file_id: &FileId,
    ) -> Result<ChannelMessageRef, ChannelError> {
        let msg = self
            .bot
            .send_document(Self::tg_chat(chat_id), InputFile::file_id(file_id.as_str()))
            .await
            .map_err(Self::map_err)?;
        Ok(ChannelMessageRef(msg.id.0))
    }

    async fn disconnect(&self) -> Result<(), ChannelError> {
        // The Bot API is stateless HTTPS; `close`/`logOut` would deregister the
        // bot from the cloud server, so there is nothing to tear down here.
        debug!("telegram bot client released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use teloxide::ApiError;

    #[test]
    fn flood_wait_carries_its_duration() {
        let err = TelegramChannel::map_err(RequestError::RetryAfter(Duration::from_secs(2)));
        assert_eq!(err, ChannelError::RetryAfter(Duration::from_secs(2)));
    }

    #[test]
    fn api_errors_are_not_throttles() {
        let err = TelegramChannel::map_err(RequestError::Api(ApiError::WrongFileId));
        match err {
            ChannelError::Api(msg) => assert!(msg.starts_with("telegram error:"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn disconnect_is_a_no_op() {
        let channel = TelegramChannel::new(Bot::new("1:TEST"));
        assert_eq!(channel.disconnect().await, Ok(()));
    }
}
