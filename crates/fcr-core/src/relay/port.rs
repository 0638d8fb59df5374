use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ChannelMessageRef, ChatId, FileId};

/// Failure reported by a channel implementation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// Flood control: the channel refuses work until the given delay has passed.
    #[error("flood wait: retry after {0:?}")]
    RetryAfter(Duration),

    #[error("channel api error: {0}")]
    Api(String),
}

/// Port for the external bot channel that receives relayed files.
///
/// Implementations must be safe for concurrent sends; the relay client does not
/// serialize access beyond the connect guard.
#[async_trait]
pub trait ChannelPort: Send + Sync {
    /// Establish (or verify) the connection. Must be idempotent.
    async fn connect(&self) -> Result<(), ChannelError>;

    async fn send_video(
        &self,
        chat_id: ChatId,
        file_id: &FileId,
    ) -> Result<ChannelMessageRef, ChannelError>;

    async fn send_document(
        &self,
        chat_id: ChatId,
        file_id: &FileId,
    ) -> Result<ChannelMessageRef, ChannelError>;

    async fn disconnect(&self) -> Result<(), ChannelError>;
}
