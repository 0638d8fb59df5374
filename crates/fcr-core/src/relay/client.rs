use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    domain::{ChannelMessageRef, ChatId, FileId},
    relay::port::{ChannelError, ChannelPort},
};

#[derive(Clone, Debug, Default)]
pub struct RelayConfig {
    /// Upper bound on flood-wait restarts for one relay. `None` retries forever.
    pub max_throttle_retries: Option<u32>,
    /// Per-request deadline applied by the orchestrator. `None` waits forever.
    pub timeout: Option<Duration>,
}

/// Terminal outcome of a relay that did not produce a message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelayFailure {
    #[error("failed to connect to channel: {0}")]
    Connect(String),

    #[error("failed to send file as both video and document")]
    BothModalitiesFailed,

    #[error("still throttled after {retries} retries")]
    Throttled { retries: u32 },
}

/// Why a single connect/video/document pass stopped.
enum Interrupt {
    Throttled(Duration),
    Failed(RelayFailure),
}

/// Relays file ids into the bin channel over one shared connection.
///
/// The connection is opened lazily on first use. Concurrent first callers wait
/// on the same connect instead of each opening their own.
pub struct RelayClient {
    channel: Arc<dyn ChannelPort>,
    chat_id: ChatId,
    cfg: RelayConfig,
    connected: AtomicBool,
    connect_lock: Mutex<()>,
}

impl RelayClient {
    pub fn new(channel: Arc<dyn ChannelPort>, chat_id: ChatId, cfg: RelayConfig) -> Self {
        Self {
            channel,
            chat_id,
            cfg,
            connected: AtomicBool::new(false),
            connect_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.cfg
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Connect if not already connected. Safe to call from many tasks at once.
    pub async fn connect(&self) -> Result<(), ChannelError> {
        if self.is_connected() {
            return Ok(());
        }

        let _guard = self.connect_lock.lock().await;
        if self.is_connected() {
            return Ok(());
        }

        self.channel.connect().await?;
        self.connected.store(true, Ordering::Release);
        info!(chat_id = self.chat_id.0, "relay channel connected");
        Ok(())
    }

    /// Close the connection on clean shutdown. No-op when never connected.
    pub async fn shutdown(&self) -> Result<(), ChannelError> {
        let _guard = self.connect_lock.lock().await;
        if !self.connected.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.channel.disconnect().await?;
        info!("relay channel disconnected");
        Ok(())
    }

    /// Relay `file_id` into the bin channel and return the new message id.
    ///
    /// A flood wait from the channel suspends for exactly the requested delay
    /// and restarts the whole sequence, connect check included.
    pub async fn relay(&self, file_id: &FileId) -> Result<ChannelMessageRef, RelayFailure> {
        let mut retries = 0u32;
        loop {
            match self.attempt(file_id).await {
                Ok(msg) => {
                    debug!(%file_id, message_id = msg.0, retries, "file relayed");
                    return Ok(msg);
                }
                Err(Interrupt::Failed(failure)) => return Err(failure),
                Err(Interrupt::Throttled(wait)) => {
                    if let Some(max) = self.cfg.max_throttle_retries {
                        if retries >= max {
                            warn!(%file_id, retries, "giving up relay under sustained flood wait");
                            return Err(RelayFailure::Throttled { retries });
                        }
                    }
                    retries += 1;
                    warn!(
                        %file_id,
                        wait_secs = wait.as_secs(),
                        retries,
                        "flood wait, sleeping before retry"
                    );
                    sleep(wait).await;
                }
            }
        }
    }

    async fn attempt(&self, file_id: &FileId) -> Result<ChannelMessageRef, Interrupt> {
        match self.connect().await {
            Ok(()) => {}
            Err(ChannelError::RetryAfter(wait)) => return Err(Interrupt::Throttled(wait)),
            Err(ChannelError::Api(msg)) => {
                warn!(%file_id, error = %msg, "relay channel connect failed");
                return Err(Interrupt::Failed(RelayFailure::Connect(msg)));
            }
        }

        let video_err = match self.channel.send_video(self.chat_id, file_id).await {
            Ok(msg) => return Ok(msg),
            Err(ChannelError::RetryAfter(wait)) => return Err(Interrupt::Throttled(wait)),
            Err(ChannelError::Api(msg)) => msg,
        };
        warn!(%file_id, error = %video_err, "send as video failed, trying document");

        match self.channel.send_document(self.chat_id, file_id).await {
            Ok(msg) => Ok(msg),
            Err(ChannelError::RetryAfter(wait)) => Err(Interrupt::Throttled(wait)),
            Err(ChannelError::Api(doc_err)) => {
                warn!(%file_id, error = %doc_err, "send as document failed");
                Err(Interrupt::Failed(RelayFailure::BothModalitiesFailed))
            }
        }
    }
}
