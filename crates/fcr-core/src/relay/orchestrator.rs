use std::{sync::Arc, time::Duration};

use tracing::{error, info, warn};

use crate::{
    domain::{ChannelMessageRef, FileId, Operation},
    relay::client::{RelayClient, RelayFailure},
};

/// Request-level relay error. Each variant maps to one fixed user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("File ID is required")]
    MissingFileId,

    #[error("Failed to process the file for {}.", .0.failure_noun())]
    Failed(Operation),

    #[error("An internal server error occurred.")]
    Internal,
}

impl RelayError {
    /// Whether the caller is at fault (as opposed to the relay or the server).
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::MissingFileId)
    }
}

/// Turns one inbound watch/download request into a redirect target.
pub struct RelayOrchestrator {
    client: Arc<RelayClient>,
    public_base_url: String,
    timeout: Option<Duration>,
}

impl RelayOrchestrator {
    pub fn new(client: Arc<RelayClient>, public_base_url: impl Into<String>) -> Self {
        let timeout = client.config().timeout;
        Self {
            client,
            public_base_url: public_base_url.into(),
            timeout,
        }
    }

    /// Relay `raw_file_id` and return the URL the caller should be redirected to.
    ///
    /// Blank ids are rejected before the channel is contacted. The relay runs on
    /// its own task so a panic inside an adapter surfaces as `Internal` instead
    /// of tearing down the request handler.
    pub async fn handle(&self, op: Operation, raw_file_id: &str) -> Result<String, RelayError> {
        let file_id = FileId::parse(raw_file_id).ok_or(RelayError::MissingFileId)?;

        let client = Arc::clone(&self.client);
        let task_file_id = file_id.clone();
        let mut task = tokio::spawn(async move { client.relay(&task_file_id).await });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    warn!(%file_id, op = op.path_segment(), ?limit, "relay deadline exceeded");
                    return Err(RelayError::Failed(op));
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(msg)) => {
                let url = self.redirect_url(op, msg);
                info!(%file_id, op = op.path_segment(), message_id = msg.0, "relay succeeded");
                Ok(url)
            }
            Ok(Err(RelayFailure::Connect(msg))) => {
                error!(
                    %file_id,
                    op = op.path_segment(),
                    error = %msg,
                    "relay channel unavailable"
                );
                Err(RelayError::Internal)
            }
            Ok(Err(failure)) => {
                warn!(%file_id, op = op.path_segment(), error = %failure, "relay failed");
                Err(RelayError::Failed(op))
            }
            Err(join_err) => {
                error!(%file_id, op = op.path_segment(), error = %join_err, "relay task died");
                Err(RelayError::Internal)
            }
        }
    }

    pub fn redirect_url(&self, op: Operation, msg: ChannelMessageRef) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            op.path_segment(),
            msg
        )
    }
}
