//! File relay: hand a Telegram file id to the bin channel and turn the
//! resulting message id into a watch/download link.

pub mod client;
pub mod orchestrator;
pub mod port;

pub use client::{RelayClient, RelayConfig, RelayFailure};
pub use orchestrator::{RelayError, RelayOrchestrator};
pub use port::{ChannelError, ChannelPort};
