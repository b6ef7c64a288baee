#![doc = include_str!("../README.md")]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

mod arena;
pub use arena::{game_uuid, ArenaError, GameArena, GameStore};

mod config;
pub use config::{DriverConfig, WorldConfig};

mod drivers;
pub use drivers::*;

mod registry;
pub use registry::{MemoryRegistry, RegistryConfig};

mod treasury;
pub use treasury::Treasury;

mod types;
pub use types::{DriverMessage, Request, Response};

mod verifier;
pub use verifier::MockVerifier;

/// The [Driver] trait defines the interface for all driver loops that are ran by the `op-proposal`
/// binary.
#[async_trait]
pub trait Driver {
    /// Starts the [Driver] loop.
    async fn start_loop(self) -> Result<()>;
}

/// The [DriverHandle] submits [Request]s to a running driver loop and waits for their outcome.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    sender: mpsc::Sender<DriverMessage>,
}

impl DriverHandle {
    /// Creates a handle that submits requests over the given channel.
    pub fn new(sender: mpsc::Sender<DriverMessage>) -> Self {
        Self { sender }
    }

    /// Sends a [Request] and waits for its [Response].
    ///
    /// ### Returns
    /// - `Ok(Response)`: The request succeeded.
    /// - `Err(anyhow::Error)`: The request was rejected, or the driver loop is gone.
    pub async fn request(&self, request: Request) -> Result<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send((request, reply_tx))
            .await
            .map_err(|_| anyhow!("driver loop is not running"))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("driver loop dropped the request"))?
    }
}

impl From<&DriverConfig> for DriverHandle {
    fn from(config: &DriverConfig) -> Self {
        Self::new(config.request_sender.clone())
    }
}
