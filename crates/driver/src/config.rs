//! The `config` module contains the [DriverConfig].

use crate::{registry::RegistryConfig, verifier::MockVerifier, DriverMessage};
use op_proposal_game::proposal::GameParams;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};

/// Default capacity of the request channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// The [WorldConfig] struct is the serializable part of the configuration: everything needed to
/// bootstrap a [crate::GameArena].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Parameters shared by every game.
    pub params: GameParams,
    /// Bootstrap values for the anchor state registry.
    pub registry: RegistryConfig,
    /// How the TEE verifier decides proofs.
    #[serde(default)]
    pub tee_verifier: MockVerifier,
    /// How the ZK verifier decides proofs.
    #[serde(default)]
    pub zk_verifier: MockVerifier,
    /// The clock value the arena starts at.
    #[serde(default)]
    pub start_time: u64,
}

/// The [DriverConfig] struct contains the configuration for the [Driver](crate::Driver)
/// implementations.
pub struct DriverConfig {
    /// The world the driver simulates.
    pub world: WorldConfig,
    /// The sending handle of the MPSC channel used to submit requests.
    pub request_sender: mpsc::Sender<DriverMessage>,
    /// The receiving handle of the MPSC channel used to submit requests.
    pub request_receiver: Mutex<mpsc::Receiver<DriverMessage>>,
}

impl DriverConfig {
    /// Creates a new [DriverConfig] with the given configuration.
    pub fn new(world: WorldConfig) -> Self {
        Self::with_capacity(world, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new [DriverConfig] whose request channel holds at most `capacity` pending
    /// requests.
    pub fn with_capacity(world: WorldConfig, capacity: usize) -> Self {
        let (request_sender, request_receiver) = mpsc::channel(capacity);

        Self {
            world,
            request_sender,
            request_receiver: Mutex::new(request_receiver),
        }
    }
}
