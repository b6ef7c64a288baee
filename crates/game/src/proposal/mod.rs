//! Data structures, collaborator interfaces, and the state machine for the TEE/ZK proposal game.

mod types;
pub use types::*;

mod error;
pub use error::{ErrorCategory, GameError, RegistryError, TransferError};

mod extra_data;
pub use extra_data::{ExtraData, EXTRA_DATA_LEN, NO_PARENT};

mod digest;
pub use digest::{binding_digest, binding_preimage, BindingFields, BINDING_PREIMAGE_LEN};

mod params;
pub use params::{GameParams, ParamsError};

mod traits;
pub use traits::{AnchorStateRegistry, BondVault, GameContext, GameFactory, ProofVerifier};

mod game;
pub use game::ProposalGame;
