use ethers::types::{Address, Bytes, H256, U256};
use op_proposal_game::proposal::{GameEvent, GameIndex, GameType, ProofType, ProposalGame};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// A [Request] paired with the channel its outcome is returned on.
pub type DriverMessage = (Request, oneshot::Sender<anyhow::Result<Response>>);

/// The [Request] enum lists every action the driver loop performs against the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    /// Create a new game through the factory.
    Create {
        creator: Address,
        root_claim: H256,
        #[serde(default)]
        l1_head: H256,
        sequence_number: u64,
        #[serde(default)]
        parent_index: Option<GameIndex>,
        /// Defaults to the configured initial bond.
        #[serde(default)]
        bond: Option<U256>,
    },
    /// Submit a proof. Without explicit evidence, evidence accepted by a
    /// [crate::MockVerifier::MatchDigest] verifier is generated.
    Prove {
        game: GameIndex,
        prover: Address,
        proof_type: ProofType,
        #[serde(default)]
        evidence: Option<Bytes>,
    },
    Resolve {
        game: GameIndex,
    },
    Challenge {
        game: GameIndex,
        challenger: GameIndex,
    },
    Nullify {
        game: GameIndex,
        nullifier: GameIndex,
        proof_type: ProofType,
    },
    ClaimCredit {
        game: GameIndex,
    },
    CloseGame {
        game: GameIndex,
    },
    /// Advance the clock.
    Warp {
        seconds: u64,
    },
    Blacklist {
        game: GameIndex,
    },
    /// Retire every game created up to now.
    RetireGames,
    SetRespectedGameType {
        game_type: GameType,
    },
    SetPaused {
        paused: bool,
    },
    /// Make payouts to `account` fail, or succeed again.
    RejectTransfers {
        account: Address,
        reject: bool,
    },
    Query {
        game: GameIndex,
    },
    /// Stop the driver loop.
    Shutdown,
}

/// The successful outcome of a [Request].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Created { game: GameIndex },
    Event { event: GameEvent },
    Game { game: Box<ProposalGame> },
    Time { now: u64 },
    Done,
}
