//! The types module contains all of the types relevant to the proposal game.

use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The [Claim] type represents the output root claimed by a proposal at its sequence number.
pub type Claim = H256;

/// The stable handle assigned to a game by the factory.
pub type GameIndex = u32;

/// The implementation type of a game, as tracked by the factory and registry.
pub type GameType = u32;

/// The [GameStatus] enum is the verdict of a [crate::proposal::ProposalGame].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameStatus {
    #[default]
    InProgress = 0,
    ChallengerWins = 1,
    DefenderWins = 2,
}

impl TryFrom<u8> for GameStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameStatus::InProgress),
            1 => Ok(GameStatus::ChallengerWins),
            2 => Ok(GameStatus::DefenderWins),
            _ => Err(value),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "IN_PROGRESS"),
            GameStatus::ChallengerWins => write!(f, "CHALLENGER_WINS"),
            GameStatus::DefenderWins => write!(f, "DEFENDER_WINS"),
        }
    }
}

/// The two independent proof systems a game accepts evidence from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ProofType {
    Tee = 0,
    Zk = 1,
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofType::Tee => write!(f, "TEE"),
            ProofType::Zk => write!(f, "ZK"),
        }
    }
}

/// An output root paired with the sequence number it commits to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRoot {
    /// The output root hash.
    pub root: Claim,
    /// The L2 sequence number of the output root.
    pub sequence_number: u64,
}

impl OutputRoot {
    pub fn new(root: Claim, sequence_number: u64) -> Self {
        Self {
            root,
            sequence_number,
        }
    }
}

/// The [Deadline] is the expected resolution time of a game. It stays [Deadline::Unresolved]
/// until the first proof lands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    #[default]
    Unresolved,
    At(u64),
}

impl Deadline {
    /// Returns true once `now` has reached the deadline. An unresolved deadline never passes.
    pub fn has_passed(&self, now: u64) -> bool {
        match self {
            Deadline::Unresolved => false,
            Deadline::At(at) => now >= *at,
        }
    }

    /// Returns the earlier of the two deadlines.
    pub fn min(self, other: Deadline) -> Deadline {
        match (self, other) {
            (Deadline::Unresolved, d) | (d, Deadline::Unresolved) => d,
            (Deadline::At(a), Deadline::At(b)) => Deadline::At(a.min(b)),
        }
    }
}

/// The [ProvingData] struct tracks who has proven or countered a game, and when it is expected to
/// resolve.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvingData {
    /// The game that successfully challenged this one, if any.
    pub countered_by: Option<GameIndex>,
    /// The submitter of the accepted TEE proof.
    pub tee_prover: Option<Address>,
    /// The submitter of the accepted ZK proof.
    pub zk_prover: Option<Address>,
    /// The expected resolution time. Only ever moves earlier once set.
    pub expected_resolution: Deadline,
}

impl ProvingData {
    /// Returns the recorded prover for the given [ProofType].
    pub fn prover(&self, proof_type: ProofType) -> Option<Address> {
        match proof_type {
            ProofType::Tee => self.tee_prover,
            ProofType::Zk => self.zk_prover,
        }
    }

    /// Returns the number of proof kinds recorded.
    pub fn proof_count(&self) -> usize {
        self.tee_prover.is_some() as usize + self.zk_prover.is_some() as usize
    }

    /// Returns true if at least one proof kind is recorded.
    pub fn has_any_proof(&self) -> bool {
        self.proof_count() > 0
    }
}

/// Notifications emitted by successful game transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Proved {
        game: GameIndex,
        prover: Address,
        proof_type: ProofType,
    },
    Challenged {
        game: GameIndex,
        challenger: GameIndex,
    },
    Nullified {
        game: GameIndex,
        nullifier: GameIndex,
        proof_type: ProofType,
    },
    Resolved {
        game: GameIndex,
        status: GameStatus,
    },
    CreditClaimed {
        game: GameIndex,
        recipient: Address,
        amount: U256,
    },
    GameClosed {
        game: GameIndex,
        anchor_updated: bool,
    },
}
