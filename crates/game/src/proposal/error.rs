//! Errors returned by the proposal game and its collaborators.

use super::{GameIndex, GameStatus, ProofType};
use ethers::types::{Address, U256};
use thiserror::Error;

/// Broad classification of a [GameError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed creation payload or unexpected sequence number.
    Shape,
    /// Wrong caller for a restricted action.
    Authorization,
    /// The game is not in a state that permits the action.
    StateConflict,
    /// A parent or counter game fails the linkage rules.
    Linkage,
    /// Bond settlement failed.
    Settlement,
}

/// Failures of a single game operation. A failed operation never changes game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("extra data must be {expected} bytes, got {actual}")]
    BadExtraData { expected: usize, actual: usize },
    #[error("unexpected sequence number: expected {expected}, got {actual}")]
    UnexpectedSequenceNumber { expected: u64, actual: u64 },
    #[error("sequence number does not fit in 64 bits")]
    SequenceNumberOverflow,

    #[error("caller {0:?} is not the TEE proposer")]
    BadAuth(Address),

    #[error("game already initialized")]
    AlreadyInitialized,
    #[error("game not initialized")]
    NotInitialized,
    #[error("{0} proof already provided")]
    AlreadyProven(ProofType),
    #[error("no proof provided")]
    NoProofProvided,
    #[error("game is over")]
    GameOver,
    #[error("game is not over")]
    GameNotOver,
    #[error("game status is {0}")]
    InvalidStatus(GameStatus),
    #[error("parent game is not resolved")]
    ParentNotResolved,
    #[error("game is not resolved")]
    NotResolved,
    #[error("game is not finalized")]
    NotFinalized,
    #[error("registry is paused")]
    Paused,
    #[error("game {0} is blacklisted or retired")]
    InvalidGame(GameIndex),
    #[error("game is missing a TEE proof")]
    MissingTeeProof,
    #[error("game already holds a ZK proof and can only be nullified")]
    ZkProven,

    #[error("invalid parent game {0}")]
    InvalidParentGame(GameIndex),
    #[error("parent game has challenger wins status")]
    InvalidParentStatus,
    #[error("unknown counter game {0}")]
    UnknownGame(GameIndex),
    #[error("counter game {0} is not respected, blacklisted, or retired")]
    InvalidCounterGame(GameIndex),
    #[error("parent index mismatch")]
    ParentIndexMismatch,
    #[error("sequence number mismatch: {0} != {1}")]
    SequenceNumberMismatch(u64, u64),
    #[error("counter game makes the same claim")]
    ClaimsMatch,
    #[error("game {0} holds no {1} proof")]
    MissingProof(GameIndex, ProofType),
    #[error("{0} verifier rejected the proof")]
    InvalidProof(ProofType),

    #[error("no credit recipient")]
    NoCreditRecipient,
    #[error("no credit to claim")]
    NoCredit,
    #[error("counter game {0} has not won")]
    CounterGameNotFinalized(GameIndex),
    #[error("bond transfer of {amount} to {recipient:?} failed: {source}")]
    TransferFailed {
        recipient: Address,
        amount: U256,
        source: TransferError,
    },
}

impl GameError {
    /// Returns the [ErrorCategory] of the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GameError::BadExtraData { .. }
            | GameError::UnexpectedSequenceNumber { .. }
            | GameError::SequenceNumberOverflow => ErrorCategory::Shape,
            GameError::BadAuth(_) => ErrorCategory::Authorization,
            GameError::InvalidParentGame(_)
            | GameError::InvalidParentStatus
            | GameError::UnknownGame(_)
            | GameError::InvalidCounterGame(_)
            | GameError::ParentIndexMismatch
            | GameError::SequenceNumberMismatch(..)
            | GameError::ClaimsMatch
            | GameError::MissingProof(..)
            | GameError::InvalidProof(_) => ErrorCategory::Linkage,
            GameError::NoCreditRecipient
            | GameError::NoCredit
            | GameError::CounterGameNotFinalized(_)
            | GameError::TransferFailed { .. } => ErrorCategory::Settlement,
            _ => ErrorCategory::StateConflict,
        }
    }
}

/// Failures reported by an [crate::proposal::AnchorStateRegistry] when promoting an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("game {0} is not a valid anchor candidate")]
    InvalidAnchorGame(GameIndex),
    #[error("game {game} at sequence {sequence_number} does not advance the anchor at {anchor}")]
    StaleAnchor {
        game: GameIndex,
        sequence_number: u64,
        anchor: u64,
    },
}

/// Failures reported by a [crate::proposal::BondVault].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("recipient {0:?} rejected the transfer")]
    Rejected(Address),
    #[error("insufficient custody balance")]
    InsufficientFunds,
}
