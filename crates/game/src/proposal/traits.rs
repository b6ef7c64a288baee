//! The traits module holds the interfaces of the collaborators a [ProposalGame] consults.

use super::{GameIndex, GameParams, GameType, OutputRoot, ProposalGame, RegistryError, TransferError};
use ethers::types::{Address, Bytes, H256, U256};

/// The [GameFactory] trait is the read side of the factory that created a game. All
/// cross-game reads go through it by index.
pub trait GameFactory {
    /// Fetch the game created at the given index.
    ///
    /// ### Takes
    /// - `index`: The factory index of the game.
    ///
    /// ### Returns
    /// - `Some(&ProposalGame)`: The game at the index.
    /// - `None`: No game was created at the index.
    fn game_at_index(&self, index: GameIndex) -> Option<&ProposalGame>;
}

/// The [AnchorStateRegistry] trait tracks which games the system currently trusts and the
/// most recently finalized output root.
pub trait AnchorStateRegistry {
    /// Returns true if the game's type was the respected type when it was created.
    fn is_game_respected(&self, game: &ProposalGame) -> bool;

    /// Returns true if the game has been blacklisted.
    fn is_game_blacklisted(&self, game: &ProposalGame) -> bool;

    /// Returns true if the game was created at or before the retirement timestamp.
    fn is_game_retired(&self, game: &ProposalGame) -> bool;

    /// Returns true if the game resolved long enough ago to be considered final at `now`.
    fn is_game_finalized(&self, game: &ProposalGame, now: u64) -> bool;

    /// Returns the current anchor output root.
    fn anchor_root(&self) -> OutputRoot;

    /// Returns the game type currently respected by the system.
    fn respected_game_type(&self) -> GameType;

    /// Returns true if the system is paused.
    fn paused(&self) -> bool;

    /// Attempt to promote the game's claim to the new anchor.
    ///
    /// ### Takes
    /// - `game`: The candidate game.
    /// - `now`: The current timestamp.
    ///
    /// ### Returns
    /// - `Ok(())`: The anchor now points at the game's claim.
    /// - `Err(RegistryError)`: The game is not eligible to become the anchor.
    fn set_anchor_state(&mut self, game: &ProposalGame, now: u64) -> Result<(), RegistryError>;

    /// Returns true if the game is respected, and neither blacklisted nor retired.
    fn is_game_proper(&self, game: &ProposalGame) -> bool {
        self.is_game_respected(game)
            && !self.is_game_blacklisted(game)
            && !self.is_game_retired(game)
    }
}

/// The [ProofVerifier] trait is an external proof system. Evidence is opaque to the game.
pub trait ProofVerifier {
    /// Returns true if `evidence` proves the statement committed to by `digest`.
    fn verify(&self, evidence: &Bytes, digest: H256) -> bool;
}

/// The [BondVault] trait moves settled bonds out of custody.
pub trait BondVault {
    /// Pay `amount` to `recipient`.
    fn transfer(&mut self, recipient: Address, amount: U256) -> Result<(), TransferError>;
}

/// The [GameContext] bundles the read-only view of the world a single game operation runs
/// against.
#[derive(Clone, Copy)]
pub struct GameContext<'a> {
    /// The current timestamp.
    pub now: u64,
    /// Shared game parameters.
    pub params: &'a GameParams,
    /// Lookup of sibling and parent games.
    pub factory: &'a dyn GameFactory,
    /// The anchor state registry.
    pub registry: &'a dyn AnchorStateRegistry,
    /// The TEE proof verifier.
    pub tee_verifier: &'a dyn ProofVerifier,
    /// The ZK proof verifier.
    pub zk_verifier: &'a dyn ProofVerifier,
}
