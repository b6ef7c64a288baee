//! The registry module holds the [MemoryRegistry], an in-memory [AnchorStateRegistry].

use op_proposal_game::proposal::{
    AnchorStateRegistry, GameIndex, GameStatus, GameType, OutputRoot, ProposalGame,
    RegistryError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bootstrap values for a [MemoryRegistry].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The initial anchor output root.
    pub anchor: OutputRoot,
    /// The respected game type.
    pub respected_game_type: GameType,
    /// Seconds a resolved game must wait before it is considered finalized.
    #[serde(default)]
    pub finality_delay: u64,
}

/// The [MemoryRegistry] tracks the anchor state, the respected game type, and which games the
/// guardian has blacklisted or retired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRegistry {
    anchor: OutputRoot,
    anchor_game: Option<GameIndex>,
    respected_game_type: GameType,
    finality_delay: u64,
    paused: bool,
    blacklist: BTreeSet<GameIndex>,
    retirement_timestamp: Option<u64>,
}

impl MemoryRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            anchor: config.anchor,
            anchor_game: None,
            respected_game_type: config.respected_game_type,
            finality_delay: config.finality_delay,
            paused: false,
            blacklist: BTreeSet::new(),
            retirement_timestamp: None,
        }
    }

    /// Blacklists a game. Blacklisted games can no longer seed children or counter other games,
    /// and their children resolve as [GameStatus::ChallengerWins].
    pub fn blacklist(&mut self, index: GameIndex) {
        tracing::warn!(target: "anchor-registry", "Blacklisting game {}", index);
        self.blacklist.insert(index);
    }

    /// Retires every game created at or before `timestamp`.
    pub fn retire_games(&mut self, timestamp: u64) {
        tracing::warn!(target: "anchor-registry", "Retiring games created at or before {}", timestamp);
        self.retirement_timestamp = Some(timestamp);
    }

    pub fn set_respected_game_type(&mut self, game_type: GameType) {
        tracing::info!(target: "anchor-registry", "Respected game type set to {}", game_type);
        self.respected_game_type = game_type;
    }

    pub fn set_paused(&mut self, paused: bool) {
        tracing::info!(target: "anchor-registry", "Paused: {}", paused);
        self.paused = paused;
    }

    /// Returns the game whose claim is the current anchor, if the anchor has moved since
    /// bootstrap.
    pub fn anchor_game(&self) -> Option<GameIndex> {
        self.anchor_game
    }

    /// Returns true if the game's claim may become the anchor at `now`.
    pub fn is_game_claim_valid(&self, game: &ProposalGame, now: u64) -> bool {
        self.is_game_proper(game)
            && self.is_game_finalized(game, now)
            && game.status() == GameStatus::DefenderWins
    }
}

impl AnchorStateRegistry for MemoryRegistry {
    fn is_game_respected(&self, game: &ProposalGame) -> bool {
        game.was_respected_game_type_when_created()
    }

    fn is_game_blacklisted(&self, game: &ProposalGame) -> bool {
        self.blacklist.contains(&game.index())
    }

    fn is_game_retired(&self, game: &ProposalGame) -> bool {
        self.retirement_timestamp
            .map_or(false, |retired| game.created_at() <= retired)
    }

    fn is_game_finalized(&self, game: &ProposalGame, now: u64) -> bool {
        game.resolved_at()
            .map_or(false, |resolved| now.saturating_sub(resolved) > self.finality_delay)
    }

    fn anchor_root(&self) -> OutputRoot {
        self.anchor
    }

    fn respected_game_type(&self) -> GameType {
        self.respected_game_type
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn set_anchor_state(&mut self, game: &ProposalGame, now: u64) -> Result<(), RegistryError> {
        if !self.is_game_claim_valid(game, now) {
            return Err(RegistryError::InvalidAnchorGame(game.index()));
        }
        if game.sequence_number() <= self.anchor.sequence_number {
            return Err(RegistryError::StaleAnchor {
                game: game.index(),
                sequence_number: game.sequence_number(),
                anchor: self.anchor.sequence_number,
            });
        }

        self.anchor = OutputRoot::new(game.root_claim(), game.sequence_number());
        self.anchor_game = Some(game.index());
        tracing::info!(
            target: "anchor-registry",
            "Anchor moved to game {} ({:?}@{})",
            game.index(),
            self.anchor.root,
            self.anchor.sequence_number
        );
        Ok(())
    }
}
