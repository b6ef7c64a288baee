//! The game module holds the [ProposalGame] state machine.

use super::{
    binding_digest, AnchorStateRegistry, BindingFields, BondVault, Claim, Deadline, ExtraData,
    GameContext, GameError, GameEvent, GameFactory, GameIndex, GameParams, GameStatus, GameType,
    OutputRoot, ProofType, ProvingData,
};
use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

/// A single proposal: a claim that the output root at `sequence_number` is `root_claim`, built on
/// top of either a parent proposal or the registry anchor.
///
/// Every mutating method validates all of its preconditions before writing, so an `Err` always
/// leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalGame {
    index: GameIndex,
    game_type: GameType,
    creator: Address,
    root_claim: Claim,
    l1_head: H256,
    extra_data: Bytes,
    sequence_number: u64,
    parent_index: Option<GameIndex>,
    starting: OutputRoot,
    proving_data: ProvingData,
    status: GameStatus,
    created_at: u64,
    resolved_at: Option<u64>,
    bond_recipient: Option<Address>,
    balance: U256,
    was_respected_game_type_when_created: bool,
    initialized: bool,
}

impl ProposalGame {
    /// Creates an uninitialized game holding the creator's bond.
    pub fn new(
        index: GameIndex,
        game_type: GameType,
        creator: Address,
        root_claim: Claim,
        l1_head: H256,
        extra_data: Bytes,
        bond: U256,
    ) -> Self {
        Self {
            index,
            game_type,
            creator,
            root_claim,
            l1_head,
            extra_data,
            sequence_number: 0,
            parent_index: None,
            starting: OutputRoot::default(),
            proving_data: ProvingData::default(),
            status: GameStatus::InProgress,
            created_at: 0,
            resolved_at: None,
            bond_recipient: None,
            balance: bond,
            was_respected_game_type_when_created: false,
            initialized: false,
        }
    }

    /// Validates the creation payload and parent linkage, and fixes the starting reference.
    ///
    /// ### Takes
    /// - `ctx`: The [GameContext] to validate the parent against.
    ///
    /// ### Returns
    /// - `Ok(())`: The game is initialized.
    /// - `Err(GameError)`: The payload is malformed, the parent is unusable, or the sequence
    ///   number is not exactly one step past the starting reference.
    pub fn initialize(&mut self, ctx: &GameContext<'_>) -> Result<(), GameError> {
        if self.initialized {
            return Err(GameError::AlreadyInitialized);
        }

        let extra = ExtraData::decode(&self.extra_data)?;
        let starting = match extra.parent_index {
            Some(parent_index) => {
                let parent = ctx
                    .factory
                    .game_at_index(parent_index)
                    .ok_or(GameError::InvalidParentGame(parent_index))?;
                if !ctx.registry.is_game_proper(parent) {
                    return Err(GameError::InvalidParentGame(parent_index));
                }
                if parent.status == GameStatus::ChallengerWins {
                    return Err(GameError::InvalidParentStatus);
                }
                // A parent without any proof cannot vouch for its claim.
                if !parent.proving_data.has_any_proof() {
                    return Err(GameError::InvalidParentGame(parent_index));
                }
                OutputRoot::new(parent.root_claim, parent.sequence_number)
            }
            None => ctx.registry.anchor_root(),
        };

        let expected = starting
            .sequence_number
            .checked_add(ctx.params.sequence_step)
            .ok_or(GameError::SequenceNumberOverflow)?;
        if extra.sequence_number != expected {
            return Err(GameError::UnexpectedSequenceNumber {
                expected,
                actual: extra.sequence_number,
            });
        }

        self.sequence_number = extra.sequence_number;
        self.parent_index = extra.parent_index;
        self.starting = starting;
        self.created_at = ctx.now;
        self.proving_data.expected_resolution = Deadline::Unresolved;
        self.was_respected_game_type_when_created =
            self.game_type == ctx.registry.respected_game_type();
        self.initialized = true;

        tracing::info!(
            target: "proposal-game",
            "Initialized game {} claiming {:?} at sequence {} on top of {:?}@{}",
            self.index,
            self.root_claim,
            self.sequence_number,
            self.starting.root,
            self.starting.sequence_number
        );
        Ok(())
    }

    /// Submits a proof of the given kind on behalf of `caller`.
    ///
    /// ### Takes
    /// - `ctx`: The [GameContext] holding the verifiers.
    /// - `caller`: The submitter; bound into the proof digest.
    /// - `evidence`: The opaque proof bytes.
    /// - `proof_type`: Which proof system the evidence belongs to.
    ///
    /// ### Returns
    /// - `Ok(GameEvent::Proved)`: The proof was accepted and the deadline recomputed.
    /// - `Err(GameError)`: The game is over, the slot is taken, the caller is not allowed, or the
    ///   verifier rejected the evidence.
    pub fn prove(
        &mut self,
        ctx: &GameContext<'_>,
        caller: Address,
        evidence: &Bytes,
        proof_type: ProofType,
    ) -> Result<GameEvent, GameError> {
        self.ensure_initialized()?;
        if self.game_over(ctx.now) {
            return Err(GameError::GameOver);
        }

        let verifier = match proof_type {
            ProofType::Tee => {
                if caller != ctx.params.tee_proposer {
                    return Err(GameError::BadAuth(caller));
                }
                if self.proving_data.tee_prover.is_some() {
                    return Err(GameError::AlreadyProven(ProofType::Tee));
                }
                if self.status != GameStatus::InProgress {
                    return Err(GameError::InvalidStatus(self.status));
                }
                ctx.tee_verifier
            }
            ProofType::Zk => {
                if self.proving_data.zk_prover.is_some() {
                    return Err(GameError::AlreadyProven(ProofType::Zk));
                }
                // A challenged game may still be ZK proven so it can later nullify others.
                if self.status == GameStatus::DefenderWins {
                    return Err(GameError::InvalidStatus(self.status));
                }
                ctx.zk_verifier
            }
        };

        let digest = self.binding_digest(ctx.params, caller, proof_type);
        if !verifier.verify(evidence, digest) {
            return Err(GameError::InvalidProof(proof_type));
        }

        let mut proving_data = self.proving_data.clone();
        match proof_type {
            ProofType::Tee => proving_data.tee_prover = Some(caller),
            ProofType::Zk => proving_data.zk_prover = Some(caller),
        }
        proving_data.expected_resolution = next_deadline(&proving_data, ctx.params, ctx.now)?;

        self.proving_data = proving_data;
        if proof_type == ProofType::Zk {
            self.bond_recipient = Some(self.creator);
        }

        tracing::info!(
            target: "proposal-game",
            "Game {} proven by {:?} with a {} proof, expected resolution {:?}",
            self.index,
            caller,
            proof_type,
            self.proving_data.expected_resolution
        );
        Ok(GameEvent::Proved {
            game: self.index,
            prover: caller,
            proof_type,
        })
    }

    /// Resolves the game against its parent's verdict and its own deadline.
    ///
    /// ### Returns
    /// - `Ok(GameEvent::Resolved)`: The new terminal status.
    /// - `Err(GameError)`: The game is not in progress, its parent is unresolved, or its deadline
    ///   has not passed.
    pub fn resolve(&mut self, ctx: &GameContext<'_>) -> Result<GameEvent, GameError> {
        self.ensure_initialized()?;
        if self.status != GameStatus::InProgress {
            return Err(GameError::InvalidStatus(self.status));
        }

        let status = match self.parent_status(ctx)? {
            GameStatus::InProgress => return Err(GameError::ParentNotResolved),
            GameStatus::ChallengerWins => GameStatus::ChallengerWins,
            GameStatus::DefenderWins => {
                if !self.game_over(ctx.now) {
                    return Err(GameError::GameNotOver);
                }
                GameStatus::DefenderWins
            }
        };

        self.status = status;
        self.bond_recipient = Some(self.creator);
        self.resolved_at = Some(ctx.now);

        tracing::info!(target: "proposal-game", "Game {} resolved: {}", self.index, status);
        Ok(GameEvent::Resolved {
            game: self.index,
            status,
        })
    }

    /// Overturns a TEE-only game with a conflicting ZK-proven sibling.
    ///
    /// ### Takes
    /// - `ctx`: The [GameContext] to look the challenger up in.
    /// - `challenger_index`: The factory index of the conflicting game.
    ///
    /// ### Returns
    /// - `Ok(GameEvent::Challenged)`: The game lost; its bond now belongs to the challenger's ZK
    ///   prover, claimable once the challenger wins.
    /// - `Err(GameError)`: The game or challenger fails a precondition.
    pub fn challenge(
        &mut self,
        ctx: &GameContext<'_>,
        challenger_index: GameIndex,
    ) -> Result<GameEvent, GameError> {
        self.ensure_initialized()?;
        if self.status != GameStatus::InProgress {
            return Err(GameError::InvalidStatus(self.status));
        }
        if ctx.registry.is_game_blacklisted(self) || ctx.registry.is_game_retired(self) {
            return Err(GameError::InvalidGame(self.index));
        }
        if self.parent_status(ctx)? == GameStatus::ChallengerWins {
            return Err(GameError::InvalidParentStatus);
        }
        if self.proving_data.tee_prover.is_none() {
            return Err(GameError::MissingTeeProof);
        }
        if self.proving_data.zk_prover.is_some() {
            return Err(GameError::ZkProven);
        }

        let challenger = ctx
            .factory
            .game_at_index(challenger_index)
            .ok_or(GameError::UnknownGame(challenger_index))?;
        self.check_sibling(challenger)?;
        let zk_prover = challenger
            .proving_data
            .zk_prover
            .ok_or(GameError::MissingProof(challenger_index, ProofType::Zk))?;
        if !ctx.registry.is_game_proper(challenger) {
            return Err(GameError::InvalidCounterGame(challenger_index));
        }

        self.proving_data.countered_by = Some(challenger_index);
        self.status = GameStatus::ChallengerWins;
        self.bond_recipient = Some(zk_prover);

        tracing::info!(
            target: "proposal-game",
            "Game {} challenged by game {}, bond assigned to {:?}",
            self.index,
            challenger_index,
            zk_prover
        );
        Ok(GameEvent::Challenged {
            game: self.index,
            challenger: challenger_index,
        })
    }

    /// Annuls the game using a conflicting sibling that holds a proof of the same kind. This is
    /// the only transition allowed to overwrite a prior challenge.
    ///
    /// ### Takes
    /// - `ctx`: The [GameContext] to look the nullifier up in.
    /// - `nullifier_index`: The factory index of the conflicting game.
    /// - `proof_type`: The proof kind whose soundness is disputed.
    ///
    /// ### Returns
    /// - `Ok(GameEvent::Nullified)`: The game lost and its bond is refunded to its creator.
    /// - `Err(GameError)`: The game already won, or either game lacks the proof kind.
    pub fn nullify(
        &mut self,
        ctx: &GameContext<'_>,
        nullifier_index: GameIndex,
        proof_type: ProofType,
    ) -> Result<GameEvent, GameError> {
        self.ensure_initialized()?;
        if self.status == GameStatus::DefenderWins {
            return Err(GameError::InvalidStatus(self.status));
        }
        if self.proving_data.prover(proof_type).is_none() {
            return Err(GameError::MissingProof(self.index, proof_type));
        }

        let nullifier = ctx
            .factory
            .game_at_index(nullifier_index)
            .ok_or(GameError::UnknownGame(nullifier_index))?;
        self.check_sibling(nullifier)?;
        if nullifier.proving_data.prover(proof_type).is_none() {
            return Err(GameError::MissingProof(nullifier_index, proof_type));
        }
        if !ctx.registry.is_game_proper(nullifier) {
            return Err(GameError::InvalidCounterGame(nullifier_index));
        }

        self.status = GameStatus::ChallengerWins;
        self.bond_recipient = Some(self.creator);
        self.proving_data.countered_by = None;

        tracing::info!(
            target: "proposal-game",
            "Game {} nullified by game {} over conflicting {} proofs",
            self.index,
            nullifier_index,
            proof_type
        );
        Ok(GameEvent::Nullified {
            game: self.index,
            nullifier: nullifier_index,
            proof_type,
        })
    }

    /// Pays the whole held bond to the current bond recipient.
    ///
    /// Takes `&mut self` for the whole read-transfer-write sequence, so the balance cannot be
    /// observed or claimed again while the transfer is in flight.
    ///
    /// ### Returns
    /// - `Ok(GameEvent::CreditClaimed)`: The bond left custody.
    /// - `Err(GameError)`: There is no recipient or balance, the counter game has not won yet,
    ///   or the transfer failed. The balance is untouched on error.
    pub fn claim_credit(
        &mut self,
        factory: &dyn GameFactory,
        vault: &mut dyn BondVault,
    ) -> Result<GameEvent, GameError> {
        let recipient = self.bond_recipient.ok_or(GameError::NoCreditRecipient)?;
        if let Some(countered_by) = self.proving_data.countered_by {
            let counter = factory
                .game_at_index(countered_by)
                .ok_or(GameError::UnknownGame(countered_by))?;
            if counter.status != GameStatus::DefenderWins {
                return Err(GameError::CounterGameNotFinalized(countered_by));
            }
        }
        if self.balance.is_zero() {
            return Err(GameError::NoCredit);
        }

        let amount = std::mem::take(&mut self.balance);
        if let Err(source) = vault.transfer(recipient, amount) {
            self.balance = amount;
            return Err(GameError::TransferFailed {
                recipient,
                amount,
                source,
            });
        }

        tracing::info!(
            target: "proposal-game",
            "Game {} paid {} to {:?}",
            self.index,
            amount,
            recipient
        );
        Ok(GameEvent::CreditClaimed {
            game: self.index,
            recipient,
            amount,
        })
    }

    /// Attempts to promote a resolved, finalized game to the registry anchor. A rejected
    /// promotion is not an error.
    pub fn close_game(
        &self,
        now: u64,
        registry: &mut dyn AnchorStateRegistry,
    ) -> Result<GameEvent, GameError> {
        if registry.paused() {
            return Err(GameError::Paused);
        }
        if self.resolved_at.is_none() {
            return Err(GameError::NotResolved);
        }
        if !registry.is_game_finalized(self, now) {
            return Err(GameError::NotFinalized);
        }

        let anchor_updated = match registry.set_anchor_state(self, now) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(target: "proposal-game", "Game {} not promoted to anchor: {}", self.index, e);
                false
            }
        };
        Ok(GameEvent::GameClosed {
            game: self.index,
            anchor_updated,
        })
    }

    /// Returns true once the expected resolution time has been reached.
    pub fn game_over(&self, now: u64) -> bool {
        self.proving_data.expected_resolution.has_passed(now)
    }

    /// Computes the digest a proof of `proof_type` submitted by `submitter` must be bound to.
    pub fn binding_digest(
        &self,
        params: &GameParams,
        submitter: Address,
        proof_type: ProofType,
    ) -> H256 {
        binding_digest(&BindingFields {
            submitter,
            l1_head: self.l1_head,
            starting: self.starting,
            claim: self.root_claim,
            sequence_number: self.sequence_number,
            config_hash: params.config_hash,
            image_id: match proof_type {
                ProofType::Tee => params.tee_image_id,
                ProofType::Zk => params.zk_image_id,
            },
        })
    }

    /// Returns the parent's verdict as seen by this game. A missing parent counts as a win, and
    /// a blacklisted or retired parent counts as a loss.
    fn parent_status(&self, ctx: &GameContext<'_>) -> Result<GameStatus, GameError> {
        let Some(parent_index) = self.parent_index else {
            return Ok(GameStatus::DefenderWins);
        };
        let parent = ctx
            .factory
            .game_at_index(parent_index)
            .ok_or(GameError::InvalidParentGame(parent_index))?;
        if ctx.registry.is_game_blacklisted(parent) || ctx.registry.is_game_retired(parent) {
            Ok(GameStatus::ChallengerWins)
        } else {
            Ok(parent.status)
        }
    }

    /// Checks that `other` competes for the same slot with a different claim.
    fn check_sibling(&self, other: &ProposalGame) -> Result<(), GameError> {
        if other.parent_index != self.parent_index {
            return Err(GameError::ParentIndexMismatch);
        }
        if other.sequence_number != self.sequence_number {
            return Err(GameError::SequenceNumberMismatch(
                self.sequence_number,
                other.sequence_number,
            ));
        }
        if other.root_claim == self.root_claim {
            return Err(GameError::ClaimsMatch);
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), GameError> {
        if self.initialized {
            Ok(())
        } else {
            Err(GameError::NotInitialized)
        }
    }

    pub fn index(&self) -> GameIndex {
        self.index
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn creator(&self) -> Address {
        self.creator
    }

    pub fn root_claim(&self) -> Claim {
        self.root_claim
    }

    pub fn l1_head(&self) -> H256 {
        self.l1_head
    }

    pub fn extra_data(&self) -> &Bytes {
        &self.extra_data
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn parent_index(&self) -> Option<GameIndex> {
        self.parent_index
    }

    pub fn starting_output_root(&self) -> OutputRoot {
        self.starting
    }

    pub fn proving_data(&self) -> &ProvingData {
        &self.proving_data
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<u64> {
        self.resolved_at
    }

    pub fn bond_recipient(&self) -> Option<Address> {
        self.bond_recipient
    }

    pub fn balance(&self) -> U256 {
        self.balance
    }

    pub fn was_respected_game_type_when_created(&self) -> bool {
        self.was_respected_game_type_when_created
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }
}

/// Computes the resolution deadline after a proof lands: fast with both proof kinds, slow with
/// one, never later than the current deadline.
fn next_deadline(
    proving_data: &ProvingData,
    params: &GameParams,
    now: u64,
) -> Result<Deadline, GameError> {
    let delay = match proving_data.proof_count() {
        2 => params.fast_finalization_delay,
        1 => params.slow_finalization_delay,
        _ => return Err(GameError::NoProofProvided),
    };
    let candidate = Deadline::At(now.saturating_add(delay));
    Ok(candidate.min(proving_data.expected_resolution))
}
