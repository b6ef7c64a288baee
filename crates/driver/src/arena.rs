//! The arena module holds the [GameArena]: the factory, registry, treasury, and verifiers a set
//! of [ProposalGame]s live in.

use crate::{
    config::WorldConfig, registry::MemoryRegistry, treasury::Treasury, verifier::MockVerifier,
    Request, Response,
};
use ethers::{
    abi::{self, Token},
    types::{Address, Bytes, H256, U256},
    utils::keccak256,
};
use op_proposal_game::proposal::{
    ExtraData, GameContext, GameError, GameEvent, GameFactory, GameIndex, GameParams,
    ParamsError, ProofType, ProposalGame,
};
use std::collections::HashMap;
use thiserror::Error;

/// Failures of an [GameArena] operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("unknown game {0}")]
    UnknownGame(GameIndex),
    #[error("incorrect bond amount: expected {expected}, got {actual}")]
    IncorrectBondAmount { expected: U256, actual: U256 },
    #[error("game already exists with uuid {0:?}")]
    GameAlreadyExists(H256),
    #[error("invalid game parameters: {0}")]
    InvalidParams(#[from] ParamsError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// The [GameStore] holds every created game at a stable index, and the uuids used to reject
/// duplicate `(type, claim, extra data)` tuples.
#[derive(Debug, Default, Clone)]
pub struct GameStore {
    games: Vec<ProposalGame>,
    uuids: HashMap<H256, GameIndex>,
}

impl GameStore {
    /// Fetch a game or fail with [ArenaError::UnknownGame].
    pub fn get(&self, index: GameIndex) -> Result<&ProposalGame, ArenaError> {
        self.game_at_index(index)
            .ok_or(ArenaError::UnknownGame(index))
    }

    /// Returns the number of games created.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns true if no game has been created.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn next_index(&self) -> GameIndex {
        self.games.len() as GameIndex
    }

    fn commit(&mut self, game: ProposalGame) {
        let index = game.index() as usize;
        if index == self.games.len() {
            self.games.push(game);
        } else {
            self.games[index] = game;
        }
    }
}

impl GameFactory for GameStore {
    fn game_at_index(&self, index: GameIndex) -> Option<&ProposalGame> {
        self.games.get(index as usize)
    }
}

/// Computes the factory uuid of a game: `keccak256(abi.encode(gameType, rootClaim, extraData))`.
pub fn game_uuid(game_type: u32, root_claim: H256, extra_data: &Bytes) -> H256 {
    H256::from(keccak256(abi::encode(&[
        Token::Uint(U256::from(game_type)),
        Token::FixedBytes(root_claim.as_bytes().to_vec()),
        Token::Bytes(extra_data.to_vec()),
    ])))
}

/// The [GameArena] owns every game together with the collaborators they consult.
///
/// Operations run against a copy of the target game, and the copy is committed only when the
/// operation succeeds. A failed operation therefore leaves the arena exactly as it was.
#[derive(Debug, Clone)]
pub struct GameArena {
    now: u64,
    params: GameParams,
    games: GameStore,
    registry: MemoryRegistry,
    treasury: Treasury,
    tee_verifier: MockVerifier,
    zk_verifier: MockVerifier,
}

impl GameArena {
    /// Creates an empty arena from the given [WorldConfig].
    pub fn new(config: &WorldConfig) -> Result<Self, ArenaError> {
        config.params.validate()?;
        Ok(Self {
            now: config.start_time,
            params: config.params.clone(),
            games: GameStore::default(),
            registry: MemoryRegistry::new(&config.registry),
            treasury: Treasury::default(),
            tee_verifier: config.tee_verifier,
            zk_verifier: config.zk_verifier,
        })
    }

    /// Creates and initializes a new game, taking its bond into custody.
    ///
    /// ### Takes
    /// - `creator`: The account posting the bond.
    /// - `root_claim`: The claimed output root.
    /// - `l1_head`: The L1 block hash the claim is made against.
    /// - `extra_data`: The encoded [ExtraData] payload.
    /// - `bond`: The bond sent with the creation.
    ///
    /// ### Returns
    /// - `Ok(GameIndex)`: The index of the new game.
    /// - `Err(ArenaError)`: The bond is wrong, the game is a duplicate, or initialization failed.
    pub fn create(
        &mut self,
        creator: Address,
        root_claim: H256,
        l1_head: H256,
        extra_data: Bytes,
        bond: U256,
    ) -> Result<GameIndex, ArenaError> {
        if bond != self.params.init_bond {
            return Err(ArenaError::IncorrectBondAmount {
                expected: self.params.init_bond,
                actual: bond,
            });
        }
        let uuid = game_uuid(self.params.game_type, root_claim, &extra_data);
        if self.games.uuids.contains_key(&uuid) {
            return Err(ArenaError::GameAlreadyExists(uuid));
        }

        let index = self.games.next_index();
        let mut game = ProposalGame::new(
            index,
            self.params.game_type,
            creator,
            root_claim,
            l1_head,
            extra_data,
            bond,
        );
        game.initialize(&self.context())?;

        self.treasury.deposit(bond);
        self.games.uuids.insert(uuid, index);
        self.games.commit(game);

        tracing::info!(target: "game-arena", "Created game {} for {:?}", index, creator);
        Ok(index)
    }

    pub fn prove(
        &mut self,
        index: GameIndex,
        prover: Address,
        evidence: &Bytes,
        proof_type: ProofType,
    ) -> Result<GameEvent, ArenaError> {
        self.apply(index, |game, ctx| game.prove(ctx, prover, evidence, proof_type))
    }

    pub fn resolve(&mut self, index: GameIndex) -> Result<GameEvent, ArenaError> {
        self.apply(index, |game, ctx| game.resolve(ctx))
    }

    pub fn challenge(
        &mut self,
        index: GameIndex,
        challenger: GameIndex,
    ) -> Result<GameEvent, ArenaError> {
        self.apply(index, |game, ctx| game.challenge(ctx, challenger))
    }

    pub fn nullify(
        &mut self,
        index: GameIndex,
        nullifier: GameIndex,
        proof_type: ProofType,
    ) -> Result<GameEvent, ArenaError> {
        self.apply(index, |game, ctx| game.nullify(ctx, nullifier, proof_type))
    }

    pub fn claim_credit(&mut self, index: GameIndex) -> Result<GameEvent, ArenaError> {
        let mut game = self.games.get(index)?.clone();
        let event = game.claim_credit(&self.games, &mut self.treasury)?;
        self.games.commit(game);
        Ok(event)
    }

    pub fn close_game(&mut self, index: GameIndex) -> Result<GameEvent, ArenaError> {
        let game = self.games.get(index)?;
        Ok(game.close_game(self.now, &mut self.registry)?)
    }

    /// Computes the digest a proof for the game must be bound to.
    pub fn binding_digest(
        &self,
        index: GameIndex,
        submitter: Address,
        proof_type: ProofType,
    ) -> Result<H256, ArenaError> {
        Ok(self
            .games
            .get(index)?
            .binding_digest(&self.params, submitter, proof_type))
    }

    /// Advances the clock by `seconds`.
    pub fn warp(&mut self, seconds: u64) -> u64 {
        self.now = self.now.saturating_add(seconds);
        tracing::debug!(target: "game-arena", "Clock advanced by {}s to {}", seconds, self.now);
        self.now
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    pub fn game(&self, index: GameIndex) -> Result<&ProposalGame, ArenaError> {
        self.games.get(index)
    }

    pub fn games(&self) -> &GameStore {
        &self.games
    }

    pub fn registry(&self) -> &MemoryRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MemoryRegistry {
        &mut self.registry
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    /// Executes a single [Request] against the arena.
    pub fn handle(&mut self, request: Request) -> Result<Response, ArenaError> {
        let response = match request {
            Request::Create {
                creator,
                root_claim,
                l1_head,
                sequence_number,
                parent_index,
                bond,
            } => {
                let extra_data = ExtraData::new(sequence_number, parent_index).encode();
                let bond = bond.unwrap_or(self.params.init_bond);
                let game = self.create(creator, root_claim, l1_head, extra_data, bond)?;
                Response::Created { game }
            }
            Request::Prove {
                game,
                prover,
                proof_type,
                evidence,
            } => {
                let evidence = match evidence {
                    Some(evidence) => evidence,
                    None => MockVerifier::attest(self.binding_digest(game, prover, proof_type)?),
                };
                Response::Event {
                    event: self.prove(game, prover, &evidence, proof_type)?,
                }
            }
            Request::Resolve { game } => Response::Event {
                event: self.resolve(game)?,
            },
            Request::Challenge { game, challenger } => Response::Event {
                event: self.challenge(game, challenger)?,
            },
            Request::Nullify {
                game,
                nullifier,
                proof_type,
            } => Response::Event {
                event: self.nullify(game, nullifier, proof_type)?,
            },
            Request::ClaimCredit { game } => Response::Event {
                event: self.claim_credit(game)?,
            },
            Request::CloseGame { game } => Response::Event {
                event: self.close_game(game)?,
            },
            Request::Warp { seconds } => Response::Time {
                now: self.warp(seconds),
            },
            Request::Blacklist { game } => {
                self.games.get(game)?;
                self.registry.blacklist(game);
                Response::Done
            }
            Request::RetireGames => {
                self.registry.retire_games(self.now);
                Response::Done
            }
            Request::SetRespectedGameType { game_type } => {
                self.registry.set_respected_game_type(game_type);
                Response::Done
            }
            Request::SetPaused { paused } => {
                self.registry.set_paused(paused);
                Response::Done
            }
            Request::RejectTransfers { account, reject } => {
                self.treasury.reject_transfers_to(account, reject);
                Response::Done
            }
            Request::Query { game } => Response::Game {
                game: Box::new(self.games.get(game)?.clone()),
            },
            Request::Shutdown => Response::Done,
        };
        Ok(response)
    }

    fn context(&self) -> GameContext<'_> {
        GameContext {
            now: self.now,
            params: &self.params,
            factory: &self.games,
            registry: &self.registry,
            tee_verifier: &self.tee_verifier,
            zk_verifier: &self.zk_verifier,
        }
    }

    /// Runs `f` against a copy of the game and commits the copy only if `f` succeeds.
    fn apply<T>(
        &mut self,
        index: GameIndex,
        f: impl FnOnce(&mut ProposalGame, &GameContext<'_>) -> Result<T, GameError>,
    ) -> Result<T, ArenaError> {
        let mut game = self.games.get(index)?.clone();
        let out = f(&mut game, &self.context())?;
        self.games.commit(game);
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::registry::RegistryConfig;
    use op_proposal_game::proposal::{
        AnchorStateRegistry, Deadline, GameStatus, OutputRoot, RegistryError, TransferError,
    };

    const DAY: u64 = 24 * 60 * 60;
    const STEP: u64 = 100;
    const GAME_TYPE: u32 = 621;

    fn tee_proposer() -> Address {
        Address::repeat_byte(0xee)
    }

    fn config() -> WorldConfig {
        let mut params = GameParams::new(
            GAME_TYPE,
            H256::repeat_byte(0x01),
            H256::repeat_byte(0x02),
            H256::repeat_byte(0x03),
            tee_proposer(),
            STEP,
        );
        params.init_bond = U256::from(1_000_000u64);
        WorldConfig {
            params,
            registry: RegistryConfig {
                anchor: OutputRoot::new(H256::repeat_byte(0xaa), 0),
                respected_game_type: GAME_TYPE,
                finality_delay: DAY,
            },
            tee_verifier: MockVerifier::MatchDigest,
            zk_verifier: MockVerifier::MatchDigest,
            start_time: 1_700_000_000,
        }
    }

    fn bond() -> U256 {
        U256::from(1_000_000u64)
    }

    fn create(
        arena: &mut GameArena,
        creator: Address,
        claim: H256,
        sequence_number: u64,
        parent: Option<GameIndex>,
    ) -> Result<GameIndex, ArenaError> {
        arena.create(
            creator,
            claim,
            H256::repeat_byte(0x10),
            ExtraData::new(sequence_number, parent).encode(),
            bond(),
        )
    }

    /// Submits a proof carrying evidence the [MockVerifier::MatchDigest] verifier accepts.
    fn prove(
        arena: &mut GameArena,
        game: GameIndex,
        prover: Address,
        proof_type: ProofType,
    ) -> Result<GameEvent, ArenaError> {
        let evidence = MockVerifier::attest(arena.binding_digest(game, prover, proof_type)?);
        arena.prove(game, prover, &evidence, proof_type)
    }

    #[test]
    fn scenario_zk_challenge_takes_tee_bond() {
        let mut arena = GameArena::new(&config()).unwrap();
        let start = arena.now();
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let zk_prover = Address::repeat_byte(0x2c);
        let r1 = H256::repeat_byte(0x01);
        let r2 = H256::repeat_byte(0x02);

        let a = create(&mut arena, alice, r1, STEP, None).unwrap();
        prove(&mut arena, a, tee_proposer(), ProofType::Tee).unwrap();
        let game_a = arena.game(a).unwrap();
        assert_eq!(
            game_a.proving_data().expected_resolution,
            Deadline::At(start + 7 * DAY)
        );
        assert_eq!(game_a.bond_recipient(), None);

        let b = create(&mut arena, bob, r2, STEP, None).unwrap();
        prove(&mut arena, b, zk_prover, ProofType::Zk).unwrap();
        assert_eq!(arena.game(b).unwrap().bond_recipient(), Some(bob));

        arena.challenge(a, b).unwrap();
        let game_a = arena.game(a).unwrap();
        assert_eq!(game_a.status(), GameStatus::ChallengerWins);
        assert_eq!(game_a.bond_recipient(), Some(zk_prover));

        assert_eq!(
            arena.claim_credit(a),
            Err(ArenaError::Game(GameError::CounterGameNotFinalized(b)))
        );

        arena.warp(7 * DAY);
        assert_eq!(
            arena.resolve(b).unwrap(),
            GameEvent::Resolved {
                game: b,
                status: GameStatus::DefenderWins
            }
        );

        assert_eq!(
            arena.claim_credit(a).unwrap(),
            GameEvent::CreditClaimed {
                game: a,
                recipient: zk_prover,
                amount: bond()
            }
        );
        assert!(arena.game(a).unwrap().balance().is_zero());
        assert_eq!(arena.treasury().balance_of(zk_prover), bond());
        assert_eq!(arena.treasury().custody(), bond());
    }

    #[test]
    fn nullify_after_challenge_refunds_creator() {
        let mut arena = GameArena::new(&config()).unwrap();
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);

        let a = create(&mut arena, alice, H256::repeat_byte(0x01), STEP, None).unwrap();
        let b = create(&mut arena, bob, H256::repeat_byte(0x02), STEP, None).unwrap();
        prove(&mut arena, a, tee_proposer(), ProofType::Tee).unwrap();
        prove(&mut arena, b, bob, ProofType::Zk).unwrap();
        arena.challenge(a, b).unwrap();

        // A conflicting TEE proof on `b` exposes the TEE as unsound.
        prove(&mut arena, b, tee_proposer(), ProofType::Tee).unwrap();
        arena.nullify(a, b, ProofType::Tee).unwrap();

        let game_a = arena.game(a).unwrap();
        assert_eq!(game_a.status(), GameStatus::ChallengerWins);
        assert_eq!(game_a.bond_recipient(), Some(alice));
        assert_eq!(game_a.proving_data().countered_by, None);

        // With the counter game cleared, the refund is claimable immediately.
        arena.claim_credit(a).unwrap();
        assert_eq!(arena.treasury().balance_of(alice), bond());
    }

    #[test]
    fn proof_bound_to_another_game_is_rejected() {
        let mut arena = GameArena::new(&config()).unwrap();
        let a = create(&mut arena, Address::repeat_byte(0xa1), H256::repeat_byte(1), STEP, None)
            .unwrap();
        let b = create(&mut arena, Address::repeat_byte(0xb0), H256::repeat_byte(2), STEP, None)
            .unwrap();
        let prover = Address::repeat_byte(0x2c);

        let for_a = MockVerifier::attest(arena.binding_digest(a, prover, ProofType::Zk).unwrap());
        assert_eq!(
            arena.prove(b, prover, &for_a, ProofType::Zk),
            Err(ArenaError::Game(GameError::InvalidProof(ProofType::Zk)))
        );

        // Evidence for one proof kind does not verify as the other.
        let tee_for_b =
            MockVerifier::attest(arena.binding_digest(b, tee_proposer(), ProofType::Tee).unwrap());
        assert!(arena
            .prove(b, tee_proposer(), &tee_for_b, ProofType::Zk)
            .is_err());
        assert!(arena.game(b).unwrap().proving_data().zk_prover.is_none());
    }

    #[test]
    fn duplicate_games_and_wrong_bonds_are_rejected() {
        let mut arena = GameArena::new(&config()).unwrap();
        let alice = Address::repeat_byte(0xa1);
        create(&mut arena, alice, H256::repeat_byte(1), STEP, None).unwrap();
        assert!(matches!(
            create(&mut arena, alice, H256::repeat_byte(1), STEP, None),
            Err(ArenaError::GameAlreadyExists(_))
        ));
        assert_eq!(
            arena.create(
                alice,
                H256::repeat_byte(3),
                H256::zero(),
                ExtraData::new(STEP, None).encode(),
                U256::one(),
            ),
            Err(ArenaError::IncorrectBondAmount {
                expected: bond(),
                actual: U256::one()
            })
        );
        assert_eq!(arena.games().len(), 1);
        assert_eq!(arena.treasury().custody(), bond());
    }

    #[test]
    fn failed_initialization_creates_nothing() {
        let mut arena = GameArena::new(&config()).unwrap();
        assert_eq!(
            create(&mut arena, Address::zero(), H256::repeat_byte(1), STEP + 1, None),
            Err(ArenaError::Game(GameError::UnexpectedSequenceNumber {
                expected: STEP,
                actual: STEP + 1
            }))
        );
        assert!(arena.games().is_empty());
        assert!(arena.treasury().custody().is_zero());

        // The same tuple is free to be created correctly afterwards.
        assert_eq!(
            create(&mut arena, Address::zero(), H256::repeat_byte(1), STEP, None),
            Ok(0)
        );
    }

    #[test]
    fn ancestry_poisoning_through_challenged_parent() {
        let mut arena = GameArena::new(&config()).unwrap();
        let parent = create(&mut arena, Address::repeat_byte(0xa1), H256::repeat_byte(1), STEP, None)
            .unwrap();
        let rival = create(&mut arena, Address::repeat_byte(0xb0), H256::repeat_byte(2), STEP, None)
            .unwrap();
        prove(&mut arena, parent, tee_proposer(), ProofType::Tee).unwrap();
        let child = create(
            &mut arena,
            Address::repeat_byte(0xc0),
            H256::repeat_byte(3),
            2 * STEP,
            Some(parent),
        )
        .unwrap();
        prove(&mut arena, child, tee_proposer(), ProofType::Tee).unwrap();
        prove(&mut arena, child, Address::repeat_byte(0x2c), ProofType::Zk).unwrap();

        prove(&mut arena, rival, Address::repeat_byte(0x2c), ProofType::Zk).unwrap();
        arena.challenge(parent, rival).unwrap();

        // The child's own proofs do not save it.
        arena.warp(7 * DAY);
        assert_eq!(
            arena.resolve(child).unwrap(),
            GameEvent::Resolved {
                game: child,
                status: GameStatus::ChallengerWins
            }
        );

        // Nor can new children build on the challenged parent.
        assert_eq!(
            create(
                &mut arena,
                Address::repeat_byte(0xc1),
                H256::repeat_byte(4),
                2 * STEP,
                Some(parent)
            ),
            Err(ArenaError::Game(GameError::InvalidParentStatus))
        );
    }

    #[test]
    fn close_game_promotes_anchor_after_finality() {
        let mut arena = GameArena::new(&config()).unwrap();
        let a = create(&mut arena, Address::repeat_byte(0xa1), H256::repeat_byte(1), STEP, None)
            .unwrap();
        prove(&mut arena, a, tee_proposer(), ProofType::Tee).unwrap();
        prove(&mut arena, a, Address::repeat_byte(0x2c), ProofType::Zk).unwrap();

        arena.warp(DAY);
        arena.resolve(a).unwrap();
        assert_eq!(
            arena.close_game(a),
            Err(ArenaError::Game(GameError::NotFinalized))
        );

        arena.warp(DAY + 1);
        assert_eq!(
            arena.close_game(a).unwrap(),
            GameEvent::GameClosed {
                game: a,
                anchor_updated: true
            }
        );
        assert_eq!(
            arena.registry().anchor_root(),
            OutputRoot::new(H256::repeat_byte(1), STEP)
        );
        assert_eq!(arena.registry().anchor_game(), Some(a));

        // A second close is harmless: the anchor no longer advances.
        assert_eq!(
            arena.close_game(a).unwrap(),
            GameEvent::GameClosed {
                game: a,
                anchor_updated: false
            }
        );

        // New games without a parent now start from the promoted anchor.
        let next = create(
            &mut arena,
            Address::repeat_byte(0xb0),
            H256::repeat_byte(2),
            2 * STEP,
            None,
        )
        .unwrap();
        assert_eq!(
            arena.game(next).unwrap().starting_output_root(),
            OutputRoot::new(H256::repeat_byte(1), STEP)
        );
    }

    #[test]
    fn retired_games_cannot_be_challenged() {
        let mut arena = GameArena::new(&config()).unwrap();
        let a = create(&mut arena, Address::repeat_byte(0xa1), H256::repeat_byte(1), STEP, None)
            .unwrap();
        let b = create(&mut arena, Address::repeat_byte(0xb0), H256::repeat_byte(2), STEP, None)
            .unwrap();
        prove(&mut arena, a, tee_proposer(), ProofType::Tee).unwrap();
        prove(&mut arena, b, Address::repeat_byte(0x2c), ProofType::Zk).unwrap();

        arena.handle(Request::RetireGames).unwrap();
        assert_eq!(
            arena.challenge(a, b),
            Err(ArenaError::Game(GameError::InvalidGame(a)))
        );
        assert_eq!(arena.game(a).unwrap().status(), GameStatus::InProgress);
    }

    #[test]
    fn retired_challenger_is_rejected() {
        let mut arena = GameArena::new(&config()).unwrap();
        let b = create(&mut arena, Address::repeat_byte(0xb0), H256::repeat_byte(2), STEP, None)
            .unwrap();
        prove(&mut arena, b, Address::repeat_byte(0x2c), ProofType::Zk).unwrap();
        arena.handle(Request::RetireGames).unwrap();

        // Created after the retirement timestamp, so only `b` is retired.
        arena.warp(1);
        let a = create(&mut arena, Address::repeat_byte(0xa1), H256::repeat_byte(1), STEP, None)
            .unwrap();
        prove(&mut arena, a, tee_proposer(), ProofType::Tee).unwrap();
        assert!(!arena.registry().is_game_retired(arena.game(a).unwrap()));
        assert!(arena.registry().is_game_retired(arena.game(b).unwrap()));

        assert_eq!(
            arena.challenge(a, b),
            Err(ArenaError::Game(GameError::InvalidCounterGame(b)))
        );
        assert_eq!(arena.game(a).unwrap().status(), GameStatus::InProgress);
    }

    #[test]
    fn failed_payout_keeps_bond_in_game() {
        let mut arena = GameArena::new(&config()).unwrap();
        let alice = Address::repeat_byte(0xa1);
        let a = create(&mut arena, alice, H256::repeat_byte(1), STEP, None).unwrap();
        prove(&mut arena, a, Address::repeat_byte(0x2c), ProofType::Zk).unwrap();
        arena.warp(7 * DAY);
        arena.resolve(a).unwrap();

        arena
            .handle(Request::RejectTransfers {
                account: alice,
                reject: true,
            })
            .unwrap();
        assert_eq!(
            arena.claim_credit(a),
            Err(ArenaError::Game(GameError::TransferFailed {
                recipient: alice,
                amount: bond(),
                source: TransferError::Rejected(alice)
            }))
        );
        assert_eq!(arena.game(a).unwrap().balance(), bond());
        assert_eq!(arena.treasury().custody(), bond());
        assert!(arena.treasury().balance_of(alice).is_zero());

        arena
            .handle(Request::RejectTransfers {
                account: alice,
                reject: false,
            })
            .unwrap();
        arena.claim_credit(a).unwrap();
        assert_eq!(arena.treasury().balance_of(alice), bond());
        assert!(arena.game(a).unwrap().balance().is_zero());
    }

    #[test]
    fn registry_rejects_stale_anchor() {
        let mut arena = GameArena::new(&config()).unwrap();
        let a = create(&mut arena, Address::repeat_byte(0xa1), H256::repeat_byte(1), STEP, None)
            .unwrap();
        prove(&mut arena, a, tee_proposer(), ProofType::Tee).unwrap();
        arena.warp(9 * DAY);
        arena.resolve(a).unwrap();
        let now = arena.warp(DAY + 1);

        let game = arena.game(a).unwrap().clone();
        let registry = arena.registry_mut();
        assert!(registry.set_anchor_state(&game, now).is_ok());
        assert_eq!(
            registry.set_anchor_state(&game, now),
            Err(RegistryError::StaleAnchor {
                game: a,
                sequence_number: STEP,
                anchor: STEP
            })
        );

        // Blacklisting revokes the game's eligibility altogether.
        registry.blacklist(a);
        assert_eq!(
            registry.set_anchor_state(&game, now),
            Err(RegistryError::InvalidAnchorGame(a))
        );
    }

    #[test]
    fn handle_generates_honest_evidence() {
        let mut arena = GameArena::new(&config()).unwrap();
        let created = arena
            .handle(Request::Create {
                creator: Address::repeat_byte(0xa1),
                root_claim: H256::repeat_byte(1),
                l1_head: H256::zero(),
                sequence_number: STEP,
                parent_index: None,
                bond: None,
            })
            .unwrap();
        assert_eq!(created, Response::Created { game: 0 });

        let proved = arena
            .handle(Request::Prove {
                game: 0,
                prover: tee_proposer(),
                proof_type: ProofType::Tee,
                evidence: None,
            })
            .unwrap();
        assert_eq!(
            proved,
            Response::Event {
                event: GameEvent::Proved {
                    game: 0,
                    prover: tee_proposer(),
                    proof_type: ProofType::Tee
                }
            }
        );

        assert_eq!(
            arena.handle(Request::Query { game: 5 }),
            Err(ArenaError::UnknownGame(5))
        );
    }
}
