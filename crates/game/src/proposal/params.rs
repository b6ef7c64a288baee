//! Parameters shared by every game of one implementation type.

use super::GameType;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seven days, in seconds.
const DEFAULT_SLOW_FINALIZATION_DELAY: u64 = 7 * 24 * 60 * 60;
/// One day, in seconds.
const DEFAULT_FAST_FINALIZATION_DELAY: u64 = 24 * 60 * 60;

/// Inconsistencies detected by [GameParams::validate].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("sequence step must be non-zero")]
    ZeroSequenceStep,
    #[error("fast finalization delay ({fast}s) exceeds slow finalization delay ({slow}s)")]
    DelayOrder { fast: u64, slow: u64 },
}

/// The [GameParams] struct holds the instance-independent configuration of the proposal game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParams {
    /// The game type this implementation is registered under.
    pub game_type: GameType,
    /// The image id TEE evidence must be produced by.
    pub tee_image_id: H256,
    /// The image id ZK evidence must be produced by.
    pub zk_image_id: H256,
    /// The rollup configuration hash bound into every proof.
    pub config_hash: H256,
    /// The only account allowed to submit TEE proofs.
    pub tee_proposer: Address,
    /// The distance between a game's claim and its starting reference.
    pub sequence_step: u64,
    /// Resolution delay once a single proof kind is recorded.
    #[serde(default = "default_slow_delay")]
    pub slow_finalization_delay: u64,
    /// Resolution delay once both proof kinds are recorded.
    #[serde(default = "default_fast_delay")]
    pub fast_finalization_delay: u64,
    /// The bond a creator must post with every game.
    #[serde(default)]
    pub init_bond: U256,
}

fn default_slow_delay() -> u64 {
    DEFAULT_SLOW_FINALIZATION_DELAY
}

fn default_fast_delay() -> u64 {
    DEFAULT_FAST_FINALIZATION_DELAY
}

impl GameParams {
    /// Creates a new [GameParams] with the default finalization delays and no bond.
    pub fn new(
        game_type: GameType,
        tee_image_id: H256,
        zk_image_id: H256,
        config_hash: H256,
        tee_proposer: Address,
        sequence_step: u64,
    ) -> Self {
        Self {
            game_type,
            tee_image_id,
            zk_image_id,
            config_hash,
            tee_proposer,
            sequence_step,
            slow_finalization_delay: DEFAULT_SLOW_FINALIZATION_DELAY,
            fast_finalization_delay: DEFAULT_FAST_FINALIZATION_DELAY,
            init_bond: U256::zero(),
        }
    }

    /// Checks the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.sequence_step == 0 {
            return Err(ParamsError::ZeroSequenceStep);
        }
        if self.fast_finalization_delay > self.slow_finalization_delay {
            return Err(ParamsError::DelayOrder {
                fast: self.fast_finalization_delay,
                slow: self.slow_finalization_delay,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn json_defaults_apply() {
        let params: GameParams = serde_json::from_value(serde_json::json!({
            "game_type": 621,
            "tee_image_id": format!("{:?}", H256::repeat_byte(1)),
            "zk_image_id": format!("{:?}", H256::repeat_byte(2)),
            "config_hash": format!("{:?}", H256::repeat_byte(3)),
            "tee_proposer": format!("{:?}", Address::repeat_byte(4)),
            "sequence_step": 100
        }))
        .unwrap();
        assert_eq!(params.slow_finalization_delay, 604_800);
        assert_eq!(params.fast_finalization_delay, 86_400);
        assert!(params.init_bond.is_zero());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_inconsistent_params() {
        let mut params = GameParams::new(
            1,
            H256::zero(),
            H256::zero(),
            H256::zero(),
            Address::zero(),
            0,
        );
        assert_eq!(params.validate(), Err(ParamsError::ZeroSequenceStep));
        params.sequence_step = 10;
        params.fast_finalization_delay = params.slow_finalization_delay + 1;
        assert!(params.validate().is_err());
    }
}
