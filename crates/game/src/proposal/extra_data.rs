//! The creation payload a game is cloned with: its sequence number and parent index.

use super::{GameError, GameIndex};
use ethers::types::{Bytes, U256};

/// Exact byte length of an encoded [ExtraData] payload.
pub const EXTRA_DATA_LEN: usize = 36;

/// Wire value of the parent index meaning "start from the registry anchor".
pub const NO_PARENT: u32 = u32::MAX;

/// The decoded creation payload of a proposal game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraData {
    /// The sequence number the game's claim commits to.
    pub sequence_number: u64,
    /// The factory index of the parent game, or `None` to start from the anchor.
    pub parent_index: Option<GameIndex>,
}

impl ExtraData {
    pub fn new(sequence_number: u64, parent_index: Option<GameIndex>) -> Self {
        Self {
            sequence_number,
            parent_index,
        }
    }

    /// Encodes the payload as a 32-byte big-endian sequence number followed by a 4-byte
    /// big-endian parent index.
    pub fn encode(&self) -> Bytes {
        let mut out = [0u8; EXTRA_DATA_LEN];
        U256::from(self.sequence_number).to_big_endian(&mut out[..32]);
        out[32..].copy_from_slice(&self.parent_index.unwrap_or(NO_PARENT).to_be_bytes());
        Bytes::from(out.to_vec())
    }

    /// Decodes a payload, rejecting anything that is not exactly [EXTRA_DATA_LEN] bytes.
    ///
    /// ### Takes
    /// - `data`: The raw extra data the game was created with.
    ///
    /// ### Returns
    /// - `Ok(ExtraData)`: The decoded payload.
    /// - `Err(GameError::BadExtraData)`: The payload has the wrong length.
    /// - `Err(GameError::SequenceNumberOverflow)`: The sequence number does not fit in 64 bits.
    pub fn decode(data: &[u8]) -> Result<Self, GameError> {
        if data.len() != EXTRA_DATA_LEN {
            return Err(GameError::BadExtraData {
                expected: EXTRA_DATA_LEN,
                actual: data.len(),
            });
        }

        let word = U256::from_big_endian(&data[..32]);
        if word > U256::from(u64::MAX) {
            return Err(GameError::SequenceNumberOverflow);
        }

        let mut index = [0u8; 4];
        index.copy_from_slice(&data[32..]);
        let parent = u32::from_be_bytes(index);

        Ok(Self {
            sequence_number: word.as_u64(),
            parent_index: (parent != NO_PARENT).then_some(parent),
        })
    }
}
