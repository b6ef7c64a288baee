//! The binding digest handed to a proof verifier alongside the evidence. It ties a proof to a
//! single submitter, game, and proof system.

use super::{Claim, OutputRoot};
use ethers::{
    types::{Address, H256, U256},
    utils::keccak256,
};

/// Byte length of the digest preimage: one address followed by seven 32-byte words.
pub const BINDING_PREIMAGE_LEN: usize = 20 + 32 * 7;

/// The ordered fields committed to by [binding_digest].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingFields {
    /// The account submitting the proof.
    pub submitter: Address,
    /// The L1 head the game was created against.
    pub l1_head: H256,
    /// The output root the game builds on.
    pub starting: OutputRoot,
    /// The output root claimed by the game.
    pub claim: Claim,
    /// The sequence number of the claim.
    pub sequence_number: u64,
    /// The shared rollup configuration hash.
    pub config_hash: H256,
    /// The image id of the proof system the evidence belongs to.
    pub image_id: H256,
}

/// Builds the packed preimage: `submitter ‖ l1Head ‖ startingRoot ‖ startingSeq ‖ claim ‖ seq ‖
/// configHash ‖ imageId`, with sequence numbers as 32-byte big-endian words.
pub fn binding_preimage(fields: &BindingFields) -> Vec<u8> {
    let mut out = Vec::with_capacity(BINDING_PREIMAGE_LEN);
    out.extend_from_slice(fields.submitter.as_bytes());
    out.extend_from_slice(fields.l1_head.as_bytes());
    out.extend_from_slice(fields.starting.root.as_bytes());
    out.extend_from_slice(&word(fields.starting.sequence_number));
    out.extend_from_slice(fields.claim.as_bytes());
    out.extend_from_slice(&word(fields.sequence_number));
    out.extend_from_slice(fields.config_hash.as_bytes());
    out.extend_from_slice(fields.image_id.as_bytes());
    out
}

/// Computes `keccak256(binding_preimage(fields))`.
pub fn binding_digest(fields: &BindingFields) -> H256 {
    H256::from(keccak256(binding_preimage(fields)))
}

fn word(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    U256::from(value).to_big_endian(&mut out);
    out
}
