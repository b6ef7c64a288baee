//! Stand-ins for the external TEE and ZK verifier services.

use ethers::types::{Bytes, H256};
use op_proposal_game::proposal::ProofVerifier;
use serde::{Deserialize, Serialize};

/// The [MockVerifier] decides proofs without any real proof system behind it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockVerifier {
    /// Accept all evidence.
    Accept,
    /// Reject all evidence.
    Reject,
    /// Accept evidence equal to the digest bytes, so a proof only verifies for the game,
    /// submitter, and proof kind it was produced for.
    #[default]
    MatchDigest,
}

impl MockVerifier {
    /// Produces evidence that [MockVerifier::MatchDigest] accepts for `digest`.
    pub fn attest(digest: H256) -> Bytes {
        Bytes::from(digest.as_bytes().to_vec())
    }
}

impl ProofVerifier for MockVerifier {
    fn verify(&self, evidence: &Bytes, digest: H256) -> bool {
        match self {
            MockVerifier::Accept => true,
            MockVerifier::Reject => false,
            MockVerifier::MatchDigest => evidence.as_ref() == digest.as_bytes(),
        }
    }
}
