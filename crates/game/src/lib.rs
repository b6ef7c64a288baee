//! The proposal game core: a single-instance state machine that certifies an output claim with
//! TEE and ZK evidence, and settles the creator's bond according to the verdict.

pub mod proposal;
