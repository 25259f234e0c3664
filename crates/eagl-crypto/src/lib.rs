//! Hashing and verification primitives for the EAGL node.
//!
//! Provides the versioned canonical block encoding, domain-separated BLAKE3
//! block hashing, and single-pass chain verification.
//!
//! Hashing is BLAKE3; nothing here implements its own primitives.

pub mod chain;
pub mod hasher;

pub use chain::{ChainVerifier, VerificationError, ViolationKind};
pub use hasher::{canonical_bytes, compute_hash, BlockHasher, CANONICAL_ENCODING_VERSION};
