//! Core Types for the weipool Ledger

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::shares;

/// Type alias for participant/caller addresses (32-byte hash)
pub type Address = [u8; 32];

/// Derive an address from arbitrary public-key or seed bytes.
///
/// The engine treats addresses as opaque; this helper gives hosts a
/// deterministic way to map their own identities into the address space.
pub fn derive_address(seed: &[u8]) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.finalize().into()
}

/// Read-only snapshot of pool aggregates
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct PoolStats {
    /// Sum of all participants' share units (fixed-point, see
    /// [`shares::PRECISION`])
    pub total_shares: u128,
    /// Total redeemable value held by the pool, rounding dust included
    pub total_pooled: u64,
    /// Number of participants with nonzero shares
    pub participant_count: u64,
}

impl PoolStats {
    /// Value of one whole share scaled by `precision`, or `None` with no
    /// shares outstanding (or when the product exceeds u128). The rate is
    /// computed on demand and never stored, so it can never go stale.
    pub fn exchange_rate(&self, precision: u64) -> Option<u128> {
        if self.total_shares == 0 {
            return None;
        }
        (self.total_pooled as u128)
            .checked_mul(precision as u128)?
            .checked_mul(shares::PRECISION)
            .map(|scaled| scaled / self.total_shares)
    }
}
