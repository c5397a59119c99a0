//! Pool Ledger Engine
//!
//! Pooled-deposit ledger with proportional, compounding reward distribution.
//!
//! ## Key Features
//!
//! - **Deposit/Withdraw**: Participants deposit value and exit with their
//!   full proportional entitlement
//! - **O(1) Rewards**: A single addition to `total_pooled` raises every
//!   participant's redeemable balance; no participant is ever iterated
//! - **Floor Rounding**: One centralized helper rounds share minting and
//!   redemption down, so dust accrues to the pool, never to a participant
//! - **Atomic Withdrawals**: State is committed before the value transfer
//!   and rolled back in full if the transfer is rejected
//!
//! ## Accounting Model
//!
//! Each participant holds a single integer: `shares`. Shares are fixed
//! point with `shares::PRECISION` (1e9) units per whole share, so floor
//! rounding happens at sub-unit granularity. Deposits mint share units at the
//! current exchange rate (one whole share per unit of value when no shares
//! exist). Rewards inflate `total_pooled` without minting shares, which
//! raises the rate uniformly for everyone. Withdrawals redeem all of a
//! participant's shares at the rate in force at exit time. No per
//! participant reward debt is tracked; the rate formulation makes it
//! unnecessary.
//!
//! ## Serialization Point
//!
//! Every operation takes `&mut PoolLedger`, so the host's single mutable
//! borrow is the transaction boundary: no two operations can interleave
//! between reading and writing `total_shares`/`total_pooled`. The one
//! external call, the value transfer inside [`PoolLedger::withdraw`], runs
//! after the state mutation and receives no ledger access, so third-party
//! transfer logic cannot observe pre-withdrawal state or double-spend.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use weipool_common::{
    constants::shares::PRECISION,
    errors::{PoolError, PoolResult},
    events::{EventLog, PoolEvent},
    math::{mul_div_floor, safe_add, safe_sub},
    types::{Address, PoolStats},
};

#[cfg(test)]
mod scenarios;

// ============================================================================
// Value Transfer Capability
// ============================================================================

/// Rejection returned by a transfer target that refuses funds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRejected;

/// Capability for delivering withdrawn value back to a participant.
///
/// Supplied by the host environment (token transfer, bank credit, UTXO
/// output). The callback may run arbitrary third-party logic; the ledger
/// invokes it strictly after its own state mutation and never exposes
/// itself to it.
pub trait ValueTransfer {
    /// Deliver `amount` to `to`. Returning `Err` aborts the withdrawal.
    fn transfer(&mut self, to: Address, amount: u64) -> Result<(), TransferRejected>;
}

impl<F> ValueTransfer for F
where
    F: FnMut(Address, u64) -> Result<(), TransferRejected>,
{
    fn transfer(&mut self, to: Address, amount: u64) -> Result<(), TransferRejected> {
        self(to, amount)
    }
}

// ============================================================================
// Pool Ledger
// ============================================================================

/// The shared pool ledger: all state behind one transactional boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolLedger {
    /// The single principal permitted to inject rewards, fixed at construction
    rewarder: Address,
    /// Sum of all participants' share units
    total_shares: u128,
    /// Total redeemable value held by the pool (principal + rewards - withdrawals)
    total_pooled: u64,
    /// Participant share units; entries are removed when shares reach zero
    shares: BTreeMap<Address, u128>,
    /// Buffered observable events, drained by the host
    events: EventLog,
}

impl PoolLedger {
    /// Create an empty pool with the given authorized rewarder
    pub fn new(rewarder: Address) -> Self {
        Self {
            rewarder,
            total_shares: 0,
            total_pooled: 0,
            shares: BTreeMap::new(),
            events: EventLog::new(),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Deposit `amount` of value for `participant`, minting share units at
    /// the current exchange rate. Returns the share units minted.
    ///
    /// A deposit into a shareless pool mints one whole share per unit of
    /// value. Should any value sit pooled with no shares outstanding, the
    /// bootstrap depositor's redeemable balance absorbs it.
    pub fn deposit(&mut self, participant: Address, amount: u64) -> PoolResult<u128> {
        if amount == 0 {
            return Err(PoolError::InvalidAmount { amount });
        }

        let minted = if self.total_shares == 0 {
            // Bootstrap: one whole share per unit. u64::MAX * PRECISION
            // fits in u128 with room to spare.
            amount as u128 * PRECISION
        } else {
            mul_div_floor(amount as u128, self.total_shares, self.total_pooled as u128)?
        };

        if minted == 0 {
            // Exchange rate has inflated past the point where this amount
            // buys a single share unit. Reject loudly instead of eating
            // the funds.
            return Err(PoolError::ZeroShareMint {
                amount,
                total_shares: self.total_shares,
                total_pooled: self.total_pooled,
            });
        }

        // Compute every new value before committing any of them, so an
        // overflow rejection leaves no partial mutation behind.
        let held = self.shares.get(&participant).copied().unwrap_or(0);
        let new_held = held.checked_add(minted).ok_or(PoolError::Overflow)?;
        let new_total_shares = self
            .total_shares
            .checked_add(minted)
            .ok_or(PoolError::Overflow)?;
        let new_total_pooled = safe_add(self.total_pooled, amount)?;

        self.shares.insert(participant, new_held);
        self.total_shares = new_total_shares;
        self.total_pooled = new_total_pooled;

        self.events.emit(PoolEvent::Deposit {
            participant,
            amount,
            shares_minted: minted,
        });

        Ok(minted)
    }

    /// Withdraw `participant`'s entire entitlement, delivering it through
    /// the supplied transfer capability. Returns the amount withdrawn.
    ///
    /// Full exit only; there is no partial withdrawal. State is committed
    /// before the transfer (checks-effects-interactions) and restored in
    /// full if the transfer is rejected, so the operation is atomic.
    pub fn withdraw<T: ValueTransfer + ?Sized>(
        &mut self,
        participant: Address,
        transfer: &mut T,
    ) -> PoolResult<u64> {
        let shares = self.shares.get(&participant).copied().unwrap_or(0);
        if shares == 0 {
            return Err(PoolError::NoBalance { participant });
        }

        // Same floor policy as deposit: the participant never receives more
        // than their exact proportional value. shares <= total_shares, so
        // the quotient is at most total_pooled and fits in u64.
        let raw = mul_div_floor(shares, self.total_pooled as u128, self.total_shares)?;
        let amount = u64::try_from(raw).map_err(|_| PoolError::Overflow)?;

        let prior_total_shares = self.total_shares;
        let prior_total_pooled = self.total_pooled;

        // shares <= total_shares and amount <= total_pooled by the ledger
        // invariants, so these cannot underflow; surface it if they ever do.
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(PoolError::Underflow)?;
        self.total_pooled = safe_sub(self.total_pooled, amount)?;
        self.shares.remove(&participant);

        if transfer.transfer(participant, amount).is_err() {
            // All-or-nothing: put back the exact prior state.
            self.total_shares = prior_total_shares;
            self.total_pooled = prior_total_pooled;
            self.shares.insert(participant, shares);
            return Err(PoolError::TransferFailed {
                to: participant,
                amount,
            });
        }

        self.events.emit(PoolEvent::Withdraw {
            participant,
            amount,
        });

        Ok(amount)
    }

    /// Inject `amount` of reward value into the pool, raising every
    /// participant's redeemable balance proportionally.
    ///
    /// No shares are minted; the exchange rate rises uniformly, which is
    /// what makes distribution O(1) in the participant count.
    pub fn inject_reward(&mut self, caller: Address, amount: u64) -> PoolResult<()> {
        if caller != self.rewarder {
            return Err(PoolError::Unauthorized {
                expected: self.rewarder,
                actual: caller,
            });
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount { amount });
        }
        if self.total_shares == 0 {
            // No shares exist to inflate; accepting the reward would strand
            // it with no owner.
            return Err(PoolError::NoParticipants);
        }

        self.total_pooled = safe_add(self.total_pooled, amount)?;

        self.events.emit(PoolEvent::Reward { amount });

        Ok(())
    }

    /// Current redeemable value of `participant`'s shares. Pure view: no
    /// side effects, identical results across calls with no intervening
    /// mutation.
    pub fn balance_of(&self, participant: Address) -> u64 {
        if self.total_shares == 0 {
            return 0;
        }
        let shares = self.shares.get(&participant).copied().unwrap_or(0);
        // shares <= total_shares, so the quotient is at most total_pooled
        // and fits in u64; with a nonzero denominator the division cannot
        // fail.
        mul_div_floor(shares, self.total_pooled as u128, self.total_shares)
            .map_or(0, |raw| raw as u64)
    }

    // ========================================================================
    // Read Surface
    // ========================================================================

    /// The authorized rewarder configured at construction
    pub fn rewarder(&self) -> Address {
        self.rewarder
    }

    /// Sum of all participants' share units
    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    /// Total redeemable value held by the pool, dust included
    pub fn total_pooled(&self) -> u64 {
        self.total_pooled
    }

    /// Share units held by `participant` (zero if never deposited or fully
    /// exited)
    pub fn shares_of(&self, participant: Address) -> u128 {
        self.shares.get(&participant).copied().unwrap_or(0)
    }

    /// Number of participants with nonzero shares
    pub fn participant_count(&self) -> u64 {
        self.shares.len() as u64
    }

    /// Snapshot of the pool aggregates
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_shares: self.total_shares,
            total_pooled: self.total_pooled,
            participant_count: self.participant_count(),
        }
    }

    /// Buffered events since the last drain
    pub fn events(&self) -> &[PoolEvent] {
        self.events.events()
    }

    /// Take all buffered events, leaving the log empty
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        self.events.drain()
    }

    // ========================================================================
    // Invariant Checks
    // ========================================================================

    /// Panic if the ledger's internal invariants do not hold.
    ///
    /// - `total_shares` equals the sum over the participant map
    /// - no tombstone entries: every stored share count is nonzero
    /// - the exchange rate never falls below the bootstrap rate of one
    ///   whole share per unit of value
    pub fn assert_invariants(&self) {
        let sum: u128 = self.shares.values().sum();
        assert_eq!(
            sum, self.total_shares,
            "total_shares out of sync with participant map"
        );
        assert!(
            self.shares.values().all(|&s| s > 0),
            "zero-share entry retained in participant map"
        );
        if self.total_shares > 0 {
            assert!(
                self.total_shares <= self.total_pooled as u128 * PRECISION,
                "exchange rate fell below the bootstrap rate"
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
