//! Error Types for the weipool Ledger
//!
//! Typed errors with context fields so callers and off-chain tooling get
//! actionable feedback. Every failure is a synchronous rejection of the
//! triggering call; no error leaves partial state behind.

use crate::types::Address;

/// Result type alias for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Main error enum for all weipool ledger errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    // ============ Amount Errors ============
    /// A supplied amount is zero where a positive amount is required
    InvalidAmount { amount: u64 },

    /// Deposit would mint zero share units despite a positive amount.
    /// Happens only when the exchange rate has inflated far beyond 1:1;
    /// a policy trigger the deployer must see, not a silent success.
    ZeroShareMint {
        amount: u64,
        total_shares: u128,
        total_pooled: u64,
    },

    // ============ Participant Errors ============
    /// Withdrawal attempted with zero shares outstanding
    NoBalance { participant: Address },

    /// Reward injection attempted while no shares exist to inflate.
    /// Accepting it would strand the funds with no owner.
    NoParticipants,

    // ============ Authorization Errors ============
    /// Caller is not the designated rewarder
    Unauthorized { expected: Address, actual: Address },

    // ============ Transfer Errors ============
    /// The value transfer during withdrawal did not complete; the whole
    /// withdrawal (state mutation included) is treated as never happened
    TransferFailed { to: Address, amount: u64 },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,
}

impl PoolError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "E001_INVALID_AMOUNT",
            Self::ZeroShareMint { .. } => "E002_ZERO_SHARE_MINT",
            Self::NoBalance { .. } => "E003_NO_BALANCE",
            Self::NoParticipants => "E004_NO_PARTICIPANTS",
            Self::Unauthorized { .. } => "E005_UNAUTHORIZED",
            Self::TransferFailed { .. } => "E006_TRANSFER_FAILED",
            Self::Overflow => "E010_OVERFLOW",
            Self::Underflow => "E011_UNDERFLOW",
            Self::DivisionByZero => "E012_DIV_ZERO",
        }
    }

    /// Returns true if the caller can fix the condition and retry
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidAmount { .. } => true,  // Send a positive amount
            Self::ZeroShareMint { .. } => true,  // Deposit more value
            Self::NoParticipants => true,        // Wait for a depositor
            Self::TransferFailed { .. } => true, // Fix the receiving account
            _ => false,
        }
    }
}
