//! weipool Common Library
//!
//! Shared types, errors, math, and events for the weipool ledger.
//!
//! weipool is a pooled-deposit ledger with proportional, compounding reward
//! distribution. Participants deposit a fungible unit of value ("wei") into
//! a shared pool, an authorized rewarder injects rewards, and every
//! participant can exit with their exact proportional share at any time.
//!
//! The accounting trick is share-based: deposits mint shares at the current
//! exchange rate, rewards inflate the rate without minting shares, and
//! withdrawals redeem shares at the rate in force at exit time. Reward
//! distribution is O(1) in the participant count because nothing per
//! participant is ever touched.
//!
//! This crate is `no_std` compatible when built without the default `std`
//! feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod types;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use types::*;
