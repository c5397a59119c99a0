//! Ledger Events
//!
//! Events are emitted during ledger execution and collected in an in-memory
//! log the host drains for monitoring, auditing, and UIs. Transport and
//! encoding past the borsh byte form are the host's concern.

use crate::types::Address;
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    Deposit = 0x01,
    Withdraw = 0x02,
    Reward = 0x03,
}

/// All observable ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum PoolEvent {
    /// Emitted when a participant deposits value into the pool
    Deposit {
        participant: Address,
        amount: u64,
        shares_minted: u128,
    },

    /// Emitted when a participant exits with their full entitlement
    Withdraw { participant: Address, amount: u64 },

    /// Emitted when the authorized rewarder inflates the pool
    Reward { amount: u64 },
}

impl PoolEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Deposit { .. } => EventType::Deposit,
            Self::Withdraw { .. } => EventType::Withdraw,
            Self::Reward { .. } => EventType::Reward,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EventLog {
    events: Vec<PoolEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: PoolEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Take ownership of all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<PoolEvent> {
        core::mem::take(&mut self.events)
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&PoolEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
