//! End-to-End Scenario Tests
//!
//! Full deposit/reward/withdraw flows that exercise the ledger the way a
//! host would drive it, including the documented accounting properties:
//! conservation, proportional reward split, and dust behavior.

use crate::{PoolLedger, TransferRejected, ValueTransfer};
use std::collections::BTreeMap;
use weipool_common::errors::PoolError;
use weipool_common::types::{derive_address, Address};

/// In-memory bank: credits withdrawn value to per-address accounts
#[derive(Debug, Default)]
struct Bank {
    credits: BTreeMap<Address, u64>,
}

impl Bank {
    fn credited(&self, who: Address) -> u64 {
        self.credits.get(&who).copied().unwrap_or(0)
    }
}

impl ValueTransfer for Bank {
    fn transfer(&mut self, to: Address, amount: u64) -> Result<(), TransferRejected> {
        *self.credits.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

fn team() -> Address {
    derive_address(b"team")
}

fn user_a() -> Address {
    derive_address(b"user-a")
}

fn user_b() -> Address {
    derive_address(b"user-b")
}

#[test]
fn flow_no_late_investors() {
    // A deposits 100 and B deposits 300 for a total of 400 in the pool.
    // A holds 25%, B holds 75%. After a 200 reward, A exits with 150 and
    // B with 450.
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    pool.deposit(user_a(), 100).unwrap();
    pool.deposit(user_b(), 300).unwrap();
    pool.inject_reward(team(), 200).unwrap();

    assert_eq!(pool.withdraw(user_a(), &mut bank).unwrap(), 150);
    assert_eq!(pool.withdraw(user_b(), &mut bank).unwrap(), 450);

    assert_eq!(bank.credited(user_a()), 150);
    assert_eq!(bank.credited(user_b()), 450);
    assert_eq!(pool.total_pooled(), 0);
    pool.assert_invariants();
}

#[test]
fn flow_late_investor_gets_no_reward() {
    // A deposits, the reward lands, then B deposits. A exits with their
    // deposit plus the whole reward; B exits with only their deposit,
    // because the reward predates their shares.
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    pool.deposit(user_a(), 100).unwrap();
    pool.inject_reward(team(), 200).unwrap();
    pool.deposit(user_b(), 300).unwrap();

    assert_eq!(pool.withdraw(user_a(), &mut bank).unwrap(), 300);
    assert_eq!(pool.withdraw(user_b(), &mut bank).unwrap(), 300);
    pool.assert_invariants();
}

#[test]
fn flow_interleaved_deposits_and_rewards() {
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    pool.deposit(user_a(), 100).unwrap(); // A: 100
    pool.inject_reward(team(), 200).unwrap(); // A: 300
    pool.deposit(user_a(), 100).unwrap(); // A: 400
    pool.deposit(user_b(), 300).unwrap(); // B: 300
    pool.inject_reward(team(), 700).unwrap(); // A: 800, B: 600
    pool.deposit(user_b(), 300).unwrap(); // B: 900

    assert_eq!(pool.withdraw(user_a(), &mut bank).unwrap(), 800);
    assert_eq!(pool.withdraw(user_b(), &mut bank).unwrap(), 900);

    assert_eq!(pool.total_shares(), 0);
    assert_eq!(pool.total_pooled(), 0);
    pool.assert_invariants();
}

#[test]
fn rewards_split_proportionally_to_shares() {
    let mut pool = PoolLedger::new(team());

    pool.deposit(user_a(), 200).unwrap();
    pool.deposit(user_b(), 600).unwrap();

    let a_before = pool.balance_of(user_a());
    let b_before = pool.balance_of(user_b());

    pool.inject_reward(team(), 1_000).unwrap();

    let a_gain = pool.balance_of(user_a()) - a_before;
    let b_gain = pool.balance_of(user_b()) - b_before;

    // Shares are 200:600, so the gains split 1:3 within rounding
    assert_eq!(a_gain, 250);
    assert_eq!(b_gain, 750);
}

#[test]
fn conservation_under_interleaving() {
    // Drive a fixed but irregular schedule of deposits, rewards, and exits
    // and check after every step that the sum of redeemable balances never
    // exceeds the pool and the shortfall (dust) never shrinks on its own.
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    let users: Vec<Address> = (0u8..7)
        .map(|i| derive_address(&[b'u', i]))
        .collect();

    fn check(pool: &PoolLedger, users: &[Address]) {
        pool.assert_invariants();
        let redeemable: u128 = users.iter().map(|&u| pool.balance_of(u) as u128).sum();
        assert!(redeemable <= pool.total_pooled() as u128);
    }

    for (step, &user) in users.iter().enumerate() {
        pool.deposit(user, 97 + 31 * step as u64).unwrap();
        check(&pool, &users);

        if step % 2 == 0 {
            pool.inject_reward(team(), 113 + step as u64).unwrap();
            check(&pool, &users);
        }

        if step % 3 == 2 {
            pool.withdraw(users[step / 3], &mut bank).unwrap();
            check(&pool, &users);
        }
    }

    // Everyone still in exits; whatever remains pooled is dust
    for &user in &users {
        if pool.shares_of(user) > 0 {
            pool.withdraw(user, &mut bank).unwrap();
            check(&pool, &users);
        }
    }
    assert_eq!(pool.total_shares(), 0);
}

#[test]
fn floor_remainder_stays_pooled_for_remaining_participants() {
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    // 3 + 3 shares, 7 pooled: each balance is floor(3 * 7 / 6) = 3, so one
    // wei of reward is not attributable to anyone yet
    pool.deposit(user_a(), 3).unwrap();
    pool.deposit(user_b(), 3).unwrap();
    pool.inject_reward(team(), 1).unwrap();

    assert_eq!(pool.balance_of(user_a()), 3);
    assert_eq!(pool.balance_of(user_b()), 3);
    assert_eq!(pool.total_pooled(), 7);

    // A's floored exit leaves the remainder pooled, where it accrues to B;
    // nothing is ever rounded in a withdrawer's favor
    assert_eq!(pool.withdraw(user_a(), &mut bank).unwrap(), 3);
    assert_eq!(pool.balance_of(user_b()), 4);

    // The last exit redeems every outstanding share, so it sweeps the pool
    // exactly and no value is stranded
    assert_eq!(pool.withdraw(user_b(), &mut bank).unwrap(), 4);
    assert_eq!(pool.total_pooled(), 0);
    assert_eq!(bank.credited(user_a()) + bank.credited(user_b()), 7);
    pool.assert_invariants();
}

#[test]
fn large_pool_exits_exactly() {
    // Big enough that share-value products no longer fit in u128; views
    // and exits must stay exact regardless
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    let principal = 1_000_000_000_000_000u64;
    pool.deposit(user_a(), principal).unwrap();
    assert_eq!(pool.balance_of(user_a()), principal);

    pool.inject_reward(team(), principal / 2).unwrap();
    assert_eq!(pool.balance_of(user_a()), principal + principal / 2);

    let amount = pool.withdraw(user_a(), &mut bank).unwrap();
    assert_eq!(amount, principal + principal / 2);
    assert_eq!(bank.credited(user_a()), amount);
    assert_eq!(pool.total_pooled(), 0);
    pool.assert_invariants();
}

#[test]
fn rejected_transfer_leaves_no_trace_in_flow() {
    let mut pool = PoolLedger::new(team());
    let mut bank = Bank::default();

    pool.deposit(user_a(), 100).unwrap();
    pool.deposit(user_b(), 300).unwrap();
    pool.inject_reward(team(), 200).unwrap();

    let mut rejecting =
        |_to: Address, _amount: u64| -> Result<(), TransferRejected> { Err(TransferRejected) };
    assert!(matches!(
        pool.withdraw(user_a(), &mut rejecting),
        Err(PoolError::TransferFailed { .. })
    ));

    // B's exit is unaffected by A's failed attempt
    assert_eq!(pool.withdraw(user_b(), &mut bank).unwrap(), 450);
    assert_eq!(pool.withdraw(user_a(), &mut bank).unwrap(), 150);
    pool.assert_invariants();
}
