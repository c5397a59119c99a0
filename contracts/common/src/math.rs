//! Mathematical Utilities for the weipool Ledger
//!
//! Safe integer arithmetic and the single floor-rounding helper shared by
//! share minting and share redemption.

use crate::errors::{PoolError, PoolResult};

/// Compute `floor(a * b / denominator)` without overflowing.
///
/// This is the one place rounding happens in the whole ledger. Both
/// deposit (share units minted) and withdraw (value redeemed) go through
/// it, so the rounding policy cannot diverge between the two directions.
///
/// Products that fit in u128 divide directly; wider products go through a
/// full 256-bit multiply and long division, so share-value products stay
/// exact across the entire u64 amount range. The only failure modes are a
/// zero denominator and a quotient too large for u128.
///
/// Floor rounding never grants a participant a fractionally larger claim
/// than their contribution; the sub-unit remainder stays in the pool as
/// unattributable dust. That accumulation is intended behavior.
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> PoolResult<u128> {
    if denominator == 0 {
        return Err(PoolError::DivisionByZero);
    }

    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denominator);
    }

    let (hi, lo) = widening_mul(a, b);

    // The quotient reaches 2^128 exactly when the product's high half
    // reaches the denominator.
    if hi >= denominator {
        return Err(PoolError::Overflow);
    }

    Ok(div_wide(hi, lo, denominator))
}

/// Full 256-bit product of two u128 values as (high, low) halves,
/// schoolbook-multiplied in 64-bit limbs
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let (mid, mid_carry) = lh.overflowing_add(hl);
    let (lo, lo_carry) = ll.overflowing_add(mid << 64);
    let hi = hh + (mid >> 64) + ((mid_carry as u128) << 64) + lo_carry as u128;

    (hi, lo)
}

/// Divide the 256-bit value `hi * 2^128 + lo` by `d` with restoring binary
/// long division. Requires `hi < d`, which the caller checks; the quotient
/// then fits in u128.
fn div_wide(hi: u128, lo: u128, d: u128) -> u128 {
    let mut rem = hi;
    let mut quo = 0u128;

    for i in (0..128).rev() {
        // The left shift can carry past bit 127. A carried remainder is
        // at least 2^128 > d, so the wrapping subtraction lands the true
        // remainder back in range.
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quo |= 1 << i;
        }
    }

    quo
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> PoolResult<u64> {
    a.checked_add(b).ok_or(PoolError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u64, b: u64) -> PoolResult<u64> {
    a.checked_sub(b).ok_or(PoolError::Underflow)
}
