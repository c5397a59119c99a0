//! Protocol Constants

/// Share accounting constants
pub mod shares {
    /// Fixed-point precision of one whole pool share (1e9 share units).
    ///
    /// Shares are minted and redeemed at this granularity so that floor
    /// rounding happens at the sub-unit level; a bootstrap deposit of one
    /// base unit mints `PRECISION` share units. Share-value products can
    /// exceed u128 at large pool sizes, which is why the mul-div helper
    /// widens to 256 bits.
    pub const PRECISION: u128 = 1_000_000_000;
}
