//! Bet ledger records.

use crate::market::Side;
use serde::{Deserialize, Serialize};

/// Represents a single stake on one side of one market.
///
/// Every field except `settled` is immutable after placement; `settled`
/// flips to true exactly once, when settlement first runs for this bet.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Bet {
    /// Unique bet identifier (sequential, starting at 0)
    pub bet_id: u64,

    /// The market this bet belongs to
    pub market_id: u64,

    /// Identity of the staking party; receives the payout
    pub bettor: String,

    /// Chosen side
    pub side: Side,

    /// Staked value, equal to the bundled inbound transfer
    pub amount: u64,

    /// Idempotency flag: false until settlement runs exactly once
    pub settled: bool,
}

impl Bet {
    pub fn new(bet_id: u64, market_id: u64, bettor: String, side: Side, amount: u64) -> Self {
        Self {
            bet_id,
            market_id,
            bettor,
            side,
            amount,
            settled: false,
        }
    }
}
