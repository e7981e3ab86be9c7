//! # Market Registry Types
//!
//! This module implements the market record and the settlement arithmetic
//! for metric-based binary prediction markets: a market asks whether an
//! externally observed count (views, plays, downloads, whatever the
//! platform reports) reaches a target by a deadline, and a designated
//! oracle reports the final count after the deadline.

use crate::{error::Result, MarketError, BPS_DENOMINATOR, MAX_FEE_BPS};
use serde::{Deserialize, Serialize};

/// Side of a binary bet.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The opposing side.
    pub fn other(self) -> Side {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Yes => write!(f, "YES"),
            Side::No => write!(f, "NO"),
        }
    }
}

/// Represents a single binary prediction market.
///
/// A market is created open, accepts bets until its deadline, is resolved
/// exactly once by its oracle, and thereafter is read-only except for the
/// fee balance mutated by settlement and fee withdrawal.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Market {
    /// Unique market identifier (sequential, starting at 0)
    pub market_id: u64,

    /// External metric source, e.g. a platform name
    pub platform: String,

    /// Identifier of the content being measured on that platform
    pub content_id: String,

    /// Threshold the final observed count is compared against
    pub target_count: u64,

    /// Unix timestamp after which betting closes and resolution opens
    pub deadline: u64,

    /// Phase flag: false = open, true = resolved (terminal)
    pub resolved: bool,

    /// Oracle-reported count; meaningful only when `resolved`
    pub final_count: u64,

    /// Identity that created the market; receives withdrawn fees
    pub creator: String,

    /// Identity authorized to resolve the market
    pub oracle: String,

    /// Fee rate in basis points, capped at [`MAX_FEE_BPS`]
    pub fee_bps: u64,

    /// Running total staked on YES
    pub total_yes_stake: u64,

    /// Running total staked on NO
    pub total_no_stake: u64,

    /// Accumulated, withdrawable-by-creator fee balance
    pub collected_fees: u64,
}

/// Outcome of the settlement arithmetic for a single bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementTerms {
    /// Amount owed to the bettor (zero for a losing bet)
    pub payout: u64,

    /// Fee accrued to the market's fee balance
    pub fee: u64,
}

impl Market {
    /// Creates a new open market with the specified parameters.
    ///
    /// # Arguments
    /// * `market_id` - Sequential identifier assigned by the registry
    /// * `platform` - External metric source (e.g. "youtube")
    /// * `content_id` - Content identifier on that platform
    /// * `target_count` - Count threshold for a YES outcome
    /// * `deadline` - Unix timestamp; must be strictly in the future
    /// * `creator` - Caller identity, bound for fee withdrawal
    /// * `oracle` - Identity authorized to resolve
    /// * `fee_bps` - Fee rate in basis points (max 1000 = 10%)
    /// * `now` - Current time supplied by the host
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: u64,
        platform: String,
        content_id: String,
        target_count: u64,
        deadline: u64,
        creator: String,
        oracle: String,
        fee_bps: u64,
        now: u64,
    ) -> Result<Self> {
        if platform.is_empty() || content_id.is_empty() {
            return Err(MarketError::Validation(
                "Platform and content ID must be non-empty".to_string(),
            ));
        }
        if fee_bps > MAX_FEE_BPS {
            return Err(MarketError::Validation(format!(
                "Fee {fee_bps} bps exceeds maximum of {MAX_FEE_BPS}"
            )));
        }
        if deadline <= now {
            return Err(MarketError::Validation(format!(
                "Deadline {deadline} must be in the future (now {now})"
            )));
        }

        Ok(Self {
            market_id,
            platform,
            content_id,
            target_count,
            deadline,
            resolved: false,
            final_count: 0,
            creator,
            oracle,
            fee_bps,
            total_yes_stake: 0,
            total_no_stake: 0,
            collected_fees: 0,
        })
    }

    /// Check whether the betting window has closed
    pub fn is_past_deadline(&self, now: u64) -> bool {
        now > self.deadline
    }

    /// The winning side, or `None` while the market is unresolved.
    ///
    /// YES wins iff the oracle-reported count reached the target.
    pub fn winning_side(&self) -> Option<Side> {
        if !self.resolved {
            return None;
        }
        if self.final_count >= self.target_count {
            Some(Side::Yes)
        } else {
            Some(Side::No)
        }
    }

    /// Total staked on the given side
    pub fn pool(&self, side: Side) -> u64 {
        match side {
            Side::Yes => self.total_yes_stake,
            Side::No => self.total_no_stake,
        }
    }

    /// Compute payout and fee for a single bet on a resolved market.
    ///
    /// Pool totals are frozen at bet-placement time, so the terms for one
    /// bet are independent of how many other bets have already settled.
    ///
    /// # Algorithm
    /// - Losing side: payout 0, fee 0.
    /// - Winning side with an empty pool on either side: the bet's own
    ///   stake is returned, fee-free. An empty losers pool means there was
    ///   nothing to win; an empty winners pool cannot occur for a real
    ///   winning bet (its own stake is in the pool) and is handled the
    ///   same way as a guard.
    /// - Otherwise:
    ///   `profit = floor(amount × losers_pool / winners_pool)`,
    ///   `fee = floor(profit × fee_bps / 10000)`,
    ///   `payout = amount + profit - fee`.
    ///
    /// Floor division biases rounding in the protocol's favor: the sum of
    /// all winners' individually floored profits cannot exceed the losers
    /// pool.
    pub fn settlement_terms(&self, side: Side, amount: u64) -> Result<SettlementTerms> {
        let winner = self.winning_side().ok_or_else(|| {
            MarketError::State(format!("Market {} is not resolved", self.market_id))
        })?;

        if side != winner {
            return Ok(SettlementTerms { payout: 0, fee: 0 });
        }

        let winners_pool = self.pool(winner);
        let losers_pool = self.pool(winner.other());

        if winners_pool == 0 || losers_pool == 0 {
            return Ok(SettlementTerms {
                payout: amount,
                fee: 0,
            });
        }

        // u128 intermediates: amount × losers_pool can exceed u64. The
        // quotient fits back into u64 because amount <= winners_pool.
        let profit = ((amount as u128 * losers_pool as u128) / winners_pool as u128) as u64;
        let fee = ((profit as u128 * self.fee_bps as u128) / BPS_DENOMINATOR as u128) as u64;
        let payout = amount + profit - fee;

        Ok(SettlementTerms { payout, fee })
    }

    /// Get market status summary
    pub fn status(&self) -> String {
        match self.winning_side() {
            Some(side) => format!(
                "Resolved - {} won (final count {} vs target {})",
                side, self.final_count, self.target_count
            ),
            None => format!(
                "Open - betting until {} ({} YES / {} NO staked)",
                self.deadline, self.total_yes_stake, self.total_no_stake
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_market() -> Market {
        Market::new(
            0,
            "youtube".to_string(),
            "dQw4w9WgXcQ".to_string(),
            100,
            2_000,
            "alice".to_string(),
            "oracle".to_string(),
            500,
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn test_new_market_starts_open_and_zeroed() {
        let market = create_test_market();
        assert!(!market.resolved);
        assert_eq!(market.total_yes_stake, 0);
        assert_eq!(market.total_no_stake, 0);
        assert_eq!(market.collected_fees, 0);
        assert_eq!(market.winning_side(), None);
    }

    #[test]
    fn test_new_market_rejects_excessive_fee() {
        let result = Market::new(
            0,
            "youtube".to_string(),
            "dQw4w9WgXcQ".to_string(),
            100,
            2_000,
            "alice".to_string(),
            "oracle".to_string(),
            1_001,
            1_000,
        );
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }

    #[test]
    fn test_new_market_rejects_past_deadline() {
        let result = Market::new(
            0,
            "youtube".to_string(),
            "dQw4w9WgXcQ".to_string(),
            100,
            1_000, // equals now; must be strictly greater
            "alice".to_string(),
            "oracle".to_string(),
            500,
            1_000,
        );
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }

    #[test]
    fn test_new_market_rejects_empty_identifiers() {
        let result = Market::new(
            0,
            String::new(),
            "dQw4w9WgXcQ".to_string(),
            100,
            2_000,
            "alice".to_string(),
            "oracle".to_string(),
            500,
            1_000,
        );
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }

    #[test]
    fn test_winning_side_threshold_is_inclusive() {
        let mut market = create_test_market();
        market.resolved = true;

        market.final_count = 100; // exactly the target counts as YES
        assert_eq!(market.winning_side(), Some(Side::Yes));

        market.final_count = 99;
        assert_eq!(market.winning_side(), Some(Side::No));
    }

    #[test]
    fn test_settlement_terms_unresolved_market_fails() {
        let market = create_test_market();
        let result = market.settlement_terms(Side::Yes, 100);
        assert!(matches!(result, Err(MarketError::State(_))));
    }

    #[test]
    fn test_settlement_terms_worked_scenario() {
        // winners pool 100, losers pool 300, fee 500 bps
        let mut market = create_test_market();
        market.total_yes_stake = 100;
        market.total_no_stake = 300;
        market.resolved = true;
        market.final_count = 150;

        let terms = market.settlement_terms(Side::Yes, 100).unwrap();
        assert_eq!(terms.payout, 385, "100 + 300 profit - 15 fee");
        assert_eq!(terms.fee, 15);

        let loser = market.settlement_terms(Side::No, 300).unwrap();
        assert_eq!(loser.payout, 0);
        assert_eq!(loser.fee, 0);
    }

    #[test]
    fn test_settlement_terms_empty_losers_pool_refunds_stake() {
        let mut market = create_test_market();
        market.total_yes_stake = 500;
        market.total_no_stake = 0;
        market.resolved = true;
        market.final_count = 150;

        let terms = market.settlement_terms(Side::Yes, 200).unwrap();
        assert_eq!(terms.payout, 200, "no opposing stake, stake returned");
        assert_eq!(terms.fee, 0);
    }

    #[test]
    fn test_settlement_terms_fee_boundaries() {
        // P=1, L=0: stake refund, no fee
        let mut market = create_test_market();
        market.total_yes_stake = 1;
        market.total_no_stake = 0;
        market.resolved = true;
        market.final_count = 150;
        let terms = market.settlement_terms(Side::Yes, 1).unwrap();
        assert_eq!((terms.payout, terms.fee), (1, 0));

        // F=1000 (max fee): fee = floor(profit / 10)
        market.fee_bps = 1_000;
        market.total_yes_stake = 7;
        market.total_no_stake = 13;
        let terms = market.settlement_terms(Side::Yes, 7).unwrap();
        // profit = floor(7*13/7) = 13, fee = floor(13*1000/10000) = 1
        assert_eq!(terms.fee, 1);
        assert_eq!(terms.payout, 7 + 13 - 1);
    }

    #[test]
    fn test_settlement_terms_floored_profits_never_exceed_losers_pool() {
        // Three winners with awkward shares against a pool that does not
        // divide evenly.
        let mut market = create_test_market();
        market.total_yes_stake = 100;
        market.total_no_stake = 7;
        market.resolved = true;
        market.final_count = 150;
        market.fee_bps = 0;

        let stakes = [33u64, 33, 34];
        let mut paid_profit = 0u64;
        for stake in stakes {
            let terms = market.settlement_terms(Side::Yes, stake).unwrap();
            paid_profit += terms.payout - stake;
        }
        assert!(
            paid_profit <= market.total_no_stake,
            "summed profits {paid_profit} exceed losers pool"
        );
    }

    #[test]
    fn test_settlement_terms_large_pools_no_overflow() {
        let mut market = create_test_market();
        market.total_yes_stake = u64::MAX / 2;
        market.total_no_stake = u64::MAX / 2;
        market.resolved = true;
        market.final_count = 150;
        market.fee_bps = 1_000;

        let amount = u64::MAX / 4;
        let terms = market.settlement_terms(Side::Yes, amount).unwrap();
        assert!(terms.payout >= amount, "winner never receives less than stake");
    }
}
