//! # Market Registry & Bet Ledger
//!
//! The [`Engine`] owns the two record arenas (markets and bets), the
//! sequential id counters, and every state transition: market creation,
//! bet placement, oracle resolution, per-bet settlement, and fee
//! withdrawal.
//!
//! The host is assumed to execute each public operation to completion,
//! atomically and serially, and to commit its effects all-or-nothing.
//! The engine relies on that guarantee instead of locking; its own
//! obligation is that every operation validates fully before mutating,
//! so a rejected call leaves no partial state behind.

use crate::{
    bet::Bet,
    error::Result,
    market::{Market, Side},
    transfer::{Deposit, ValueTransfer},
    MarketError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-invocation inputs supplied by the execution environment.
#[derive(Clone, Debug)]
pub struct Env {
    /// Identity of the current caller
    pub caller: String,

    /// Current Unix timestamp
    pub now: u64,
}

impl Env {
    pub fn new(caller: impl Into<String>, now: u64) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }
}

/// Market registry and bet ledger for a single engine deployment.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Engine {
    /// The engine's own receiving address for bundled deposits
    own_address: String,

    /// Market records keyed by sequential id
    markets: BTreeMap<u64, Market>,

    /// Bet records keyed by sequential id
    bets: BTreeMap<u64, Bet>,

    /// Next market id to assign
    next_market_id: u64,

    /// Next bet id to assign
    next_bet_id: u64,
}

impl Engine {
    /// Creates an empty engine that receives deposits at `own_address`.
    pub fn new(own_address: impl Into<String>) -> Self {
        Self {
            own_address: own_address.into(),
            markets: BTreeMap::new(),
            bets: BTreeMap::new(),
            next_market_id: 0,
            next_bet_id: 0,
        }
    }

    /// The address bundled deposits must be sent to
    pub fn own_address(&self) -> &str {
        &self.own_address
    }

    // ─── Market Registry ──────────────────────────────────────────

    /// Create a new market and return its id.
    ///
    /// The caller becomes the market's `creator`. No value transfer
    /// occurs; stakes only enter through `place_bet`.
    pub fn create_market(
        &mut self,
        env: &Env,
        platform: String,
        content_id: String,
        target_count: u64,
        deadline: u64,
        oracle: String,
        fee_bps: u64,
    ) -> Result<u64> {
        let market_id = self.next_market_id;
        let market = Market::new(
            market_id,
            platform,
            content_id,
            target_count,
            deadline,
            env.caller.clone(),
            oracle,
            fee_bps,
            env.now,
        )?;

        self.markets.insert(market_id, market);
        self.next_market_id += 1;
        Ok(market_id)
    }

    /// Report the final observed count and close the market.
    ///
    /// Only the market's oracle may call this, only once the deadline has
    /// passed, and only once: the transition is single-fire so settlement
    /// always computes against one immutable outcome.
    pub fn resolve_market(&mut self, env: &Env, market_id: u64, final_count: u64) -> Result<()> {
        let market = self.market_mut(market_id)?;

        if env.caller != market.oracle {
            return Err(MarketError::Authorization(format!(
                "Only oracle {} may resolve market {market_id}",
                market.oracle
            )));
        }
        if env.now < market.deadline {
            return Err(MarketError::Timing(format!(
                "Market {market_id} cannot resolve before deadline {}",
                market.deadline
            )));
        }
        if market.resolved {
            return Err(MarketError::State(format!(
                "Market {market_id} already resolved"
            )));
        }

        market.resolved = true;
        market.final_count = final_count;
        Ok(())
    }

    /// Withdraw the market's accumulated fees to its creator.
    ///
    /// The fee balance is zeroed before the outbound transfer is issued,
    /// so a re-entrant call cannot withdraw the same balance twice.
    pub fn withdraw_fees(
        &mut self,
        env: &Env,
        market_id: u64,
        bank: &mut dyn ValueTransfer,
    ) -> Result<u64> {
        let market = self.market_mut(market_id)?;

        if env.caller != market.creator {
            return Err(MarketError::Authorization(format!(
                "Only creator {} may withdraw fees from market {market_id}",
                market.creator
            )));
        }
        if market.collected_fees == 0 {
            return Err(MarketError::NothingToWithdraw(market_id));
        }

        let amount = market.collected_fees;
        market.collected_fees = 0;
        let creator = market.creator.clone();

        bank.transfer(&creator, amount)?;
        Ok(amount)
    }

    // ─── Bet Ledger & Settlement ──────────────────────────────────

    /// Record a stake on one side of an open market and return the bet id.
    ///
    /// The host must bundle an inbound transfer with this call; `deposit`
    /// is its proof and must match the declared amount, the caller, and
    /// this engine's own address exactly.
    pub fn place_bet(
        &mut self,
        env: &Env,
        market_id: u64,
        side: Side,
        amount: u64,
        deposit: &Deposit,
    ) -> Result<u64> {
        let market = self.get_market(market_id)?;

        if market.resolved {
            return Err(MarketError::State(format!(
                "Market {market_id} is closed for betting"
            )));
        }
        if market.is_past_deadline(env.now) {
            return Err(MarketError::Timing(format!(
                "Market {market_id} deadline {} has passed",
                market.deadline
            )));
        }
        if amount == 0 {
            return Err(MarketError::Validation(
                "Bet amount must be greater than zero".to_string(),
            ));
        }
        if deposit.amount != amount {
            return Err(MarketError::PaymentMismatch(format!(
                "Deposit of {} does not match declared bet of {amount}",
                deposit.amount
            )));
        }
        if deposit.sender != env.caller {
            return Err(MarketError::PaymentMismatch(format!(
                "Deposit sender {} is not the caller {}",
                deposit.sender, env.caller
            )));
        }
        if deposit.receiver != self.own_address {
            return Err(MarketError::PaymentMismatch(format!(
                "Deposit receiver {} is not the market engine {}",
                deposit.receiver, self.own_address
            )));
        }

        // Pool totals must stay exact for conservation, so an overflowing
        // stake is rejected rather than saturated.
        let new_side_total = market
            .pool(side)
            .checked_add(amount)
            .ok_or_else(|| MarketError::Validation("Pool total overflow".to_string()))?;
        new_side_total
            .checked_add(market.pool(side.other()))
            .ok_or_else(|| MarketError::Validation("Pool total overflow".to_string()))?;

        let bet_id = self.next_bet_id;
        let bet = Bet::new(bet_id, market_id, env.caller.clone(), side, amount);

        let market = self.market_mut(market_id)?;
        match side {
            Side::Yes => market.total_yes_stake = new_side_total,
            Side::No => market.total_no_stake = new_side_total,
        }
        self.bets.insert(bet_id, bet);
        self.next_bet_id += 1;
        Ok(bet_id)
    }

    /// Settle a single bet on a resolved market and return the payout.
    ///
    /// Callable by anyone, any number of times, in any order across bets;
    /// only the first invocation per bet moves funds. The bet is marked
    /// settled and fees are accrued *before* the outbound transfer is
    /// issued.
    pub fn settle_bet(&mut self, bet_id: u64, bank: &mut dyn ValueTransfer) -> Result<u64> {
        let bet = self
            .bets
            .get(&bet_id)
            .ok_or_else(|| MarketError::NotFound(format!("Bet {bet_id} does not exist")))?;

        if bet.settled {
            return Err(MarketError::AlreadySettled(bet_id));
        }

        let (market_id, bettor, side, amount) = (
            bet.market_id,
            bet.bettor.clone(),
            bet.side,
            bet.amount,
        );

        let market = self.get_market(market_id)?;
        let terms = market.settlement_terms(side, amount)?;

        let market = self.market_mut(market_id)?;
        market.collected_fees = market.collected_fees.saturating_add(terms.fee);

        // settled flips in every branch, including a zero payout
        if let Some(bet) = self.bets.get_mut(&bet_id) {
            bet.settled = true;
        }

        if terms.payout > 0 {
            bank.transfer(&bettor, terms.payout)?;
        }
        Ok(terms.payout)
    }

    // ─── Read accessors ───────────────────────────────────────────

    /// Look up a market by id
    pub fn get_market(&self, market_id: u64) -> Result<&Market> {
        self.markets
            .get(&market_id)
            .ok_or_else(|| MarketError::NotFound(format!("Market {market_id} does not exist")))
    }

    /// Look up a bet by id
    pub fn get_bet(&self, bet_id: u64) -> Result<&Bet> {
        self.bets
            .get(&bet_id)
            .ok_or_else(|| MarketError::NotFound(format!("Bet {bet_id} does not exist")))
    }

    /// All markets in id order
    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    /// All bets in id order
    pub fn bets(&self) -> impl Iterator<Item = &Bet> {
        self.bets.values()
    }

    /// All bets referencing the given market, in id order
    pub fn market_bets(&self, market_id: u64) -> impl Iterator<Item = &Bet> {
        self.bets.values().filter(move |b| b.market_id == market_id)
    }

    // ─── Snapshots ────────────────────────────────────────────────

    /// Serialize the full registry and ledger state to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore an engine from a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn market_mut(&mut self, market_id: u64) -> Result<&mut Market> {
        self.markets
            .get_mut(&market_id)
            .ok_or_else(|| MarketError::NotFound(format!("Market {market_id} does not exist")))
    }
}
