//! # Countmark Core
//!
//! Core Rust library for metric-based binary prediction markets.
//!
//! A market stakes value on a YES/NO proposition about an externally
//! observed count (e.g. "will this video reach 1M views by Friday").
//! After the deadline a designated oracle reports the final count; winners
//! claim a pro-rata share of the losing pool minus a fee, and the market
//! creator withdraws the accumulated fees.
//!
//! ## Features
//!
//! - **Market Registry**: sequential-id market records with single-fire
//!   oracle resolution and creator-only fee withdrawal
//! - **Bet Ledger**: sequential-id bet records with per-side pool totals
//!   frozen at placement time
//! - **Settlement Engine**: idempotent per-bet settlement with integer
//!   floor arithmetic that never overpays the losing pool
//! - **Host Seams**: caller identity, clock, inbound deposit proof, and
//!   outbound transfers are all supplied by the execution environment
//!
//! ## Examples
//!
//! ```rust
//! use countmark_core::{Deposit, Engine, Env, RecordingBank, Side};
//!
//! let mut engine = Engine::new("countmark.engine");
//! let env = Env::new("alice", 1_000);
//!
//! // Create a market: does the content hit 1M views by t=2000?
//! let market_id = engine.create_market(
//!     &env,
//!     "youtube".to_string(),
//!     "dQw4w9WgXcQ".to_string(),
//!     1_000_000,
//!     2_000,
//!     "oracle".to_string(),
//!     500,
//! )?;
//!
//! // Stake 100 on YES, bundled with a matching deposit
//! let deposit = Deposit {
//!     sender: "alice".to_string(),
//!     receiver: "countmark.engine".to_string(),
//!     amount: 100,
//! };
//! let bet_id = engine.place_bet(&env, market_id, Side::Yes, 100, &deposit)?;
//!
//! // After the deadline the oracle reports the final count
//! engine.resolve_market(&Env::new("oracle", 2_000), market_id, 1_200_000)?;
//!
//! // Anyone settles; the bettor gets paid
//! let mut bank = RecordingBank::new();
//! let payout = engine.settle_bet(bet_id, &mut bank)?;
//! assert_eq!(payout, 100); // no opposing stake, stake returned
//! Ok::<(), countmark_core::MarketError>(())
//! ```

pub mod bet;
pub mod engine;
pub mod error;
pub mod market;
pub mod transfer;
pub mod utils;

pub use bet::Bet;
pub use engine::{Engine, Env};
pub use error::{MarketError, Result};
pub use market::{Market, SettlementTerms, Side};
pub use transfer::{Deposit, RecordingBank, TransferReceipt, ValueTransfer};
pub use utils::*;

/// Maximum fee rate a market may charge (1000 bps = 10%)
pub const MAX_FEE_BPS: u64 = 1_000;

/// Basis-point denominator (1 bps = 1/10000)
pub const BPS_DENOMINATOR: u64 = 10_000;
