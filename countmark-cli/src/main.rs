//! # Countmark CLI
//!
//! Command-line host for metric-based binary prediction markets.
//!
//! The CLI plays the role of the execution environment: it supplies the
//! caller identity and clock for each invocation, bundles the inbound
//! deposit proof for `bet`, executes outbound transfers (printed as
//! receipts), and commits engine state all-or-nothing by rewriting the
//! JSON snapshot only when the invocation succeeds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use countmark_core::{utils::*, Bet, Deposit, Engine, Env, Market, RecordingBank, Side};
use std::path::{Path, PathBuf};

/// Default receiving address recorded in fresh snapshots
const DEFAULT_ENGINE_ADDRESS: &str = "countmark.engine";

#[derive(Parser)]
#[command(name = "countmark")]
#[command(about = "Lifecycle and settlement engine for metric-based binary prediction markets")]
#[command(version)]
struct Cli {
    /// Path to the engine state snapshot
    #[arg(long, default_value = "countmark.json", global = true)]
    state: PathBuf,

    /// Caller identity for this invocation
    #[arg(long, default_value = "anonymous", global = true)]
    caller: String,

    /// Clock override (Unix timestamp); defaults to system time
    #[arg(long, global = true)]
    now: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new prediction market
    Create {
        /// External metric source (e.g. youtube)
        #[arg(short, long)]
        platform: String,
        /// Content identifier on that platform
        #[arg(short, long)]
        content_id: String,
        /// Count threshold for a YES outcome
        #[arg(short, long)]
        target: u64,
        /// Betting deadline (Unix timestamp)
        #[arg(short, long)]
        deadline: u64,
        /// Oracle identity authorized to resolve
        #[arg(short, long)]
        oracle: String,
        /// Fee on profits in basis points (max 1000)
        #[arg(short, long, default_value = "0")]
        fee_bps: u64,
    },
    /// Place a bet, bundling a matching deposit from the caller
    Bet {
        /// Market ID
        #[arg(short, long)]
        market: u64,
        /// Side to stake on (yes or no)
        #[arg(short, long)]
        side: String,
        /// Amount to stake
        #[arg(short, long)]
        amount: u64,
    },
    /// Report the final count and resolve a market (oracle only)
    Resolve {
        /// Market ID
        #[arg(short, long)]
        market: u64,
        /// Final observed count
        #[arg(short, long)]
        final_count: u64,
    },
    /// Settle a single bet on a resolved market
    Settle {
        /// Bet ID
        bet_id: u64,
    },
    /// Withdraw accumulated fees (creator only)
    Withdraw {
        /// Market ID
        market: u64,
    },
    /// Show market information
    Market {
        /// Market ID
        market_id: u64,
    },
    /// Show bet information
    BetInfo {
        /// Bet ID
        bet_id: u64,
    },
    /// List all markets
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = Env::new(
        cli.caller.clone(),
        cli.now
            .unwrap_or_else(|| chrono::Utc::now().timestamp() as u64),
    );
    let mut engine = load_engine(&cli.state)?;
    let mut bank = RecordingBank::new();

    match cli.command {
        Commands::Create {
            platform,
            content_id,
            target,
            deadline,
            oracle,
            fee_bps,
        } => {
            let market_id =
                engine.create_market(&env, platform, content_id, target, deadline, oracle, fee_bps)?;
            save_engine(&engine, &cli.state)?;

            println!("{}", "Market Created Successfully!".green().bold());
            print_market(engine.get_market(market_id)?);
        }

        Commands::Bet {
            market,
            side,
            amount,
        } => {
            let side = parse_side(&side)?;
            // The CLI is the host: it bundles the deposit with the call.
            let deposit = Deposit {
                sender: env.caller.clone(),
                receiver: engine.own_address().to_string(),
                amount,
            };
            let bet_id = engine.place_bet(&env, market, side, amount, &deposit)?;
            save_engine(&engine, &cli.state)?;

            println!("{}", "Bet Placed!".green().bold());
            print_bet(engine.get_bet(bet_id)?);
        }

        Commands::Resolve {
            market,
            final_count,
        } => {
            engine.resolve_market(&env, market, final_count)?;
            save_engine(&engine, &cli.state)?;

            println!("{}", "Market Resolved!".green().bold());
            print_market(engine.get_market(market)?);
        }

        Commands::Settle { bet_id } => {
            let payout = engine.settle_bet(bet_id, &mut bank)?;
            save_engine(&engine, &cli.state)?;

            println!("{}", "Bet Settled!".green().bold());
            println!("{}: {}", "Payout".yellow().bold(), payout);
            print_receipts(&bank);
        }

        Commands::Withdraw { market } => {
            let amount = engine.withdraw_fees(&env, market, &mut bank)?;
            save_engine(&engine, &cli.state)?;

            println!("{}", "Fees Withdrawn!".green().bold());
            println!("{}: {}", "Amount".yellow().bold(), amount);
            print_receipts(&bank);
        }

        Commands::Market { market_id } => {
            print_market(engine.get_market(market_id)?);
            for bet in engine.market_bets(market_id) {
                print_bet(bet);
            }
        }

        Commands::BetInfo { bet_id } => {
            print_bet(engine.get_bet(bet_id)?);
        }

        Commands::List => {
            if engine.markets().next().is_none() {
                println!("{}", "No markets yet.".yellow());
            }
            for market in engine.markets() {
                println!(
                    "{} {}/{} target {} | {}",
                    format!("#{}", market.market_id).cyan().bold(),
                    market.platform,
                    market.content_id,
                    market.target_count,
                    market.status()
                );
            }
        }
    }

    Ok(())
}

/// Load the engine snapshot, or start fresh if none exists yet.
fn load_engine(path: &Path) -> Result<Engine> {
    if path.exists() {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        Ok(Engine::from_json(&json)?)
    } else {
        Ok(Engine::new(DEFAULT_ENGINE_ADDRESS))
    }
}

/// Commit the invocation: rewrite the snapshot. Called only on success.
fn save_engine(engine: &Engine, path: &Path) -> Result<()> {
    std::fs::write(path, engine.to_json()?)
        .with_context(|| format!("Failed to write state file {}", path.display()))
}

fn parse_side(side: &str) -> Result<Side> {
    match side.to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(Side::Yes),
        "no" | "n" => Ok(Side::No),
        other => anyhow::bail!("Side must be 'yes' or 'no', got '{other}'"),
    }
}

fn print_market(market: &Market) {
    println!("{}", "═".repeat(50).bright_black());
    println!("{}: {}", "Market ID".yellow().bold(), market.market_id);
    println!(
        "{}: {} views of {}/{}",
        "Target".yellow().bold(),
        market.target_count,
        market.platform,
        market.content_id
    );
    println!(
        "{}: {}",
        "Deadline".yellow().bold(),
        format_timestamp(market.deadline)
    );
    println!("{}: {}", "Creator".yellow().bold(), market.creator);
    println!("{}: {}", "Oracle".yellow().bold(), market.oracle);
    println!("{}: {} bps", "Fee".yellow().bold(), market.fee_bps);
    println!(
        "{}: {} YES / {} NO",
        "Pools".yellow().bold(),
        market.total_yes_stake,
        market.total_no_stake
    );
    println!(
        "{}: {}",
        "Collected Fees".yellow().bold(),
        market.collected_fees
    );
    println!("{}: {}", "Status".cyan().bold(), market.status());
    println!("{}", "═".repeat(50).bright_black());
}

fn print_bet(bet: &Bet) {
    println!(
        "{} market {} | {} stakes {} on {} | {}",
        format!("bet {}", bet.bet_id).cyan().bold(),
        bet.market_id,
        bet.bettor,
        bet.amount,
        bet.side,
        if bet.settled {
            "settled".green()
        } else {
            "open".yellow()
        }
    );
}

fn print_receipts(bank: &RecordingBank) {
    for receipt in &bank.receipts {
        println!(
            "{}: {} -> {}",
            "Transfer".bright_blue().bold(),
            receipt.amount,
            receipt.to
        );
    }
}
