//! Simple prediction market example
//!
//! Demonstrates the full market lifecycle: create, bet on both sides,
//! resolve via the oracle, settle each bet, and withdraw fees.

use countmark_core::{utils::*, Deposit, Engine, Env, RecordingBank, Result, Side};

fn main() -> Result<()> {
    println!("Countmark Market Lifecycle Example");
    println!("==================================\n");

    let mut engine = Engine::new("countmark.engine");

    // 1. Carol creates a market: will the video reach 100k views by t=2000?
    let market_id = engine.create_market(
        &Env::new("carol", 1_000),
        "youtube".to_string(),
        "dQw4w9WgXcQ".to_string(),
        100_000,
        2_000,
        "oracle".to_string(),
        500, // 5% fee on profits
    )?;
    let market = engine.get_market(market_id)?;
    println!("1. Market {market_id} created by {}", market.creator);
    println!("   Target: {} views on {}/{}", market.target_count, market.platform, market.content_id);
    println!("   Deadline: {}", format_timestamp(market.deadline));
    println!();

    // 2. Alice stakes 100 on YES, Bob stakes 300 on NO.
    let deposit = |who: &str, amount: u64| Deposit {
        sender: who.to_string(),
        receiver: "countmark.engine".to_string(),
        amount,
    };
    let alice_bet = engine.place_bet(
        &Env::new("alice", 1_500),
        market_id,
        Side::Yes,
        100,
        &deposit("alice", 100),
    )?;
    let bob_bet = engine.place_bet(
        &Env::new("bob", 1_600),
        market_id,
        Side::No,
        300,
        &deposit("bob", 300),
    )?;
    println!("2. Alice staked 100 on YES (bet {alice_bet}), Bob staked 300 on NO (bet {bob_bet})");
    println!("   {}", engine.get_market(market_id)?.status());
    println!();

    // 3. After the deadline the oracle reports 150k views: YES wins.
    engine.resolve_market(&Env::new("oracle", 2_100), market_id, 150_000)?;
    println!("3. {}", engine.get_market(market_id)?.status());
    println!();

    // 4. Anyone can settle each bet; winners get paid pro-rata.
    let mut bank = RecordingBank::new();
    let alice_payout = engine.settle_bet(alice_bet, &mut bank)?;
    let bob_payout = engine.settle_bet(bob_bet, &mut bank)?;
    println!("4. Alice's payout: {alice_payout} (stake 100 + profit 300 - fee 15)");
    println!("   Bob's payout: {bob_payout}");
    println!();

    // 5. Carol withdraws the accumulated fees.
    let fees = engine.withdraw_fees(&Env::new("carol", 2_200), market_id, &mut bank)?;
    println!("5. Carol withdrew {fees} in fees");
    println!("\nTransfers issued:");
    for receipt in &bank.receipts {
        println!("   -> {} received {}", receipt.to, receipt.amount);
    }

    Ok(())
}
