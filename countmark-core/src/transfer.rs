//! Value-transfer collaborator seams.
//!
//! The engine never moves value itself. Inbound value arrives as a
//! [`Deposit`] proof bundled atomically with `place_bet` by the host;
//! outbound value leaves through a host-supplied [`ValueTransfer`]
//! implementation. Sending fees are the host's concern and are never
//! deducted from a payout.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Proof of an inbound transfer bundled with a `place_bet` invocation.
///
/// The host guarantees the transfer and the call commit (or fail)
/// together; the engine only checks that the proof matches the declared
/// bet.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Deposit {
    /// Identity that sent the funds
    pub sender: String,

    /// Identity that received the funds
    pub receiver: String,

    /// Transferred amount
    pub amount: u64,
}

/// Outbound transfer primitive supplied by the host.
///
/// An error return aborts the invocation; the host discards all of the
/// invocation's state changes (all-or-nothing commit).
pub trait ValueTransfer {
    fn transfer(&mut self, to: &str, amount: u64) -> Result<()>;
}

/// Transfer receipt recorded by [`RecordingBank`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub to: String,
    pub amount: u64,
}

/// In-memory [`ValueTransfer`] that records every outbound transfer.
///
/// Used by the CLI for receipt printing and by tests for asserting what
/// the engine paid out.
#[derive(Default, Debug)]
pub struct RecordingBank {
    pub receipts: Vec<TransferReceipt>,
}

impl RecordingBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total amount transferred to the given recipient
    pub fn total_to(&self, to: &str) -> u64 {
        self.receipts
            .iter()
            .filter(|r| r.to == to)
            .map(|r| r.amount)
            .sum()
    }
}

impl ValueTransfer for RecordingBank {
    fn transfer(&mut self, to: &str, amount: u64) -> Result<()> {
        self.receipts.push(TransferReceipt {
            to: to.to_string(),
            amount,
        });
        Ok(())
    }
}
