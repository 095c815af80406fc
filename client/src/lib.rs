//! Client-side utilities for the recurring-payments tooling.
//!
//! Includes the local keypair and JSON config stores, cluster configuration, an RPC wrapper for
//! submitting transactions, and helpers for tokens, program deployment and program instructions.

pub mod cluster;
pub mod config_store;
pub mod context;
pub mod deploy;
pub mod error;
pub mod key_store;
pub mod logs;
pub mod transactions;

#[doc(hidden)]
pub use colored;
pub use logs::LogColor;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Formats a lamport amount alongside its SOL value, e.g. `1500000000 lamports (1.5 SOL)`.
pub fn format_lamports(lamports: u64) -> String {
    format!(
        "{lamports} lamports ({} SOL)",
        lamports as f64 / LAMPORTS_PER_SOL as f64
    )
}

/// Converts a SOL amount to lamports, rejecting negative, non-finite and overflowing amounts.
pub fn sol_to_lamports(sol: f64) -> Option<u64> {
    checked_lamports((sol * LAMPORTS_PER_SOL as f64).round())
}

/// `u64::MAX as f64` rounds up to 2^64, so the upper bound is exclusive.
fn checked_lamports(lamports: f64) -> Option<u64> {
    (lamports.is_finite() && lamports >= 0.0 && lamports < u64::MAX as f64)
        .then_some(lamports as u64)
}
