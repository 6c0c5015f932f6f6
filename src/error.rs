//! Failure taxonomy, split by how far a failure is allowed to propagate.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Malformed binary payload. Non-fatal: the event loop skips the offending
/// record and keeps consuming the stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record too short: got {len} bytes, need at least {need}")]
    TooShort { len: usize, need: usize },
}

/// Failure while preparing a single trade. Aborts that trade only.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error(
        "invalid reserve snapshot: virtual_sol_reserves={virtual_sol_reserves}, \
         virtual_token_reserves={virtual_token_reserves}"
    )]
    InvalidReserves {
        virtual_sol_reserves: u64,
        virtual_token_reserves: u64,
    },

    /// All 256 bump values failed the off-curve check. Should never happen
    /// for real mints; treated as fatal for the trade.
    #[error("program address derivation exhausted for mint {mint}")]
    DerivationExhausted { mint: Pubkey },
}

/// Transport-level failure of the event source. Propagated out of the event
/// loop; reconnection is the caller's responsibility.
#[derive(Debug, Error)]
#[error("event stream failed: {0}")]
pub struct StreamError(pub String);
