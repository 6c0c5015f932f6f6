//! Pump.fun buy-event sniper.
//!
//! Watches a transaction stream for bonding-curve buy events, decodes the
//! 129-byte event payload out of `Program data:` log lines, derives the
//! curve accounts for the event's mint, sizes a slippage-bounded buy from
//! the event's reserve snapshot, and dispatches the signed transaction with
//! bounded-retry backoff.
//!
//! The streaming transport and the broadcast client are consumed through
//! the [`stream::EventSource`] and [`stream::LedgerClient`] traits; the
//! embedding process owns connection setup, credentials and reconnection.

pub mod accounts;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod sniper;
pub mod stream;
pub mod submit;
pub mod trade;
pub mod tx;

pub use accounts::DerivedAccounts;
pub use codec::{BondingCurveState, TradeEvent};
pub use config::SniperConfig;
pub use error::{DecodeError, StreamError, TradeError};
pub use sniper::Sniper;
pub use stream::{ChannelEventSource, EventSource, LedgerClient, RpcLedgerClient};
pub use submit::{submit_with_backoff, SubmitOutcome};
pub use trade::{compute_trade, TradeParams, TradeSize};
