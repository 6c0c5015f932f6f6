//! Fixed-offset little-endian decoding of pump.fun on-chain records, plus
//! encoding of the outgoing buy instruction payload.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use solana_sdk::pubkey::Pubkey;

use crate::constants::BUY_DISCRIMINATOR;
use crate::error::DecodeError;

/// Exact decoded length of a pump.fun trade-event payload: 8-byte
/// discriminator + 32 + 8 + 8 + 1 + 32 + 8 + 8 + 8 + 8 + 8.
pub const EVENT_PAYLOAD_LEN: usize = 129;

/// 8-byte discriminator + five u64 fields + completion flag.
const CURVE_STATE_MIN_LEN: usize = 49;

/// Point-in-time snapshot of a bonding curve's reserves, as stored in the
/// curve account. Decoded once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondingCurveState {
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub token_total_supply: u64,
    pub complete: bool,
}

impl BondingCurveState {
    /// Decodes a curve account's raw data. The leading discriminator is
    /// skipped, not validated.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < CURVE_STATE_MIN_LEN {
            return Err(DecodeError::TooShort {
                len: data.len(),
                need: CURVE_STATE_MIN_LEN,
            });
        }

        Ok(Self {
            virtual_token_reserves: read_u64(data, 8),
            virtual_sol_reserves: read_u64(data, 16),
            real_token_reserves: read_u64(data, 24),
            real_sol_reserves: read_u64(data, 32),
            token_total_supply: read_u64(data, 40),
            complete: data[48] != 0,
        })
    }
}

/// A decoded `TradeEvent` emitted by the pump program on every fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEvent {
    pub mint: Pubkey,
    pub sol_amount: u64,
    pub token_amount: u64,
    pub is_buy: bool,
    pub user: Pubkey,
    pub timestamp: i64,
    pub virtual_sol_reserves: u64,
    pub virtual_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub real_token_reserves: u64,
}

impl TradeEvent {
    /// Extracts the trailing base64 token of a `Program data:` log line and
    /// decodes it. Returns `None` for anything that is not a trade event —
    /// most log lines are unrelated noise, so a length mismatch is not an
    /// error.
    pub fn from_log_line(log: &str) -> Option<Self> {
        let payload = log.split_whitespace().last()?;
        let bytes = BASE64.decode(payload).ok()?;
        Self::decode(&bytes)
    }

    /// Decodes the raw 129-byte event payload. Any other length yields
    /// `None`. The leading discriminator is skipped, not validated.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() != EVENT_PAYLOAD_LEN {
            return None;
        }

        Some(Self {
            mint: read_pubkey(data, 8),
            sol_amount: read_u64(data, 40),
            token_amount: read_u64(data, 48),
            is_buy: data[56] != 0,
            user: read_pubkey(data, 57),
            timestamp: read_u64(data, 89) as i64,
            virtual_sol_reserves: read_u64(data, 97),
            virtual_token_reserves: read_u64(data, 105),
            real_sol_reserves: read_u64(data, 113),
            real_token_reserves: read_u64(data, 121),
        })
    }
}

/// Encodes the buy instruction payload: discriminator, token amount, max
/// lamports to spend, all little-endian.
pub fn encode_buy_data(token_amount: u64, max_sol_cost: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(24);
    data.extend_from_slice(&BUY_DISCRIMINATOR.to_le_bytes());
    data.extend_from_slice(&token_amount.to_le_bytes());
    data.extend_from_slice(&max_sol_cost.to_le_bytes());
    data
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

fn read_pubkey(data: &[u8], offset: usize) -> Pubkey {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&data[offset..offset + 32]);
    Pubkey::new_from_array(buf)
}
