//! Pump.fun program addresses and wire-format constants.

use solana_sdk::{pubkey, pubkey::Pubkey};

/// The pump.fun bonding-curve program.
pub const PUMP_PROGRAM: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");
/// Global config account owned by the pump program.
pub const PUMP_GLOBAL: Pubkey = pubkey!("4wTV1YmiEkRvAtNtsSGPtUrqRYQMe5SKy2uB4Jjaxnjf");
/// Event authority PDA the program emits CPI events through.
pub const PUMP_EVENT_AUTHORITY: Pubkey = pubkey!("Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1");
/// Protocol fee recipient.
pub const PUMP_FEE: Pubkey = pubkey!("CebN5WGQ4jvEPvsVU4EoHEpgzq1VV7AbicfhtW4xC9iM");

/// Seed for the per-mint bonding-curve PDA.
pub const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";

/// Anchor discriminator of the `buy` instruction.
pub const BUY_DISCRIMINATOR: u64 = 16_927_863_322_537_952_870;

/// Account discriminator prefixing bonding-curve state records. The decoder
/// skips the prefix rather than checking it; callers that want strictness can
/// compare against this.
pub const CURVE_STATE_DISCRIMINATOR: [u8; 8] = [0x17, 0xb7, 0xf8, 0x37, 0x60, 0xd8, 0xac, 0x60];

/// Marker the program's event logs carry in transaction log messages.
pub const PROGRAM_DATA_MARKER: &str = "Program data:";

pub const TOKEN_DECIMALS: u32 = 6;
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
