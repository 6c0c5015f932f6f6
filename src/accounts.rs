//! Deterministic derivation of the program-owned accounts a trade touches.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::constants::{BONDING_CURVE_SEED, PUMP_PROGRAM};
use crate::error::TradeError;

/// Addresses derived from an event's mint. Recomputed per event; derivation
/// is cheap and caching would only add staleness risk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAccounts {
    pub bonding_curve: Pubkey,
    pub bump: u8,
    pub associated_bonding_curve: Pubkey,
}

impl DerivedAccounts {
    pub fn for_mint(mint: &Pubkey) -> Result<Self, TradeError> {
        let (bonding_curve, bump) = derive_bonding_curve(mint)?;
        let associated_bonding_curve = get_associated_token_address(&bonding_curve, mint);
        Ok(Self {
            bonding_curve,
            bump,
            associated_bonding_curve,
        })
    }
}

/// Finds the bonding-curve PDA for a mint: the first bump from 255 downward
/// where `hash("bonding-curve", mint, bump, program)` falls off the ed25519
/// curve.
pub fn derive_bonding_curve(mint: &Pubkey) -> Result<(Pubkey, u8), TradeError> {
    Pubkey::try_find_program_address(&[BONDING_CURVE_SEED, mint.as_ref()], &PUMP_PROGRAM)
        .ok_or(TradeError::DerivationExhausted { mint: *mint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let mint = Pubkey::new_unique();
        let (curve_a, bump_a) = derive_bonding_curve(&mint).unwrap();
        let (curve_b, bump_b) = derive_bonding_curve(&mint).unwrap();
        assert_eq!(curve_a, curve_b);
        assert_eq!(bump_a, bump_b);
    }

    #[test]
    fn distinct_mints_derive_distinct_curves() {
        let a = derive_bonding_curve(&Pubkey::new_unique()).unwrap();
        let b = derive_bonding_curve(&Pubkey::new_unique()).unwrap();
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn associated_curve_is_owned_by_the_curve_pda() {
        let mint = Pubkey::new_unique();
        let derived = DerivedAccounts::for_mint(&mint).unwrap();
        assert_eq!(
            derived.associated_bonding_curve,
            get_associated_token_address(&derived.bonding_curve, &mint)
        );
        assert_ne!(derived.bonding_curve, derived.associated_bonding_curve);
    }
}
