//! Trade sizing against an event's reserve snapshot.

use crate::constants::{LAMPORTS_PER_SOL, TOKEN_DECIMALS};
use crate::error::TradeError;

/// Caller-supplied sizing for every trade the loop fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeParams {
    pub spend_lamports: u64,
    pub slippage: f64,
    pub priority_fee: u64,
    pub max_retries: u32,
}

/// Output of the trade calculator, in the units the buy instruction encodes:
/// the token amount in base units (10^6 per token) and the lamport cap the
/// program may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeSize {
    pub token_amount: u64,
    pub max_sol_cost: u64,
}

/// Sizes a buy of `spend_lamports` against the reserve snapshot carried by
/// the event. The price reflects reserves immediately after the observed
/// fill, not a fresh on-chain read.
///
/// Truncation only ever rounds the token amount down, which errs in the
/// buyer's favor; the slippage cap is the hard bound the program enforces.
pub fn compute_trade(
    spend_lamports: u64,
    virtual_sol_reserves: u64,
    virtual_token_reserves: u64,
    slippage: f64,
) -> Result<TradeSize, TradeError> {
    if virtual_token_reserves == 0 || virtual_sol_reserves == 0 {
        return Err(TradeError::InvalidReserves {
            virtual_sol_reserves,
            virtual_token_reserves,
        });
    }

    let token_scale = 10f64.powi(TOKEN_DECIMALS as i32);
    let price_sol_per_token = (virtual_sol_reserves as f64 / LAMPORTS_PER_SOL as f64)
        / (virtual_token_reserves as f64 / token_scale);

    let spend_sol = spend_lamports as f64 / LAMPORTS_PER_SOL as f64;
    let token_amount = (spend_sol / price_sol_per_token * token_scale) as u64;
    let max_sol_cost = (spend_lamports as f64 * (1.0 + slippage)) as u64;

    Ok(TradeSize {
        token_amount,
        max_sol_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIRTUAL_SOL: u64 = 30_000_000_000;
    const VIRTUAL_TOKEN: u64 = 1_073_000_000_000_000;

    #[test]
    fn token_amount_matches_spot_price() {
        let spend = 1_000_000; // 0.001 SOL
        let size = compute_trade(spend, VIRTUAL_SOL, VIRTUAL_TOKEN, 0.0).unwrap();

        // Price is 30 / 1_073_000_000 SOL per token, so 0.001 SOL buys
        // ~35_766.67 tokens = ~35_766_666_666 base units.
        let price = 30.0 / 1_073_000_000.0;
        let expected = (0.001 / price * 1e6) as u64;
        let diff = size.token_amount.abs_diff(expected);
        assert!(diff <= 1, "got {}, expected {}", size.token_amount, expected);
    }

    #[test]
    fn token_amount_times_price_recovers_spend() {
        let spend = 250_000_000; // 0.25 SOL
        let size = compute_trade(spend, VIRTUAL_SOL, VIRTUAL_TOKEN, 0.1).unwrap();

        let price = (VIRTUAL_SOL as f64 / 1e9) / (VIRTUAL_TOKEN as f64 / 1e6);
        let implied_spend_lamports = size.token_amount as f64 / 1e6 * price * 1e9;
        let tolerance = spend as f64 * 1e-9 + price * 1e9;
        assert!((implied_spend_lamports - spend as f64).abs() < tolerance);
    }

    #[test]
    fn slippage_cap_is_exact_floor() {
        for (spend, slippage, expected) in [
            (1_000_000u64, 0.30f64, 1_300_000u64),
            (1_000_000, 0.0, 1_000_000),
            (1_000_000, 1.0, 2_000_000),
            (3, 0.5, 4), // floor(4.5)
        ] {
            let size = compute_trade(spend, VIRTUAL_SOL, VIRTUAL_TOKEN, slippage).unwrap();
            assert_eq!(size.max_sol_cost, expected, "spend={spend} slippage={slippage}");
        }
    }

    #[test]
    fn zero_token_reserves_rejected() {
        let err = compute_trade(1_000_000, VIRTUAL_SOL, 0, 0.3).unwrap_err();
        assert!(matches!(err, TradeError::InvalidReserves { .. }));
    }

    #[test]
    fn zero_sol_reserves_rejected() {
        let err = compute_trade(1_000_000, 0, VIRTUAL_TOKEN, 0.3).unwrap_err();
        assert!(matches!(err, TradeError::InvalidReserves { .. }));
    }
}
