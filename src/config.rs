use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::LAMPORTS_PER_SOL;
use crate::trade::TradeParams;

/// TOML-backed configuration. Every field has a default mirroring the
/// reference flow, so a partial file (or none) is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SniperConfig {
    pub rpc: RpcConfig,
    pub wallet: WalletConfig,
    pub trade: TradeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub keypair_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// SOL spent per matching event.
    pub spend_sol: f64,
    /// Fractional tolerance on the lamport cap, 0..=1.
    pub slippage: f64,
    /// Compute-unit price bid, micro-lamports.
    pub priority_fee: u64,
    /// Total submission attempt budget per trade.
    pub max_retries: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.mainnet-beta.solana.com".to_string(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: "payer.json".to_string(),
        }
    }
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            spend_sol: 0.001,
            slippage: 0.30,
            priority_fee: 500_000,
            max_retries: 1,
        }
    }
}

impl TradeConfig {
    pub fn params(&self) -> TradeParams {
        TradeParams {
            spend_lamports: (self.spend_sol * LAMPORTS_PER_SOL as f64) as u64,
            slippage: self.slippage,
            priority_fee: self.priority_fee,
            max_retries: self.max_retries,
        }
    }
}

impl SniperConfig {
    /// Loads from the path in `CONFIG_PATH`, falling back to `config.toml`
    /// in the working directory. An explicitly configured path must exist;
    /// a missing fallback file yields the built-in defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(path),
            Err(_) => {
                let path = Path::new("config.toml");
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}
