//! The event loop: consume stream updates, pick out pump.fun buy events,
//! and fire a fixed-size counter-buy for each one.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use solana_sdk::signature::Keypair;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::accounts::DerivedAccounts;
use crate::codec::TradeEvent;
use crate::constants::PROGRAM_DATA_MARKER;
use crate::error::StreamError;
use crate::stream::{EventSource, LedgerClient, StreamUpdate};
use crate::submit::{submit_with_backoff, SubmitOutcome};
use crate::trade::{compute_trade, TradeParams};
use crate::tx::build_buy_transaction;

/// Breather after a failed event before consuming the next update.
const FAILURE_PAUSE: Duration = Duration::from_secs(1);

/// Sequential decode-and-react pipeline over an event source and a ledger
/// client. Events are processed strictly in arrival order; a slow trade
/// delays the next event rather than running concurrently with it.
pub struct Sniper<S, L> {
    source: S,
    ledger: Arc<L>,
    payer: Arc<Keypair>,
    params: TradeParams,
}

impl<S, L> Sniper<S, L>
where
    S: EventSource,
    L: LedgerClient,
{
    pub fn new(source: S, ledger: Arc<L>, payer: Arc<Keypair>, params: TradeParams) -> Self {
        Self {
            source,
            ledger,
            payer,
            params,
        }
    }

    /// Consumes the stream until the source ends. Per-event failures are
    /// logged and swallowed here so one bad event never tears the loop
    /// down; transport failures of the source itself propagate.
    pub async fn run(mut self) -> Result<(), StreamError> {
        while let Some(update) = self.source.next_update().await {
            let update = update?;
            if let Err(error) = self.process_update(update).await {
                warn!(%error, "event processing failed, resuming stream");
                sleep(FAILURE_PAUSE).await;
            }
        }
        info!("event stream ended");
        Ok(())
    }

    async fn process_update(&self, update: StreamUpdate) -> Result<()> {
        let Some(txn) = update.transaction else {
            return Ok(());
        };

        for log in &txn.log_messages {
            if !log.contains(PROGRAM_DATA_MARKER) {
                continue;
            }
            let signature = bs58::encode(&txn.signature).into_string();
            debug!(%signature, "program data log");

            // Non-event program data is expected noise, not a failure.
            let Some(event) = TradeEvent::from_log_line(log) else {
                continue;
            };
            if !event.is_buy {
                continue;
            }

            info!(
                %signature,
                mint = %event.mint,
                sol_amount = event.sol_amount,
                "buy event decoded"
            );
            self.execute_buy(&event).await?;
        }

        Ok(())
    }

    async fn execute_buy(&self, event: &TradeEvent) -> Result<()> {
        let derived = DerivedAccounts::for_mint(&event.mint)?;
        let size = compute_trade(
            self.params.spend_lamports,
            event.virtual_sol_reserves,
            event.virtual_token_reserves,
            self.params.slippage,
        )?;

        // One blockhash per trade, reused across retries.
        let blockhash = self.ledger.latest_blockhash().await?;
        let tx = build_buy_transaction(
            &self.payer,
            &event.mint,
            &derived,
            size,
            self.params.priority_fee,
            blockhash,
        )?;

        match submit_with_backoff(self.ledger.as_ref(), &tx, self.params.max_retries).await {
            SubmitOutcome::Dispatched {
                signature,
                attempts,
            } => {
                info!(
                    %signature,
                    attempts,
                    "transaction sent: https://explorer.solana.com/tx/{signature}"
                );
            }
            SubmitOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                warn!(
                    attempts,
                    error = %last_error,
                    mint = %event.mint,
                    "submission exhausted, abandoning trade"
                );
            }
        }

        Ok(())
    }
}
