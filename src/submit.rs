//! Bounded-retry submission of a signed transaction.
//!
//! The same signed payload is resubmitted on every attempt: the blockhash is
//! fetched once per trade and deliberately not refreshed between retries. If
//! it expires mid-retry the ledger rejects the resend, which counts as a
//! failed attempt like any other.

use std::time::Duration;

use solana_sdk::{signature::Signature, transaction::VersionedTransaction};
use tokio::time::sleep;
use tracing::warn;

use crate::stream::LedgerClient;

/// Terminal result of a submission. Dispatch acceptance only — this layer
/// never polls for on-chain finality.
#[derive(Debug)]
pub enum SubmitOutcome {
    Dispatched { signature: Signature, attempts: u32 },
    Exhausted { attempts: u32, last_error: anyhow::Error },
}

enum SubmitState {
    Submitting { attempt: u32 },
    Retrying { attempt: u32, error: anyhow::Error },
    Done(SubmitOutcome),
}

/// Drives `Submitting -> {Dispatched, Retrying, Exhausted}` until terminal.
/// `max_retries` is the total attempt budget; at least one attempt is always
/// made. Backoff is pure exponential, `2^attempt` seconds, no jitter, no cap.
pub async fn submit_with_backoff<L: LedgerClient + ?Sized>(
    ledger: &L,
    tx: &VersionedTransaction,
    max_retries: u32,
) -> SubmitOutcome {
    let budget = max_retries.max(1);
    let mut state = SubmitState::Submitting { attempt: 0 };

    loop {
        state = match state {
            SubmitState::Submitting { attempt } => match ledger.send_transaction(tx).await {
                Ok(signature) => SubmitState::Done(SubmitOutcome::Dispatched {
                    signature,
                    attempts: attempt + 1,
                }),
                Err(error) if attempt + 1 < budget => SubmitState::Retrying { attempt, error },
                Err(error) => SubmitState::Done(SubmitOutcome::Exhausted {
                    attempts: attempt + 1,
                    last_error: error,
                }),
            },
            SubmitState::Retrying { attempt, error } => {
                let delay = backoff_delay(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs(),
                    %error,
                    "submission failed, backing off"
                );
                sleep(delay).await;
                SubmitState::Submitting { attempt: attempt + 1 }
            }
            SubmitState::Done(outcome) => return outcome,
        };
    }
}

/// `2^attempt` seconds. Saturates once the exponent leaves u64 range; no
/// realistic budget gets anywhere near that, but the shift must not wrap.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use solana_sdk::{
        hash::Hash,
        message::{v0, VersionedMessage},
        pubkey::Pubkey,
        signature::Keypair,
        signer::Signer,
        system_instruction,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Fails the first `failures` sends, then succeeds.
    struct FlakyLedger {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyLedger {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LedgerClient for FlakyLedger {
        async fn latest_blockhash(&self) -> Result<Hash> {
            Ok(Hash::default())
        }

        async fn send_transaction(&self, _tx: &VersionedTransaction) -> Result<Signature> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(anyhow!("blockhash not found"))
            } else {
                Ok(Signature::default())
            }
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn dummy_tx() -> VersionedTransaction {
        let payer = Keypair::new();
        let ix = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1);
        let message =
            v0::Message::try_compile(&payer.pubkey(), &[ix], &[], Hash::default()).unwrap();
        VersionedTransaction::try_new(VersionedMessage::V0(message), &[&payer]).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn first_try_success_skips_backoff() {
        init_tracing();
        let ledger = FlakyLedger::new(0);
        let start = Instant::now();
        let outcome = submit_with_backoff(&ledger, &dummy_tx(), 3).await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Dispatched { attempts: 1, .. }
        ));
        assert_eq!(ledger.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_attempt_k_performs_k_calls() {
        init_tracing();
        let ledger = FlakyLedger::new(2);
        let start = Instant::now();
        let outcome = submit_with_backoff(&ledger, &dummy_tx(), 5).await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Dispatched { attempts: 3, .. }
        ));
        assert_eq!(ledger.calls(), 3);
        // 1s after attempt 1, 2s after attempt 2, none after success.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_after_budget_with_doubling_delays() {
        init_tracing();
        let ledger = FlakyLedger::new(u32::MAX);
        let start = Instant::now();
        let outcome = submit_with_backoff(&ledger, &dummy_tx(), 4).await;

        assert!(matches!(outcome, SubmitOutcome::Exhausted { attempts: 4, .. }));
        assert_eq!(ledger.calls(), 4);
        // Delays 1 + 2 + 4 between the four attempts; none after the last.
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[test]
    fn backoff_delay_doubles_then_saturates() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(63), Duration::from_secs(1u64 << 63));
        assert_eq!(backoff_delay(64), Duration::from_secs(u64::MAX));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_still_attempts_once() {
        init_tracing();
        let ledger = FlakyLedger::new(u32::MAX);
        let outcome = submit_with_backoff(&ledger, &dummy_tx(), 0).await;

        assert!(matches!(outcome, SubmitOutcome::Exhausted { attempts: 1, .. }));
        assert_eq!(ledger.calls(), 1);
    }
}
