//! The two external seams: the event source the loop consumes and the
//! ledger client trades are dispatched through. Transport setup, auth and
//! reconnection live with whoever owns the concrete connection.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    commitment_config::CommitmentLevel, hash::Hash, signature::Signature,
    transaction::VersionedTransaction,
};
use tokio::sync::mpsc;

use crate::error::StreamError;

/// One raw response from the stream. Most carry no transaction.
#[derive(Debug, Clone, Default)]
pub struct StreamUpdate {
    pub transaction: Option<TransactionUpdate>,
}

/// The transaction embedded in a stream response: its signature bytes and
/// the program log lines its execution produced.
#[derive(Debug, Clone)]
pub struct TransactionUpdate {
    pub signature: Vec<u8>,
    pub log_messages: Vec<String>,
}

/// An unbounded, non-restartable sequence of stream responses. Once the
/// underlying connection ends the sequence ends; re-establishing it is the
/// owner's job, not the event loop's.
#[async_trait]
pub trait EventSource: Send {
    async fn next_update(&mut self) -> Option<Result<StreamUpdate, StreamError>>;
}

/// Chain access for a trade: one blockhash fetch per trade and a
/// dispatch-only send (no confirmation polling).
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash>;
    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature>;
}

/// `EventSource` fed through an mpsc channel. The task that owns the real
/// connection pushes updates into the sender half; dropping the sender ends
/// the stream.
pub struct ChannelEventSource {
    rx: mpsc::Receiver<Result<StreamUpdate, StreamError>>,
}

impl ChannelEventSource {
    pub fn channel(
        capacity: usize,
    ) -> (mpsc::Sender<Result<StreamUpdate, StreamError>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_update(&mut self) -> Option<Result<StreamUpdate, StreamError>> {
        self.rx.recv().await
    }
}

/// `LedgerClient` over a nonblocking JSON-RPC client. Sends skip preflight
/// and disable the RPC node's own resend loop; retrying is this crate's
/// responsibility.
pub struct RpcLedgerClient {
    rpc: Arc<RpcClient>,
    preflight_commitment: CommitmentLevel,
}

impl RpcLedgerClient {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self {
            rpc,
            preflight_commitment: CommitmentLevel::Confirmed,
        }
    }

    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.preflight_commitment = commitment;
        self
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            preflight_commitment: Some(self.preflight_commitment),
            max_retries: Some(0),
            ..Default::default()
        };
        Ok(self.rpc.send_transaction_with_config(tx, config).await?)
    }
}
