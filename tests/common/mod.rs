//! Shared utilities for integration tests.

use alloy::primitives::TxHash;
use async_trait::async_trait;
use chain_ops::blockchain::{BlockchainError, BlockchainResult, DataSource, ReceiptLookup, TransactionLookup};
use chain_ops::lifecycle::{Clock, Sleeper};
use chain_ops::operation::{OperationKind, OperationModel, OperationRecord};
use chain_ops::payload::codec::encode_json;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What the node reports for a hash on one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Observation {
    Unknown,
    Unmined,
    /// Mined; `None` means the receipt is not served.
    Mined(Option<bool>),
    RpcError,
    /// Mined, but the receipt lookup fails.
    ReceiptError,
}

/// Data source replaying a script per hash. The last step repeats.
#[derive(Default)]
pub struct ScriptedDataSource {
    scripts: Mutex<HashMap<TxHash, VecDeque<Observation>>>,
    current: Mutex<HashMap<TxHash, Observation>>,
    tx_calls: AtomicUsize,
    receipt_calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, hash: TxHash, steps: Vec<Observation>) -> Self {
        self.scripts.lock().unwrap().insert(hash, steps.into());
        self
    }

    pub fn tx_calls(&self) -> usize {
        self.tx_calls.load(Ordering::SeqCst)
    }

    pub fn receipt_calls(&self) -> usize {
        self.receipt_calls.load(Ordering::SeqCst)
    }

    fn next(&self, hash: TxHash) -> Observation {
        let mut scripts = self.scripts.lock().unwrap();
        let step = match scripts.get_mut(&hash) {
            Some(steps) if steps.len() > 1 => steps.pop_front().unwrap(),
            Some(steps) => steps.front().copied().unwrap_or(Observation::Unknown),
            None => Observation::Unknown,
        };
        self.current.lock().unwrap().insert(hash, step);
        step
    }
}

#[async_trait]
impl DataSource for ScriptedDataSource {
    async fn transaction_by_hash(&self, hash: TxHash) -> BlockchainResult<Option<TransactionLookup>> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        match self.next(hash) {
            Observation::Unknown => Ok(None),
            Observation::Unmined => Ok(Some(TransactionLookup::pending())),
            Observation::Mined(_) | Observation::ReceiptError => Ok(Some(TransactionLookup::mined(7))),
            Observation::RpcError => Err(BlockchainError::Rpc("connection reset".to_string())),
        }
    }

    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptLookup>> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.current.lock().unwrap().get(&hash).copied();
        if current == Some(Observation::ReceiptError) {
            return Err(BlockchainError::Rpc("receipt lookup failed".to_string()));
        }
        Ok(match current {
            Some(Observation::Mined(Some(success))) => Some(ReceiptLookup {
                success,
                block_number: Some(7),
            }),
            _ => None,
        })
    }
}

/// Clock that only advances when the paired [`ManualSleeper`] sleeps.
#[derive(Clone)]
pub struct ManualClock {
    start: Instant,
    offset: Arc<Mutex<Duration>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }

    pub fn sleeper(&self) -> ManualSleeper {
        ManualSleeper(self.clone())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}

pub struct ManualSleeper(ManualClock);

#[async_trait]
impl Sleeper for ManualSleeper {
    async fn sleep(&self, duration: Duration) {
        *self.0.offset.lock().unwrap() += duration;
    }
}

/// Unsigned payload as the creation service issues it.
#[allow(dead_code)]
pub fn unsigned_payload() -> String {
    encode_json(&json!({
        "chainId": 84532,
        "nonce": 0,
        "maxPriorityFeePerGas": "0x3b9aca00",
        "maxFeePerGas": "0x3b9aca64",
        "gas": 21000,
        "to": "0x4d9e4f3f4d1a8b5f4f7b1f5a5f5e5d5c5b5a5958",
        "value": "0x22b1c8c1227a0000",
        "input": "0x",
    }))
}

#[allow(dead_code)]
pub fn hash(byte: u8) -> TxHash {
    TxHash::repeat_byte(byte)
}

/// Snapshot for operation `id`, optionally with an observed hash.
#[allow(dead_code)]
pub fn model(id: &str, tx_hash: Option<TxHash>) -> OperationModel {
    OperationModel {
        operation_id: id.to_string(),
        network_id: "base-sepolia".to_string(),
        wallet_id: "wallet-1".to_string(),
        source_address_id: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
        destination_address_id: Some("0x4d9e4f3f4d1a8b5f4f7b1f5a5f5e5d5c5b5a5958".to_string()),
        asset_id: "eth".to_string(),
        amount: "2500000000000000000".to_string(),
        unsigned_payload: unsigned_payload(),
        signed_payload: None,
        transaction_hash: tx_hash.map(|h| h.to_string()),
    }
}

#[allow(dead_code)]
pub fn record<K: OperationKind>(id: &str, tx_hash: Option<TxHash>) -> OperationRecord<K> {
    OperationRecord::from_model(model(id, tx_hash)).unwrap()
}

/// Start a JSON-RPC backend answering each call with `f(method, params)`.
///
/// `Err(status)` answers with that HTTP status instead of a JSON-RPC body.
#[allow(dead_code)]
pub async fn start_rpc_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, u16>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request_body(&mut socket).await else {
                            return;
                        };
                        let id = request.get("id").cloned().unwrap_or(Value::Null);
                        let method = request["method"].as_str().unwrap_or_default().to_string();
                        let params = request.get("params").cloned().unwrap_or(Value::Null);

                        let (status_text, body) = match f(method, params).await {
                            Ok(result) => (
                                "200 OK",
                                json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string(),
                            ),
                            Err(503) => ("503 Service Unavailable", "unavailable".to_string()),
                            Err(_) => ("500 Internal Server Error", "error".to_string()),
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    serde_json::from_slice(&buf[header_end..header_end + content_length]).ok()
}
