//! Operation records.
//!
//! # Responsibilities
//! - Validate the server snapshot once, at construction
//! - Hold identifiers, the atomic amount and the payload/signature/hash fields
//! - Cache the decoded unsigned payload in a compute-once cell
//! - Enforce set-once semantics for the signed payload and transaction hash

use alloy::hex;
use alloy::primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::OnceLock;

use crate::blockchain::{parse_tx_hash, SignedTransaction, TransactionSigner};
use crate::lifecycle::LifecycleState;
use crate::operation::error::{OperationError, OperationResult};
use crate::operation::kind::OperationKind;
use crate::payload::{PayloadResult, PayloadShape, StructuredTransaction};

/// Snapshot of an operation as returned by the creation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationModel {
    #[serde(alias = "transferId", alias = "tradeId", alias = "stakingOperationId")]
    pub operation_id: String,
    pub network_id: String,
    pub wallet_id: String,
    #[serde(alias = "addressId")]
    pub source_address_id: String,
    #[serde(default, alias = "destination")]
    pub destination_address_id: Option<String>,
    pub asset_id: String,
    /// Atomic units, decimal digits.
    pub amount: String,
    pub unsigned_payload: String,
    #[serde(default)]
    pub signed_payload: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// One lifecycle instance of an operation of kind `K`.
#[derive(Debug, Clone)]
pub struct OperationRecord<K: OperationKind> {
    operation_id: String,
    network_id: String,
    wallet_id: String,
    source_address_id: String,
    destination_address_id: Option<String>,
    asset_id: String,
    amount: U256,
    unsigned_payload: String,
    signed_payload: Option<String>,
    transaction_hash: Option<TxHash>,
    decoded: OnceLock<K::Payload>,
    kind: PhantomData<K>,
}

impl<K: OperationKind> OperationRecord<K> {
    /// Build a record from a server snapshot.
    pub fn from_model(model: OperationModel) -> OperationResult<Self> {
        for (name, value) in [
            ("operationId", &model.operation_id),
            ("networkId", &model.network_id),
            ("walletId", &model.wallet_id),
            ("sourceAddressId", &model.source_address_id),
            ("assetId", &model.asset_id),
            ("unsignedPayload", &model.unsigned_payload),
        ] {
            if value.trim().is_empty() {
                return Err(OperationError::InvalidRecord(format!("{} is empty", name)));
            }
        }

        let amount = parse_amount(&model.amount)?;

        let mut record = Self {
            operation_id: model.operation_id,
            network_id: model.network_id,
            wallet_id: model.wallet_id,
            source_address_id: model.source_address_id,
            destination_address_id: model.destination_address_id.filter(|d| !d.is_empty()),
            asset_id: model.asset_id,
            amount,
            unsigned_payload: model.unsigned_payload,
            signed_payload: None,
            transaction_hash: None,
            decoded: OnceLock::new(),
            kind: PhantomData,
        };

        if let Some(signed) = model.signed_payload.filter(|s| !s.is_empty()) {
            record.attach_signed_payload(&signed)?;
        }
        if let Some(hash) = model.transaction_hash.filter(|h| !h.is_empty()) {
            record.attach_transaction_hash(parse_tx_hash(&hash)?)?;
        }

        tracing::debug!(
            kind = K::NAME,
            operation_id = %record.operation_id,
            network_id = %record.network_id,
            "Operation record created"
        );

        Ok(record)
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }

    pub fn source_address_id(&self) -> &str {
        &self.source_address_id
    }

    pub fn destination_address_id(&self) -> Option<&str> {
        self.destination_address_id.as_deref()
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Amount in atomic units.
    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn unsigned_payload(&self) -> &str {
        &self.unsigned_payload
    }

    pub fn signed_payload(&self) -> Option<&str> {
        self.signed_payload.as_deref()
    }

    pub fn transaction_hash(&self) -> Option<TxHash> {
        self.transaction_hash
    }

    /// Decoded unsigned payload, decoded on first access only.
    pub fn decoded_transaction(&self) -> PayloadResult<&K::Payload> {
        if let Some(decoded) = self.decoded.get() {
            return Ok(decoded);
        }
        let decoded = K::Payload::decode(&self.unsigned_payload)?;
        Ok(self.decoded.get_or_init(|| decoded))
    }

    /// Whether the decode cache is populated.
    pub fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// Attach the signed payload. Re-attaching the same payload is a no-op.
    pub fn attach_signed_payload(&mut self, signed_payload: &str) -> OperationResult<()> {
        let normalized = normalize_signed_payload(signed_payload)?;
        self.check_signed_payload(&normalized)?;
        self.signed_payload = Some(normalized);
        Ok(())
    }

    /// Attach the transaction hash. Re-attaching the same hash is a no-op.
    pub fn attach_transaction_hash(&mut self, hash: TxHash) -> OperationResult<()> {
        self.check_transaction_hash(hash)?;
        if self.transaction_hash.is_none() {
            self.transaction_hash = Some(hash);
            tracing::debug!(
                kind = K::NAME,
                operation_id = %self.operation_id,
                tx_hash = %hash,
                "Transaction hash attached"
            );
        }
        Ok(())
    }

    /// One-line description with the atomic amount.
    pub fn summary(&self, status: LifecycleState) -> String {
        self.summary_with_amount(&self.amount.to_string(), status)
    }

    /// One-line description with a caller-rendered amount.
    pub fn summary_with_amount(&self, amount: &str, status: LifecycleState) -> String {
        format!(
            "{} {{ operation_id: '{}', network_id: '{}', wallet_id: '{}', source_address_id: '{}', \
             destination_address_id: '{}', asset_id: '{}', amount: '{}', transaction_hash: '{}', \
             status: '{}' }}",
            K::NAME,
            self.operation_id,
            self.network_id,
            self.wallet_id,
            self.source_address_id,
            self.destination_address_id.as_deref().unwrap_or(""),
            self.asset_id,
            amount,
            self.transaction_hash.map(|h| h.to_string()).unwrap_or_default(),
            status,
        )
    }

    fn check_signed_payload(&self, normalized: &str) -> OperationResult<()> {
        match &self.signed_payload {
            Some(existing) if existing != normalized => Err(self.already_set("signed_payload")),
            _ => Ok(()),
        }
    }

    fn check_transaction_hash(&self, hash: TxHash) -> OperationResult<()> {
        match self.transaction_hash {
            Some(existing) if existing != hash => Err(self.already_set("transaction_hash")),
            _ => Ok(()),
        }
    }

    fn already_set(&self, field: &'static str) -> OperationError {
        OperationError::FieldAlreadySet {
            field,
            operation_id: self.operation_id.clone(),
        }
    }
}

impl<K> OperationRecord<K>
where
    K: OperationKind<Payload = StructuredTransaction>,
{
    /// Sign the decoded payload and attach the signed payload and its hash.
    pub async fn sign<S>(&mut self, signer: &S) -> OperationResult<SignedTransaction>
    where
        S: TransactionSigner + ?Sized,
    {
        let unsigned = self.decoded_transaction()?.clone();
        let signed = signer.sign(&unsigned).await?;

        // Both set-once fields are checked before either is written.
        let raw = normalize_signed_payload(&signed.raw)?;
        self.check_signed_payload(&raw)?;
        self.check_transaction_hash(signed.hash)?;

        self.attach_signed_payload(&raw)?;
        self.attach_transaction_hash(signed.hash)?;

        tracing::info!(
            kind = K::NAME,
            operation_id = %self.operation_id,
            tx_hash = %signed.hash,
            signer = %signer.address(),
            "Operation signed"
        );

        Ok(signed)
    }
}

/// Canonical `0x`-lowercase form of a signed payload.
fn normalize_signed_payload(signed_payload: &str) -> OperationResult<String> {
    let bytes = hex::decode(signed_payload).map_err(|e| {
        OperationError::InvalidRecord(format!("signed payload is not hex: {}", e))
    })?;
    if bytes.is_empty() {
        return Err(OperationError::InvalidRecord("signed payload is empty".to_string()));
    }
    Ok(hex::encode_prefixed(bytes))
}

fn parse_amount(raw: &str) -> OperationResult<U256> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OperationError::InvalidRecord(format!(
            "amount '{}' is not an atomic-unit integer",
            raw
        )));
    }
    U256::from_str_radix(raw, 10)
        .map_err(|e| OperationError::InvalidRecord(format!("amount '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::LocalSigner;
    use crate::operation::kind::{Trade, Transfer};
    use crate::payload::codec::encode_json;
    use serde_json::json;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn payload() -> String {
        encode_json(&json!({
            "chainId": "0x14a34",
            "nonce": "0x0",
            "maxPriorityFeePerGas": "0x3b9aca00",
            "maxFeePerGas": "0x3b9aca64",
            "gas": "0x5208",
            "to": "0x4d9e4f3f4d1a8b5f4f7b1f5a5f5e5d5c5b5a5958",
            "value": "0x22b1c8c1227a0000",
            "input": "0x",
        }))
    }

    fn model() -> OperationModel {
        OperationModel {
            operation_id: "transfer-1".to_string(),
            network_id: "base-sepolia".to_string(),
            wallet_id: "wallet-1".to_string(),
            source_address_id: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
            destination_address_id: Some("0x4d9e4f3f4d1a8b5f4f7b1f5a5f5e5d5c5b5a5958".to_string()),
            asset_id: "eth".to_string(),
            amount: "2500000000000000000".to_string(),
            unsigned_payload: payload(),
            signed_payload: None,
            transaction_hash: None,
        }
    }

    #[test]
    fn test_from_model() {
        let record = OperationRecord::<Transfer>::from_model(model()).unwrap();
        assert_eq!(record.operation_id(), "transfer-1");
        assert_eq!(record.amount(), U256::from(2_500_000_000_000_000_000u64));
        assert!(record.signed_payload().is_none());
        assert!(record.transaction_hash().is_none());
        assert!(!record.is_decoded());
    }

    #[test]
    fn test_from_camel_case_json() {
        let model: OperationModel = serde_json::from_value(json!({
            "transferId": "t-9",
            "networkId": "base-sepolia",
            "walletId": "w",
            "addressId": "0xabc",
            "destination": "0xdef",
            "assetId": "eth",
            "amount": "1",
            "unsignedPayload": payload(),
            "transactionHash": format!("0x{}", "11".repeat(32)),
        }))
        .unwrap();

        let record = OperationRecord::<Transfer>::from_model(model).unwrap();
        assert_eq!(record.operation_id(), "t-9");
        assert_eq!(record.destination_address_id(), Some("0xdef"));
        assert_eq!(record.transaction_hash(), Some(TxHash::repeat_byte(0x11)));
    }

    #[test]
    fn test_construction_rejects_bad_snapshots() {
        let mut empty_payload = model();
        empty_payload.unsigned_payload = String::new();
        assert!(matches!(
            OperationRecord::<Transfer>::from_model(empty_payload),
            Err(OperationError::InvalidRecord(_))
        ));

        let mut float_amount = model();
        float_amount.amount = "2.5".to_string();
        assert!(matches!(
            OperationRecord::<Transfer>::from_model(float_amount),
            Err(OperationError::InvalidRecord(_))
        ));

        let mut bad_hash = model();
        bad_hash.transaction_hash = Some("0x12".to_string());
        assert!(matches!(
            OperationRecord::<Transfer>::from_model(bad_hash),
            Err(OperationError::Blockchain(_))
        ));
    }

    #[test]
    fn test_decode_is_cached() {
        let record = OperationRecord::<Transfer>::from_model(model()).unwrap();
        let first = record.decoded_transaction().unwrap() as *const StructuredTransaction;
        assert!(record.is_decoded());
        let second = record.decoded_transaction().unwrap() as *const StructuredTransaction;
        assert_eq!(first, second);
        assert_eq!(record.decoded_transaction().unwrap().gas_limit, U256::from(21_000u64));
    }

    #[test]
    fn test_decode_errors_are_not_cached() {
        let mut bad = model();
        bad.unsigned_payload = "0x1".to_string();
        let record = OperationRecord::<Transfer>::from_model(bad).unwrap();
        assert!(record.decoded_transaction().is_err());
        assert!(!record.is_decoded());
    }

    #[test]
    fn test_transaction_hash_is_set_once() {
        let mut record = OperationRecord::<Transfer>::from_model(model()).unwrap();
        let hash = TxHash::repeat_byte(1);

        record.attach_transaction_hash(hash).unwrap();
        record.attach_transaction_hash(hash).unwrap();
        let err = record.attach_transaction_hash(TxHash::repeat_byte(2)).unwrap_err();

        assert!(matches!(
            err,
            OperationError::FieldAlreadySet { field: "transaction_hash", .. }
        ));
        assert_eq!(record.transaction_hash(), Some(hash));
    }

    #[test]
    fn test_signed_payload_is_set_once() {
        let mut record = OperationRecord::<Trade>::from_model(model()).unwrap();

        record.attach_signed_payload("0x02AB").unwrap();
        // Same bytes, different spelling.
        record.attach_signed_payload("02ab").unwrap();
        assert!(record.attach_signed_payload("0x02ac").is_err());
        assert!(record.attach_signed_payload("0x0").is_err());
        assert_eq!(record.signed_payload(), Some("0x02ab"));
    }

    #[tokio::test]
    async fn test_sign_attaches_payload_and_hash() {
        let signer = LocalSigner::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let mut record = OperationRecord::<Transfer>::from_model(model()).unwrap();

        let signed = record.sign(&signer).await.unwrap();

        assert_eq!(record.signed_payload(), Some(signed.raw.as_str()));
        assert_eq!(record.transaction_hash(), Some(signed.hash));

        // Signing again yields the same transaction and is accepted.
        record.sign(&signer).await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_with_conflicting_hash_changes_nothing() {
        let signer = LocalSigner::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let mut snapshot = model();
        snapshot.transaction_hash = Some(format!("0x{}", "11".repeat(32)));
        let mut record = OperationRecord::<Transfer>::from_model(snapshot).unwrap();

        let err = record.sign(&signer).await.unwrap_err();

        assert!(matches!(
            err,
            OperationError::FieldAlreadySet { field: "transaction_hash", .. }
        ));
        assert!(record.signed_payload().is_none());
        assert_eq!(record.transaction_hash(), Some(TxHash::repeat_byte(0x11)));
    }

    #[test]
    fn test_summary() {
        let mut record = OperationRecord::<Transfer>::from_model(model()).unwrap();
        record.attach_transaction_hash(TxHash::repeat_byte(0xaa)).unwrap();

        let line = record.summary_with_amount("2.5", LifecycleState::Complete);
        assert!(line.starts_with("Transfer { operation_id: 'transfer-1'"));
        assert!(line.contains("network_id: 'base-sepolia'"));
        assert!(line.contains("amount: '2.5'"));
        assert!(line.contains(&format!("transaction_hash: '0x{}'", "aa".repeat(32))));
        assert!(line.ends_with("status: 'complete' }"));
        assert!(!line.contains('\n'));

        assert!(record
            .summary(LifecycleState::Pending)
            .contains("amount: '2500000000000000000'"));
    }
}
