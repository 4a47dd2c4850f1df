//! Unsigned payload decoding.
//!
//! # Wire Format
//! ```text
//! hex( utf8( {"chainId": .., "nonce": .., "maxPriorityFeePerGas": ..,
//!             "maxFeePerGas": .., "gas": .., "value": ..,
//!             "to": "0x..", "input": "0x.."} ) )
//! ```
//!
//! Numeric fields arrive either as JSON integers or as quantity strings
//! (`"0x5208"` / `"21000"`). Fields are captured as raw JSON text so integers
//! are parsed straight into `U256`; no value ever passes through `f64`.

use alloy::hex;
use alloy::primitives::{Address, Bytes, U256};
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::payload::types::{PayloadError, PayloadResult, StructuredTransaction};

type Fields = HashMap<String, Box<RawValue>>;

/// Shape of the payload an operation kind carries.
pub trait PayloadShape: Clone + std::fmt::Debug + PartialEq + Send + Sync + Sized {
    /// Decode a server-issued hex payload.
    fn decode(hex_payload: &str) -> PayloadResult<Self>;
}

impl PayloadShape for StructuredTransaction {
    fn decode(hex_payload: &str) -> PayloadResult<Self> {
        decode(hex_payload)
    }
}

/// Decode a hex-encoded, JSON-serialized unsigned transaction.
pub fn decode(hex_payload: &str) -> PayloadResult<StructuredTransaction> {
    let bytes = hex::decode(hex_payload)
        .map_err(|e| PayloadError::MalformedPayload(e.to_string()))?;

    let text = std::str::from_utf8(&bytes)
        .map_err(|e| PayloadError::InvalidPayloadEncoding(e.to_string()))?;

    let document: Box<RawValue> = serde_json::from_str(text)
        .map_err(|e| PayloadError::InvalidPayloadEncoding(e.to_string()))?;

    if !document.get().starts_with('{') {
        return Err(PayloadError::InvalidPayloadSchema(
            "payload is not a JSON object".to_string(),
        ));
    }
    let fields: Fields = serde_json::from_str(document.get())
        .map_err(|e| PayloadError::InvalidPayloadSchema(e.to_string()))?;

    Ok(StructuredTransaction {
        chain_id: quantity(&fields, "chainId")?,
        nonce: quantity(&fields, "nonce")?,
        max_priority_fee_per_gas: quantity(&fields, "maxPriorityFeePerGas")?,
        max_fee_per_gas: quantity(&fields, "maxFeePerGas")?,
        gas_limit: quantity(&fields, "gas")?,
        to: address(&fields, "to")?,
        value: quantity(&fields, "value")?,
        data: bytes_field(&fields, "input")?,
    })
}

fn field<'a>(fields: &'a Fields, name: &str) -> PayloadResult<&'a str> {
    fields
        .get(name)
        .map(|raw| raw.get())
        .filter(|raw| *raw != "null")
        .ok_or_else(|| PayloadError::InvalidPayloadSchema(format!("missing field `{}`", name)))
}

fn string_field(fields: &Fields, name: &str) -> PayloadResult<String> {
    serde_json::from_str::<String>(field(fields, name)?).map_err(|_| {
        PayloadError::InvalidPayloadSchema(format!("field `{}` must be a string", name))
    })
}

fn quantity(fields: &Fields, name: &str) -> PayloadResult<U256> {
    let invalid = || {
        PayloadError::InvalidPayloadSchema(format!(
            "field `{}` must be a non-negative integer",
            name
        ))
    };

    let raw = field(fields, name)?;
    if raw.starts_with('"') {
        let text: String = serde_json::from_str(raw).map_err(|_| invalid())?;
        let text = text.trim();
        return match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(digits) if !digits.is_empty() => {
                U256::from_str_radix(digits, 16).map_err(|_| invalid())
            }
            Some(_) => Err(invalid()),
            None => decimal(text).ok_or_else(invalid),
        };
    }

    decimal(raw).ok_or_else(invalid)
}

fn decimal(digits: &str) -> Option<U256> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(digits, 10).ok()
}

fn address(fields: &Fields, name: &str) -> PayloadResult<Address> {
    let raw = string_field(fields, name)?;
    Address::from_str(&raw).map_err(|e| {
        PayloadError::InvalidPayloadSchema(format!("field `{}` is not an address: {}", name, e))
    })
}

fn bytes_field(fields: &Fields, name: &str) -> PayloadResult<Bytes> {
    let raw = string_field(fields, name)?;
    hex::decode(&raw).map(Bytes::from).map_err(|e| {
        PayloadError::InvalidPayloadSchema(format!("field `{}` is not hex: {}", name, e))
    })
}

/// Hex-encode a JSON payload the way the creation service does.
pub fn encode_json(payload: &Value) -> String {
    hex::encode(payload.to_string())
}
