//! Atomic to display unit conversion.
//!
//! Only network-native assets are converted here. Token decimals vary per
//! contract and belong to the asset catalog, so token amounts pass through
//! unchanged.

use alloy::primitives::U256;
use std::collections::HashMap;

use crate::config::NetworkConfig;

/// Exact decimal rendering of an amount.
pub type DisplayAmount = String;

#[derive(Debug, Clone)]
struct NativeAsset {
    asset_id: String,
    decimals: u8,
}

/// Converts atomic amounts to display units per network.
#[derive(Debug, Clone)]
pub struct AmountNormalizer {
    native: HashMap<String, NativeAsset>,
}

impl AmountNormalizer {
    pub fn new(networks: &[NetworkConfig]) -> Self {
        let native = networks
            .iter()
            .map(|n| {
                (
                    n.network_id.clone(),
                    NativeAsset {
                        asset_id: n.native_asset_id.to_lowercase(),
                        decimals: n.native_decimals,
                    },
                )
            })
            .collect();
        Self { native }
    }

    /// Display form of `amount` of `asset_id` on `network_id`.
    pub fn to_display_units(&self, network_id: &str, asset_id: &str, amount: U256) -> DisplayAmount {
        match self.native.get(network_id) {
            Some(native) if native.asset_id == asset_id.to_lowercase() => {
                format_units_exact(amount, native.decimals)
            }
            _ => amount.to_string(),
        }
    }

    /// Whether `asset_id` is the native asset of `network_id`.
    pub fn is_native(&self, network_id: &str, asset_id: &str) -> bool {
        self.native
            .get(network_id)
            .is_some_and(|n| n.asset_id == asset_id.to_lowercase())
    }
}

impl Default for AmountNormalizer {
    fn default() -> Self {
        Self::new(&NetworkConfig::defaults())
    }
}

/// Render `amount / 10^decimals` as an exact decimal string.
///
/// Uses integer division and remainder; trailing fractional zeros are
/// dropped and no exponent notation is produced.
pub fn format_units_exact(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    // Past 10^77 the divisor exceeds every U256, so the amount is all fraction.
    let (whole, fraction) = match U256::from(10u64).checked_pow(U256::from(decimals)) {
        Some(divisor) => amount.div_rem(divisor),
        None => (U256::ZERO, amount),
    };
    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
