use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
};

use common_errors::{Error, Result};
use common_math::SharedMathModule;
use num_bigint::{BigInt, BigUint};
use num_traits::{Num, Signed};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

mod config;

pub use config::*;

/// 256-bit asset identifier, the SHA-256 of the asset ticker.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(BigUint);

impl AssetId {
    pub fn new(id: BigUint) -> Self {
        AssetId(id)
    }

    pub fn from_name(name: &str) -> Self {
        AssetId(BigUint::from_bytes_be(&Sha256::digest(name.as_bytes())))
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", self.0)
    }
}

/// Accepts the decimal form or a `0x` prefixed hex form.
impl FromStr for AssetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = match s.strip_prefix("0x") {
            Some(hex) => BigUint::from_str_radix(hex, 16),
            None => BigUint::from_str_radix(s, 10),
        };
        parsed
            .map(AssetId)
            .map_err(|_| Error::Malformed(format!("invalid asset id {s}")))
    }
}

impl From<BigUint> for AssetId {
    fn from(id: BigUint) -> Self {
        AssetId(id)
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Risk parameters of one asset, as stored by the master contract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetConfig {
    pub oracle: BigUint,
    pub decimals: u8,
    pub collateral_factor: u16,
    pub liquidation_threshold: u16,
    pub liquidation_bonus: u16,
    pub base_borrow_rate: u64,
    pub borrow_rate_slope_low: u64,
    pub borrow_rate_slope_high: u64,
    pub supply_rate_slope_low: u64,
    pub supply_rate_slope_high: u64,
    pub target_utilization: u64,
    pub origination_fee: u64,
    pub dust: u64,
    pub max_total_supply: u64,
    pub reserve_factor: u16,
    pub liquidation_reserve_factor: u16,
    pub min_principal_for_rewards: u64,
    pub base_tracking_supply_speed: u64,
    pub base_tracking_borrow_speed: u64,
}

impl SharedMathModule for AssetConfig {}

impl AssetConfig {
    /// One whole unit of the asset in its smallest denomination.
    pub fn scale(&self) -> BigInt {
        self.pow10(self.decimals)
    }
}

/// Accrual snapshot of one asset. `s_rate` and `b_rate` are indices scaled
/// by 1e12.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetData {
    pub s_rate: BigInt,
    pub b_rate: BigInt,
    pub total_supply: BigInt,
    pub total_borrow: BigInt,
    pub last_accrual: u64,
    pub balance: BigInt,
    pub tracking_supply_index: BigInt,
    pub tracking_borrow_index: BigInt,
    pub awaited_supply: BigInt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetValue {
    pub asset: AssetId,
    pub value: BigInt,
}

/// Solvency snapshot of a position. Values are in price-scale units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Health {
    pub total_supply: BigInt,
    pub total_debt: BigInt,
    pub total_limit: BigInt,
    pub greatest_collateral: Option<AssetValue>,
    pub greatest_loan: Option<AssetValue>,
}

impl SharedMathModule for Health {}

impl Health {
    pub fn is_liquidatable(&self) -> bool {
        self.total_limit < self.total_debt
    }

    /// Collateral no longer covers the debt plus the liquidation bonus.
    pub fn is_bad_debt(&self, liquidation_bonus: u16, bonus_scale: u64) -> bool {
        &self.total_supply * BigInt::from(bonus_scale)
            < &self.total_debt * BigInt::from(liquidation_bonus)
    }

    /// `1 - debt / limit` clamped to `[0, 1]`; `1` without a limit.
    pub fn factor(&self) -> f64 {
        if !self.total_limit.is_positive() {
            return 1.0;
        }
        match self.ratio_to_f64(&self.total_debt, &self.total_limit) {
            Some(ratio) => (1.0 - ratio).clamp(0.0, 1.0),
            None => 1.0,
        }
    }
}

/// Read access to decoded asset state.
pub trait AssetManager {
    fn assets(&self) -> Vec<AssetId>;

    fn config(&self, asset: &AssetId) -> Option<&AssetConfig>;

    fn data(&self, asset: &AssetId) -> Option<&AssetData>;
}

/// Read access to asset prices in price-scale units.
pub trait PriceSource {
    fn price(&self, asset: &AssetId) -> Option<BigInt>;
}

impl PriceSource for BTreeMap<AssetId, BigInt> {
    fn price(&self, asset: &AssetId) -> Option<BigInt> {
        self.get(asset).cloned()
    }
}

impl PriceSource for HashMap<AssetId, BigInt> {
    fn price(&self, asset: &AssetId) -> Option<BigInt> {
        self.get(asset).cloned()
    }
}

impl PriceSource for BTreeMap<AssetId, BigUint> {
    fn price(&self, asset: &AssetId) -> Option<BigInt> {
        self.get(asset).map(|price| BigInt::from(price.clone()))
    }
}
