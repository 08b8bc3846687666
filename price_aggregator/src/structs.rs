use std::collections::BTreeMap;

use common_cell::CellRef;
use common_structs::{AssetId, PriceSource};
use num_bigint::{BigInt, BigUint};

/// One oracle's signed price attestation as published on the feed.
#[derive(Clone, Debug)]
pub struct RawData {
    /// Prices read out of `prices_dict`; empty when the dictionary is unreadable.
    pub prices: BTreeMap<AssetId, BigUint>,
    /// Root of the 256-bit keyed price dictionary the signature covers.
    pub prices_dict: CellRef,
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
    pub timestamp: i64,
}

impl RawData {
    pub fn price(&self, asset: &AssetId) -> Option<&BigUint> {
        self.prices.get(asset)
    }
}

/// An attestation tagged with the oracle that produced it.
#[derive(Clone, Debug)]
pub struct OracleData {
    pub oracle_id: u32,
    pub raw: RawData,
}

/// Medians of one aggregation round together with the payload proving them.
#[derive(Clone, Debug)]
pub struct AggregatedPrices {
    pub prices: BTreeMap<AssetId, BigUint>,
    pub min_timestamp: i64,
    pub packed: CellRef,
}

impl AggregatedPrices {
    pub fn get(&self, asset: &AssetId) -> Option<&BigUint> {
        self.prices.get(asset)
    }

    /// Container cell handed to the transaction builder.
    pub fn data(&self) -> &CellRef {
        &self.packed
    }

    pub fn min_timestamp(&self) -> i64 {
        self.min_timestamp
    }
}

impl PriceSource for AggregatedPrices {
    fn price(&self, asset: &AssetId) -> Option<BigInt> {
        self.prices.get(asset).cloned().map(BigInt::from)
    }
}
