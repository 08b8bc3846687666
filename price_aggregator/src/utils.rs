use std::time::{SystemTime, UNIX_EPOCH};

use common_constants::{ORACLE_DATA_TTL_SECONDS, ORACLE_SIGNATURE_BYTES};
use common_structs::AssetDescriptor;
use num_traits::Zero;

use crate::{OracleData, RawData};

pub static REJECT_STALE: &str = "attestation is older than the oracle ttl";
pub static REJECT_TOO_FEW_PRICES: &str = "attestation carries fewer prices than configured assets";
pub static REJECT_MISSING_PRICE: &str = "attestation misses a configured asset";
pub static REJECT_ZERO_PRICE: &str = "attestation has a zero price";
pub static REJECT_BAD_SIGNATURE: &str = "attestation signature has the wrong length";

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

/// Checks one attestation against the configured assets at time `now`.
/// Returns the rejection reason of the first failed check.
pub fn verify(data: &RawData, assets: &[AssetDescriptor], now: i64) -> Result<(), &'static str> {
    if now.saturating_sub(data.timestamp) > ORACLE_DATA_TTL_SECONDS as i64 {
        return Err(REJECT_STALE);
    }

    if data.signature.len() != ORACLE_SIGNATURE_BYTES {
        return Err(REJECT_BAD_SIGNATURE);
    }

    if data.prices.len() < assets.len() {
        return Err(REJECT_TOO_FEW_PRICES);
    }

    for asset in assets {
        match data.price(&asset.id) {
            None => return Err(REJECT_MISSING_PRICE),
            Some(price) if price.is_zero() => return Err(REJECT_ZERO_PRICE),
            Some(_) => {}
        }
    }

    Ok(())
}

/// Keeps the `required` most recent attestations; ties keep arrival order.
pub fn select_most_recent(mut accepted: Vec<OracleData>, required: usize) -> Vec<OracleData> {
    accepted.sort_by(|a, b| b.raw.timestamp.cmp(&a.raw.timestamp));
    accepted.truncate(required);
    accepted
}

/// Smallest publish timestamp of the set, `0` when empty.
pub fn min_timestamp(retained: &[OracleData]) -> i64 {
    retained
        .iter()
        .map(|data| data.raw.timestamp)
        .min()
        .unwrap_or_default()
}
