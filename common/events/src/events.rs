pub use common_structs::*;

use common_errors::Error;
use num_bigint::{BigInt, BigUint};
use tracing::{debug, info, warn};

/// Structured log events for state transitions worth tracing. Components
/// implement the trait with an empty `impl` and call the helpers inline.
pub trait EventsModule {
    fn update_market_state_event(&self, assets: usize, config_replaced: bool, data_replaced: bool) {
        info!(
            assets,
            config_replaced, data_replaced, "asset state replaced"
        );
    }

    fn update_market_rates_event(&self, assets: usize, timestamp: u64) {
        debug!(assets, timestamp, "asset rates projected");
    }

    fn oracle_fetch_failed_event(&self, oracle_id: u32, endpoint: &str, error: &Error) {
        warn!(oracle_id, endpoint, %error, "oracle fetch failed");
    }

    fn oracle_rejected_event(&self, oracle_id: u32, timestamp: i64, reason: &'static str) {
        debug!(oracle_id, timestamp, reason, "oracle attestation rejected");
    }

    fn new_round_event(&self, accepted: usize, retained: usize, min_timestamp: i64) {
        info!(accepted, retained, min_timestamp, "prices aggregated");
    }

    fn asset_median_event(&self, asset: &AssetId, median: &BigUint, samples: usize) {
        debug!(%asset, %median, samples, "asset median");
    }

    fn liquidation_event(
        &self,
        loan_asset: &AssetId,
        collateral_asset: &AssetId,
        liquidation_amount: &BigInt,
        collateral_amount: &BigInt,
    ) {
        debug!(
            loan = %loan_asset,
            collateral = %collateral_asset,
            %liquidation_amount,
            %collateral_amount,
            "liquidation planned"
        );
    }
}
