use common_errors::{Error, Result};
use common_rates::{AccrualProjection, InterestRates};
use common_structs::{AssetId, AssetManager};

use crate::{utils, AssetMap, AssetStore, EventsModule, MarketSnapshot};

impl common_math::SharedMathModule for MarketSnapshot {}
impl InterestRates for MarketSnapshot {}

impl MarketSnapshot {
    /// Projects one asset of this generation to `target_timestamp`.
    pub fn project_forward(&self, asset: &AssetId, target_timestamp: u64) -> Result<AccrualProjection> {
        let data = self
            .data(asset)
            .ok_or_else(|| Error::AssetNotLoaded(asset.to_string()))?;
        let config = self
            .config(asset)
            .ok_or_else(|| Error::AssetNotLoaded(asset.to_string()))?;

        Ok(self.simulate_update_indexes(data, config, target_timestamp))
    }

    /// Projects every asset to `target_timestamp`. The config map is shared
    /// with `self`.
    pub fn project_all(&self, target_timestamp: u64) -> Result<MarketSnapshot> {
        let mut projected = AssetMap::new();
        for asset in self.asset_keys().iter() {
            let projection = self.project_forward(asset, target_timestamp)?;
            projected.insert(asset.clone(), projection.data);
        }
        Ok(self.with_data(projected))
    }
}

impl AssetStore {
    pub fn project_forward(&self, asset: &AssetId, target_timestamp: u64) -> Result<AccrualProjection> {
        self.snapshot().project_forward(asset, target_timestamp)
    }

    /// Projection of `asset` to the current wall-clock time.
    pub fn calculate_current_rates(&self, asset: &AssetId) -> Result<AccrualProjection> {
        self.project_forward(asset, utils::unix_now())
    }

    /// Returns a new store with every asset projected to `now + forward`
    /// seconds. `self` is left untouched.
    pub fn update_current_rates(&self, forward: i64) -> Result<AssetStore> {
        let target = utils::shifted_now(forward);
        let snapshot = self.snapshot().project_all(target)?;

        self.update_market_rates_event(self.assets().len(), target);
        Ok(AssetStore::with_snapshot(snapshot))
    }
}
