pub mod cache;
pub mod rates;
pub mod storage;
pub mod utils;
pub mod view;

pub use cache::MarketSnapshot;
pub use common_events::*;
pub use common_rates::AccrualProjection;

use std::{collections::BTreeMap, sync::Arc};

use common_cell::Dictionary;
use common_errors::Result;
use parking_lot::RwLock;

/// Cached per-asset risk configuration and accrual state.
///
/// **Scope**: Holds the last decoded snapshot of the master contract's asset
/// dictionaries for a fixed set of assets.
///
/// **Goal**: Readers always observe a consistent generation. A decode builds
/// the new maps off-lock and swaps them in as a whole under one write lock.
pub struct AssetStore {
    assets: Arc<Vec<crate::AssetId>>,
    state: RwLock<MarketSnapshot>,
}

impl EventsModule for AssetStore {}

impl AssetStore {
    pub fn new(assets: impl IntoIterator<Item = crate::AssetId>) -> Self {
        let mut assets: Vec<_> = assets.into_iter().collect();
        assets.sort();
        assets.dedup();
        let assets = Arc::new(assets);

        AssetStore {
            state: RwLock::new(MarketSnapshot::empty(assets.clone())),
            assets,
        }
    }

    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(config.asset_ids())
    }

    pub(crate) fn with_snapshot(snapshot: MarketSnapshot) -> Self {
        AssetStore {
            assets: snapshot.asset_keys(),
            state: RwLock::new(snapshot),
        }
    }

    /// Decodes the supplied dictionaries for every known asset and replaces
    /// the corresponding maps.
    ///
    /// **Process**:
    /// 1. Decode `data` and `config` (whichever are present) into fresh maps.
    /// 2. Fail with a decode error if any known asset is missing or malformed;
    ///    nothing is replaced in that case.
    /// 3. Swap the new maps in under a single write lock.
    pub fn decode(&self, data: Option<&Dictionary>, config: Option<&Dictionary>) -> Result<()> {
        let data = data
            .map(|dict| storage::load_asset_data(dict, &self.assets))
            .transpose()?;
        let config = config
            .map(|dict| storage::load_asset_configs(dict, &self.assets))
            .transpose()?;
        let (data_replaced, config_replaced) = (data.is_some(), config.is_some());

        {
            let mut state = self.state.write();
            if let Some(data) = data {
                state.data = Some(Arc::new(data));
            }
            if let Some(config) = config {
                state.config = Some(Arc::new(config));
            }
        }

        self.update_market_state_event(self.assets.len(), config_replaced, data_replaced);
        Ok(())
    }

    /// Consistent view of the current generation.
    pub fn snapshot(&self) -> MarketSnapshot {
        self.state.read().clone()
    }
}

pub(crate) type AssetMap<T> = BTreeMap<crate::AssetId, T>;
