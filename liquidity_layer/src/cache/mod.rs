use std::sync::Arc;

use common_structs::{AssetConfig, AssetData, AssetId, AssetManager};

use crate::AssetMap;

/// One generation of decoded asset state.
///
/// **Scope**: Cheap to clone; the maps are shared behind `Arc` and never
/// mutated in place.
///
/// **Goal**: Give a health evaluation a view that cannot change underneath it
/// while the store is being reloaded.
///
/// **Fields**:
/// - `config`: risk parameters per asset, `None` until first decoded.
/// - `data`: accrual snapshots per asset, `None` until first decoded.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    assets: Arc<Vec<AssetId>>,
    pub(crate) config: Option<Arc<AssetMap<AssetConfig>>>,
    pub(crate) data: Option<Arc<AssetMap<AssetData>>>,
}

impl MarketSnapshot {
    pub(crate) fn empty(assets: Arc<Vec<AssetId>>) -> Self {
        MarketSnapshot {
            assets,
            config: None,
            data: None,
        }
    }

    pub(crate) fn asset_keys(&self) -> Arc<Vec<AssetId>> {
        self.assets.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.config.is_some() && self.data.is_some()
    }

    /// Same keys and config, replaced accrual state.
    pub(crate) fn with_data(&self, data: AssetMap<AssetData>) -> Self {
        MarketSnapshot {
            assets: self.assets.clone(),
            config: self.config.clone(),
            data: Some(Arc::new(data)),
        }
    }
}

impl AssetManager for MarketSnapshot {
    fn assets(&self) -> Vec<AssetId> {
        self.assets.as_ref().clone()
    }

    fn config(&self, asset: &AssetId) -> Option<&AssetConfig> {
        self.config.as_ref()?.get(asset)
    }

    fn data(&self, asset: &AssetId) -> Option<&AssetData> {
        self.data.as_ref()?.get(asset)
    }
}
