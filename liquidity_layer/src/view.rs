use common_structs::{AssetConfig, AssetData, AssetId, AssetManager};

use crate::AssetStore;

impl AssetStore {
    pub fn assets(&self) -> Vec<AssetId> {
        self.assets.as_ref().clone()
    }

    pub fn config(&self, asset: &AssetId) -> Option<AssetConfig> {
        self.state.read().config(asset).cloned()
    }

    pub fn data(&self, asset: &AssetId) -> Option<AssetData> {
        self.state.read().data(asset).cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().is_loaded()
    }
}
