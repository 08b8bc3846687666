use common_constants::*;
use common_errors::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::AssetId;

/// Scales of the master contract's fixed-point math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterParams {
    pub factor_scale: u64,
    pub asset_coefficient_scale: u64,
    pub asset_price_scale: u64,
    pub asset_reserve_factor_scale: u64,
    pub asset_liquidation_reserve_factor_scale: u64,
    pub asset_origination_fee_scale: u64,
    pub asset_liquidation_threshold_scale: u64,
    pub asset_liquidation_bonus_scale: u64,
    pub asset_srate_scale: u64,
    pub asset_brate_scale: u64,
    pub collateral_worth_threshold: u64,
}

impl Default for MasterParams {
    fn default() -> Self {
        MasterParams {
            factor_scale: FACTOR_SCALE,
            asset_coefficient_scale: ASSET_COEFFICIENT_SCALE,
            asset_price_scale: ASSET_PRICE_SCALE,
            asset_reserve_factor_scale: ASSET_RESERVE_FACTOR_SCALE,
            asset_liquidation_reserve_factor_scale: ASSET_LIQUIDATION_RESERVE_FACTOR_SCALE,
            asset_origination_fee_scale: ASSET_ORIGINATION_FEE_SCALE,
            asset_liquidation_threshold_scale: ASSET_LIQUIDATION_THRESHOLD_SCALE,
            asset_liquidation_bonus_scale: ASSET_LIQUIDATION_BONUS_SCALE,
            asset_srate_scale: ASSET_SRATE_SCALE,
            asset_brate_scale: ASSET_BRATE_SCALE,
            collateral_worth_threshold: COLLATERAL_WORTH_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleNft {
    pub id: u32,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub name: String,
    pub id: AssetId,
    pub decimals: u8,
}

impl AssetDescriptor {
    pub fn new(name: &str, decimals: u8) -> Self {
        AssetDescriptor {
            name: name.to_string(),
            id: AssetId::from_name(name),
            decimals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub master_address: String,
    pub master_version: u32,
    #[serde(default)]
    pub master_params: MasterParams,
    pub oracles: Vec<OracleNft>,
    pub minimal_oracles: usize,
    pub assets: Vec<AssetDescriptor>,
}

fn default_oracles() -> Vec<OracleNft> {
    ORACLE_NFT_ADDRESSES
        .iter()
        .enumerate()
        .map(|(id, address)| OracleNft {
            id: id as u32,
            address: address.to_string(),
        })
        .collect()
}

impl Config {
    pub fn main_mainnet() -> Self {
        Config {
            master_address: MAIN_MASTER_MAINNET.to_string(),
            master_version: MAIN_MASTER_VERSION,
            master_params: MasterParams::default(),
            oracles: default_oracles(),
            minimal_oracles: MAINNET_MINIMAL_ORACLES,
            assets: vec![
                AssetDescriptor::new(TON_TICKER, TON_DECIMALS),
                AssetDescriptor::new(USDT_TICKER, USD_STABLE_DECIMALS),
                AssetDescriptor::new(JUSDT_TICKER, USD_STABLE_DECIMALS),
                AssetDescriptor::new(JUSDC_TICKER, USD_STABLE_DECIMALS),
                AssetDescriptor::new(STTON_TICKER, TON_DECIMALS),
                AssetDescriptor::new(TSTON_TICKER, TON_DECIMALS),
            ],
        }
    }

    pub fn main_testnet() -> Self {
        Config {
            master_address: MAIN_MASTER_TESTNET.to_string(),
            master_version: TESTNET_MASTER_VERSION,
            master_params: MasterParams::default(),
            oracles: default_oracles(),
            minimal_oracles: TESTNET_MINIMAL_ORACLES,
            assets: vec![
                AssetDescriptor::new(TON_TICKER, TON_DECIMALS),
                AssetDescriptor::new(JUSDT_TICKER, USD_STABLE_DECIMALS),
                AssetDescriptor::new(JUSDC_TICKER, USD_STABLE_DECIMALS),
                AssetDescriptor::new(STTON_TICKER, TON_DECIMALS),
            ],
        }
    }

    pub fn lp_mainnet() -> Self {
        Config {
            master_address: LP_MASTER_MAINNET.to_string(),
            master_version: LP_MASTER_VERSION,
            master_params: MasterParams::default(),
            oracles: default_oracles(),
            minimal_oracles: MAINNET_MINIMAL_ORACLES,
            assets: vec![
                AssetDescriptor::new(TON_TICKER, TON_DECIMALS),
                AssetDescriptor::new(USDT_TICKER, USD_STABLE_DECIMALS),
                AssetDescriptor::new(TON_STORM_TICKER, LP_TOKEN_DECIMALS),
                AssetDescriptor::new(USDT_STORM_TICKER, LP_TOKEN_DECIMALS),
                AssetDescriptor::new(TONUSDT_DEDUST_TICKER, LP_TOKEN_DECIMALS),
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| Error::Malformed(err.to_string()))
    }

    pub fn asset_ids(&self) -> Vec<AssetId> {
        self.assets.iter().map(|asset| asset.id.clone()).collect()
    }

    pub fn asset(&self, name: &str) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    pub fn asset_id(&self, name: &str) -> Option<AssetId> {
        self.asset(name).map(|asset| asset.id.clone())
    }
}
