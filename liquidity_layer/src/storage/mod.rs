//! Layouts of the master contract's per-asset dictionaries.

use common_cell::{CellResult, CellSlice, Dictionary};
use common_constants::ASSET_ID_BITS;
use common_errors::{Error, Result};
use common_structs::{AssetConfig, AssetData, AssetId};
use num_bigint::BigInt;

use crate::AssetMap;

fn load_u64(slice: &mut CellSlice) -> CellResult<u64> {
    slice.load_uint(64)
}

fn load_u16(slice: &mut CellSlice) -> CellResult<u16> {
    Ok(slice.load_uint(16)? as u16)
}

fn load_amount(slice: &mut CellSlice) -> CellResult<BigInt> {
    Ok(BigInt::from(slice.load_big_uint(64)?))
}

/// `oracle:uint256 decimals:uint8 ^[risk parameters]`
pub fn decode_asset_config(slice: &mut CellSlice) -> CellResult<AssetConfig> {
    let oracle = slice.load_big_uint(256)?;
    let decimals = slice.load_uint(8)? as u8;
    let mut params = CellSlice::new(slice.load_ref()?);
    let params = &mut params;

    Ok(AssetConfig {
        oracle,
        decimals,
        collateral_factor: load_u16(params)?,
        liquidation_threshold: load_u16(params)?,
        liquidation_bonus: load_u16(params)?,
        base_borrow_rate: load_u64(params)?,
        borrow_rate_slope_low: load_u64(params)?,
        borrow_rate_slope_high: load_u64(params)?,
        supply_rate_slope_low: load_u64(params)?,
        supply_rate_slope_high: load_u64(params)?,
        target_utilization: load_u64(params)?,
        origination_fee: load_u64(params)?,
        dust: load_u64(params)?,
        max_total_supply: load_u64(params)?,
        reserve_factor: load_u16(params)?,
        liquidation_reserve_factor: load_u16(params)?,
        min_principal_for_rewards: load_u64(params)?,
        base_tracking_supply_speed: load_u64(params)?,
        base_tracking_borrow_speed: load_u64(params)?,
    })
}

pub fn decode_asset_data(slice: &mut CellSlice) -> CellResult<AssetData> {
    Ok(AssetData {
        s_rate: load_amount(slice)?,
        b_rate: load_amount(slice)?,
        total_supply: load_amount(slice)?,
        total_borrow: load_amount(slice)?,
        last_accrual: slice.load_uint(32)?,
        balance: load_amount(slice)?,
        tracking_supply_index: load_amount(slice)?,
        tracking_borrow_index: load_amount(slice)?,
        awaited_supply: load_amount(slice)?,
    })
}

fn load_entries<T>(
    dict: &Dictionary,
    assets: &[AssetId],
    what: &str,
    decode: fn(&mut CellSlice) -> CellResult<T>,
) -> Result<AssetMap<T>> {
    if dict.key_len() != ASSET_ID_BITS {
        return Err(Error::Malformed(format!(
            "{what} dictionary uses {} bit keys",
            dict.key_len()
        )));
    }

    let mut out = AssetMap::new();
    for asset in assets {
        let mut slice = dict
            .lookup(asset.as_biguint())
            .map_err(|err| Error::decode(format!("{what} of asset {asset}"), err))?
            .ok_or_else(|| Error::missing(format!("{what} of asset {asset} is missing")))?;
        let value =
            decode(&mut slice).map_err(|err| Error::decode(format!("{what} of asset {asset}"), err))?;
        out.insert(asset.clone(), value);
    }
    Ok(out)
}

pub fn load_asset_configs(dict: &Dictionary, assets: &[AssetId]) -> Result<AssetMap<AssetConfig>> {
    load_entries(dict, assets, "config", decode_asset_config)
}

pub fn load_asset_data(dict: &Dictionary, assets: &[AssetId]) -> Result<AssetMap<AssetData>> {
    load_entries(dict, assets, "data", decode_asset_data)
}
