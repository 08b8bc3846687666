//! Layout of the price payload attached to liquidation and withdraw messages.
//!
//! ```text
//! container  = ^medians ^oracles
//! medians    = asset_id:uint256 price:Coins next:(Maybe ^medians)
//! oracles    = oracle_id:uint32 ^proof signature:bits next:(Maybe ^oracles)
//! proof      = merkle proof of (timestamp:uint32 prices:(Maybe ^dict))
//! ```

use common_cell::{Cell, CellBuilder, CellRef};
use common_constants::{ASSET_ID_BITS, ORACLE_ID_BITS, TIMESTAMP_BITS};
use common_errors::{Error, Result};
use common_structs::AssetId;
use num_bigint::BigUint;

use crate::{OracleData, RawData};

/// Chains the medians so the last entry of `medians` heads the list.
pub fn pack_medians(medians: &[(AssetId, BigUint)]) -> Result<Option<CellRef>> {
    let mut head: Option<CellRef> = None;
    for (asset, median) in medians {
        let mut builder = CellBuilder::new();
        builder
            .store_big_uint(asset.as_biguint(), ASSET_ID_BITS)?
            .store_coins(median)?
            .store_maybe_ref(head.take())?;
        head = Some(builder.build_ref()?);
    }
    Ok(head)
}

/// Full-inclusion merkle proof of what the oracle signed.
pub fn attestation_proof(data: &RawData) -> Result<CellRef> {
    let timestamp = u32::try_from(data.timestamp)
        .map_err(|_| Error::Malformed(format!("timestamp {} exceeds 32 bits", data.timestamp)))?;

    let mut signed = CellBuilder::new();
    signed
        .store_uint(u64::from(timestamp), TIMESTAMP_BITS)
        .and_then(|builder| builder.store_maybe_ref(Some(data.prices_dict.clone())))
        .map_err(Error::Proof)?;
    let signed = signed.build_ref().map_err(Error::Proof)?;

    Cell::merkle_proof(signed)
        .map(Cell::into_ref)
        .map_err(Error::Proof)
}

/// Chains the attestations by descending oracle id, so the smallest id heads
/// the list.
pub fn pack_oracles(retained: &[OracleData]) -> Result<Option<CellRef>> {
    let mut ordered: Vec<&OracleData> = retained.iter().collect();
    ordered.sort_by(|a, b| b.oracle_id.cmp(&a.oracle_id));

    let mut head: Option<CellRef> = None;
    for data in ordered {
        let proof = attestation_proof(&data.raw)?;
        let mut builder = CellBuilder::new();
        builder
            .store_uint(u64::from(data.oracle_id), ORACLE_ID_BITS)?
            .store_ref(proof)?
            .store_bits(&data.raw.signature, data.raw.signature.len() * 8)?
            .store_maybe_ref(head.take())?;
        head = Some(builder.build_ref()?);
    }
    Ok(head)
}

pub fn pack(medians: &[(AssetId, BigUint)], retained: &[OracleData]) -> Result<CellRef> {
    let empty = || CellBuilder::new().build_ref();
    let medians = match pack_medians(medians)? {
        Some(head) => head,
        None => empty()?,
    };
    let oracles = match pack_oracles(retained)? {
        Some(head) => head,
        None => empty()?,
    };

    let mut container = CellBuilder::new();
    container.store_ref(medians)?.store_ref(oracles)?;
    Ok(container.build_ref()?)
}
