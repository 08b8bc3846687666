use std::collections::BTreeMap;

use common_cell::{CellError, CellRef, CellSlice, Dictionary, StdAddress};
use common_constants::{ASSET_ID_BITS, FACTOR_SCALE, PRINCIPAL_BITS};
use common_errors::{Error, Result};
use common_structs::{AssetConfig, AssetData, AssetId};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Principal bookkeeping of one borrower, whatever its backing representation.
pub trait UserBalancer {
    /// Signed principal of `asset`, zero when the position never touched it.
    fn principal(&self, asset: &AssetId) -> BigInt;

    /// Position copy with `delta` added to the principal of `asset`.
    fn with_changed_principal(&self, asset: &AssetId, delta: &BigInt) -> Self
    where
        Self: Sized;

    /// No asset has a negative principal.
    fn has_no_debt(&self) -> bool;

    /// Balance of `asset` at the given indices.
    ///
    /// When `dust` is given, a supplied principal below the asset's dust
    /// threshold counts as zero.
    fn balance(&self, asset: &AssetId, data: &AssetData, dust: Option<&AssetConfig>) -> BigInt {
        let principal = self.principal(asset);
        if principal.is_zero() {
            return BigInt::zero();
        }

        let index = if principal.is_positive() {
            if let Some(config) = dust {
                if principal < BigInt::from(config.dust) {
                    return BigInt::zero();
                }
            }
            &data.s_rate
        } else {
            &data.b_rate
        };

        principal * index / BigInt::from(FACTOR_SCALE)
    }
}

/// Bare principal map, as kept by callers that track positions themselves.
impl UserBalancer for BTreeMap<AssetId, BigInt> {
    fn principal(&self, asset: &AssetId) -> BigInt {
        self.get(asset).cloned().unwrap_or_default()
    }

    fn with_changed_principal(&self, asset: &AssetId, delta: &BigInt) -> Self {
        let mut changed = self.clone();
        *changed.entry(asset.clone()).or_default() += delta;
        changed
    }

    fn has_no_debt(&self) -> bool {
        !self.values().any(Signed::is_negative)
    }
}

fn field(name: &'static str) -> impl Fn(CellError) -> Error {
    move |err| Error::decode(format!("user {name}"), err)
}

/// Decoded state of a user lending contract.
///
/// Only the principals take part in risk math; the other fields are carried
/// so the state can be inspected or re-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPosition {
    pub address: Option<StdAddress>,
    pub code_version: u64,
    pub master_address: Option<StdAddress>,
    pub owner_address: Option<StdAddress>,
    pub principals: BTreeMap<AssetId, BigInt>,
    pub state: i64,
    pub rewards: Dictionary,
    pub backup_cell_1: Option<CellRef>,
    pub backup_cell_2: Option<CellRef>,
}

impl Default for UserPosition {
    fn default() -> Self {
        UserPosition {
            address: None,
            code_version: 0,
            master_address: None,
            owner_address: None,
            principals: BTreeMap::new(),
            state: 0,
            rewards: Dictionary::empty(ASSET_ID_BITS),
            backup_cell_1: None,
            backup_cell_2: None,
        }
    }
}

impl UserPosition {
    pub fn new(address: StdAddress) -> Self {
        UserPosition {
            address: Some(address),
            ..Self::default()
        }
    }

    pub fn from_principals(principals: impl IntoIterator<Item = (AssetId, BigInt)>) -> Self {
        UserPosition {
            principals: principals.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Decodes the persistent data of a user contract:
    ///
    /// ```text
    /// code_version:Coins master:MsgAddress owner:MsgAddress
    /// principals:(HashmapE 256 int64) state:int64
    /// rewards:(HashmapE 256 _) backup_1:(Maybe ^Cell) backup_2:(Maybe ^Cell)
    /// ```
    pub fn decode(address: Option<StdAddress>, data: &CellRef) -> Result<Self> {
        let mut slice = CellSlice::new(data.clone());
        let slice = &mut slice;
        let code_version = slice
            .load_coins()
            .map_err(field("code version"))?
            .to_u64()
            .ok_or_else(|| Error::Malformed("user code version exceeds 64 bits".to_string()))?;
        let master_address = slice.load_address().map_err(field("master address"))?;
        let owner_address = slice.load_address().map_err(field("owner address"))?;

        let principals_dict = slice.load_dict(ASSET_ID_BITS).map_err(field("principals"))?;
        let mut principals = BTreeMap::new();
        for (key, mut value) in principals_dict.load_all().map_err(field("principals"))? {
            let principal = value.load_int(PRINCIPAL_BITS).map_err(field("principal"))?;
            principals.insert(AssetId::new(key), BigInt::from(principal));
        }

        let state = slice.load_int(64).map_err(field("state"))?;
        let rewards = slice.load_dict(ASSET_ID_BITS).map_err(field("rewards"))?;
        let backup_cell_1 = slice.load_maybe_ref().map_err(field("backup cell"))?;
        let backup_cell_2 = slice.load_maybe_ref().map_err(field("backup cell"))?;

        Ok(UserPosition {
            address,
            code_version,
            master_address,
            owner_address,
            principals,
            state,
            rewards,
            backup_cell_1,
            backup_cell_2,
        })
    }

    pub fn principals(&self) -> &BTreeMap<AssetId, BigInt> {
        &self.principals
    }
}

impl UserBalancer for UserPosition {
    fn principal(&self, asset: &AssetId) -> BigInt {
        self.principals.principal(asset)
    }

    fn with_changed_principal(&self, asset: &AssetId, delta: &BigInt) -> Self {
        UserPosition {
            principals: self.principals.with_changed_principal(asset, delta),
            ..self.clone()
        }
    }

    fn has_no_debt(&self) -> bool {
        self.principals.has_no_debt()
    }
}
