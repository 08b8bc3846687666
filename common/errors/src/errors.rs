use common_cell::CellError;
use thiserror::Error;

pub static ERROR_PRICE_NOT_FOUND: &str = "Price not found for asset.";

pub static ERROR_ASSET_CONFIG_NOT_FOUND: &str = "Asset config not loaded.";

pub static ERROR_ASSET_DATA_NOT_FOUND: &str = "Asset data not loaded.";

pub static ERROR_ZERO_PRICE: &str = "Asset price is zero.";

pub static ERROR_ZERO_RATE: &str = "Asset rate is zero.";

pub static ERROR_NO_COLLATERAL: &str = "Position has no collateral to seize.";

pub static ERROR_NO_LOAN: &str = "Position has no loan to repay.";

pub static ERROR_LIQUIDATION_BONUS_TOO_LOW: &str = "Liquidation bonus must be positive.";

pub static ERROR_RESERVE_FACTOR_TOO_HIGH: &str =
    "Liquidation reserve factor must be below its scale.";

pub static ERROR_INVALID_ATTESTATION: &str = "Oracle attestation is malformed.";

pub static ERROR_ORACLE_NOT_FOUND: &str = "Oracle output not found.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("decode error: {context}")]
    Decode {
        context: String,
        #[source]
        source: Option<CellError>,
    },

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("prices are outdated: {accepted} of {required} oracles accepted")]
    Quorum {
        accepted: usize,
        required: usize,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error("proof construction failed: {0}")]
    Proof(#[source] CellError),

    #[error("{0}")]
    Value(&'static str),

    #[error("asset {0} is not loaded")]
    AssetNotLoaded(String),

    #[error("price fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Cell(#[from] CellError),
}

impl Error {
    pub fn decode(context: impl Into<String>, source: CellError) -> Self {
        Error::Decode {
            context: context.into(),
            source: Some(source),
        }
    }

    pub fn missing(context: impl Into<String>) -> Self {
        Error::Decode {
            context: context.into(),
            source: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
