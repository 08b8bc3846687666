use std::{fmt, str::FromStr};

use crate::CellError;

/// Standard internal address: workchain plus 256-bit account hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StdAddress {
    pub workchain: i8,
    pub hash: [u8; 32],
}

impl fmt::Display for StdAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

/// Parses the raw `workchain:hex` form.
impl FromStr for StdAddress {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (workchain, hash) = s
            .split_once(':')
            .ok_or(CellError::InvalidAddress("expected workchain:hash"))?;
        let workchain = workchain
            .parse::<i8>()
            .map_err(|_| CellError::InvalidAddress("bad workchain"))?;
        let raw = hex::decode(hash).map_err(|_| CellError::InvalidAddress("bad hash"))?;
        let hash: [u8; 32] = raw
            .try_into()
            .map_err(|_| CellError::InvalidAddress("hash must be 32 bytes"))?;
        Ok(StdAddress { workchain, hash })
    }
}
