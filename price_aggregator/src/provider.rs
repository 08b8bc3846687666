use std::collections::BTreeMap;
use std::future::Future;

use common_cell::{from_boc, CellRef, CellResult, CellSlice, Dictionary};
use common_constants::{
    ASSET_ID_BITS, COINS_MAX_BYTES, DEFAULT_PRICE_ENDPOINT, NFT_OUTPUT_PATH, OUTPUT_PATH,
};
use common_errors::{Error, Result, ERROR_INVALID_ATTESTATION, ERROR_ORACLE_NOT_FOUND};
use common_structs::AssetId;
use num_bigint::BigUint;
use serde::Deserialize;
use tracing::debug;

use crate::RawData;

/// Source of oracle attestations.
///
/// `base_url` names the feed endpoint (empty means the provider's default) and
/// `address` the oracle's publishing identity on that feed.
pub trait PriceProvider: Send + Sync + 'static {
    fn get_raw_data(
        &self,
        base_url: &str,
        address: &str,
    ) -> impl Future<Output = Result<RawData>> + Send;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Attestation {
    packed_prices: String,
    signature: String,
    public_key: String,
    timestamp: i64,
}

fn decode_hex(field: &str, raw: &str) -> Result<Vec<u8>> {
    hex::decode(raw).map_err(|err| Error::Malformed(format!("{field} is not hex: {err}")))
}

fn decode_prices(dict_root: &CellRef) -> CellResult<BTreeMap<AssetId, BigUint>> {
    let dict = Dictionary::from_root(dict_root.clone(), ASSET_ID_BITS);
    let mut prices = BTreeMap::new();
    for (key, mut value) in dict.load_all()? {
        prices.insert(AssetId::new(key), value.load_var_uint(COINS_MAX_BYTES)?);
    }
    Ok(prices)
}

/// Parses one feed entry: `0x`-prefixed hex of a JSON document whose
/// `packedPrices` is a BOC holding a reference to the price dictionary.
pub fn parse_attestation(feature: &str) -> Result<RawData> {
    if feature.len() % 2 == 1 {
        return Err(Error::Malformed(ERROR_INVALID_ATTESTATION.to_string()));
    }
    let body = feature.get(2..).unwrap_or_default();
    let json = decode_hex("attestation", body)?;
    let attestation: Attestation = serde_json::from_slice(&json)
        .map_err(|err| Error::Malformed(format!("attestation is not valid json: {err}")))?;

    let packed = decode_hex("packedPrices", &attestation.packed_prices)?;
    let signature = decode_hex("signature", &attestation.signature)?;
    let public_key = decode_hex("publicKey", &attestation.public_key)?;

    let root = from_boc(&packed).map_err(|err| Error::decode("packed prices", err))?;
    let prices_dict = CellSlice::new(root)
        .load_ref()
        .map_err(|err| Error::decode("price dictionary reference", err))?;

    let prices = decode_prices(&prices_dict).unwrap_or_else(|err| {
        debug!(%err, "price dictionary is unreadable");
        BTreeMap::new()
    });

    Ok(RawData {
        prices,
        prices_dict,
        signature,
        public_key,
        timestamp: attestation.timestamp,
    })
}

#[derive(Deserialize)]
struct OutputIds {
    items: Vec<String>,
}

#[derive(Deserialize)]
struct Feature {
    data: String,
}

#[derive(Deserialize)]
struct Output {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct OutputResponse {
    output: Output,
}

/// Reads attestations from the NFT outputs of the oracles on a ledger indexer.
#[derive(Clone, Default)]
pub struct HttpProvider {
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        HttpProvider { client }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::Transport(format!("{url}: {err}")))?;
        let status = response.status();
        response
            .json()
            .await
            .map_err(|err| Error::Transport(format!("{url} answered {status}: {err}")))
    }

    async fn output_id(&self, base_url: &str, address: &str) -> Result<String> {
        let ids: OutputIds = self
            .get_json(format!("{base_url}/{NFT_OUTPUT_PATH}/{address}"))
            .await?;
        ids.items
            .into_iter()
            .next()
            .ok_or_else(|| Error::Transport(format!("{ERROR_ORACLE_NOT_FOUND} nft {address}")))
    }

    async fn feature(&self, base_url: &str, output_id: &str) -> Result<String> {
        let response: OutputResponse = self
            .get_json(format!("{base_url}/{OUTPUT_PATH}/{output_id}"))
            .await?;
        response
            .output
            .features
            .into_iter()
            .next()
            .map(|feature| feature.data)
            .ok_or_else(|| Error::Transport(format!("no features in output {output_id}")))
    }
}

impl PriceProvider for HttpProvider {
    async fn get_raw_data(&self, base_url: &str, address: &str) -> Result<RawData> {
        let base_url = match base_url.trim_end_matches('/') {
            "" => DEFAULT_PRICE_ENDPOINT,
            trimmed => trimmed,
        };
        let output_id = self.output_id(base_url, address).await?;
        let feature = self.feature(base_url, &output_id).await?;
        parse_attestation(&feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_length_is_rejected() {
        let err = parse_attestation("0x7").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn non_json_is_rejected() {
        let err = parse_attestation(&format!("0x{}", hex::encode("not json"))).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
