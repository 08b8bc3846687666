#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Once;
use std::time::Duration;

use common_cell::{CellBuilder, CellRef, Dictionary};
use common_errors::{Error, Result};
use common_structs::{AssetDescriptor, AssetId, Config, OracleNft};
use num_bigint::BigUint;
use price_aggregator::{PriceProvider, RawData};

pub const FAST: Duration = Duration::from_millis(10);
pub const SLOW: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Routes aggregator events to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn ton() -> AssetId {
    AssetId::from_name("TON")
}

pub fn usdt() -> AssetId {
    AssetId::from_name("USDT")
}

pub fn oracle_address(id: u32) -> String {
    format!("oracle-{id}")
}

/// Four oracles over TON and USDT.
pub fn test_config(minimal_oracles: usize) -> Config {
    init_tracing();
    Config {
        oracles: (0..4)
            .map(|id| OracleNft {
                id,
                address: oracle_address(id),
            })
            .collect(),
        minimal_oracles,
        assets: vec![AssetDescriptor::new("TON", 9), AssetDescriptor::new("USDT", 6)],
        ..Config::main_mainnet()
    }
}

pub fn prices_dict(prices: &[(AssetId, u64)]) -> CellRef {
    let entries = prices.iter().map(|(asset, price)| {
        let mut value = CellBuilder::new();
        value.store_coins(&BigUint::from(*price)).unwrap();
        (asset.as_biguint().clone(), value)
    });
    Dictionary::from_entries(256, entries)
        .unwrap()
        .root()
        .cloned()
        .unwrap()
}

pub fn raw_data(timestamp: i64, prices: &[(AssetId, u64)]) -> RawData {
    RawData {
        prices: prices
            .iter()
            .map(|(asset, price)| (asset.clone(), BigUint::from(*price)))
            .collect::<BTreeMap<_, _>>(),
        prices_dict: prices_dict(prices),
        signature: vec![timestamp as u8; 64],
        public_key: vec![7; 32],
        timestamp,
    }
}

pub fn ton_usdt(timestamp: i64, ton_price: u64, usdt_price: u64) -> RawData {
    raw_data(timestamp, &[(ton(), ton_price), (usdt(), usdt_price)])
}

/// Provider answering from a fixed table keyed by `(endpoint, oracle address)`,
/// each answer after its own delay.
#[derive(Default)]
pub struct MockProvider {
    answers: HashMap<(String, String), (Duration, std::result::Result<RawData, String>)>,
}

impl MockProvider {
    pub fn answer(mut self, endpoint: &str, oracle: u32, delay: Duration, data: RawData) -> Self {
        self.answers.insert(
            (endpoint.to_string(), oracle_address(oracle)),
            (delay, Ok(data)),
        );
        self
    }

    pub fn fail(mut self, endpoint: &str, oracle: u32, delay: Duration, reason: &str) -> Self {
        self.answers.insert(
            (endpoint.to_string(), oracle_address(oracle)),
            (delay, Err(reason.to_string())),
        );
        self
    }
}

impl PriceProvider for MockProvider {
    async fn get_raw_data(&self, base_url: &str, address: &str) -> Result<RawData> {
        match self.answers.get(&(base_url.to_string(), address.to_string())) {
            Some((delay, answer)) => {
                tokio::time::sleep(*delay).await;
                answer.clone().map_err(Error::Transport)
            }
            None => Err(Error::Transport(format!("{address} is unknown at {base_url}"))),
        }
    }
}
