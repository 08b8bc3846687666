#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Once;

use common_cell::{from_boc_hex, CellRef, Dictionary};
use common_structs::{AssetId, Config};
use controller::HealthService;
use liquidity_layer::{AssetStore, MarketSnapshot};
use num_bigint::BigInt;

// Master contract dictionaries captured on mainnet.
pub const ASSETS_DATA_BOC: &[&str] = &[
    "b5ee9c7241020b0100028300020120010202012003040201200506020120070800cabf895668e908644f3032",
    "2b997de8faaafc21f05aa52f8982f042dac1fe0b4d09d0000000ba85859fd4000000bc4aa2bec00007de36d8",
    "2a0c2b00008ca20ad5529a671f51b90005dd9121feaa18000000000000000000000000000000000000000000",
    "000000020120090a00cabf8a9006bd3fb03d355daeeff93b24be90afaa6e3ca0073ff5720f8a852c93327800",
    "0000c319365650000000ca80c5df17000018070112552e00000c648b3cc706671f52a20000099c5958d4bd00",
    "000000000000000000000000000000000000000006b6c000c9bf748433fcbcc1ac75e54798fb9cdfd8d368b8",
    "d6ae3092f4c291cf8465590f7b140000017b4e135da2000001825d6af8ea00191e1744cd410e000950b177ac",
    "e73ece3ea1b6000cdbbf61a9a52c00000000000000000000000000000000000000000000000100c9bf6627c5",
    "eaf750e15e689006a18f136130fa2b6874a62e57f9c529bc43cfae49ce000001753bedb04e00000178963de0",
    "82000f1b122b25f50c0005a70bd5bccffece3ea5440007923142840bf2000000000000000000000000000000",
    "00000000000000000100c9bf47b22d8d0a21004209a3eeb54d9c61d63c8ef5dbc1a701ddc4311c1cacb03f8c",
    "000001580ac5064400000361ca46bd9e00000000b462d90c000000008911a282ce3ea438000000029a968de0",
    "00000000000000000000000000000000000000000000000100c9bf670f2d046c32f2b194958abd36b7c71cd1",
    "18ec635f0990ceac863e9350f1de6600000159b144454c00000190922227de00000008f6f1847400000005a8",
    "45a7b0ce3ea43800000006bb1b06540000000000000000000000000000000000000000000000017909da03",
];

pub const ASSETS_CONFIG_BOC: &[&str] = &[
    "b5ee9c72410210010003d30002012001020201200304020120050602012007080184bf895668e908644f3032",
    "2b997de8faaafc21f05aa52f8982f042dac1fe0b4d09d04e9fed5bfb7d79a2078297995f3d85b4badeac8c0d",
    "9eab82d3751bf9bc92754a09090201200a0b0184bf8a9006bd3fb03d355daeeff93b24be90afaa6e3ca0073f",
    "f5720f8a852c933278ff90c4242be03df8242edc274e9d0503676ffc6d8f19ae1d4fbed137859a71bd060c01",
    "83bf748433fcbcc1ac75e54798fb9cdfd8d368b8d6ae3092f4c291cf8465590f7b14348433fcbcc1ac75e547",
    "98fb9cdfd8d368b8d6ae3092f4c291cf8465590f7b14130d0183bf6627c5eaf750e15e689006a18f136130fa",
    "2b6874a62e57f9c529bc43cfae49cf221696bd2c37ea80895e9e3b7139b528b03ded985958ba1a038fbdcaae",
    "773886130e00d419641bbc2bc000000000000001d80000000000000320000000000005f37000000000000000",
    "000000000000000000000000d18c2e280000000000000f4240000000000016e3600016345785d8a00007d000",
    "c80000000000000000000000000000000000000000000000000183bf47b22d8d0a21004209a3eeb54d9c61d6",
    "3c8ef5dbc1a701ddc4311c1cacb03f8d083b317c116bed042ed86b6c6fcdd323a9c29c18dce490f5da574311",
    "698ead7e0d0f0183bf670f2d046c32f2b194958abd36b7c71cd118ec635f0990ceac863e9350f1de66e0d8ba",
    "516e25e406ead68c7185ad5dc5b8dd976d0252ee40c6c8971b6d7085c20d0f00d41ce81f4029680000000000",
    "0000000000000000001c6b000000000001731800000000000000000000000000000000000000ba43b7400000",
    "000000002dc6c000000000000027100000221b262dd80007d000b40000000000000000000000000000000000",
    "0000000000000000d41c201e782a3000000000000001d80000000000000320000000000005f3700000000000",
    "0000000000000000000000000000d18c2e280000000000000f4240000000000016e360000000000000000007",
    "d000c800000000000000000000000000000000000000000000000000d419c81c202b5c00000000000001d800",
    "00000000000320000000000005f37000000000000000000000000000000000000000d18c2e28000000000000",
    "0f4240000000000016e3600016345785d8a00007d000c8000000000000000000000000000000000000000000",
    "00000000d400001d4c2bc000000000000000000000000000001c6b0000000000017318000000000000000000",
    "00000000000000000000ba43b7400000000000002dc6c0000000000000271000000000000f4240271000c800",
    "0000000000000000000000000000000000000000000000b0d7b158",
];

// Persistent data of a mainnet user contract.
pub const USER_DATA_BOC: &[&str] = &[
    "b5ee9c7201020f010001e9000299106801795a8cd48ff4acaea0e52aca4a79a0e79449b0ad00893212184201",
    "b2b9013f3d001941e9e16573eb68fd8a8269bb81b52585c98f2e626ed8e86dfd0037622afce2e00000000000",
    "00001201020201200304020120090a02012005060053bfe548035e9fd81e9aaed777fc9d925f4857d5371e50",
    "039ffab907c5429649993c7ffffb739c3d3cdac002012007080052bf895668e908644f30322b997de8faaafc",
    "21f05aa52f8982f042dac1fe0b4d09d00001c3b91faab2470051bf748433fcbcc1ac75e54798fb9cdfd8d368",
    "b8d6ae3092f4c291cf8465590f7b14000cdb460a300f750051bf6627c5eaf750e15e689006a18f136130fa2b",
    "6874a62e57f9c529bc43cfae49ce000af9207f047f710201200b0c0063bfe548035e9fd81e9aaed777fc9d92",
    "5f4857d5371e50039ffab907c5429649993c00000000000000000000000000000000400201200d0e0062bf89",
    "5668e908644f30322b997de8faaafc21f05aa52f8982f042dac1fe0b4d09d000000000000000000000000000",
    "0000000061bf748433fcbcc1ac75e54798fb9cdfd8d368b8d6ae3092f4c291cf8465590f7b14000000000000",
    "000000000000000000010061bf6627c5eaf750e15e689006a18f136130fa2b6874a62e57f9c529bc43cfae49",
    "ce00000000000000000000000000000001",
];

static TRACING: Once = Once::new();

/// Routes events to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn id(name: &str) -> AssetId {
    AssetId::from_name(name)
}

pub fn ton() -> AssetId {
    id("TON")
}

pub fn usdt() -> AssetId {
    id("USDT")
}

fn dict(parts: &[&str]) -> Dictionary {
    Dictionary::from_root(from_boc_hex(&parts.concat()).unwrap(), 256)
}

pub fn user_data() -> CellRef {
    from_boc_hex(&USER_DATA_BOC.concat()).unwrap()
}

pub fn loaded_store() -> AssetStore {
    init_tracing();
    let store = AssetStore::from_config(&Config::main_mainnet());
    store
        .decode(Some(&dict(ASSETS_DATA_BOC)), Some(&dict(ASSETS_CONFIG_BOC)))
        .unwrap();
    store
}

pub fn market() -> MarketSnapshot {
    loaded_store().snapshot()
}

pub fn service() -> HealthService {
    HealthService::from_config(&Config::main_mainnet())
}

/// Prices in price-scale units, TON at 4.575 USD.
pub fn calm_prices() -> BTreeMap<AssetId, BigInt> {
    [
        ("TON", 4_575_000_000u64),
        ("jUSDT", 998_760_000),
        ("jUSDC", 999_908_900),
        ("stTON", 5_030_456_829),
        ("tsTON", 5_003_470_805),
        ("USDT", 998_760_000),
    ]
    .into_iter()
    .map(|(name, price)| (id(name), BigInt::from(price)))
    .collect()
}

/// Same as [`calm_prices`] with TON and its derivatives rallying.
pub fn rally_prices() -> BTreeMap<AssetId, BigInt> {
    let mut prices = calm_prices();
    prices.insert(ton(), BigInt::from(4_975_000_000u64));
    prices.insert(id("stTON"), BigInt::from(5_230_456_829u64));
    prices.insert(id("tsTON"), BigInt::from(5_193_470_805u64));
    prices
}

pub fn principals(entries: &[(&str, i64)]) -> BTreeMap<AssetId, BigInt> {
    entries
        .iter()
        .map(|(name, principal)| (id(name), BigInt::from(*principal)))
        .collect()
}

/// TON supplier with an empty USDT slot.
pub fn ton_supplier() -> BTreeMap<AssetId, BigInt> {
    principals(&[("TON", 1_350_457_583_812), ("USDT", 0)])
}

/// TON supplier carrying a USDT loan.
pub fn ton_borrower() -> BTreeMap<AssetId, BigInt> {
    principals(&[("TON", 1_350_457_583_812), ("USDT", -4_519_473_935)])
}
