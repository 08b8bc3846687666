use std::{sync::Arc, thread};

use common_cell::{from_boc_hex, CellBuilder, Dictionary};
use common_errors::Error;
use common_structs::{AssetId, AssetManager, Config};
use liquidity_layer::AssetStore;
use num_bigint::{BigInt, BigUint};

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

fn dict(parts: &[&str]) -> Dictionary {
    Dictionary::from_root(from_boc_hex(&parts.concat()).unwrap(), 256)
}

fn loaded_store() -> AssetStore {
    let store = AssetStore::from_config(&Config::main_mainnet());
    store
        .decode(Some(&dict(ASSETS_DATA_BOC)), Some(&dict(ASSETS_CONFIG_BOC)))
        .unwrap();
    store
}

fn id(name: &str) -> AssetId {
    AssetId::from_name(name)
}

#[test]
fn decodes_config_fields_in_order() {
    let store = loaded_store();

    let ton = store.config(&id("TON")).unwrap();
    assert_eq!(ton.oracle, id("TON").as_biguint().clone());
    assert_eq!(ton.decimals, 9);
    assert_eq!(ton.collateral_factor, 7_200);
    assert_eq!(ton.liquidation_threshold, 7_800);
    assert_eq!(ton.liquidation_bonus, 10_800);
    assert_eq!(ton.base_borrow_rate, 472);
    assert_eq!(ton.borrow_rate_slope_low, 800);
    assert_eq!(ton.borrow_rate_slope_high, 390_000);
    assert_eq!(ton.target_utilization, 900_000_000_000);
    assert_eq!(ton.origination_fee, 1_000_000);
    assert_eq!(ton.dust, 1_500_000);
    assert_eq!(ton.max_total_supply, 0);
    assert_eq!(ton.reserve_factor, 2_000);
    assert_eq!(ton.liquidation_reserve_factor, 200);
    assert_eq!(ton.scale(), BigInt::from(1_000_000_000));

    let usdt = store.config(&id("USDT")).unwrap();
    assert_eq!(usdt.decimals, 6);
    assert_eq!(usdt.collateral_factor, 7_400);
    assert_eq!(usdt.liquidation_reserve_factor, 180);
    assert_eq!(usdt.max_total_supply, 37_500_000_000_000);

    let jusdc = store.config(&id("jUSDC")).unwrap();
    assert_eq!(jusdc.collateral_factor, 0);
    assert_eq!(jusdc.reserve_factor, 10_000);
}

#[test]
fn decodes_data_fields_in_order() {
    let store = loaded_store();

    let ton = store.data(&id("TON")).unwrap();
    assert_eq!(ton.s_rate, BigInt::from(814_551_248_593u64));
    assert_eq!(ton.b_rate, BigInt::from(829_712_333_941u64));
    assert_eq!(ton.total_supply, BigInt::from(3_534_979_852_574_855u64));
    assert_eq!(ton.total_borrow, BigInt::from(1_310_998_968_824_735u64));
    assert_eq!(ton.last_accrual, 1_730_105_563);
    assert_eq!(ton.balance, BigInt::from(1_809_657_372_136_086u64));

    let usdt = store.data(&id("USDT")).unwrap();
    assert_eq!(usdt.awaited_supply, BigInt::from(440_000));
    assert_eq!(usdt.tracking_supply_index, BigInt::from(0));
}

#[test]
fn unknown_asset_has_no_state() {
    let store = loaded_store();

    assert!(store.config(&id("TON_STORM")).is_none());
    assert!(store.data(&id("TON_STORM")).is_none());
    assert!(matches!(
        store.project_forward(&id("TON_STORM"), 1_730_200_000),
        Err(Error::AssetNotLoaded(_))
    ));
}

#[test]
fn partial_decode_keeps_the_other_map() {
    let store = AssetStore::from_config(&Config::main_mainnet());
    assert!(!store.is_loaded());

    store.decode(None, Some(&dict(ASSETS_CONFIG_BOC))).unwrap();
    assert!(store.config(&id("TON")).is_some());
    assert!(store.data(&id("TON")).is_none());

    store.decode(Some(&dict(ASSETS_DATA_BOC)), None).unwrap();
    assert!(store.is_loaded());
    assert!(store.config(&id("TON")).is_some());
}

#[test]
fn failed_decode_leaves_prior_state() {
    let store = loaded_store();
    let before = store.data(&id("TON"));

    // a dictionary that lacks every configured asset
    let mut value = CellBuilder::new();
    value.store_uint(1, 64).unwrap();
    let foreign = Dictionary::from_entries(256, [(BigUint::from(42u8), value)]).unwrap();

    let err = store.decode(Some(&foreign), Some(&dict(ASSETS_CONFIG_BOC)));
    assert!(matches!(err, Err(Error::Decode { .. })));
    assert_eq!(store.data(&id("TON")), before);
}

#[test]
fn truncated_value_is_a_decode_error() {
    let store = AssetStore::new([id("TON")]);

    let mut value = CellBuilder::new();
    value.store_uint(1, 64).unwrap();
    let short = Dictionary::from_entries(256, [(id("TON").as_biguint().clone(), value)]).unwrap();

    assert!(matches!(store.decode(Some(&short), None), Err(Error::Decode { .. })));
    assert!(store.data(&id("TON")).is_none());
}

#[test]
fn projection_matches_contract_math() {
    let store = loaded_store();
    let ton = store.data(&id("TON")).unwrap();

    let projection = store.project_forward(&id("TON"), ton.last_accrual + 3_600).unwrap();
    assert_eq!(projection.data.s_rate, BigInt::from(814_551_931_838u64));
    assert_eq!(projection.data.b_rate, BigInt::from(829_714_645_851u64));
    assert_eq!(projection.supply_interest, BigInt::from(233));
    assert_eq!(projection.borrow_interest, BigInt::from(774));

    // projection never writes back
    assert_eq!(store.data(&id("TON")).unwrap(), ton);

    let same = store.project_forward(&id("TON"), ton.last_accrual).unwrap();
    assert_eq!(same.data, ton);
}

#[test]
fn bulk_projection_returns_a_new_store() {
    let store = loaded_store();
    let projected = store.update_current_rates(60).unwrap();

    assert_eq!(projected.assets(), store.assets());
    for asset in store.assets() {
        let before = store.data(&asset).unwrap();
        let after = projected.data(&asset).unwrap();
        assert!(after.last_accrual > before.last_accrual);
        assert!(after.s_rate >= before.s_rate);
        assert!(after.b_rate >= before.b_rate);
        assert_eq!(projected.config(&asset), store.config(&asset));
    }
}

#[test]
fn bulk_projection_needs_loaded_state() {
    let store = AssetStore::from_config(&Config::main_mainnet());
    assert!(store.update_current_rates(0).is_err());
}

#[test]
fn snapshot_is_stable_across_reloads() {
    let store = loaded_store();
    let snapshot = store.snapshot();

    store.decode(Some(&dict(ASSETS_DATA_BOC)), None).unwrap();
    assert_eq!(snapshot.assets().len(), 6);
    assert!(snapshot.data(&id("TON")).is_some());
}

#[test]
fn readers_never_observe_partial_state() {
    let store = Arc::new(AssetStore::from_config(&Config::main_mainnet()));

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                store
                    .decode(Some(&dict(ASSETS_DATA_BOC)), Some(&dict(ASSETS_CONFIG_BOC)))
                    .unwrap();
            }
        })
    };

    for _ in 0..200 {
        let snapshot = store.snapshot();
        let loaded = store
            .assets()
            .iter()
            .filter(|asset| snapshot.data(asset).is_some())
            .count();
        assert!(loaded == 0 || loaded == 6);
    }
    writer.join().unwrap();
}
