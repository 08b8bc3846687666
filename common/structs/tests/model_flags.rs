use common_structs::{AssetId, AssetValue, Health};
use num_bigint::BigInt;

fn health(supply: i64, debt: i64, limit: i64) -> Health {
    Health {
        total_supply: BigInt::from(supply),
        total_debt: BigInt::from(debt),
        total_limit: BigInt::from(limit),
        greatest_collateral: None,
        greatest_loan: None,
    }
}

#[test]
fn liquidatable_is_strict() {
    assert!(!health(100, 80, 80).is_liquidatable());
    assert!(health(100, 81, 80).is_liquidatable());
    assert!(!health(0, 0, 0).is_liquidatable());
}

#[test]
fn bad_debt_uses_the_bonus() {
    // supply * 10_000 against debt * 10_800
    assert!(!health(100, 92, 78).is_bad_debt(10_800, 10_000));
    assert!(health(100, 93, 78).is_bad_debt(10_800, 10_000));
}

#[test]
fn factor_without_limit_is_one() {
    assert_eq!(health(0, 0, 0).factor(), 1.0);
    assert_eq!(health(0, 50, 0).factor(), 1.0);
}

#[test]
fn factor_is_clamped() {
    assert_eq!(health(100, 0, 80).factor(), 1.0);
    assert_eq!(health(100, 40, 80).factor(), 0.5);
    assert_eq!(health(100, 160, 80).factor(), 0.0);
}

#[test]
fn asset_id_text_forms() {
    let ton = AssetId::from_name("TON");
    assert_eq!(
        ton.to_string(),
        "11876925370864614464799087627157805050745321306404563164673853337929163193738"
    );
    assert_eq!(ton.to_string().parse::<AssetId>().unwrap(), ton);

    let hex = format!("0x{}", ton.as_biguint().to_str_radix(16));
    assert_eq!(hex.parse::<AssetId>().unwrap(), ton);
    assert!("TON".parse::<AssetId>().is_err());

    let value = AssetValue {
        asset: ton.clone(),
        value: BigInt::from(1),
    };
    assert_eq!(value.asset, ton);
}
