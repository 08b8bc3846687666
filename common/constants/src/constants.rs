/// Fixed-point scale shared by interest indices, utilization and rate math.
pub const FACTOR_SCALE: u64 = 1_000_000_000_000; // 1e12

pub const ASSET_COEFFICIENT_SCALE: u64 = 10_000; // 100%
pub const ASSET_PRICE_SCALE: u64 = 1_000_000_000; // 1 USD
pub const ASSET_RESERVE_FACTOR_SCALE: u64 = 10_000;
pub const ASSET_LIQUIDATION_RESERVE_FACTOR_SCALE: u64 = 10_000;
pub const ASSET_ORIGINATION_FEE_SCALE: u64 = 1_000_000_000;
pub const ASSET_LIQUIDATION_THRESHOLD_SCALE: u64 = 10_000;
pub const ASSET_LIQUIDATION_BONUS_SCALE: u64 = 10_000;
pub const ASSET_SRATE_SCALE: u64 = 1_000_000_000_000;
pub const ASSET_BRATE_SCALE: u64 = 1_000_000_000_000;

/// Below this collateral value a liquidator may seize the whole position
/// instead of half of it.
pub const COLLATERAL_WORTH_THRESHOLD: u64 = 100 * ASSET_PRICE_SCALE;

/// Attestations older than this are ignored by the aggregator.
pub const ORACLE_DATA_TTL_SECONDS: u64 = 120;
pub const ORACLE_SIGNATURE_BYTES: usize = 64; // ed25519

pub const MAINNET_MINIMAL_ORACLES: usize = 3;
pub const TESTNET_MINIMAL_ORACLES: usize = 3;

pub const DEFAULT_PRICE_ENDPOINT: &str = "https://api.stardust-mainnet.iotaledger.net";
pub const NFT_OUTPUT_PATH: &str = "api/indexer/v1/outputs/nft";
pub const OUTPUT_PATH: &str = "api/core/v2/outputs";

// Bit widths of the on-chain layouts.
pub const ASSET_ID_BITS: usize = 256;
pub const ORACLE_ID_BITS: usize = 32;
pub const TIMESTAMP_BITS: usize = 32;
pub const PRINCIPAL_BITS: usize = 64;
pub const COINS_MAX_BYTES: usize = 16;

pub const MAIN_MASTER_MAINNET: &str = "EQC8rUZqR_pWV1BylWUlPNBzyiTYVoBEmQkMIQDZXICfnuRr";
pub const MAIN_MASTER_TESTNET: &str = "EQDLsg3w-iBj26Gww7neYoJAxiT2t77Zo8ro56b0yuHsPp3C";
pub const LP_MASTER_MAINNET: &str = "EQBIlZX2URWkXCSg3QF2MJZU-wC5XkBoLww-hdWk2G37Jc6N";

pub const MAIN_MASTER_VERSION: u32 = 6;
pub const TESTNET_MASTER_VERSION: u32 = 1;
pub const LP_MASTER_VERSION: u32 = 3;

/// Oracle NFT addresses, indexed by oracle id.
pub const ORACLE_NFT_ADDRESSES: [&str; 4] = [
    "0xd3a8c0b9fd44fd25a49289c631e3ac45689281f2f8cf0744400b4c65bed38e5d",
    "0x2c21cabdaa89739de16bde7bc44e86401fac334a3c7e55305fe5e7563043e191",
    "0x2eb258ce7b5d02466ab8a178ad8b0ba6ffa7b58ef21de3dc3b6dd359a1e16af0",
    "0xf9a0769954b4430bca95149fb3d876deb7799d8f74852e0ad4ccc5778ce68b52",
];

pub const TON_TICKER: &str = "TON";
pub const USDT_TICKER: &str = "USDT";
pub const JUSDT_TICKER: &str = "jUSDT";
pub const JUSDC_TICKER: &str = "jUSDC";
pub const STTON_TICKER: &str = "stTON";
pub const TSTON_TICKER: &str = "tsTON";
pub const TONUSDT_DEDUST_TICKER: &str = "TONUSDT_DEDUST";
pub const TON_STORM_TICKER: &str = "TON_STORM";
pub const USDT_STORM_TICKER: &str = "USDT_STORM";

pub const TON_DECIMALS: u8 = 9;
pub const USD_STABLE_DECIMALS: u8 = 6;
pub const LP_TOKEN_DECIMALS: u8 = 9;
