use common_errors::{
    Error, Result, ERROR_ASSET_CONFIG_NOT_FOUND, ERROR_ASSET_DATA_NOT_FOUND, ERROR_PRICE_NOT_FOUND,
    ERROR_ZERO_PRICE, ERROR_ZERO_RATE,
};
use common_math::SharedMathModule;
use common_structs::{AssetConfig, AssetData, AssetId, AssetManager, MasterParams, PriceSource};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Conversions between the three units a position is expressed in.
///
/// - **principal**: index-free accounting unit stored on the user contract
/// - **balance**: asset units, `principal * index / factor_scale`
/// - **value**: price-scale units, `balance * price / 10^decimals`
///
/// Zero always maps to zero without touching the asset state, and the sign of
/// the input picks the supply or the borrow index.
pub struct UnitCalculator<'a, A, P> {
    assets: &'a A,
    prices: &'a P,
    params: &'a MasterParams,
}

impl<A, P> SharedMathModule for UnitCalculator<'_, A, P> {}

impl<'a, A: AssetManager, P: PriceSource> UnitCalculator<'a, A, P> {
    pub fn new(assets: &'a A, prices: &'a P, params: &'a MasterParams) -> Self {
        UnitCalculator {
            assets,
            prices,
            params,
        }
    }

    pub fn data(&self, asset: &AssetId) -> Result<&'a AssetData> {
        self.assets
            .data(asset)
            .ok_or(Error::Value(ERROR_ASSET_DATA_NOT_FOUND))
    }

    pub fn config(&self, asset: &AssetId) -> Result<&'a AssetConfig> {
        self.assets
            .config(asset)
            .ok_or(Error::Value(ERROR_ASSET_CONFIG_NOT_FOUND))
    }

    pub fn price(&self, asset: &AssetId) -> Result<BigInt> {
        self.prices
            .price(asset)
            .ok_or(Error::Value(ERROR_PRICE_NOT_FOUND))
    }

    fn index_for<'d>(&self, amount: &BigInt, data: &'d AssetData) -> &'d BigInt {
        if amount.is_positive() {
            &data.s_rate
        } else {
            &data.b_rate
        }
    }

    pub fn balance_from_principal(&self, principal: &BigInt, asset: &AssetId) -> Result<BigInt> {
        if principal.is_zero() {
            return Ok(BigInt::zero());
        }
        let data = self.data(asset)?;
        let factor_scale = BigInt::from(self.params.factor_scale);
        self.mul_div(principal, self.index_for(principal, data), &factor_scale)
            .ok_or(Error::Value(ERROR_ZERO_RATE))
    }

    pub fn principal_from_balance(&self, balance: &BigInt, asset: &AssetId) -> Result<BigInt> {
        if balance.is_zero() {
            return Ok(BigInt::zero());
        }
        let data = self.data(asset)?;
        let factor_scale = BigInt::from(self.params.factor_scale);
        self.mul_div(balance, &factor_scale, self.index_for(balance, data))
            .ok_or(Error::Value(ERROR_ZERO_RATE))
    }

    pub fn value_from_balance(&self, balance: &BigInt, asset: &AssetId) -> Result<BigInt> {
        if balance.is_zero() {
            return Ok(BigInt::zero());
        }
        let price = self.price(asset)?;
        let scale = self.config(asset)?.scale();
        self.mul_div(balance, &price, &scale)
            .ok_or(Error::Value(ERROR_ASSET_CONFIG_NOT_FOUND))
    }

    pub fn balance_from_value(&self, value: &BigInt, asset: &AssetId) -> Result<BigInt> {
        if value.is_zero() {
            return Ok(BigInt::zero());
        }
        let price = self.price(asset)?;
        let scale = self.config(asset)?.scale();
        self.mul_div(value, &scale, &price)
            .ok_or(Error::Value(ERROR_ZERO_PRICE))
    }

    pub fn value_from_principal(&self, principal: &BigInt, asset: &AssetId) -> Result<BigInt> {
        let balance = self.balance_from_principal(principal, asset)?;
        self.value_from_balance(&balance, asset)
    }

    pub fn principal_from_value(&self, value: &BigInt, asset: &AssetId) -> Result<BigInt> {
        let balance = self.balance_from_value(value, asset)?;
        self.principal_from_balance(&balance, asset)
    }
}
