use common_errors::{Error, Result, ERROR_ZERO_PRICE};
use common_math::SharedMathModule;
use common_structs::{AssetId, AssetManager, PriceSource};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{HealthService, UserBalancer};

impl HealthService {
    /// Largest amount of `asset`, in asset units, the position can withdraw
    /// without dropping below its collateral requirements.
    ///
    /// # Arguments
    /// - `user`: Position to evaluate.
    /// - `assets`: Asset configuration and accrual state of one generation.
    /// - `prices`: Asset prices in price-scale units.
    /// - `asset`: Asset to withdraw.
    ///
    /// # Returns
    /// - Without a supplied balance (dust counts as none): the borrow capacity
    ///   converted into `asset` units, which may be negative.
    /// - Without any debt, or for an asset with no collateral factor: the whole
    ///   balance.
    /// - Otherwise the capacity released by `asset`'s collateral factor, less
    ///   half of the asset's dust in balance units, within `[0, balance]`.
    pub fn max_withdraw_amount<U, A, P>(
        &self,
        user: &U,
        assets: &A,
        prices: &P,
        asset: &AssetId,
    ) -> Result<BigInt>
    where
        U: UserBalancer,
        A: AssetManager,
        P: PriceSource,
    {
        let calculator = self.calculator(assets, prices);
        let config = calculator.config(asset)?;
        let data = calculator.data(asset)?;
        let price = calculator.price(asset)?;
        let scale = config.scale();

        let balance = user.balance(asset, data, Some(config));
        if !balance.is_positive() {
            let available = self.available_to_borrow(user, assets, prices)?;
            return self
                .mul_div(&available, &scale, &price)
                .ok_or(Error::Value(ERROR_ZERO_PRICE));
        }

        if user.has_no_debt() || config.collateral_factor == 0 {
            return Ok(balance);
        }

        let available = self.available_to_borrow(user, assets, prices)?;
        let released_value = self
            .mul_div_u64(
                &available,
                self.params().asset_coefficient_scale,
                u64::from(config.collateral_factor),
            )
            .unwrap_or_default();
        let released = self
            .mul_div(&released_value, &scale, &price)
            .ok_or(Error::Value(ERROR_ZERO_PRICE))?;
        let dust_margin = self
            .mul_div_u64(&data.s_rate, config.dust, self.params().factor_scale)
            .unwrap_or_default()
            / 2;

        Ok(self.get_min(balance, self.get_max(BigInt::zero(), released - dust_margin)))
    }
}
