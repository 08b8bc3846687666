use common_errors::Result;
use common_math::SharedMathModule;
use common_structs::{AssetManager, PriceSource};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{HealthService, UserBalancer};

impl HealthService {
    /// Remaining borrow capacity of the position in price-scale units.
    ///
    /// **Formula**: `Σ collateral_value * collateral_factor / coefficient_scale - Σ debt_value`
    ///
    /// Negative when the debt already exceeds what the collateral factors allow.
    pub fn available_to_borrow<U, A, P>(&self, user: &U, assets: &A, prices: &P) -> Result<BigInt>
    where
        U: UserBalancer,
        A: AssetManager,
        P: PriceSource,
    {
        let calculator = self.calculator(assets, prices);
        let mut borrow_limit = BigInt::zero();
        let mut borrow_amount = BigInt::zero();

        for asset in assets.assets() {
            if user.principal(&asset).is_zero() {
                continue;
            }
            let balance = user.balance(&asset, calculator.data(&asset)?, None);

            if balance.is_negative() {
                borrow_amount += calculator.value_from_balance(&-balance, &asset)?;
            } else if balance.is_positive() {
                let worth = calculator.value_from_balance(&balance, &asset)?;
                let config = calculator.config(&asset)?;
                borrow_limit += self
                    .mul_div_u64(
                        &worth,
                        u64::from(config.collateral_factor),
                        self.params().asset_coefficient_scale,
                    )
                    .unwrap_or_default();
            }
        }

        Ok(borrow_limit - borrow_amount)
    }
}
