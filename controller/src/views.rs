use common_errors::{Error, Result, ERROR_ASSET_DATA_NOT_FOUND};
use common_math::SharedMathModule;
use common_structs::{AssetId, AssetManager, AssetValue, Health, PriceSource};
use liquidity_layer::AssetStore;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{HealthService, UserBalancer};

impl HealthService {
    /// Aggregates every asset of the position into a [`Health`] snapshot.
    ///
    /// # Arguments
    /// - `user`: Position to evaluate.
    /// - `assets`: Asset configuration and accrual state of one generation.
    /// - `prices`: Asset prices in price-scale units.
    ///
    /// # Returns
    /// - Supply, debt and liquidation limit totals, plus the largest collateral
    ///   and the largest loan. Balances are taken without dust filtering.
    pub fn calculate_health<U, A, P>(&self, user: &U, assets: &A, prices: &P) -> Result<Health>
    where
        U: UserBalancer,
        A: AssetManager,
        P: PriceSource,
    {
        let calculator = self.calculator(assets, prices);
        let mut health = Health::default();

        for asset in assets.assets() {
            if user.principal(&asset).is_zero() {
                continue;
            }
            let data = assets
                .data(&asset)
                .ok_or(Error::Value(ERROR_ASSET_DATA_NOT_FOUND))?;
            let balance = user.balance(&asset, data, None);

            if balance.is_positive() {
                let worth = calculator.value_from_balance(&balance, &asset)?;
                let config = calculator.config(&asset)?;
                let limit = self
                    .mul_div_u64(
                        &worth,
                        u64::from(config.liquidation_threshold),
                        self.params.asset_liquidation_threshold_scale,
                    )
                    .unwrap_or_default();

                health.total_supply += &worth;
                health.total_limit += limit;
                track_greatest(&mut health.greatest_collateral, &asset, worth);
            } else if balance.is_negative() {
                let worth = calculator.value_from_balance(&-balance, &asset)?;

                health.total_debt += &worth;
                track_greatest(&mut health.greatest_loan, &asset, worth);
            }
        }

        Ok(health)
    }

    /// Same as [`Self::calculate_health`] over the store's current generation.
    pub fn evaluate<U: UserBalancer, P: PriceSource>(
        &self,
        user: &U,
        store: &AssetStore,
        prices: &P,
    ) -> Result<Health> {
        self.calculate_health(user, &store.snapshot(), prices)
    }

    /// `(total supply value, total debt value)` of the position.
    pub fn aggregated_balances<U, A, P>(
        &self,
        user: &U,
        assets: &A,
        prices: &P,
    ) -> Result<(BigInt, BigInt)>
    where
        U: UserBalancer,
        A: AssetManager,
        P: PriceSource,
    {
        let health = self.calculate_health(user, assets, prices)?;
        Ok((health.total_supply, health.total_debt))
    }

    /// Health factor the position would have after adding `change` to the
    /// principal of one asset. `None` evaluates the position as is.
    pub fn predict_health_factor<U, A, P>(
        &self,
        user: &U,
        assets: &A,
        prices: &P,
        change: Option<(&AssetId, &BigInt)>,
    ) -> Result<f64>
    where
        U: UserBalancer,
        A: AssetManager,
        P: PriceSource,
    {
        let health = match change {
            Some((asset, delta)) if !delta.is_zero() => {
                let changed = user.with_changed_principal(asset, delta);
                self.calculate_health(&changed, assets, prices)?
            }
            _ => self.calculate_health(user, assets, prices)?,
        };
        Ok(health.factor())
    }
}

/// Keeps the first asset with the strictly largest value.
fn track_greatest(greatest: &mut Option<AssetValue>, asset: &AssetId, value: BigInt) {
    let larger = match greatest {
        Some(current) => value > current.value,
        None => value.is_positive(),
    };
    if larger {
        *greatest = Some(AssetValue {
            asset: asset.clone(),
            value,
        });
    }
}
