use common_errors::{
    Error, Result, ERROR_LIQUIDATION_BONUS_TOO_LOW, ERROR_NO_COLLATERAL, ERROR_NO_LOAN,
    ERROR_RESERVE_FACTOR_TOO_HIGH,
};
use common_events::EventsModule;
use common_math::SharedMathModule;
use common_structs::{AssetId, AssetManager, Health, PriceSource};
use num_bigint::BigInt;

use crate::{HealthService, UserBalancer};

/// Liquidation plan for an undercollateralized position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidationData {
    pub health: Health,
    pub loan_asset: AssetId,
    pub collateral_asset: AssetId,
    /// Loan asset units the liquidator repays, reserve factor included.
    pub liquidation_amount: BigInt,
    /// Collateral asset units the liquidator receives, bonus included.
    pub collateral_amount: BigInt,
    pub liquidation_value: BigInt,
    pub collateral_value: BigInt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiquidationOutcome {
    NotLiquidatable(Health),
    Liquidatable(LiquidationData),
}

impl LiquidationOutcome {
    pub fn health(&self) -> &Health {
        match self {
            LiquidationOutcome::NotLiquidatable(health) => health,
            LiquidationOutcome::Liquidatable(data) => &data.health,
        }
    }

    pub fn data(&self) -> Option<&LiquidationData> {
        match self {
            LiquidationOutcome::NotLiquidatable(_) => None,
            LiquidationOutcome::Liquidatable(data) => Some(data),
        }
    }

    pub fn is_liquidatable(&self) -> bool {
        matches!(self, LiquidationOutcome::Liquidatable(_))
    }
}

impl HealthService {
    /// Plans the liquidation of the position's largest loan against its
    /// largest collateral.
    ///
    /// # Arguments
    /// - `user`: Position to evaluate.
    /// - `assets`: Asset configuration and accrual state of one generation.
    /// - `prices`: Asset prices in price-scale units.
    ///
    /// # Returns
    /// - `NotLiquidatable` with the health snapshot while the liquidation limit
    ///   covers the debt.
    /// - `Liquidatable` with the repay and seize amounts otherwise. Unless the
    ///   position is bad debt, at most half of the largest collateral is seized,
    ///   but never less than the collateral worth threshold.
    pub fn calculate_liquidation_data<U, A, P>(
        &self,
        user: &U,
        assets: &A,
        prices: &P,
    ) -> Result<LiquidationOutcome>
    where
        U: UserBalancer,
        A: AssetManager,
        P: PriceSource,
    {
        let health = self.calculate_health(user, assets, prices)?;
        if !health.is_liquidatable() {
            return Ok(LiquidationOutcome::NotLiquidatable(health));
        }

        let params = self.params();
        let calculator = self.calculator(assets, prices);
        let collateral = health
            .greatest_collateral
            .clone()
            .ok_or(Error::Value(ERROR_NO_COLLATERAL))?;
        let loan = health
            .greatest_loan
            .clone()
            .ok_or(Error::Value(ERROR_NO_LOAN))?;

        let collateral_config = calculator.config(&collateral.asset)?;
        let loan_config = calculator.config(&loan.asset)?;
        let liquidation_bonus = u64::from(collateral_config.liquidation_bonus);
        if liquidation_bonus == 0 {
            return Err(Error::Value(ERROR_LIQUIDATION_BONUS_TOO_LOW));
        }
        let reserve_factor = u64::from(loan_config.liquidation_reserve_factor);
        if reserve_factor >= params.asset_liquidation_reserve_factor_scale {
            return Err(Error::Value(ERROR_RESERVE_FACTOR_TOO_HIGH));
        }

        let mut allowed_collateral_value = collateral.value.clone();
        if !health.is_bad_debt(
            collateral_config.liquidation_bonus,
            params.asset_liquidation_bonus_scale,
        ) {
            let floor = self.get_max(
                &allowed_collateral_value / 2,
                BigInt::from(params.collateral_worth_threshold),
            );
            allowed_collateral_value = self.get_min(allowed_collateral_value, floor);
        }

        let liquidation_value = self.get_min(
            loan.value.clone(),
            self.mul_div_u64(
                &allowed_collateral_value,
                params.asset_liquidation_bonus_scale,
                liquidation_bonus,
            )
            .ok_or(Error::Value(ERROR_LIQUIDATION_BONUS_TOO_LOW))?,
        );

        let collateral_value = self
            .mul_div_u64(
                &liquidation_value,
                liquidation_bonus,
                params.asset_liquidation_bonus_scale,
            )
            .ok_or(Error::Value(ERROR_LIQUIDATION_BONUS_TOO_LOW))?;
        let collateral_amount = calculator.balance_from_value(&collateral_value, &collateral.asset)?;

        let repaid_value = self
            .mul_div_u64(
                &liquidation_value,
                params.asset_liquidation_reserve_factor_scale,
                params.asset_liquidation_reserve_factor_scale - reserve_factor,
            )
            .ok_or(Error::Value(ERROR_RESERVE_FACTOR_TOO_HIGH))?;
        let liquidation_amount = calculator.balance_from_value(&repaid_value, &loan.asset)?;

        self.liquidation_event(
            &loan.asset,
            &collateral.asset,
            &liquidation_amount,
            &collateral_amount,
        );

        Ok(LiquidationOutcome::Liquidatable(LiquidationData {
            health,
            loan_asset: loan.asset,
            collateral_asset: collateral.asset,
            liquidation_amount,
            collateral_amount,
            liquidation_value,
            collateral_value,
        }))
    }
}
