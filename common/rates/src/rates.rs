use common_constants::{ASSET_RESERVE_FACTOR_SCALE, FACTOR_SCALE};
use common_math::SharedMathModule;
use common_structs::{AssetConfig, AssetData};
use num_bigint::BigInt;
use num_traits::Zero;

/// Result of projecting an asset's accrual state to a later timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualProjection {
    pub data: AssetData,
    /// Per-second supply interest used for the projection, scaled by 1e12.
    pub supply_interest: BigInt,
    /// Per-second borrow interest used for the projection, scaled by 1e12.
    pub borrow_interest: BigInt,
    pub utilization: BigInt,
}

/// The InterestRates module computes utilization, the kinked borrow curve and
/// the supply rate, and projects interest indices forward in time.
///
/// **Scope**: Off-chain mirror of the master contract's accrual, used to value
/// positions between on-chain updates.
///
/// **Goal**: Bit-exact agreement with the contract for the same inputs. All
/// divisions truncate toward zero.
pub trait InterestRates: SharedMathModule {
    fn factor_scale(&self) -> BigInt {
        BigInt::from(FACTOR_SCALE)
    }

    /// Calculates the share of supplied value that is currently borrowed.
    ///
    /// **Formula**:
    /// - `norm_supply = s_rate * total_supply / 1e12`
    /// - `norm_borrow = b_rate * total_borrow / 1e12`
    /// - `utilization = norm_borrow * 1e12 / norm_supply`, or `0` when nothing is supplied.
    ///
    /// # Returns
    /// - `BigInt`: utilization scaled by 1e12. May exceed 1e12 when the pool is over-borrowed.
    fn calc_utilization(&self, data: &AssetData) -> BigInt {
        let scale = self.factor_scale();
        let norm_supply = &data.s_rate * &data.total_supply / &scale;
        let norm_borrow = &data.b_rate * &data.total_borrow / &scale;

        self.mul_div(&norm_borrow, &scale, &norm_supply)
            .unwrap_or_else(BigInt::zero)
    }

    /// Calculates the per-second borrow interest for a utilization.
    ///
    /// **Formula**:
    /// - If `utilization <= target`: `base + slope_low * utilization / 1e12`.
    /// - Otherwise: `base + slope_low * target / 1e12 + slope_high * (utilization - target) / 1e12`.
    ///
    /// # Arguments
    /// - `utilization`: utilization scaled by 1e12.
    /// - `config`: asset risk parameters holding the curve.
    fn calc_borrow_rate(&self, utilization: &BigInt, config: &AssetConfig) -> BigInt {
        let scale = self.factor_scale();
        let base = BigInt::from(config.base_borrow_rate);
        let slope_low = BigInt::from(config.borrow_rate_slope_low);
        let target = BigInt::from(config.target_utilization);

        if *utilization <= target {
            return base + slope_low * utilization / scale;
        }

        let slope_high = BigInt::from(config.borrow_rate_slope_high);
        base + slope_low * &target / &scale + slope_high * (utilization - &target) / &scale
    }

    /// Calculates the per-second supply interest.
    ///
    /// **Formula**:
    /// - `borrow_rate * utilization / 1e12 * (reserve_scale - reserve_factor) / reserve_scale`.
    ///
    /// The reserve factor share of borrower interest goes to the protocol.
    fn calc_supply_rate(
        &self,
        borrow_rate: &BigInt,
        utilization: &BigInt,
        reserve_factor: u16,
    ) -> BigInt {
        let reserve_scale = BigInt::from(ASSET_RESERVE_FACTOR_SCALE);
        let suppliers_share = &reserve_scale - BigInt::from(reserve_factor);

        borrow_rate * utilization / self.factor_scale() * suppliers_share / reserve_scale
    }

    /// Projects the accrual state to `target_timestamp`.
    ///
    /// **Formula**:
    /// - `s_rate' = s_rate + s_rate * supply_interest * elapsed / 1e12`
    /// - `b_rate' = b_rate + b_rate * borrow_interest * elapsed / 1e12`
    ///
    /// Totals and balances are left as they are and `last_accrual` becomes the
    /// target. A target at or before the last accrual returns the snapshot
    /// unchanged with zero interests.
    fn simulate_update_indexes(
        &self,
        data: &AssetData,
        config: &AssetConfig,
        target_timestamp: u64,
    ) -> AccrualProjection {
        if target_timestamp <= data.last_accrual {
            return AccrualProjection {
                data: data.clone(),
                supply_interest: BigInt::zero(),
                borrow_interest: BigInt::zero(),
                utilization: BigInt::zero(),
            };
        }

        let scale = self.factor_scale();
        let elapsed = BigInt::from(target_timestamp - data.last_accrual);

        let utilization = self.calc_utilization(data);
        let borrow_interest = self.calc_borrow_rate(&utilization, config);
        let supply_interest =
            self.calc_supply_rate(&borrow_interest, &utilization, config.reserve_factor);

        let mut projected = data.clone();
        projected.s_rate = &data.s_rate + &data.s_rate * (&supply_interest * &elapsed) / &scale;
        projected.b_rate = &data.b_rate + &data.b_rate * (&borrow_interest * &elapsed) / &scale;
        projected.last_accrual = target_timestamp;

        AccrualProjection {
            data: projected,
            supply_interest,
            borrow_interest,
            utilization,
        }
    }
}

/// Stateless handle for callers that only need the rate model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateModel;

impl SharedMathModule for RateModel {}

impl InterestRates for RateModel {}
