pub mod helpers;
pub mod positions;
pub mod views;

pub use common_errors::*;
pub use helpers::math::UnitCalculator;
pub use positions::account::{UserBalancer, UserPosition};
pub use positions::liquidation::{LiquidationData, LiquidationOutcome};

use common_events::EventsModule;
use common_math::SharedMathModule;
use common_structs::{AssetManager, Config, MasterParams, PriceSource};

/// Solvency math over a borrower position.
///
/// **Scope**: Evaluates one position against one asset snapshot and one price
/// set. Every call is independent; the service holds only the master scales.
///
/// **Goal**: Reproduce the master contract's integer arithmetic exactly so the
/// amounts it computes are accepted on chain.
#[derive(Debug, Clone, Default)]
pub struct HealthService {
    params: MasterParams,
}

impl SharedMathModule for HealthService {}

impl EventsModule for HealthService {}

impl HealthService {
    pub fn new(params: MasterParams) -> Self {
        HealthService { params }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.master_params.clone())
    }

    pub fn params(&self) -> &MasterParams {
        &self.params
    }

    pub fn calculator<'a, A: AssetManager, P: PriceSource>(
        &'a self,
        assets: &'a A,
        prices: &'a P,
    ) -> UnitCalculator<'a, A, P> {
        UnitCalculator::new(assets, prices, &self.params)
    }
}
