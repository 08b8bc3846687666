//! Quorum-checked price consensus over independently signed oracle feeds.
//!
//! Every configured oracle is fetched concurrently, stale or incomplete
//! attestations are dropped, the most recent quorum is kept and each asset's
//! median is packed together with a proof of every retained attestation.

pub mod median;
pub mod payload;
pub mod provider;
pub mod single_endpoint;
pub mod structs;
pub mod utils;

use std::future::Future;
use std::sync::Arc;

use common_constants::DEFAULT_PRICE_ENDPOINT;
use common_errors::{Error, Result};
use common_events::EventsModule;
use common_structs::{AssetDescriptor, AssetId, Config, OracleNft};
use futures::future;
use num_bigint::BigUint;
use tokio::task::JoinSet;

pub use provider::{parse_attestation, HttpProvider, PriceProvider};
pub use single_endpoint::SingleEndpointProvider;
pub use structs::*;

pub struct PriceAggregator<P> {
    provider: Arc<P>,
    oracles: Vec<OracleNft>,
    assets: Vec<AssetDescriptor>,
    minimal_oracles: usize,
}

impl<P> EventsModule for PriceAggregator<P> {}

impl<P: PriceProvider> PriceAggregator<P> {
    pub fn new(config: &Config, provider: P) -> Self {
        Self::with_shared_provider(config, Arc::new(provider))
    }

    /// Builds an aggregator over a provider that is also driven elsewhere,
    /// e.g. a [`SingleEndpointProvider`] refreshed by a background task.
    pub fn with_shared_provider(config: &Config, provider: Arc<P>) -> Self {
        PriceAggregator {
            provider,
            oracles: config.oracles.clone(),
            assets: config.assets.clone(),
            minimal_oracles: config.minimal_oracles,
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Runs one aggregation round against `endpoints`, the default feed when
    /// none is given.
    pub async fn aggregate(&self, endpoints: &[String]) -> Result<AggregatedPrices> {
        self.aggregate_until(endpoints, std::future::pending()).await
    }

    /// As [`Self::aggregate`], aborting every outstanding fetch once `cancel`
    /// resolves. Attestations already received still count toward the
    /// quorum; a round that falls short reports the cancellation as its cause.
    pub async fn aggregate_until<C>(&self, endpoints: &[String], cancel: C) -> Result<AggregatedPrices>
    where
        C: Future<Output = ()>,
    {
        let endpoints: Arc<[String]> = if endpoints.is_empty() {
            Arc::from(vec![DEFAULT_PRICE_ENDPOINT.to_string()])
        } else {
            Arc::from(endpoints.to_vec())
        };

        let mut tasks = JoinSet::new();
        for oracle in self.oracles.iter().cloned() {
            let provider = self.provider.clone();
            let endpoints = endpoints.clone();
            tasks.spawn(async move {
                let fetched = fetch_oracle(provider, &oracle, &endpoints).await;
                (oracle, fetched)
            });
        }

        let mut fetched = Vec::with_capacity(self.oracles.len());
        let mut last_error = None;
        tokio::pin!(cancel);
        loop {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    tasks.abort_all();
                    last_error = Some(Error::Cancelled);
                    break;
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((oracle, Ok(raw)))) => fetched.push(OracleData {
                        oracle_id: oracle.id,
                        raw,
                    }),
                    Some(Ok((_, Err(err)))) => last_error = Some(err),
                    Some(Err(join_err)) => {
                        last_error = Some(Error::Transport(join_err.to_string()))
                    }
                },
            }
        }

        self.settle(fetched, last_error, utils::unix_now())
    }

    /// Filters, selects and packs the attestations of one round as seen at
    /// `now`.
    pub fn settle(
        &self,
        fetched: Vec<OracleData>,
        last_error: Option<Error>,
        now: i64,
    ) -> Result<AggregatedPrices> {
        let accepted: Vec<OracleData> = fetched
            .into_iter()
            .filter(|data| match utils::verify(&data.raw, &self.assets, now) {
                Ok(()) => true,
                Err(reason) => {
                    self.oracle_rejected_event(data.oracle_id, data.raw.timestamp, reason);
                    false
                }
            })
            .collect();

        let required = self.minimal_oracles.max(1);
        if accepted.len() < required {
            return Err(Error::Quorum {
                accepted: accepted.len(),
                required,
                source: last_error.map(Box::new),
            });
        }

        let accepted_count = accepted.len();
        let retained = utils::select_most_recent(accepted, required);
        let min_timestamp = utils::min_timestamp(&retained);

        let medians = self.medians(&retained);
        let packed = payload::pack(&medians, &retained)?;

        self.new_round_event(accepted_count, retained.len(), min_timestamp);
        Ok(AggregatedPrices {
            prices: medians.into_iter().collect(),
            min_timestamp,
            packed,
        })
    }

    /// Per-asset medians in configured asset order.
    fn medians(&self, retained: &[OracleData]) -> Vec<(AssetId, BigUint)> {
        let mut medians = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            let mut samples: Vec<BigUint> = retained
                .iter()
                .filter_map(|data| data.raw.price(&asset.id).cloned())
                .collect();
            if let Some(median) = median::calculate(&mut samples) {
                self.asset_median_event(&asset.id, &median, samples.len());
                medians.push((asset.id.clone(), median));
            }
        }
        medians
    }
}

/// First successful attestation of `oracle` across `endpoints`; the remaining
/// requests are aborted. Fails with the last error when every endpoint fails.
async fn fetch_oracle<P: PriceProvider>(
    provider: Arc<P>,
    oracle: &OracleNft,
    endpoints: &Arc<[String]>,
) -> Result<RawData> {
    if let [endpoint] = &endpoints[..] {
        return provider
            .get_raw_data(endpoint, &oracle.address)
            .await
            .inspect_err(|err| fetch_failed(oracle, endpoint, err));
    }

    let racers = endpoints.iter().map(|endpoint| {
        let provider = provider.clone();
        Box::pin(async move {
            provider
                .get_raw_data(endpoint, &oracle.address)
                .await
                .inspect_err(|err| fetch_failed(oracle, endpoint, err))
        })
    });

    // The first answer wins and drops the slower requests.
    future::select_ok(racers)
        .await
        .map(|(raw, _)| raw)
}

/// Event sink for the spawned fetch tasks, which do not borrow the aggregator.
struct FetchEvents;

impl EventsModule for FetchEvents {}

fn fetch_failed(oracle: &OracleNft, endpoint: &str, err: &Error) {
    FetchEvents.oracle_fetch_failed_event(oracle.id, endpoint, err);
}
