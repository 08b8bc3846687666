use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use common_errors::{Error, Result};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{parse_attestation, PriceProvider, RawData};

/// Serves attestations from one aggregated feed `{oracle address: feature data}`
/// that a background task keeps refreshed.
#[derive(Default)]
pub struct SingleEndpointProvider {
    client: reqwest::Client,
    list: RwLock<HashMap<String, String>>,
}

impl SingleEndpointProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        SingleEndpointProvider {
            client,
            list: RwLock::default(),
        }
    }

    /// Swaps the whole cached feed.
    pub fn replace(&self, list: HashMap<String, String>) {
        *self.list.write() = list;
    }

    pub fn len(&self) -> usize {
        self.list.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    /// Fetches the feed once and swaps it in.
    pub async fn refresh(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| Error::Transport(format!("{url}: {err}")))?;
        let status = response.status();
        let list: HashMap<String, String> = response
            .json()
            .await
            .map_err(|err| Error::Transport(format!("{url} answered {status}: {err}")))?;

        debug!(url, entries = list.len(), "price feed refreshed");
        self.replace(list);
        Ok(())
    }

    /// Refreshes the feed every `interval`, starting immediately, until
    /// `shutdown` resolves. A failed refresh ends the loop with its error.
    pub async fn run<S>(&self, url: &str, interval: Duration, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(url, "price feed poller stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            info!(url, "price feed poller stopped");
                            return Ok(());
                        }
                        refreshed = self.refresh(url) => refreshed?,
                    }
                }
            }
        }
    }
}

impl PriceProvider for SingleEndpointProvider {
    async fn get_raw_data(&self, _base_url: &str, address: &str) -> Result<RawData> {
        let feature = self
            .list
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("data of {address} not initialized yet")))?;
        parse_attestation(&feature)
    }
}
