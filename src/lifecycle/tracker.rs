//! Caller-facing facade over resolution, waiting and amount display.

use alloy::primitives::TxHash;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::DataSource;
use crate::config::{EngineConfig, NetworkConfig, WaitConfig};
use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::resolver::StatusResolver;
use crate::lifecycle::retry::RetryPolicy;
use crate::lifecycle::state::LifecycleState;
use crate::lifecycle::wait::{Clock, Sleeper, TokioClock, TokioSleeper, WaitCoordinator};
use crate::operation::{AmountNormalizer, DisplayAmount, OperationKind, OperationRecord};

/// Tracks operations of any kind against one data source.
pub struct OperationTracker<D, C = TokioClock, S = TokioSleeper> {
    resolver: StatusResolver<D>,
    waiter: WaitCoordinator<C, S>,
    normalizer: AmountNormalizer,
    interval: Duration,
    timeout: Duration,
}

impl<D: DataSource> OperationTracker<D> {
    pub fn builder() -> OperationTrackerBuilder<D> {
        OperationTrackerBuilder::new()
    }
}

impl<D, C, S> OperationTracker<D, C, S>
where
    D: DataSource,
    C: Clock,
    S: Sleeper,
{
    /// Current lifecycle state of `record`.
    pub async fn resolve_status<K: OperationKind>(
        &self,
        record: &OperationRecord<K>,
    ) -> LifecycleResult<LifecycleState> {
        Ok(self.resolver.resolve(record.transaction_hash()).await?)
    }

    /// Wait until `record` reaches a terminal state of its kind.
    ///
    /// `None` falls back to the configured interval and timeout.
    pub async fn wait_for_terminal<K: OperationKind>(
        &self,
        record: &OperationRecord<K>,
        interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> LifecycleResult<LifecycleState> {
        self.wait_on(
            record.operation_id(),
            record.transaction_hash(),
            K::is_terminal,
            interval,
            timeout,
        )
        .await
    }

    /// Wait on a bare transaction hash.
    pub async fn wait_for_hash(
        &self,
        operation_id: &str,
        hash: TxHash,
        interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> LifecycleResult<LifecycleState> {
        self.wait_on(
            operation_id,
            Some(hash),
            LifecycleState::is_terminal,
            interval,
            timeout,
        )
        .await
    }

    /// Resolve a bare transaction hash once.
    pub async fn resolve_hash(&self, hash: TxHash) -> LifecycleResult<LifecycleState> {
        Ok(self.resolver.resolve(Some(hash)).await?)
    }

    /// Amount of `record` in display units.
    pub fn to_display_amount<K: OperationKind>(&self, record: &OperationRecord<K>) -> DisplayAmount {
        self.normalizer
            .to_display_units(record.network_id(), record.asset_id(), record.amount())
    }

    /// One-line summary of `record` with its freshly resolved status.
    pub async fn describe<K: OperationKind>(&self, record: &OperationRecord<K>) -> LifecycleResult<String> {
        let status = self.resolve_status(record).await?;
        Ok(record.summary_with_amount(&self.to_display_amount(record), status))
    }

    pub fn normalizer(&self) -> &AmountNormalizer {
        &self.normalizer
    }

    pub fn default_interval(&self) -> Duration {
        self.interval
    }

    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    async fn wait_on(
        &self,
        operation_id: &str,
        hash: Option<TxHash>,
        is_terminal: fn(LifecycleState) -> bool,
        interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> LifecycleResult<LifecycleState> {
        let resolver = &self.resolver;
        self.waiter
            .wait(
                operation_id,
                is_terminal,
                move || async move { resolver.resolve(hash).await.map_err(LifecycleError::from) },
                interval.unwrap_or(self.interval),
                timeout.unwrap_or(self.timeout),
            )
            .await
    }
}

/// Assembles an [`OperationTracker`]; the data source is mandatory.
pub struct OperationTrackerBuilder<D, C = TokioClock, S = TokioSleeper> {
    data_source: Option<Arc<D>>,
    wait: WaitConfig,
    networks: Option<Vec<NetworkConfig>>,
    clock: C,
    sleeper: S,
}

impl<D: DataSource> OperationTrackerBuilder<D> {
    pub fn new() -> Self {
        Self {
            data_source: None,
            wait: WaitConfig::default(),
            networks: None,
            clock: TokioClock,
            sleeper: TokioSleeper,
        }
    }
}

impl<D: DataSource> Default for OperationTrackerBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, C, S> OperationTrackerBuilder<D, C, S>
where
    D: DataSource,
    C: Clock,
    S: Sleeper,
{
    pub fn data_source(mut self, source: impl Into<Arc<D>>) -> Self {
        self.data_source = Some(source.into());
        self
    }

    pub fn wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn networks(mut self, networks: Vec<NetworkConfig>) -> Self {
        self.networks = Some(networks);
        self
    }

    /// Wait and network settings from a loaded configuration.
    pub fn config(self, config: &EngineConfig) -> Self {
        self.wait_config(config.wait.clone())
            .networks(config.networks.clone())
    }

    pub fn clock<C2: Clock>(self, clock: C2) -> OperationTrackerBuilder<D, C2, S> {
        OperationTrackerBuilder {
            data_source: self.data_source,
            wait: self.wait,
            networks: self.networks,
            clock,
            sleeper: self.sleeper,
        }
    }

    pub fn sleeper<S2: Sleeper>(self, sleeper: S2) -> OperationTrackerBuilder<D, C, S2> {
        OperationTrackerBuilder {
            data_source: self.data_source,
            wait: self.wait,
            networks: self.networks,
            clock: self.clock,
            sleeper,
        }
    }

    pub fn build(self) -> LifecycleResult<OperationTracker<D, C, S>> {
        let source = self
            .data_source
            .ok_or(LifecycleError::MissingDependency("data_source"))?;

        let normalizer = match &self.networks {
            Some(networks) => AmountNormalizer::new(networks),
            None => AmountNormalizer::default(),
        };
        let retry = RetryPolicy::from_config(&self.wait);

        tracing::debug!(
            interval_ms = self.wait.interval_ms,
            timeout_secs = self.wait.timeout_secs,
            max_error_retries = retry.max_retries,
            "Operation tracker built"
        );

        Ok(OperationTracker {
            resolver: StatusResolver::new(source),
            waiter: WaitCoordinator::with_time(self.clock, self.sleeper, retry),
            normalizer,
            interval: self.wait.interval(),
            timeout: self.wait.timeout(),
        })
    }
}
