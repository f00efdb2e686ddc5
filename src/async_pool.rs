//! Instance pool with suspending, cancellable creation

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::factory::AsyncFactory;
use crate::handle::Handle;
use crate::metrics::{MetricsExporter, PoolMetrics};
use crate::placement::Placement;
use crate::state::PoolState;

/// Pool that recycles instances created by an [`AsyncFactory`].
///
/// Only creation suspends. Reusing a free instance, returning, clearing and
/// disposing all complete without awaiting. Cancelling the token passed to
/// [`rent_async`](Self::rent_async) or [`prewarm_async`](Self::prewarm_async)
/// abandons the creation in flight; instances already registered stay put.
///
/// # Examples
///
/// ```
/// use instance_pool::{
///     AssetLoader, AsyncAssetLoader, AsyncObjectPool, KeyedLoadFactory, Placement, PoolResult,
/// };
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
///
/// struct Loader;
///
/// impl AssetLoader for Loader {
///     type Asset = String;
///
///     fn release_instance(&self, _asset: &String) -> PoolResult<()> {
///         Ok(())
///     }
/// }
///
/// #[async_trait]
/// impl AsyncAssetLoader for Loader {
///     async fn instantiate(&self, key: &str, _placement: &Placement) -> PoolResult<String> {
///         Ok(format!("instance of {key}"))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let factory = KeyedLoadFactory::new(Loader, "prefabs/orc").unwrap();
/// let mut pool = AsyncObjectPool::new(factory);
/// let cancel = CancellationToken::new();
///
/// let orc = pool.rent_async(&cancel).await.unwrap();
/// assert_eq!(orc.value(), "instance of prefabs/orc");
///
/// pool.return_object(orc.clone()).unwrap();
/// assert_eq!(pool.rent_async(&cancel).await.unwrap(), orc);
/// # }
/// ```
pub struct AsyncObjectPool<F: AsyncFactory> {
    factory: F,
    state: PoolState<F::Resource>,
}

impl<F: AsyncFactory> AsyncObjectPool<F> {
    /// Create an empty pool with the default configuration.
    ///
    /// No callback receivers are registered; see
    /// [`ObjectPool::new`](crate::ObjectPool::new).
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            state: PoolState::new(&PoolConfiguration::default()),
        }
    }

    /// Create a pool and prewarm it when the configuration asks for it.
    ///
    /// If warmup is cancelled or fails, the instances it already created are
    /// destroyed before the error is returned.
    pub async fn with_config(
        factory: F,
        config: PoolConfiguration,
        cancel: &CancellationToken,
    ) -> PoolResult<Self> {
        let mut pool = Self {
            factory,
            state: PoolState::new(&config),
        };
        if let Some(count) = config.warmup_size
            && let Err(e) = pool.prewarm_async(count, cancel).await
        {
            pool.state.discard_after_failed_warmup(&pool.factory);
            return Err(e);
        }
        Ok(pool)
    }

    /// Rent an instance, leaving its placement as it was
    pub async fn rent_async(
        &mut self,
        cancel: &CancellationToken,
    ) -> PoolResult<Handle<F::Resource>> {
        self.rent_async_with(&Placement::none(), cancel).await
    }

    /// Rent an instance at `placement`.
    ///
    /// A free instance is handed out immediately, whatever the state of
    /// `cancel`. Otherwise a new one is created; if `cancel` fires first the
    /// call fails with [`PoolError::Cancelled`] and the pool is unchanged.
    pub async fn rent_async_with(
        &mut self,
        placement: &Placement,
        cancel: &CancellationToken,
    ) -> PoolResult<Handle<F::Resource>> {
        self.state.ensure_live()?;

        if let Some(handle) = self.state.reuse(&self.factory, placement) {
            return Ok(handle);
        }

        let resource = self.create(placement, cancel).await?;
        Ok(self.state.admit_rented(resource))
    }

    /// Create `count` instances one at a time and park them in the free set.
    ///
    /// On cancellation the instances created so far remain in the pool.
    pub async fn prewarm_async(
        &mut self,
        count: usize,
        cancel: &CancellationToken,
    ) -> PoolResult<()> {
        self.state.ensure_live()?;
        debug!(count, "Prewarming pool");

        for _ in 0..count {
            let resource = self.create(&Placement::none(), cancel).await?;
            self.state.admit_available(&self.factory, resource);
        }
        Ok(())
    }

    /// Hand a rented instance back to the free set
    pub fn return_object(&mut self, handle: Handle<F::Resource>) -> PoolResult<()> {
        self.state.give_back(&self.factory, handle)
    }

    /// Destroy every instance, rented ones included. The pool stays usable.
    pub fn clear(&mut self) -> PoolResult<()> {
        self.state.clear(&self.factory)
    }

    /// Clear the pool and refuse every later operation
    pub fn dispose(&mut self) -> PoolResult<()> {
        self.state.dispose(&self.factory)
    }

    async fn create(
        &self,
        placement: &Placement,
        cancel: &CancellationToken,
    ) -> PoolResult<F::Resource> {
        if cancel.is_cancelled() {
            debug!("Creation skipped, already cancelled");
            return Err(PoolError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Creation cancelled in flight");
                Err(PoolError::Cancelled)
            }
            result = self.factory.create_async(placement) => result,
        }
    }

    /// Number of free instances
    pub fn count(&self) -> usize {
        self.state.count()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    /// Every instance created and not yet destroyed
    pub fn all_objects(&self) -> Vec<Handle<F::Resource>> {
        self.state.all_objects()
    }

    pub fn rented_objects(&self) -> Vec<Handle<F::Resource>> {
        self.state.rented_objects()
    }

    /// Free instances, next to be rented first
    pub fn available_objects(&self) -> Vec<Handle<F::Resource>> {
        self.state.available_objects()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        self.state.get_metrics()
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.get_metrics(), pool_name, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackDispatcher;
    use crate::testing::{CountingFactory, Probe};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    async fn probe_pool(factory: CountingFactory) -> AsyncObjectPool<CountingFactory> {
        let config = PoolConfiguration::new()
            .with_callbacks(CallbackDispatcher::new().with_receiver::<Probe>());
        AsyncObjectPool::with_config(factory, config, &CancellationToken::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_rent_return_rent_reuses_instance() {
        let mut pool = probe_pool(CountingFactory::new()).await;
        let cancel = CancellationToken::new();

        let a = pool.rent_async(&cancel).await.unwrap();
        assert_eq!(a.rents(), 1);
        pool.return_object(a.clone()).unwrap();
        assert_eq!(a.returns(), 1);
        assert!(!a.is_active());

        let b = pool.rent_async(&cancel).await.unwrap();
        assert_eq!(a, b);
        assert!(b.is_active());
        assert_eq!(pool.factory().created(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_creation_leaves_state_untouched() {
        let mut pool = probe_pool(CountingFactory::new()).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = pool.rent_async(&cancel).await.unwrap_err();
        assert_eq!(err, PoolError::Cancelled);
        assert!(pool.all_objects().is_empty());
        assert!(pool.rented_objects().is_empty());
        assert_eq!(pool.factory().created(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_during_creation_leaves_state_untouched() {
        let mut pool = probe_pool(CountingFactory::new().stall_after(0)).await;
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = pool.rent_async(&cancel).await.unwrap_err();
        assert_eq!(err, PoolError::Cancelled);
        assert!(pool.all_objects().is_empty());
        assert!(pool.rented_objects().is_empty());
        assert_eq!(pool.count(), 0);
    }

    #[tokio::test]
    async fn test_free_set_hit_ignores_cancellation() {
        let mut pool = probe_pool(CountingFactory::new()).await;
        let live = CancellationToken::new();
        pool.prewarm_async(1, &live).await.unwrap();

        let cancelled = CancellationToken::new();
        cancelled.cancel();

        let handle = pool.rent_async(&cancelled).await.unwrap();
        assert_eq!(pool.rented_objects(), vec![handle]);
        assert_eq!(pool.count(), 0);
    }

    #[tokio::test]
    async fn test_prewarm_cancelled_after_two_keeps_two() {
        let cancel = CancellationToken::new();
        let mut pool = probe_pool(CountingFactory::new().cancel_after(2, cancel.clone())).await;

        let err = pool.prewarm_async(3, &cancel).await.unwrap_err();
        assert_eq!(err, PoolError::Cancelled);

        assert_eq!(pool.count(), 2);
        assert_eq!(pool.all_objects().len(), 2);
        assert!(pool.rented_objects().is_empty());
        assert_eq!(pool.factory().created(), 2);
    }

    #[tokio::test]
    async fn test_prewarm_then_rent_does_not_create() {
        let mut pool = probe_pool(CountingFactory::new()).await;
        let cancel = CancellationToken::new();

        pool.prewarm_async(3, &cancel).await.unwrap();
        assert_eq!(pool.count(), 3);
        assert_eq!(pool.all_objects().len(), 3);

        let _a = pool.rent_async(&cancel).await.unwrap();
        assert_eq!(pool.factory().created(), 3);
        assert_eq!(pool.get_metrics().total_reused, 1);
    }

    #[tokio::test]
    async fn test_with_config_warmup() {
        let cancel = CancellationToken::new();
        let pool = AsyncObjectPool::with_config(
            CountingFactory::new(),
            PoolConfiguration::new().with_warmup(2),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(pool.count(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_warmup_destroys_created_instances() {
        let cancel = CancellationToken::new();
        let factory = CountingFactory::new().cancel_after(2, cancel.clone());
        let destroyed = factory.destroy_counter();

        let err = AsyncObjectPool::with_config(
            factory,
            PoolConfiguration::new().with_warmup(4),
            &cancel,
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err, PoolError::Cancelled);
        assert_eq!(destroyed.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_failed_warmup_destroys_created_instances() {
        let factory = CountingFactory::new().fail_create_after(3);
        let destroyed = factory.destroy_counter();

        let result = AsyncObjectPool::with_config(
            factory,
            PoolConfiguration::new().with_warmup(5),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(PoolError::FactoryFailed(_))));
        assert_eq!(destroyed.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_clear_and_dispose() {
        let mut pool = probe_pool(CountingFactory::new()).await;
        let cancel = CancellationToken::new();

        pool.prewarm_async(2, &cancel).await.unwrap();
        let rented = pool.rent_async(&cancel).await.unwrap();

        pool.clear().unwrap();
        assert!(pool.all_objects().is_empty());
        assert!(rented.is_destroyed());
        assert_eq!(pool.factory().destroyed(), 2);

        let fresh = pool.rent_async(&cancel).await.unwrap();
        assert!(!fresh.is_destroyed());

        pool.dispose().unwrap();
        assert!(pool.is_disposed());
        assert_eq!(pool.rent_async(&cancel).await.unwrap_err(), PoolError::Disposed);
        assert_eq!(pool.prewarm_async(1, &cancel).await.unwrap_err(), PoolError::Disposed);
        assert_eq!(pool.return_object(fresh).unwrap_err(), PoolError::Disposed);
        assert_eq!(pool.clear().unwrap_err(), PoolError::Disposed);
        assert_eq!(pool.dispose().unwrap_err(), PoolError::Disposed);
    }

    #[tokio::test]
    async fn test_factory_failure_propagates() {
        let mut pool = probe_pool(CountingFactory::new().fail_create_after(0)).await;
        let cancel = CancellationToken::new();

        let err = pool.rent_async(&cancel).await.unwrap_err();
        assert!(matches!(err, PoolError::FactoryFailed(_)));
        assert!(pool.all_objects().is_empty());
    }
}
