//! Synchronous instance pool

use std::collections::HashMap;

use tracing::debug;

use crate::config::PoolConfiguration;
use crate::errors::PoolResult;
use crate::factory::{FnFactory, Factory};
use crate::handle::Handle;
use crate::metrics::{MetricsExporter, PoolMetrics};
use crate::placement::Placement;
use crate::state::PoolState;

/// Pool that recycles instances created by a synchronous [`Factory`].
///
/// Instances are created on demand when the free set is empty and are only
/// destroyed by [`clear`](Self::clear) or [`dispose`](Self::dispose).
///
/// # Examples
///
/// ```
/// use instance_pool::{ObjectPool, TemplateFactory};
///
/// let mut pool = ObjectPool::new(TemplateFactory::new("goblin"));
///
/// let a = pool.rent().unwrap();
/// pool.return_object(a.clone()).unwrap();
/// assert!(!a.is_active());
///
/// let b = pool.rent().unwrap();
/// assert_eq!(a, b);
/// assert!(b.is_active());
/// ```
pub struct ObjectPool<F: Factory> {
    factory: F,
    state: PoolState<F::Resource>,
}

impl<F: Factory> ObjectPool<F> {
    /// Create an empty pool with the default configuration.
    ///
    /// The default configuration has no callback receivers registered, so
    /// resources get no `on_rent`/`on_return` hooks even if they implement
    /// [`PoolCallbackReceiver`](crate::PoolCallbackReceiver). Use
    /// [`with_config`](Self::with_config) with
    /// [`PoolConfiguration::with_callbacks`] to enable them.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            state: PoolState::new(&PoolConfiguration::default()),
        }
    }

    /// Create a pool and prewarm it when the configuration asks for it.
    ///
    /// If warmup fails, the instances it already created are destroyed before
    /// the warmup error is returned.
    pub fn with_config(factory: F, config: PoolConfiguration) -> PoolResult<Self> {
        let mut pool = Self {
            factory,
            state: PoolState::new(&config),
        };
        if let Some(count) = config.warmup_size
            && let Err(e) = pool.prewarm(count)
        {
            pool.state.discard_after_failed_warmup(&pool.factory);
            return Err(e);
        }
        Ok(pool)
    }

    /// Rent an instance, leaving its placement as it was
    pub fn rent(&mut self) -> PoolResult<Handle<F::Resource>> {
        self.rent_with(&Placement::none())
    }

    /// Rent an instance at `placement`.
    ///
    /// Reuses the most recently returned instance when one is free, otherwise
    /// asks the factory for a new one.
    pub fn rent_with(&mut self, placement: &Placement) -> PoolResult<Handle<F::Resource>> {
        self.state.ensure_live()?;

        if let Some(handle) = self.state.reuse(&self.factory, placement) {
            return Ok(handle);
        }

        let resource = self.factory.create(placement)?;
        Ok(self.state.admit_rented(resource))
    }

    /// Hand a rented instance back to the free set
    pub fn return_object(&mut self, handle: Handle<F::Resource>) -> PoolResult<()> {
        self.state.give_back(&self.factory, handle)
    }

    /// Create `count` instances up front and park them in the free set
    pub fn prewarm(&mut self, count: usize) -> PoolResult<()> {
        self.state.ensure_live()?;
        debug!(count, "Prewarming pool");

        for _ in 0..count {
            let resource = self.factory.create(&Placement::none())?;
            self.state.admit_available(&self.factory, resource);
        }
        Ok(())
    }

    /// Destroy every instance, rented ones included. The pool stays usable.
    pub fn clear(&mut self) -> PoolResult<()> {
        self.state.clear(&self.factory)
    }

    /// Clear the pool and refuse every later operation
    pub fn dispose(&mut self) -> PoolResult<()> {
        self.state.dispose(&self.factory)
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

impl<C, T> ObjectPool<FnFactory<C>>
where
    C: Fn(&Placement) -> T + Send + Sync,
    T: Send + Sync + 'static,
{
    /// Create a pool whose instances come from a closure
    pub fn from_fn(create_fn: C) -> Self {
        Self::new(FnFactory::new(create_fn))
    }
}
