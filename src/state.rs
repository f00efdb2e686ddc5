//! Free/rented/all-managed bookkeeping shared by the sync and async pools

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::callback::CallbackDispatcher;
use crate::config::{PoolConfiguration, UnknownReturnPolicy};
use crate::errors::{PoolError, PoolResult};
use crate::factory::ResourceLifecycle;
use crate::handle::Handle;
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::placement::Placement;

/// The pool state machine.
///
/// Invariants kept by every method:
/// - a handle is never in both `available` and `rented`
/// - `available ∪ rented ⊆ managed`
/// - handles leave `managed` only through `clear`
pub(crate) struct PoolState<R> {
    available: Vec<Handle<R>>,
    rented: HashSet<Handle<R>>,
    managed: HashSet<Handle<R>>,
    disposed: bool,
    unknown_return: UnknownReturnPolicy,
    callbacks: CallbackDispatcher,
    metrics: MetricsTracker,
}

impl<R: Send + Sync + 'static> PoolState<R> {
    pub fn new(config: &PoolConfiguration) -> Self {
        Self {
            available: Vec::with_capacity(config.initial_capacity),
            rented: HashSet::with_capacity(config.initial_capacity),
            managed: HashSet::with_capacity(config.initial_capacity),
            disposed: false,
            unknown_return: config.unknown_return,
            callbacks: config.callbacks.clone(),
            metrics: MetricsTracker::new(),
        }
    }

    pub fn ensure_live(&self) -> PoolResult<()> {
        if self.disposed {
            return Err(PoolError::Disposed);
        }
        Ok(())
    }

    /// Pop the most recently returned instance and hand it out again
    pub fn reuse<L>(&mut self, lifecycle: &L, placement: &Placement) -> Option<Handle<R>>
    where
        L: ResourceLifecycle<Resource = R>,
    {
        let handle = self.available.pop()?;
        lifecycle.activate(&handle, placement);
        self.rented.insert(handle.clone());
        self.metrics.total_rented += 1;
        self.metrics.total_reused += 1;
        trace!(available = self.available.len(), "Reusing pooled instance");

        self.callbacks.notify_rent::<R>(&handle);
        Some(handle)
    }

    /// Register a freshly created instance as rented
    pub fn admit_rented(&mut self, resource: R) -> Handle<R> {
        let handle = Handle::new(resource);
        self.managed.insert(handle.clone());
        self.rented.insert(handle.clone());
        self.metrics.total_created += 1;
        self.metrics.total_rented += 1;
        debug!(managed = self.managed.len(), "Created new pooled instance on rent");

        self.callbacks.notify_rent::<R>(&handle);
        handle
    }

    /// Register a freshly created instance straight into the free set
    pub fn admit_available<L>(&mut self, lifecycle: &L, resource: R)
    where
        L: ResourceLifecycle<Resource = R>,
    {
        let handle = Handle::new(resource);
        self.managed.insert(handle.clone());
        self.metrics.total_created += 1;
        lifecycle.deactivate(&handle);
        self.callbacks.notify_return::<R>(&handle);
        self.available.push(handle);
    }

    pub fn give_back<L>(&mut self, lifecycle: &L, handle: Handle<R>) -> PoolResult<()>
    where
        L: ResourceLifecycle<Resource = R>,
    {
        self.ensure_live()?;

        if !self.rented.remove(&handle) {
            return match self.unknown_return {
                UnknownReturnPolicy::Reject => Err(PoolError::invalid_argument(
                    "handle is not currently rented from this pool",
                )),
                UnknownReturnPolicy::Ignore => {
                    debug!("Ignoring return of a handle that is not rented");
                    Ok(())
                }
            };
        }

        lifecycle.deactivate(&handle);
        self.callbacks.notify_return::<R>(&handle);
        self.available.push(handle);
        self.metrics.total_returned += 1;
        trace!(available = self.available.len(), "Returned instance to pool");
        Ok(())
    }

    /// Destroy every instance, free ones first, then the rented ones
    pub fn clear<L>(&mut self, lifecycle: &L) -> PoolResult<()>
    where
        L: ResourceLifecycle<Resource = R>,
    {
        self.ensure_live()?;
        debug!(
            available = self.available.len(),
            rented = self.rented.len(),
            "Clearing pool"
        );

        while let Some(handle) = self.available.pop() {
            self.managed.remove(&handle);
            lifecycle.destroy(&handle)?;
            self.metrics.total_destroyed += 1;
        }

        let rented: Vec<Handle<R>> = self.rented.iter().cloned().collect();
        for handle in rented {
            self.rented.remove(&handle);
            self.managed.remove(&handle);
            lifecycle.destroy(&handle)?;
            self.metrics.total_destroyed += 1;
        }

        self.rented.clear();
        self.managed.clear();
        Ok(())
    }

    /// Tear down whatever a failed warmup left behind.
    ///
    /// The warmup error is what the caller sees; a destroy failure here is
    /// only logged.
    pub fn discard_after_failed_warmup<L>(&mut self, lifecycle: &L)
    where
        L: ResourceLifecycle<Resource = R>,
    {
        if let Err(e) = self.clear(lifecycle) {
            warn!(error = %e, "Failed to destroy instances left by an aborted warmup");
        }
    }

    pub fn dispose<L>(&mut self, lifecycle: &L) -> PoolResult<()>
    where
        L: ResourceLifecycle<Resource = R>,
    {
        self.clear(lifecycle)?;
        self.disposed = true;
        debug!("Pool disposed");
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn count(&self) -> usize {
        self.available.len()
    }

    pub fn all_objects(&self) -> Vec<Handle<R>> {
        self.managed.iter().cloned().collect()
    }

    pub fn rented_objects(&self) -> Vec<Handle<R>> {
        self.rented.iter().cloned().collect()
    }

    /// Free instances in the order `rent` would hand them out
    pub fn available_objects(&self) -> Vec<Handle<R>> {
        self.available.iter().rev().cloned().collect()
    }

    pub fn get_metrics(&self) -> PoolMetrics {
        self.metrics.get_metrics(
            self.rented.len(),
            self.available.len(),
            self.managed.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingFactory;

    fn state() -> PoolState<crate::testing::Probe> {
        PoolState::new(&PoolConfiguration::default())
    }

    #[test]
    fn test_reuse_empty_returns_none() {
        let factory = CountingFactory::new();
        let mut state = state();
        assert!(state.reuse(&factory, &Placement::none()).is_none());
        assert_eq!(state.get_metrics().total_rented, 0);
    }

    #[test]
    fn test_sets_stay_disjoint() {
        let factory = CountingFactory::new();
        let mut state = state();

        let a = state.admit_rented(factory.make());
        state.admit_available(&factory, factory.make());
        state.give_back(&factory, a.clone()).unwrap();

        let available = state.available_objects();
        let rented = state.rented_objects();
        assert_eq!(available.len(), 2);
        assert!(rented.is_empty());
        assert_eq!(available[0], a);

        let b = state.reuse(&factory, &Placement::none()).unwrap();
        assert_eq!(b, a);
        assert!(!state.available_objects().contains(&b));
        assert!(state.rented_objects().contains(&b));
        assert_eq!(state.all_objects().len(), 2);
    }

    #[test]
    fn test_clear_failure_keeps_popped_handles_out() {
        let factory = CountingFactory::new().fail_destroy_after(1);
        let mut state = state();
        state.admit_available(&factory, factory.make());
        state.admit_available(&factory, factory.make());
        state.admit_available(&factory, factory.make());

        let result = state.clear(&factory);
        assert!(matches!(result, Err(PoolError::FactoryFailed(_))));

        // First destroy succeeded, second failed; both handles left the free set
        assert_eq!(state.count(), 1);
        assert_eq!(state.all_objects().len(), 1);
        assert_eq!(factory.destroyed(), 1);
    }

    #[test]
    fn test_failed_dispose_does_not_set_flag() {
        let factory = CountingFactory::new().fail_destroy_after(0);
        let mut state = state();
        state.admit_available(&factory, factory.make());

        assert!(state.dispose(&factory).is_err());
        assert!(!state.is_disposed());
    }
}
