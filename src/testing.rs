//! Fakes shared by the unit tests

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

use crate::callback::PoolCallbackReceiver;
use crate::errors::{PoolError, PoolResult};
use crate::factory::{AsyncFactory, Factory, ResourceLifecycle};
use crate::placement::Placement;

/// Resource that records what happened to it
#[derive(Debug)]
pub(crate) struct Probe {
    pub id: usize,
    pub active: AtomicBool,
    pub destroyed: AtomicBool,
    pub rents: AtomicUsize,
    pub returns: AtomicUsize,
}

impl Probe {
    fn new(id: usize) -> Self {
        Self {
            id,
            active: AtomicBool::new(true),
            destroyed: AtomicBool::new(false),
            rents: AtomicUsize::new(0),
            returns: AtomicUsize::new(0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Relaxed)
    }

    pub fn rents(&self) -> usize {
        self.rents.load(Ordering::Relaxed)
    }

    pub fn returns(&self) -> usize {
        self.returns.load(Ordering::Relaxed)
    }
}

impl PoolCallbackReceiver for Probe {
    fn on_rent(&self) {
        self.rents.fetch_add(1, Ordering::Relaxed);
    }

    fn on_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }
}

/// Sync and async factory producing [`Probe`]s with injectable failures
#[derive(Default)]
pub(crate) struct CountingFactory {
    created: AtomicUsize,
    destroyed: Arc<AtomicUsize>,
    fail_create_after: Option<usize>,
    fail_destroy_after: Option<usize>,
    stall_after: Option<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creations beyond the first `n` fail
    pub fn fail_create_after(mut self, n: usize) -> Self {
        self.fail_create_after = Some(n);
        self
    }

    /// Destructions beyond the first `n` fail
    pub fn fail_destroy_after(mut self, n: usize) -> Self {
        self.fail_destroy_after = Some(n);
        self
    }

    /// Async creations beyond the first `n` never resolve
    pub fn stall_after(mut self, n: usize) -> Self {
        self.stall_after = Some(n);
        self
    }

    /// Cancel `token` as soon as `n` creations have completed
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::Relaxed)
    }

    /// Destroy count that outlives the factory, for pools that are dropped
    pub fn destroy_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.destroyed)
    }

    pub fn make(&self) -> Probe {
        Probe::new(self.created.fetch_add(1, Ordering::Relaxed))
    }

    fn try_make(&self) -> PoolResult<Probe> {
        if let Some(limit) = self.fail_create_after
            && self.created() >= limit
        {
            return Err(PoolError::factory("create failed"));
        }
        let probe = self.make();
        if let Some((after, token)) = &self.cancel_after
            && self.created() >= *after
        {
            token.cancel();
        }
        Ok(probe)
    }
}

impl ResourceLifecycle for CountingFactory {
    type Resource = Probe;

    fn activate(&self, resource: &Probe, _placement: &Placement) {
        resource.active.store(true, Ordering::Relaxed);
    }

    fn deactivate(&self, resource: &Probe) {
        resource.active.store(false, Ordering::Relaxed);
    }

    fn destroy(&self, resource: &Probe) -> PoolResult<()> {
        if let Some(limit) = self.fail_destroy_after
            && self.destroyed() >= limit
        {
            return Err(PoolError::factory("destroy failed"));
        }
        resource.destroyed.store(true, Ordering::Relaxed);
        self.destroyed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Factory for CountingFactory {
    fn create(&self, _placement: &Placement) -> PoolResult<Probe> {
        self.try_make()
    }
}

#[async_trait]
impl AsyncFactory for CountingFactory {
    async fn create_async(&self, _placement: &Placement) -> PoolResult<Probe> {
        if let Some(limit) = self.stall_after
            && self.created() >= limit
        {
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
        self.try_make()
    }
}
