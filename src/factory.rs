//! Factory contracts consumed by the pools

use async_trait::async_trait;
use std::fmt;

use crate::errors::PoolResult;
use crate::placement::Placement;

/// Activation and teardown of a pooled resource type.
///
/// This is the part of the factory contract shared by the synchronous and
/// asynchronous pools. `activate` and `deactivate` default to no-ops for
/// resources without a notion of being live.
pub trait ResourceLifecycle: Send + Sync {
    /// The resource type this factory produces
    type Resource: Send + Sync + 'static;

    /// Make a reused instance live again at `placement`
    fn activate(&self, _resource: &Self::Resource, _placement: &Placement) {}

    /// Take an instance out of the world before it goes back to the free set
    fn deactivate(&self, _resource: &Self::Resource) {}

    /// Tear an instance down. Called only from `clear` and `dispose`.
    fn destroy(&self, resource: &Self::Resource) -> PoolResult<()>;
}

/// Synchronous instance creation
pub trait Factory: ResourceLifecycle {
    /// Build a new, active instance at `placement`
    fn create(&self, placement: &Placement) -> PoolResult<Self::Resource>;
}

/// Suspending instance creation.
///
/// Cancellation is applied by [`AsyncObjectPool`](crate::AsyncObjectPool): the
/// returned future is dropped if the caller's token fires first, so
/// implementations should not commit anything observable before they resolve.
#[async_trait]
pub trait AsyncFactory: ResourceLifecycle {
    /// Build a new, active instance at `placement`
    async fn create_async(&self, placement: &Placement) -> PoolResult<Self::Resource>;
}

/// Factory backed by a closure; destruction simply drops the pool's references.
///
/// # Examples
///
/// ```
/// use instance_pool::{Factory, FnFactory, Placement};
///
/// let factory = FnFactory::new(|_placement: &Placement| vec![0u8; 1024]);
/// let buffer = factory.create(&Placement::none()).unwrap();
/// assert_eq!(buffer.len(), 1024);
/// ```
pub struct FnFactory<C> {
    create_fn: C,
}

impl<C> FnFactory<C> {
    pub fn new(create_fn: C) -> Self {
        Self { create_fn }
    }
}

impl<C, T> ResourceLifecycle for FnFactory<C>
where
    C: Fn(&Placement) -> T + Send + Sync,
    T: Send + Sync + 'static,
{
    type Resource = T;

    fn destroy(&self, _resource: &T) -> PoolResult<()> {
        Ok(())
    }
}

impl<C, T> Factory for FnFactory<C>
where
    C: Fn(&Placement) -> T + Send + Sync,
    T: Send + Sync + 'static,
{
    fn create(&self, placement: &Placement) -> PoolResult<T> {
        Ok((self.create_fn)(placement))
    }
}

impl<C> fmt::Debug for FnFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory").finish_non_exhaustive()
    }
}
