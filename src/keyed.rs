//! Keyed load factory

use async_trait::async_trait;

use crate::errors::{PoolError, PoolResult};
use crate::factory::{AsyncFactory, Factory, ResourceLifecycle};
use crate::instance::Instance;
use crate::placement::Placement;

/// Backing loader that resolves an opaque key to a live asset instance.
///
/// Loaders typically reference-count what they load. Every successful
/// instantiation is paired with exactly one `release_instance` when the pool
/// destroys the instance. How assets are instantiated is up to
/// [`AsyncAssetLoader`] and [`BlockingAssetLoader`].
pub trait AssetLoader: Send + Sync {
    type Asset: Send + Sync + 'static;

    /// Release an instance obtained from the loader
    fn release_instance(&self, asset: &Self::Asset) -> PoolResult<()>;
}

/// Loader that instantiates without blocking the caller
#[async_trait]
pub trait AsyncAssetLoader: AssetLoader {
    /// Load (or reuse a loaded copy of) `key` and instantiate it at `placement`
    async fn instantiate(&self, key: &str, placement: &Placement) -> PoolResult<Self::Asset>;
}

/// Loader that can complete an instantiation on the calling thread
pub trait BlockingAssetLoader: AssetLoader {
    /// Load `key` and instantiate it at `placement`, waiting for completion
    fn instantiate_blocking(&self, key: &str, placement: &Placement) -> PoolResult<Self::Asset>;
}

/// Creates instances by asking an [`AssetLoader`] for a fixed key.
///
/// Backs an [`AsyncObjectPool`](crate::AsyncObjectPool) when the loader is an
/// [`AsyncAssetLoader`] and an [`ObjectPool`](crate::ObjectPool) when it is a
/// [`BlockingAssetLoader`]. Destroying an instance releases it through the
/// loader rather than just dropping it, so the loader's reference count goes
/// back down.
///
/// # Examples
///
/// ```
/// use instance_pool::{
///     AssetLoader, BlockingAssetLoader, KeyedLoadFactory, ObjectPool, Placement, PoolResult,
/// };
///
/// struct Prefabs;
///
/// impl AssetLoader for Prefabs {
///     type Asset = String;
///
///     fn release_instance(&self, _asset: &String) -> PoolResult<()> {
///         Ok(())
///     }
/// }
///
/// impl BlockingAssetLoader for Prefabs {
///     fn instantiate_blocking(&self, key: &str, _placement: &Placement) -> PoolResult<String> {
///         Ok(format!("{key} instance"))
///     }
/// }
///
/// let mut pool = ObjectPool::new(KeyedLoadFactory::new(Prefabs, "props/barrel").unwrap());
/// let barrel = pool.rent().unwrap();
/// assert_eq!(barrel.value(), "props/barrel instance");
/// ```
#[derive(Debug)]
pub struct KeyedLoadFactory<L> {
    loader: L,
    key: String,
}

impl<L: AssetLoader> KeyedLoadFactory<L> {
    /// Fails with [`PoolError::InvalidArgument`] when `key` is empty or blank
    pub fn new(loader: L, key: impl Into<String>) -> PoolResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(PoolError::invalid_argument("asset key must not be empty"));
        }
        Ok(Self { loader, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: AssetLoader> ResourceLifecycle for KeyedLoadFactory<L> {
    type Resource = Instance<L::Asset>;

    fn activate(&self, resource: &Self::Resource, placement: &Placement) {
        resource.activate(placement);
    }

    fn deactivate(&self, resource: &Self::Resource) {
        resource.set_active(false);
    }

    fn destroy(&self, resource: &Self::Resource) -> PoolResult<()> {
        self.loader.release_instance(resource.value())?;
        resource.mark_destroyed();
        Ok(())
    }
}

impl<L: BlockingAssetLoader> Factory for KeyedLoadFactory<L> {
    fn create(&self, placement: &Placement) -> PoolResult<Self::Resource> {
        let asset = self.loader.instantiate_blocking(&self.key, placement)?;
        Ok(Instance::spawned(asset, placement))
    }
}

#[async_trait]
impl<L: AsyncAssetLoader> AsyncFactory for KeyedLoadFactory<L> {
    async fn create_async(&self, placement: &Placement) -> PoolResult<Self::Resource> {
        let asset = self.loader.instantiate(&self.key, placement).await?;
        Ok(Instance::spawned(asset, placement))
    }
}
