//! # instance_pool
//!
//! Reusable-resource pool for heavyweight, identity-bearing instances.
//! Instead of destroying and recreating expensive objects, the pool parks
//! returned instances in a free set and hands them out again.
//!
//! ## Features
//!
//! - Free (LIFO), rented and all-managed views kept consistent on every call
//! - Synchronous pool over a [`Factory`], async pool over an [`AsyncFactory`]
//! - Cancellable creation via `tokio_util::sync::CancellationToken`
//! - Prewarming, clear and one-shot dispose
//! - Optional `on_rent`/`on_return` hooks routed by an injected dispatcher
//! - Clone-from-template and keyed-load factories (blocking or async loaders)
//! - Metrics snapshot and Prometheus text export
//!
//! ## Quick Start
//!
//! ```rust
//! use instance_pool::{ObjectPool, TemplateFactory};
//!
//! let mut pool = ObjectPool::new(TemplateFactory::new("missile"));
//!
//! let missile = pool.rent().unwrap();
//! assert!(missile.is_active());
//!
//! pool.return_object(missile.clone()).unwrap();
//! assert_eq!(pool.count(), 1);
//!
//! // The same instance comes back
//! assert_eq!(pool.rent().unwrap(), missile);
//! ```
//!
//! Pools are single-owner: every mutating call takes `&mut self`. Wrap a pool
//! in a mutex if several tasks must share it.

mod async_pool;
mod callback;
mod config;
mod errors;
mod factory;
mod handle;
mod instance;
mod keyed;
mod metrics;
mod placement;
mod pool;
mod state;
mod template;

#[cfg(test)]
mod testing;

pub use async_pool::AsyncObjectPool;
pub use callback::{CallbackDispatcher, PoolCallbackReceiver};
pub use config::{PoolConfiguration, UnknownReturnPolicy};
pub use errors::{PoolError, PoolResult};
pub use factory::{AsyncFactory, Factory, FnFactory, ResourceLifecycle};
pub use handle::Handle;
pub use instance::{Instance, InstanceState};
pub use keyed::{AssetLoader, AsyncAssetLoader, BlockingAssetLoader, KeyedLoadFactory};
pub use metrics::{MetricsExporter, PoolMetrics};
pub use placement::{ParentId, Placement, Quat, Vec3};
pub use pool::ObjectPool;
pub use template::TemplateFactory;
