//! Optional rent/return hooks on pooled resources

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::instance::Instance;

/// Hooks a resource may implement to observe its own rent/return transitions.
///
/// Both methods default to doing nothing. Hooks only see the resource itself;
/// they have no way to reach the pool that owns it.
///
/// Implementing this trait is not enough on its own: the resource type must
/// also be registered on the pool's [`CallbackDispatcher`] through
/// [`with_receiver`](CallbackDispatcher::with_receiver) or
/// [`with_instance_receiver`](CallbackDispatcher::with_instance_receiver) and
/// passed in with [`PoolConfiguration::with_callbacks`](crate::PoolConfiguration::with_callbacks).
/// Pools built with `new` have no receivers registered.
pub trait PoolCallbackReceiver {
    /// Called after the resource moved from the free set to the rented set
    fn on_rent(&self) {}

    /// Called after the resource was deactivated and handed back to the free set
    fn on_return(&self) {}
}

type Probe = fn(&dyn Any) -> Option<&dyn PoolCallbackReceiver>;

fn probe_direct<R: PoolCallbackReceiver + 'static>(
    resource: &dyn Any,
) -> Option<&dyn PoolCallbackReceiver> {
    resource
        .downcast_ref::<R>()
        .map(|r| r as &dyn PoolCallbackReceiver)
}

fn probe_instance<T: PoolCallbackReceiver + Send + Sync + 'static>(
    resource: &dyn Any,
) -> Option<&dyn PoolCallbackReceiver> {
    resource
        .downcast_ref::<Instance<T>>()
        .map(|instance| instance.value() as &dyn PoolCallbackReceiver)
}

/// Routes rent/return notifications to resources that opted in.
///
/// The capability check happens at dispatch time: the dispatcher looks up the
/// concrete resource type and, if a receiver was registered for it, invokes the
/// hook. Resources of unregistered types are skipped without error.
///
/// # Examples
///
/// ```
/// use instance_pool::{CallbackDispatcher, PoolCallbackReceiver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct Bullet {
///     rents: AtomicUsize,
/// }
///
/// impl PoolCallbackReceiver for Bullet {
///     fn on_rent(&self) {
///         self.rents.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let dispatcher = CallbackDispatcher::new().with_receiver::<Bullet>();
/// let bullet = Bullet::default();
///
/// dispatcher.notify_rent(&bullet);
/// dispatcher.notify_rent(&42u32); // not registered, ignored
///
/// assert_eq!(bullet.rents.load(Ordering::Relaxed), 1);
/// ```
#[derive(Clone, Default)]
pub struct CallbackDispatcher {
    probes: HashMap<TypeId, Probe>,
}

impl CallbackDispatcher {
    /// A dispatcher with no registered receivers
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver hooks to resources of type `R`, which implements them itself
    pub fn with_receiver<R: PoolCallbackReceiver + 'static>(mut self) -> Self {
        self.probes.insert(TypeId::of::<R>(), probe_direct::<R>);
        self
    }

    /// Deliver hooks to `Instance<T>` resources by forwarding to the wrapped `T`
    pub fn with_instance_receiver<T>(mut self) -> Self
    where
        T: PoolCallbackReceiver + Send + Sync + 'static,
    {
        self.probes
            .insert(TypeId::of::<Instance<T>>(), probe_instance::<T>);
        self
    }

    /// Whether resources of type `R` receive hooks
    pub fn supports<R: 'static>(&self) -> bool {
        self.probes.contains_key(&TypeId::of::<R>())
    }

    pub fn notify_rent<R: 'static>(&self, resource: &R) {
        if let Some(receiver) = self.receiver(resource) {
            receiver.on_rent();
        }
    }

    pub fn notify_return<R: 'static>(&self, resource: &R) {
        if let Some(receiver) = self.receiver(resource) {
            receiver.on_return();
        }
    }

    fn receiver<'a, R: 'static>(&self, resource: &'a R) -> Option<&'a dyn PoolCallbackReceiver> {
        let probe = self.probes.get(&TypeId::of::<R>())?;
        probe(resource as &dyn Any)
    }
}

impl fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("receivers", &self.probes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Placement;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        rents: AtomicUsize,
        returns: AtomicUsize,
    }

    impl PoolCallbackReceiver for Counter {
        fn on_rent(&self) {
            self.rents.fetch_add(1, Ordering::Relaxed);
        }

        fn on_return(&self) {
            self.returns.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_direct_receiver() {
        let dispatcher = CallbackDispatcher::new().with_receiver::<Counter>();
        let counter = Counter::default();

        dispatcher.notify_rent(&counter);
        dispatcher.notify_return(&counter);
        dispatcher.notify_return(&counter);

        assert_eq!(counter.rents.load(Ordering::Relaxed), 1);
        assert_eq!(counter.returns.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_instance_receiver() {
        let dispatcher = CallbackDispatcher::new().with_instance_receiver::<Counter>();
        let instance = Instance::spawned(Counter::default(), &Placement::none());

        assert!(dispatcher.supports::<Instance<Counter>>());
        assert!(!dispatcher.supports::<Counter>());

        dispatcher.notify_rent(&instance);
        assert_eq!(instance.value().rents.load(Ordering::Relaxed), 1);

        // The bare value is a different type and was never registered
        dispatcher.notify_rent(instance.value());
        assert_eq!(instance.value().rents.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unregistered_is_silent() {
        let dispatcher = CallbackDispatcher::new();
        let counter = Counter::default();

        dispatcher.notify_rent(&counter);
        dispatcher.notify_return(&counter);

        assert_eq!(counter.rents.load(Ordering::Relaxed), 0);
        assert_eq!(counter.returns.load(Ordering::Relaxed), 0);
    }
}
