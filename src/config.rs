//! Pool configuration options

use crate::callback::CallbackDispatcher;

/// What `return_object` does with a handle that is not currently rented,
/// such as a double return or a handle from another pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownReturnPolicy {
    /// Fail with [`PoolError::InvalidArgument`](crate::PoolError::InvalidArgument)
    #[default]
    Reject,

    /// Leave the pool untouched and report success
    Ignore,
}

/// Configuration for pool behavior
///
/// # Examples
///
/// ```
/// use instance_pool::{PoolConfiguration, UnknownReturnPolicy};
///
/// let config = PoolConfiguration::new()
///     .with_initial_capacity(64)
///     .with_warmup(8)
///     .with_unknown_return(UnknownReturnPolicy::Ignore);
///
/// assert_eq!(config.initial_capacity, 64);
/// assert_eq!(config.warmup_size, Some(8));
/// assert_eq!(config.unknown_return, UnknownReturnPolicy::Ignore);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration {
    /// Number of slots reserved up front in the free stack and membership sets
    pub initial_capacity: usize,

    /// Instances to create when the pool is built with `with_config`
    pub warmup_size: Option<usize>,

    /// Handling of returns for handles that are not rented
    pub unknown_return: UnknownReturnPolicy,

    /// Rent/return hook delivery
    pub callbacks: CallbackDispatcher,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            initial_capacity: 32,
            warmup_size: None,
            unknown_return: UnknownReturnPolicy::Reject,
            callbacks: CallbackDispatcher::new(),
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set warm-up size
    pub fn with_warmup(mut self, size: usize) -> Self {
        self.warmup_size = Some(size);
        self
    }

    /// Set the unknown-return policy
    pub fn with_unknown_return(mut self, policy: UnknownReturnPolicy) -> Self {
        self.unknown_return = policy;
        self
    }

    /// Inject the callback dispatcher
    ///
    /// # Examples
    ///
    /// ```
    /// use instance_pool::{CallbackDispatcher, PoolCallbackReceiver, PoolConfiguration};
    ///
    /// struct Projectile;
    /// impl PoolCallbackReceiver for Projectile {}
    ///
    /// let config = PoolConfiguration::new()
    ///     .with_callbacks(CallbackDispatcher::new().with_receiver::<Projectile>());
    ///
    /// assert!(config.callbacks.supports::<Projectile>());
    /// ```
    pub fn with_callbacks(mut self, callbacks: CallbackDispatcher) -> Self {
        self.callbacks = callbacks;
        self
    }
}
