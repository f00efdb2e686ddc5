//! Identity-bearing handles to pooled resources

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A shared handle to one pooled resource instance.
///
/// Two handles are equal only when they point at the same instance, regardless
/// of whether the resources themselves compare equal.
///
/// # Examples
///
/// ```
/// use instance_pool::Handle;
///
/// let a = Handle::new(7);
/// let b = Handle::new(7);
///
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// assert_eq!(*a, *b);
/// ```
pub struct Handle<R> {
    inner: Arc<R>,
}

impl<R> Handle<R> {
    /// Wrap a freshly created resource
    pub fn new(resource: R) -> Self {
        Self {
            inner: Arc::new(resource),
        }
    }

    /// Whether both handles refer to the same instance
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    /// Number of live handles to this instance, the pool's own copies included
    pub fn handle_count(this: &Self) -> usize {
        Arc::strong_count(&this.inner)
    }

    fn addr(&self) -> *const R {
        Arc::as_ptr(&self.inner)
    }
}

impl<R> Clone for Handle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Deref for Handle<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<R> AsRef<R> for Handle<R> {
    fn as_ref(&self) -> &R {
        &self.inner
    }
}

impl<R> PartialEq for Handle<R> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<R> Eq for Handle<R> {}

impl<R> Hash for Handle<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.addr(), state);
    }
}

impl<R: fmt::Debug> fmt::Debug for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("addr", &self.addr())
            .field("resource", &*self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_not_value() {
        let a = Handle::new(String::from("same"));
        let b = Handle::new(String::from("same"));

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(b.clone());
        set.insert(a.clone());

        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
        assert!(set.contains(&b));
    }

    #[test]
    fn test_handle_count() {
        let a = Handle::new(1u8);
        assert_eq!(Handle::handle_count(&a), 1);
        let b = a.clone();
        assert_eq!(Handle::handle_count(&b), 2);
        drop(a);
        assert_eq!(Handle::handle_count(&b), 1);
    }
}
