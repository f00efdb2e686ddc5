//! Activation state carried by instances of the bundled factories

use parking_lot::Mutex;

use crate::placement::Placement;

/// Snapshot of an instance's activation state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InstanceState {
    /// Whether the instance is currently live in the world
    pub active: bool,

    /// Last applied placement
    pub placement: Placement,

    /// Set once the owning pool tore the instance down
    pub destroyed: bool,
}

/// A pooled value together with its activation state.
///
/// [`TemplateFactory`](crate::TemplateFactory) and
/// [`KeyedLoadFactory`](crate::KeyedLoadFactory) hand these out. The pool toggles
/// the state through the factory on rent and return; the wrapped value is never
/// touched.
///
/// # Examples
///
/// ```
/// use instance_pool::{Instance, Placement};
///
/// let placement = Placement::none().with_position([0.0, 1.0, 0.0]);
/// let instance = Instance::spawned("enemy", &placement);
/// assert!(instance.is_active());
///
/// instance.set_active(false);
/// assert!(!instance.is_active());
/// assert_eq!(instance.placement().position, Some([0.0, 1.0, 0.0]));
/// ```
#[derive(Debug)]
pub struct Instance<T> {
    value: T,
    state: Mutex<InstanceState>,
}

impl<T> Instance<T> {
    /// A new, active instance at `placement`
    pub fn spawned(value: T, placement: &Placement) -> Self {
        Self {
            value,
            state: Mutex::new(InstanceState {
                active: true,
                placement: *placement,
                destroyed: false,
            }),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn state(&self) -> InstanceState {
        *self.state.lock()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    pub fn placement(&self) -> Placement {
        self.state.lock().placement
    }

    pub fn set_active(&self, active: bool) {
        self.state.lock().active = active;
    }

    /// Apply the fields set in `placement`, leaving the rest as they were
    pub fn place(&self, placement: &Placement) {
        self.state.lock().placement.merge(placement);
    }

    /// Place and activate in one step, as done when a pooled instance is reused
    pub fn activate(&self, placement: &Placement) {
        let mut state = self.state.lock();
        state.placement.merge(placement);
        state.active = true;
    }

    pub(crate) fn mark_destroyed(&self) {
        let mut state = self.state.lock();
        state.active = false;
        state.destroyed = true;
    }
}
