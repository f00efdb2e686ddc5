//! Clone-from-template factory

use crate::errors::PoolResult;
use crate::factory::{Factory, ResourceLifecycle};
use crate::instance::Instance;
use crate::placement::Placement;

/// Creates instances by duplicating a prototype value.
///
/// # Examples
///
/// ```
/// use instance_pool::{ObjectPool, Placement, TemplateFactory};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Turret {
///     range: u32,
/// }
///
/// let mut pool = ObjectPool::new(TemplateFactory::new(Turret { range: 30 }));
///
/// let turret = pool.rent_with(&Placement::at([4.0, 0.0, 2.0], [0.0, 0.0, 0.0, 1.0])).unwrap();
/// assert_eq!(turret.value(), &Turret { range: 30 });
/// assert_eq!(turret.placement().position, Some([4.0, 0.0, 2.0]));
/// ```
#[derive(Debug, Clone)]
pub struct TemplateFactory<T> {
    template: T,
}

impl<T> TemplateFactory<T> {
    pub fn new(template: T) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &T {
        &self.template
    }
}

impl<T: Clone + Send + Sync + 'static> ResourceLifecycle for TemplateFactory<T> {
    type Resource = Instance<T>;

    fn activate(&self, resource: &Instance<T>, placement: &Placement) {
        resource.activate(placement);
    }

    fn deactivate(&self, resource: &Instance<T>) {
        resource.set_active(false);
    }

    fn destroy(&self, resource: &Instance<T>) -> PoolResult<()> {
        resource.mark_destroyed();
        Ok(())
    }
}

impl<T: Clone + Send + Sync + 'static> Factory for TemplateFactory<T> {
    fn create(&self, placement: &Placement) -> PoolResult<Instance<T>> {
        Ok(Instance::spawned(self.template.clone(), placement))
    }
}
