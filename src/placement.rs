//! Placement requests applied when an instance is created or re-activated

/// A position in world space
pub type Vec3 = [f32; 3];

/// An orientation quaternion, `[x, y, z, w]`
pub type Quat = [f32; 4];

/// Opaque identifier of an ownership parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentId(pub u64);

/// Where and under which parent a rented instance should appear.
///
/// Every field is optional; only the fields that are set are applied to a
/// reused instance, so an empty placement leaves its last transform untouched.
///
/// # Examples
///
/// ```
/// use instance_pool::{ParentId, Placement};
///
/// let placement = Placement::at([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0])
///     .with_parent(ParentId(9));
///
/// assert_eq!(placement.position, Some([1.0, 2.0, 3.0]));
/// assert_eq!(placement.parent, Some(ParentId(9)));
/// assert!(Placement::none().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// World position
    pub position: Option<Vec3>,

    /// World orientation
    pub rotation: Option<Quat>,

    /// Ownership parent
    pub parent: Option<ParentId>,
}

impl Placement {
    /// A placement that changes nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Position and orientation without a parent
    pub fn at(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            parent: None,
        }
    }

    /// Parent only
    pub fn under(parent: ParentId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the orientation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Set the parent
    pub fn with_parent(mut self, parent: ParentId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.parent.is_none()
    }

    /// Overwrite the fields of `self` that are set in `other`
    pub fn merge(&mut self, other: &Placement) {
        if let Some(position) = other.position {
            self.position = Some(position);
        }
        if let Some(rotation) = other.rotation {
            self.rotation = Some(rotation);
        }
        if let Some(parent) = other.parent {
            self.parent = Some(parent);
        }
    }
}
