use cgmath::{Deg, One, Quaternion, Vector3};

pub const DEFAULT_ROTATION_LIMIT: Deg<f32> = Deg(90.0);

/// Per-axis rotation bounds (x, y, z), in degrees.
///
/// Carried as metadata only: the solver never reads it. See `limits` for the
/// post-process that applies it to a local rotation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RotationLimits {
    pub min: [Deg<f32>; 3],
    pub max: [Deg<f32>; 3],
}

impl RotationLimits {
    /// Same `-limit..=limit` range on every axis.
    pub fn symmetric(limit: Deg<f32>) -> Self {
        Self {
            min: [-limit; 3],
            max: [limit; 3],
        }
    }
}

impl Default for RotationLimits {
    fn default() -> Self {
        RotationLimits::symmetric(DEFAULT_ROTATION_LIMIT)
    }
}

/// Anything a chain can be built from: a live skeleton bone, a stored pose, or another joint.
///
/// Positions must all be expressed in one coordinate space (world space by convention).
/// The chain does no space conversion of its own.
pub trait JointSource {
    fn name(&self) -> &str {
        ""
    }

    fn position(&self) -> Vector3<f32>;

    fn orientation(&self) -> Quaternion<f32>;
}

#[derive(Clone, PartialEq, Debug)]
pub struct Joint {
    name: String,
    position: Vector3<f32>,
    orientation: Quaternion<f32>,
    constraints: Option<RotationLimits>,
}

impl Joint {
    pub fn new(name: impl Into<String>, position: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            position,
            orientation: Quaternion::one(),
            constraints: None,
        }
    }

    /// Copies the source's current state by value, with default limits attached.
    pub fn from_source<S: JointSource + ?Sized>(source: &S) -> Self {
        Self {
            name: source.name().to_string(),
            position: source.position(),
            orientation: source.orientation(),
            constraints: Some(RotationLimits::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        self.orientation
    }

    pub fn constraints(&self) -> Option<&RotationLimits> {
        self.constraints.as_ref()
    }

    pub fn with_orientation(mut self, orientation: Quaternion<f32>) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_constraints(mut self, constraints: RotationLimits) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub(crate) fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub(crate) fn set_orientation(&mut self, orientation: Quaternion<f32>) {
        self.orientation = orientation;
    }

    pub(crate) fn sync_from<S: JointSource + ?Sized>(&mut self, source: &S) {
        self.position = source.position();
        self.orientation = source.orientation();
    }
}

impl JointSource for Joint {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn orientation(&self) -> Quaternion<f32> {
        self.orientation
    }
}

impl JointSource for (Vector3<f32>, Quaternion<f32>) {
    fn position(&self) -> Vector3<f32> {
        self.0
    }

    fn orientation(&self) -> Quaternion<f32> {
        self.1
    }
}
