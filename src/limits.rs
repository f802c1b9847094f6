//! Joint-limit enforcement, applied after solving.
//!
//! Clamping works on local (parent-relative) rotations, never on positions, so the
//! segment lengths the solver produced are left alone. Converting a solved world
//! orientation into its parent's frame is the caller's job.

use crate::joint::RotationLimits;
use cgmath::{Deg, Euler, InnerSpace, Quaternion, Rad};

impl RotationLimits {
    /// True when every Euler angle of `rotation` lies inside its axis bounds.
    pub fn contains(&self, rotation: Quaternion<f32>) -> bool {
        let angles = euler_degrees(rotation);
        (0..3).all(|axis| angles[axis] >= self.min[axis] && angles[axis] <= self.max[axis])
    }
}

pub fn clamp_local_rotation(limits: &RotationLimits, rotation: Quaternion<f32>) -> Quaternion<f32> {
    let angles = euler_degrees(rotation);
    let mut clamped = [Rad(0.0f32); 3];
    for axis in 0..3 {
        let angle = if angles[axis] < limits.min[axis] {
            limits.min[axis]
        } else if angles[axis] > limits.max[axis] {
            limits.max[axis]
        } else {
            angles[axis]
        };
        clamped[axis] = Rad::from(angle);
    }
    Quaternion::from(Euler::new(clamped[0], clamped[1], clamped[2]))
}

fn euler_degrees(rotation: Quaternion<f32>) -> [Deg<f32>; 3] {
    let euler = Euler::from(rotation.normalize());
    [euler.x.into(), euler.y.into(), euler.z.into()]
}
