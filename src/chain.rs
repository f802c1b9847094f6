use crate::error::{FerrikError, Result};
use crate::joint::{Joint, JointSource};
use crate::util;
use cgmath::{InnerSpace, Quaternion, Vector3};
use log::error;

/// A transient numerical proxy for one limb: root first, effector last.
///
/// The chain owns copies of its joints. Nothing outside it can alias them, so the
/// only way to move a joint is through this type (or a solver holding the one
/// `&mut Chain`). Only one writer should drive a chain at a time, which in practice
/// is the active drag gesture.
#[derive(Clone, Debug)]
pub struct Chain {
    name: String,
    joints: Vec<Joint>,
    target: Vector3<f32>,
    rest_axis: Vector3<f32>,
}

impl Chain {
    pub fn from_sources<S: JointSource>(name: impl Into<String>, sources: &[S], target: Vector3<f32>) -> Result<Self> {
        let name = name.into();
        //guard against building a chain with nothing in it.
        if sources.is_empty() {
            error!("Chain '{}' cannot be built from zero joints.", name);
            return Err(FerrikError::InvalidChain { joints: 0 });
        }

        Ok(Self {
            name,
            joints: sources.iter().map(Joint::from_source).collect(),
            target,
            rest_axis: Vector3::unit_y(),
        })
    }

    /// Pull fresh positions and orientations from the live sources, e.g. at the start of a new drag.
    pub fn resync<S: JointSource>(&mut self, sources: &[S]) -> Result<()> {
        if sources.len() != self.joints.len() {
            error!("Chain '{}' has {} joints but was resynced from {} sources.", self.name, self.joints.len(), sources.len());
            return Err(FerrikError::SourceCountMismatch {
                expected: self.joints.len(),
                got: sources.len(),
            });
        }
        for (joint, source) in self.joints.iter_mut().zip(sources) {
            joint.sync_from(source);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn root(&self) -> &Joint {
        &self.joints[0]
    }

    /// Always the last joint. Chains are never empty, see `from_sources`.
    pub fn effector(&self) -> &Joint {
        &self.joints[self.joints.len() - 1]
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    pub fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    pub fn rest_axis(&self) -> Vector3<f32> {
        self.rest_axis
    }

    /// Direction a joint points in when its orientation is the identity. Defaults to +Y.
    /// A zero axis is ignored.
    pub fn set_rest_axis(&mut self, axis: Vector3<f32>) {
        match util::safe_normalize(axis) {
            Some(axis) => self.rest_axis = axis,
            None => error!("Chain '{}' ignored a zero rest axis.", self.name),
        }
    }

    pub fn set_joint_position(&mut self, index: usize, position: Vector3<f32>) -> Result<()> {
        let len = self.joints.len();
        match self.joints.get_mut(index) {
            Some(joint) => {
                joint.set_position(position);
                Ok(())
            }
            None => {
                error!("Chain '{}' does not contain a joint {} - it has {} joints.", self.name, index, len);
                Err(FerrikError::JointOutOfRange { index, len })
            }
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        self.joints.iter().map(|j| j.position())
    }

    /// Live segment lengths, measured from the current joint positions.
    pub fn segment_lengths(&self) -> Vec<f32> {
        self.joints
            .windows(2)
            .map(|pair| util::distance_between(pair[0].position(), pair[1].position()))
            .collect()
    }

    pub fn total_length(&self) -> f32 {
        self.joints
            .windows(2)
            .map(|pair| util::distance_between(pair[0].position(), pair[1].position()))
            .sum()
    }

    pub fn is_reachable(&self) -> bool {
        util::distance_between(self.root().position(), self.target) <= self.total_length()
    }

    pub(crate) fn joints_mut(&mut self) -> &mut [Joint] {
        &mut self.joints
    }

    /// Point every joint but the effector from the rest axis towards the next joint.
    ///
    /// Derived state only, positions are untouched. A joint sitting on top of its
    /// neighbour keeps whatever orientation it had.
    pub fn update_rotations(&mut self) {
        let rest = self.rest_axis;
        let fallback = util::perpendicular_to(rest);
        for i in 0..self.joints.len().saturating_sub(1) {
            let from = self.joints[i].position();
            let to = self.joints[i + 1].position();
            if let Some(dir) = util::direction_between(from, to) {
                let rotation = Quaternion::from_arc(rest, dir, Some(fallback)).normalize();
                self.joints[i].set_orientation(rotation);
            }
        }
    }
}

impl std::ops::Index<usize> for Chain {
    type Output = Joint;

    fn index(&self, index: usize) -> &Joint {
        &self.joints[index]
    }
}
