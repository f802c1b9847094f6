//! FABRIK inverse kinematics for posing a single limb at a time.
//!
//! Build a [`Chain`] from live joint positions when a drag starts, move its target
//! every frame, and run a [`FabrikSolver`] on it. Read the solved positions (and,
//! after `update_rotations`, the orientations) back out and apply them to the
//! skeleton. All positions in a chain must share one coordinate space.

pub mod chain;
pub mod config;
pub mod error;
pub mod joint;
pub mod limits;
pub mod solver;
pub mod util;

pub use chain::Chain;
pub use config::SolverConfig;
pub use error::{FerrikError, Result};
pub use joint::{Joint, JointSource, RotationLimits};
pub use limits::clamp_local_rotation;
pub use solver::{FabrikSolver, SolveReport, SolveStatus};

#[cfg(test)]
mod util_test;
