use crate::chain::Chain;
use crate::config::SolverConfig;
use crate::error::{FerrikError, Result};
use crate::util;
use cgmath::{InnerSpace, Vector3};
use log::{debug, error, trace};

/// Fraction of the shorter neighbouring segment an interior joint is pushed sideways
/// when a straight chain has its target on its own axis.
const STRAIGHT_CHAIN_BEND: f32 = 0.1;
const COLLINEAR_DOT: f32 = 1.0 - 1.0e-5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolveStatus {
    /// Effector is within tolerance of the target.
    Converged,
    /// Target is reachable but the iteration budget ran out first. The pose is a partial solution.
    NotConverged,
    /// Target is beyond the chain's total length. The chain is stretched straight towards it.
    Unreachable,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub iterations: usize,
    /// Effector to target distance after the solve.
    pub distance: f32,
}

impl SolveReport {
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// FABRIK solver bound to one chain for as long as it lives.
///
/// Holds the chain's only mutable borrow, so nothing else can move its joints
/// while a solve is running. Every `solve` re-measures segment lengths from the
/// current joint positions; nothing but scratch space is kept between calls.
pub struct FabrikSolver<'a> {
    chain: &'a mut Chain,
    config: SolverConfig,
    lengths: Vec<f32>,
    // unit direction of segment i, from joint i towards joint i + 1
    directions: Vec<Vector3<f32>>,
}

impl<'a> FabrikSolver<'a> {
    pub fn new(chain: &'a mut Chain) -> Self {
        FabrikSolver::with_config(chain, SolverConfig::default())
    }

    pub fn with_config(chain: &'a mut Chain, config: SolverConfig) -> Self {
        Self {
            chain,
            config,
            lengths: Vec::new(),
            directions: Vec::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn chain(&self) -> &Chain {
        &*self.chain
    }

    pub fn set_target(&mut self, target: Vector3<f32>) {
        self.chain.set_target(target);
    }

    /// Runs one solve and reports only whether the effector reached the target.
    ///
    /// An unsolvable chain (fewer than two joints) is left untouched and reports `false`.
    pub fn solve(&mut self) -> bool {
        match self.try_solve() {
            Ok(report) => report.converged(),
            Err(_) => false,
        }
    }

    pub fn try_solve(&mut self) -> Result<SolveReport> {
        let joint_count = self.chain.len();
        if joint_count < 2 {
            error!("Chain '{}' has {} joint(s), at least 2 are needed to solve.", self.chain.name(), joint_count);
            return Err(FerrikError::InvalidChain { joints: joint_count });
        }

        self.measure();
        let root = self.chain.root().position();
        let target = self.chain.target();
        let total_length: f32 = self.lengths.iter().sum();

        if util::distance_between(root, target) > total_length {
            self.stretch_towards(root, target);
            return Ok(self.report(SolveStatus::Unreachable, 0));
        }

        self.unfold_if_straight(root, target);

        for iteration in 1..=self.config.max_iterations() {
            self.forward_pass(target);
            self.backward_pass(root);

            if self.effector_distance() < self.config.tolerance() {
                return Ok(self.report(SolveStatus::Converged, iteration));
            }
        }
        Ok(self.report(SolveStatus::NotConverged, self.config.max_iterations()))
    }

    /// Re-derive joint orientations from the solved positions. See `Chain::update_rotations`.
    pub fn update_rotations(&mut self) {
        self.chain.update_rotations();
    }

    fn report(&self, status: SolveStatus, iterations: usize) -> SolveReport {
        let report = SolveReport {
            status,
            iterations,
            distance: self.effector_distance(),
        };
        debug!("Solved chain '{}': {:?} after {} iteration(s), {} from target.",
            self.chain.name(), report.status, report.iterations, report.distance);
        report
    }

    fn effector_distance(&self) -> f32 {
        util::distance_between(self.chain.effector().position(), self.chain.target())
    }

    fn measure(&mut self) {
        self.lengths.clear();
        self.directions.clear();

        // zero-length segments start out pointing along the rest axis
        let rest_axis = self.chain.rest_axis();
        let joints = self.chain.joints();
        for pair in joints.windows(2) {
            let (start, end) = (pair[0].position(), pair[1].position());
            self.lengths.push(util::distance_between(start, end));
            self.directions.push(util::direction_between(start, end).unwrap_or(rest_axis));
        }
    }

    fn stretch_towards(&mut self, root: Vector3<f32>, target: Vector3<f32>) {
        let rest_axis = self.chain.rest_axis();
        let dir = util::direction_between(root, target).unwrap_or(rest_axis);

        let joints = self.chain.joints_mut();
        for i in 1..joints.len() {
            let previous = joints[i - 1].position();
            joints[i].set_position(previous + dir * self.lengths[i - 1]);
            self.directions[i - 1] = dir;
        }
    }

    /// A straight chain whose target lies on its own axis never bends under FABRIK:
    /// every pass just slides it back and forth along that axis. Push the interior
    /// joints slightly to one side so the passes have a plane to fold in.
    fn unfold_if_straight(&mut self, root: Vector3<f32>, target: Vector3<f32>) {
        if self.chain.len() < 3 || self.effector_distance() < self.config.tolerance() {
            return;
        }

        let axis = self.directions[0];
        let collinear = |dir: Vector3<f32>| dir.dot(axis).abs() > COLLINEAR_DOT;
        if !self.directions.iter().all(|d| collinear(*d)) {
            return;
        }
        if let Some(to_target) = util::direction_between(root, target) {
            if !collinear(to_target) {
                return;
            }
        }

        let side = util::perpendicular_to(axis);
        trace!("Chain '{}' is straight and aimed along its axis, bending it towards {:?}.", self.chain.name(), side);
        let joints = self.chain.joints_mut();
        for i in 1..joints.len() - 1 {
            let bend = STRAIGHT_CHAIN_BEND * self.lengths[i - 1].min(self.lengths[i]);
            let position = joints[i].position();
            joints[i].set_position(position + side * bend);
        }
    }

    // Pins the effector to the target and walks back down to the root, keeping each
    // joint on the line towards where it was, at its segment's length.
    fn forward_pass(&mut self, target: Vector3<f32>) {
        let lengths = &self.lengths;
        let directions = &mut self.directions;
        let joints = self.chain.joints_mut();
        let last = joints.len() - 1;

        joints[last].set_position(target);
        for i in (0..last).rev() {
            let next = joints[i + 1].position();
            let dir = match util::direction_between(next, joints[i].position()) {
                Some(dir) => dir,
                None => {
                    trace!("Joint {} coincides with joint {}, keeping its previous direction.", i, i + 1);
                    -directions[i]
                }
            };
            directions[i] = -dir;
            joints[i].set_position(next + dir * lengths[i]);
        }
    }

    // Puts the root back on its anchor and walks out to the effector.
    fn backward_pass(&mut self, root: Vector3<f32>) {
        let lengths = &self.lengths;
        let directions = &mut self.directions;
        let joints = self.chain.joints_mut();

        joints[0].set_position(root);
        for i in 1..joints.len() {
            let previous = joints[i - 1].position();
            let dir = match util::direction_between(previous, joints[i].position()) {
                Some(dir) => dir,
                None => {
                    trace!("Joint {} coincides with joint {}, keeping its previous direction.", i, i - 1);
                    directions[i - 1]
                }
            };
            directions[i - 1] = dir;
            joints[i].set_position(previous + dir * lengths[i - 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Joint;
    use assert_approx_eq::assert_approx_eq;

    fn chain_through(points: &[(f32, f32, f32)], target: Vector3<f32>) -> Chain {
        let joints: Vec<Joint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| Joint::new(format!("j{}", i), Vector3::new(p.0, p.1, p.2)))
            .collect();
        Chain::from_sources("test", &joints, target).unwrap()
    }

    #[test]
    fn stretch_keeps_lengths_for_off_axis_target() {
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (1.0, 1.0, 0.0)], Vector3::new(10.0, 0.0, 0.0));
        let report = FabrikSolver::new(&mut chain).try_solve().unwrap();
        assert_eq!(report.status, SolveStatus::Unreachable);
        assert_eq!(report.iterations, 0);
        assert_approx_eq!(chain[1].position().x, 1.0);
        assert_approx_eq!(chain[2].position().x, 2.0);
        assert_approx_eq!(chain[2].position().y, 0.0);
        assert_approx_eq!(report.distance, 8.0);
    }

    #[test]
    fn bent_chain_converges_quickly() {
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (1.0, 1.0, 0.0)], Vector3::new(1.0, 0.5, 0.5));
        let config = SolverConfig::new(0.001, 50).unwrap();
        let report = FabrikSolver::with_config(&mut chain, config).try_solve().unwrap();
        assert!(report.converged());
        assert!(report.distance < 0.001);
        assert!(report.iterations >= 1);
    }

    #[test]
    fn budget_exhaustion_is_not_converged() {
        // targets close to the root converge slowly, one pass is never enough here
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (1.0, 1.0, 0.0)], Vector3::new(0.1, 0.1, 0.0));
        let config = SolverConfig::new(1.0e-6, 1).unwrap();
        let report = FabrikSolver::with_config(&mut chain, config).try_solve().unwrap();
        assert_eq!(report.status, SolveStatus::NotConverged);
        assert_eq!(report.iterations, 1);
        assert!(report.distance >= 1.0e-6);
    }

    #[test]
    fn coincident_joints_do_not_produce_nan() {
        let mut chain = chain_through(
            &[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 1.0, 0.0), (1.0, 1.0, 0.0)],
            Vector3::new(0.5, 1.2, 0.3),
        );
        let mut solver = FabrikSolver::new(&mut chain);
        solver.try_solve().unwrap();
        solver.update_rotations();
        for joint in chain.joints() {
            let p = joint.position();
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            let q = joint.orientation();
            assert!(q.s.is_finite() && q.v.x.is_finite());
        }
        // the zero-length segment stays zero-length
        assert_approx_eq!(util::distance_between(chain[1].position(), chain[2].position()), 0.0);
    }

    #[test]
    fn target_on_root_of_straight_chain_folds_it() {
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 2.0, 0.0)], Vector3::new(0.0, 0.0, 0.0));
        let config = SolverConfig::new(0.001, 50).unwrap();
        assert!(FabrikSolver::with_config(&mut chain, config).solve());
        assert!(util::v_approximately_equals(chain[2].position(), Vector3::new(0.0, 0.0, 0.0), 0.001));
    }

    #[test]
    fn target_behind_straight_chain() {
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 2.0, 0.0)], Vector3::new(0.0, -1.0, 0.0));
        let config = SolverConfig::new(0.001, 50).unwrap();
        let mut solver = FabrikSolver::with_config(&mut chain, config);
        assert!(solver.solve());
        let lengths = solver.chain().segment_lengths();
        assert_approx_eq!(lengths[0], 1.0, 1.0e-5);
        assert_approx_eq!(lengths[1], 1.0, 1.0e-5);
    }

    #[test]
    fn zero_length_segment_starts_on_rest_axis() {
        let mut chain = chain_through(
            &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 0.0, 1.0)],
            Vector3::new(0.5, 0.5, 0.5),
        );
        chain.set_rest_axis(Vector3::new(0.0, 0.0, -2.0));
        let mut solver = FabrikSolver::new(&mut chain);
        solver.measure();

        assert_eq!(solver.lengths, vec![1.0, 0.0, 1.0]);
        assert_eq!(solver.directions[0], Vector3::new(1.0, 0.0, 0.0));
        // not the previous segment's +x
        assert_eq!(solver.directions[1], Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(solver.directions[2], Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn custom_config_is_kept() {
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0)], Vector3::new(0.0, 1.0, 0.0));
        let config = SolverConfig::new(0.05, 25).unwrap();
        let solver = FabrikSolver::with_config(&mut chain, config);
        assert_eq!(solver.config(), &config);
        assert_eq!(FabrikSolver::new(&mut chain).config(), &SolverConfig::default());
    }

    #[test]
    fn set_target_through_solver() {
        let mut chain = chain_through(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (1.0, 1.0, 0.0)], Vector3::new(1.0, 1.0, 0.0));
        let mut solver = FabrikSolver::new(&mut chain);
        solver.set_target(Vector3::new(0.0, 1.0, 1.0));
        assert!(solver.solve());
        assert_eq!(solver.chain().target(), Vector3::new(0.0, 1.0, 1.0));
    }
}
