//! In-memory `BallBodies` for driving rule scenarios without rapier.

use glam::Vec3;

use crate::pool::ball::{BallId, BALL_COUNT};
use crate::pool::bodies::BallBodies;
use crate::pool::config::BALL_MASS;

#[derive(Debug, Clone, Copy, Default)]
pub struct FakeBody {
    pub position: Vec3,
    pub linear: Vec3,
    pub angular: Vec3,
    pub sleeping: bool,
}

/// Scripted table: tests move and spin balls by hand.
#[derive(Debug, Clone)]
pub struct FakeTable {
    pub bodies: [FakeBody; BALL_COUNT],
    pub impulses: Vec<(BallId, Vec3)>,
}

impl FakeTable {
    pub fn new() -> Self {
        Self {
            bodies: [FakeBody::default(); BALL_COUNT],
            impulses: Vec::new(),
        }
    }

    pub fn ball(n: u8) -> BallId {
        BallId::new(n).unwrap()
    }

    pub fn body(&self, ball: BallId) -> &FakeBody {
        &self.bodies[ball.index()]
    }

    pub fn set_moving(&mut self, ball: BallId, linear: Vec3) {
        self.bodies[ball.index()].linear = linear;
    }

    pub fn settle_all(&mut self) {
        for body in self.bodies.iter_mut() {
            body.linear = Vec3::ZERO;
            body.angular = Vec3::ZERO;
        }
    }

    /// Move a ball without touching its velocity (simulates the physics step).
    pub fn drift(&mut self, ball: BallId, pos: Vec3) {
        self.bodies[ball.index()].position = pos;
    }
}

impl Default for FakeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BallBodies for FakeTable {
    fn position(&self, ball: BallId) -> Vec3 {
        self.bodies[ball.index()].position
    }

    fn linear_velocity(&self, ball: BallId) -> Vec3 {
        self.bodies[ball.index()].linear
    }

    fn angular_velocity(&self, ball: BallId) -> Vec3 {
        self.bodies[ball.index()].angular
    }

    fn set_position(&mut self, ball: BallId, pos: Vec3) {
        self.bodies[ball.index()].position = pos;
    }

    fn clear_motion(&mut self, ball: BallId) {
        let body = &mut self.bodies[ball.index()];
        body.linear = Vec3::ZERO;
        body.angular = Vec3::ZERO;
    }

    fn sleep(&mut self, ball: BallId) {
        self.bodies[ball.index()].sleeping = true;
    }

    fn wake_up(&mut self, ball: BallId) {
        self.bodies[ball.index()].sleeping = false;
    }

    fn apply_impulse(&mut self, ball: BallId, impulse: Vec3) {
        let body = &mut self.bodies[ball.index()];
        body.linear += impulse / BALL_MASS;
        body.sleeping = false;
        self.impulses.push((ball, impulse));
    }
}
