use glam::Vec3;

use crate::api::types::EntityId;
use crate::pool::ball::{BallId, BALL_COUNT};
#[cfg(feature = "physics")]
use crate::api::game::EngineContext;

/// The narrow slice of the physics world the rule core touches.
/// Implemented over the engine context for the game, and by an in-memory
/// table in tests.
pub trait BallBodies {
    fn position(&self, ball: BallId) -> Vec3;
    fn linear_velocity(&self, ball: BallId) -> Vec3;
    fn angular_velocity(&self, ball: BallId) -> Vec3;

    /// Write a position directly. Does not wake the body.
    fn set_position(&mut self, ball: BallId, pos: Vec3);
    /// Zero linear and angular velocity and any pending forces.
    fn clear_motion(&mut self, ball: BallId);
    fn sleep(&mut self, ball: BallId);
    fn wake_up(&mut self, ball: BallId);
    fn apply_impulse(&mut self, ball: BallId, impulse: Vec3);
}

/// Ball number ↔ scene entity lookup, filled once at rack setup.
#[derive(Debug, Clone, PartialEq)]
pub struct BallMap {
    entities: [EntityId; BALL_COUNT],
}

impl BallMap {
    pub fn new(entities: [EntityId; BALL_COUNT]) -> Self {
        Self { entities }
    }

    pub fn entity(&self, ball: BallId) -> EntityId {
        self.entities[ball.index()]
    }

    pub fn ball(&self, entity: EntityId) -> Option<BallId> {
        self.entities
            .iter()
            .position(|&e| e == entity)
            .and_then(|i| BallId::new(i as u8).ok())
    }
}

/// `BallBodies` over the live engine context.
#[cfg(feature = "physics")]
pub struct EngineBodies<'a> {
    ctx: &'a mut EngineContext,
    map: &'a BallMap,
}

#[cfg(feature = "physics")]
impl<'a> EngineBodies<'a> {
    pub fn new(ctx: &'a mut EngineContext, map: &'a BallMap) -> Self {
        Self { ctx, map }
    }
}

#[cfg(feature = "physics")]
impl BallBodies for EngineBodies<'_> {
    fn position(&self, ball: BallId) -> Vec3 {
        self.ctx.position(self.map.entity(ball))
    }

    fn linear_velocity(&self, ball: BallId) -> Vec3 {
        self.ctx.velocity(self.map.entity(ball))
    }

    fn angular_velocity(&self, ball: BallId) -> Vec3 {
        self.ctx.angular_velocity(self.map.entity(ball))
    }

    fn set_position(&mut self, ball: BallId, pos: Vec3) {
        self.ctx.set_position(self.map.entity(ball), pos);
    }

    fn clear_motion(&mut self, ball: BallId) {
        self.ctx.clear_motion(self.map.entity(ball));
    }

    fn sleep(&mut self, ball: BallId) {
        self.ctx.sleep(self.map.entity(ball));
    }

    fn wake_up(&mut self, ball: BallId) {
        self.ctx.wake_up(self.map.entity(ball));
    }

    fn apply_impulse(&mut self, ball: BallId, impulse: Vec3) {
        self.ctx.apply_impulse(self.map.entity(ball), impulse);
    }
}
