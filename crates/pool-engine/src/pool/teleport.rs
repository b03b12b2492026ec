use glam::Vec3;

use crate::core::timer::{TimerId, TimerQueue};
use crate::pool::ball::{BallId, BALL_COUNT};
use crate::pool::bodies::BallBodies;
use crate::pool::config::RulesConfig;

/// A deferred height check for one teleported ball.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Verify {
    ball: BallId,
    target: Vec3,
    generation: u32,
}

/// Result of a verification that came due this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeleportCheck {
    Landed(BallId),
    /// The ball was out of the valid band and has been sent again.
    Retried(BallId),
}

/// Moves balls to a resting spot and makes sure they stay there.
///
/// A teleport freezes the body, writes the new position one diameter above
/// the target, wakes it, and schedules a check. If the ball ends up below
/// the world or far above its drop point the teleport is re-issued. Each
/// ball has at most one check pending; re-teleporting replaces it.
#[derive(Debug, Clone)]
pub struct TeleportProtocol {
    timers: TimerQueue<Verify>,
    pending: [Option<TimerId>; BALL_COUNT],
    generation: u32,
    drop_offset: f32,
    verify_delay: f32,
    min_valid_height: f32,
    airborne_tolerance: f32,
}

impl TeleportProtocol {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            timers: TimerQueue::new(),
            pending: [None; BALL_COUNT],
            generation: 0,
            drop_offset: rules.ball_diameter,
            verify_delay: (rules.verify_delay_ms / 1000.0) as f32,
            min_valid_height: rules.min_valid_height,
            airborne_tolerance: rules.airborne_tolerance,
        }
    }

    /// Teleport `ball` to rest on `target`. Returns the position written.
    pub fn teleport(&mut self, bodies: &mut impl BallBodies, ball: BallId, target: Vec3) -> Vec3 {
        let pos = target + Vec3::new(0.0, self.drop_offset, 0.0);
        bodies.sleep(ball);
        bodies.clear_motion(ball);
        bodies.set_position(ball, pos);
        bodies.wake_up(ball);

        if let Some(previous) = self.pending[ball.index()].take() {
            self.timers.cancel(previous);
        }
        let id = self.timers.schedule(
            self.verify_delay,
            Verify { ball, target, generation: self.generation },
        );
        self.pending[ball.index()] = Some(id);
        pos
    }

    /// Run the checks that came due. Failed checks teleport again.
    pub fn tick(&mut self, bodies: &mut impl BallBodies, dt: f32) -> Vec<TeleportCheck> {
        let due = self.timers.tick(dt);
        let mut checks = Vec::with_capacity(due.len());

        for verify in due {
            if verify.generation != self.generation {
                continue;
            }
            self.pending[verify.ball.index()] = None;

            let y = bodies.position(verify.ball).y;
            if self.is_valid_height(y, verify.target) {
                log::debug!("ball {} teleport landed at y={:.3}", verify.ball.number(), y);
                checks.push(TeleportCheck::Landed(verify.ball));
            } else {
                log::warn!("ball {} teleport failed (y={:.3}), retransmitting", verify.ball.number(), y);
                self.teleport(bodies, verify.ball, verify.target);
                checks.push(TeleportCheck::Retried(verify.ball));
            }
        }
        checks
    }

    fn is_valid_height(&self, y: f32, target: Vec3) -> bool {
        y >= self.min_valid_height && y <= target.y + self.drop_offset + self.airborne_tolerance
    }

    pub fn is_pending(&self, ball: BallId) -> bool {
        self.pending[ball.index()].is_some_and(|id| self.timers.contains(id))
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Drop every pending check; anything scheduled before now is stale.
    pub fn cancel_all(&mut self) {
        if self.pending_count() > 0 {
            log::debug!("dropping {} pending teleport checks", self.pending_count());
        }
        self.generation = self.generation.wrapping_add(1);
        self.timers.clear();
        self.pending = [None; BALL_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::testing::FakeTable;

    fn protocol() -> TeleportProtocol {
        TeleportProtocol::new(&RulesConfig::default())
    }

    #[test]
    fn teleport_zeroes_motion_and_lifts_by_diameter() {
        let mut table = FakeTable::new();
        let mut tp = protocol();
        let ball = FakeTable::ball(3);
        table.set_moving(ball, Vec3::new(2.0, -1.0, 0.5));
        table.bodies[3].angular = Vec3::new(4.0, 0.0, 4.0);

        let target = Vec3::new(-1.25, 0.4, -1.25);
        let pos = tp.teleport(&mut table, ball, target);

        assert_eq!(pos, target + Vec3::new(0.0, 0.057, 0.0));
        assert_eq!(table.position(ball), pos);
        assert_eq!(table.linear_velocity(ball), Vec3::ZERO);
        assert_eq!(table.angular_velocity(ball), Vec3::ZERO);
        assert!(!table.body(ball).sleeping);
        assert!(tp.is_pending(ball));
    }

    #[test]
    fn verification_waits_for_delay() {
        let mut table = FakeTable::new();
        let mut tp = protocol();
        let ball = FakeTable::ball(1);
        tp.teleport(&mut table, ball, Vec3::ZERO);

        for _ in 0..59 {
            assert!(tp.tick(&mut table, 1.0 / 60.0).is_empty());
        }
        let checks = tp.tick(&mut table, 2.0 / 60.0);
        assert_eq!(checks, vec![TeleportCheck::Landed(ball)]);
        assert!(!tp.is_pending(ball));
    }

    #[test]
    fn fallen_ball_is_retried() {
        let mut table = FakeTable::new();
        let mut tp = protocol();
        let ball = FakeTable::ball(9);
        let target = Vec3::new(0.0, 0.057, 0.0);
        tp.teleport(&mut table, ball, target);

        table.drift(ball, Vec3::new(0.0, -3.0, 0.0));
        let checks = tp.tick(&mut table, 1.0);

        assert_eq!(checks, vec![TeleportCheck::Retried(ball)]);
        assert_eq!(table.position(ball), target + Vec3::new(0.0, 0.057, 0.0));
        assert!(tp.is_pending(ball));
    }

    #[test]
    fn airborne_ball_is_retried() {
        let mut table = FakeTable::new();
        let mut tp = protocol();
        let ball = FakeTable::ball(2);
        tp.teleport(&mut table, ball, Vec3::ZERO);
        table.drift(ball, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(tp.tick(&mut table, 1.0), vec![TeleportCheck::Retried(ball)]);
    }

    #[test]
    fn re_teleport_replaces_pending_check() {
        let mut table = FakeTable::new();
        let mut tp = protocol();
        let ball = FakeTable::ball(4);
        tp.teleport(&mut table, ball, Vec3::ZERO);
        tp.tick(&mut table, 0.5);
        tp.teleport(&mut table, ball, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tp.pending_count(), 1);

        // The first check would have fired here.
        assert!(tp.tick(&mut table, 0.6).is_empty());
        assert_eq!(tp.tick(&mut table, 0.5), vec![TeleportCheck::Landed(ball)]);
    }

    #[test]
    fn cancel_all_drops_stale_checks() {
        let mut table = FakeTable::new();
        let mut tp = protocol();
        let ball = FakeTable::ball(6);
        tp.teleport(&mut table, ball, Vec3::ZERO);
        table.drift(ball, Vec3::new(0.0, -5.0, 0.0));

        tp.cancel_all();
        assert!(!tp.is_pending(ball));
        assert_eq!(tp.pending_count(), 0);
        assert!(tp.tick(&mut table, 2.0).is_empty());
        // Nothing re-teleported the ball.
        assert_eq!(table.position(ball).y, -5.0);
    }
}
