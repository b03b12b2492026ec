use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::pool::ball::BallId;
use crate::pool::bodies::BallBodies;
use crate::pool::config::RulesConfig;

/// Which view the host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    #[default]
    Perspective,
    TopDown,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Perspective => CameraMode::TopDown,
            CameraMode::TopDown => CameraMode::Perspective,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementDirection {
    /// -x
    Left,
    /// +x
    Right,
    /// -z
    Up,
    /// +z
    Down,
}

/// Hand placement of the cue ball behind the head string after a scratch
/// or for the break. The ball sleeps while placed; its position is written
/// directly each tick and clamped to the region.
#[derive(Debug, Clone)]
pub struct CueBallPlacement {
    active: bool,
    held: [bool; 4],
    speed: f32,
    min: Vec2,
    max: Vec2,
}

impl CueBallPlacement {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            active: false,
            held: [false; 4],
            speed: rules.placement_speed,
            min: rules.placement_min,
            max: rules.placement_max,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enter placement with the cue ball already moved to its spot.
    pub fn begin(&mut self, bodies: &mut impl BallBodies) -> CameraMode {
        bodies.sleep(BallId::CUE);
        self.active = true;
        self.held = [false; 4];
        CameraMode::TopDown
    }

    pub fn set_held(&mut self, direction: PlacementDirection, held: bool) {
        self.held[direction as usize] = held;
    }

    /// Move by the held directions and clamp into the region.
    pub fn tick(&mut self, bodies: &mut impl BallBodies) {
        if !self.active {
            return;
        }
        let mut pos = bodies.position(BallId::CUE);
        if self.held[PlacementDirection::Left as usize] {
            pos.x -= self.speed;
        }
        if self.held[PlacementDirection::Right as usize] {
            pos.x += self.speed;
        }
        if self.held[PlacementDirection::Up as usize] {
            pos.z -= self.speed;
        }
        if self.held[PlacementDirection::Down as usize] {
            pos.z += self.speed;
        }
        let clamped = Vec3::new(
            pos.x.clamp(self.min.x, self.max.x),
            pos.y,
            pos.z.clamp(self.min.y, self.max.y),
        );
        bodies.set_position(BallId::CUE, clamped);
        bodies.clear_motion(BallId::CUE);
    }

    /// Drop the ball where it is. `None` when not placing.
    pub fn confirm(&mut self, bodies: &mut impl BallBodies) -> Option<CameraMode> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.held = [false; 4];
        bodies.wake_up(BallId::CUE);
        Some(CameraMode::Perspective)
    }

    /// Leave placement without confirming (session reset).
    pub fn cancel(&mut self) {
        self.active = false;
        self.held = [false; 4];
    }
}
