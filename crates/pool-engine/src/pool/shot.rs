use glam::Vec3;

use crate::pool::config::RulesConfig;

/// Cue aim and power charge.
///
/// Power sweeps up and down between the bounds while charging (a triangle
/// wave), so letting go at the right moment is part of the shot. Release
/// turns the aim yaw into a horizontal impulse on the cue ball.
#[derive(Debug, Clone)]
pub struct ShotController {
    power: f32,
    power_min: f32,
    power_max: f32,
    power_rate: f32,
    rising: bool,
    charging: bool,
    in_flight: bool,

    yaw: f32,
    aim_step: f32,
    aim_left: bool,
    aim_right: bool,
}

impl ShotController {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            power: rules.power_min,
            power_min: rules.power_min,
            power_max: rules.power_max,
            power_rate: rules.power_rate,
            rising: true,
            charging: false,
            in_flight: false,
            yaw: rules.default_yaw,
            aim_step: rules.aim_step,
            aim_left: false,
            aim_right: false,
        }
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// A released shot whose balls have not come to rest yet.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Unit aim direction on the table plane: (0, 0, -1) turned by yaw about +Y.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Start charging. `can_shoot` carries the session's gate.
    pub fn charge_start(&mut self, can_shoot: bool) -> bool {
        if !can_shoot || self.in_flight || self.charging {
            return false;
        }
        self.charging = true;
        self.rising = true;
        self.power = self.power_min;
        true
    }

    /// Advance the power sweep. The bar freezes while anything is moving.
    pub fn charge_tick(&mut self, dt: f32, all_stationary: bool) {
        if !self.charging || !all_stationary {
            return;
        }
        let delta = self.power_rate * dt;
        if self.rising {
            self.power += delta;
            if self.power >= self.power_max {
                self.power = self.power_max;
                self.rising = false;
            }
        } else {
            self.power -= delta;
            if self.power <= self.power_min {
                self.power = self.power_min;
                self.rising = true;
            }
        }
    }

    /// Let go. Returns the impulse to apply when the shot is allowed.
    pub fn release(&mut self, can_shoot: bool) -> Option<Vec3> {
        if !self.charging {
            return None;
        }
        self.charging = false;
        if !can_shoot || self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(self.direction() * self.power)
    }

    pub fn cancel_charge(&mut self) {
        self.charging = false;
        self.power = self.power_min;
    }

    /// Called once per tick after the settle pass, before input.
    pub fn observe_settle(&mut self, all_stationary: bool) {
        if all_stationary {
            self.in_flight = false;
        }
    }

    pub fn aim_left(&mut self, held: bool) {
        self.aim_left = held;
    }

    pub fn aim_right(&mut self, held: bool) {
        self.aim_right = held;
    }

    /// Rotate by one step per held key.
    pub fn aim_tick(&mut self) {
        if self.aim_left {
            self.yaw += self.aim_step;
        }
        if self.aim_right {
            self.yaw -= self.aim_step;
        }
    }

    pub fn reset(&mut self, rules: &RulesConfig) {
        *self = Self::new(rules);
    }
}
