use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Regulation ball diameter in metres.
pub const BALL_DIAMETER: f32 = 0.057;
/// Ball mass in kilograms.
pub const BALL_MASS: f32 = 0.17;
pub const TABLE_LENGTH: f32 = 2.24;
pub const TABLE_WIDTH: f32 = TABLE_LENGTH / 2.0;

/// Tunables for the rule core. Every field falls back to its default when
/// missing from a JSON override, so hosts only send what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub ball_diameter: f32,
    /// Window in which repeated contacts of one ball are coalesced.
    pub sink_cooldown_ms: f64,
    /// Delay before a teleported ball's resting height is checked.
    pub verify_delay_ms: f64,
    /// Horizontal speed above which a ball counts as moving.
    pub motion_threshold: f32,

    pub power_min: f32,
    pub power_max: f32,
    /// Power units per second while charging.
    pub power_rate: f32,
    /// Radians of yaw per tick while an aim key is held.
    pub aim_step: f32,
    /// Initial cue yaw; π/2 aims down the table toward the rack.
    pub default_yaw: f32,

    /// Metres per tick while a placement key is held.
    pub placement_speed: f32,
    /// Placement region corners on the (x, z) plane.
    pub placement_min: Vec2,
    pub placement_max: Vec2,

    /// Cue ball break position (resting, before the drop offset).
    pub cue_spot: Vec3,
    /// Front ball of the rack.
    pub rack_apex: Vec3,
    /// Above the ball jail; sunk balls fall into it.
    pub holding_area: Vec3,
    /// Sunk balls drop within this distance of the jail centre on x and z.
    pub holding_spread: f32,
    /// Where escaped or rejected balls are dropped back onto the table.
    pub respot_point: Vec3,
    pub respot_jitter: f32,

    /// A teleported ball below this height has fallen through the world.
    pub min_valid_height: f32,
    /// Allowed height above the drop point before a ball counts as airborne.
    pub airborne_tolerance: f32,

    /// Solo mode only advances on the next ball in order.
    pub strict_solo_order: bool,
    pub seed: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let d = BALL_DIAMETER;
        let r = d / 2.0;
        let placement_len = TABLE_LENGTH / 4.0 * 0.98;
        let placement_center = TABLE_LENGTH - TABLE_LENGTH / 4.0 - 0.5588 / 2.0;
        // Clamp the ball centre, so keep a radius clear of the rails.
        let placement_half_width = TABLE_WIDTH * 0.98 / 2.0 - r;

        Self {
            ball_diameter: d,
            sink_cooldown_ms: 200.0,
            verify_delay_ms: 1000.0,
            motion_threshold: 0.1,
            power_min: 0.05,
            power_max: 0.5,
            power_rate: 0.5,
            aim_step: 0.05,
            default_yaw: std::f32::consts::FRAC_PI_2,
            placement_speed: 0.01,
            placement_min: Vec2::new(placement_center - placement_len / 2.0, -placement_half_width),
            placement_max: Vec2::new(placement_center + placement_len / 2.0 - r, placement_half_width),
            cue_spot: Vec3::new(TABLE_LENGTH / 2.0, r, 0.0),
            rack_apex: Vec3::new(0.0, r, 0.0),
            holding_area: Vec3::new(-1.25, 0.4, -1.25),
            holding_spread: d,
            respot_point: Vec3::new(0.0, d * 2.0, 0.0),
            respot_jitter: 0.01,
            min_valid_height: -2.0 * d,
            airborne_tolerance: 1.0,
            strict_solo_order: false,
            seed: 8,
        }
    }
}

impl RulesConfig {
    pub fn from_json(json: &str) -> Result<Self, PoolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_region_is_behind_head_string() {
        let rules = RulesConfig::default();
        assert!((rules.placement_min.x - 1.1262).abs() < 1e-4);
        assert!((rules.placement_max.x - 1.6465).abs() < 1e-4);
        assert!((rules.placement_max.y - 0.5203).abs() < 1e-4);
        assert_eq!(rules.placement_min.y, -rules.placement_max.y);
    }

    #[test]
    fn placed_cue_ball_clears_the_rails() {
        let rules = RulesConfig::default();
        let r = rules.ball_radius();
        // Felt runs to x = 1.6788 at the foot and z = +-0.56 on the sides.
        assert!(rules.placement_max.y + r <= TABLE_WIDTH / 2.0);
        assert!(rules.placement_min.y - r >= -TABLE_WIDTH / 2.0);
        assert!(rules.placement_max.x + r <= 1.6788);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let rules = RulesConfig::from_json(r#"{ "strict_solo_order": true, "seed": 42 }"#).unwrap();
        assert!(rules.strict_solo_order);
        assert_eq!(rules.seed, 42);
        assert_eq!(rules.sink_cooldown_ms, 200.0);
        assert_eq!(rules.ball_diameter, BALL_DIAMETER);
    }

    #[test]
    fn vectors_parse_as_arrays() {
        let rules = RulesConfig::from_json(r#"{ "holding_area": [1.0, 2.0, 3.0] }"#).unwrap();
        assert_eq!(rules.holding_area, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = RulesConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, PoolError::Config(_)));
    }
}
