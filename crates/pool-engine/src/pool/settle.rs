use glam::Vec3;

use crate::pool::ball::BallId;
use crate::pool::bodies::BallBodies;

/// True when no ball moves faster than `threshold` on either horizontal
/// axis, linear or angular. Vertical components are ignored: a ball settling
/// into its pocket bin still counts as at rest.
pub fn is_stationary<I>(velocities: I, threshold: f32) -> bool
where
    I: IntoIterator<Item = (Vec3, Vec3)>,
{
    velocities.into_iter().all(|(linear, angular)| {
        linear.x.abs() <= threshold
            && linear.z.abs() <= threshold
            && angular.x.abs() <= threshold
            && angular.z.abs() <= threshold
    })
}

/// Samples every ball once per tick and remembers whether the table is at rest.
#[derive(Debug, Clone)]
pub struct SettlingMonitor {
    threshold: f32,
    all_stationary: bool,
}

impl SettlingMonitor {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            all_stationary: true,
        }
    }

    pub fn update(&mut self, bodies: &impl BallBodies) -> bool {
        self.all_stationary = is_stationary(
            BallId::all().map(|b| (bodies.linear_velocity(b), bodies.angular_velocity(b))),
            self.threshold,
        );
        self.all_stationary
    }

    pub fn all_stationary(&self) -> bool {
        self.all_stationary
    }
}
