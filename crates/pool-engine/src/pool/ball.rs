use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::PoolError;

/// Cue ball plus fifteen object balls.
pub const BALL_COUNT: usize = 16;

/// Rack slot that always holds the 8 ball (centre of the third row).
pub const EIGHT_BALL_SLOT: usize = 4;

/// Ball identity: `0` is the cue ball, `1..=15` the numbered balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BallId(u8);

impl BallId {
    pub const CUE: BallId = BallId(0);
    pub const EIGHT: BallId = BallId(8);

    pub fn new(number: u8) -> Result<Self, PoolError> {
        if (number as usize) < BALL_COUNT {
            Ok(Self(number))
        } else {
            Err(PoolError::InvalidBall(number))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_cue(self) -> bool {
        self == Self::CUE
    }

    pub fn is_eight(self) -> bool {
        self == Self::EIGHT
    }

    /// Group the ball belongs to. Cue and 8 belong to neither.
    pub fn group(self) -> Group {
        match self.0 {
            1..=7 => Group::Solids,
            9..=15 => Group::Stripes,
            _ => Group::Unassigned,
        }
    }

    /// Every ball, cue first.
    pub fn all() -> impl Iterator<Item = BallId> {
        (0..BALL_COUNT as u8).map(BallId)
    }

    /// Balls 1 through 15.
    pub fn numbered() -> impl Iterator<Item = BallId> {
        (1..BALL_COUNT as u8).map(BallId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    #[default]
    Unassigned,
    Solids,
    Stripes,
}

impl Group {
    pub fn opposite(self) -> Group {
        match self {
            Group::Solids => Group::Stripes,
            Group::Stripes => Group::Solids,
            Group::Unassigned => Group::Unassigned,
        }
    }

    /// Balls that make up this group.
    pub fn balls(self) -> impl Iterator<Item = BallId> {
        let range = match self {
            Group::Solids => 1..8,
            Group::Stripes => 9..16,
            Group::Unassigned => 0..0,
        };
        range.map(BallId)
    }

    pub fn label(self) -> &'static str {
        match self {
            Group::Solids => "solids",
            Group::Stripes => "stripes",
            Group::Unassigned => "unassigned",
        }
    }
}

/// The fifteen rack slots: five rows, row `r` holding `r + 1` balls, the
/// apex slot first. Rows step back along -x at equilateral spacing.
pub fn rack_slots(apex: Vec3, radius: f32) -> Vec<Vec3> {
    let row_step = radius * 2.0 * (std::f32::consts::PI / 3.0).sin();
    let mut slots = Vec::with_capacity(BALL_COUNT - 1);
    for row in 0..5 {
        let count = row + 1;
        let x = apex.x - row as f32 * row_step;
        let z_start = apex.z - (count - 1) as f32 * radius;
        for i in 0..count {
            slots.push(Vec3::new(x, apex.y, z_start + i as f32 * radius * 2.0));
        }
    }
    slots
}

/// Shuffled rack positions for balls 1..=15. The 8 ball always takes the
/// centre slot; every other ball gets a random remaining slot.
pub fn rack_layout<R: Rng + ?Sized>(apex: Vec3, radius: f32, rng: &mut R) -> Vec<(BallId, Vec3)> {
    let slots = rack_slots(apex, radius);
    let mut free: Vec<usize> = (0..slots.len()).filter(|&s| s != EIGHT_BALL_SLOT).collect();
    free.shuffle(rng);

    let mut free = free.into_iter();
    BallId::numbered()
        .filter_map(|ball| {
            let slot = if ball.is_eight() { Some(EIGHT_BALL_SLOT) } else { free.next() };
            slot.map(|s| (ball, slots[s]))
        })
        .collect()
}
