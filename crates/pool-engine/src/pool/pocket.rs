use serde::Serialize;

use crate::error::PoolError;
use crate::pool::ball::{BallId, BALL_COUNT};

pub const POCKET_COUNT: u8 = 6;

/// Pocket number. `1 2 3` run along one long rail, `6 5 4` along the other,
/// so 1 faces 6 and 3 faces 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PocketId(u8);

impl PocketId {
    pub fn new(number: u8) -> Result<Self, PoolError> {
        if (1..=POCKET_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(PoolError::InvalidPocket(number))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = PocketId> {
        (1..=POCKET_COUNT).map(PocketId)
    }
}

/// A ball went down a pocket, after duplicate contacts were coalesced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallSunk {
    pub pocket: PocketId,
    pub ball: BallId,
}

/// Coalesces the burst of contact events one physical overlap produces.
///
/// A contact for a ball seen less than `cooldown_ms` after the last accepted
/// one is dropped. One router per trigger family: pockets and the floor each
/// keep their own timestamps.
#[derive(Debug, Clone)]
pub struct PocketEventRouter {
    cooldown_ms: f64,
    last_sink: [Option<f64>; BALL_COUNT],
}

impl PocketEventRouter {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            last_sink: [None; BALL_COUNT],
        }
    }

    /// Accept or drop a raw contact for `ball` at `now_ms`.
    pub fn admit(&mut self, ball: BallId, now_ms: f64) -> bool {
        let slot = &mut self.last_sink[ball.index()];
        if let Some(last) = *slot {
            if now_ms - last < self.cooldown_ms {
                log::debug!("dropping repeat contact for ball {} ({:.0} ms)", ball.number(), now_ms - last);
                return false;
            }
        }
        *slot = Some(now_ms);
        true
    }

    pub fn on_collision(&mut self, pocket: PocketId, ball: BallId, now_ms: f64) -> Option<BallSunk> {
        self.admit(ball, now_ms).then_some(BallSunk { pocket, ball })
    }

    pub fn reset(&mut self) {
        self.last_sink = [None; BALL_COUNT];
    }
}
