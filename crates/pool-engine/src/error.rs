use thiserror::Error;

/// Failures at the few fallible entry points of the game core.
///
/// Rule violations (premature 8 ball, scratches, opponent sinks) are game
/// outcomes, not errors, and never surface here.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("player count must be 1 or 2, got {0}")]
    InvalidPlayerCount(u8),

    #[error("pocket must be in 1..=6, got {0}")]
    InvalidPocket(u8),

    #[error("ball number must be in 0..=15, got {0}")]
    InvalidBall(u8),

    #[error("invalid rules config: {0}")]
    Config(#[from] serde_json::Error),
}
