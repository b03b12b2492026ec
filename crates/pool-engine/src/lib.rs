pub mod api;
pub mod core;
pub mod components;
pub mod bridge;
pub mod input;
pub mod pool;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::timer::{TimerId, TimerQueue};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::transform::{BodyTransform, TransformBuffer, build_transform_buffer};
pub use error::PoolError;

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
};

pub use pool::ball::{BallId, Group, BALL_COUNT};
pub use pool::bodies::{BallBodies, BallMap};
#[cfg(feature = "physics")]
pub use pool::bodies::EngineBodies;
pub use pool::config::{RulesConfig, BALL_DIAMETER, BALL_MASS, TABLE_LENGTH, TABLE_WIDTH};
pub use pool::placement::{CameraMode, PlacementDirection};
pub use pool::pocket::{PocketId, BallSunk, PocketEventRouter};
pub use pool::session::{
    GameSession, SessionEvent, SessionSnapshot, Mode,
    SOUND_TELEPORT, SOUND_CUE_HIT,
    EVENT_STATE_CHANGED, EVENT_WINNER, EVENT_SOLO_FINISHED, EVENT_CAMERA,
};
pub use pool::status::{StatusSink, LogStatus};
pub use pool::turn::{Player, TableState, TurnState};
