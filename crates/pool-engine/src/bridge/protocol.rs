/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Transforms: max_transforms × 8 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::bridge::transform::BodyTransform;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_TRANSFORMS: usize = 2;
pub const HEADER_TRANSFORM_COUNT: usize = 3;
pub const HEADER_MAX_SOUNDS: usize = 4;
pub const HEADER_SOUND_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_PROTOCOL_VERSION: usize = 8;
/// 9..16 reserved.

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats per body transform: key, x, y, z, qx, qy, qz, qw.
pub const TRANSFORM_FLOATS: usize = BodyTransform::FLOATS;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_transforms: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub transform_data_floats: usize,
    pub sound_data_floats: usize,
    pub event_data_floats: usize,

    pub transform_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_transforms: usize, max_sounds: usize, max_events: usize) -> Self {
        let transform_data_floats = max_transforms * TRANSFORM_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let transform_data_offset = HEADER_FLOATS;
        let sound_data_offset = transform_data_offset + transform_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_transforms,
            max_sounds,
            max_events,
            transform_data_floats,
            sound_data_floats,
            event_data_floats,
            transform_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_transforms, config.max_sounds, config.max_events)
    }

    /// Header values the host reads once at init.
    pub fn header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_MAX_TRANSFORMS] = self.max_transforms as f32;
        header[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header
    }
}
