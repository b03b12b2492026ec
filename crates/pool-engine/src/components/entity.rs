use glam::{Quat, Vec3};
use crate::api::types::EntityId;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// Fat Entity: a single struct with optional components.
/// Positions are mirrored from physics every step; the host renderer reads
/// them (via the transform buffer) to place its meshes.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name ("ball_0", "pocket_3", "rail").
    pub tag: String,
    /// Whether this entity is active (inactive entities are not synced).
    pub active: bool,
    /// Position in world space (Y up).
    pub pos: Vec3,
    /// Orientation in world space.
    pub rotation: Quat,
    /// Key the host uses to find the matching mesh. `None` = not synced.
    pub sync_key: Option<u32>,
    /// Physics body (requires the "physics" feature).
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            sync_key: None,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_sync_key(mut self, key: u32) -> Self {
        self.sync_key = Some(key);
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
