use bytemuck::{Pod, Zeroable};

use crate::components::entity::Entity;

/// Per-body pose written to SharedArrayBuffer so the host can move its meshes.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyTransform {
    /// Host mesh key (ball number for balls).
    pub key: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
}

impl BodyTransform {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_entity(key: u32, entity: &Entity) -> Self {
        let q = entity.rotation;
        Self {
            key: key as f32,
            x: entity.pos.x,
            y: entity.pos.y,
            z: entity.pos.z,
            qx: q.x,
            qy: q.y,
            qz: q.z,
            qw: q.w,
        }
    }
}

/// Transforms for every synced entity, rebuilt once per frame.
pub struct TransformBuffer {
    pub transforms: Vec<BodyTransform>,
    capacity: usize,
}

impl TransformBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
    }

    /// Push a transform; silently dropped once the wire capacity is reached.
    pub fn push(&mut self, transform: BodyTransform) -> bool {
        if self.transforms.len() >= self.capacity {
            return false;
        }
        self.transforms.push(transform);
        true
    }

    pub fn count(&self) -> u32 {
        self.transforms.len() as u32
    }

    /// Raw pointer to transform data for SharedArrayBuffer reads.
    pub fn as_ptr(&self) -> *const f32 {
        self.transforms.as_ptr() as *const f32
    }
}

/// Rebuild the buffer from the scene: active entities with a sync key only.
pub fn build_transform_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut TransformBuffer) {
    buffer.clear();
    for entity in entities.filter(|e| e.active) {
        if let Some(key) = entity.sync_key {
            if !buffer.push(BodyTransform::from_entity(key, entity)) {
                log::warn!("transform buffer full, dropping '{}'", entity.tag);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use glam::Vec3;

    #[test]
    fn transform_is_8_floats() {
        assert_eq!(std::mem::size_of::<BodyTransform>(), BodyTransform::STRIDE_BYTES);
    }

    #[test]
    fn only_synced_active_entities_are_written() {
        let mut hidden = Entity::new(EntityId(3)).with_sync_key(2);
        hidden.active = false;
        let entities = vec![
            Entity::new(EntityId(1)).with_sync_key(0).with_pos(Vec3::new(1.12, 0.0285, 0.0)),
            Entity::new(EntityId(2)).with_tag("table_top"),
            hidden,
        ];

        let mut buffer = TransformBuffer::with_capacity(16);
        build_transform_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.count(), 1);
        let floats: &[f32] = bytemuck::cast_slice(&buffer.transforms);
        assert_eq!(&floats[..4], &[0.0, 1.12, 0.0285, 0.0]);
        assert_eq!(floats[7], 1.0); // identity qw
    }

    #[test]
    fn capacity_is_respected() {
        let entities: Vec<_> = (0..4)
            .map(|i| Entity::new(EntityId(i)).with_sync_key(i))
            .collect();
        let mut buffer = TransformBuffer::with_capacity(2);
        build_transform_buffer(entities.iter(), &mut buffer);
        assert_eq!(buffer.count(), 2);
    }
}
