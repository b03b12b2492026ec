use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry3<f32>) -> (Vec3, Quat) {
    let pos = na_to_vec3(&iso.translation.vector);
    let q = iso.rotation.coords;
    (pos, Quat::from_xyzw(q.x, q.y, q.z, q.w))
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
    KinematicPositionBased,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Upright cylinder along the Y axis. Pocket and floor triggers use this.
    Cylinder { half_height: f32, radius: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderDesc::Cylinder { half_height, radius } => {
                ColliderBuilder::cylinder(half_height, radius)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity_scale: f32,
    pub ccd: bool,
    pub collider: ColliderDesc,
    /// Trigger volume: reports contacts, produces no collision response.
    pub sensor: bool,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            ccd: false,
            collider,
            sensor: false,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity_scale: 0.0,
            ccd: false,
            collider,
            sensor: false,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// A fixed trigger volume (pocket portal, floor catcher).
    pub fn trigger(collider: ColliderDesc) -> Self {
        Self::fixed(collider).with_sensor(true)
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set the linear damping (velocity decay). Stands in for rolling
    /// resistance on the felt.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// If either side is `id`, return the other side.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        self.collisions
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier3D boilerplate into a single struct.
/// Y is up; the table surface sits at y = 0.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector
    /// (e.g. `Vec3::new(0.0, -9.81, 0.0)`).
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = vec3_to_na(gravity);
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec3_to_na(desc.position))
            .linvel(vec3_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .sensor(desc.sensor)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        // Resolve collider handles → body handles → entity IDs
        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            let entity_a = self.collider_to_entity(h1);
            let entity_b = self.collider_to_entity(h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Apply an instantaneous impulse to a body.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec3_to_na(impulse), true);
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec3_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(vec3_to_na(angvel), true);
        }
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.angvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Zero linear/angular velocity, drop any accumulated force and torque,
    /// and rebuild mass and inertia from the attached colliders.
    /// Does not wake the body.
    pub fn clear_motion(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(nalgebra::Vector3::zeros(), false);
            rb.set_angvel(nalgebra::Vector3::zeros(), false);
            rb.reset_forces(false);
            rb.reset_torques(false);
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }
    }

    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies.get(body.body_handle).map(|rb| rb.mass()).unwrap_or(0.0)
    }

    /// Move a body without waking it.
    pub fn set_translation(&mut self, body: &PhysicsBody, pos: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec3_to_na(pos), false);
        }
    }

    /// Put a body to sleep: the solver stops integrating it until woken.
    pub fn sleep(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.sleep();
        }
    }

    pub fn wake_up(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.wake_up(true);
        }
    }

    pub fn is_sleeping(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_sleeping())
            .unwrap_or(false)
    }

    /// Get the current position and orientation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec3, Quat) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec3::ZERO, Quat::IDENTITY))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the body's collider is a trigger volume.
    pub fn is_sensor(&self, body: &PhysicsBody) -> bool {
        self.colliders
            .get(body.collider_handle)
            .map(|c| c.is_sensor())
            .unwrap_or(false)
    }

    // -- private helpers --

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
