use crate::core::scene::Scene;
use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::input::queue::InputQueue;
use crate::error::PoolError;
use glam::Vec3;
#[cfg(feature = "physics")]
use crate::core::physics::{
    PhysicsWorld, BodyDesc, ColliderMaterial, CollisionPair,
};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Physics sub-steps per fixed tick (default: 1).
    pub physics_substeps: u32,
    /// Upper bound on fixed ticks per frame before the accumulator is dropped.
    pub max_steps: u32,
    /// Maximum number of body transforms written per frame (default: 64).
    pub max_transforms: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector, Y up. Default: standard earth gravity.
    pub gravity: Vec3,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            physics_substeps: 1,
            max_steps: 10,
            max_transforms: 64,
            max_sounds: 32,
            max_events: 32,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Runs after the physics step of the same tick,
    /// so `ctx.collisions()` holds this tick's contacts.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply a JSON settings override from the host.
    fn load_settings(&mut self, _ctx: &mut EngineContext, _json: &str) -> Result<(), PoolError> {
        Ok(())
    }

    /// JSON view of the game state for the host UI.
    fn state_json(&self) -> Option<String> {
        None
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    next_id: u32,
    fixed_dt: f32,
    #[cfg(feature = "physics")]
    substeps: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    /// Create an EngineContext from the game's configuration.
    pub fn with_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let substeps = config.physics_substeps.max(1);
        #[cfg(feature = "physics")]
        let mut physics = PhysicsWorld::new(config.gravity);
        #[cfg(feature = "physics")]
        physics.set_dt(config.fixed_dt / substeps as f32);

        Self {
            scene: Scene::new(),
            sounds: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            fixed_dt: config.fixed_dt,
            #[cfg(feature = "physics")]
            substeps,
            #[cfg(feature = "physics")]
            physics,
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Emit a sound event to be forwarded to TypeScript.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drop the first `sounds` sounds and `events` events, which the host
    /// has already read. Anything emitted after that frame was published
    /// (e.g. by a settings reload between ticks) stays queued.
    pub fn retire_frame_data(&mut self, sounds: usize, events: usize) {
        self.sounds.drain(..sounds.min(self.sounds.len()));
        self.events.drain(..events.min(self.events.len()));
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    #[cfg(feature = "physics")]
    fn body(&self, id: EntityId) -> Option<crate::core::physics::PhysicsBody> {
        self.scene.get(id).and_then(|e| e.body)
    }

    /// Apply an instantaneous impulse to an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec3) {
        if let Some(body) = self.body(id) {
            self.physics.apply_impulse(&body, impulse);
        }
    }

    /// Set the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec3) {
        if let Some(body) = self.body(id) {
            self.physics.set_velocity(&body, vel);
        }
    }

    /// Get the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Vec3 {
        self.body(id)
            .map(|body| self.physics.velocity(&body))
            .unwrap_or(Vec3::ZERO)
    }

    #[cfg(feature = "physics")]
    pub fn angular_velocity(&self, id: EntityId) -> Vec3 {
        self.body(id)
            .map(|body| self.physics.angular_velocity(&body))
            .unwrap_or(Vec3::ZERO)
    }

    /// Current body position, read straight from the physics world.
    #[cfg(feature = "physics")]
    pub fn position(&self, id: EntityId) -> Vec3 {
        match self.body(id) {
            Some(body) => self.physics.body_position(&body).0,
            None => self.scene.get(id).map(|e| e.pos).unwrap_or(Vec3::ZERO),
        }
    }

    /// Move a body without waking it. The entity mirror is updated immediately.
    #[cfg(feature = "physics")]
    pub fn set_position(&mut self, id: EntityId, pos: Vec3) {
        if let Some(body) = self.body(id) {
            self.physics.set_translation(&body, pos);
        }
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
        }
    }

    /// Zero linear and angular velocity plus accumulated forces.
    #[cfg(feature = "physics")]
    pub fn clear_motion(&mut self, id: EntityId) {
        if let Some(body) = self.body(id) {
            self.physics.clear_motion(&body);
        }
    }

    #[cfg(feature = "physics")]
    pub fn sleep(&mut self, id: EntityId) {
        if let Some(body) = self.body(id) {
            self.physics.sleep(&body);
        }
    }

    #[cfg(feature = "physics")]
    pub fn wake_up(&mut self, id: EntityId) {
        if let Some(body) = self.body(id) {
            self.physics.wake_up(&body);
        }
    }

    /// Get collision events from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation one fixed tick and sync poses back to entities.
    /// Called by the game runner before `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        for _ in 0..self.substeps {
            self.physics.step_into(&mut self.collision_events);
        }

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retire_keeps_data_emitted_after_publish() {
        let mut ctx = EngineContext::new();
        ctx.emit_sound(SoundEvent(1));
        ctx.emit_event(GameEvent::new(1, 0.0, 0.0, 0.0));
        // Published here; then a reload emits more before the next tick.
        ctx.emit_event(GameEvent::new(2, 0.0, 0.0, 0.0));

        ctx.retire_frame_data(1, 1);
        assert!(ctx.sounds.is_empty());
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].kind, 2.0);

        // Counts larger than what is queued just empty the outbox.
        ctx.retire_frame_data(5, 5);
        assert!(ctx.events.is_empty());
    }
}
