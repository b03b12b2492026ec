use glam::Vec3;
use pool_engine::*;

use crate::table::{Contact, Table};

/// Custom event kinds sent from the UI layer.
pub mod events {
    /// a = player count (1 or 2).
    pub const START: u32 = 1;
    pub const RESET: u32 = 2;
    /// a = pocket number (1..=6).
    pub const CALL_POCKET: u32 = 3;
    pub const CONFIRM_PLACEMENT: u32 = 4;
    pub const TOGGLE_CAMERA: u32 = 5;
}

/// `KeyboardEvent.keyCode` values the game listens for.
mod keys {
    pub const ENTER: u32 = 13;
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const V: u32 = 86;
}

/// 4 substeps x 60 Hz keeps fast breaks from tunnelling through the rails.
const PHYSICS_SUBSTEPS: u32 = 4;

pub struct PortalPool {
    session: GameSession,
    table: Option<Table>,
}

impl PortalPool {
    pub fn new() -> Self {
        Self {
            session: GameSession::with_log(RulesConfig::default()),
            table: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn handle_key(&mut self, bodies: &mut EngineBodies<'_>, key_code: u32, down: bool) {
        let session = &mut self.session;
        match key_code {
            keys::A => session.aim_left(down),
            keys::D => session.aim_right(down),
            keys::SPACE if down => {
                session.charge_start();
            }
            keys::SPACE => {
                session.release(bodies);
            }
            keys::LEFT => session.set_placement_key(PlacementDirection::Left, down),
            keys::RIGHT => session.set_placement_key(PlacementDirection::Right, down),
            keys::UP => session.set_placement_key(PlacementDirection::Up, down),
            keys::DOWN => session.set_placement_key(PlacementDirection::Down, down),
            keys::ENTER if down => {
                session.confirm_placement(bodies);
            }
            keys::V if down => session.toggle_camera(),
            _ => {}
        }
    }

    fn handle_custom(&mut self, bodies: &mut EngineBodies<'_>, kind: u32, a: f32) {
        let session = &mut self.session;
        match kind {
            events::START => {
                if let Err(err) = session.start_game(bodies, a as u8) {
                    log::warn!("start ignored: {}", err);
                }
            }
            events::RESET => session.reset(bodies),
            events::CALL_POCKET => {
                if let Err(err) = session.call_pocket(a as u8) {
                    log::warn!("pocket call ignored: {}", err);
                }
            }
            events::CONFIRM_PLACEMENT => {
                session.confirm_placement(bodies);
            }
            events::TOGGLE_CAMERA => session.toggle_camera(),
            other => log::debug!("unknown custom event {}", other),
        }
    }

    /// Forward session notifications to the host outboxes.
    fn flush_events(&mut self, ctx: &mut EngineContext) {
        for event in self.session.drain_events() {
            match event {
                SessionEvent::Sound(sound) => ctx.emit_sound(sound),
                other => {
                    if let Some(game_event) = other.as_game_event() {
                        ctx.emit_event(game_event);
                    }
                }
            }
        }
    }
}

impl Default for PortalPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for PortalPool {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            physics_substeps: PHYSICS_SUBSTEPS,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let table = Table::build(ctx, self.session.rules());
        self.session.reset(&mut EngineBodies::new(ctx, &table.balls));
        self.table = Some(table);
        self.flush_events(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let Some(table) = self.table.take() else {
            return;
        };

        let contacts: Vec<Contact> = ctx
            .collisions()
            .iter()
            .filter_map(|pair| table.classify(pair))
            .collect();

        let dt = ctx.fixed_dt();
        {
            let mut bodies = EngineBodies::new(ctx, &table.balls);

            for contact in contacts {
                match contact {
                    Contact::Pocket(pocket, ball) => {
                        self.session.on_pocket_contact(&mut bodies, pocket, ball)
                    }
                    Contact::Floor(ball) => self.session.on_floor_contact(&mut bodies, ball),
                }
            }

            for event in input.iter() {
                match *event {
                    InputEvent::KeyDown { key_code } => self.handle_key(&mut bodies, key_code, true),
                    InputEvent::KeyUp { key_code } => self.handle_key(&mut bodies, key_code, false),
                    InputEvent::Custom { kind, a, .. } => self.handle_custom(&mut bodies, kind, a),
                }
            }

            self.session.tick(&mut bodies, dt);
        }

        self.table = Some(table);
        self.flush_events(ctx);
    }

    fn load_settings(&mut self, ctx: &mut EngineContext, json: &str) -> Result<(), PoolError> {
        let rules = RulesConfig::from_json(json)?;
        log::info!("loaded rules override");
        self.session.set_rules(rules);
        if let Some(table) = &self.table {
            self.session.reset(&mut EngineBodies::new(ctx, &table.balls));
        }
        self.flush_events(ctx);
        Ok(())
    }

    fn state_json(&self) -> Option<String> {
        match self.session.snapshot_json() {
            Ok(json) => Some(json),
            Err(err) => {
                log::warn!("snapshot failed: {}", err);
                None
            }
        }
    }
}
