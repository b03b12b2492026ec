use pool_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue,
    FixedTimestep, ProtocolLayout, TransformBuffer,
    build_transform_buffer,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Handed to every fixed step after the first in a frame, so one-shot
    /// input (button presses, custom events) is seen exactly once.
    no_input: InputQueue,
    transforms: TransformBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    /// Flat buffer of sound event IDs for SharedArrayBuffer reads.
    sound_buffer: Vec<u8>,
    /// Outbox lengths at the last publish; retired at the start of the next tick.
    published_sounds: usize,
    published_events: usize,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps);
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::with_config(&config),
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            transforms: TransformBuffer::with_capacity(config.max_transforms),
            timestep,
            layout,
            sound_buffer: Vec::with_capacity(config.max_sounds),
            config,
            initialized: false,
            published_sounds: 0,
            published_events: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        build_transform_buffer(self.ctx.scene.iter(), &mut self.transforms);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: per fixed step, physics then game update; then
    /// rebuild the transform and sound buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Only what the host has seen goes; init and settings reloads emit
        // between ticks and must reach the next frame.
        self.ctx.retire_frame_data(self.published_sounds, self.published_events);

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            #[cfg(feature = "physics")]
            self.ctx.step_physics();

            let input = if step == 0 { &self.input } else { &self.no_input };
            self.game.update(&mut self.ctx, input);
        }

        // Input that arrived on a frame with no step waits for the next one.
        if steps > 0 {
            self.input.drain();
        }

        build_transform_buffer(self.ctx.scene.iter(), &mut self.transforms);

        self.ctx.events.truncate(self.config.max_events);
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }
        self.published_sounds = self.ctx.sounds.len();
        self.published_events = self.ctx.events.len();
    }

    /// Forward a JSON settings override to the game.
    pub fn load_settings(&mut self, json: &str) -> bool {
        match self.game.load_settings(&mut self.ctx, json) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("rejected settings: {}", err);
                false
            }
        }
    }

    pub fn state_json(&self) -> String {
        self.game.state_json().unwrap_or_else(|| "{}".to_owned())
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr()
    }

    pub fn transform_count(&self) -> u32 {
        self.transforms.count()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_transforms(&self) -> u32 {
        self.layout.max_transforms as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
