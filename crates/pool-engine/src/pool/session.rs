use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::api::types::{GameEvent, SoundEvent};
use crate::error::PoolError;
use crate::pool::ball::{rack_layout, BallId, Group};
use crate::pool::bodies::BallBodies;
use crate::pool::config::RulesConfig;
use crate::pool::placement::{CameraMode, CueBallPlacement, PlacementDirection};
use crate::pool::pocket::{BallSunk, PocketEventRouter, PocketId};
use crate::pool::settle::SettlingMonitor;
use crate::pool::shot::ShotController;
use crate::pool::solo::SoloState;
use crate::pool::status::{LogStatus, StatusSink};
use crate::pool::teleport::{TeleportCheck, TeleportProtocol};
use crate::pool::turn::{park, Directive, Player, TableState, TurnState};

/// Host sound ids.
pub const SOUND_TELEPORT: SoundEvent = SoundEvent(1);
pub const SOUND_CUE_HIT: SoundEvent = SoundEvent(2);

/// Host event kinds (`GameEvent::kind`).
pub const EVENT_STATE_CHANGED: u32 = 1;
/// a = winning player.
pub const EVENT_WINNER: u32 = 2;
/// a = elapsed seconds.
pub const EVENT_SOLO_FINISHED: u32 = 3;
/// a = 0 perspective, 1 top-down.
pub const EVENT_CAMERA: u32 = 4;

/// Notifications for the host, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Sound(SoundEvent),
    Camera(CameraMode),
    StateChanged,
    Winner(Player),
    SoloFinished { elapsed_ms: f64 },
}

impl SessionEvent {
    pub fn as_game_event(&self) -> Option<GameEvent> {
        match *self {
            SessionEvent::Sound(_) => None,
            SessionEvent::Camera(mode) => {
                let top_down = if mode == CameraMode::TopDown { 1.0 } else { 0.0 };
                Some(GameEvent::new(EVENT_CAMERA, top_down, 0.0, 0.0))
            }
            SessionEvent::StateChanged => Some(GameEvent::new(EVENT_STATE_CHANGED, 0.0, 0.0, 0.0)),
            SessionEvent::Winner(player) => {
                Some(GameEvent::new(EVENT_WINNER, player.number() as f32, 0.0, 0.0))
            }
            SessionEvent::SoloFinished { elapsed_ms } => {
                Some(GameEvent::new(EVENT_SOLO_FINISHED, (elapsed_ms / 1000.0) as f32, 0.0, 0.0))
            }
        }
    }
}

/// Which rule set is running.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Before a game is started: sinks park balls, nothing is scored.
    Practice,
    Solo(SoloState),
    Duel(TurnState),
}

/// Serializable view of the session for the host UI.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: &'static str,
    pub current_player: Option<u8>,
    pub groups: [Group; 2],
    pub sunk: [Vec<BallId>; 2],
    pub table_state: Option<TableState>,
    pub called_pocket: Option<PocketId>,
    pub next_ball: Option<u8>,
    pub elapsed_ms: Option<f64>,
    pub winner: Option<u8>,
    pub placing: bool,
    pub all_stationary: bool,
    pub power: f32,
    pub camera: CameraMode,
    pub status: String,
}

/// Tees status lines into the session's own copy and the injected sink.
struct StatusTee<'a, S: StatusSink> {
    line: &'a mut String,
    sink: &'a mut S,
}

impl<S: StatusSink> StatusSink for StatusTee<'_, S> {
    fn report(&mut self, message: &str) {
        self.line.clear();
        self.line.push_str(message);
        self.sink.report(message);
    }
}

/// Everything the pool core owns, in one place.
///
/// Per tick the host steps physics, feeds this tick's pocket and floor
/// contacts in, then calls `tick`. Input callbacks may arrive between ticks.
pub struct GameSession<S: StatusSink = LogStatus> {
    rules: RulesConfig,
    mode: Mode,
    shot: ShotController,
    placement: CueBallPlacement,
    pockets: PocketEventRouter,
    floor: PocketEventRouter,
    teleports: TeleportProtocol,
    settle: SettlingMonitor,
    camera: CameraMode,
    clock_ms: f64,
    rng: StdRng,
    events: Vec<SessionEvent>,
    status: S,
    status_line: String,
}

impl GameSession<LogStatus> {
    pub fn with_log(rules: RulesConfig) -> Self {
        Self::new(rules, LogStatus::new())
    }
}

impl<S: StatusSink> GameSession<S> {
    pub fn new(rules: RulesConfig, status: S) -> Self {
        Self {
            mode: Mode::Practice,
            shot: ShotController::new(&rules),
            placement: CueBallPlacement::new(&rules),
            pockets: PocketEventRouter::new(rules.sink_cooldown_ms),
            floor: PocketEventRouter::new(rules.sink_cooldown_ms),
            teleports: TeleportProtocol::new(&rules),
            settle: SettlingMonitor::new(rules.motion_threshold),
            camera: CameraMode::Perspective,
            clock_ms: 0.0,
            rng: StdRng::seed_from_u64(rules.seed),
            events: Vec::new(),
            status,
            status_line: String::new(),
            rules,
        }
    }

    // -- Accessors --

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn turn(&self) -> Option<&TurnState> {
        match &self.mode {
            Mode::Duel(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn solo(&self) -> Option<&SoloState> {
        match &self.mode {
            Mode::Solo(solo) => Some(solo),
            _ => None,
        }
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    pub fn all_stationary(&self) -> bool {
        self.settle.all_stationary()
    }

    pub fn is_placing(&self) -> bool {
        self.placement.is_active()
    }

    pub fn camera(&self) -> CameraMode {
        self.camera
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn status_sink(&self) -> &S {
        &self.status
    }

    pub fn is_over(&self) -> bool {
        match &self.mode {
            Mode::Practice => false,
            Mode::Solo(solo) => solo.is_finished(),
            Mode::Duel(turn) => turn.is_over(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn report(&mut self, message: &str) {
        StatusTee { line: &mut self.status_line, sink: &mut self.status }.report(message);
    }

    // -- Entry points --

    /// Start a 1-player time attack or a 2-player 8-ball game on the current
    /// rack. The cue ball goes to hand for the break.
    pub fn start_game(&mut self, bodies: &mut impl BallBodies, players: u8) -> Result<(), PoolError> {
        self.mode = match players {
            1 => Mode::Solo(SoloState::new(self.clock_ms, self.rules.strict_solo_order)),
            2 => Mode::Duel(TurnState::new()),
            other => return Err(PoolError::InvalidPlayerCount(other)),
        };
        log::info!("starting {}-player game", players);
        self.shot.cancel_charge();
        self.begin_placement(bodies);

        let message = if players == 1 {
            "Time attack! Sink all fifteen balls. Next ball: 1 ball."
        } else {
            "Player 1's turn! Place the cue ball and break."
        };
        self.report(message);
        self.events.push(SessionEvent::StateChanged);
        Ok(())
    }

    /// Tear the game down and re-rack. Pending teleport checks from the old
    /// game are cancelled.
    pub fn reset(&mut self, bodies: &mut impl BallBodies) {
        self.teleports.cancel_all();
        self.pockets.reset();
        self.floor.reset();
        self.placement.cancel();
        self.shot.reset(&self.rules);
        self.mode = Mode::Practice;
        self.events.clear();

        for (ball, pos) in rack_layout(self.rules.rack_apex, self.rules.ball_radius(), &mut self.rng) {
            place_at_rest(bodies, ball, pos);
        }
        place_at_rest(bodies, BallId::CUE, self.rules.cue_spot);

        if self.camera != CameraMode::Perspective {
            self.camera = CameraMode::Perspective;
            self.events.push(SessionEvent::Camera(self.camera));
        }
        self.report("Table racked. Choose 1 or 2 players.");
        self.events.push(SessionEvent::StateChanged);
    }

    /// Replace the rules. Every component is rebuilt and pending teleport
    /// checks are dropped; follow with `reset`.
    pub fn set_rules(&mut self, rules: RulesConfig) {
        self.shot = ShotController::new(&rules);
        self.placement = CueBallPlacement::new(&rules);
        self.pockets = PocketEventRouter::new(rules.sink_cooldown_ms);
        self.floor = PocketEventRouter::new(rules.sink_cooldown_ms);
        self.teleports = TeleportProtocol::new(&rules);
        self.settle = SettlingMonitor::new(rules.motion_threshold);
        self.rng = StdRng::seed_from_u64(rules.seed);
        self.rules = rules;
    }

    /// A ball touched a pocket trigger.
    pub fn on_pocket_contact(&mut self, bodies: &mut impl BallBodies, pocket: PocketId, ball: BallId) {
        if let Some(sunk) = self.pockets.on_collision(pocket, ball, self.clock_ms) {
            self.handle_sink(bodies, sunk);
        }
    }

    /// A ball fell off the table onto the floor trigger.
    pub fn on_floor_contact(&mut self, bodies: &mut impl BallBodies, ball: BallId) {
        if !self.floor.admit(ball, self.clock_ms) {
            return;
        }
        log::warn!("ball {} left the table", ball.number());
        if ball.is_cue() {
            self.begin_placement(bodies);
            self.report("Cue ball off the table. Place it behind the line.");
        } else {
            self.respot(bodies, ball);
        }
    }

    /// One fixed tick, after physics and contacts.
    pub fn tick(&mut self, bodies: &mut impl BallBodies, dt: f32) {
        self.clock_ms += dt as f64 * 1000.0;

        for check in self.teleports.tick(bodies, dt) {
            if let TeleportCheck::Retried(_) = check {
                self.events.push(SessionEvent::Sound(SOUND_TELEPORT));
            }
        }

        let all_stationary = self.settle.update(bodies);
        self.shot.observe_settle(all_stationary);

        if let Mode::Duel(turn) = &mut self.mode {
            let mut tee = StatusTee { line: &mut self.status_line, sink: &mut self.status };
            if turn.switch_turns(all_stationary, &mut tee) {
                self.events.push(SessionEvent::StateChanged);
            }
        }

        self.placement.tick(bodies);
        if !self.placement.is_active() {
            self.shot.aim_tick();
        }
        self.shot.charge_tick(dt, all_stationary);
    }

    fn can_shoot(&self) -> bool {
        self.settle.all_stationary() && !self.is_over() && !self.placement.is_active()
    }

    pub fn charge_start(&mut self) -> bool {
        let can_shoot = self.can_shoot();
        self.shot.charge_start(can_shoot)
    }

    /// Release the charge. Returns `true` when an impulse was applied.
    pub fn release(&mut self, bodies: &mut impl BallBodies) -> bool {
        let can_shoot = self.can_shoot();
        let Some(impulse) = self.shot.release(can_shoot) else {
            return false;
        };
        bodies.apply_impulse(BallId::CUE, impulse);
        if let Mode::Duel(turn) = &mut self.mode {
            turn.shot_released();
        }
        self.events.push(SessionEvent::Sound(SOUND_CUE_HIT));
        log::debug!("shot with power {:.3}", impulse.length());
        true
    }

    pub fn aim_left(&mut self, held: bool) {
        self.shot.aim_left(held);
    }

    pub fn aim_right(&mut self, held: bool) {
        self.shot.aim_right(held);
    }

    pub fn set_placement_key(&mut self, direction: PlacementDirection, held: bool) {
        self.placement.set_held(direction, held);
    }

    pub fn confirm_placement(&mut self, bodies: &mut impl BallBodies) -> bool {
        match self.placement.confirm(bodies) {
            Some(camera) => {
                self.set_camera(camera);
                true
            }
            None => false,
        }
    }

    /// Flip the view. Ignored while placing, which pins the top-down view.
    pub fn toggle_camera(&mut self) {
        if !self.placement.is_active() {
            self.set_camera(self.camera.toggled());
        }
    }

    /// Declare the 8-ball pocket (1..=6). `Ok(false)` when no call is due.
    pub fn call_pocket(&mut self, pocket: u8) -> Result<bool, PoolError> {
        let Mode::Duel(turn) = &mut self.mode else {
            PocketId::new(pocket)?;
            return Ok(false);
        };
        let mut tee = StatusTee { line: &mut self.status_line, sink: &mut self.status };
        let called = turn.call_pocket(pocket, &mut tee)?;
        if called {
            self.events.push(SessionEvent::StateChanged);
        }
        Ok(called)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot {
            mode: "practice",
            current_player: None,
            groups: [Group::Unassigned; 2],
            sunk: [Vec::new(), Vec::new()],
            table_state: None,
            called_pocket: None,
            next_ball: None,
            elapsed_ms: None,
            winner: None,
            placing: self.placement.is_active(),
            all_stationary: self.settle.all_stationary(),
            power: self.shot.power(),
            camera: self.camera,
            status: self.status_line.clone(),
        };
        match &self.mode {
            Mode::Practice => {}
            Mode::Solo(solo) => {
                snapshot.mode = "solo";
                snapshot.next_ball = Some(solo.next_required());
                snapshot.elapsed_ms = Some(solo.elapsed_ms(self.clock_ms));
            }
            Mode::Duel(turn) => {
                snapshot.mode = "duel";
                snapshot.current_player = Some(turn.current_player().number());
                for player in [Player::One, Player::Two] {
                    let i = player.number() as usize - 1;
                    snapshot.groups[i] = turn.group(player);
                    snapshot.sunk[i] = turn.sunk(player).iter().copied().collect();
                }
                snapshot.table_state = Some(turn.state());
                snapshot.called_pocket = turn.called_pocket();
                snapshot.winner = turn.winner().map(Player::number);
            }
        }
        snapshot
    }

    pub fn snapshot_json(&self) -> Result<String, PoolError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    // -- Internals --

    fn handle_sink(&mut self, bodies: &mut impl BallBodies, sunk: BallSunk) {
        let now = self.clock_ms;
        let directives = {
            let mut tee = StatusTee { line: &mut self.status_line, sink: &mut self.status };
            match &mut self.mode {
                Mode::Practice => vec![park(sunk.ball)],
                Mode::Solo(solo) => solo.on_ball_sunk(sunk.ball, now, &mut tee),
                Mode::Duel(turn) => turn.on_ball_sunk(sunk, &mut tee),
            }
        };

        for directive in directives {
            match directive {
                Directive::Jail(ball) => self.jail(bodies, ball),
                Directive::Respot(ball) => self.respot(bodies, ball),
                Directive::PlaceCueBall => self.begin_placement(bodies),
                Directive::GameOver { winner } => {
                    self.shot.cancel_charge();
                    self.events.push(SessionEvent::Winner(winner));
                }
                Directive::SoloFinished { elapsed_ms } => {
                    self.events.push(SessionEvent::SoloFinished { elapsed_ms });
                }
            }
        }
        self.events.push(SessionEvent::StateChanged);
    }

    fn teleport(&mut self, bodies: &mut impl BallBodies, ball: BallId, target: Vec3) {
        self.teleports.teleport(bodies, ball, target);
        self.events.push(SessionEvent::Sound(SOUND_TELEPORT));
    }

    /// Drop a sunk ball into the jail. Spread the drops so they pile up
    /// instead of balancing in a column above the container.
    fn jail(&mut self, bodies: &mut impl BallBodies, ball: BallId) {
        let spread = self.rules.holding_spread;
        let offset = if spread > 0.0 {
            Vec3::new(self.rng.gen_range(-spread..spread), 0.0, self.rng.gen_range(-spread..spread))
        } else {
            Vec3::ZERO
        };
        let target = self.rules.holding_area + offset;
        self.teleport(bodies, ball, target);
    }

    fn respot(&mut self, bodies: &mut impl BallBodies, ball: BallId) {
        let jitter = self.rules.respot_jitter;
        let offset = if jitter > 0.0 {
            Vec3::new(self.rng.gen_range(0.0..jitter), 0.0, self.rng.gen_range(0.0..jitter))
        } else {
            Vec3::ZERO
        };
        let target = self.rules.respot_point + offset;
        self.teleport(bodies, ball, target);
    }

    fn begin_placement(&mut self, bodies: &mut impl BallBodies) {
        let spot = self.rules.cue_spot;
        self.teleport(bodies, BallId::CUE, spot);
        self.shot.cancel_charge();
        let camera = self.placement.begin(bodies);
        self.set_camera(camera);
    }

    fn set_camera(&mut self, camera: CameraMode) {
        if self.camera != camera {
            self.camera = camera;
            self.events.push(SessionEvent::Camera(camera));
        }
    }
}

/// Reset helper: no teleport sound or verification, just put the ball there.
fn place_at_rest(bodies: &mut impl BallBodies, ball: BallId, pos: Vec3) {
    bodies.clear_motion(ball);
    bodies.set_position(ball, pos);
    bodies.wake_up(ball);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::testing::FakeTable;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> (GameSession<Vec<String>>, FakeTable) {
        let mut table = FakeTable::new();
        let mut session = GameSession::new(RulesConfig::default(), Vec::new());
        session.reset(&mut table);
        (session, table)
    }

    fn ball(n: u8) -> BallId {
        BallId::new(n).unwrap()
    }

    fn pocket(n: u8) -> PocketId {
        PocketId::new(n).unwrap()
    }

    /// Confirm placement, then take a shot that the tests resolve by hand.
    fn shoot(session: &mut GameSession<Vec<String>>, table: &mut FakeTable) {
        session.confirm_placement(table);
        session.tick(table, DT);
        assert!(session.charge_start());
        session.tick(table, DT);
        assert!(session.release(table));
        table.set_moving(BallId::CUE, Vec3::new(-2.0, 0.0, 0.0));
        session.tick(table, DT);
    }

    /// Dropped one diameter above the jail, within the spread of its centre.
    fn assert_jailed(session: &GameSession<Vec<String>>, table: &FakeTable, ball: BallId) {
        let rules = session.rules();
        let offset = table.position(ball) - rules.holding_area;
        assert!((offset.y - rules.ball_diameter).abs() < 1e-6);
        assert!(offset.x.abs() <= rules.holding_spread);
        assert!(offset.z.abs() <= rules.holding_spread);
    }

    /// Advance time so sink cooldowns expire and the table settles.
    fn settle(session: &mut GameSession<Vec<String>>, table: &mut FakeTable) {
        table.settle_all();
        for _ in 0..15 {
            session.tick(table, DT);
        }
    }

    #[test]
    fn reset_racks_every_ball() {
        let (session, table) = session();
        let rules = session.rules().clone();
        assert_eq!(table.position(BallId::CUE), rules.cue_spot);
        assert_eq!(table.position(BallId::EIGHT), crate::pool::ball::rack_slots(rules.rack_apex, rules.ball_radius())[4]);
        assert!(matches!(session.mode(), Mode::Practice));
    }

    #[test]
    fn start_rejects_bad_player_count() {
        let (mut session, mut table) = session();
        assert!(matches!(session.start_game(&mut table, 3), Err(PoolError::InvalidPlayerCount(3))));
        assert!(matches!(session.mode(), Mode::Practice));
    }

    #[test]
    fn start_puts_cue_in_hand() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        assert!(session.is_placing());
        assert_eq!(session.camera(), CameraMode::TopDown);
        assert!(table.body(BallId::CUE).sleeping);
        assert!(!session.charge_start(), "no charging while placing");

        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::Camera(CameraMode::TopDown)));
        assert!(events.contains(&SessionEvent::Sound(SOUND_TELEPORT)));
    }

    #[test]
    fn duplicate_pocket_contacts_sink_once() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 1).unwrap();
        session.on_pocket_contact(&mut table, pocket(1), ball(3));
        session.tick(&mut table, DT);
        session.on_pocket_contact(&mut table, pocket(1), ball(3));
        assert_eq!(session.solo().unwrap().next_required(), 2);
    }

    #[test]
    fn solo_scratch_and_sink() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 1).unwrap();
        shoot(&mut session, &mut table);
        session.drain_events();

        session.on_pocket_contact(&mut table, pocket(2), BallId::CUE);
        assert!(session.is_placing());
        assert_eq!(session.solo().unwrap().next_required(), 1);

        session.on_pocket_contact(&mut table, pocket(4), ball(7));
        assert_eq!(session.solo().unwrap().next_required(), 2);
        assert_jailed(&session, &table, ball(7));
        assert_eq!(table.linear_velocity(ball(7)), Vec3::ZERO);
    }

    #[test]
    fn strict_solo_respots_near_point() {
        let mut table = FakeTable::new();
        let rules = RulesConfig { strict_solo_order: true, ..RulesConfig::default() };
        let mut session = GameSession::new(rules, Vec::new());
        session.reset(&mut table);
        session.start_game(&mut table, 1).unwrap();

        session.on_pocket_contact(&mut table, pocket(3), ball(5));

        assert_eq!(session.solo().unwrap().next_required(), 1);
        let respot = session.rules().respot_point + Vec3::new(0.0, 0.057, 0.0);
        let pos = table.position(ball(5));
        assert!((pos - respot).length() < 0.02);
        assert!(session.status_line().contains("improper"));
    }

    #[test]
    fn solo_finish_reports_time() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 1).unwrap();
        for n in 1..=15 {
            session.on_pocket_contact(&mut table, pocket(1), ball(n));
            session.tick(&mut table, DT);
        }
        assert!(session.is_over());
        let events = session.drain_events();
        assert!(events.iter().any(|e| matches!(e, SessionEvent::SoloFinished { .. })));
        assert!(!session.charge_start());
    }

    #[test]
    fn shot_requires_rest() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        session.confirm_placement(&mut table);
        table.set_moving(ball(4), Vec3::new(0.0, 0.0, 0.5));
        session.tick(&mut table, DT);
        assert!(!session.all_stationary());
        assert!(!session.charge_start());

        table.settle_all();
        session.tick(&mut table, DT);
        assert!(session.charge_start());
    }

    #[test]
    fn release_applies_one_impulse_along_aim() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        shoot(&mut session, &mut table);

        assert_eq!(table.impulses.len(), 1);
        let (hit, impulse) = table.impulses[0];
        assert_eq!(hit, BallId::CUE);
        assert!(impulse.x < 0.0);
        assert_eq!(impulse.y, 0.0);
        assert!(session.turn().unwrap().awaiting_turn_switch());
        assert!(!session.turn().unwrap().did_sink_legal_ball_this_shot());

        // Second release while the balls roll does nothing.
        assert!(!session.charge_start());
        assert!(!session.release(&mut table));
        assert_eq!(table.impulses.len(), 1);
    }

    #[test]
    fn turn_switches_only_after_settling() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        shoot(&mut session, &mut table);

        for _ in 0..30 {
            session.tick(&mut table, DT);
            assert_eq!(session.turn().unwrap().current_player(), Player::One);
        }
        settle(&mut session, &mut table);
        assert_eq!(session.turn().unwrap().current_player(), Player::Two);
        assert!(session.status_line().contains("Player 2"));
    }

    #[test]
    fn opponent_ball_passes_the_turn() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();

        shoot(&mut session, &mut table);
        session.on_pocket_contact(&mut table, pocket(1), ball(2));
        settle(&mut session, &mut table);
        assert_eq!(session.turn().unwrap().current_player(), Player::One);

        shoot(&mut session, &mut table);
        session.on_pocket_contact(&mut table, pocket(5), ball(9));
        let turn = session.turn().unwrap();
        assert!(turn.sunk(Player::Two).contains(&ball(9)));
        assert!(turn.awaiting_turn_switch());

        settle(&mut session, &mut table);
        assert_eq!(session.turn().unwrap().current_player(), Player::Two);
    }

    #[test]
    fn called_eight_wins_end_to_end() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        shoot(&mut session, &mut table);
        for n in 1..=7 {
            session.on_pocket_contact(&mut table, pocket(1), ball(n));
        }
        assert_eq!(session.turn().unwrap().state(), TableState::EightBallEligible);
        settle(&mut session, &mut table);

        assert!(session.call_pocket(3).unwrap());
        shoot(&mut session, &mut table);
        session.on_pocket_contact(&mut table, pocket(3), BallId::EIGHT);

        assert_eq!(session.turn().unwrap().winner(), Some(Player::One));
        assert!(session.drain_events().contains(&SessionEvent::Winner(Player::One)));
        assert!(session.is_over());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.winner, Some(1));
        assert_eq!(snapshot.table_state, Some(TableState::Over));
    }

    #[test]
    fn premature_eight_hands_win_to_player_two() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        shoot(&mut session, &mut table);
        session.on_pocket_contact(&mut table, pocket(6), BallId::EIGHT);
        assert_eq!(session.turn().unwrap().winner(), Some(Player::Two));
    }

    #[test]
    fn call_pocket_outside_duel_is_ignored() {
        let (mut session, _table) = session();
        assert!(!session.call_pocket(2).unwrap());
        assert!(session.call_pocket(0).is_err());
    }

    #[test]
    fn floor_contact_recovers_balls() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        session.confirm_placement(&mut table);

        session.on_floor_contact(&mut table, ball(11));
        let respot = session.rules().respot_point + Vec3::new(0.0, 0.057, 0.0);
        assert!((table.position(ball(11)) - respot).length() < 0.02);

        session.on_floor_contact(&mut table, BallId::CUE);
        assert!(session.is_placing());
    }

    #[test]
    fn practice_sinks_only_park() {
        let (mut session, mut table) = session();
        session.on_pocket_contact(&mut table, pocket(2), BallId::EIGHT);
        assert_jailed(&session, &table, BallId::EIGHT);
        assert!(session.turn().is_none());
    }

    #[test]
    fn reset_cancels_pending_retries() {
        let (mut session, mut table) = session();
        session.on_pocket_contact(&mut table, pocket(2), ball(3));
        table.drift(ball(3), Vec3::new(0.0, -4.0, 0.0));

        session.reset(&mut table);
        table.drift(ball(3), Vec3::new(0.0, -4.0, 0.0));
        session.drain_events();
        for _ in 0..90 {
            session.tick(&mut table, DT);
        }
        assert!(!session.drain_events().contains(&SessionEvent::Sound(SOUND_TELEPORT)));
        assert_eq!(table.position(ball(3)).y, -4.0);
    }

    #[test]
    fn failed_teleport_retries_with_sound() {
        let (mut session, mut table) = session();
        session.on_pocket_contact(&mut table, pocket(2), ball(3));
        table.drift(ball(3), Vec3::new(0.0, -4.0, 0.0));
        session.drain_events();
        for _ in 0..61 {
            session.tick(&mut table, DT);
        }
        assert!(session.drain_events().contains(&SessionEvent::Sound(SOUND_TELEPORT)));
        assert!(table.position(ball(3)).y > 0.0);
    }

    #[test]
    fn camera_toggle_blocked_while_placing() {
        let (mut session, mut table) = session();
        session.toggle_camera();
        assert_eq!(session.camera(), CameraMode::TopDown);
        session.toggle_camera();
        assert_eq!(session.camera(), CameraMode::Perspective);

        session.start_game(&mut table, 1).unwrap();
        session.toggle_camera();
        assert_eq!(session.camera(), CameraMode::TopDown);
    }

    #[test]
    fn snapshot_serializes() {
        let (mut session, mut table) = session();
        session.start_game(&mut table, 2).unwrap();
        let json = session.snapshot_json().unwrap();
        assert!(json.contains("\"mode\":\"duel\""));
        assert!(json.contains("\"current_player\":1"));
        assert!(json.contains("\"camera\":\"top_down\""));
    }

    #[test]
    fn events_map_to_wire() {
        let event = SessionEvent::Winner(Player::Two).as_game_event().unwrap();
        assert_eq!(event, GameEvent::new(EVENT_WINNER, 2.0, 0.0, 0.0));
        assert!(SessionEvent::Sound(SOUND_CUE_HIT).as_game_event().is_none());
    }
}
