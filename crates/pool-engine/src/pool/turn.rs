use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::PoolError;
use crate::pool::ball::{BallId, Group};
use crate::pool::pocket::{BallSunk, PocketId};
use crate::pool::status::StatusSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn index(self) -> usize {
        self.number() as usize - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    /// No group assigned yet.
    Break,
    Assigned,
    /// The current player has cleared their group and shoots for the 8.
    EightBallEligible,
    Over,
}

/// What the session must do to the table after a sink was ruled on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// Park the ball in the holding area.
    Jail(BallId),
    /// Drop the ball back onto the table.
    Respot(BallId),
    /// Cue ball is down: start placement.
    PlaceCueBall,
    GameOver { winner: Player },
    SoloFinished { elapsed_ms: f64 },
}

/// Two-player 8-ball rules.
#[derive(Debug, Clone)]
pub struct TurnState {
    current_player: Player,
    player_group: [Group; 2],
    player_sunk: [BTreeSet<BallId>; 2],
    state: TableState,
    awaiting_turn_switch: bool,
    did_sink_legal_ball_this_shot: bool,
    scratched_this_shot: bool,
    called_pocket: Option<PocketId>,
    winner: Option<Player>,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            current_player: Player::One,
            player_group: [Group::Unassigned; 2],
            player_sunk: [BTreeSet::new(), BTreeSet::new()],
            state: TableState::Break,
            awaiting_turn_switch: false,
            did_sink_legal_ball_this_shot: false,
            scratched_this_shot: false,
            called_pocket: None,
            winner: None,
        }
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn group(&self, player: Player) -> Group {
        self.player_group[player.index()]
    }

    pub fn sunk(&self, player: Player) -> &BTreeSet<BallId> {
        &self.player_sunk[player.index()]
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn awaiting_turn_switch(&self) -> bool {
        self.awaiting_turn_switch
    }

    pub fn did_sink_legal_ball_this_shot(&self) -> bool {
        self.did_sink_legal_ball_this_shot
    }

    pub fn called_pocket(&self) -> Option<PocketId> {
        self.called_pocket
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.state == TableState::Over
    }

    /// Has `player` sunk every ball of their group?
    pub fn has_cleared_group(&self, player: Player) -> bool {
        let group = self.group(player);
        group != Group::Unassigned && group.balls().all(|b| self.sunk(player).contains(&b))
    }

    /// A shot left the cue. Assume the turn passes until a legal sink says otherwise.
    pub fn shot_released(&mut self) {
        self.awaiting_turn_switch = true;
        self.did_sink_legal_ball_this_shot = false;
        self.scratched_this_shot = false;
    }

    /// Declare the pocket for the 8 ball. Only the eligible player may call.
    pub fn call_pocket(&mut self, pocket: u8, status: &mut dyn StatusSink) -> Result<bool, PoolError> {
        let pocket = PocketId::new(pocket)?;
        if self.state != TableState::EightBallEligible {
            return Ok(false);
        }
        self.called_pocket = Some(pocket);
        status.report(&format!(
            "Player {} calls pocket {} for the 8 ball.",
            self.current_player.number(),
            pocket.number()
        ));
        Ok(true)
    }

    /// Rule on one sink. Once the game is over nothing changes and the ball
    /// is simply parked.
    pub fn on_ball_sunk(&mut self, sunk: BallSunk, status: &mut dyn StatusSink) -> Vec<Directive> {
        let ball = sunk.ball;
        if self.is_over() {
            return vec![park(ball)];
        }

        let player = self.current_player;
        if ball.is_cue() {
            self.awaiting_turn_switch = true;
            self.did_sink_legal_ball_this_shot = false;
            self.scratched_this_shot = true;
            status.report(&format!(
                "Scratch! Player {} forfeits the turn. Place the cue ball.",
                player.number()
            ));
            return vec![Directive::PlaceCueBall];
        }

        if ball.is_eight() {
            return self.on_eight_ball(sunk.pocket, status);
        }

        if self.state == TableState::Break {
            let group = ball.group();
            self.player_group[player.index()] = group;
            self.player_group[player.other().index()] = group.opposite();
            self.state = TableState::Assigned;
            status.report(&format!(
                "Player {} takes {}, Player {} takes {}.",
                player.number(),
                group.label(),
                player.other().number(),
                group.opposite().label()
            ));
        }

        if ball.group() == self.group(player) {
            self.player_sunk[player.index()].insert(ball);
            if !self.scratched_this_shot {
                self.did_sink_legal_ball_this_shot = true;
            }
            if self.has_cleared_group(player) {
                self.state = TableState::EightBallEligible;
                self.called_pocket = None;
                status.report(&format!(
                    "Player {} cleared {}! Call a pocket (1-6) for the 8 ball.",
                    player.number(),
                    self.group(player).label()
                ));
            } else {
                status.report(&format!("Player {} sinks the {}.", player.number(), ball.number()));
            }
        } else {
            let opponent = player.other();
            self.player_sunk[opponent.index()].insert(ball);
            self.awaiting_turn_switch = true;
            status.report(&format!(
                "Player {} sank Player {}'s {}.",
                player.number(),
                opponent.number(),
                ball.number()
            ));
        }
        vec![Directive::Jail(ball)]
    }

    fn on_eight_ball(&mut self, pocket: PocketId, status: &mut dyn StatusSink) -> Vec<Directive> {
        let player = self.current_player;
        let winner = if self.state != TableState::EightBallEligible {
            status.report(&format!("Player {} sank the 8 ball early and loses.", player.number()));
            player.other()
        } else {
            match self.called_pocket {
                Some(called) if called == pocket => {
                    status.report(&format!("Player {} sinks the 8 in pocket {} and wins!", player.number(), pocket.number()));
                    player
                }
                Some(called) => {
                    status.report(&format!(
                        "Player {} called pocket {} but the 8 fell in {}. Player {} wins.",
                        player.number(),
                        called.number(),
                        pocket.number(),
                        player.other().number()
                    ));
                    player.other()
                }
                None => {
                    status.report(&format!("Player {} sank the 8 without calling a pocket and loses.", player.number()));
                    player.other()
                }
            }
        };
        self.declare_winner(winner);
        vec![Directive::Jail(BallId::EIGHT), Directive::GameOver { winner }]
    }

    fn declare_winner(&mut self, winner: Player) {
        self.state = TableState::Over;
        self.winner = Some(winner);
        self.awaiting_turn_switch = false;
        log::info!("player {} wins", winner.number());
    }

    /// Pass the turn once the table is at rest, unless the shot earned another.
    /// Returns `true` when the current player changed.
    pub fn switch_turns(&mut self, all_stationary: bool, status: &mut dyn StatusSink) -> bool {
        if !self.awaiting_turn_switch || !all_stationary || self.is_over() {
            return false;
        }

        if self.did_sink_legal_ball_this_shot {
            self.awaiting_turn_switch = false;
            self.did_sink_legal_ball_this_shot = false;
            status.report(&format!("Player {} shoots again.", self.current_player.number()));
            return false;
        }

        self.current_player = self.current_player.other();
        self.awaiting_turn_switch = false;
        self.did_sink_legal_ball_this_shot = false;
        self.scratched_this_shot = false;
        self.called_pocket = None;

        if self.state != TableState::Break {
            self.state = if self.has_cleared_group(self.current_player) {
                TableState::EightBallEligible
            } else {
                TableState::Assigned
            };
        }

        let player = self.current_player.number();
        if self.state == TableState::EightBallEligible {
            status.report(&format!("Player {}'s turn! Call a pocket (1-6) for the 8 ball.", player));
        } else {
            status.report(&format!("Player {}'s turn!", player));
        }
        true
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-play handling: scratches start placement, everything else is parked.
pub fn park(ball: BallId) -> Directive {
    if ball.is_cue() {
        Directive::PlaceCueBall
    } else {
        Directive::Jail(ball)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(n: u8) -> BallId {
        BallId::new(n).unwrap()
    }

    fn sink(state: &mut TurnState, n: u8, pocket: u8, log: &mut Vec<String>) -> Vec<Directive> {
        state.on_ball_sunk(
            BallSunk { pocket: PocketId::new(pocket).unwrap(), ball: ball(n) },
            log,
        )
    }

    fn groups_ok(state: &TurnState) {
        if state.state() != TableState::Break {
            let a = state.group(Player::One);
            let b = state.group(Player::Two);
            assert_ne!(a, b);
            assert!(matches!(a, Group::Solids | Group::Stripes));
            assert!(matches!(b, Group::Solids | Group::Stripes));
        }
    }

    /// Player 1 on solids with every solid down.
    fn cleared_solids() -> TurnState {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();
        for n in 1..=7 {
            sink(&mut state, n, 1, &mut log);
        }
        state
    }

    #[test]
    fn first_sink_assigns_groups() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();

        let directives = sink(&mut state, 11, 2, &mut log);

        assert_eq!(directives, vec![Directive::Jail(ball(11))]);
        assert_eq!(state.group(Player::One), Group::Stripes);
        assert_eq!(state.group(Player::Two), Group::Solids);
        assert_eq!(state.state(), TableState::Assigned);
        assert!(state.did_sink_legal_ball_this_shot());
        groups_ok(&state);
    }

    #[test]
    fn group_assignment_is_permanent() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();
        sink(&mut state, 3, 1, &mut log);
        // Player 1 then pots a stripe: illegal, groups unchanged.
        sink(&mut state, 12, 1, &mut log);
        assert_eq!(state.group(Player::One), Group::Solids);
        assert_eq!(state.group(Player::Two), Group::Stripes);
        groups_ok(&state);
    }

    #[test]
    fn clearing_group_makes_player_eligible() {
        let state = cleared_solids();
        assert_eq!(state.state(), TableState::EightBallEligible);
        assert!(state.has_cleared_group(Player::One));
        assert_eq!(state.called_pocket(), None);
    }

    #[test]
    fn called_eight_wins() {
        let mut state = cleared_solids();
        let mut log = Vec::new();
        assert!(state.call_pocket(3, &mut log).unwrap());

        let directives = sink(&mut state, 8, 3, &mut log);

        assert_eq!(
            directives,
            vec![Directive::Jail(BallId::EIGHT), Directive::GameOver { winner: Player::One }]
        );
        assert_eq!(state.winner(), Some(Player::One));
        assert_eq!(state.state(), TableState::Over);
    }

    #[test]
    fn eight_in_wrong_pocket_loses() {
        let mut state = cleared_solids();
        let mut log = Vec::new();
        state.call_pocket(3, &mut log).unwrap();
        sink(&mut state, 8, 4, &mut log);
        assert_eq!(state.winner(), Some(Player::Two));
    }

    #[test]
    fn eight_without_call_loses() {
        let mut state = cleared_solids();
        let mut log = Vec::new();
        sink(&mut state, 8, 2, &mut log);
        assert_eq!(state.winner(), Some(Player::Two));
        assert!(state.is_over());
    }

    #[test]
    fn premature_eight_loses() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();
        let directives = sink(&mut state, 8, 5, &mut log);
        assert!(directives.contains(&Directive::GameOver { winner: Player::Two }));
        assert_eq!(state.winner(), Some(Player::Two));
        assert_eq!(state.state(), TableState::Over);
    }

    #[test]
    fn call_pocket_rejected_when_not_eligible() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        assert!(!state.call_pocket(2, &mut log).unwrap());
        assert_eq!(state.called_pocket(), None);
        assert!(matches!(state.call_pocket(9, &mut log), Err(PoolError::InvalidPocket(9))));
    }

    #[test]
    fn opponent_ball_is_credited_and_turn_passes() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();
        sink(&mut state, 2, 1, &mut log); // player 1 takes solids
        assert!(!state.switch_turns(true, &mut log)); // legal sink: shoots again
        assert_eq!(state.current_player(), Player::One);

        state.shot_released();
        sink(&mut state, 9, 6, &mut log);

        assert!(state.sunk(Player::Two).contains(&ball(9)));
        assert!(!state.sunk(Player::One).contains(&ball(9)));
        assert!(state.awaiting_turn_switch());
        assert!(!state.did_sink_legal_ball_this_shot());

        assert!(state.switch_turns(true, &mut log));
        assert_eq!(state.current_player(), Player::Two);
        assert!(!state.awaiting_turn_switch());
    }

    #[test]
    fn switch_waits_for_rest() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();
        for _ in 0..5 {
            assert!(!state.switch_turns(false, &mut log));
            assert_eq!(state.current_player(), Player::One);
        }
        assert!(state.switch_turns(true, &mut log));
        assert_eq!(state.current_player(), Player::Two);
    }

    #[test]
    fn switch_needs_pending_shot() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        assert!(!state.switch_turns(true, &mut log));
        assert_eq!(state.current_player(), Player::One);
    }

    #[test]
    fn scratch_forfeits_even_after_legal_sink() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        state.shot_released();
        sink(&mut state, 4, 1, &mut log);
        let directives = sink(&mut state, 0, 2, &mut log);
        assert_eq!(directives, vec![Directive::PlaceCueBall]);
        assert!(!state.did_sink_legal_ball_this_shot());

        // A later legal sink in the same shot does not win the turn back.
        sink(&mut state, 5, 3, &mut log);
        assert!(state.switch_turns(true, &mut log));
        assert_eq!(state.current_player(), Player::Two);
    }

    #[test]
    fn eligibility_follows_the_shooter() {
        let mut state = cleared_solids();
        let mut log = Vec::new();
        // Player 1 misses: turn passes to player 2, who still has stripes left.
        state.shot_released();
        assert!(state.switch_turns(true, &mut log));
        assert_eq!(state.state(), TableState::Assigned);

        // Player 2 misses too: player 1 goes straight back to calling the 8.
        state.shot_released();
        assert!(state.switch_turns(true, &mut log));
        assert_eq!(state.current_player(), Player::One);
        assert_eq!(state.state(), TableState::EightBallEligible);
        assert!(log.last().unwrap().contains("Call a pocket"));
    }

    #[test]
    fn sinks_after_game_over_only_park() {
        let mut state = TurnState::new();
        let mut log = Vec::new();
        sink(&mut state, 8, 1, &mut log);
        let before = state.sunk(Player::One).len();
        assert_eq!(sink(&mut state, 3, 1, &mut log), vec![Directive::Jail(ball(3))]);
        assert_eq!(sink(&mut state, 0, 1, &mut log), vec![Directive::PlaceCueBall]);
        assert_eq!(state.sunk(Player::One).len(), before);
        assert_eq!(state.group(Player::One), Group::Unassigned);
    }
}
