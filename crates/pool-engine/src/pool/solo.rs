use crate::pool::ball::BallId;
use crate::pool::status::StatusSink;
use crate::pool::turn::{park, Directive};

/// Index past the last ball; reaching it ends the run.
const LAST_BALL: u8 = 15;

/// Single-player time attack: clear all fifteen balls as fast as possible.
///
/// By default any numbered sink counts as progress. With `strict` set, only
/// the next ball in order counts and others are dropped back on the table.
#[derive(Debug, Clone)]
pub struct SoloState {
    next_required: u8,
    start_ms: f64,
    end_ms: Option<f64>,
    strict: bool,
}

impl SoloState {
    pub fn new(start_ms: f64, strict: bool) -> Self {
        Self {
            next_required: 1,
            start_ms,
            end_ms: None,
            strict,
        }
    }

    pub fn next_required(&self) -> u8 {
        self.next_required
    }

    pub fn is_finished(&self) -> bool {
        self.end_ms.is_some()
    }

    /// Time on the clock: frozen once the run is over.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.end_ms.unwrap_or(now_ms) - self.start_ms
    }

    pub fn on_ball_sunk(&mut self, ball: BallId, now_ms: f64, status: &mut dyn StatusSink) -> Vec<Directive> {
        if self.is_finished() {
            return vec![park(ball)];
        }

        if ball.is_cue() {
            status.report(&format!(
                "Scratch! Cue ball pocketed. Place behind the line and try again. Next ball: {} ball.",
                self.next_required
            ));
            return vec![Directive::PlaceCueBall];
        }

        if self.strict && ball.number() != self.next_required {
            status.report(&format!(
                "Ball order improper. Ball reintroduced. Next ball: {} ball.",
                self.next_required
            ));
            return vec![Directive::Respot(ball)];
        }

        self.next_required = (self.next_required + 1).min(LAST_BALL + 1);
        if self.next_required > LAST_BALL {
            self.end_ms = Some(now_ms);
            let elapsed_ms = self.elapsed_ms(now_ms);
            status.report(&format!("All balls sunk! Time taken: {:.2} seconds.", elapsed_ms / 1000.0));
            return vec![Directive::Jail(ball), Directive::SoloFinished { elapsed_ms }];
        }

        status.report(&format!("Nice job! Next ball: {} ball.", self.next_required));
        vec![Directive::Jail(ball)]
    }
}
