use tracing::{info, warn};

use crate::clock::SimulationClock;
use crate::config::MatchConfig;
use crate::error::ProofError;
use crate::proof::Proof;
use crate::state::MatchState;
use crate::step::step;
use crate::types::*;

/// One running match driven by wall-clock readings.
#[derive(Clone, Debug)]
pub struct Match {
    state: MatchState,
    clock: SimulationClock,
}

impl Match {
    pub fn start(inputs: MatchInputs, config: MatchConfig) -> Self {
        let clock = SimulationClock::new(config.step_seconds);
        Match {
            state: MatchState::new(inputs, config),
            clock,
        }
    }

    /// Run every fixed step owed up to `now_seconds`. Stops early, leaving the
    /// clock residue unconsumed, as soon as the match finishes.
    pub fn advance(&mut self, now_seconds: f64) -> StepOutcome {
        if self.state.finished {
            return StepOutcome::Finished;
        }
        for tick in self.clock.advance(now_seconds) {
            if step(&mut self.state, tick) == StepOutcome::Finished {
                return StepOutcome::Finished;
            }
        }
        StepOutcome::Continue
    }

    /// Step without a clock until the match ends on its own.
    pub fn run_to_end(&mut self) -> StepOutcome {
        while !self.state.finished {
            let tick = self.state.tick + 1;
            step(&mut self.state, tick);
        }
        StepOutcome::Finished
    }

    /// Close the match now with a final snapshot at the current tick and
    /// return its proof. A finished match just returns its proof.
    pub fn export_now(&mut self) -> Result<Proof, ProofError> {
        if !self.state.finished {
            info!(tick = self.state.tick, "manual export");
            self.state.finish();
        }
        self.state.proof()
    }

    /// The proof, once the match has finished.
    pub fn proof(&self) -> Result<Option<Proof>, ProofError> {
        if !self.state.finished {
            return Ok(None);
        }
        self.state.proof().map(Some)
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn tick(&self) -> Tick {
        self.state.tick
    }

    pub fn entities(&self) -> &[Entity] {
        &self.state.entities
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }
}

/// What [`MatchSession::start`] did with a start request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A previous match was dropped to make room. Carries its last tick.
    Superseded { previous_tick: Tick },
    /// Arrived inside the debounce window of the last accepted start.
    Debounced,
}

/// Owns at most one match. Overlapping matches are never possible: a new
/// start either replaces the current match whole or is ignored.
#[derive(Debug)]
pub struct MatchSession {
    config: MatchConfig,
    current: Option<Match>,
    last_start: Option<f64>,
}

impl MatchSession {
    pub fn new(config: MatchConfig) -> Self {
        MatchSession {
            config,
            current: None,
            last_start: None,
        }
    }

    /// Start a match at wall time `now_seconds`. Only accepted starts reset
    /// the debounce window.
    pub fn start(&mut self, inputs: MatchInputs, now_seconds: f64) -> StartOutcome {
        // A wall clock that went backwards restarts the window instead of
        // holding it shut until time catches up.
        if let Some(last) = self.last_start.filter(|&last| now_seconds >= last) {
            if now_seconds - last < self.config.start_debounce_seconds {
                warn!(
                    room = %inputs.room,
                    seed = %inputs.seed_word,
                    "ignored duplicate start during debounce window"
                );
                return StartOutcome::Debounced;
            }
        }
        self.last_start = Some(now_seconds);

        let previous = self.current.take();
        let mut next = Match::start(inputs, self.config.clone());
        // The first reading only anchors the clock.
        next.advance(now_seconds);
        self.current = Some(next);

        match previous {
            Some(prev) => {
                info!(previous_tick = prev.tick(), "superseded running match");
                StartOutcome::Superseded {
                    previous_tick: prev.tick(),
                }
            }
            None => StartOutcome::Started,
        }
    }

    /// Forward a clock reading to the current match, if any.
    pub fn advance(&mut self, now_seconds: f64) -> Option<StepOutcome> {
        self.current.as_mut().map(|m| m.advance(now_seconds))
    }

    pub fn current(&self) -> Option<&Match> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Match> {
        self.current.as_mut()
    }

    /// Drop the current match without exporting anything.
    pub fn abandon(&mut self) -> Option<Match> {
        self.current.take()
    }
}
