//! A single bracket match
//!
//! Binds two entrant slots to one simulation. The simulation is created when
//! the match is first started and dropped once the result is recorded.

use serde::{Deserialize, Serialize};

use super::entrant::{EntrantId, EntrantRegistry};
use super::error::{Precondition, Result, TournamentError};
use crate::sim::{
    self, Side, SimEvent, SimParams, SimPhase, SimSnapshot, SimulationState, TickInput,
};

/// An entrant slot: empty until the feeder match is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Tbd,
    Entrant(EntrantId),
}

impl Slot {
    pub fn entrant(&self) -> Option<EntrantId> {
        match self {
            Slot::Tbd => None,
            Slot::Entrant(id) => Some(*id),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Entrant(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Pending,
    Current,
    Finished,
}

/// Final outcome of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: EntrantId,
    pub loser: EntrantId,
    pub score_a: u32,
    pub score_b: u32,
}

/// Emitted once per finished match for an external recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCompletion {
    pub match_id: usize,
    pub entrant_a: EntrantId,
    pub entrant_b: EntrantId,
    pub winner_id: EntrantId,
    pub score_a: u32,
    pub score_b: u32,
}

/// One match in the bracket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Index in the bracket
    pub id: usize,
    pub round_index: usize,
    pub slot_index: usize,
    pub entrant_a: Slot,
    pub entrant_b: Slot,
    pub status: MatchStatus,
    result: Option<MatchResult>,
    sim: Option<SimulationState>,
    /// Base seed for this match's serves
    seed: u64,
    /// Times the match was thrown away and restarted
    replays: u32,
}

impl Match {
    pub fn new(id: usize, round_index: usize, slot_index: usize, seed: u64) -> Self {
        Self {
            id,
            round_index,
            slot_index,
            entrant_a: Slot::Tbd,
            entrant_b: Slot::Tbd,
            status: MatchStatus::Pending,
            result: None,
            sim: None,
            seed,
            replays: 0,
        }
    }

    /// Both entrant slots are filled
    pub fn is_ready(&self) -> bool {
        self.entrant_a.is_resolved() && self.entrant_b.is_resolved()
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Slot for an entrant on the given side
    pub fn slot(&self, side: Side) -> Slot {
        match side {
            Side::A => self.entrant_a,
            Side::B => self.entrant_b,
        }
    }

    /// Live simulation, if the match has been started and not yet finalized
    pub fn simulation(&self) -> Option<&SimulationState> {
        self.sim.as_ref()
    }

    pub fn sim_snapshot(&self) -> Option<SimSnapshot> {
        self.sim.as_ref().map(|s| s.snapshot())
    }

    /// Current phase of the underlying simulation
    pub fn phase(&self) -> Option<SimPhase> {
        if self.is_finished() {
            Some(SimPhase::Finished)
        } else {
            self.sim.as_ref().map(|s| s.phase)
        }
    }

    fn new_simulation(&self, params: &SimParams) -> SimulationState {
        let seed = self
            .seed
            .wrapping_add(u64::from(self.replays).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        SimulationState::new(params, seed)
    }

    /// Serve the ball. Creates the simulation on first use.
    ///
    /// Does nothing (returns false) once Running or Finished, or while an
    /// entrant slot is still unresolved.
    pub fn start(&mut self, params: &SimParams) -> bool {
        if self.is_finished() || !self.is_ready() {
            return false;
        }
        if self.sim.is_none() {
            self.sim = Some(self.new_simulation(params));
            log::info!("Match {} started", self.id);
        }
        match self.sim.as_mut() {
            Some(state) => sim::serve(state, params),
            None => false,
        }
    }

    /// Discard the simulation and start over from 0-0. Not allowed once the
    /// result is recorded.
    pub fn replay(&mut self, params: &SimParams) -> bool {
        if self.is_finished() || !self.is_ready() {
            return false;
        }
        self.replays += 1;
        self.sim = Some(self.new_simulation(params));
        log::info!("Match {} replayed (attempt {})", self.id, self.replays + 1);
        true
    }

    /// Advance the simulation one fixed step
    pub fn tick(&mut self, input: &TickInput, params: &SimParams, dt: f32) -> Vec<SimEvent> {
        match self.sim.as_mut() {
            Some(state) if self.result.is_none() => sim::tick(state, input, params, dt),
            _ => Vec::new(),
        }
    }

    /// Current score at any phase
    pub fn live_score(&self) -> (u32, u32) {
        if let Some(result) = &self.result {
            return (result.score_a, result.score_b);
        }
        self.sim
            .as_ref()
            .map(|s| (s.score_a, s.score_b))
            .unwrap_or((0, 0))
    }

    /// The recorded result; only available once finished
    pub fn result(&self) -> Result<MatchResult> {
        self.result
            .ok_or(TournamentError::PreconditionViolation(
                Precondition::MatchNotFinished(self.id),
            ))
    }

    pub fn winner(&self) -> Option<EntrantId> {
        self.result.map(|r| r.winner)
    }

    /// Record the result if the simulation has been decided.
    ///
    /// Credits the winner and loser in the registry and returns the
    /// completion event. Subsequent calls return `None`.
    pub fn finalize(&mut self, registry: &mut EntrantRegistry) -> Option<MatchCompletion> {
        if self.result.is_some() {
            return None;
        }
        let state = self.sim.as_ref()?;
        let side = state.winner?;
        let (a, b) = (self.entrant_a.entrant()?, self.entrant_b.entrant()?);
        let (winner, loser) = match side {
            Side::A => (a, b),
            Side::B => (b, a),
        };

        let result = MatchResult {
            winner,
            loser,
            score_a: state.score_a,
            score_b: state.score_b,
        };
        self.result = Some(result);
        self.status = MatchStatus::Finished;
        self.sim = None;
        registry.record_result(winner, loser);

        log::info!(
            "Match {} finished: {} beat {} ({} - {})",
            self.id,
            registry.name_of(winner),
            registry.name_of(loser),
            result.score_a,
            result.score_b
        );

        Some(MatchCompletion {
            match_id: self.id,
            entrant_a: a,
            entrant_b: b,
            winner_id: winner,
            score_a: result.score_a,
            score_b: result.score_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::default_roster;

    fn ready_match() -> Match {
        let mut m = Match::new(0, 0, 0, 5);
        m.entrant_a = Slot::Entrant(1);
        m.entrant_b = Slot::Entrant(2);
        m.status = MatchStatus::Current;
        m
    }

    /// Serve and tick until the simulation is decided
    fn play_out(m: &mut Match, params: &SimParams) {
        for _ in 0..20_000 {
            if m.phase() == Some(SimPhase::Waiting) || m.simulation().is_none() {
                m.start(params);
            }
            m.tick(&TickInput::default(), params, SIM_DT);
            if m.simulation().is_some_and(|s| s.is_finished()) {
                return;
            }
        }
        panic!("match never finished");
    }

    #[test]
    fn test_start_requires_entrants() {
        let params = SimParams::default();
        let mut m = Match::new(4, 1, 0, 5);
        assert!(!m.start(&params));
        assert!(m.simulation().is_none());
    }

    #[test]
    fn test_start_is_noop_while_running() {
        let params = SimParams::default();
        let mut m = ready_match();
        assert!(m.start(&params));
        let vel = m.simulation().unwrap().ball.vel;
        assert!(!m.start(&params));
        assert_eq!(m.simulation().unwrap().ball.vel, vel);
    }

    #[test]
    fn test_result_before_finish_is_precondition_violation() {
        let params = SimParams::default();
        let mut m = ready_match();
        m.start(&params);
        assert_eq!(
            m.result(),
            Err(TournamentError::PreconditionViolation(
                Precondition::MatchNotFinished(0)
            ))
        );
        assert_eq!(m.live_score(), (0, 0));
    }

    #[test]
    fn test_finalize_credits_once() {
        let params = SimParams::default();
        let mut registry = EntrantRegistry::from_roster(&default_roster("P"));
        let mut m = ready_match();
        play_out(&mut m, &params);

        let completion = m.finalize(&mut registry).unwrap();
        assert!(m.finalize(&mut registry).is_none());
        assert!(m.is_finished());

        let result = m.result().unwrap();
        assert_eq!(completion.winner_id, result.winner);
        assert_eq!((completion.score_a, completion.score_b), m.live_score());
        assert_eq!(result.score_a.max(result.score_b), params.win_score);

        assert_eq!(registry.get(result.winner).unwrap().win_count, 1);
        assert_eq!(registry.get(result.loser).unwrap().loss_count, 1);
        assert_eq!(registry.get(result.winner).unwrap().loss_count, 0);

        // A finished match ignores start, replay and ticks
        assert!(!m.start(&params));
        assert!(!m.replay(&params));
        assert!(m.tick(&TickInput::default(), &params, SIM_DT).is_empty());
    }

    #[test]
    fn test_finalize_before_decided_does_nothing() {
        let params = SimParams::default();
        let mut registry = EntrantRegistry::from_roster(&default_roster("P"));
        let mut m = ready_match();
        assert!(m.finalize(&mut registry).is_none());
        m.start(&params);
        assert!(m.finalize(&mut registry).is_none());
        assert_eq!(m.status, MatchStatus::Current);
    }

    #[test]
    fn test_replay_resets_score() {
        let params = SimParams::default();
        let mut m = ready_match();
        m.start(&params);
        for _ in 0..200 {
            m.tick(&TickInput::default(), &params, SIM_DT);
        }
        assert!(m.replay(&params));
        assert_eq!(m.live_score(), (0, 0));
        assert_eq!(m.phase(), Some(SimPhase::Waiting));
    }

    #[test]
    fn test_completion_serializes_for_recorder() {
        let completion = MatchCompletion {
            match_id: 6,
            entrant_a: 1,
            entrant_b: 5,
            winner_id: 5,
            score_a: 3,
            score_b: 5,
        };
        let json = serde_json::to_value(completion).unwrap();
        assert_eq!(json["winner_id"], 5);
        assert_eq!(json["score_b"], 5);
    }
}
