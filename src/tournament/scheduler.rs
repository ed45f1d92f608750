//! Bracket scheduler
//!
//! Owns the entrants, the match list and the bracket graph. Exactly one match
//! is current while the tournament is in progress; when it finishes, winners
//! are copied into downstream slots and the next playable match (lowest
//! index first) becomes current.

use std::fmt;

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bracket::{Bracket, SlotSide};
use super::entrant::{Entrant, EntrantId, EntrantRegistry};
use super::error::{Precondition, Result, TournamentError};
use super::matches::{Match, MatchCompletion, MatchStatus, Slot};
use crate::input::InputState;
use crate::settings::{ControlMode, Settings};
use crate::sim::{SimEvent, SimParams, TickInput};

/// Lifecycle of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    Seeding,
    InProgress,
    Finished,
}

/// Callback invoked once per finished match
pub type CompletionHook = Box<dyn FnMut(&MatchCompletion)>;

/// Read-only view of one match for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: usize,
    pub round_index: usize,
    pub slot_index: usize,
    pub round_name: String,
    pub entrant_a: Option<EntrantId>,
    pub entrant_b: Option<EntrantId>,
    pub name_a: String,
    pub name_b: String,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Option<EntrantId>,
    pub status: MatchStatus,
}

/// Read-only view of the whole bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSnapshot {
    pub status: TournamentStatus,
    pub matches: Vec<MatchView>,
    pub current_match_index: Option<usize>,
    pub champion: Option<Entrant>,
}

/// A single-elimination tournament
pub struct Tournament {
    settings: Settings,
    bracket: Bracket,
    registry: EntrantRegistry,
    matches: Vec<Match>,
    status: TournamentStatus,
    current: Option<usize>,
    champion: Option<EntrantId>,
    rng: Pcg32,
    hooks: Vec<CompletionHook>,
}

impl fmt::Debug for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tournament")
            .field("status", &self.status)
            .field("current", &self.current)
            .field("champion", &self.champion)
            .field("matches", &self.matches.len())
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

impl Tournament {
    /// Create an empty tournament in the Seeding state
    pub fn new(settings: Settings) -> Result<Self> {
        let bracket = Bracket::new(settings.bracket_size)?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!(
            "Tournament created: {} entrants, seed {}",
            bracket.entrant_count(),
            seed
        );

        let mut tournament = Self {
            settings,
            bracket,
            registry: EntrantRegistry::default(),
            matches: Vec::new(),
            status: TournamentStatus::Seeding,
            current: None,
            champion: None,
            rng: Pcg32::seed_from_u64(seed),
            hooks: Vec::new(),
        };
        tournament.matches = tournament.build_matches();
        Ok(tournament)
    }

    /// Create a tournament and seed it from the settings roster
    pub fn with_roster(settings: Settings) -> Result<Self> {
        let mut tournament = Self::new(settings)?;
        tournament.initialize_from_roster()?;
        Ok(tournament)
    }

    fn build_matches(&mut self) -> Vec<Match> {
        let nodes = self.bracket.nodes().to_vec();
        nodes
            .iter()
            .map(|node| Match::new(node.index, node.round, node.slot, self.rng.next_u64()))
            .collect()
    }

    /// Shuffle the entrants into the first round and make match 0 current
    pub fn initialize(&mut self, entrants: Vec<Entrant>) -> Result<()> {
        let expected = self.bracket.entrant_count();
        if entrants.len() != expected {
            log::warn!(
                "Rejected bracket with {} entrants (need {})",
                entrants.len(),
                expected
            );
            return Err(TournamentError::InvalidEntrantCount {
                expected,
                actual: entrants.len(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = entrants.iter().find(|e| !seen.insert(e.id)) {
            return Err(TournamentError::DuplicateEntrant(dup.id));
        }

        let mut order: Vec<EntrantId> = entrants.iter().map(|e| e.id).collect();
        order.shuffle(&mut self.rng);

        self.registry = EntrantRegistry::new(entrants);
        self.matches = self.build_matches();
        for (i, pair) in self.bracket.first_round().zip(order.chunks_exact(2)) {
            self.matches[i].entrant_a = Slot::Entrant(pair[0]);
            self.matches[i].entrant_b = Slot::Entrant(pair[1]);
        }

        self.matches[0].status = MatchStatus::Current;
        self.current = Some(0);
        self.champion = None;
        self.status = TournamentStatus::InProgress;

        log::info!(
            "Bracket seeded: {}",
            self.bracket
                .first_round()
                .map(|i| {
                    let m = &self.matches[i];
                    format!(
                        "{} vs {}",
                        self.slot_name(m.entrant_a),
                        self.slot_name(m.entrant_b)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(())
    }

    /// Seed a fresh bracket from the settings roster
    pub fn initialize_from_roster(&mut self) -> Result<()> {
        let entrants = EntrantRegistry::from_roster(&self.settings.roster)
            .iter()
            .cloned()
            .collect();
        self.initialize(entrants)
    }

    /// Throw away everything and seed a new bracket from the roster.
    ///
    /// A roster that does not fit the bracket is rejected before anything
    /// changes.
    pub fn restart(&mut self) -> Result<()> {
        self.initialize_from_roster()?;
        log::info!("Tournament restarted");
        Ok(())
    }

    /// Register a match-completion listener
    pub fn on_match_complete(&mut self, hook: impl FnMut(&MatchCompletion) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    fn current_index(&self) -> Result<usize> {
        if self.status != TournamentStatus::InProgress {
            return Err(Precondition::NotInProgress.into());
        }
        self.current.ok_or(Precondition::NoCurrentMatch.into())
    }

    /// Serve in the current match (creating its simulation on first use)
    pub fn start_current_match(&mut self) -> Result<bool> {
        let cur = self.current_index()?;
        Ok(self.matches[cur].start(&self.settings.sim))
    }

    /// Restart the current match from 0-0
    pub fn replay_current_match(&mut self) -> Result<bool> {
        let cur = self.current_index()?;
        Ok(self.matches[cur].replay(&self.settings.sim))
    }

    /// Advance the current match one fixed step.
    ///
    /// Input is sampled once here. When the match is decided the result is
    /// recorded, downstream slots are filled and completion hooks run.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> Vec<SimEvent> {
        let Ok(cur) = self.current_index() else {
            return Vec::new();
        };
        let tick_input = match self.settings.control_mode {
            ControlMode::HotSeat => input.sample(),
            ControlMode::Idle => TickInput::default(),
        };

        let events = self.matches[cur].tick(&tick_input, &self.settings.sim, dt);

        if self.matches[cur]
            .simulation()
            .is_some_and(|s| s.is_finished())
        {
            self.finalize_current(cur);
        }
        events
    }

    fn finalize_current(&mut self, cur: usize) {
        if let Some(completion) = self.matches[cur].finalize(&mut self.registry) {
            self.populate_downstream();
            for hook in self.hooks.iter_mut() {
                hook(&completion);
            }
        }
    }

    /// Copy finished feeders' winners into later-round slots.
    ///
    /// Only fills a match once both feeders are finished, and never
    /// overwrites a resolved slot.
    pub fn populate_downstream(&mut self) {
        for node in self.bracket.nodes() {
            let Some([fa, fb]) = node.feeders else {
                continue;
            };
            let (Some(wa), Some(wb)) = (self.matches[fa].winner(), self.matches[fb].winner())
            else {
                continue;
            };
            let target = &mut self.matches[node.index];
            for (side, winner) in [(SlotSide::A, wa), (SlotSide::B, wb)] {
                let slot = match side {
                    SlotSide::A => &mut target.entrant_a,
                    SlotSide::B => &mut target.entrant_b,
                };
                if *slot == Slot::Tbd {
                    *slot = Slot::Entrant(winner);
                }
            }
        }
    }

    /// First match (by index) that can be played next
    fn next_playable(&self) -> Option<usize> {
        self.matches
            .iter()
            .position(|m| m.status == MatchStatus::Pending && m.is_ready())
    }

    /// Move on from a finished current match.
    ///
    /// Returns the index of the new current match, or `None` when the final
    /// has been played and the tournament is over. Fails without changing
    /// anything if the current match is still being played.
    pub fn advance(&mut self) -> Result<Option<usize>> {
        let cur = self.current_index()?;
        if !self.matches[cur].is_finished() {
            log::warn!("advance() called while match {} is unfinished", cur);
            return Err(Precondition::MatchNotFinished(cur).into());
        }

        self.populate_downstream();

        match self.next_playable() {
            Some(next) => {
                self.matches[next].status = MatchStatus::Current;
                self.current = Some(next);
                let m = &self.matches[next];
                log::info!(
                    "Next up: {} {} - {} vs {}",
                    self.bracket.round_name(m.round_index),
                    next,
                    self.slot_name(m.entrant_a),
                    self.slot_name(m.entrant_b)
                );
                Ok(Some(next))
            }
            None => {
                let final_index = self.bracket.final_index();
                debug_assert!(self.matches[final_index].is_finished());
                self.status = TournamentStatus::Finished;
                self.current = None;
                self.champion = self.matches[final_index].winner();
                if let Some(id) = self.champion {
                    log::info!("Champion: {}", self.registry.name_of(id));
                }
                Ok(None)
            }
        }
    }

    fn slot_name(&self, slot: Slot) -> &str {
        match slot {
            Slot::Tbd => "TBD",
            Slot::Entrant(id) => self.registry.name_of(id),
        }
    }

    pub fn status(&self) -> TournamentStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }

    pub fn champion(&self) -> Option<&Entrant> {
        self.champion.and_then(|id| self.registry.get(id))
    }

    pub fn current_match_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current.map(|i| &self.matches[i])
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn registry(&self) -> &EntrantRegistry {
        &self.registry
    }

    /// Rename an entrant (e.g. when the player's profile name arrives).
    ///
    /// The matching roster seat is renamed too, so the name survives
    /// restarts.
    pub fn rename_entrant(&mut self, id: EntrantId, name: &str) -> bool {
        let Some(old) = self.registry.get(id).map(|e| e.display_name.clone()) else {
            return false;
        };
        self.registry.rename(id, name);
        // Roster seats are numbered from 1
        let seat = (id as usize)
            .checked_sub(1)
            .and_then(|i| self.settings.roster.get_mut(i));
        if let Some(entry) = seat.filter(|e| e.name == old) {
            entry.name = name.to_string();
        }
        true
    }

    /// Set the human seat's name in the roster and the live bracket
    pub fn set_player_name(&mut self, name: &str) {
        self.settings.set_player_name(name);
        let human = self.registry.iter().find(|e| !e.is_automated).map(|e| e.id);
        if let Some(id) = human {
            self.registry.rename(id, name);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn params(&self) -> &SimParams {
        &self.settings.sim
    }

    /// Read-only copy of the bracket for renderers
    pub fn snapshot(&self) -> BracketSnapshot {
        let matches = self
            .matches
            .iter()
            .map(|m| {
                let (score_a, score_b) = m.live_score();
                MatchView {
                    id: m.id,
                    round_index: m.round_index,
                    slot_index: m.slot_index,
                    round_name: self.bracket.round_name(m.round_index),
                    entrant_a: m.entrant_a.entrant(),
                    entrant_b: m.entrant_b.entrant(),
                    name_a: self.slot_name(m.entrant_a).to_string(),
                    name_b: self.slot_name(m.entrant_b).to_string(),
                    score_a,
                    score_b,
                    winner: m.winner(),
                    status: m.status,
                }
            })
            .collect();

        BracketSnapshot {
            status: self.status,
            matches,
            current_match_index: self.current,
            champion: self.champion().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::default_roster;
    use crate::sim::SimPhase;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn settings(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            control_mode: ControlMode::Idle,
            ..Default::default()
        }
    }

    fn roster_entrants() -> Vec<Entrant> {
        EntrantRegistry::from_roster(&default_roster("Player 1"))
            .iter()
            .cloned()
            .collect()
    }

    /// Serve and tick the current match until it is recorded
    fn play_current(t: &mut Tournament) {
        let input = InputState::new();
        for _ in 0..20_000 {
            let m = t.current_match().unwrap();
            if m.is_finished() {
                return;
            }
            if matches!(m.phase(), None | Some(SimPhase::Waiting)) {
                t.start_current_match().unwrap();
            }
            t.tick(&input, SIM_DT);
        }
        panic!("match never finished");
    }

    /// Play a match outside the scheduler's order (test-only shortcut)
    fn play_match_directly(t: &mut Tournament, index: usize) {
        let params = t.settings.sim.clone();
        let input = TickInput::default();
        for _ in 0..20_000 {
            let m = &mut t.matches[index];
            if matches!(m.phase(), None | Some(SimPhase::Waiting)) {
                m.start(&params);
            }
            m.tick(&input, &params, SIM_DT);
            if m.simulation().is_some_and(|s| s.is_finished()) {
                m.finalize(&mut t.registry).unwrap();
                return;
            }
        }
        panic!("match never finished");
    }

    fn current_count(t: &Tournament) -> usize {
        t.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Current)
            .count()
    }

    #[test]
    fn test_new_is_seeding() {
        let mut t = Tournament::new(settings(1)).unwrap();
        assert_eq!(t.status(), TournamentStatus::Seeding);
        assert_eq!(t.matches().len(), 7);
        assert!(t.current_match().is_none());
        assert_eq!(
            t.advance(),
            Err(TournamentError::PreconditionViolation(
                Precondition::NotInProgress
            ))
        );
    }

    #[test]
    fn test_initialize_rejects_wrong_count() {
        let mut t = Tournament::new(settings(1)).unwrap();
        let mut entrants = roster_entrants();
        entrants.pop();
        assert_eq!(
            t.initialize(entrants),
            Err(TournamentError::InvalidEntrantCount {
                expected: 8,
                actual: 7
            })
        );
        assert_eq!(t.status(), TournamentStatus::Seeding);
    }

    #[test]
    fn test_initialize_rejects_duplicate_ids() {
        let mut t = Tournament::new(settings(1)).unwrap();
        let mut entrants = roster_entrants();
        entrants[7].id = 3;
        assert_eq!(
            t.initialize(entrants),
            Err(TournamentError::DuplicateEntrant(3))
        );
    }

    #[test]
    fn test_initialize_partitions_entrants() {
        let mut t = Tournament::new(settings(9)).unwrap();
        t.initialize(roster_entrants()).unwrap();
        assert_eq!(t.status(), TournamentStatus::InProgress);

        let mut seen: Vec<EntrantId> = (0..4)
            .flat_map(|i| {
                let m = &t.matches()[i];
                [m.entrant_a.entrant().unwrap(), m.entrant_b.entrant().unwrap()]
            })
            .collect();
        seen.sort();
        assert_eq!(seen, (1..=8).collect::<Vec<_>>());

        for m in &t.matches()[4..] {
            assert_eq!(m.entrant_a, Slot::Tbd);
            assert_eq!(m.entrant_b, Slot::Tbd);
            assert_eq!(m.status, MatchStatus::Pending);
        }
        assert_eq!(t.matches()[0].status, MatchStatus::Current);
        assert_eq!(current_count(&t), 1);
        assert_eq!(t.current_match_index(), Some(0));
    }

    #[test]
    fn test_shuffle_depends_on_seed() {
        let pairs = |seed| {
            let t = Tournament::with_roster(settings(seed)).unwrap();
            t.matches()[..4]
                .iter()
                .map(|m| (m.entrant_a, m.entrant_b))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(5), pairs(5));
        assert!((0..20).any(|s| pairs(s) != pairs(5)));
    }

    #[test]
    fn test_advance_before_finish_changes_nothing() {
        let mut t = Tournament::with_roster(settings(3)).unwrap();
        t.start_current_match().unwrap();
        let before = t.snapshot();
        assert_eq!(
            t.advance(),
            Err(TournamentError::PreconditionViolation(
                Precondition::MatchNotFinished(0)
            ))
        );
        assert_eq!(t.snapshot(), before);
    }

    #[test]
    fn test_propagation_is_order_independent() {
        let mut t = Tournament::with_roster(settings(4)).unwrap();

        play_match_directly(&mut t, 1);
        t.populate_downstream();
        assert_eq!(t.matches[4].entrant_a, Slot::Tbd);
        assert_eq!(t.matches[4].entrant_b, Slot::Tbd);

        play_match_directly(&mut t, 0);
        t.populate_downstream();
        let w0 = t.matches[0].winner().unwrap();
        let w1 = t.matches[1].winner().unwrap();
        assert_eq!(t.matches[4].entrant_a, Slot::Entrant(w0));
        assert_eq!(t.matches[4].entrant_b, Slot::Entrant(w1));

        // Idempotent
        t.populate_downstream();
        assert_eq!(t.matches[4].entrant_a, Slot::Entrant(w0));
        assert_eq!(t.matches[5].entrant_a, Slot::Tbd);
    }

    #[test]
    fn test_full_tournament_runs_in_index_order() {
        let mut t = Tournament::with_roster(settings(2024)).unwrap();
        let completed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&completed);
        t.on_match_complete(move |c| sink.borrow_mut().push(*c));

        let mut order = Vec::new();
        while t.status() == TournamentStatus::InProgress {
            assert_eq!(current_count(&t), 1);
            let cur = t.current_match_index().unwrap();
            play_current(&mut t);
            order.push(cur);

            // Winners reach the next round as soon as both feeders are done
            if cur == 1 {
                assert_eq!(
                    t.matches[4].entrant_a,
                    Slot::Entrant(t.matches[0].winner().unwrap())
                );
                assert_eq!(
                    t.matches[4].entrant_b,
                    Slot::Entrant(t.matches[1].winner().unwrap())
                );
            }
            t.advance().unwrap();
        }

        assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(t.status(), TournamentStatus::Finished);
        assert_eq!(current_count(&t), 0);
        assert!(t.matches().iter().all(|m| m.is_finished()));

        let champion = t.champion().unwrap();
        assert_eq!(Some(champion.id), t.matches()[6].winner());
        assert_eq!(champion.win_count, 3);
        assert_eq!(champion.loss_count, 0);

        // Seven completions, each reported once
        let completed = completed.borrow();
        assert_eq!(completed.len(), 7);
        let ids: Vec<usize> = completed.iter().map(|c| c.match_id).collect();
        assert_eq!(ids, order);

        // Every entrant but the champion lost exactly once
        let losses: u32 = t.registry().iter().map(|e| e.loss_count).sum();
        let wins: u32 = t.registry().iter().map(|e| e.win_count).sum();
        assert_eq!((wins, losses), (7, 7));

        assert!(matches!(
            t.advance(),
            Err(TournamentError::PreconditionViolation(
                Precondition::NotInProgress
            ))
        ));
        assert!(t.tick(&InputState::new(), SIM_DT).is_empty());
    }

    #[test]
    fn test_restart_reseeds() {
        let mut t = Tournament::with_roster(settings(8)).unwrap();
        play_current(&mut t);
        t.advance().unwrap();
        t.rename_entrant(1, "Ada");

        t.restart().unwrap();
        assert_eq!(t.status(), TournamentStatus::InProgress);
        assert_eq!(t.current_match_index(), Some(0));
        assert!(t.matches().iter().all(|m| !m.is_finished()));
        assert!(t.registry().iter().all(|e| e.win_count == 0 && e.loss_count == 0));
        // The renamed seat keeps its name
        assert_eq!(t.registry().name_of(1), "Ada");
        assert_eq!(t.registry().name_of(2), "Alpha");
        assert!(t.champion().is_none());
    }

    #[test]
    fn test_player_name_survives_restart() {
        let mut t = Tournament::with_roster(settings(8)).unwrap();
        t.set_player_name("Grace");
        assert_eq!(t.registry().name_of(1), "Grace");
        t.restart().unwrap();
        assert_eq!(t.registry().name_of(1), "Grace");
        assert_eq!(t.settings().roster[0].name, "Grace");
    }

    #[test]
    fn test_restart_with_bad_roster_changes_nothing() {
        let mut short = settings(6);
        short.roster.pop();
        let mut t = Tournament::new(short).unwrap();
        t.initialize(roster_entrants()).unwrap();
        let before = t.snapshot();

        assert_eq!(
            t.restart(),
            Err(TournamentError::InvalidEntrantCount {
                expected: 8,
                actual: 7
            })
        );
        assert_eq!(t.status(), TournamentStatus::InProgress);
        assert_eq!(t.current_match_index(), Some(0));
        assert_eq!(current_count(&t), 1);
        assert_eq!(t.snapshot(), before);
    }

    #[test]
    fn test_snapshot_view() {
        let t = Tournament::with_roster(settings(12)).unwrap();
        let snap = t.snapshot();
        assert_eq!(snap.status, TournamentStatus::InProgress);
        assert_eq!(snap.current_match_index, Some(0));
        assert_eq!(snap.matches.len(), 7);
        assert_eq!(snap.matches[0].round_name, "Quarterfinal");
        assert_eq!(snap.matches[6].round_name, "Final");
        assert_eq!(snap.matches[6].name_a, "TBD");
        assert!(snap.champion.is_none());

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"current_match_index\":0"));
    }

    #[test]
    fn test_hot_seat_input_moves_paddles() {
        let mut t = Tournament::with_roster(Settings {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        t.start_current_match().unwrap();
        let start = t.current_match().unwrap().simulation().unwrap().paddle_a.y;

        let mut input = InputState::new();
        input.key_down("w");
        t.tick(&input, SIM_DT);
        let moved = t.current_match().unwrap().simulation().unwrap().paddle_a.y;
        assert!(moved < start);
    }

    #[test]
    fn test_idle_mode_ignores_input() {
        let mut t = Tournament::with_roster(settings(1)).unwrap();
        t.start_current_match().unwrap();
        let start = t.current_match().unwrap().simulation().unwrap().paddle_a.y;

        let mut input = InputState::new();
        input.key_down("w");
        t.tick(&input, SIM_DT);
        let after = t.current_match().unwrap().simulation().unwrap().paddle_a.y;
        assert_eq!(after, start);
    }

    #[test]
    fn test_invalid_bracket_size() {
        let result = Tournament::new(Settings {
            bracket_size: 6,
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(TournamentError::InvalidBracketSize(6))
        ));
    }
}
