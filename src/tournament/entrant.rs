//! Entrant records and the registry that owns them
//!
//! Entrants live for the whole tournament; only their win/loss counters change.

use serde::{Deserialize, Serialize};

use crate::settings::RosterEntry;

/// Stable entrant identifier (1-based; 0 is never issued)
pub type EntrantId = u32;

/// A tournament participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub display_name: String,
    pub is_automated: bool,
    pub win_count: u32,
    pub loss_count: u32,
}

impl Entrant {
    pub fn new(id: EntrantId, display_name: impl Into<String>, is_automated: bool) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_automated,
            win_count: 0,
            loss_count: 0,
        }
    }
}

/// All entrants of one tournament
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntrantRegistry {
    entrants: Vec<Entrant>,
}

impl EntrantRegistry {
    pub fn new(entrants: Vec<Entrant>) -> Self {
        Self { entrants }
    }

    /// Build entrants from a roster, numbering them 1..=n in roster order
    pub fn from_roster(roster: &[RosterEntry]) -> Self {
        let entrants = roster
            .iter()
            .zip(1..)
            .map(|(entry, id)| Entrant::new(id, entry.name.clone(), entry.automated))
            .collect();
        Self { entrants }
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn get(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntrantId) -> Option<&mut Entrant> {
        self.entrants.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entrant> {
        self.entrants.iter()
    }

    pub fn ids(&self) -> Vec<EntrantId> {
        self.entrants.iter().map(|e| e.id).collect()
    }

    /// Display name, or "TBD" for unknown ids
    pub fn name_of(&self, id: EntrantId) -> &str {
        self.get(id).map(|e| e.display_name.as_str()).unwrap_or("TBD")
    }

    /// Rename an entrant (e.g. once the signed-in player's profile loads)
    pub fn rename(&mut self, id: EntrantId, name: &str) -> bool {
        match self.get_mut(id) {
            Some(entrant) => {
                entrant.display_name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Credit a finished match to both entrants
    pub fn record_result(&mut self, winner: EntrantId, loser: EntrantId) {
        if let Some(w) = self.get_mut(winner) {
            w.win_count += 1;
        }
        if let Some(l) = self.get_mut(loser) {
            l.loss_count += 1;
        }
    }

    /// Entrants ranked by wins (desc), then losses (asc), then id
    pub fn standings(&self) -> Vec<&Entrant> {
        let mut ranked: Vec<&Entrant> = self.entrants.iter().collect();
        ranked.sort_by(|a, b| {
            b.win_count
                .cmp(&a.win_count)
                .then(a.loss_count.cmp(&b.loss_count))
                .then(a.id.cmp(&b.id))
        });
        ranked
    }
}
