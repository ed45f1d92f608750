//! Single-elimination bracket topology
//!
//! Matches are stored round by round: the first round occupies indices
//! `0..n/2`, the next round follows, and the final is the last index. Each
//! later-round match is fed by two consecutive matches of the previous round.
//! For eight entrants this gives quarterfinals 0-3, semifinals 4 (fed by 0, 1)
//! and 5 (fed by 2, 3), and the final 6 (fed by 4, 5).

use serde::{Deserialize, Serialize};

use super::error::{Result, TournamentError};

/// Which entrant slot of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotSide {
    A,
    B,
}

/// Position of one match in the bracket graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketNode {
    pub index: usize,
    /// 0 for the first round
    pub round: usize,
    /// Position within the round
    pub slot: usize,
    /// Matches whose winners fill slots A and B; `None` in the first round
    pub feeders: Option<[usize; 2]>,
    /// Where this match's winner goes; `None` for the final
    pub parent: Option<(usize, SlotSide)>,
}

/// The full feeder graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    entrant_count: usize,
    rounds: usize,
    nodes: Vec<BracketNode>,
}

impl Bracket {
    /// Build the graph for `entrant_count` entrants (power of two, >= 2)
    pub fn new(entrant_count: usize) -> Result<Self> {
        if entrant_count < 2 || !entrant_count.is_power_of_two() {
            return Err(TournamentError::InvalidBracketSize(entrant_count));
        }

        let rounds = entrant_count.trailing_zeros() as usize;
        let mut nodes: Vec<BracketNode> = Vec::with_capacity(entrant_count - 1);

        let mut round_start = 0;
        let mut prev_start = 0;
        let mut in_round = entrant_count / 2;
        for round in 0..rounds {
            for slot in 0..in_round {
                let feeders = (round > 0).then(|| {
                    let first = prev_start + slot * 2;
                    [first, first + 1]
                });
                nodes.push(BracketNode {
                    index: round_start + slot,
                    round,
                    slot,
                    feeders,
                    parent: None,
                });
            }
            prev_start = round_start;
            round_start += in_round;
            in_round /= 2;
        }

        // Parent links are the inverse of feeder links
        let links: Vec<(usize, usize, SlotSide)> = nodes
            .iter()
            .filter_map(|n| n.feeders.map(|[a, b]| (n.index, a, b)))
            .flat_map(|(parent, a, b)| [(a, parent, SlotSide::A), (b, parent, SlotSide::B)])
            .collect();
        for (child, parent, side) in links {
            nodes[child].parent = Some((parent, side));
        }

        Ok(Self {
            entrant_count,
            rounds,
            nodes,
        })
    }

    pub fn entrant_count(&self) -> usize {
        self.entrant_count
    }

    pub fn match_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn nodes(&self) -> &[BracketNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&BracketNode> {
        self.nodes.get(index)
    }

    /// Index of the final
    pub fn final_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// First-round match indices
    pub fn first_round(&self) -> std::ops::Range<usize> {
        0..self.entrant_count / 2
    }

    pub fn feeders(&self, index: usize) -> Option<[usize; 2]> {
        self.nodes.get(index).and_then(|n| n.feeders)
    }

    pub fn parent(&self, index: usize) -> Option<(usize, SlotSide)> {
        self.nodes.get(index).and_then(|n| n.parent)
    }

    /// Display name for a round, counted back from the final
    pub fn round_name(&self, round: usize) -> String {
        match self.rounds.saturating_sub(round + 1) {
            0 => "Final".to_string(),
            1 => "Semifinal".to_string(),
            2 => "Quarterfinal".to_string(),
            _ => format!("Round {}", round + 1),
        }
    }
}
