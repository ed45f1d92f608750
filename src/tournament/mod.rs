//! Single-elimination tournament
//!
//! - `bracket`: Feeder graph (which match feeds which slot)
//! - `entrant`: Participants and their win/loss records
//! - `matches`: One match bound to a simulation
//! - `scheduler`: Seeding, winner propagation and match selection

pub mod bracket;
pub mod entrant;
pub mod error;
pub mod matches;
pub mod scheduler;

pub use bracket::{Bracket, BracketNode, SlotSide};
pub use entrant::{Entrant, EntrantId, EntrantRegistry};
pub use error::{Precondition, TournamentError};
pub use matches::{Match, MatchCompletion, MatchResult, MatchStatus, Slot};
pub use scheduler::{BracketSnapshot, CompletionHook, MatchView, Tournament, TournamentStatus};
