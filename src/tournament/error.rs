//! Error types for bracket setup and progression

use thiserror::Error;

/// A rule an operation required but the current state did not satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("match {0} is not finished")]
    MatchNotFinished(usize),
    #[error("tournament is not in progress")]
    NotInProgress,
    #[error("there is no current match")]
    NoCurrentMatch,
}

/// Error type for tournament operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    /// Wrong number of entrants for the bracket
    #[error("bracket needs exactly {expected} entrants, got {actual}")]
    InvalidEntrantCount { expected: usize, actual: usize },

    /// The same entrant id appears twice
    #[error("entrant {0} appears more than once")]
    DuplicateEntrant(u32),

    /// Bracket sizes must be a power of two, at least 2
    #[error("invalid bracket size {0}: must be a power of two of at least 2")]
    InvalidBracketSize(usize),

    /// Operation called in the wrong state; nothing was changed
    #[error("precondition violated: {0}")]
    PreconditionViolation(#[from] Precondition),
}

/// Result type for tournament operations
pub type Result<T> = std::result::Result<T, TournamentError>;
