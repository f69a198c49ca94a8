//! Typed errors raised by the engine.
use std::path::PathBuf;
use thiserror::Error;

use crate::deck::CardId;
use crate::player::PlayerId;
use crate::turn::TurnPhase;

/// Fatal errors raised while loading a rule document.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("failed to read rule document {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rule document does not match the schema: {0}")]
    Schema(String),
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

impl From<serde_yaml::Error> for RuleError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

/// Errors raised while loading agent profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read agent profiles {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("agent profiles do not match the schema: {0}")]
    Schema(String),
    #[error("profile '{profile}' sets {field} to {value}; weights must lie in 0..=1")]
    OutOfRange {
        profile: String,
        field: &'static str,
        value: f64,
    },
}

impl From<serde_yaml::Error> for ProfileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

/// Cross-reference violations detected after a document parsed cleanly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("board declares no tiles")]
    EmptyBoard,
    #[error("board needs a start and an exit tile (got {tiles} tile)")]
    BoardTooShort { tiles: usize },
    #[error("tile indices must run 1..N without gaps: expected {expected}, found {found}")]
    TileGap { expected: u16, found: u16 },
    #[error("{context} references tile {tile} outside 1..={exit}")]
    UnknownTile {
        context: String,
        tile: u16,
        exit: u16,
    },
    #[error("{context} references undeclared status '{status}'")]
    UnknownStatus { context: String, status: String },
    #[error("card copies sum to {actual} but the deck declares {declared}")]
    CopyCountMismatch { declared: u16, actual: u32 },
    #[error("card '{name}' is declared more than once")]
    DuplicateCard { name: String },
    #[error("status '{name}' is declared more than once")]
    DuplicateStatus { name: String },
    #[error("initial hand {initial} exceeds maximum hand {max}")]
    InitialHandExceedsMax { initial: u8, max: u8 },
    #[error("maximum hand size must be positive when the deck holds cards")]
    ZeroHandLimit,
    #[error("player bounds invalid (min {min}, max {max})")]
    PlayerBounds { min: u8, max: u8 },
    #[error("start tile {start} must lie before the exit tile {exit}")]
    StartOutsideBoard { start: u16, exit: u16 },
    #[error("exact_landing_required may only mark the exit tile {exit} (found on tile {tile})")]
    ExactLandingMisplaced { tile: u16, exit: u16 },
    #[error("tile {tile} carries the reactive-only effect '{effect}'")]
    InterceptorOnTile { tile: u16, effect: &'static str },
    #[error("card '{card}' has timing {timing} but effect '{effect}'")]
    TimingMismatch {
        card: String,
        timing: &'static str,
        effect: &'static str,
    },
    #[error("{context} draws cards but the deck is empty")]
    DrawFromEmptyDeck { context: String },
    #[error("reroll branch {from}-{to} in {context} lies outside 1..={faces}")]
    BranchOutOfRange {
        context: String,
        from: u8,
        to: u8,
        faces: u8,
    },
    #[error("points_threshold victory requires a positive threshold")]
    MissingThreshold,
    #[error("victory is unreachable: {reason}")]
    UnreachableVictory { reason: &'static str },
}

/// Deck manager failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("{player} does not hold card {card}")]
    NotInHand { player: PlayerId, card: CardId },
    #[error("requested {requested} cards but the deck only holds {total}")]
    Exhausted { requested: usize, total: usize },
}

/// Illegal actions submitted by an agent. Always recovered as a no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{player} does not hold card {card}")]
    NotInHand { player: PlayerId, card: CardId },
    #[error("card '{card}' ({timing}) cannot be played in the {window} window")]
    WrongTiming {
        card: String,
        timing: &'static str,
        window: &'static str,
    },
    #[error("{player} cannot act during the {phase} phase")]
    WrongPhase { player: PlayerId, phase: TurnPhase },
    #[error("{target:?} is not a valid target for '{card}'")]
    InvalidTarget {
        card: String,
        target: Option<PlayerId>,
    },
    #[error("card play limit of {limit} reached this turn")]
    CardLimitReached { limit: u8 },
}

/// Errors raised while constructing or driving a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{requested} players requested but the rules allow {min}..={max}")]
    PlayerCount { requested: usize, min: u8, max: u8 },
    #[error("session has {seats} seats but {agents} agents were supplied")]
    AgentCount { seats: usize, agents: usize },
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_errors_lift_into_rule_errors() {
        let err: RuleError = ConsistencyError::MissingThreshold.into();
        assert!(matches!(
            err,
            RuleError::Consistency(ConsistencyError::MissingThreshold)
        ));
        assert_eq!(
            err.to_string(),
            "points_threshold victory requires a positive threshold"
        );
    }

    #[test]
    fn action_errors_render_players_and_cards() {
        let err = ActionError::NotInHand {
            player: PlayerId(1),
            card: CardId(4),
        };
        assert_eq!(err.to_string(), "P2 does not hold card #4");
    }
}
