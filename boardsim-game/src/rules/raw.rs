//! Serde shapes of the rule document as written on disk.
//!
//! These mirror the file one-to-one. Cross-references are checked when the
//! raw document is lifted into [`super::RuleDocument`].
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CARDS_PER_TURN, DEFAULT_DIE_FACES, DEFAULT_MAX_TURNS, DEFAULT_START_TILE,
};
use crate::effect::{CardTiming, Effect};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRuleDocument {
    pub game: RawGameInfo,
    pub players: RawPlayerBounds,
    pub components: RawComponents,
    pub setup: RawSetup,
    #[serde(default)]
    pub turn: RawTurn,
    #[serde(default)]
    pub statuses: Vec<RawStatus>,
    pub victory: RawVictory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGameInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPlayerBounds {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComponents {
    #[serde(default)]
    pub dice: RawDice,
    pub board: RawBoard,
    pub deck: RawDeck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDice {
    #[serde(default = "RawDice::default_faces")]
    pub faces: u8,
}

impl RawDice {
    const fn default_faces() -> u8 {
        DEFAULT_DIE_FACES
    }
}

impl Default for RawDice {
    fn default() -> Self {
        Self {
            faces: Self::default_faces(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBoard {
    pub tiles: Vec<RawTile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTile {
    pub index: u16,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDeck {
    pub size: u16,
    #[serde(default)]
    pub cards: Vec<RawCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    pub name: String,
    pub timing: CardTiming,
    pub effect: Effect,
    pub copies: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSetup {
    pub initial_hand: u8,
    pub max_hand: u8,
    #[serde(default = "RawSetup::default_start_tile")]
    pub start_tile: u16,
    /// Free-text setup steps kept for reports; the engine does not interpret them.
    #[serde(default)]
    pub steps: Vec<String>,
}

impl RawSetup {
    const fn default_start_tile() -> u16 {
        DEFAULT_START_TILE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTurn {
    #[serde(default = "RawTurn::default_cards_per_turn")]
    pub cards_per_turn: u8,
    #[serde(default = "RawTurn::default_max_turns")]
    pub max_turns: u32,
}

impl RawTurn {
    const fn default_cards_per_turn() -> u8 {
        DEFAULT_CARDS_PER_TURN
    }

    const fn default_max_turns() -> u32 {
        DEFAULT_MAX_TURNS
    }
}

impl Default for RawTurn {
    fn default() -> Self {
        Self {
            cards_per_turn: Self::default_cards_per_turn(),
            max_turns: Self::default_max_turns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatus {
    pub name: String,
    pub trigger_tile: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawVictoryKind {
    ExactLanding,
    FirstToReach,
    PointsThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVictory {
    pub kind: RawVictoryKind,
    #[serde(default)]
    pub threshold: Option<u32>,
    #[serde(default = "RawVictory::default_effects_can_win")]
    pub effects_can_win: bool,
    #[serde(default)]
    pub rebound_resolves_tile: bool,
}

impl RawVictory {
    const fn default_effects_can_win() -> bool {
        true
    }
}
