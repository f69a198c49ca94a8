//! Validated, immutable rule document.
//!
//! A document is parsed into [`raw::RawRuleDocument`] with serde and then
//! lifted into a [`RuleDocument`], which checks every cross-reference once so
//! the engine can index tiles, cards and statuses without further checks.
pub mod raw;

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::deck::CardId;
use crate::effect::{CardTiming, Effect, Predicate, ReactionTrigger};
use crate::error::{ConsistencyError, RuleError};
use crate::status::StatusRule;
use raw::{RawCard, RawRuleDocument, RawTile, RawVictoryKind};

/// A board position and the effect resolved when a player lands on it by roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub index: u16,
    pub name: Option<String>,
    pub effect: Effect,
}

impl Tile {
    /// Display label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .as_ref()
            .map_or_else(|| format!("tile {}", self.index), |name| format!("{name} ({})", self.index))
    }
}

/// One distinct card; the deck holds `copies` instances of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDef {
    pub id: CardId,
    pub name: String,
    pub timing: CardTiming,
    pub effect: Effect,
    pub copies: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerBounds {
    pub min: u8,
    pub max: u8,
}

impl PlayerBounds {
    #[must_use]
    pub fn contains(self, players: usize) -> bool {
        (usize::from(self.min)..=usize::from(self.max)).contains(&players)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupRules {
    pub initial_hand: u8,
    pub max_hand: u8,
    pub start_tile: u16,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRules {
    pub cards_per_turn: u8,
    pub max_turns: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VictoryKind {
    /// Reach the exit with zero overshoot; overshoot rebounds once.
    ExactLanding,
    /// Reach or pass the exit; movement clamps at the exit.
    FirstToReach,
    /// Accumulate at least `threshold` points.
    PointsThreshold { threshold: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VictoryRule {
    pub kind: VictoryKind,
    /// Whether a player placed on the exit by an effect wins on that turn.
    pub effects_can_win: bool,
    /// Whether the tile a rebounding move stops on resolves its effect.
    pub rebound_resolves_tile: bool,
}

/// Parsed and validated rule document. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDocument {
    name: String,
    description: Option<String>,
    players: PlayerBounds,
    die_faces: u8,
    tiles: Vec<Tile>,
    cards: Vec<CardDef>,
    #[serde(skip)]
    card_index: HashMap<String, CardId>,
    deck_size: u16,
    setup: SetupRules,
    turn: TurnRules,
    statuses: Vec<StatusRule>,
    victory: VictoryRule,
    exact_landing: bool,
}

impl RuleDocument {
    /// Parse a YAML (or JSON) rule document.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Schema`] when a field is missing or ill-typed and
    /// [`RuleError::Consistency`] when cross-references do not line up.
    pub fn from_yaml_str(source: &str) -> Result<Self, RuleError> {
        let raw: RawRuleDocument = serde_yaml::from_str(source)?;
        Ok(Self::from_raw(raw)?)
    }

    /// Parse a JSON rule document.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_yaml_str`].
    pub fn from_json_str(source: &str) -> Result<Self, RuleError> {
        let raw: RawRuleDocument = serde_json::from_str(source)?;
        Ok(Self::from_raw(raw)?)
    }

    /// Load a rule document from disk. `.json` files use the JSON parser,
    /// everything else is read as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Self::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let document = if is_json {
            Self::from_json_str(&source)?
        } else {
            Self::from_yaml_str(&source)?
        };
        log::debug!(
            "loaded rule document '{}' from {} ({} tiles, {} cards)",
            document.name,
            path.display(),
            document.tiles.len(),
            document.deck_size
        );
        Ok(document)
    }

    /// Lift a raw document, checking every cross-reference.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConsistencyError`] found.
    pub fn from_raw(raw: RawRuleDocument) -> Result<Self, ConsistencyError> {
        let players = PlayerBounds {
            min: raw.players.min,
            max: raw.players.max,
        };
        if players.min == 0 || players.min > players.max {
            return Err(ConsistencyError::PlayerBounds {
                min: players.min,
                max: players.max,
            });
        }

        let tiles = Self::build_tiles(raw.components.board.tiles)?;
        let exit = u16::try_from(tiles.len()).unwrap_or(u16::MAX);
        let faces = raw.components.dice.faces;
        let deck_size = raw.components.deck.size;

        let start_tile = raw.setup.start_tile;
        if start_tile == 0 || start_tile >= exit {
            return Err(ConsistencyError::StartOutsideBoard {
                start: start_tile,
                exit,
            });
        }

        let statuses = Self::build_statuses(raw.statuses, exit)?;
        let ctx = CheckContext {
            exit,
            faces,
            deck_empty: deck_size == 0,
            statuses: statuses.iter().map(|status| status.name.as_str()).collect(),
        };

        for tile in &tiles {
            let context = format!("tile {}", tile.index);
            ctx.check_effect(&context, &tile.effect)?;
            let mut interceptor = None;
            tile.effect.walk(&mut |effect| {
                if interceptor.is_none() && effect.is_interceptor() {
                    interceptor = Some(effect.label());
                }
            });
            if let Some(effect) = interceptor {
                return Err(ConsistencyError::InterceptorOnTile {
                    tile: tile.index,
                    effect,
                });
            }
            let mut marks_exact = false;
            tile.effect
                .walk(&mut |effect| marks_exact |= matches!(effect, Effect::ExactLandingRequired));
            if marks_exact && tile.index != exit {
                return Err(ConsistencyError::ExactLandingMisplaced {
                    tile: tile.index,
                    exit,
                });
            }
        }

        let cards = Self::build_cards(raw.components.deck.cards, deck_size, &ctx)?;
        let card_index = cards
            .iter()
            .map(|card| (card.name.clone(), card.id))
            .collect();

        if raw.setup.initial_hand > raw.setup.max_hand {
            return Err(ConsistencyError::InitialHandExceedsMax {
                initial: raw.setup.initial_hand,
                max: raw.setup.max_hand,
            });
        }
        if raw.setup.max_hand == 0 && deck_size > 0 {
            return Err(ConsistencyError::ZeroHandLimit);
        }

        if faces == 0 {
            return Err(ConsistencyError::UnreachableVictory {
                reason: "the die has no faces",
            });
        }
        let kind = match raw.victory.kind {
            RawVictoryKind::ExactLanding => VictoryKind::ExactLanding,
            RawVictoryKind::FirstToReach => VictoryKind::FirstToReach,
            RawVictoryKind::PointsThreshold => {
                let threshold = raw
                    .victory
                    .threshold
                    .filter(|threshold| *threshold > 0)
                    .ok_or(ConsistencyError::MissingThreshold)?;
                let mut awards_points = false;
                let effects = tiles
                    .iter()
                    .map(|tile| &tile.effect)
                    .chain(cards.iter().map(|card| &card.effect));
                for effect in effects {
                    effect.walk(&mut |inner| {
                        awards_points |=
                            matches!(inner, Effect::GainPoints { amount, .. } if *amount > 0);
                    });
                }
                if !awards_points {
                    return Err(ConsistencyError::UnreachableVictory {
                        reason: "no effect awards points",
                    });
                }
                VictoryKind::PointsThreshold { threshold }
            }
        };
        let exact_landing = matches!(kind, VictoryKind::ExactLanding)
            || tiles
                .last()
                .is_some_and(|tile| matches!(tile.effect, Effect::ExactLandingRequired));

        Ok(Self {
            name: raw.game.name,
            description: raw.game.description,
            players,
            die_faces: faces,
            tiles,
            cards,
            card_index,
            deck_size,
            setup: SetupRules {
                initial_hand: raw.setup.initial_hand,
                max_hand: raw.setup.max_hand,
                start_tile,
                steps: raw.setup.steps,
            },
            turn: TurnRules {
                cards_per_turn: raw.turn.cards_per_turn,
                max_turns: raw.turn.max_turns,
            },
            statuses,
            victory: VictoryRule {
                kind,
                effects_can_win: raw.victory.effects_can_win,
                rebound_resolves_tile: raw.victory.rebound_resolves_tile,
            },
            exact_landing,
        })
    }

    fn build_tiles(mut raw: Vec<RawTile>) -> Result<Vec<Tile>, ConsistencyError> {
        if raw.is_empty() {
            return Err(ConsistencyError::EmptyBoard);
        }
        raw.sort_by_key(|tile| tile.index);
        let mut tiles = Vec::with_capacity(raw.len());
        for (offset, tile) in raw.into_iter().enumerate() {
            let expected = u16::try_from(offset + 1).unwrap_or(u16::MAX);
            if tile.index != expected {
                return Err(ConsistencyError::TileGap {
                    expected,
                    found: tile.index,
                });
            }
            tiles.push(Tile {
                index: tile.index,
                name: tile.name,
                effect: tile.effect,
            });
        }
        if tiles.len() < 2 {
            return Err(ConsistencyError::BoardTooShort { tiles: tiles.len() });
        }
        Ok(tiles)
    }

    fn build_statuses(
        raw: Vec<raw::RawStatus>,
        exit: u16,
    ) -> Result<Vec<StatusRule>, ConsistencyError> {
        let mut seen = HashSet::new();
        let mut statuses = Vec::with_capacity(raw.len());
        for status in raw {
            if !seen.insert(status.name.clone()) {
                return Err(ConsistencyError::DuplicateStatus { name: status.name });
            }
            if status.trigger_tile == 0 || status.trigger_tile > exit {
                return Err(ConsistencyError::UnknownTile {
                    context: format!("status '{}'", status.name),
                    tile: status.trigger_tile,
                    exit,
                });
            }
            statuses.push(StatusRule {
                name: status.name,
                trigger_tile: status.trigger_tile,
            });
        }
        Ok(statuses)
    }

    fn build_cards(
        raw: Vec<RawCard>,
        deck_size: u16,
        ctx: &CheckContext<'_>,
    ) -> Result<Vec<CardDef>, ConsistencyError> {
        let mut seen = HashSet::new();
        let mut actual: u32 = 0;
        let mut cards = Vec::with_capacity(raw.len());
        for (offset, card) in raw.into_iter().enumerate() {
            if !seen.insert(card.name.clone()) {
                return Err(ConsistencyError::DuplicateCard { name: card.name });
            }
            ctx.check_effect(&format!("card '{}'", card.name), &card.effect)?;
            check_timing(&card)?;
            actual += u32::from(card.copies);
            cards.push(CardDef {
                id: CardId(u16::try_from(offset).unwrap_or(u16::MAX)),
                name: card.name,
                timing: card.timing,
                effect: card.effect,
                copies: card.copies,
            });
        }
        if actual != u32::from(deck_size) {
            return Err(ConsistencyError::CopyCountMismatch {
                declared: deck_size,
                actual,
            });
        }
        Ok(cards)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn player_bounds(&self) -> PlayerBounds {
        self.players
    }

    #[must_use]
    pub const fn die_faces(&self) -> u8 {
        self.die_faces
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at a one-based board index.
    #[must_use]
    pub fn tile(&self, index: u16) -> Option<&Tile> {
        usize::from(index)
            .checked_sub(1)
            .and_then(|offset| self.tiles.get(offset))
    }

    /// Index of the last tile.
    #[must_use]
    pub fn exit_tile(&self) -> u16 {
        u16::try_from(self.tiles.len()).unwrap_or(u16::MAX)
    }

    #[must_use]
    pub fn cards(&self) -> &[CardDef] {
        &self.cards
    }

    /// Card definition for an id handed out by this document.
    ///
    /// # Panics
    ///
    /// Panics if the id was not produced by this document.
    #[must_use]
    pub fn card(&self, id: CardId) -> &CardDef {
        &self.cards[usize::from(id.0)]
    }

    #[must_use]
    pub fn card_by_name(&self, name: &str) -> Option<&CardDef> {
        self.card_index.get(name).map(|id| self.card(*id))
    }

    #[must_use]
    pub const fn deck_size(&self) -> u16 {
        self.deck_size
    }

    /// Every card instance in declaration order, `copies` times each.
    #[must_use]
    pub fn deck_composition(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .flat_map(|card| std::iter::repeat_n(card.id, usize::from(card.copies)))
            .collect()
    }

    #[must_use]
    pub const fn setup(&self) -> &SetupRules {
        &self.setup
    }

    #[must_use]
    pub const fn initial_hand_size(&self) -> u8 {
        self.setup.initial_hand
    }

    #[must_use]
    pub const fn max_hand_size(&self) -> u8 {
        self.setup.max_hand
    }

    #[must_use]
    pub const fn turn_rules(&self) -> TurnRules {
        self.turn
    }

    #[must_use]
    pub fn status_rules(&self) -> &[StatusRule] {
        &self.statuses
    }

    #[must_use]
    pub const fn victory(&self) -> VictoryRule {
        self.victory
    }

    /// Whether forward movement past the exit rebounds instead of clamping.
    #[must_use]
    pub const fn exact_landing(&self) -> bool {
        self.exact_landing
    }

    /// Whether a forward move of `delta` from `from` overshoots the exit and rebounds.
    #[must_use]
    pub fn rebounds(&self, from: u16, delta: i32) -> bool {
        self.exact_landing && delta > 0 && i32::from(from) + delta > i32::from(self.exit_tile())
    }

    /// Where a piece on `from` ends up after a signed move of `delta` tiles.
    ///
    /// Forward overshoot under exact landing rebounds once
    /// (`exit - (target - exit)`); everything else clamps to `0..=exit`.
    #[must_use]
    pub fn landing_position(&self, from: u16, delta: i32) -> u16 {
        let exit = i32::from(self.exit_tile());
        let target = i32::from(from) + delta;
        let landed = if delta > 0 && self.exact_landing && target > exit {
            exit - (target - exit)
        } else {
            target
        };
        u16::try_from(landed.clamp(0, exit)).unwrap_or(0)
    }
}

struct CheckContext<'a> {
    exit: u16,
    faces: u8,
    deck_empty: bool,
    statuses: HashSet<&'a str>,
}

impl CheckContext<'_> {
    fn check_effect(&self, context: &str, effect: &Effect) -> Result<(), ConsistencyError> {
        if self.deck_empty && effect.draws_cards() {
            return Err(ConsistencyError::DrawFromEmptyDeck {
                context: context.to_string(),
            });
        }
        let mut result = Ok(());
        effect.walk(&mut |inner| {
            if result.is_ok() {
                result = self.check_single(context, inner);
            }
        });
        result
    }

    fn check_single(&self, context: &str, effect: &Effect) -> Result<(), ConsistencyError> {
        match effect {
            Effect::Goto { tile } => self.check_tile(context, *tile),
            Effect::RerollBranch { branches } => {
                for branch in branches {
                    if branch.from == 0 || branch.from > branch.to || branch.to > self.faces {
                        return Err(ConsistencyError::BranchOutOfRange {
                            context: context.to_string(),
                            from: branch.from,
                            to: branch.to,
                            faces: self.faces,
                        });
                    }
                }
                Ok(())
            }
            Effect::Conditional { predicate, .. } => self.check_predicate(context, predicate),
            _ => Ok(()),
        }
    }

    fn check_predicate(&self, context: &str, predicate: &Predicate) -> Result<(), ConsistencyError> {
        let mut result = Ok(());
        predicate.walk(&mut |inner| {
            if result.is_err() {
                return;
            }
            result = match inner {
                Predicate::HasStatus { status } if !self.statuses.contains(status.as_str()) => {
                    Err(ConsistencyError::UnknownStatus {
                        context: context.to_string(),
                        status: status.clone(),
                    })
                }
                Predicate::PositionAtLeast { tile } => self.check_tile(context, *tile),
                _ => Ok(()),
            };
        });
        result
    }

    fn check_tile(&self, context: &str, tile: u16) -> Result<(), ConsistencyError> {
        if tile == 0 || tile > self.exit {
            return Err(ConsistencyError::UnknownTile {
                context: context.to_string(),
                tile,
                exit: self.exit,
            });
        }
        Ok(())
    }
}

fn check_timing(card: &RawCard) -> Result<(), ConsistencyError> {
    let effect = &card.effect;
    let fits = match card.timing {
        CardTiming::OwnTurn => {
            let mut has_interceptor = false;
            effect.walk(&mut |inner| has_interceptor |= inner.is_interceptor());
            !has_interceptor
        }
        CardTiming::ReactiveAnyTime => {
            effect.intercepts_targeting() || effect.intercepts_movement()
        }
        CardTiming::ReactiveOnTrigger(ReactionTrigger::Targeted) => effect.intercepts_targeting(),
        CardTiming::ReactiveOnTrigger(ReactionTrigger::OpponentMovement) => {
            effect.intercepts_movement()
        }
    };
    if fits {
        Ok(())
    } else {
        Err(ConsistencyError::TimingMismatch {
            card: card.name.clone(),
            timing: card.timing.label(),
            effect: effect.label(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r"
game: { name: Mini }
players: { min: 2, max: 2 }
components:
  board:
    tiles:
      - { index: 1 }
      - { index: 2, effect: { kind: draw_cards, count: 1 } }
      - { index: 3, effect: { kind: goto, tile: 1 } }
      - { index: 4 }
  deck:
    size: 3
    cards:
      - { name: Sprint, timing: own_turn, effect: { kind: advance, steps: 2 }, copies: 2 }
      - { name: Shield, timing: reactive_any_time, effect: { kind: block }, copies: 1 }
setup: { initial_hand: 1, max_hand: 2 }
victory: { kind: exact_landing }
";

    fn with(find: &str, replace: &str) -> Result<RuleDocument, RuleError> {
        RuleDocument::from_yaml_str(&MINIMAL.replace(find, replace))
    }

    fn consistency(result: Result<RuleDocument, RuleError>) -> ConsistencyError {
        match result {
            Err(RuleError::Consistency(err)) => err,
            other => panic!("expected consistency error, got {other:?}"),
        }
    }

    #[test]
    fn loads_minimal_document_with_defaults() {
        let rules = RuleDocument::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(rules.name(), "Mini");
        assert_eq!(rules.exit_tile(), 4);
        assert_eq!(rules.die_faces(), 6);
        assert_eq!(rules.setup().start_tile, 1);
        assert_eq!(rules.turn_rules().cards_per_turn, 1);
        assert_eq!(rules.turn_rules().max_turns, 500);
        assert!(rules.victory().effects_can_win);
        assert!(!rules.victory().rebound_resolves_tile);
        assert!(rules.exact_landing());
        assert_eq!(rules.card_by_name("Shield").map(|card| card.id), Some(CardId(1)));
        assert_eq!(
            rules.deck_composition(),
            vec![CardId(0), CardId(0), CardId(1)]
        );
        assert!(matches!(rules.tile(3).map(|tile| &tile.effect), Some(Effect::Goto { tile: 1 })));
        assert!(rules.tile(0).is_none());
        assert!(rules.tile(5).is_none());
    }

    #[test]
    fn missing_field_is_schema_error() {
        let result = RuleDocument::from_yaml_str(&MINIMAL.replace("victory: { kind: exact_landing }", ""));
        assert!(matches!(result, Err(RuleError::Schema(_))));
    }

    #[test]
    fn unknown_effect_kind_is_schema_error() {
        let result = with("kind: goto, tile: 1", "kind: teleport, tile: 1");
        assert!(matches!(result, Err(RuleError::Schema(_))));
    }

    #[test]
    fn copy_mismatch_is_rejected() {
        assert_eq!(
            consistency(with("size: 3", "size: 4")),
            ConsistencyError::CopyCountMismatch {
                declared: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn tile_gap_is_rejected() {
        assert_eq!(
            consistency(with("- { index: 4 }", "- { index: 5 }")),
            ConsistencyError::TileGap {
                expected: 4,
                found: 5
            }
        );
    }

    #[test]
    fn goto_outside_board_is_rejected() {
        assert!(matches!(
            consistency(with("kind: goto, tile: 1", "kind: goto, tile: 9")),
            ConsistencyError::UnknownTile { tile: 9, .. }
        ));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = with(
            "{ kind: goto, tile: 1 }",
            "{ kind: conditional, predicate: { kind: has_status, status: key }, then: { kind: goto, tile: 1 } }",
        );
        assert!(matches!(
            consistency(result),
            ConsistencyError::UnknownStatus { ref status, .. } if status == "key"
        ));
    }

    #[test]
    fn interceptors_rejected_on_tiles_and_own_turn_cards() {
        assert!(matches!(
            consistency(with("kind: goto, tile: 1", "kind: reflect")),
            ConsistencyError::InterceptorOnTile { tile: 3, .. }
        ));
        assert!(matches!(
            consistency(with("timing: reactive_any_time", "timing: own_turn")),
            ConsistencyError::TimingMismatch { .. }
        ));
        assert!(matches!(
            consistency(with("timing: own_turn, effect: { kind: advance", "timing: reactive_any_time, effect: { kind: advance")),
            ConsistencyError::TimingMismatch { .. }
        ));
    }

    #[test]
    fn drawing_needs_a_deck() {
        assert_eq!(
            consistency(with("size: 3", "size: 0")),
            ConsistencyError::DrawFromEmptyDeck {
                context: "tile 2".to_string()
            }
        );
        let nested = MINIMAL.replace("size: 3", "size: 0").replace(
            "{ kind: draw_cards, count: 1 }",
            "{ kind: conditional, predicate: { kind: die_even }, then: { kind: none }, otherwise: { kind: draw_cards, count: 2 } }",
        );
        assert!(matches!(
            consistency(RuleDocument::from_yaml_str(&nested)),
            ConsistencyError::DrawFromEmptyDeck { .. }
        ));
    }

    #[test]
    fn hand_limits_are_checked() {
        assert_eq!(
            consistency(with("initial_hand: 1", "initial_hand: 3")),
            ConsistencyError::InitialHandExceedsMax { initial: 3, max: 2 }
        );
    }

    #[test]
    fn points_threshold_needs_a_source_of_points() {
        assert_eq!(
            consistency(with("kind: exact_landing", "kind: points_threshold")),
            ConsistencyError::MissingThreshold
        );
        assert!(matches!(
            consistency(with("kind: exact_landing", "kind: points_threshold, threshold: 5")),
            ConsistencyError::UnreachableVictory { .. }
        ));
    }

    #[test]
    fn zero_faced_die_makes_victory_unreachable() {
        let result = with("components:\n", "components:\n  dice: { faces: 0 }\n");
        assert!(matches!(
            consistency(result),
            ConsistencyError::UnreachableVictory { .. }
        ));
    }

    #[test]
    fn landing_rebounds_under_exact_landing() {
        let rules = RuleDocument::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(rules.landing_position(3, 1), 4);
        assert_eq!(rules.landing_position(3, 3), 2);
        assert_eq!(rules.landing_position(2, -5), 0);

        assert!(rules.rebounds(3, 3));
        assert!(!rules.rebounds(3, 1));
        assert!(!rules.rebounds(2, -5));

        let first_to_reach = with("kind: exact_landing", "kind: first_to_reach").unwrap();
        assert_eq!(first_to_reach.landing_position(3, 3), 4);
        assert!(!first_to_reach.rebounds(3, 3));
    }

    #[test]
    fn json_documents_load_too() {
        let rules = RuleDocument::from_yaml_str(MINIMAL).unwrap();
        let raw: RawRuleDocument = serde_yaml::from_str(MINIMAL).unwrap();
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(RuleDocument::from_json_str(&json).unwrap(), rules);
    }
}
