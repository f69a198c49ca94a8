//! Reactive windows: opponents intercepting a targeted effect or a movement roll.
//!
//! A window visits seats in turn order starting left of the player who
//! triggered it. Each seat holding an eligible card is asked once; the first
//! legal play closes the window.
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

use crate::deck::{CardId, DeckState};
use crate::effect::{CardTiming, Effect, ReactionTrigger, RollModifier};
use crate::error::ActionError;
use crate::player::PlayerId;
use crate::rules::{CardDef, RuleDocument};

/// Event opening a reactive window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReactionEvent {
    /// `caster` is about to apply `effect` to `target`.
    Targeted {
        caster: PlayerId,
        target: PlayerId,
        effect: &'static str,
    },
    /// `mover` is about to move `roll` tiles.
    Movement { mover: PlayerId, roll: i32 },
}

impl ReactionEvent {
    /// Player whose action opened the window.
    #[must_use]
    pub const fn initiator(&self) -> PlayerId {
        match self {
            Self::Targeted { caster, .. } => *caster,
            Self::Movement { mover, .. } => *mover,
        }
    }

    #[must_use]
    pub const fn window(&self) -> &'static str {
        match self {
            Self::Targeted { .. } => "targeted",
            Self::Movement { .. } => "movement",
        }
    }
}

impl fmt::Display for ReactionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Targeted {
                caster,
                target,
                effect,
            } => write!(f, "{caster} aims {effect} at {target}"),
            Self::Movement { mover, roll } => write!(f, "{mover} is about to move {roll}"),
        }
    }
}

/// How a window closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReactionOutcome {
    Unchallenged,
    Reflected {
        by: PlayerId,
        card: CardId,
    },
    Blocked {
        by: PlayerId,
        card: CardId,
    },
    MovementCancelled {
        by: PlayerId,
        card: CardId,
    },
    RollModified {
        by: PlayerId,
        card: CardId,
        modifier: RollModifier,
    },
}

impl ReactionOutcome {
    /// Outcome of `by` playing `card`.
    #[must_use]
    pub fn from_play(rules: &RuleDocument, by: PlayerId, card: CardId) -> Self {
        match rules.card(card).effect {
            Effect::Reflect => Self::Reflected { by, card },
            Effect::Block => Self::Blocked { by, card },
            Effect::CancelMovement => Self::MovementCancelled { by, card },
            Effect::RollModifier { modifier } => Self::RollModified { by, card, modifier },
            _ => Self::Unchallenged,
        }
    }
}

/// Result of offering a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowResult {
    /// The play that closed the window. The card is still in the player's hand.
    pub play: Option<(PlayerId, CardId)>,
    pub rejected: Vec<(PlayerId, ActionError)>,
}

/// Seats asked during a window opened by `initiator`, in asking order.
pub fn window_order(players: usize, initiator: PlayerId) -> impl Iterator<Item = PlayerId> {
    (1..players).map(move |offset| PlayerId::from_index((initiator.index() + offset) % players))
}

/// Whether `seat` may answer `event` with `card`.
#[must_use]
pub fn can_react(card: &CardDef, event: &ReactionEvent, seat: PlayerId) -> bool {
    if seat == event.initiator() {
        return false;
    }
    match event {
        ReactionEvent::Targeted { target, .. } => {
            card.effect.intercepts_targeting()
                && match card.timing {
                    CardTiming::ReactiveAnyTime => true,
                    CardTiming::ReactiveOnTrigger(ReactionTrigger::Targeted) => seat == *target,
                    _ => false,
                }
        }
        ReactionEvent::Movement { .. } => {
            card.effect.intercepts_movement()
                && matches!(
                    card.timing,
                    CardTiming::ReactiveAnyTime
                        | CardTiming::ReactiveOnTrigger(ReactionTrigger::OpponentMovement)
                )
        }
    }
}

/// Distinct cards in `hand` that `seat` may play against `event`.
#[must_use]
pub fn eligible_cards(
    rules: &RuleDocument,
    hand: &[CardId],
    event: &ReactionEvent,
    seat: PlayerId,
) -> SmallVec<[CardId; 4]> {
    let mut eligible: SmallVec<[CardId; 4]> = SmallVec::new();
    for card in hand {
        if !eligible.contains(card) && can_react(rules.card(*card), event, seat) {
            eligible.push(*card);
        }
    }
    eligible
}

/// Offer a window to every other seat. `ask` receives the seat and its
/// eligible cards and returns its play, if any. Illegal answers are recorded
/// and treated as a pass.
pub fn offer<F>(
    rules: &RuleDocument,
    deck: &DeckState,
    players: usize,
    event: &ReactionEvent,
    mut ask: F,
) -> WindowResult
where
    F: FnMut(PlayerId, &[CardId]) -> Option<CardId>,
{
    let mut result = WindowResult::default();
    for seat in window_order(players, event.initiator()) {
        let eligible = eligible_cards(rules, deck.hand(seat), event, seat);
        if eligible.is_empty() {
            continue;
        }
        let Some(card) = ask(seat, &eligible) else {
            continue;
        };
        if eligible.contains(&card) {
            log::debug!("{seat} answers '{event}' with {}", rules.card(card).name);
            result.play = Some((seat, card));
            return result;
        }
        let error = if deck.holds(seat, card) {
            let def = rules.card(card);
            ActionError::WrongTiming {
                card: def.name.clone(),
                timing: def.timing.label(),
                window: event.window(),
            }
        } else {
            ActionError::NotInHand { player: seat, card }
        };
        log::debug!("rejected reaction from {seat}: {error}");
        result.rejected.push((seat, error));
    }
    result
}
