//! Declarative effect vocabulary shared by tiles and cards.
//!
//! Every board game is described purely as data: a tile or card carries one
//! [`Effect`], optionally nested through [`Effect::Conditional`] and
//! [`Effect::RerollBranch`]. The set of variants is closed; new games add data,
//! never variants.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who an effect applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    /// The resolving player.
    #[default]
    #[serde(rename = "self")]
    Resolver,
    /// An opponent picked by the resolving player's agent.
    ChosenOpponent,
    /// The most advanced opponent (lowest seat on ties).
    LeadingOpponent,
    /// The least advanced opponent (lowest seat on ties).
    TrailingOpponent,
}

impl TargetSpec {
    #[must_use]
    pub const fn is_opponent(self) -> bool {
        !matches!(self, Self::Resolver)
    }
}

/// Selector for position swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    FurthestBehind,
    FurthestAhead,
    Chosen,
}

/// Roll adjustment applied before movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollModifier {
    /// Signed additive adjustment.
    Add(i8),
    /// Halve the roll, rounding down.
    Halve,
}

impl RollModifier {
    /// Apply the modifier to a roll; the result never drops below zero.
    #[must_use]
    pub fn apply(self, roll: i32) -> i32 {
        match self {
            Self::Add(amount) => (roll + i32::from(amount)).max(0),
            Self::Halve => roll.max(0).div_euclid(2),
        }
    }
}

impl fmt::Display for RollModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(amount) => write!(f, "{amount:+}"),
            Self::Halve => f.write_str("halve"),
        }
    }
}

/// Condition evaluated by [`Effect::Conditional`].
///
/// Die predicates share a single auxiliary roll per evaluation, so
/// `any_of: [die_at_least 6, die_even]` looks at one die, not two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    HasStatus { status: String },
    DieAtLeast { value: u8 },
    DieEven,
    DieOdd,
    PositionAtLeast { tile: u16 },
    AnyOf { predicates: Vec<Predicate> },
    AllOf { predicates: Vec<Predicate> },
}

impl Predicate {
    /// Visit this predicate and every nested predicate.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Predicate)) {
        visit(self);
        if let Self::AnyOf { predicates } | Self::AllOf { predicates } = self {
            for predicate in predicates {
                predicate.walk(visit);
            }
        }
    }
}

/// One arm of a reroll table; `from..=to` is matched against an auxiliary die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollBranch {
    pub from: u8,
    pub to: u8,
    #[serde(default)]
    pub effect: Effect,
}

impl RollBranch {
    #[must_use]
    pub fn matches(&self, roll: u8) -> bool {
        (self.from..=self.to).contains(&roll)
    }
}

const fn one_turn() -> u8 {
    1
}

/// Tagged effect descriptor bound to a tile or a card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    #[default]
    None,
    DrawCards {
        count: u8,
    },
    RerollBranch {
        branches: Vec<RollBranch>,
    },
    Advance {
        steps: u16,
        #[serde(default)]
        target: TargetSpec,
    },
    Retreat {
        steps: u16,
        #[serde(default)]
        target: TargetSpec,
    },
    Goto {
        tile: u16,
    },
    SkipTurn {
        #[serde(default = "one_turn")]
        turns: u8,
        #[serde(default)]
        target: TargetSpec,
    },
    SwapWith {
        selector: Selector,
    },
    Conditional {
        predicate: Predicate,
        then: Box<Effect>,
        #[serde(default)]
        otherwise: Box<Effect>,
    },
    SafeZone,
    ExactLandingRequired,
    GainPoints {
        amount: u32,
        #[serde(default)]
        target: TargetSpec,
    },
    Immunity {
        turns: u8,
    },
    RollModifier {
        modifier: RollModifier,
    },
    RevealHands,
    Reflect,
    Block,
    CancelMovement,
}

impl Effect {
    /// Visit this effect and every effect nested in branches.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Effect)) {
        visit(self);
        match self {
            Self::Conditional {
                then, otherwise, ..
            } => {
                then.walk(visit);
                otherwise.walk(visit);
            }
            Self::RerollBranch { branches } => {
                for branch in branches {
                    branch.effect.walk(visit);
                }
            }
            _ => {}
        }
    }

    /// Effects that only make sense inside a reactive window.
    #[must_use]
    pub const fn is_interceptor(&self) -> bool {
        matches!(self, Self::Reflect | Self::Block | Self::CancelMovement)
    }

    /// Interceptors usable against a targeted effect.
    #[must_use]
    pub const fn intercepts_targeting(&self) -> bool {
        matches!(self, Self::Reflect | Self::Block)
    }

    /// Reactive plays usable against an opponent's movement roll.
    #[must_use]
    pub const fn intercepts_movement(&self) -> bool {
        matches!(self, Self::CancelMovement | Self::RollModifier { .. })
    }

    /// Player selector carried directly by this effect, if any.
    #[must_use]
    pub const fn target_spec(&self) -> Option<TargetSpec> {
        match self {
            Self::Advance { target, .. }
            | Self::Retreat { target, .. }
            | Self::SkipTurn { target, .. }
            | Self::GainPoints { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Whether resolving this effect (or any branch of it) needs the
    /// resolving player to choose an opponent.
    #[must_use]
    pub fn needs_chosen_target(&self) -> bool {
        let mut needed = false;
        self.walk(&mut |effect| {
            needed |= matches!(effect.target_spec(), Some(TargetSpec::ChosenOpponent))
                || matches!(
                    effect,
                    Self::SwapWith {
                        selector: Selector::Chosen
                    }
                );
        });
        needed
    }

    /// Whether any branch draws cards.
    #[must_use]
    pub fn draws_cards(&self) -> bool {
        let mut draws = false;
        self.walk(&mut |effect| draws |= matches!(effect, Self::DrawCards { count } if *count > 0));
        draws
    }

    /// Short snake_case label used in logs and reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DrawCards { .. } => "draw_cards",
            Self::RerollBranch { .. } => "reroll_branch",
            Self::Advance { .. } => "advance",
            Self::Retreat { .. } => "retreat",
            Self::Goto { .. } => "goto",
            Self::SkipTurn { .. } => "skip_turn",
            Self::SwapWith { .. } => "swap_with",
            Self::Conditional { .. } => "conditional",
            Self::SafeZone => "safe_zone",
            Self::ExactLandingRequired => "exact_landing_required",
            Self::GainPoints { .. } => "gain_points",
            Self::Immunity { .. } => "immunity",
            Self::RollModifier { .. } => "roll_modifier",
            Self::RevealHands => "reveal_hands",
            Self::Reflect => "reflect",
            Self::Block => "block",
            Self::CancelMovement => "cancel_movement",
        }
    }
}

/// Event a reactive-on-trigger card listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionTrigger {
    /// The card holder is the target of an opponent's effect.
    Targeted,
    /// An opponent is about to move by die roll.
    OpponentMovement,
}

/// When a card may be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTiming {
    OwnTurn,
    ReactiveAnyTime,
    ReactiveOnTrigger(ReactionTrigger),
}

impl CardTiming {
    #[must_use]
    pub const fn is_reactive(self) -> bool {
        !matches!(self, Self::OwnTurn)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OwnTurn => "own_turn",
            Self::ReactiveAnyTime => "reactive_any_time",
            Self::ReactiveOnTrigger(ReactionTrigger::Targeted) => "reactive_on_targeted",
            Self::ReactiveOnTrigger(ReactionTrigger::OpponentMovement) => {
                "reactive_on_opponent_movement"
            }
        }
    }
}
