//! Interpreter for the effect vocabulary.
//!
//! [`EffectResolver::resolve`] is a pure function of a read-only
//! [`BoardView`], one effect, the resolving player, an optional target and the
//! auxiliary-die RNG. It returns the state changes to commit plus log lines;
//! it never looks at the tile a move lands on, so repositioning effects cannot
//! chain into further tile effects.
//!
//! Branching effects are settled first with [`EffectResolver::settle`]: the
//! auxiliary die is rolled and predicates evaluated before any reactive window
//! opens, so an interceptor is only spent on the sub-effect that really fires.
use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;
use std::cmp::Reverse;

use crate::deck::CardId;
use crate::effect::{Effect, Predicate, RollModifier, Selector, TargetSpec};
use crate::player::{Player, PlayerId};
use crate::rules::RuleDocument;
use crate::status::StatusTracker;

/// Read-only view of the state an effect resolves against.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub rules: &'a RuleDocument,
    pub players: &'a [Player],
    pub statuses: &'a StatusTracker,
}

impl<'a> BoardView<'a> {
    #[must_use]
    pub const fn new(
        rules: &'a RuleDocument,
        players: &'a [Player],
        statuses: &'a StatusTracker,
    ) -> Self {
        Self {
            rules,
            players,
            statuses,
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &'a Player {
        let players = self.players;
        &players[id.index()]
    }

    fn opponents(&self, of: PlayerId) -> impl Iterator<Item = &'a Player> + use<'a> {
        let players = self.players;
        players.iter().filter(move |player| player.id != of)
    }

    /// Most advanced opponent; lowest seat on ties.
    #[must_use]
    pub fn leading_opponent(&self, of: PlayerId) -> Option<PlayerId> {
        self.opponents(of)
            .min_by_key(|player| Reverse(player.position))
            .map(|player| player.id)
    }

    /// Least advanced opponent; lowest seat on ties.
    #[must_use]
    pub fn trailing_opponent(&self, of: PlayerId) -> Option<PlayerId> {
        self.opponents(of)
            .min_by_key(|player| player.position)
            .map(|player| player.id)
    }

    /// Why `affected` is shielded from an effect originated by `originator`, if it is.
    ///
    /// Immunity blocks every effect from another player; a safe zone only
    /// blocks card effects.
    #[must_use]
    pub fn protection(
        &self,
        affected: PlayerId,
        originator: PlayerId,
        source: EffectSource,
    ) -> Option<&'static str> {
        if affected == originator {
            return None;
        }
        let player = self.player(affected);
        if player.is_immune() {
            return Some("immunity");
        }
        let on_safe_zone = self
            .rules
            .tile(player.position)
            .is_some_and(|tile| matches!(tile.effect, Effect::SafeZone));
        (on_safe_zone && matches!(source, EffectSource::Card(_))).then_some("safe zone")
    }
}

/// Where an effect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSource {
    Tile(u16),
    Card(CardId),
}

/// One effect to resolve.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'e> {
    pub effect: &'e Effect,
    /// The resolving player.
    pub actor: PlayerId,
    /// Chosen opponent, or the forced target of a reflected effect.
    pub target: Option<PlayerId>,
    /// Player the effect is attributed to for protection checks.
    pub originator: PlayerId,
    pub source: EffectSource,
}

impl<'e> ResolveRequest<'e> {
    #[must_use]
    pub const fn new(effect: &'e Effect, actor: PlayerId, source: EffectSource) -> Self {
        Self {
            effect,
            actor,
            target: None,
            originator: actor,
            source,
        }
    }

    #[must_use]
    pub const fn with_target(mut self, target: Option<PlayerId>) -> Self {
        self.target = target;
        self
    }

    /// Re-aim the effect at its caster on behalf of the reflecting player.
    #[must_use]
    pub const fn reflected(mut self, by: PlayerId) -> Self {
        self.target = Some(self.actor);
        self.originator = by;
        self
    }
}

/// Atomic state delta produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum StateChange {
    Move { player: PlayerId, from: u16, to: u16 },
    Swap { a: PlayerId, b: PlayerId },
    Draw { player: PlayerId, count: u8 },
    Skip { player: PlayerId, turns: u8 },
    Points { player: PlayerId, amount: u32 },
    Immunity { player: PlayerId, turns: u8 },
    RollModifier { player: PlayerId, modifier: RollModifier },
    RevealHands { player: PlayerId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub changes: SmallVec<[StateChange; 2]>,
    pub log: Vec<String>,
}

impl Resolution {
    /// Append a resolution that happened after this one.
    pub fn absorb(&mut self, later: Self) {
        self.changes.extend(later.changes);
        self.log.extend(later.log);
    }

    fn push(&mut self, change: StateChange, line: String) {
        self.changes.push(change);
        self.log.push(line);
    }

    fn note(&mut self, line: String) {
        self.log.push(line);
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Auxiliary die rolled at most once per predicate evaluation or reroll table.
struct AuxDie {
    faces: u8,
    roll: Option<u8>,
}

impl AuxDie {
    const fn new(faces: u8) -> Self {
        Self { faces, roll: None }
    }

    fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u8 {
        let faces = self.faces.max(1);
        *self.roll.get_or_insert_with(|| rng.gen_range(1..=faces))
    }
}

static NO_EFFECT: Effect = Effect::None;

pub struct EffectResolver;

impl EffectResolver {
    /// Resolve one effect into state changes.
    pub fn resolve<R: Rng + ?Sized>(
        view: &BoardView<'_>,
        request: &ResolveRequest<'_>,
        rng: &mut R,
    ) -> Resolution {
        let mut resolution = Resolution::default();
        Self::resolve_into(view, request, request.effect, rng, &mut resolution);
        resolution
    }

    /// Roll through [`Effect::Conditional`] and [`Effect::RerollBranch`] until
    /// a leaf effect remains, noting each roll in `out`.
    ///
    /// A reroll table with no matching arm settles to [`Effect::None`].
    pub fn settle<'e, R: Rng + ?Sized>(
        view: &BoardView<'_>,
        actor: PlayerId,
        effect: &'e Effect,
        rng: &mut R,
        out: &mut Resolution,
    ) -> &'e Effect {
        let mut current = effect;
        loop {
            current = match current {
                Effect::RerollBranch { branches } => {
                    let mut die = AuxDie::new(view.rules.die_faces());
                    let roll = die.roll(rng);
                    log::trace!("{actor} rolls {roll} on a reroll table");
                    if let Some(branch) = branches.iter().find(|branch| branch.matches(roll)) {
                        out.note(format!("{actor} rolls {roll}"));
                        &branch.effect
                    } else {
                        out.note(format!("{actor} rolls {roll}: no branch applies"));
                        return &NO_EFFECT;
                    }
                }
                Effect::Conditional {
                    predicate,
                    then,
                    otherwise,
                } => {
                    let mut die = AuxDie::new(view.rules.die_faces());
                    let holds = Self::evaluate(view, actor, predicate, &mut die, rng);
                    let rolled = die
                        .roll
                        .map(|roll| format!(" (rolled {roll})"))
                        .unwrap_or_default();
                    out.note(format!(
                        "condition {} for {actor}{rolled}",
                        if holds { "holds" } else { "fails" }
                    ));
                    if holds { &**then } else { &**otherwise }
                }
                leaf => return leaf,
            };
        }
    }

    /// The opponent a settled effect is aimed at, if any.
    #[must_use]
    pub fn primary_target(view: &BoardView<'_>, request: &ResolveRequest<'_>) -> Option<PlayerId> {
        let aimed = match request.effect {
            Effect::SwapWith { selector } => Self::swap_partner(view, request, *selector),
            other => other
                .target_spec()
                .filter(|spec| spec.is_opponent())
                .and_then(|spec| Self::affected(view, request, spec)),
        };
        aimed.filter(|target| *target != request.actor)
    }

    fn affected(
        view: &BoardView<'_>,
        request: &ResolveRequest<'_>,
        spec: TargetSpec,
    ) -> Option<PlayerId> {
        match spec {
            TargetSpec::Resolver => Some(request.actor),
            TargetSpec::ChosenOpponent => request.target,
            TargetSpec::LeadingOpponent => request
                .target
                .or_else(|| view.leading_opponent(request.actor)),
            TargetSpec::TrailingOpponent => request
                .target
                .or_else(|| view.trailing_opponent(request.actor)),
        }
    }

    fn swap_partner(
        view: &BoardView<'_>,
        request: &ResolveRequest<'_>,
        selector: Selector,
    ) -> Option<PlayerId> {
        request.target.or_else(|| match selector {
            Selector::FurthestBehind => view.trailing_opponent(request.actor),
            Selector::FurthestAhead => view.leading_opponent(request.actor),
            Selector::Chosen => None,
        })
    }

    fn resolve_into<R: Rng + ?Sized>(
        view: &BoardView<'_>,
        request: &ResolveRequest<'_>,
        effect: &Effect,
        rng: &mut R,
        out: &mut Resolution,
    ) {
        let actor = request.actor;
        match effect {
            Effect::None | Effect::SafeZone | Effect::ExactLandingRequired => {}
            Effect::DrawCards { count } => {
                out.push(
                    StateChange::Draw {
                        player: actor,
                        count: *count,
                    },
                    format!("{actor} draws {count}"),
                );
            }
            Effect::RerollBranch { .. } | Effect::Conditional { .. } => {
                let leaf = Self::settle(view, actor, effect, rng, out);
                Self::resolve_into(view, request, leaf, rng, out);
            }
            Effect::Advance { steps, target } => {
                Self::shift(view, request, *target, i32::from(*steps), out);
            }
            Effect::Retreat { steps, target } => {
                Self::shift(view, request, *target, -i32::from(*steps), out);
            }
            Effect::Goto { tile } => {
                let from = view.player(actor).position;
                if from == *tile {
                    out.note(format!("{actor} is already on tile {tile}"));
                } else {
                    out.push(
                        StateChange::Move {
                            player: actor,
                            from,
                            to: *tile,
                        },
                        format!("{actor} jumps {from} -> {tile}"),
                    );
                }
            }
            Effect::SkipTurn { turns, target } => {
                if let Some(player) = Self::unshielded(view, request, *target, out) {
                    out.push(
                        StateChange::Skip {
                            player,
                            turns: *turns,
                        },
                        format!("{player} skips {turns} turn(s)"),
                    );
                }
            }
            Effect::SwapWith { selector } => {
                let Some(other) = Self::swap_partner(view, request, *selector) else {
                    out.note(format!("{actor} has nobody to swap with"));
                    return;
                };
                if other == actor {
                    out.note(format!("{actor} swaps with themself: no effect"));
                } else if let Some(reason) =
                    view.protection(other, request.originator, request.source)
                {
                    out.note(format!("{other} is protected by {reason}"));
                } else {
                    let (mine, theirs) = (view.player(actor).position, view.player(other).position);
                    out.push(
                        StateChange::Swap { a: actor, b: other },
                        format!("{actor} ({mine}) swaps with {other} ({theirs})"),
                    );
                }
            }
            Effect::GainPoints { amount, target } => {
                if let Some(player) = Self::unshielded(view, request, *target, out) {
                    out.push(
                        StateChange::Points {
                            player,
                            amount: *amount,
                        },
                        format!("{player} gains {amount} point(s)"),
                    );
                }
            }
            Effect::Immunity { turns } => {
                out.push(
                    StateChange::Immunity {
                        player: actor,
                        turns: *turns,
                    },
                    format!("{actor} is immune for {turns} turn(s)"),
                );
            }
            Effect::RollModifier { modifier } => {
                out.push(
                    StateChange::RollModifier {
                        player: actor,
                        modifier: *modifier,
                    },
                    format!("{actor} queues roll modifier {modifier}"),
                );
            }
            Effect::RevealHands => {
                out.push(
                    StateChange::RevealHands { player: actor },
                    format!("{actor} sees every hand"),
                );
            }
            Effect::Reflect | Effect::Block | Effect::CancelMovement => {
                out.note(format!(
                    "{} only acts inside a reactive window",
                    effect.label()
                ));
            }
        }
    }

    fn unshielded(
        view: &BoardView<'_>,
        request: &ResolveRequest<'_>,
        spec: TargetSpec,
        out: &mut Resolution,
    ) -> Option<PlayerId> {
        let Some(player) = Self::affected(view, request, spec) else {
            out.note(format!("{} has no target", request.actor));
            return None;
        };
        if let Some(reason) = view.protection(player, request.originator, request.source) {
            out.note(format!("{player} is protected by {reason}"));
            return None;
        }
        Some(player)
    }

    fn shift(
        view: &BoardView<'_>,
        request: &ResolveRequest<'_>,
        spec: TargetSpec,
        delta: i32,
        out: &mut Resolution,
    ) {
        let Some(player) = Self::unshielded(view, request, spec, out) else {
            return;
        };
        let from = view.player(player).position;
        let to = view.rules.landing_position(from, delta);
        if to == from {
            out.note(format!("{player} stays on {from}"));
        } else {
            out.push(
                StateChange::Move { player, from, to },
                format!("{player} moves {from} -> {to}"),
            );
        }
    }

    fn evaluate<R: Rng + ?Sized>(
        view: &BoardView<'_>,
        actor: PlayerId,
        predicate: &Predicate,
        die: &mut AuxDie,
        rng: &mut R,
    ) -> bool {
        match predicate {
            Predicate::HasStatus { status } => view.statuses.holds(actor, status),
            Predicate::DieAtLeast { value } => die.roll(rng) >= *value,
            Predicate::DieEven => die.roll(rng) % 2 == 0,
            Predicate::DieOdd => die.roll(rng) % 2 == 1,
            Predicate::PositionAtLeast { tile } => view.player(actor).position >= *tile,
            Predicate::AnyOf { predicates } => predicates
                .iter()
                .any(|inner| Self::evaluate(view, actor, inner, die, rng)),
            Predicate::AllOf { predicates } => predicates
                .iter()
                .all(|inner| Self::evaluate(view, actor, inner, die, rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusRule;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const BOARD: &str = r"
game: { name: Resolver }
players: { min: 2, max: 3 }
components:
  board:
    tiles:
      - { index: 1 }
      - { index: 2 }
      - { index: 3, effect: { kind: goto, tile: 8 } }
      - { index: 4, effect: { kind: safe_zone } }
      - { index: 5 }
      - { index: 6 }
      - { index: 7 }
      - { index: 8, effect: { kind: draw_cards, count: 2 } }
      - { index: 9 }
      - { index: 10, effect: { kind: exact_landing_required } }
  deck:
    size: 1
    cards:
      - { name: Push, timing: own_turn, effect: { kind: retreat, steps: 3, target: chosen_opponent }, copies: 1 }
setup: { initial_hand: 0, max_hand: 3 }
statuses:
  - { name: key, trigger_tile: 5 }
victory: { kind: first_to_reach }
";

    fn rules() -> RuleDocument {
        RuleDocument::from_yaml_str(BOARD).unwrap()
    }

    fn players(positions: &[u16]) -> Vec<Player> {
        positions
            .iter()
            .enumerate()
            .map(|(seat, position)| Player::new(PlayerId::from_index(seat), *position))
            .collect()
    }

    fn tracker(positions: &[u16]) -> StatusTracker {
        let mut tracker = StatusTracker::new(
            &[StatusRule {
                name: "key".to_string(),
                trigger_tile: 5,
            }],
            positions.len(),
        );
        tracker.recompute(positions);
        tracker
    }

    #[test]
    fn goto_moves_once_without_triggering_destination() {
        let rules = rules();
        let players = players(&[3, 1]);
        let statuses = tracker(&[3, 1]);
        let view = BoardView::new(&rules, &players, &statuses);
        let effect = &rules.tile(3).unwrap().effect;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let resolution = EffectResolver::resolve(
            &view,
            &ResolveRequest::new(effect, PlayerId(0), EffectSource::Tile(3)),
            &mut rng,
        );
        assert_eq!(
            resolution.changes.as_slice(),
            &[StateChange::Move {
                player: PlayerId(0),
                from: 3,
                to: 8
            }]
        );
    }

    #[test]
    fn exit_marker_enables_rebound_for_effect_moves() {
        let rules = rules();
        assert!(rules.exact_landing());
        let players = players(&[9, 1]);
        let statuses = tracker(&[9, 1]);
        let view = BoardView::new(&rules, &players, &statuses);
        let effect = Effect::Advance {
            steps: 3,
            target: TargetSpec::Resolver,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let resolution = EffectResolver::resolve(
            &view,
            &ResolveRequest::new(&effect, PlayerId(0), EffectSource::Tile(9)),
            &mut rng,
        );
        assert_eq!(
            resolution.changes.as_slice(),
            &[StateChange::Move {
                player: PlayerId(0),
                from: 9,
                to: 8
            }]
        );
    }

    #[test]
    fn chosen_opponent_retreat_and_reflection() {
        let rules = rules();
        let players = players(&[6, 7]);
        let statuses = tracker(&[6, 7]);
        let view = BoardView::new(&rules, &players, &statuses);
        let effect = &rules.card_by_name("Push").unwrap().effect;
        let request = ResolveRequest::new(effect, PlayerId(0), EffectSource::Card(CardId(0)))
            .with_target(Some(PlayerId(1)));
        assert_eq!(
            EffectResolver::primary_target(&view, &request),
            Some(PlayerId(1))
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let straight = EffectResolver::resolve(&view, &request, &mut rng);
        assert_eq!(
            straight.changes.as_slice(),
            &[StateChange::Move {
                player: PlayerId(1),
                from: 7,
                to: 4
            }]
        );

        let reflected = EffectResolver::resolve(&view, &request.reflected(PlayerId(1)), &mut rng);
        assert_eq!(
            reflected.changes.as_slice(),
            &[StateChange::Move {
                player: PlayerId(0),
                from: 6,
                to: 3
            }]
        );
    }

    #[test]
    fn immunity_and_safe_zone_shield_opponents() {
        let rules = rules();
        let mut players = players(&[6, 7, 4]);
        players[1].immunity_turns = 1;
        let statuses = tracker(&[6, 7, 4]);
        let view = BoardView::new(&rules, &players, &statuses);
        let effect = &rules.card_by_name("Push").unwrap().effect;
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for target in [PlayerId(1), PlayerId(2)] {
            let request = ResolveRequest::new(effect, PlayerId(0), EffectSource::Card(CardId(0)))
                .with_target(Some(target));
            let resolution = EffectResolver::resolve(&view, &request, &mut rng);
            assert!(resolution.is_noop(), "{target} should be shielded");
            assert!(resolution.log[0].contains("protected"));
        }

        // A tile effect is not stopped by a safe zone.
        let skip = Effect::SkipTurn {
            turns: 1,
            target: TargetSpec::TrailingOpponent,
        };
        let resolution = EffectResolver::resolve(
            &view,
            &ResolveRequest::new(&skip, PlayerId(0), EffectSource::Tile(6)),
            &mut rng,
        );
        assert_eq!(
            resolution.changes.as_slice(),
            &[StateChange::Skip {
                player: PlayerId(2),
                turns: 1
            }]
        );
    }

    #[test]
    fn swap_selectors_pick_extremes() {
        let rules = rules();
        let players = players(&[5, 2, 9]);
        let statuses = tracker(&[5, 2, 9]);
        let view = BoardView::new(&rules, &players, &statuses);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let behind = Effect::SwapWith {
            selector: Selector::FurthestBehind,
        };
        let ahead = Effect::SwapWith {
            selector: Selector::FurthestAhead,
        };
        let resolve = |effect: &Effect, rng: &mut ChaCha8Rng| {
            EffectResolver::resolve(
                &view,
                &ResolveRequest::new(effect, PlayerId(0), EffectSource::Tile(5)),
                rng,
            )
        };
        assert_eq!(
            resolve(&behind, &mut rng).changes.as_slice(),
            &[StateChange::Swap {
                a: PlayerId(0),
                b: PlayerId(1)
            }]
        );
        assert_eq!(
            resolve(&ahead, &mut rng).changes.as_slice(),
            &[StateChange::Swap {
                a: PlayerId(0),
                b: PlayerId(2)
            }]
        );
    }

    #[test]
    fn status_gate_short_circuits_the_die() {
        let rules = rules();
        let players = players(&[6, 1]);
        let statuses = tracker(&[6, 1]);
        let view = BoardView::new(&rules, &players, &statuses);
        let gate = Effect::Conditional {
            predicate: Predicate::AnyOf {
                predicates: vec![
                    Predicate::HasStatus {
                        status: "key".to_string(),
                    },
                    Predicate::DieAtLeast { value: 6 },
                ],
            },
            then: Box::new(Effect::Advance {
                steps: 1,
                target: TargetSpec::Resolver,
            }),
            otherwise: Box::new(Effect::Retreat {
                steps: 2,
                target: TargetSpec::Resolver,
            }),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let resolution = EffectResolver::resolve(
            &view,
            &ResolveRequest::new(&gate, PlayerId(0), EffectSource::Tile(6)),
            &mut rng,
        );
        assert_eq!(resolution.log[0], "condition holds for P1");
        assert_eq!(
            resolution.changes.as_slice(),
            &[StateChange::Move {
                player: PlayerId(0),
                from: 6,
                to: 7
            }]
        );
    }

    #[test]
    fn settled_branch_decides_who_is_aimed_at() {
        let rules = rules();
        let players = players(&[3, 7]);
        let statuses = tracker(&[3, 7]);
        let view = BoardView::new(&rules, &players, &statuses);
        let hex = Effect::Conditional {
            predicate: Predicate::PositionAtLeast { tile: 5 },
            then: Box::new(Effect::Retreat {
                steps: 2,
                target: TargetSpec::LeadingOpponent,
            }),
            otherwise: Box::new(Effect::Advance {
                steps: 1,
                target: TargetSpec::Resolver,
            }),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut notes = Resolution::default();
        let leaf = EffectResolver::settle(&view, PlayerId(0), &hex, &mut rng, &mut notes);
        assert!(matches!(leaf, Effect::Advance { steps: 1, .. }));
        assert_eq!(notes.log, vec!["condition fails for P1".to_string()]);
        let request = ResolveRequest::new(leaf, PlayerId(0), EffectSource::Card(CardId(0)));
        assert_eq!(EffectResolver::primary_target(&view, &request), None);

        // From the other seat the predicate holds and the leader is aimed at.
        let leaf = EffectResolver::settle(&view, PlayerId(1), &hex, &mut rng, &mut notes);
        let request = ResolveRequest::new(leaf, PlayerId(1), EffectSource::Card(CardId(0)));
        assert_eq!(
            EffectResolver::primary_target(&view, &request),
            Some(PlayerId(0))
        );
    }

    #[test]
    fn reroll_branches_follow_the_aux_die() {
        let rules = rules();
        let players = players(&[6, 1]);
        let statuses = tracker(&[6, 1]);
        let view = BoardView::new(&rules, &players, &statuses);
        let table = Effect::RerollBranch {
            branches: vec![
                crate::effect::RollBranch {
                    from: 1,
                    to: 3,
                    effect: Effect::Retreat {
                        steps: 1,
                        target: TargetSpec::Resolver,
                    },
                },
                crate::effect::RollBranch {
                    from: 4,
                    to: 6,
                    effect: Effect::None,
                },
            ],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut retreats = 0;
        for _ in 0..60 {
            let resolution = EffectResolver::resolve(
                &view,
                &ResolveRequest::new(&table, PlayerId(0), EffectSource::Tile(6)),
                &mut rng,
            );
            let low_roll = resolution.log[0]
                .trim_start_matches("P1 rolls ")
                .parse::<u8>()
                .is_ok_and(|roll| roll <= 3);
            assert_eq!(low_roll, !resolution.is_noop());
            retreats += usize::from(low_roll);
        }
        assert!(retreats > 0 && retreats < 60);
    }
}
