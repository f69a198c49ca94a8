//! Pluggable decision makers.
//!
//! Agents only ever see an [`Observation`]: their own hand and position,
//! public facts about opponents, and opponents' hands only after a
//! `reveal_hands` effect granted that visibility.
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::deck::CardId;
use crate::effect::{Effect, RollModifier, Selector, TargetSpec};
use crate::player::PlayerId;
use crate::profile::AgentProfile;
use crate::reaction::ReactionEvent;
use crate::rules::RuleDocument;

/// What an opponent looks like from another seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentView<'a> {
    pub id: PlayerId,
    pub position: u16,
    pub hand_size: usize,
    pub skipped_turns: u8,
    pub immunity_turns: u8,
    pub points: u32,
    pub statuses: Vec<&'a str>,
    /// Present only when the observer was granted visibility.
    pub revealed_hand: Option<&'a [CardId]>,
}

/// Everything a seat may legally know when asked for a decision.
#[derive(Debug, Clone)]
pub struct Observation<'a> {
    pub rules: &'a RuleDocument,
    pub seat: PlayerId,
    /// One-based number of the turn in progress.
    pub turn: u32,
    pub current_player: PlayerId,
    pub position: u16,
    pub hand: &'a [CardId],
    pub statuses: Vec<&'a str>,
    pub immunity_turns: u8,
    pub points: u32,
    pub opponents: Vec<OpponentView<'a>>,
    pub discard_top: Option<CardId>,
}

impl Observation<'_> {
    #[must_use]
    pub fn opponent(&self, id: PlayerId) -> Option<&OpponentView<'_>> {
        self.opponents.iter().find(|opponent| opponent.id == id)
    }

    /// Most advanced opponent, lowest seat on ties.
    #[must_use]
    pub fn leader(&self) -> Option<&OpponentView<'_>> {
        self.opponents
            .iter()
            .min_by_key(|opponent| std::cmp::Reverse(opponent.position))
    }

    #[must_use]
    pub fn distance_to_exit(&self) -> u16 {
        self.rules.exit_tile().saturating_sub(self.position)
    }
}

/// An own-turn card play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CardPlay {
    pub card: CardId,
    pub target: Option<PlayerId>,
}

/// Decision interface consulted synchronously by the turn engine.
pub trait StrategyAgent: Send {
    /// Name used for logging/debug output.
    fn name(&self) -> &str;

    /// Pick an own-turn play from `legal`, or pass.
    fn choose_play(&mut self, obs: &Observation<'_>, legal: &[CardPlay]) -> Option<CardPlay>;

    /// Pick a card to discard from an over-limit hand.
    fn choose_discard(&mut self, rules: &RuleDocument, hand: &[CardId]) -> CardId;

    /// Answer a reactive window with one of `eligible`, or pass.
    fn choose_reaction(
        &mut self,
        obs: &Observation<'_>,
        event: &ReactionEvent,
        eligible: &[CardId],
    ) -> Option<CardId>;

    /// Pick the opponent for an effect that needs a chosen target.
    fn choose_target(&mut self, obs: &Observation<'_>, candidates: &[PlayerId]) -> PlayerId;
}

/// Built-in strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    Random,
    Expert,
    Passive,
}

impl StrategyId {
    pub const ALL: [Self; 3] = [Self::Random, Self::Expert, Self::Passive];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Expert => "expert",
            Self::Passive => "passive",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Random => "plays, reacts and targets uniformly at random",
            Self::Expert => "scores every legal play and always defends itself",
            Self::Passive => "never plays or reacts; a baseline for card impact",
        }
    }

    #[must_use]
    pub fn create_agent(self, seed: u64) -> Box<dyn StrategyAgent> {
        match self {
            Self::Random => Box::new(RandomAgent::new(seed)),
            Self::Expert => Box::new(ExpertAgent::new(AgentProfile::expert(), seed)),
            Self::Passive => Box::new(PassiveAgent),
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|strategy| strategy.label()).collect();
                format!("unknown strategy '{value}' (expected one of: {})", known.join(", "))
            })
    }
}

fn newest(hand: &[CardId]) -> CardId {
    hand.last().copied().unwrap_or(CardId(0))
}

/// Uniformly random decisions from a seeded stream.
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl StrategyAgent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_play(&mut self, _obs: &Observation<'_>, legal: &[CardPlay]) -> Option<CardPlay> {
        if legal.is_empty() || !self.rng.gen_bool(0.6) {
            return None;
        }
        legal.choose(&mut self.rng).copied()
    }

    fn choose_discard(&mut self, _rules: &RuleDocument, hand: &[CardId]) -> CardId {
        hand.choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| newest(hand))
    }

    fn choose_reaction(
        &mut self,
        _obs: &Observation<'_>,
        _event: &ReactionEvent,
        eligible: &[CardId],
    ) -> Option<CardId> {
        if self.rng.gen_bool(0.5) {
            eligible.choose(&mut self.rng).copied()
        } else {
            None
        }
    }

    fn choose_target(&mut self, obs: &Observation<'_>, candidates: &[PlayerId]) -> PlayerId {
        candidates.choose(&mut self.rng).copied().unwrap_or(obs.seat)
    }
}

/// Heuristic player: scores each legal play by the tiles (or points) it
/// gains or costs and plays when the score clears its profile's threshold.
///
/// With [`AgentProfile::expert`] it plays the best positive play, always
/// defends itself and never bluffs.
pub struct ExpertAgent {
    profile: AgentProfile,
    rng: ChaCha20Rng,
}

impl Default for ExpertAgent {
    fn default() -> Self {
        Self::new(AgentProfile::expert(), 0)
    }
}

impl ExpertAgent {
    /// `seed` drives only the profile's bluffs and defence rolls.
    #[must_use]
    pub fn new(profile: AgentProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub const fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    fn play_score(&self, obs: &Observation<'_>, play: &CardPlay) -> f64 {
        let effect = &obs.rules.card(play.card).effect;
        f64::from(effect_value(obs, effect, play.target)) * self.profile.effect_weight(effect)
    }

    fn discard_score(&self, effect: &Effect) -> f64 {
        let bonus = if effect.intercepts_targeting() || effect.intercepts_movement() {
            self.profile.reactive_keep_bonus()
        } else {
            0.0
        };
        f64::from(keep_value(effect)) + bonus
    }

    /// Roll against `chance`; certain outcomes leave the stream untouched.
    fn roll(&mut self, chance: f64) -> bool {
        if chance <= 0.0 {
            false
        } else if chance >= 1.0 {
            true
        } else {
            self.rng.gen_bool(chance)
        }
    }
}

/// Estimated gain for the observing seat if `effect` resolved now.
fn effect_value(obs: &Observation<'_>, effect: &Effect, target: Option<PlayerId>) -> i32 {
    let rules = obs.rules;
    let victim = |spec: TargetSpec| {
        match spec {
            TargetSpec::Resolver => None,
            TargetSpec::ChosenOpponent => target.and_then(|id| obs.opponent(id)),
            TargetSpec::LeadingOpponent => obs.leader(),
            TargetSpec::TrailingOpponent => obs
                .opponents
                .iter()
                .min_by_key(|opponent| opponent.position),
        }
    };
    let own_shift = |delta: i32| -> i32 {
        i32::from(rules.landing_position(obs.position, delta)) - i32::from(obs.position)
    };
    let leader_bonus = |opponent: &OpponentView<'_>| -> i32 {
        i32::from(obs.leader().is_some_and(|leader| leader.id == opponent.id)) * 2
    };
    match effect {
        Effect::Advance { steps, target } => match victim(*target) {
            None if !target.is_opponent() => own_shift(i32::from(*steps)),
            _ => -i32::from(*steps),
        },
        Effect::Retreat { steps, target } => match victim(*target) {
            Some(opponent) => {
                let moved = i32::from(opponent.position)
                    - i32::from(rules.landing_position(opponent.position, -i32::from(*steps)));
                moved + leader_bonus(opponent)
            }
            None if !target.is_opponent() => own_shift(-i32::from(*steps)),
            None => 0,
        },
        Effect::Goto { tile } => i32::from(*tile) - i32::from(obs.position),
        Effect::SkipTurn { turns, target } => match victim(*target) {
            Some(opponent) => 3 * i32::from(*turns) + leader_bonus(opponent),
            None if !target.is_opponent() => -3 * i32::from(*turns),
            None => 0,
        },
        Effect::SwapWith { selector } => {
            let partner = match selector {
                Selector::FurthestBehind => obs.opponents.iter().min_by_key(|o| o.position),
                Selector::FurthestAhead => obs.leader(),
                Selector::Chosen => target.and_then(|id| obs.opponent(id)),
            };
            partner.map_or(0, |opponent| {
                i32::from(opponent.position) - i32::from(obs.position)
            })
        }
        Effect::DrawCards { count } => {
            let room = rules.max_hand_size().saturating_sub(u8::try_from(obs.hand.len()).unwrap_or(u8::MAX));
            i32::from((*count).min(room))
        }
        Effect::GainPoints { amount, target } => {
            let amount = i32::try_from(*amount).unwrap_or(i32::MAX / 4);
            if target.is_opponent() { -amount } else { 2 * amount }
        }
        Effect::Immunity { turns } => {
            let threatened = obs.opponents.iter().any(|opponent| opponent.hand_size > 0);
            if threatened && obs.immunity_turns == 0 {
                i32::from(*turns) + 1
            } else {
                0
            }
        }
        Effect::RollModifier { modifier } => match modifier {
            // Near an exact-landing exit a bigger roll is as likely to overshoot.
            RollModifier::Add(amount)
                if rules.exact_landing()
                    && obs.distance_to_exit() <= u16::from(rules.die_faces()) =>
            {
                -i32::from(amount.signum())
            }
            RollModifier::Add(amount) => i32::from(*amount),
            RollModifier::Halve => -2,
        },
        Effect::RevealHands => 1,
        Effect::Conditional {
            then, otherwise, ..
        } => (effect_value(obs, then, target) + effect_value(obs, otherwise, target)) / 2,
        Effect::RerollBranch { branches } => {
            let faces = i32::from(rules.die_faces().max(1));
            branches
                .iter()
                .map(|branch| {
                    let width = i32::from(branch.to) - i32::from(branch.from) + 1;
                    effect_value(obs, &branch.effect, target) * width
                })
                .sum::<i32>()
                / faces
        }
        Effect::None
        | Effect::SafeZone
        | Effect::ExactLandingRequired
        | Effect::Reflect
        | Effect::Block
        | Effect::CancelMovement => 0,
    }
}

/// Keep-worthiness of a card independent of the board, used to pick discards.
fn keep_value(effect: &Effect) -> i32 {
    match effect {
        Effect::Reflect => 6,
        Effect::Block | Effect::CancelMovement => 5,
        Effect::SkipTurn { turns, .. } => 3 * i32::from(*turns),
        Effect::Advance { steps, target } | Effect::Retreat { steps, target }
            if matches!(effect, Effect::Advance { .. }) != target.is_opponent() =>
        {
            i32::from(*steps)
        }
        Effect::SwapWith { .. } | Effect::Immunity { .. } => 3,
        Effect::RollModifier { .. } | Effect::DrawCards { .. } => 2,
        Effect::GainPoints { amount, target } if !target.is_opponent() => {
            i32::try_from(*amount).unwrap_or(i32::MAX)
        }
        _ => 0,
    }
}

impl StrategyAgent for ExpertAgent {
    fn name(&self) -> &str {
        &self.profile.id
    }

    fn choose_play(&mut self, obs: &Observation<'_>, legal: &[CardPlay]) -> Option<CardPlay> {
        let threshold = self.profile.play_threshold();
        let worthwhile = legal
            .iter()
            .map(|play| (self.play_score(obs, play), *play))
            .filter(|(score, _)| *score > threshold);
        let pick = if self.profile.decision_weights.play_high_value >= 0.5 {
            worthwhile.min_by(|a, b| b.0.total_cmp(&a.0))
        } else {
            worthwhile.min_by(|a, b| a.0.total_cmp(&b.0))
        }
        .map(|(_, play)| play)?;
        if self.roll(self.profile.traits.bluff_tendency) {
            log::trace!("{} holds back a play to keep its hand hidden", self.profile.id);
            return None;
        }
        Some(pick)
    }

    fn choose_discard(&mut self, rules: &RuleDocument, hand: &[CardId]) -> CardId {
        hand.iter()
            .rev()
            .min_by(|a, b| {
                let a = self.discard_score(&rules.card(**a).effect);
                let b = self.discard_score(&rules.card(**b).effect);
                a.total_cmp(&b)
            })
            .copied()
            .unwrap_or_else(|| newest(hand))
    }

    fn choose_reaction(
        &mut self,
        obs: &Observation<'_>,
        event: &ReactionEvent,
        eligible: &[CardId],
    ) -> Option<CardId> {
        let rules = obs.rules;
        let effect_of = |card: &CardId| &rules.card(*card).effect;
        match event {
            ReactionEvent::Targeted { target, .. } if *target == obs.seat => {
                if !self.roll(self.profile.defence_chance()) {
                    return None;
                }
                eligible
                    .iter()
                    .find(|card| matches!(effect_of(*card), Effect::Reflect))
                    .or_else(|| eligible.first())
                    .copied()
            }
            ReactionEvent::Targeted { .. } => None,
            ReactionEvent::Movement { mover, roll } => {
                let mover_position = obs.opponent(*mover).map_or(0, |view| view.position);
                let landing = rules.landing_position(mover_position, *roll);
                let slack = self.profile.movement_slack(rules.die_faces());
                if landing != rules.exit_tile() && f64::from(landing) + slack < f64::from(obs.position) {
                    return None;
                }
                eligible
                    .iter()
                    .find(|card| matches!(effect_of(*card), Effect::CancelMovement))
                    .or_else(|| eligible.first())
                    .copied()
            }
        }
    }

    fn choose_target(&mut self, obs: &Observation<'_>, candidates: &[PlayerId]) -> PlayerId {
        candidates
            .iter()
            .copied()
            .max_by_key(|id| {
                let position = obs.opponent(*id).map_or(0, |view| view.position);
                (position, std::cmp::Reverse(*id))
            })
            .unwrap_or(obs.seat)
    }
}

/// Never plays or reacts.
pub struct PassiveAgent;

impl StrategyAgent for PassiveAgent {
    fn name(&self) -> &str {
        "passive"
    }

    fn choose_play(&mut self, _obs: &Observation<'_>, _legal: &[CardPlay]) -> Option<CardPlay> {
        None
    }

    fn choose_discard(&mut self, _rules: &RuleDocument, hand: &[CardId]) -> CardId {
        newest(hand)
    }

    fn choose_reaction(
        &mut self,
        _obs: &Observation<'_>,
        _event: &ReactionEvent,
        _eligible: &[CardId],
    ) -> Option<CardId> {
        None
    }

    fn choose_target(&mut self, obs: &Observation<'_>, candidates: &[PlayerId]) -> PlayerId {
        candidates.first().copied().unwrap_or(obs.seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r"
game: { name: Agents }
players: { min: 2, max: 2 }
components:
  board:
    tiles: [ { index: 1 }, { index: 2 }, { index: 3 }, { index: 4 }, { index: 5 },
             { index: 6 }, { index: 7 }, { index: 8 }, { index: 9 }, { index: 10 } ]
  deck:
    size: 4
    cards:
      - { name: Sprint, timing: own_turn, effect: { kind: advance, steps: 3 }, copies: 1 }
      - { name: Stumble, timing: own_turn, effect: { kind: retreat, steps: 3, target: chosen_opponent }, copies: 1 }
      - { name: Mirror, timing: { reactive_on_trigger: targeted }, effect: { kind: reflect }, copies: 1 }
      - { name: Shield, timing: reactive_any_time, effect: { kind: block }, copies: 1 }
setup: { initial_hand: 0, max_hand: 4 }
victory: { kind: exact_landing }
";

    fn observation<'a>(rules: &'a RuleDocument, position: u16, theirs: u16, hand: &'a [CardId]) -> Observation<'a> {
        Observation {
            rules,
            seat: PlayerId(0),
            turn: 1,
            current_player: PlayerId(0),
            position,
            hand,
            statuses: Vec::new(),
            immunity_turns: 0,
            points: 0,
            opponents: vec![OpponentView {
                id: PlayerId(1),
                position: theirs,
                hand_size: 2,
                skipped_turns: 0,
                immunity_turns: 0,
                points: 0,
                statuses: Vec::new(),
                revealed_hand: None,
            }],
            discard_top: None,
        }
    }

    #[test]
    fn strategy_ids_parse_case_insensitively() {
        assert_eq!("Expert".parse::<StrategyId>(), Ok(StrategyId::Expert));
        assert_eq!(" random ".parse::<StrategyId>(), Ok(StrategyId::Random));
        assert!("greedy".parse::<StrategyId>().unwrap_err().contains("passive"));
        for id in StrategyId::ALL {
            assert_eq!(id.create_agent(7).name(), id.label());
        }
    }

    #[test]
    fn expert_prefers_the_bigger_swing() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let stumble = rules.card_by_name("Stumble").unwrap().id;
        let hand = [sprint, stumble];
        let obs = observation(&rules, 2, 8, &hand);
        let legal = [
            CardPlay { card: sprint, target: None },
            CardPlay { card: stumble, target: Some(PlayerId(1)) },
        ];
        let mut expert = ExpertAgent::default();
        // Retreating the leader by 3 plus the leader bonus beats advancing 3.
        assert_eq!(expert.choose_play(&obs, &legal), Some(legal[1]));
    }

    #[test]
    fn expert_avoids_overshooting_an_exact_exit() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let hand = [sprint];
        let obs = observation(&rules, 9, 1, &hand);
        let legal = [CardPlay { card: sprint, target: None }];
        assert_eq!(ExpertAgent::default().choose_play(&obs, &legal), None);
    }

    #[test]
    fn expert_reflects_when_targeted_and_keeps_reflectors() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let mirror = rules.card_by_name("Mirror").unwrap().id;
        let shield = rules.card_by_name("Shield").unwrap().id;
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let hand = [shield, mirror];
        let obs = observation(&rules, 4, 6, &hand);
        let event = ReactionEvent::Targeted {
            caster: PlayerId(1),
            target: PlayerId(0),
            effect: "retreat",
        };
        let mut expert = ExpertAgent::default();
        assert_eq!(expert.choose_reaction(&obs, &event, &hand), Some(mirror));
        assert_eq!(expert.choose_discard(&rules, &[mirror, sprint, shield]), sprint);
    }

    fn steady(profile: AgentProfile) -> ExpertAgent {
        let traits = crate::profile::ProfileTraits {
            bluff_tendency: 0.0,
            ..profile.traits
        };
        ExpertAgent::new(AgentProfile { traits, ..profile }, 3)
    }

    #[test]
    fn risk_tolerant_profiles_play_marginal_cards() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let hand = [sprint];
        // Sprinting from 9 rebounds off the exit: a small loss.
        let obs = observation(&rules, 9, 1, &hand);
        let legal = [CardPlay { card: sprint, target: None }];
        assert_eq!(steady(AgentProfile::expert()).choose_play(&obs, &legal), None);
        assert_eq!(
            steady(AgentProfile::aggressive()).choose_play(&obs, &legal),
            Some(legal[0])
        );
    }

    #[test]
    fn low_play_high_value_saves_the_big_card() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let stumble = rules.card_by_name("Stumble").unwrap().id;
        let hand = [sprint, stumble];
        let obs = observation(&rules, 2, 8, &hand);
        let legal = [
            CardPlay { card: sprint, target: None },
            CardPlay { card: stumble, target: Some(PlayerId(1)) },
        ];
        let mut patient = AgentProfile::balanced();
        patient.decision_weights.play_high_value = 0.2;
        assert_eq!(steady(patient).choose_play(&obs, &legal), Some(legal[0]));
    }

    #[test]
    fn card_conservation_sets_how_close_a_mover_may_come() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let shield = rules.card_by_name("Shield").unwrap().id;
        let hand = [shield];
        let obs = observation(&rules, 6, 1, &hand);
        let short = ReactionEvent::Movement {
            mover: PlayerId(1),
            roll: 4,
        };
        let past = ReactionEvent::Movement {
            mover: PlayerId(1),
            roll: 8,
        };

        let mut expert = steady(AgentProfile::expert());
        assert_eq!(expert.choose_reaction(&obs, &short, &hand), None);
        assert_eq!(expert.choose_reaction(&obs, &past, &hand), Some(shield));

        let mut aggressive = steady(AgentProfile::aggressive());
        assert_eq!(aggressive.choose_reaction(&obs, &short, &hand), Some(shield));

        let mut conservative = steady(AgentProfile::conservative());
        assert_eq!(conservative.choose_reaction(&obs, &past, &hand), None);
    }

    #[test]
    fn timid_profiles_let_attacks_through_and_shed_reactions() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let mirror = rules.card_by_name("Mirror").unwrap().id;
        let shield = rules.card_by_name("Shield").unwrap().id;
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let hand = [mirror];
        let obs = observation(&rules, 4, 6, &hand);
        let event = ReactionEvent::Targeted {
            caster: PlayerId(1),
            target: PlayerId(0),
            effect: "retreat",
        };
        let mut timid = AgentProfile::balanced();
        timid.traits.defensive_play = 0.0;
        assert_eq!(steady(timid).choose_reaction(&obs, &event, &hand), None);

        let mut aggressive = steady(AgentProfile::aggressive());
        assert_eq!(aggressive.choose_discard(&rules, &[sprint, shield]), shield);
        assert_eq!(aggressive.name(), "aggressive");
    }

    #[test]
    fn passive_agent_never_acts() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let sprint = rules.card_by_name("Sprint").unwrap().id;
        let hand = [sprint];
        let obs = observation(&rules, 1, 1, &hand);
        let mut passive = PassiveAgent;
        assert_eq!(
            passive.choose_play(&obs, &[CardPlay { card: sprint, target: None }]),
            None
        );
        assert_eq!(passive.choose_target(&obs, &[PlayerId(1)]), PlayerId(1));
    }

    #[test]
    fn random_agent_is_reproducible() {
        let rules = RuleDocument::from_yaml_str(RULES).unwrap();
        let hand: Vec<CardId> = rules.deck_composition();
        let picks = |seed| {
            let mut agent = RandomAgent::new(seed);
            (0..16)
                .map(|_| agent.choose_discard(&rules, &hand))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }
}
