//! Agent personalities loaded from data.
//!
//! A profile is a handful of weights in `0..=1` that tune the heuristic
//! [`crate::strategy::ExpertAgent`]: how low a card's value may drop before it
//! is still worth playing, how readily reactive cards are spent and which
//! cards are kept when the hand overflows. Profiles files map an id to a
//! profile:
//!
//! ```yaml
//! profiles:
//!   bold:
//!     name: Bold
//!     description: Plays everything
//!     traits: { risk_tolerance: 0.9 }
//!     decision_weights: { wait_for_opportunity: 0.2 }
//! ```
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::effect::Effect;
use crate::error::ProfileError;

const fn neutral() -> f64 {
    0.5
}

const fn default_bluff() -> f64 {
    0.2
}

/// Personality traits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileTraits {
    /// Willingness to play cards whose estimated value is marginal or negative.
    #[serde(default = "neutral")]
    pub risk_tolerance: f64,
    /// Reluctance to spend reactive cards on anything but a real threat.
    #[serde(default = "neutral", alias = "trump_conservation")]
    pub card_conservation: f64,
    /// Weight on effects that award points.
    #[serde(default = "neutral")]
    pub point_greed: f64,
    /// How reliably the agent answers an effect aimed at it.
    #[serde(default = "neutral")]
    pub defensive_play: f64,
    /// Chance of holding back a play that cleared the threshold.
    #[serde(default = "default_bluff")]
    pub bluff_tendency: f64,
}

impl Default for ProfileTraits {
    fn default() -> Self {
        Self {
            risk_tolerance: neutral(),
            card_conservation: neutral(),
            point_greed: neutral(),
            defensive_play: neutral(),
            bluff_tendency: default_bluff(),
        }
    }
}

/// Tie-breaking preferences between plays that are all worth making.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionWeights {
    /// Above one half the best play goes first; below it the weakest
    /// worthwhile play does, saving big cards for later.
    #[serde(default = "neutral")]
    pub play_high_value: f64,
    /// Raises the value a play must reach before it is made.
    #[serde(default = "neutral")]
    pub wait_for_opportunity: f64,
}

impl Default for DecisionWeights {
    fn default() -> Self {
        Self {
            play_high_value: neutral(),
            wait_for_opportunity: neutral(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: ProfileTraits,
    #[serde(default)]
    pub decision_weights: DecisionWeights,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ProfileNoId {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    traits: ProfileTraits,
    #[serde(default)]
    decision_weights: DecisionWeights,
}

#[derive(Debug, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    profiles: BTreeMap<String, ProfileNoId>,
}

impl AgentProfile {
    fn with_id(id: String, profile: ProfileNoId) -> Self {
        Self {
            name: profile.name.unwrap_or_else(|| id.clone()),
            id,
            description: profile.description,
            traits: profile.traits,
            decision_weights: profile.decision_weights,
        }
    }

    fn preset(id: &str, name: &str, description: &str, traits: ProfileTraits) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            traits,
            decision_weights: DecisionWeights::default(),
        }
    }

    /// Neutral weights that never bluff: the behaviour of the `expert` strategy.
    #[must_use]
    pub fn expert() -> Self {
        Self::preset(
            "expert",
            "Expert",
            "scores every legal play and always defends itself",
            ProfileTraits {
                bluff_tendency: 0.0,
                ..ProfileTraits::default()
            },
        )
    }

    #[must_use]
    pub fn balanced() -> Self {
        Self::preset(
            "balanced",
            "Balanced",
            "even weights; now and then keeps a good card back",
            ProfileTraits::default(),
        )
    }

    #[must_use]
    pub fn aggressive() -> Self {
        Self::preset(
            "aggressive",
            "Aggressive",
            "plays marginal cards, chases points and spends reactions freely",
            ProfileTraits {
                risk_tolerance: 0.9,
                card_conservation: 0.2,
                point_greed: 0.9,
                ..ProfileTraits::default()
            },
        )
    }

    #[must_use]
    pub fn conservative() -> Self {
        Self::preset(
            "conservative",
            "Conservative",
            "waits for strong plays and saves reactive cards for real threats",
            ProfileTraits {
                risk_tolerance: 0.3,
                card_conservation: 0.9,
                defensive_play: 0.8,
                ..ProfileTraits::default()
            },
        )
    }

    /// Minimum estimated value a play must exceed.
    #[must_use]
    pub fn play_threshold(&self) -> f64 {
        (self.decision_weights.wait_for_opportunity - self.traits.risk_tolerance) * 4.0
    }

    /// Multiplier applied to a card's estimated value.
    #[must_use]
    pub fn effect_weight(&self, effect: &Effect) -> f64 {
        let mut awards_points = false;
        effect.walk(&mut |inner| {
            awards_points |= matches!(inner, Effect::GainPoints { target, .. } if !target.is_opponent());
        });
        if awards_points {
            self.traits.point_greed * 2.0
        } else {
            1.0
        }
    }

    /// Probability of answering an effect aimed at this agent.
    #[must_use]
    pub fn defence_chance(&self) -> f64 {
        (self.traits.defensive_play * 2.0).clamp(0.0, 1.0)
    }

    /// Tiles short of this agent an opponent's roll may stop and still be
    /// worth a reaction; negative values demand the mover overtake by that much.
    #[must_use]
    pub fn movement_slack(&self, die_faces: u8) -> f64 {
        (0.5 - self.traits.card_conservation) * 2.0 * f64::from(die_faces)
    }

    /// Extra keep-worthiness of reactive cards when trimming the hand.
    #[must_use]
    pub fn reactive_keep_bonus(&self) -> f64 {
        (self.traits.card_conservation - 0.5) * 8.0
    }

    fn weights(&self) -> [(&'static str, f64); 7] {
        [
            ("risk_tolerance", self.traits.risk_tolerance),
            ("card_conservation", self.traits.card_conservation),
            ("point_greed", self.traits.point_greed),
            ("defensive_play", self.traits.defensive_play),
            ("bluff_tendency", self.traits.bluff_tendency),
            ("play_high_value", self.decision_weights.play_high_value),
            ("wait_for_opportunity", self.decision_weights.wait_for_opportunity),
        ]
    }

    /// Check that every weight lies in `0..=1`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::OutOfRange`] naming the first bad weight.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, value) in self.weights() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::OutOfRange {
                    profile: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Ordered set of profiles addressable by id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileBook(Vec<AgentProfile>);

impl ProfileBook {
    /// The shipped presets: balanced, aggressive and conservative.
    #[must_use]
    pub fn builtin() -> Self {
        Self(vec![
            AgentProfile::balanced(),
            AgentProfile::aggressive(),
            AgentProfile::conservative(),
        ])
    }

    /// Parse a profiles file. Ids come out sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Schema`] for malformed YAML and
    /// [`ProfileError::OutOfRange`] for weights outside `0..=1`.
    pub fn from_yaml_str(source: &str) -> Result<Self, ProfileError> {
        let file: ProfilesFile = serde_yaml::from_str(source)?;
        let profiles = file
            .profiles
            .into_iter()
            .map(|(id, profile)| AgentProfile::with_id(id, profile))
            .collect::<Vec<_>>();
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self(profiles))
    }

    /// Load a profiles file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] when the file cannot be read, otherwise
    /// whatever [`Self::from_yaml_str`] returns.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_yaml_str(&source)?;
        log::debug!("loaded {} agent profile(s) from {}", book.len(), path.display());
        Ok(book)
    }

    /// Add `other`'s profiles, replacing any with the same id.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        for profile in other.0 {
            match self.0.iter_mut().find(|known| known.id == profile.id) {
                Some(known) => *known = profile,
                None => self.0.push(profile),
            }
        }
        self
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&AgentProfile> {
        self.0.iter().find(|profile| profile.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AgentProfile> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileBook {
    type Item = &'a AgentProfile;
    type IntoIter = std::slice::Iter<'a, AgentProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::TargetSpec;

    const PROFILES: &str = r"
profiles:
  bold:
    name: Bold
    description: Plays everything
    traits: { risk_tolerance: 0.9, trump_conservation: 0.1, memory_strength: 0.7 }
    decision_weights: { wait_for_opportunity: 0.2 }
  balanced:
    description: Overridden preset
";

    #[test]
    fn profiles_parse_with_defaults_and_sorted_ids() {
        let book = ProfileBook::from_yaml_str(PROFILES).unwrap();
        let ids: Vec<_> = book.iter().map(|profile| profile.id.as_str()).collect();
        assert_eq!(ids, vec!["balanced", "bold"]);

        let bold = book.get_by_id("bold").unwrap();
        assert_eq!(bold.name, "Bold");
        assert!((bold.traits.card_conservation - 0.1).abs() < f64::EPSILON);
        assert!((bold.traits.bluff_tendency - 0.2).abs() < f64::EPSILON);
        assert!((bold.decision_weights.play_high_value - 0.5).abs() < f64::EPSILON);
        assert!(bold.play_threshold() < 0.0);

        // A missing name falls back to the id.
        assert_eq!(book.get_by_id("balanced").unwrap().name, "balanced");
    }

    #[test]
    fn bundled_sample_profiles_load() {
        let book = ProfileBook::from_yaml_str(include_str!("../data/agent_profiles.yaml")).unwrap();
        let hoarder = book.get_by_id("hoarder").unwrap();
        assert!(hoarder.play_threshold() > 2.0);
        assert!(book.get_by_id("gambler").unwrap().movement_slack(6) > 5.0);
    }

    #[test]
    fn merging_replaces_presets_by_id() {
        let book = ProfileBook::builtin().merged(ProfileBook::from_yaml_str(PROFILES).unwrap());
        let ids: Vec<_> = book.iter().map(|profile| profile.id.as_str()).collect();
        assert_eq!(ids, vec!["balanced", "aggressive", "conservative", "bold"]);
        assert_eq!(book.get_by_id("balanced").unwrap().description, "Overridden preset");
    }

    #[test]
    fn weights_outside_unit_range_are_rejected() {
        let result = ProfileBook::from_yaml_str("profiles:\n  wild:\n    traits: { point_greed: 1.5 }\n");
        assert!(matches!(
            result,
            Err(ProfileError::OutOfRange { ref profile, field: "point_greed", .. }) if profile == "wild"
        ));
        assert!(matches!(
            ProfileBook::from_yaml_str("profiles: [1, 2]"),
            Err(ProfileError::Schema(_))
        ));
    }

    #[test]
    fn presets_are_valid_and_neutral_expert_matches_defaults() {
        for profile in ProfileBook::builtin().iter().chain([&AgentProfile::expert()]) {
            profile.validate().unwrap();
        }
        let expert = AgentProfile::expert();
        assert!(expert.play_threshold().abs() < f64::EPSILON);
        assert!(expert.movement_slack(6).abs() < f64::EPSILON);
        assert!((expert.defence_chance() - 1.0).abs() < f64::EPSILON);

        let aggressive = AgentProfile::aggressive();
        let points = Effect::GainPoints {
            amount: 2,
            target: TargetSpec::Resolver,
        };
        assert!(aggressive.effect_weight(&points) > 1.0);
        assert!(aggressive.movement_slack(6) > 0.0);
        assert!(AgentProfile::conservative().reactive_keep_bonus() > 0.0);
    }
}
