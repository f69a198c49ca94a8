use anyhow::{Result, anyhow};
use boardsim_game::{AgentFactory, AgentProfile, ProfileBook, StrategyAgent, StrategyId};

/// What sits behind `--p1`/`--p2`: a built-in strategy or a named profile.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentChoice {
    Strategy(StrategyId),
    Profile(AgentProfile),
}

impl AgentChoice {
    /// Resolve a name against the built-in strategies first, then the profiles.
    pub fn resolve(name: &str, book: &ProfileBook) -> Result<Self> {
        if let Ok(strategy) = name.parse::<StrategyId>() {
            return Ok(Self::Strategy(strategy));
        }
        let wanted = name.trim().to_ascii_lowercase();
        book.get_by_id(&wanted)
            .cloned()
            .map(Self::Profile)
            .ok_or_else(|| {
                let known: Vec<&str> = StrategyId::ALL
                    .iter()
                    .map(|strategy| StrategyId::label(*strategy))
                    .chain(book.iter().map(|profile| profile.id.as_str()))
                    .collect();
                anyhow!(
                    "unknown strategy '{name}' (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}

impl AgentFactory for AgentChoice {
    fn label(&self) -> &str {
        match self {
            Self::Strategy(strategy) => StrategyId::label(*strategy),
            Self::Profile(profile) => &profile.id,
        }
    }

    fn create(&self, seed: u64) -> Box<dyn StrategyAgent> {
        match self {
            Self::Strategy(strategy) => strategy.create_agent(seed),
            Self::Profile(profile) => profile.create(seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_win_over_profiles_and_profiles_resolve_by_id() {
        let book = ProfileBook::builtin();
        assert_eq!(
            AgentChoice::resolve("Expert", &book).unwrap(),
            AgentChoice::Strategy(StrategyId::Expert)
        );
        let choice = AgentChoice::resolve(" Aggressive", &book).unwrap();
        assert_eq!(choice.label(), "aggressive");
        assert_eq!(choice.create(1).name(), "aggressive");
    }

    #[test]
    fn unknown_names_list_every_option() {
        let err = AgentChoice::resolve("greedy", &ProfileBook::builtin()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown strategy 'greedy'"));
        assert!(message.contains("passive"));
        assert!(message.contains("conservative"));
    }
}
