//! Boardsim Game Engine
//!
//! Platform-agnostic engine for track-and-card board games. A rule document
//! (YAML or JSON data) describes the board, the deck and the victory rule; the
//! engine interprets it to play sessions between strategy agents and to run
//! seeded batch simulations.

pub mod constants;
pub mod deck;
pub mod effect;
pub mod error;
pub mod player;
pub mod profile;
pub mod reaction;
pub mod resolver;
pub mod rng;
pub mod rules;
pub mod session;
pub mod simulation;
pub mod status;
pub mod strategy;
pub mod turn;
pub mod victory;

// Re-export commonly used types
pub use deck::{CardId, DeckState, Hand, HandLimitOutcome};
pub use effect::{
    CardTiming, Effect, Predicate, ReactionTrigger, RollBranch, RollModifier, Selector, TargetSpec,
};
pub use error::{
    ActionError, ConsistencyError, DeckError, ProfileError, RuleError, SessionError,
};
pub use player::{Player, PlayerId};
pub use profile::{AgentProfile, DecisionWeights, ProfileBook, ProfileTraits};
pub use reaction::{ReactionEvent, ReactionOutcome};
pub use resolver::{BoardView, EffectResolver, EffectSource, Resolution, ResolveRequest, StateChange};
pub use rng::{RngBundle, derive_stream_seed};
pub use rules::{
    CardDef, PlayerBounds, RuleDocument, SetupRules, Tile, TurnRules, VictoryKind, VictoryRule,
};
pub use session::{GameEvent, GameEventKind, GameOutcome, GameReport, GameSession, Seats};
pub use simulation::{
    AgentFactory, BatchStats, CancelToken, Side, SimulationConfig, SimulationRunner,
};
pub use status::{StatusChange, StatusRule, StatusTracker};
pub use strategy::{
    CardPlay, ExpertAgent, Observation, OpponentView, StrategyAgent, StrategyId,
};
pub use turn::TurnPhase;
