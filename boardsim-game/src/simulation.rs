//! Batch simulation: many independent sessions between two strategies.
//!
//! Every game derives its seed from the batch seed and its index, so the
//! statistics depend only on `(rules, strategies, config)` and never on how
//! games are scheduled across threads. Aggregation goes through
//! [`BatchStats::merge`], which is commutative and associative.
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::constants::{DEFAULT_GAMES, DEFAULT_SEED, TURN_HISTOGRAM_BUCKET};
use crate::error::SessionError;
use crate::player::PlayerId;
use crate::profile::AgentProfile;
use crate::rng::derive_stream_seed;
use crate::rules::RuleDocument;
use crate::session::{GameEvent, GameOutcome, GameReport, GameSession};
use crate::strategy::{ExpertAgent, StrategyAgent, StrategyId};

/// Batch parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationConfig {
    pub games: usize,
    pub seed: u64,
    /// Overrides the rule document's max-turn bound.
    pub max_turns: Option<u32>,
    /// Worker threads; `None` uses the global rayon pool.
    pub threads: Option<usize>,
    pub parallel: bool,
    pub players: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GAMES, DEFAULT_SEED)
    }
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(games: usize, seed: u64) -> Self {
        Self {
            games,
            seed,
            max_turns: None,
            threads: None,
            parallel: true,
            players: 2,
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Seats per game. Agents alternate around the table.
    #[must_use]
    pub const fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Produces a fresh agent for every seat of every game.
pub trait AgentFactory: Sync {
    fn label(&self) -> &str;
    fn create(&self, seed: u64) -> Box<dyn StrategyAgent>;
}

impl AgentFactory for StrategyId {
    fn label(&self) -> &str {
        StrategyId::label(*self)
    }

    fn create(&self, seed: u64) -> Box<dyn StrategyAgent> {
        self.create_agent(seed)
    }
}

impl AgentFactory for AgentProfile {
    fn label(&self) -> &str {
        &self.id
    }

    fn create(&self, seed: u64) -> Box<dyn StrategyAgent> {
        Box::new(ExpertAgent::new(self.clone(), seed))
    }
}

/// Cooperative cancellation flag shared with a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop launching new games. Games already running finish normally.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Which of the two competing strategies sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Side seated at `seat` in game `index`; agent A opens even games.
    #[must_use]
    pub const fn of_seat(index: usize, seat: usize) -> Self {
        if (index + seat) % 2 == 0 { Self::A } else { Self::B }
    }
}

/// Aggregated statistics for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub games_requested: u64,
    pub games_played: u64,
    pub wins_a: u64,
    pub wins_b: u64,
    pub aborted: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub first_seat_wins: u64,
    pub total_turns: u64,
    /// Games per turn-count bucket, keyed by the bucket's lower bound.
    pub turn_histogram: BTreeMap<u32, u64>,
    pub failures: BTreeMap<String, u64>,
    pub lead_changes: u64,
    pub early_lead_games: u64,
    pub early_lead_wins: u64,
    pub comebacks: u64,
    pub illegal_actions: u64,
}

impl BatchStats {
    /// Fold one finished game into the totals.
    pub fn record(&mut self, report: &GameReport, index: usize) {
        self.games_played += 1;
        self.total_turns += u64::from(report.turns);
        *self
            .turn_histogram
            .entry(report.turns / TURN_HISTOGRAM_BUCKET * TURN_HISTOGRAM_BUCKET)
            .or_default() += 1;
        self.lead_changes += u64::from(report.lead_changes);
        self.illegal_actions += u64::from(report.illegal_actions);

        match &report.outcome {
            Some(GameOutcome::Winner { player, .. }) => {
                match Side::of_seat(index, player.index()) {
                    Side::A => self.wins_a += 1,
                    Side::B => self.wins_b += 1,
                }
                if *player == PlayerId(0) {
                    self.first_seat_wins += 1;
                }
                if report.comeback {
                    self.comebacks += 1;
                }
                if let Some(early) = report.early_leader {
                    self.early_lead_games += 1;
                    if early == *player {
                        self.early_lead_wins += 1;
                    }
                }
            }
            Some(GameOutcome::Aborted { .. }) | None => self.aborted += 1,
            Some(GameOutcome::Failed { reason, .. }) => self.record_failure(reason.clone()),
        }
    }

    fn record_failure(&mut self, reason: String) {
        self.failed += 1;
        *self.failures.entry(reason).or_default() += 1;
    }

    /// Combine two partial aggregates.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.games_requested += other.games_requested;
        self.games_played += other.games_played;
        self.wins_a += other.wins_a;
        self.wins_b += other.wins_b;
        self.aborted += other.aborted;
        self.failed += other.failed;
        self.cancelled += other.cancelled;
        self.first_seat_wins += other.first_seat_wins;
        self.total_turns += other.total_turns;
        for (bucket, count) in other.turn_histogram {
            *self.turn_histogram.entry(bucket).or_default() += count;
        }
        for (reason, count) in other.failures {
            *self.failures.entry(reason).or_default() += count;
        }
        self.lead_changes += other.lead_changes;
        self.early_lead_games += other.early_lead_games;
        self.early_lead_wins += other.early_lead_wins;
        self.comebacks += other.comebacks;
        self.illegal_actions += other.illegal_actions;
        self
    }

    #[must_use]
    pub const fn decided(&self) -> u64 {
        self.wins_a + self.wins_b
    }

    #[must_use]
    pub fn avg_turns(&self) -> f64 {
        ratio(self.total_turns, self.games_played)
    }

    #[must_use]
    pub fn win_rate_a(&self) -> f64 {
        ratio(self.wins_a, self.games_played)
    }

    #[must_use]
    pub fn win_rate_b(&self) -> f64 {
        ratio(self.wins_b, self.games_played)
    }

    /// `1 - |wins_a - wins_b| / decided`; 1.0 is a perfectly even matchup.
    #[must_use]
    pub fn balance_score(&self) -> f64 {
        if self.decided() == 0 {
            return 0.0;
        }
        1.0 - ratio(self.wins_a.abs_diff(self.wins_b), self.decided())
    }

    /// Share of decided games won by whoever moved first.
    #[must_use]
    pub fn first_player_advantage(&self) -> f64 {
        ratio(self.first_seat_wins, self.decided())
    }

    #[must_use]
    pub fn avg_lead_changes(&self) -> f64 {
        ratio(self.lead_changes, self.games_played)
    }

    /// How often the leader at one third of the game went on to win.
    #[must_use]
    pub fn early_lead_win_rate(&self) -> f64 {
        ratio(self.early_lead_wins, self.early_lead_games)
    }

    #[must_use]
    pub fn comeback_rate(&self) -> f64 {
        ratio(self.comebacks, self.decided())
    }

    #[must_use]
    pub fn outcome_distribution(&self) -> BTreeMap<&'static str, u64> {
        BTreeMap::from([
            ("a_wins", self.wins_a),
            ("b_wins", self.wins_b),
            ("aborted", self.aborted),
            ("failed", self.failed),
            ("cancelled", self.cancelled),
        ])
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Drives a batch of games over one rule document.
pub struct SimulationRunner<'r> {
    rules: &'r RuleDocument,
    config: SimulationConfig,
    cancel: CancelToken,
}

impl<'r> SimulationRunner<'r> {
    /// # Errors
    ///
    /// Returns [`SessionError::PlayerCount`] if the configured seat count is
    /// outside the document's bounds.
    pub fn new(rules: &'r RuleDocument, config: SimulationConfig) -> Result<Self, SessionError> {
        let bounds = rules.player_bounds();
        if !bounds.contains(config.players) {
            return Err(SessionError::PlayerCount {
                requested: config.players,
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(Self {
            rules,
            config,
            cancel: CancelToken::new(),
        })
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Play the whole batch.
    pub fn run(&self, a: &dyn AgentFactory, b: &dyn AgentFactory) -> BatchStats {
        let games = self.config.games;
        let mut stats = if self.config.parallel {
            match self.config.threads {
                Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(|| self.run_parallel(a, b)),
                    Err(err) => {
                        log::warn!("could not build a {threads}-thread pool ({err}); using the global pool");
                        self.run_parallel(a, b)
                    }
                },
                None => self.run_parallel(a, b),
            }
        } else {
            (0..games).fold(BatchStats::default(), |stats, index| {
                self.accumulate(stats, index, a, b)
            })
        };
        stats.games_requested = games as u64;
        log::info!(
            "{} vs {}: {} games (seed {}), {} / {} wins, {} aborted, {} failed, {} cancelled",
            a.label(),
            b.label(),
            stats.games_played,
            self.config.seed,
            stats.wins_a,
            stats.wins_b,
            stats.aborted,
            stats.failed,
            stats.cancelled
        );
        stats
    }

    fn run_parallel(&self, a: &dyn AgentFactory, b: &dyn AgentFactory) -> BatchStats {
        (0..self.config.games)
            .into_par_iter()
            .fold(BatchStats::default, |stats, index| {
                self.accumulate(stats, index, a, b)
            })
            .reduce(BatchStats::default, BatchStats::merge)
    }

    fn accumulate(
        &self,
        mut stats: BatchStats,
        index: usize,
        a: &dyn AgentFactory,
        b: &dyn AgentFactory,
    ) -> BatchStats {
        if self.cancel.is_cancelled() {
            stats.cancelled += 1;
            return stats;
        }
        match self.play_game(index, a, b, false) {
            Ok((report, _)) => stats.record(&report, index),
            Err(err) => stats.record_failure(err.to_string()),
        }
        stats
    }

    /// Play game `index` of the batch with its event log, e.g. for replay.
    ///
    /// # Errors
    ///
    /// Propagates session setup errors.
    pub fn run_single(
        &self,
        index: usize,
        a: &dyn AgentFactory,
        b: &dyn AgentFactory,
    ) -> Result<(GameReport, Vec<GameEvent>), SessionError> {
        self.play_game(index, a, b, true)
    }

    /// Seed of game `index`.
    #[must_use]
    pub fn game_seed(&self, index: usize) -> u64 {
        derive_stream_seed(self.config.seed, format!("game:{index}").as_bytes())
    }

    fn play_game(
        &self,
        index: usize,
        a: &dyn AgentFactory,
        b: &dyn AgentFactory,
        with_log: bool,
    ) -> Result<(GameReport, Vec<GameEvent>), SessionError> {
        let mut session = GameSession::new(self.rules, self.config.players, self.game_seed(index))?;
        if let Some(max_turns) = self.config.max_turns {
            session = session.with_max_turns(max_turns);
        }
        if with_log {
            session = session.with_event_log();
        }
        let mut agents: Vec<Box<dyn StrategyAgent>> = (0..self.config.players)
            .map(|seat| {
                let seed = session.rng.agent_seed(seat);
                match Side::of_seat(index, seat) {
                    Side::A => a.create(seed),
                    Side::B => b.create(seed),
                }
            })
            .collect();
        let report = session.run(&mut agents)?;
        Ok((report, session.events().to_vec()))
    }
}

/// Convenience wrapper: build a runner and play the batch.
///
/// # Errors
///
/// Same as [`SimulationRunner::new`].
pub fn run(
    rules: &RuleDocument,
    a: &dyn AgentFactory,
    b: &dyn AgentFactory,
    config: SimulationConfig,
) -> Result<BatchStats, SessionError> {
    Ok(SimulationRunner::new(rules, config)?.run(a, b))
}
