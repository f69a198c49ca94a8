//! A single game: players, deck, statuses and the turn pointer.
//!
//! [`GameSession`] borrows an immutable [`RuleDocument`] and owns everything
//! that changes during play. The phase machine itself lives in
//! [`crate::turn`]; this module holds setup, state commits, observations and
//! the end-of-game report.
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

use crate::constants::COMEBACK_DEFICIT;
use crate::deck::{CardId, DeckState};
use crate::effect::{CardTiming, Effect};
use crate::error::{ActionError, SessionError};
use crate::player::{Player, PlayerId};
use crate::reaction::{self, ReactionEvent, ReactionOutcome};
use crate::resolver::{BoardView, EffectResolver, EffectSource, Resolution, ResolveRequest, StateChange};
use crate::rng::RngBundle;
use crate::rules::RuleDocument;
use crate::status::StatusTracker;
use crate::strategy::{CardPlay, Observation, OpponentView, StrategyAgent};
use crate::turn::TurnPhase;

/// Agents in seat order.
pub type Seats = [Box<dyn StrategyAgent>];

/// Terminal state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GameOutcome {
    Winner { player: PlayerId, turns: u32 },
    /// The max-turn bound was reached.
    Aborted { turns: u32 },
    /// The session hit an unrecoverable engine error.
    Failed { turns: u32, reason: String },
}

impl GameOutcome {
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self {
            Self::Winner { player, .. } => Some(*player),
            Self::Aborted { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn turns(&self) -> u32 {
        match self {
            Self::Winner { turns, .. } | Self::Aborted { turns } | Self::Failed { turns, .. } => {
                *turns
            }
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Winner { .. } => "victory",
            Self::Aborted { .. } => "aborted",
            Self::Failed { .. } => "failed",
        }
    }
}

/// One entry of the session event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// One-based turn the event happened in.
    pub turn: u32,
    #[serde(flatten)]
    pub kind: GameEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEventKind {
    TurnStarted {
        player: PlayerId,
        position: u16,
    },
    CardPlayed {
        player: PlayerId,
        card: String,
        target: Option<PlayerId>,
    },
    Reaction {
        event: ReactionEvent,
        outcome: ReactionOutcome,
    },
    Rolled {
        player: PlayerId,
        die: u8,
        total: i32,
    },
    Moved {
        player: PlayerId,
        from: u16,
        to: u16,
    },
    Swapped {
        a: PlayerId,
        b: PlayerId,
    },
    TurnSkipped {
        player: PlayerId,
        remaining: u8,
    },
    EffectResolved {
        player: PlayerId,
        source: String,
        lines: Vec<String>,
    },
    CardsDrawn {
        player: PlayerId,
        count: usize,
    },
    HandLimit {
        player: PlayerId,
        discarded: usize,
    },
    StatusChanged {
        status: String,
        from: Option<PlayerId>,
        to: Option<PlayerId>,
    },
    ActionRejected {
        player: PlayerId,
        reason: String,
    },
    Victory {
        player: PlayerId,
    },
    Aborted,
    Failed {
        reason: String,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[turn {:>3}] ", self.turn)?;
        match &self.kind {
            GameEventKind::TurnStarted { player, position } => {
                write!(f, "{player} starts on tile {position}")
            }
            GameEventKind::CardPlayed {
                player,
                card,
                target: Some(target),
            } => write!(f, "{player} plays {card} on {target}"),
            GameEventKind::CardPlayed { player, card, .. } => write!(f, "{player} plays {card}"),
            GameEventKind::Reaction { event, outcome } => match outcome {
                ReactionOutcome::Unchallenged => write!(f, "{event}: unchallenged"),
                ReactionOutcome::Reflected { by, .. } => write!(f, "{event}: reflected by {by}"),
                ReactionOutcome::Blocked { by, .. } => write!(f, "{event}: blocked by {by}"),
                ReactionOutcome::MovementCancelled { by, .. } => {
                    write!(f, "{event}: movement cancelled by {by}")
                }
                ReactionOutcome::RollModified { by, modifier, .. } => {
                    write!(f, "{event}: roll modified ({modifier}) by {by}")
                }
            },
            GameEventKind::Rolled { player, die, total } => {
                write!(f, "{player} rolls {die} (moves {total})")
            }
            GameEventKind::Moved { player, from, to } => write!(f, "{player} moves {from} -> {to}"),
            GameEventKind::Swapped { a, b } => write!(f, "{a} and {b} swap places"),
            GameEventKind::TurnSkipped { player, remaining } => {
                write!(f, "{player} skips this turn ({remaining} more)")
            }
            GameEventKind::EffectResolved {
                player,
                source,
                lines,
            } => write!(f, "{player} resolves {source}: {}", lines.join("; ")),
            GameEventKind::CardsDrawn { player, count } => write!(f, "{player} draws {count} card(s)"),
            GameEventKind::HandLimit { player, discarded } => {
                write!(f, "{player} discards {discarded} card(s) down to the hand limit")
            }
            GameEventKind::StatusChanged { status, from, to } => match (from, to) {
                (_, Some(to)) => write!(f, "{to} now holds '{status}'"),
                (Some(from), None) => write!(f, "{from} loses '{status}'"),
                (None, None) => write!(f, "'{status}' is unheld"),
            },
            GameEventKind::ActionRejected { player, reason } => {
                write!(f, "{player} attempted an illegal action: {reason}")
            }
            GameEventKind::Victory { player } => write!(f, "{player} wins"),
            GameEventKind::Aborted => f.write_str("turn limit reached; game aborted"),
            GameEventKind::Failed { reason } => write!(f, "game failed: {reason}"),
        }
    }
}

/// Leader bookkeeping used for lead changes, early-lead and comeback stats.
#[derive(Debug, Clone, Default)]
pub(crate) struct LeadTracker {
    leader: Option<PlayerId>,
    changes: u32,
    history: Vec<Option<PlayerId>>,
    max_deficit: Vec<u32>,
}

impl LeadTracker {
    fn new(players: usize) -> Self {
        Self {
            max_deficit: vec![0; players],
            ..Self::default()
        }
    }

    /// Record the standings after a completed turn. Ties at the front keep
    /// the previous leader.
    pub(crate) fn observe(&mut self, progress: &[u32]) {
        let Some(front) = progress.iter().copied().max() else {
            return;
        };
        let mut at_front = progress
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == front);
        let unique = match (at_front.next(), at_front.next()) {
            (Some((seat, _)), None) => Some(PlayerId::from_index(seat)),
            _ => None,
        };
        if let Some(leader) = unique {
            if self.leader.is_some_and(|previous| previous != leader) {
                self.changes += 1;
            }
            self.leader = Some(leader);
        }
        self.history.push(unique);
        for (deficit, value) in self.max_deficit.iter_mut().zip(progress) {
            *deficit = (*deficit).max(front - value);
        }
    }

    fn early_leader(&self) -> Option<PlayerId> {
        self.history.get(self.history.len() / 3).copied().flatten()
    }
}

/// Summary of a finished (or interrupted) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub seed: u64,
    pub outcome: Option<GameOutcome>,
    pub turns: u32,
    pub winner: Option<PlayerId>,
    pub lead_changes: u32,
    /// Unique leader one third of the way through the game.
    pub early_leader: Option<PlayerId>,
    /// The winner trailed the leader by at least the comeback deficit at some point.
    pub comeback: bool,
    pub illegal_actions: u32,
    pub final_positions: Vec<u16>,
    pub dice_draws: u64,
}

/// A game in progress.
pub struct GameSession<'r> {
    pub(crate) rules: &'r RuleDocument,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: DeckState,
    pub(crate) statuses: StatusTracker,
    pub(crate) rng: RngBundle,
    pub(crate) current: usize,
    pub(crate) phase: TurnPhase,
    pub(crate) turn_number: u32,
    pub(crate) max_turns: u32,
    pub(crate) cards_played: u8,
    /// Whether the current mover's landing tile resolves this turn.
    pub(crate) moved: bool,
    pub(crate) immunity_granted: bool,
    pub(crate) forced_rolls: VecDeque<u8>,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) lead: LeadTracker,
    events: Vec<GameEvent>,
    record_events: bool,
    illegal_actions: u32,
}

impl<'r> GameSession<'r> {
    /// Set up a game: shuffle, deal `initial_hand` cards round-robin, place
    /// every player on the start tile and compute statuses.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PlayerCount`] when `players` is outside the
    /// document's bounds, or a deck error if the opening deal cannot be made.
    pub fn new(rules: &'r RuleDocument, players: usize, seed: u64) -> Result<Self, SessionError> {
        let bounds = rules.player_bounds();
        if !bounds.contains(players) {
            return Err(SessionError::PlayerCount {
                requested: players,
                min: bounds.min,
                max: bounds.max,
            });
        }
        let start = rules.setup().start_tile;
        let mut rng = RngBundle::from_seed(seed);
        let mut deck = DeckState::from_rules(rules, players);
        deck.shuffle(rng.deck());
        for _ in 0..rules.initial_hand_size() {
            for seat in 0..players {
                deck.deal(PlayerId::from_index(seat), 1, rng.deck())?;
            }
        }
        let seats: Vec<Player> = (0..players)
            .map(|seat| Player::new(PlayerId::from_index(seat), start))
            .collect();
        let mut statuses = StatusTracker::new(rules.status_rules(), players);
        let positions: Vec<u16> = seats.iter().map(|player| player.position).collect();
        statuses.recompute(&positions);

        log::debug!(
            "new session of '{}' with {players} players (seed {seed})",
            rules.name()
        );
        Ok(Self {
            rules,
            players: seats,
            deck,
            statuses,
            rng,
            current: 0,
            phase: TurnPhase::Card,
            turn_number: 0,
            max_turns: rules.turn_rules().max_turns,
            cards_played: 0,
            moved: false,
            immunity_granted: false,
            forced_rolls: VecDeque::new(),
            outcome: None,
            lead: LeadTracker::new(players),
            events: Vec::new(),
            record_events: false,
            illegal_actions: 0,
        })
    }

    /// Override the document's max-turn bound.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Keep every [`GameEvent`] in memory for [`Self::events`].
    #[must_use]
    pub fn with_event_log(mut self) -> Self {
        self.record_events = true;
        self
    }

    /// Queue a movement roll to use instead of the dice stream. Rolls are
    /// clamped to the die's faces. Used to script scenarios and replays.
    pub fn force_next_roll(&mut self, roll: u8) {
        self.forced_rolls.push_back(roll);
    }

    /// Put a player on a tile (clamped to the board) and recompute statuses.
    pub fn place(&mut self, player: PlayerId, tile: u16) {
        let tile = tile.min(self.rules.exit_tile());
        self.players[player.index()].position = tile;
        self.refresh_statuses();
    }

    /// Move one copy of `card` from the piles into `player`'s hand.
    /// Returns `false` if every copy is already held.
    pub fn give_card(&mut self, player: PlayerId, card: CardId) -> bool {
        self.deck.take_specific(player, card)
    }

    /// Return every card in `player`'s hand to the discard pile.
    pub fn clear_hand(&mut self, player: PlayerId) {
        for card in self.deck.hand(player).to_vec() {
            // Every card listed in the hand is held.
            let _ = self.deck.discard(player, card);
        }
    }

    #[must_use]
    pub const fn rules(&self) -> &'r RuleDocument {
        self.rules
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[must_use]
    pub const fn deck(&self) -> &DeckState {
        &self.deck
    }

    #[must_use]
    pub const fn statuses(&self) -> &StatusTracker {
        &self.statuses
    }

    #[must_use]
    pub fn status_holder(&self, status: &str) -> Option<PlayerId> {
        self.statuses.holder(status)
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        PlayerId::from_index(self.current)
    }

    /// Completed player turns.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[must_use]
    pub const fn illegal_actions(&self) -> u32 {
        self.illegal_actions
    }

    /// Play complete turns until the game ends.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AgentCount`] if `agents` does not have one
    /// agent per seat.
    pub fn run(&mut self, agents: &mut Seats) -> Result<GameReport, SessionError> {
        self.check_agents(agents)?;
        while !self.is_terminal() {
            self.play_turn(agents)?;
        }
        let report = self.report();
        log::debug!(
            "session finished: {} after {} turns",
            report
                .outcome
                .as_ref()
                .map_or("unfinished", GameOutcome::label),
            report.turns
        );
        Ok(report)
    }

    /// Summary of the session so far.
    #[must_use]
    pub fn report(&self) -> GameReport {
        let winner = self.outcome.as_ref().and_then(GameOutcome::winner);
        let comeback = winner.is_some_and(|seat| {
            self.lead
                .max_deficit
                .get(seat.index())
                .is_some_and(|deficit| *deficit >= COMEBACK_DEFICIT)
        });
        GameReport {
            seed: self.rng.seed(),
            outcome: self.outcome.clone(),
            turns: self.turn_number,
            winner,
            lead_changes: self.lead.changes,
            early_leader: self.lead.early_leader(),
            comeback,
            illegal_actions: self.illegal_actions,
            final_positions: self.players.iter().map(|player| player.position).collect(),
            dice_draws: self.rng.dice_draws(),
        }
    }

    /// What `seat` may see right now.
    #[must_use]
    pub fn observation(&self, seat: PlayerId) -> Observation<'_> {
        let me = self.player(seat);
        let opponents = self
            .players
            .iter()
            .filter(|player| player.id != seat)
            .map(|player| OpponentView {
                id: player.id,
                position: player.position,
                hand_size: self.deck.hand(player.id).len(),
                skipped_turns: player.skipped_turns,
                immunity_turns: player.immunity_turns,
                points: player.points,
                statuses: self.statuses.held_by(player.id),
                revealed_hand: me.hands_revealed.then(|| self.deck.hand(player.id)),
            })
            .collect();
        Observation {
            rules: self.rules,
            seat,
            turn: self.turn_number + 1,
            current_player: self.current_player(),
            position: me.position,
            hand: self.deck.hand(seat),
            statuses: self.statuses.held_by(seat),
            immunity_turns: me.immunity_turns,
            points: me.points,
            opponents,
            discard_top: self.deck.discard_top(),
        }
    }

    /// Own-turn plays `seat` could submit now, one per distinct card and target.
    #[must_use]
    pub fn legal_plays(&self, seat: PlayerId) -> Vec<CardPlay> {
        let limit = self.rules.turn_rules().cards_per_turn;
        if self.phase != TurnPhase::Card
            || seat != self.current_player()
            || self.cards_played >= limit
            || self.is_terminal()
        {
            return Vec::new();
        }
        let mut seen: SmallVec<[CardId; 8]> = SmallVec::new();
        let mut plays = Vec::new();
        for card in self.deck.hand(seat) {
            if seen.contains(card) {
                continue;
            }
            seen.push(*card);
            let def = self.rules.card(*card);
            if def.timing != CardTiming::OwnTurn {
                continue;
            }
            if def.effect.needs_chosen_target() {
                plays.extend(
                    self.players
                        .iter()
                        .filter(|player| player.id != seat)
                        .map(|player| CardPlay {
                            card: *card,
                            target: Some(player.id),
                        }),
                );
            } else {
                plays.push(CardPlay {
                    card: *card,
                    target: None,
                });
            }
        }
        plays
    }

    /// Check an own-turn play without applying it.
    ///
    /// # Errors
    ///
    /// Returns the [`ActionError`] describing why the play is illegal.
    pub fn validate_play(&self, seat: PlayerId, play: &CardPlay) -> Result<(), ActionError> {
        if self.phase != TurnPhase::Card || seat != self.current_player() || self.is_terminal() {
            return Err(ActionError::WrongPhase {
                player: seat,
                phase: self.phase,
            });
        }
        let limit = self.rules.turn_rules().cards_per_turn;
        if self.cards_played >= limit {
            return Err(ActionError::CardLimitReached { limit });
        }
        if !self.deck.holds(seat, play.card) {
            return Err(ActionError::NotInHand {
                player: seat,
                card: play.card,
            });
        }
        let def = self.rules.card(play.card);
        if def.timing != CardTiming::OwnTurn {
            return Err(ActionError::WrongTiming {
                card: def.name.clone(),
                timing: def.timing.label(),
                window: "own turn",
            });
        }
        if def.effect.needs_chosen_target() {
            let valid = play
                .target
                .is_some_and(|target| target != seat && target.index() < self.players.len());
            if !valid {
                return Err(ActionError::InvalidTarget {
                    card: def.name.clone(),
                    target: play.target,
                });
            }
        } else if play.target.is_some() {
            // The card's own selector picks the victim.
            return Err(ActionError::InvalidTarget {
                card: def.name.clone(),
                target: play.target,
            });
        }
        Ok(())
    }

    pub(crate) fn check_agents(&self, agents: &Seats) -> Result<(), SessionError> {
        if agents.len() == self.players.len() {
            Ok(())
        } else {
            Err(SessionError::AgentCount {
                seats: self.players.len(),
                agents: agents.len(),
            })
        }
    }

    pub(crate) fn emit(&mut self, kind: GameEventKind) {
        let event = GameEvent {
            turn: self.turn_number + 1,
            kind,
        };
        log::debug!("{event}");
        if self.record_events {
            self.events.push(event);
        }
    }

    pub(crate) fn reject(&mut self, player: PlayerId, error: &ActionError) {
        log::warn!("rejected action from {player}: {error}");
        self.illegal_actions += 1;
        self.emit(GameEventKind::ActionRejected {
            player,
            reason: error.to_string(),
        });
    }

    pub(crate) fn fail(&mut self, reason: String) {
        log::warn!("session failed on turn {}: {reason}", self.turn_number + 1);
        self.emit(GameEventKind::Failed {
            reason: reason.clone(),
        });
        self.outcome = Some(GameOutcome::Failed {
            turns: self.turn_number,
            reason,
        });
    }

    pub(crate) fn refresh_statuses(&mut self) {
        let positions: SmallVec<[u16; 4]> =
            self.players.iter().map(|player| player.position).collect();
        for change in self.statuses.recompute(&positions) {
            self.emit(GameEventKind::StatusChanged {
                status: change.status,
                from: change.from,
                to: change.to,
            });
        }
    }

    pub(crate) fn move_player(&mut self, player: PlayerId, to: u16, by_effect: bool) {
        let seat = &mut self.players[player.index()];
        let from = seat.position;
        seat.position = to;
        seat.arrived_by_effect = by_effect;
        self.emit(GameEventKind::Moved { player, from, to });
        self.refresh_statuses();
    }

    pub(crate) fn play_card(&mut self, seat: PlayerId, play: CardPlay, agents: &mut Seats) {
        let rules = self.rules;
        let def = rules.card(play.card);
        if self.deck.discard(seat, play.card).is_err() {
            let error = ActionError::NotInHand {
                player: seat,
                card: play.card,
            };
            self.reject(seat, &error);
            return;
        }
        self.cards_played += 1;
        self.emit(GameEventKind::CardPlayed {
            player: seat,
            card: def.name.clone(),
            target: play.target,
        });
        self.resolve_effect(
            seat,
            &def.effect,
            play.target,
            EffectSource::Card(play.card),
            agents,
        );
    }

    /// Resolve one tile or card effect, offering the targeted window first.
    ///
    /// Branches are settled before the window so it only opens for the
    /// sub-effect that fires.
    pub(crate) fn resolve_effect(
        &mut self,
        actor: PlayerId,
        effect: &'r Effect,
        chosen: Option<PlayerId>,
        source: EffectSource,
        agents: &mut Seats,
    ) {
        let mut resolution = Resolution::default();
        let view = BoardView::new(self.rules, &self.players, &self.statuses);
        let effect = EffectResolver::settle(&view, actor, effect, self.rng.dice(), &mut resolution);

        let needs_target = effect.needs_chosen_target();
        let mut chosen = chosen.filter(|_| needs_target);
        if chosen.is_none() && needs_target {
            chosen = self.ask_target(actor, source, agents);
        }
        let mut request = ResolveRequest::new(effect, actor, source).with_target(chosen);

        let view = BoardView::new(self.rules, &self.players, &self.statuses);
        let aimed = EffectResolver::primary_target(&view, &request)
            .filter(|target| view.protection(*target, actor, source).is_none());
        if let Some(target) = aimed {
            let event = ReactionEvent::Targeted {
                caster: actor,
                target,
                effect: effect.label(),
            };
            match self.reaction_window(event, agents) {
                ReactionOutcome::Blocked { .. } => return,
                ReactionOutcome::Reflected { by, .. } => request = request.reflected(by),
                _ => {}
            }
        }

        let view = BoardView::new(self.rules, &self.players, &self.statuses);
        resolution.absorb(EffectResolver::resolve(&view, &request, self.rng.dice()));
        self.apply(actor, self.source_label(source), resolution, agents);
    }

    fn ask_target(
        &mut self,
        actor: PlayerId,
        source: EffectSource,
        agents: &mut Seats,
    ) -> Option<PlayerId> {
        let candidates: SmallVec<[PlayerId; 4]> = self
            .players
            .iter()
            .map(|player| player.id)
            .filter(|id| *id != actor)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = {
            let obs = self.observation(actor);
            agents[actor.index()].choose_target(&obs, &candidates)
        };
        if candidates.contains(&pick) {
            Some(pick)
        } else {
            let error = ActionError::InvalidTarget {
                card: self.source_label(source),
                target: Some(pick),
            };
            self.reject(actor, &error);
            None
        }
    }

    /// Offer a reactive window, discard the card that closed it and log the outcome.
    pub(crate) fn reaction_window(
        &mut self,
        event: ReactionEvent,
        agents: &mut Seats,
    ) -> ReactionOutcome {
        let result = reaction::offer(
            self.rules,
            &self.deck,
            self.players.len(),
            &event,
            |seat, eligible| {
                let obs = self.observation(seat);
                agents[seat.index()].choose_reaction(&obs, &event, eligible)
            },
        );
        for (seat, error) in &result.rejected {
            self.reject(*seat, error);
        }
        let Some((by, card)) = result.play else {
            return ReactionOutcome::Unchallenged;
        };
        if self.deck.discard(by, card).is_err() {
            return ReactionOutcome::Unchallenged;
        }
        let outcome = ReactionOutcome::from_play(self.rules, by, card);
        self.emit(GameEventKind::Reaction { event, outcome });
        outcome
    }

    fn source_label(&self, source: EffectSource) -> String {
        match source {
            EffectSource::Tile(index) => self
                .rules
                .tile(index)
                .map_or_else(|| format!("tile {index}"), |tile| tile.label()),
            EffectSource::Card(card) => self.rules.card(card).name.clone(),
        }
    }

    /// Commit a resolution. Stops early if the deck fails.
    fn apply(&mut self, actor: PlayerId, source: String, resolution: Resolution, agents: &mut Seats) {
        self.emit(GameEventKind::EffectResolved {
            player: actor,
            source,
            lines: resolution.log,
        });
        for change in resolution.changes {
            match change {
                StateChange::Move { player, to, .. } => self.move_player(player, to, true),
                StateChange::Swap { a, b } => {
                    let (pos_a, pos_b) = (self.players[a.index()].position, self.players[b.index()].position);
                    self.players[a.index()].position = pos_b;
                    self.players[b.index()].position = pos_a;
                    self.players[a.index()].arrived_by_effect = true;
                    self.players[b.index()].arrived_by_effect = true;
                    self.emit(GameEventKind::Swapped { a, b });
                    self.refresh_statuses();
                }
                StateChange::Draw { player, count } => {
                    if let Err(error) = self.draw_into(player, usize::from(count), agents) {
                        self.fail(error.to_string());
                        return;
                    }
                }
                StateChange::Skip { player, turns } => {
                    let seat = &mut self.players[player.index()];
                    seat.skipped_turns = seat.skipped_turns.saturating_add(turns);
                }
                StateChange::Points { player, amount } => {
                    let seat = &mut self.players[player.index()];
                    seat.points = seat.points.saturating_add(amount);
                }
                StateChange::Immunity { player, turns } => {
                    let seat = &mut self.players[player.index()];
                    seat.immunity_turns = seat.immunity_turns.max(turns);
                    if player == self.current_player() {
                        self.immunity_granted = true;
                    }
                }
                StateChange::RollModifier { player, modifier } => {
                    self.players[player.index()].roll_modifiers.push(modifier);
                }
                StateChange::RevealHands { player } => {
                    self.players[player.index()].hands_revealed = true;
                }
            }
        }
    }

    fn draw_into(
        &mut self,
        player: PlayerId,
        count: usize,
        agents: &mut Seats,
    ) -> Result<(), crate::error::DeckError> {
        let received = self.deck.deal(player, count, self.rng.deck())?;
        self.emit(GameEventKind::CardsDrawn {
            player,
            count: received,
        });
        self.enforce_hand_limit(player, agents);
        Ok(())
    }

    pub(crate) fn enforce_hand_limit(&mut self, player: PlayerId, agents: &mut Seats) {
        let rules = self.rules;
        let agent = &mut agents[player.index()];
        let mut bogus: SmallVec<[CardId; 2]> = SmallVec::new();
        let outcome = self.deck.enforce_hand_limit(player, |hand| {
            let choice = agent.choose_discard(rules, hand);
            if !hand.contains(&choice) {
                bogus.push(choice);
            }
            choice
        });
        if outcome.discarded.is_empty() {
            return;
        }
        for card in bogus {
            self.reject(player, &ActionError::NotInHand { player, card });
        }
        self.emit(GameEventKind::HandLimit {
            player,
            discarded: outcome.discarded.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_tracker_counts_changes_and_deficits() {
        let mut lead = LeadTracker::new(2);
        lead.observe(&[3, 1]);
        lead.observe(&[3, 3]);
        lead.observe(&[3, 9]);
        lead.observe(&[12, 9]);
        assert_eq!(lead.changes, 2);
        assert_eq!(lead.max_deficit, vec![6, 3]);
        assert_eq!(
            lead.history,
            vec![Some(PlayerId(0)), None, Some(PlayerId(1)), Some(PlayerId(0))]
        );
        // A third of the way in the front was tied.
        assert_eq!(lead.early_leader(), None);
    }

    #[test]
    fn events_render_for_humans() {
        let event = GameEvent {
            turn: 7,
            kind: GameEventKind::CardPlayed {
                player: PlayerId(0),
                card: "Stumble".to_string(),
                target: Some(PlayerId(1)),
            },
        };
        assert_eq!(event.to_string(), "[turn   7] P1 plays Stumble on P2");
        let status = GameEvent {
            turn: 2,
            kind: GameEventKind::StatusChanged {
                status: "key".to_string(),
                from: Some(PlayerId(0)),
                to: Some(PlayerId(1)),
            },
        };
        assert_eq!(status.to_string(), "[turn   2] P2 now holds 'key'");
    }
}
