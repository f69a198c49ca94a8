//! Per-turn phase machine.
//!
//! A turn runs `Card -> Movement -> Action -> Resolved`. Each phase is a small
//! wrapper holding the session and the seated agents so that phase logic stays
//! local to the phase that owns it. [`GameSession::step`] advances exactly one
//! phase; [`GameSession::play_turn`] runs them until the next player is up.
use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::effect::Effect;
use crate::error::SessionError;
use crate::reaction::{ReactionEvent, ReactionOutcome};
use crate::resolver::EffectSource;
use crate::session::{GameEventKind, GameOutcome, GameSession, Seats};
use crate::victory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Card,
    Movement,
    Action,
    Resolved,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Card => "card",
            Self::Movement => "movement",
            Self::Action => "action",
            Self::Resolved => "resolved",
        })
    }
}

impl GameSession<'_> {
    /// Advance one phase and return the phase the session is now in.
    /// A terminal session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AgentCount`] if `agents` does not have one
    /// agent per seat.
    pub fn step(&mut self, agents: &mut Seats) -> Result<TurnPhase, SessionError> {
        self.check_agents(agents)?;
        if self.is_terminal() {
            return Ok(self.phase);
        }
        match self.phase {
            TurnPhase::Card => {
                if self.turn_number >= self.max_turns {
                    self.emit(GameEventKind::Aborted);
                    self.outcome = Some(GameOutcome::Aborted {
                        turns: self.turn_number,
                    });
                    return Ok(self.phase);
                }
                let player = self.current_player();
                let position = self.players[self.current].position;
                self.emit(GameEventKind::TurnStarted { player, position });
                CardPhase::new(self, agents).run();
            }
            TurnPhase::Movement => MovementPhase::new(self, agents).run(),
            TurnPhase::Action => ActionPhase::new(self, agents).run(),
            TurnPhase::Resolved => self.finish_turn(),
        }
        Ok(self.phase)
    }

    /// Run phases until the current turn is over (or the game ends).
    ///
    /// # Errors
    ///
    /// Same as [`Self::step`].
    pub fn play_turn(&mut self, agents: &mut Seats) -> Result<(), SessionError> {
        loop {
            let phase = self.step(agents)?;
            if phase == TurnPhase::Card || self.is_terminal() {
                return Ok(());
            }
        }
    }

    fn finish_turn(&mut self) {
        let active = self.current_player();
        if let Some(player) = victory::winner(self.rules, &self.players, active) {
            self.emit(GameEventKind::Victory { player });
            self.outcome = Some(GameOutcome::Winner {
                player,
                turns: self.turn_number + 1,
            });
        }

        let seat = &mut self.players[self.current];
        if !self.immunity_granted {
            seat.immunity_turns = seat.immunity_turns.saturating_sub(1);
        }
        let rules = self.rules;
        let progress: Vec<u32> = self
            .players
            .iter()
            .map(|player| victory::progress(rules, player))
            .collect();
        self.lead.observe(&progress);

        self.turn_number += 1;
        self.current = (self.current + 1) % self.players.len();
        self.cards_played = 0;
        self.moved = false;
        self.immunity_granted = false;
        self.phase = TurnPhase::Card;
    }
}

struct CardPhase<'a, 'r> {
    session: &'a mut GameSession<'r>,
    agents: &'a mut Seats,
}

impl<'a, 'r> CardPhase<'a, 'r> {
    const fn new(session: &'a mut GameSession<'r>, agents: &'a mut Seats) -> Self {
        Self { session, agents }
    }

    fn run(&mut self) {
        let seat = self.session.current_player();
        let limit = self.session.rules.turn_rules().cards_per_turn;
        while self.session.cards_played < limit && !self.session.is_terminal() {
            let legal = self.session.legal_plays(seat);
            if legal.is_empty() {
                break;
            }
            let choice = {
                let obs = self.session.observation(seat);
                self.agents[seat.index()].choose_play(&obs, &legal)
            };
            let Some(play) = choice else {
                break;
            };
            if let Err(error) = self.session.validate_play(seat, &play) {
                self.session.reject(seat, &error);
                break;
            }
            self.session.play_card(seat, play, self.agents);
        }
        if !self.session.is_terminal() {
            self.session.phase = TurnPhase::Movement;
        }
    }
}

struct MovementPhase<'a, 'r> {
    session: &'a mut GameSession<'r>,
    agents: &'a mut Seats,
}

impl<'a, 'r> MovementPhase<'a, 'r> {
    const fn new(session: &'a mut GameSession<'r>, agents: &'a mut Seats) -> Self {
        Self { session, agents }
    }

    fn run(&mut self) {
        let session = &mut *self.session;
        let mover = session.current_player();
        let seat = &mut session.players[mover.index()];
        if seat.skipped_turns > 0 {
            seat.skipped_turns -= 1;
            let remaining = seat.skipped_turns;
            session.moved = false;
            session.emit(GameEventKind::TurnSkipped {
                player: mover,
                remaining,
            });
            session.phase = TurnPhase::Resolved;
            return;
        }

        let faces = session.rules.die_faces();
        let die = match session.forced_rolls.pop_front() {
            Some(forced) => forced.clamp(1, faces),
            None => session.rng.dice().gen_range(1..=faces),
        };
        log::trace!("{mover} rolls {die}");
        let seat = &mut session.players[mover.index()];
        let mut roll = seat
            .roll_modifiers
            .drain(..)
            .fold(i32::from(die), |roll, modifier| modifier.apply(roll));
        let immune = seat.is_immune();

        if !immune && roll > 0 {
            let event = ReactionEvent::Movement { mover, roll };
            match session.reaction_window(event, self.agents) {
                ReactionOutcome::MovementCancelled { .. } => roll = 0,
                ReactionOutcome::RollModified { modifier, .. } => roll = modifier.apply(roll),
                _ => {}
            }
        }
        session.emit(GameEventKind::Rolled {
            player: mover,
            die,
            total: roll,
        });

        if roll > 0 {
            let rules = session.rules;
            let from = session.players[mover.index()].position;
            let to = rules.landing_position(from, roll);
            session.move_player(mover, to, false);
            session.moved =
                !rules.rebounds(from, roll) || rules.victory().rebound_resolves_tile;
            if !session.moved {
                log::trace!("{mover} rebounds onto {to}; tile not resolved");
            }
        }
        session.phase = TurnPhase::Action;
    }
}

struct ActionPhase<'a, 'r> {
    session: &'a mut GameSession<'r>,
    agents: &'a mut Seats,
}

impl<'a, 'r> ActionPhase<'a, 'r> {
    const fn new(session: &'a mut GameSession<'r>, agents: &'a mut Seats) -> Self {
        Self { session, agents }
    }

    fn run(&mut self) {
        let rules = self.session.rules;
        let actor = self.session.current_player();
        let position = self.session.players[actor.index()].position;
        if self.session.moved
            && let Some(tile) = rules.tile(position)
            && tile.effect != Effect::None
        {
            self.session.resolve_effect(
                actor,
                &tile.effect,
                None,
                EffectSource::Tile(position),
                self.agents,
            );
        }
        if !self.session.is_terminal() {
            self.session.phase = TurnPhase::Resolved;
        }
    }
}
