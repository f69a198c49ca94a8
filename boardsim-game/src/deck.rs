//! Draw pile, discard pile and per-player hands.
//!
//! Every card instance lives in exactly one of the three places at all times
//! (outside the short window between [`DeckState::draw`] and
//! [`DeckState::give_to`]), which [`DeckState::is_conserved`] checks.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::DeckError;
use crate::player::PlayerId;
use crate::rules::RuleDocument;

/// Index of a card definition within its rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u16);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A player's hand, newest card last.
pub type Hand = SmallVec<[CardId; 8]>;

/// Cards removed from a hand while enforcing the limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandLimitOutcome {
    pub discarded: SmallVec<[CardId; 4]>,
    /// Discard choices naming a card not in hand; each fell back to the newest card.
    pub rejected_choices: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    /// Top of the pile is the last element.
    draw_pile: Vec<CardId>,
    /// Most recent discard is the last element.
    discard_pile: Vec<CardId>,
    hands: Vec<Hand>,
    total: usize,
    max_hand: usize,
}

impl DeckState {
    /// Fresh, unshuffled deck with every card in the draw pile.
    #[must_use]
    pub fn new(cards: Vec<CardId>, players: usize, max_hand: u8) -> Self {
        Self {
            total: cards.len(),
            draw_pile: cards,
            discard_pile: Vec::new(),
            hands: vec![Hand::new(); players],
            max_hand: usize::from(max_hand),
        }
    }

    #[must_use]
    pub fn from_rules(rules: &RuleDocument, players: usize) -> Self {
        Self::new(rules.deck_composition(), players, rules.max_hand_size())
    }

    /// Move the discard pile into the draw pile and shuffle everything.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.draw_pile.append(&mut self.discard_pile);
        self.draw_pile.shuffle(rng);
    }

    /// Remove up to `count` cards from the top of the draw pile, reshuffling
    /// the discard pile in when the draw pile runs dry. Fewer cards come back
    /// only when every remaining card sits in a hand.
    ///
    /// The caller must hand the returned cards to a player.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Exhausted`] when `count` exceeds the whole deck.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<SmallVec<[CardId; 4]>, DeckError> {
        if count > self.total {
            return Err(DeckError::Exhausted {
                requested: count,
                total: self.total,
            });
        }
        let mut drawn: SmallVec<[CardId; 4]> = SmallVec::with_capacity(count);
        while drawn.len() < count {
            if let Some(card) = self.draw_pile.pop() {
                drawn.push(card);
                continue;
            }
            if self.discard_pile.is_empty() {
                log::trace!("deck dry: {} of {count} cards drawn", drawn.len());
                break;
            }
            log::trace!("reshuffling {} discards into the draw pile", self.discard_pile.len());
            self.shuffle(rng);
        }
        Ok(drawn)
    }

    /// Add cards to a hand. Returns how many cards the hand is now over its limit.
    pub fn give_to(&mut self, player: PlayerId, cards: impl IntoIterator<Item = CardId>) -> usize {
        let hand = &mut self.hands[player.index()];
        hand.extend(cards);
        hand.len().saturating_sub(self.max_hand)
    }

    /// Draw `count` cards straight into a hand.
    ///
    /// # Errors
    ///
    /// Same as [`Self::draw`].
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, DeckError> {
        let drawn = self.draw(count, rng)?;
        let received = drawn.len();
        self.give_to(player, drawn);
        Ok(received)
    }

    /// Discard until the hand is within its limit. `choose` is asked once per
    /// discard; a choice naming a card not in hand discards the newest card.
    pub fn enforce_hand_limit(
        &mut self,
        player: PlayerId,
        mut choose: impl FnMut(&[CardId]) -> CardId,
    ) -> HandLimitOutcome {
        let mut outcome = HandLimitOutcome::default();
        while self.hands[player.index()].len() > self.max_hand {
            let hand = &mut self.hands[player.index()];
            let choice = choose(hand.as_slice());
            let position = hand.iter().position(|card| *card == choice).unwrap_or_else(|| {
                outcome.rejected_choices += 1;
                hand.len() - 1
            });
            let card = hand.remove(position);
            self.discard_pile.push(card);
            outcome.discarded.push(card);
        }
        outcome
    }

    /// Move a card from a hand to the discard pile.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::NotInHand`] if the player does not hold the card.
    pub fn discard(&mut self, player: PlayerId, card: CardId) -> Result<(), DeckError> {
        let hand = &mut self.hands[player.index()];
        let position = hand
            .iter()
            .position(|held| *held == card)
            .ok_or(DeckError::NotInHand { player, card })?;
        hand.remove(position);
        self.discard_pile.push(card);
        Ok(())
    }

    /// Move one specific card from the draw or discard pile into a hand.
    /// Used to script scenarios; returns `false` if no free copy exists.
    pub fn take_specific(&mut self, player: PlayerId, card: CardId) -> bool {
        let pile = if self.draw_pile.contains(&card) {
            &mut self.draw_pile
        } else {
            &mut self.discard_pile
        };
        let Some(position) = pile.iter().position(|held| *held == card) else {
            return false;
        };
        pile.remove(position);
        self.hands[player.index()].push(card);
        true
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        &self.hands[player.index()]
    }

    #[must_use]
    pub fn holds(&self, player: PlayerId, card: CardId) -> bool {
        self.hand(player).contains(&card)
    }

    #[must_use]
    pub fn draw_len(&self) -> usize {
        self.draw_pile.len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    #[must_use]
    pub fn discard_top(&self) -> Option<CardId> {
        self.discard_pile.last().copied()
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn max_hand(&self) -> usize {
        self.max_hand
    }

    /// `draw + discard + sum(hands) == total`.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        let in_hands: usize = self.hands.iter().map(|hand| hand.len()).sum();
        self.draw_pile.len() + self.discard_pile.len() + in_hands == self.total
    }
}
