//! Seat identity and per-player mutable state.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::effect::RollModifier;

/// Zero-based seat index. Displayed one-based (`P1`, `P2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Seat for a player index. Seats are capped at `u8::MAX`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u8::try_from(index).unwrap_or(u8::MAX))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", u16::from(self.0) + 1)
    }
}

/// Mutable per-seat state. Hands live in [`crate::deck::DeckState`] so card
/// conservation can be checked in one place; statuses live in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub position: u16,
    pub skipped_turns: u8,
    pub immunity_turns: u8,
    pub points: u32,
    /// Own-turn roll modifiers waiting for the next movement roll, in play order.
    pub roll_modifiers: SmallVec<[RollModifier; 2]>,
    /// Granted by `reveal_hands`: this player sees every opponent's hand for
    /// the rest of the session.
    pub hands_revealed: bool,
    /// Set when the last position change was caused by an effect rather than a roll.
    pub arrived_by_effect: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, position: u16) -> Self {
        Self {
            id,
            position,
            skipped_turns: 0,
            immunity_turns: 0,
            points: 0,
            roll_modifiers: SmallVec::new(),
            hands_revealed: false,
            arrived_by_effect: false,
        }
    }

    #[must_use]
    pub const fn is_immune(&self) -> bool {
        self.immunity_turns > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_display_one_based() {
        assert_eq!(PlayerId(0).to_string(), "P1");
        assert_eq!(PlayerId::from_index(3).to_string(), "P4");
        assert_eq!(PlayerId::from_index(3).index(), 3);
    }

    #[test]
    fn fresh_player_has_no_counters() {
        let player = Player::new(PlayerId(1), 1);
        assert_eq!(player.position, 1);
        assert!(!player.is_immune());
        assert!(player.roll_modifiers.is_empty());
    }
}
