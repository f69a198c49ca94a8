//! Positionally-derived statuses ("holds the key").
//!
//! A status is never inventory. Its holder is a pure function of who has ever
//! reached the trigger tile, where everyone stands now, and who held it last;
//! the tracker stores that function's last answer and replaces it in one
//! assignment per status.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::player::PlayerId;

/// Declared positional status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRule {
    pub name: String,
    pub trigger_tile: u16,
}

/// A holder change produced by [`StatusTracker::recompute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: String,
    pub from: Option<PlayerId>,
    pub to: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusEntry {
    rule: StatusRule,
    reached: Vec<bool>,
    holder: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusTracker {
    entries: Vec<StatusEntry>,
}

impl StatusTracker {
    #[must_use]
    pub fn new(rules: &[StatusRule], players: usize) -> Self {
        Self {
            entries: rules
                .iter()
                .map(|rule| StatusEntry {
                    rule: rule.clone(),
                    reached: vec![false; players],
                    holder: None,
                })
                .collect(),
        }
    }

    /// Refresh reach markers and holders from current positions.
    pub fn recompute(&mut self, positions: &[u16]) -> SmallVec<[StatusChange; 2]> {
        let mut changes = SmallVec::new();
        for entry in &mut self.entries {
            for (reached, position) in entry.reached.iter_mut().zip(positions) {
                *reached |= *position >= entry.rule.trigger_tile;
            }
            let next = rightful_holder(&entry.reached, positions, entry.holder);
            if next != entry.holder {
                log::debug!(
                    "status '{}' moves from {:?} to {:?}",
                    entry.rule.name,
                    entry.holder,
                    next
                );
                changes.push(StatusChange {
                    status: entry.rule.name.clone(),
                    from: entry.holder,
                    to: next,
                });
                entry.holder = next;
            }
        }
        changes
    }

    #[must_use]
    pub fn holder(&self, status: &str) -> Option<PlayerId> {
        self.entries
            .iter()
            .find(|entry| entry.rule.name == status)
            .and_then(|entry| entry.holder)
    }

    #[must_use]
    pub fn holds(&self, player: PlayerId, status: &str) -> bool {
        self.holder(status) == Some(player)
    }

    /// Names of every status `player` currently holds.
    #[must_use]
    pub fn held_by(&self, player: PlayerId) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.holder == Some(player))
            .map(|entry| entry.rule.name.as_str())
            .collect()
    }
}

/// Most advanced player among those who ever reached the trigger tile.
///
/// Ties at the front keep `current` if it is among them, otherwise the
/// earliest seat wins.
#[must_use]
pub fn rightful_holder(
    reached: &[bool],
    positions: &[u16],
    current: Option<PlayerId>,
) -> Option<PlayerId> {
    let front = reached
        .iter()
        .zip(positions)
        .filter(|(reached, _)| **reached)
        .map(|(_, position)| *position)
        .max()?;
    let at_front = |seat: usize| reached[seat] && positions[seat] == front;
    if let Some(holder) = current
        && holder.index() < positions.len()
        && at_front(holder.index())
    {
        return Some(holder);
    }
    (0..positions.len())
        .find(|seat| at_front(*seat))
        .map(PlayerId::from_index)
}
