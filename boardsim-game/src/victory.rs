//! Victory checks and progress measures.
use crate::player::{Player, PlayerId};
use crate::rules::{RuleDocument, VictoryKind};

/// First player, starting at `active` and walking the turn order, who
/// satisfies the victory rule.
#[must_use]
pub fn winner(rules: &RuleDocument, players: &[Player], active: PlayerId) -> Option<PlayerId> {
    let seats = players.len();
    (0..seats)
        .map(|offset| &players[(active.index() + offset) % seats])
        .find(|player| has_won(rules, player))
        .map(|player| player.id)
}

/// Whether `player` satisfies the victory rule on its own.
#[must_use]
pub fn has_won(rules: &RuleDocument, player: &Player) -> bool {
    let victory = rules.victory();
    match victory.kind {
        VictoryKind::ExactLanding | VictoryKind::FirstToReach => {
            player.position == rules.exit_tile()
                && (victory.effects_can_win || !player.arrived_by_effect)
        }
        VictoryKind::PointsThreshold { threshold } => player.points >= threshold,
    }
}

/// Race progress used for lead tracking: points on threshold games, tiles otherwise.
#[must_use]
pub fn progress(rules: &RuleDocument, player: &Player) -> u32 {
    match rules.victory().kind {
        VictoryKind::PointsThreshold { .. } => player.points,
        VictoryKind::ExactLanding | VictoryKind::FirstToReach => u32::from(player.position),
    }
}
