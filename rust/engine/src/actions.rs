//! Player actions: legal-move descriptors offered by the current stage and
//! the concrete actions built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ActionError;
use crate::game::{Game, GameRef};
use crate::interval::Interval;
use crate::logger::HistoryEntry;
use crate::player::PlayerId;
use crate::stages::{bet_interval, blind_for, Stage};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Start,
    End,
    Pass,
    PlaceBlind,
    PlaceBet,
    PlaceBetCheck,
    PlaceBetReply,
    PlaceBetVaBank,
    LeaveGame,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Start => "Start",
            ActionKind::End => "End",
            ActionKind::Pass => "Pass",
            ActionKind::PlaceBlind => "PlaceBlind",
            ActionKind::PlaceBet => "PlaceBet",
            ActionKind::PlaceBetCheck => "PlaceBetCheck",
            ActionKind::PlaceBetReply => "PlaceBetReply",
            ActionKind::PlaceBetVaBank => "PlaceBetVaBank",
            ActionKind::LeaveGame => "LeaveGame",
        }
    }

}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values an action prototype admits.
#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ValueDomain {
    #[default]
    None,
    Discrete(Vec<u32>),
    Interval(Interval),
}

impl ValueDomain {
    pub fn contains(&self, value: Option<u32>) -> bool {
        match (self, value) {
            (ValueDomain::None, None) => true,
            (ValueDomain::Discrete(values), Some(v)) => values.contains(&v),
            (ValueDomain::Interval(interval), Some(v)) => interval.contains(v),
            _ => false,
        }
    }

    pub fn min(&self) -> Option<u32> {
        match self {
            ValueDomain::None => None,
            ValueDomain::Discrete(values) => values.iter().min().copied(),
            ValueDomain::Interval(interval) => Some(interval.min),
        }
    }

    /// Used for stop patterns: an empty domain matches anything.
    pub fn overlaps(&self, other: &ValueDomain) -> bool {
        match (self, other) {
            (ValueDomain::None, _) | (_, ValueDomain::None) => true,
            (ValueDomain::Discrete(a), b) => a.iter().any(|v| b.contains(Some(*v))),
            (a, ValueDomain::Discrete(b)) => b.iter().any(|v| a.contains(Some(*v))),
            (ValueDomain::Interval(a), ValueDomain::Interval(b)) => {
                let (lo, hi) = (a.min.max(b.min), a.max.min(b.max));
                if lo > hi {
                    return false;
                }
                // Both intervals hold multiples of their step; the common
                // values are the multiples of the lcm.
                let step = lcm(u64::from(a.step), u64::from(b.step));
                u64::from(lo).div_ceil(step) * step <= u64::from(hi)
            }
        }
    }
}

fn lcm(a: u64, b: u64) -> u64 {
    let (mut x, mut y) = (a, b);
    while y != 0 {
        (x, y) = (y, x % y);
    }
    a / x * b
}

/// A legal move: who may do what in which game, with which values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ActionPrototype {
    pub kind: ActionKind,
    pub game: GameRef,
    pub player: PlayerId,
    pub values: ValueDomain,
    /// Restricts a stop pattern to one stage.
    pub stage: Option<Stage>,
}

impl ActionPrototype {
    pub fn new(game: &Game, player: PlayerId, kind: ActionKind, values: ValueDomain) -> Self {
        Self {
            kind,
            game: game.game_ref(),
            player,
            values,
            stage: None,
        }
    }

    pub fn at_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn matches(&self, action: &Action) -> bool {
        self.kind == action.kind
            && self.game == action.game
            && self.player == action.player
            && self.values.contains(action.value)
    }

    /// Whether `offered` fits this prototype used as a pattern.
    pub fn covers(&self, offered: &ActionPrototype, current: Stage) -> bool {
        self.kind == offered.kind
            && self.game.id == offered.game.id
            && self.player == offered.player
            && self.values.overlaps(&offered.values)
            && self.stage.map_or(true, |s| s == current)
    }

    /// Builds the concrete action; `None` picks the smallest admitted value.
    pub fn to_action(&self, game: &Game, value: Option<u32>) -> Result<Action, ActionError> {
        match value.or_else(|| self.values.min()) {
            Some(v) if self.kind == ActionKind::PlaceBet => Action::bet(game, self.player, v),
            _ => Action::new(game, self.player, self.kind),
        }
    }
}

impl fmt::Display for ActionPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            ValueDomain::None => write!(f, "{} {}", self.player, self.kind),
            ValueDomain::Discrete(v) => write!(f, "{} {} {:?}", self.player, self.kind, v),
            ValueDomain::Interval(i) => {
                write!(f, "{} {} [{}..{} by {}]", self.player, self.kind, i.min, i.max, i.step)
            }
        }
    }
}

/// A concrete action bound to one game object and one player.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub game: GameRef,
    pub player: PlayerId,
    pub value: Option<u32>,
}

impl Action {
    /// Builds an action whose value, if any, follows from the game state.
    pub fn new(game: &Game, player: PlayerId, kind: ActionKind) -> Result<Self, ActionError> {
        if game.player(player).is_none() {
            return Err(ActionError::UnknownPlayer(player.to_string()));
        }
        let unavailable = || ActionError::ValuesUnavailable {
            action: kind.name(),
            stage: game.stage().to_string(),
        };
        let value = match kind {
            ActionKind::Start | ActionKind::End | ActionKind::Pass | ActionKind::LeaveGame => None,
            ActionKind::PlaceBlind => Some(blind_for(game, player).ok_or_else(unavailable)?),
            ActionKind::PlaceBetCheck => Some(0),
            ActionKind::PlaceBetReply => {
                let interval = bet_interval(game, player).ok_or_else(unavailable)?;
                if interval.min == 0 {
                    return Err(ActionError::InvalidValue {
                        action: kind.name(),
                        value: 0,
                        reason: "there is no bet to reply to".into(),
                    });
                }
                Some(interval.min)
            }
            ActionKind::PlaceBetVaBank => {
                let interval = bet_interval(game, player).ok_or_else(unavailable)?;
                if interval.max == 0 {
                    return Err(ActionError::InvalidValue {
                        action: kind.name(),
                        value: 0,
                        reason: "nothing left to put in".into(),
                    });
                }
                Some(interval.max)
            }
            ActionKind::PlaceBet => return Err(unavailable()),
        };
        Ok(Self {
            kind,
            game: game.game_ref(),
            player,
            value,
        })
    }

    /// A raise of an explicit value.
    pub fn bet(game: &Game, player: PlayerId, value: u32) -> Result<Self, ActionError> {
        let Some(performer) = game.player(player) else {
            return Err(ActionError::UnknownPlayer(player.to_string()));
        };
        let kind = ActionKind::PlaceBet;
        let invalid = |reason: &str| ActionError::InvalidValue {
            action: kind.name(),
            value,
            reason: reason.into(),
        };
        let step = game.config().increment();
        if value == 0 {
            return Err(invalid("bet must be positive"));
        }
        if value % step != 0 {
            return Err(invalid(&format!("bet must be a multiple of {step}")));
        }
        if value > performer.bank() {
            return Err(ActionError::InsufficientFunds {
                needed: value,
                available: performer.bank(),
            });
        }
        let interval = bet_interval(game, player).ok_or_else(|| ActionError::ValuesUnavailable {
            action: kind.name(),
            stage: game.stage().to_string(),
        })?;
        if !interval.contains(value) {
            return Err(invalid(&format!(
                "allowed bets are {}..{}",
                interval.min, interval.max
            )));
        }
        Ok(Self {
            kind,
            game: game.game_ref(),
            player,
            value: Some(value),
        })
    }

    /// Applies the action and records it in the game history.
    pub(crate) fn act(&self, game: &mut Game) -> Result<(), ActionError> {
        let message = self.message(game);
        let performer = game
            .player(self.player)
            .map(|p| p.name().to_string());
        match self.kind {
            ActionKind::Start => game.begins = true,
            ActionKind::End => game.begins = false,
            ActionKind::Pass => {
                let player = game.player_mut(self.player)?;
                player.is_active = false;
                player.pending_save = true;
            }
            ActionKind::LeaveGame => {
                game.remove_player(self.player)?;
            }
            _ => {
                let value = self.value.unwrap_or(0);
                game.player_mut(self.player)?.place(value)?;
            }
        }
        tracing::debug!(game_id = game.id, action = %self.kind, value = ?self.value, "action applied");
        game.push_history(HistoryEntry {
            performer,
            class: self.kind.name().to_string(),
            message,
            value: self.value,
        });
        Ok(())
    }

    pub fn message(&self, game: &Game) -> String {
        let player = game
            .player(self.player)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| self.player.to_string());
        match self.kind {
            ActionKind::Start => format!("{player} makes this game begin"),
            ActionKind::End => format!("{player} ends this game round"),
            ActionKind::Pass => format!("{player} says pass"),
            ActionKind::PlaceBlind => {
                let which = if self.value == Some(game.config().small_blind) {
                    "small"
                } else {
                    "big"
                };
                format!("{player} place {which} blind")
            }
            ActionKind::PlaceBet => format!("{player} place bet {}", self.value.unwrap_or(0)),
            ActionKind::PlaceBetCheck => format!("{player} says check"),
            ActionKind::PlaceBetReply => format!("{player} reply to bet"),
            ActionKind::PlaceBetVaBank => format!("{player} placed all in (vabank)"),
            ActionKind::LeaveGame => format!("{player} left the game"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_domain_is_a_wildcard_for_patterns() {
        let interval = ValueDomain::Interval(Interval::new(10, 50, 5).unwrap());
        assert!(ValueDomain::None.overlaps(&interval));
        assert!(ValueDomain::Discrete(vec![25]).overlaps(&interval));
        assert!(!ValueDomain::Discrete(vec![7]).overlaps(&interval));
        let other = ValueDomain::Interval(Interval::new(55, 80, 5).unwrap());
        assert!(!interval.overlaps(&other));
    }

    #[test]
    fn stepped_intervals_overlap_on_common_multiples() {
        let tens = ValueDomain::Interval(Interval::new(10, 1_000_000_000, 10).unwrap());
        let sixes = ValueDomain::Interval(Interval::new(0, 4_000_000_000, 6).unwrap());
        assert!(tens.overlaps(&sixes));
        let narrow = ValueDomain::Interval(Interval::new(31, 59, 6).unwrap());
        let fives = ValueDomain::Interval(Interval::new(0, 100, 5).unwrap());
        assert!(!narrow.overlaps(&fives));
        let wide = ValueDomain::Interval(Interval::new(31, 60, 6).unwrap());
        assert!(wide.overlaps(&fives));
    }

    #[test]
    fn domain_membership_needs_matching_presence() {
        assert!(ValueDomain::None.contains(None));
        assert!(!ValueDomain::None.contains(Some(1)));
        assert!(!ValueDomain::Discrete(vec![5]).contains(None));
        assert_eq!(ValueDomain::Discrete(vec![15, 5]).min(), Some(5));
    }
}
