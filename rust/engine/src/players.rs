//! Read-only circular views over one game's position-sorted players.

use crate::combos::Combo;
use crate::player::{Player, PlayerId};

/// Yields items starting at (or, when not `inclusive`, right after) the first
/// `entry` match, wrapping once to the start and skipping `exclude` matches.
/// The start is never repeated. No match yields nothing.
pub fn circle_after<'a, T>(
    items: &'a [T],
    entry: impl Fn(&T) -> bool,
    exclude: impl Fn(&T) -> bool,
    inclusive: bool,
) -> Vec<&'a T> {
    let Some(start) = items.iter().position(entry) else {
        return Vec::new();
    };
    let n = items.len();
    let offsets = if inclusive { 0..n } else { 1..n + 1 };
    offsets
        .map(|k| &items[(start + k) % n])
        .filter(|item| !exclude(*item))
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerSelector<'a> {
    players: &'a [Player],
}

impl<'a> PlayerSelector<'a> {
    pub fn new(players: &'a [Player]) -> Self {
        Self { players }
    }

    pub fn all(&self) -> &'a [Player] {
        self.players
    }

    pub fn get(&self, id: PlayerId) -> Option<&'a Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn host(&self) -> Option<&'a Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn active(&self) -> impl Iterator<Item = &'a Player> {
        self.players.iter().filter(|p| p.is_active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Active players clockwise from the seat after the dealer; the dealer, if active, comes last.
    pub fn after_dealer(&self) -> Vec<&'a Player> {
        circle_after(self.players, Player::is_dealer, |p| !p.is_active, false)
    }

    pub fn after_dealer_all(&self) -> Vec<&'a Player> {
        circle_after(self.players, Player::is_dealer, |_| false, false)
    }

    pub fn max_bet(&self) -> u32 {
        self.active().map(Player::bet_total).max().unwrap_or(0)
    }

    pub fn min_bet(&self) -> u32 {
        self.active().map(Player::bet_total).min().unwrap_or(0)
    }

    /// Includes players who already passed.
    pub fn sum_all_bets(&self) -> u32 {
        self.players.iter().map(Player::bet_total).sum()
    }

    pub fn min_bank(&self) -> u32 {
        self.active().map(Player::bank).min().unwrap_or(0)
    }

    /// Largest street total every active player can still match: the
    /// smallest bankroll plus what that player already put in.
    pub fn possible_max_bet(&self) -> u32 {
        self.active()
            .map(|p| p.bank().saturating_add(p.bet_total()))
            .min()
            .unwrap_or(0)
    }

    /// Largest value `betmaker` may add right now.
    pub fn possible_max_bet_for(&self, betmaker: &Player) -> u32 {
        self.possible_max_bet()
            .saturating_sub(betmaker.bet_total())
            .min(betmaker.bank())
    }

    pub fn check_bet_equality(&self) -> bool {
        self.max_bet() == self.min_bet()
    }

    pub fn without_bet(&self) -> Vec<&'a Player> {
        self.after_dealer()
            .into_iter()
            .filter(|p| !p.has_bet())
            .collect()
    }

    /// First active player after the dealer with no decision this street,
    /// else the first one below the table-high bet. `None` once settled.
    pub fn next_betmaker(&self) -> Option<&'a Player> {
        let order = self.after_dealer();
        if let Some(p) = order.iter().copied().find(|p| !p.has_bet()) {
            return Some(p);
        }
        let challenging = self.max_bet();
        order.into_iter().find(|p| p.bet_total() < challenging)
    }

    /// Active players tied for the highest combo, in after-dealer order.
    pub fn winners(&self, classify: impl Fn(&Player) -> Combo) -> (Vec<&'a Player>, Option<Combo>) {
        let mut best: Option<Combo> = None;
        let mut winners: Vec<&'a Player> = Vec::new();
        for player in self.after_dealer() {
            let combo = classify(player);
            match best.as_ref().map(|b| combo.cmp(b)) {
                Some(std::cmp::Ordering::Less) => {}
                Some(std::cmp::Ordering::Equal) => winners.push(player),
                _ => {
                    winners = vec![player];
                    best = Some(combo);
                }
            }
        }
        (winners, best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_after_wraps_without_repeating() {
        let items = [0, 1, 2, 3, 4];
        let out: Vec<i32> = circle_after(&items, |x| *x == 2, |_| false, false)
            .into_iter()
            .copied()
            .collect();
        assert_eq!(out, vec![3, 4, 0, 1, 2]);
        let out: Vec<i32> = circle_after(&items, |x| *x == 2, |x| x % 2 == 1, true)
            .into_iter()
            .copied()
            .collect();
        assert_eq!(out, vec![2, 4, 0]);
    }

    #[test]
    fn huge_bankrolls_do_not_overflow_max_bet() {
        use crate::player::Profile;

        let mut rich = Player::new(PlayerId(1), Profile::new("rich", u32::MAX), 0, true);
        rich.place(10).unwrap();
        rich.credit(10);
        let other = Player::new(PlayerId(2), Profile::new("other", u32::MAX), 1, false);
        let players = [rich, other];
        let selector = PlayerSelector::new(&players);
        assert_eq!(selector.possible_max_bet(), u32::MAX);
        assert_eq!(selector.possible_max_bet_for(&players[0]), u32::MAX - 10);
    }

    #[test]
    fn circle_after_without_match_is_empty() {
        let items = [1, 2, 3];
        assert!(circle_after(&items, |x| *x == 9, |_| false, true).is_empty());
    }
}
