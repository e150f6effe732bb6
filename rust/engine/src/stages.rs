//! Round stages: what each one waits for, who acts in it and what it does
//! once its requirements hold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actions::{ActionKind, ActionPrototype, ValueDomain};
use crate::cards::CardList;
use crate::combos::Combo;
use crate::errors::ProcessingError;
use crate::game::Game;
use crate::interval::Interval;
use crate::player::{Player, PlayerId};

/// Stage names as written in a configuration's stage sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Setup,
    DealCards,
    PlacingBlinds,
    Biddings,
    Flop,
    Opposing,
    TearDown,
}

impl StageName {
    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Setup => "setup",
            StageName::DealCards => "deal_cards",
            StageName::PlacingBlinds => "placing_blinds",
            StageName::Biddings => "biddings",
            StageName::Flop => "flop",
            StageName::Opposing => "opposing",
            StageName::TearDown => "tear_down",
        }
    }
}

/// A resolved stage. Repeated stages carry a one based ordinal and, where
/// relevant, their configured card amount.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Stage {
    Setup,
    DealCards { ordinal: usize, amount: usize },
    PlacingBlinds,
    Biddings { ordinal: usize },
    Flop { ordinal: usize, amount: usize },
    Opposing,
    TearDown,
}

/// A named predicate over game state. A stage runs once all of its
/// requirements hold.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Requirement {
    EnoughPlayers,
    BanksCoverBigBlind,
    GameBegins,
    BlindsPlaced,
    EveryoneActed,
    BetsEqual,
    GameEnded,
}

impl Requirement {
    pub fn is_met(self, game: &Game) -> bool {
        let select = game.select();
        match self {
            Requirement::EnoughPlayers => game.players().len() > 1,
            Requirement::BanksCoverBigBlind => {
                select.active().all(|p| p.bank() >= game.config().big_blind)
            }
            Requirement::GameBegins => game.begins,
            Requirement::BlindsPlaced => blinds_placed(game),
            Requirement::EveryoneActed => select.without_bet().is_empty(),
            Requirement::BetsEqual => select.check_bet_equality(),
            Requirement::GameEnded => !game.begins,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Requirement::EnoughPlayers => "more players",
            Requirement::BanksCoverBigBlind => "every bank to cover the big blind",
            Requirement::GameBegins => "the host to begin the game",
            Requirement::BlindsPlaced => "blinds",
            Requirement::EveryoneActed => "every player to bet",
            Requirement::BetsEqual => "bets to be equal",
            Requirement::GameEnded => "the host to end the round",
        }
    }
}

impl Stage {
    pub fn name(self) -> StageName {
        match self {
            Stage::Setup => StageName::Setup,
            Stage::DealCards { .. } => StageName::DealCards,
            Stage::PlacingBlinds => StageName::PlacingBlinds,
            Stage::Biddings { .. } => StageName::Biddings,
            Stage::Flop { .. } => StageName::Flop,
            Stage::Opposing => StageName::Opposing,
            Stage::TearDown => StageName::TearDown,
        }
    }

    /// Blinds and biddings may end the round early.
    pub fn is_bidding(self) -> bool {
        matches!(self, Stage::PlacingBlinds | Stage::Biddings { .. })
    }

    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            Stage::Setup => &[
                Requirement::EnoughPlayers,
                Requirement::BanksCoverBigBlind,
                Requirement::GameBegins,
            ],
            Stage::PlacingBlinds => &[Requirement::BlindsPlaced],
            Stage::Biddings { .. } => &[Requirement::EveryoneActed, Requirement::BetsEqual],
            Stage::TearDown => &[Requirement::GameEnded],
            Stage::DealCards { .. } | Stage::Flop { .. } | Stage::Opposing => &[],
        }
    }

    pub fn unmet_requirement(self, game: &Game) -> Option<Requirement> {
        self.requirements().iter().copied().find(|r| !r.is_met(game))
    }

    pub fn check_requirements(self, game: &Game) -> bool {
        self.unmet_requirement(game).is_none()
    }

    /// Whose turn it is. `None` once the requirements already hold or when
    /// the stage needs nobody.
    pub fn performer(self, game: &Game) -> Option<&Player> {
        if self.check_requirements(game) {
            return None;
        }
        let select = game.select();
        match self {
            Stage::Setup | Stage::TearDown => select.host(),
            Stage::PlacingBlinds => blind_payer(game).map(|(player, _)| player),
            Stage::Biddings { .. } => select.next_betmaker(),
            Stage::DealCards { .. } | Stage::Flop { .. } | Stage::Opposing => None,
        }
    }

    /// Actions the performer may take now, plus a leave prototype for every
    /// player who is not the host.
    pub fn possible_actions(self, game: &Game) -> Vec<ActionPrototype> {
        let mut prototypes = Vec::new();
        if let Some(performer) = self.performer(game) {
            let id = performer.id;
            let proto = |kind, values| ActionPrototype::new(game, id, kind, values);
            match self {
                Stage::Setup if !game.begins => {
                    prototypes.push(proto(ActionKind::Start, ValueDomain::None))
                }
                Stage::TearDown => prototypes.push(proto(ActionKind::End, ValueDomain::None)),
                Stage::PlacingBlinds => {
                    if let Some((_, blind)) = blind_payer(game) {
                        prototypes.push(proto(ActionKind::PlaceBlind, ValueDomain::Discrete(vec![blind])));
                    }
                }
                Stage::Biddings { .. } => {
                    prototypes.extend(bidding_prototypes(game, performer));
                }
                _ => {}
            }
        }
        prototypes.extend(
            game.players()
                .iter()
                .filter(|p| !p.is_host)
                .map(|p| ActionPrototype::new(game, p.id, ActionKind::LeaveGame, ValueDomain::None)),
        );
        prototypes
    }

    /// True when the rest of the betting can not change the outcome: one
    /// player left, or checking is the only choice.
    pub fn is_premature_final(self, game: &Game) -> bool {
        if !self.is_bidding() {
            return false;
        }
        if game.select().active_count() == 1 {
            return true;
        }
        let kinds: Vec<ActionKind> = self
            .possible_actions(game)
            .iter()
            .map(|p| p.kind)
            .filter(|k| *k != ActionKind::LeaveGame)
            .collect();
        kinds == [ActionKind::PlaceBetCheck]
    }

    /// Runs the stage side effects and returns the history message.
    pub(crate) fn execute(self, game: &mut Game) -> Result<String, ProcessingError> {
        match self {
            Stage::Setup => {
                game.deck = game.config().deck.build(game.rounds_counter);
                game.table.clear();
                game.mark_pending();
                Ok("game begins".into())
            }
            Stage::DealCards { amount, .. } => {
                let needed = amount * game.players().len();
                if game.deck.len() < needed {
                    return Err(ProcessingError::DeckExhausted {
                        needed,
                        available: game.deck.len(),
                    });
                }
                for _ in 0..amount {
                    for index in 0..game.players().len() {
                        if let Some(card) = game.deck.pop() {
                            let player = &mut game.players_mut()[index];
                            player.hand.push(card);
                            player.pending_save = true;
                        }
                    }
                }
                game.mark_pending();
                Ok(format!("deal {amount} cards to players"))
            }
            Stage::PlacingBlinds => Ok("blinds are accepted".into()),
            Stage::Biddings { .. } => {
                sweep_bets(game);
                Ok("bets are accepted".into())
            }
            Stage::Flop { amount, .. } => {
                if game.deck.len() < amount {
                    return Err(ProcessingError::DeckExhausted {
                        needed: amount,
                        available: game.deck.len(),
                    });
                }
                let at = game.deck.len() - amount;
                let flop = game.deck.split_off(at);
                game.table.extend(flop.into_iter().rev());
                game.mark_pending();
                Ok(format!("flop {amount} cards on game table"))
            }
            Stage::Opposing => Ok(oppose(game)),
            Stage::TearDown => {
                game.rounds_counter += 1;
                game.deck.clear();
                game.table.clear();
                game.actions_history.clear();
                for player in game.players_mut() {
                    player.hand.clear();
                    player.bets.clear();
                    player.is_active = true;
                    player.pending_save = true;
                }
                game.rotate_dealer();
                Ok("game round is over".into())
            }
        }
    }

    /// Why the game is idle at this stage.
    pub fn status(self, game: &Game) -> String {
        let Some(requirement) = self.unmet_requirement(game) else {
            return format!("{self} is ready");
        };
        match self.performer(game) {
            Some(player) => format!("{self}: waiting for {player} ({})", requirement.describe()),
            None => format!("{self}: waiting for {}", requirement.describe()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::DealCards { ordinal, .. }
            | Stage::Biddings { ordinal }
            | Stage::Flop { ordinal, .. } => write!(f, "{} {}", self.name().as_str(), ordinal),
            _ => f.write_str(self.name().as_str()),
        }
    }
}

fn blinds_placed(game: &Game) -> bool {
    let order = game.select().after_dealer_all();
    if order.len() < 2 {
        return true;
    }
    let config = game.config();
    order[0].bet_total() == config.small_blind && order[1].bet_total() == config.big_blind
}

/// The first player after the dealer owes the small blind, the second the big one.
fn blind_payer(game: &Game) -> Option<(&Player, u32)> {
    let order = game.select().after_dealer_all();
    if order.len() < 2 {
        return None;
    }
    let config = game.config();
    if order[0].bet_total() != config.small_blind {
        Some((order[0], config.small_blind))
    } else if order[1].bet_total() != config.big_blind {
        Some((order[1], config.big_blind))
    } else {
        None
    }
}

/// Blind owed by `player` right now, if any.
pub(crate) fn blind_for(game: &Game, player: PlayerId) -> Option<u32> {
    if game.stage() != Stage::PlacingBlinds {
        return None;
    }
    blind_payer(game)
        .filter(|(p, _)| p.id == player)
        .map(|(_, blind)| blind)
}

/// Values `player` may add in the current bidding stage: from the amount
/// needed to match the table-high bet up to the most every active player can
/// still match, rounded down to the increment.
pub(crate) fn bet_interval(game: &Game, player: PlayerId) -> Option<Interval> {
    if !matches!(game.stage(), Stage::Biddings { .. }) {
        return None;
    }
    let select = game.select();
    let performer = select.get(player).filter(|p| p.is_active)?;
    let step = game.config().increment();
    let min = select.max_bet().saturating_sub(performer.bet_total());
    let max = select.possible_max_bet_for(performer) / step * step;
    Interval::new(min, max, step)
}

fn bidding_prototypes(game: &Game, performer: &Player) -> Vec<ActionPrototype> {
    let id = performer.id;
    let proto = |kind, values| ActionPrototype::new(game, id, kind, values);
    let Some(interval) = bet_interval(game, id) else {
        return vec![proto(ActionKind::Pass, ValueDomain::None)];
    };
    let mut out = Vec::new();
    if interval.min == 0 {
        out.push(proto(ActionKind::PlaceBetCheck, ValueDomain::Discrete(vec![0])));
    } else {
        out.push(proto(ActionKind::PlaceBetReply, ValueDomain::Discrete(vec![interval.min])));
    }
    if !interval.is_single() {
        if let Some(raise) = interval.lifted(interval.step) {
            out.push(proto(ActionKind::PlaceBet, ValueDomain::Interval(raise)));
        }
        if interval.min > 0 {
            out.push(proto(ActionKind::PlaceBetVaBank, ValueDomain::Discrete(vec![interval.max])));
        }
    }
    if interval.min > 0 {
        out.push(proto(ActionKind::Pass, ValueDomain::None));
    }
    out
}

fn sweep_bets(game: &mut Game) {
    let swept = game.select().sum_all_bets();
    game.bank += swept;
    for player in game.players_mut() {
        if !player.bets.is_empty() {
            player.bets.clear();
            player.pending_save = true;
        }
    }
    game.mark_pending();
}

/// Splits the bank between the strongest active hands. Chips that do not
/// divide evenly go one each to winners in after-dealer order.
fn oppose(game: &mut Game) -> String {
    sweep_bets(game);
    let config = game.config().clone();
    let bounds = config.bounds();
    let table: CardList = game.table.clone();
    let (winners, combo) = game
        .select()
        .winners(|p| Combo::classify(&[&p.hand, &table], &config.combos, &bounds));
    let ids: Vec<PlayerId> = winners.iter().map(|p| p.id).collect();
    let names: Vec<String> = winners.iter().map(|p| p.name().to_string()).collect();
    let Some(combo) = combo else {
        return "nobody wins".into();
    };
    let count = ids.len() as u32;
    let share = game.bank / count;
    let remainder = game.bank % count;
    for (index, id) in ids.iter().enumerate() {
        let extra = u32::from((index as u32) < remainder);
        if let Some(player) = game.players_mut().iter_mut().find(|p| p.id == *id) {
            player.credit(share + extra);
        }
    }
    tracing::info!(game_id = game.id, winners = ?names, combo = %combo.kind.name, share, "bank split");
    game.bank = 0;
    game.mark_pending();
    format!("{} has {} and wins {}", names.join(", "), combo.kind.name, share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::player::Profile;

    #[test]
    fn stage_names_are_snake_case() {
        let json = serde_json::to_string(&StageName::PlacingBlinds).unwrap();
        assert_eq!(json, "\"placing_blinds\"");
        assert_eq!(StageName::TearDown.as_str(), "tear_down");
    }

    #[test]
    fn setup_waits_for_players_then_host() {
        let mut game = Game::new(1, GameConfig::classic()).unwrap();
        game.join(Profile::new("host", 100)).unwrap();
        assert_eq!(
            Stage::Setup.unmet_requirement(&game),
            Some(Requirement::EnoughPlayers)
        );
        game.join(Profile::new("guest", 100)).unwrap();
        assert_eq!(
            Stage::Setup.unmet_requirement(&game),
            Some(Requirement::GameBegins)
        );
        let actions = Stage::Setup.possible_actions(&game);
        let kinds: Vec<ActionKind> = actions.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ActionKind::Start, ActionKind::LeaveGame]);
        assert_eq!(Stage::Setup.performer(&game).map(|p| p.name()), Some("host"));
    }

    #[test]
    fn display_includes_ordinal() {
        assert_eq!(Stage::Biddings { ordinal: 2 }.to_string(), "biddings 2");
        assert_eq!(Stage::Opposing.to_string(), "opposing");
    }
}
