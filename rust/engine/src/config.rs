use serde::{Deserialize, Serialize};

use crate::combos::ComboKindList;
use crate::cards::{Rank, Suit};
use crate::deck::{DeckConfig, DeckGenerator, DeckInterval};
use crate::errors::ConfigError;
use crate::stages::{Stage, StageName};
use crate::tracking::Bounds;

/// Per-game rules: blinds, deck, stage sequence and combo catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Every bet must be a multiple of this value. Defaults to the small blind.
    #[serde(default)]
    pub bet_multiplicity: Option<u32>,
    #[serde(default)]
    pub deck: DeckConfig,
    /// Cards dealt to each player, one entry per DealCards stage.
    pub deal_cards_amounts: Vec<usize>,
    /// Cards moved to the table, one entry per Flop stage.
    pub flops_amounts: Vec<usize>,
    pub stages: Vec<StageName>,
    #[serde(default)]
    pub combos: ComboKindList,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    pub const PRESETS: [&'static str; 3] = ["classic", "foolish", "bizarre"];

    /// 52 cards, 5/10 blinds, two hole cards, flops of 3, 1 and 1.
    pub fn classic() -> Self {
        use StageName::*;
        Self {
            name: "classic".into(),
            small_blind: 5,
            big_blind: 10,
            bet_multiplicity: Some(5),
            deck: DeckConfig::default(),
            deal_cards_amounts: vec![2],
            flops_amounts: vec![3, 1, 1],
            stages: vec![
                Setup,
                DealCards,
                PlacingBlinds,
                Biddings,
                Flop,
                Biddings,
                Flop,
                Biddings,
                Flop,
                Biddings,
                Opposing,
                TearDown,
            ],
            combos: ComboKindList::classic(),
        }
    }

    /// Classic rules with two jokers added to the deck.
    pub fn foolish() -> Self {
        let mut config = Self::classic();
        config.name = "foolish".into();
        config.deck.generator = DeckGenerator::FullDeckPlusJokers {
            interval: DeckInterval::default(),
            jokers_amount: 2,
            iterations_amount: 1,
        };
        config
    }

    /// Short deck from six to ace with four jokers.
    pub fn bizarre() -> Self {
        let mut config = Self::classic();
        config.name = "bizarre".into();
        config.deck.generator = DeckGenerator::FullDeckPlusJokers {
            interval: DeckInterval {
                min_rank: Rank::Six,
                max_rank: Rank::Ace,
                min_suit: Suit::Clubs,
                max_suit: Suit::Spades,
            },
            jokers_amount: 4,
            iterations_amount: 1,
        };
        config
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "classic" => Ok(Self::classic()),
            "foolish" => Ok(Self::foolish()),
            "bizarre" => Ok(Self::bizarre()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn increment(&self) -> u32 {
        self.bet_multiplicity.unwrap_or(self.small_blind)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            highest: self.deck.possible_highest(),
            lowest: self.deck.possible_lowest(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.increment();
        if step == 0
            || self.small_blind == 0
            || self.small_blind >= self.big_blind
            || self.small_blind % step != 0
            || self.big_blind % step != 0
        {
            return Err(ConfigError::InvalidBlinds {
                small: self.small_blind,
                big: self.big_blind,
                step,
            });
        }
        self.deck.validate()?;
        self.validate_stages()
    }

    fn validate_stages(&self) -> Result<(), ConfigError> {
        let count = |name: StageName| self.stages.iter().filter(|s| **s == name).count();
        if self.stages.first() != Some(&StageName::Setup) || count(StageName::Setup) != 1 {
            return Err(ConfigError::InvalidStages(
                "setup must open the sequence exactly once".into(),
            ));
        }
        if self.stages.last() != Some(&StageName::TearDown) || count(StageName::TearDown) != 1 {
            return Err(ConfigError::InvalidStages(
                "tear down must close the sequence exactly once".into(),
            ));
        }
        if count(StageName::Opposing) != 1 {
            return Err(ConfigError::InvalidStages(
                "opposing must appear exactly once".into(),
            ));
        }
        if count(StageName::PlacingBlinds) > 1 {
            return Err(ConfigError::InvalidStages(
                "blinds may be placed once per round".into(),
            ));
        }
        for (name, amounts) in [
            (StageName::DealCards, &self.deal_cards_amounts),
            (StageName::Flop, &self.flops_amounts),
        ] {
            if count(name) != amounts.len() {
                return Err(ConfigError::AmountsMismatch {
                    stage: name.as_str(),
                    stages: count(name),
                    amounts: amounts.len(),
                });
            }
        }
        Ok(())
    }

    /// Stage values with ordinals and amounts resolved, in configured order.
    pub fn stage_sequence(&self) -> Vec<Stage> {
        let (mut deals, mut flops, mut biddings) = (0, 0, 0);
        self.stages
            .iter()
            .map(|name| match name {
                StageName::Setup => Stage::Setup,
                StageName::DealCards => {
                    deals += 1;
                    Stage::DealCards {
                        ordinal: deals,
                        amount: self.deal_cards_amounts.get(deals - 1).copied().unwrap_or(0),
                    }
                }
                StageName::PlacingBlinds => Stage::PlacingBlinds,
                StageName::Biddings => {
                    biddings += 1;
                    Stage::Biddings { ordinal: biddings }
                }
                StageName::Flop => {
                    flops += 1;
                    Stage::Flop {
                        ordinal: flops,
                        amount: self.flops_amounts.get(flops - 1).copied().unwrap_or(0),
                    }
                }
                StageName::Opposing => Stage::Opposing,
                StageName::TearDown => Stage::TearDown,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for name in GameConfig::PRESETS {
            GameConfig::preset(name).unwrap().validate().unwrap();
        }
        assert!(matches!(
            GameConfig::preset("poker"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn blinds_must_follow_increment() {
        let config = GameConfig {
            small_blind: 5,
            big_blind: 12,
            ..GameConfig::classic()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBlinds { .. })
        ));
    }

    #[test]
    fn flop_amounts_must_match_stages() {
        let config = GameConfig {
            flops_amounts: vec![3, 1],
            ..GameConfig::classic()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::AmountsMismatch {
                stage: "flop",
                stages: 3,
                amounts: 2
            })
        );
    }

    #[test]
    fn stage_sequence_numbers_biddings() {
        let seq = GameConfig::classic().stage_sequence();
        assert_eq!(seq.len(), 12);
        assert_eq!(seq[1], Stage::DealCards { ordinal: 1, amount: 2 });
        assert_eq!(seq[3], Stage::Biddings { ordinal: 1 });
        assert_eq!(seq[4], Stage::Flop { ordinal: 1, amount: 3 });
        assert_eq!(seq[8], Stage::Flop { ordinal: 3, amount: 1 });
        assert_eq!(seq[9], Stage::Biddings { ordinal: 4 });
    }
}
