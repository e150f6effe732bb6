//! Combo evaluation for a card list given in text form.
//!
//! ```text
//! $ jokerpoker eval "Ace|H Ace|D King|C King|S 7|S"
//! Combo: two pair
//!   rank: Ace|H Ace|D
//!   rank: King|S King|C
//! Kickers: 7|S
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use jokerpoker_engine::cards::CardList;
use jokerpoker_engine::combos::{Combo, ConditionKey};
use std::io::Write;

fn label(key: ConditionKey) -> &'static str {
    match key {
        ConditionKey::Rank => "rank",
        ConditionKey::Suit => "suit",
        ConditionKey::Row => "row",
        ConditionKey::HighestCard => "highest card",
    }
}

pub fn handle_eval_command(
    cards: &str,
    preset: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut cfg = config::load()?;
    if let Some(preset) = preset {
        cfg.preset = preset;
    }
    config::validate(&cfg)?;
    let rules = cfg.game_config()?;

    let cards: CardList = match cards.parse() {
        Ok(cards) => cards,
        Err(e) => {
            ui::write_error(err, &format!("cannot read cards: {}", e))?;
            return Err(e.into());
        }
    };
    if cards.is_empty() {
        ui::write_error(err, "no cards given")?;
        return Err(CliError::InvalidInput("no cards given".into()));
    }

    let combo = Combo::classify(&[&cards], &rules.combos, &rules.bounds());
    tracing::debug!(cards = %cards, combo = %combo.kind.name, "classified");

    writeln!(out, "Combo: {}", combo.kind.name)?;
    for (key, groups) in &combo.stacks.cases {
        for group in groups {
            writeln!(out, "  {}: {}", label(*key), group)?;
        }
    }
    if combo.stacks.leftovers.is_empty() {
        writeln!(out, "Kickers: -")?;
    } else {
        writeln!(out, "Kickers: {}", combo.stacks.leftovers)?;
    }
    Ok(())
}
