//! Card group trackers used by hand classification.
//!
//! Every tracker works on its own copy of the source cards, so one unbound
//! joker may serve several condition keys at once; trimming to the matched
//! catalogue entry later drops the keys that are not used.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardAttr, CardList, JokerKind, Rank, Suit};

/// Highest and lowest faces the deck can produce. Jokers never bind outside.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub highest: (Rank, Suit),
    pub lowest: (Rank, Suit),
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            highest: (Rank::Ace, Suit::Spades),
            lowest: (Rank::Two, Suit::Clubs),
        }
    }
}

/// Groups of at least two cards sharing `attr`, longest first. Unbound jokers
/// join the longest group, bound to its value.
pub fn track_equal(source: &CardList, attr: CardAttr, bounds: &Bounds) -> Vec<CardList> {
    if source.len() < 2 {
        return Vec::new();
    }
    let mut tracking = source.clone();
    let mut case: Vec<CardList> = Vec::new();
    let mut jokers = CardList::new();
    for (is_jokers, group) in tracking.groupby(attr) {
        if is_jokers {
            jokers = group;
        } else if group.len() >= 2 {
            case.push(group);
        }
    }
    case.sort_by(|a, b| b.len().cmp(&a.len()));

    for joker in jokers.iter() {
        if case.is_empty() {
            let seed = tracking
                .first()
                .filter(|c| !c.is_unmirrored_joker())
                .copied();
            case.push(seed.into_iter().collect());
        }
        let highest = Card::new(bounds.highest.0, bounds.highest.1);
        let value = case[0]
            .first()
            .and_then(|c| c.attr(attr))
            .or_else(|| highest.attr(attr))
            .unwrap_or_default();
        let mirrored = joker.mirrored(bounds.highest, Some((attr, value)));
        case[0].push(mirrored);
    }
    if !jokers.is_empty() {
        case[0].sortby(attr, true);
    }
    case
}

enum Slot {
    Card(Card),
    Joker(Rank),
}

struct RowCandidate {
    slots: Vec<Slot>,
    top: u8,
}

/// The longest run of consecutive ranks, descending. Jokers bridge gaps only
/// when they can fill every missing rank of that gap; leftover jokers extend
/// the run upward to the deck maximum, then downward to the deck minimum.
/// On equal length the higher run wins. Runs shorter than two are dropped.
pub fn track_row(source: &CardList, bounds: &Bounds) -> Option<CardList> {
    let (cards, mut jokers) = source.clone().isolate_jokers(CardAttr::Rank);
    jokers.sort_by_key(|j| match j {
        Card::Joker(joker) if joker.kind == JokerKind::Black => 0,
        _ => 1,
    });

    let mut unique: Vec<(u8, Card)> = Vec::new();
    for card in cards.iter() {
        let Some(rank) = card.attr(CardAttr::Rank) else {
            continue;
        };
        if unique.last().is_none_or(|(r, _)| *r != rank) {
            unique.push((rank, *card));
        }
    }

    let max = bounds.highest.0.value();
    let min = bounds.lowest.0.value();
    let mut best: Option<RowCandidate> = None;

    for start in 0..unique.len() {
        let mut left = jokers.len();
        let mut slots = vec![Slot::Card(unique[start].1)];
        let mut bottom = unique[start].0;
        for &(rank, card) in &unique[start + 1..] {
            let gap = usize::from(bottom - rank - 1);
            if gap > left {
                break;
            }
            for missing in (rank + 1..bottom).rev() {
                slots.push(joker_slot(missing));
            }
            left -= gap;
            slots.push(Slot::Card(card));
            bottom = rank;
        }
        let mut top = unique[start].0;
        let mut upper = Vec::new();
        while left > 0 && top < max {
            top += 1;
            left -= 1;
            upper.push(joker_slot(top));
        }
        upper.reverse();
        upper.extend(slots);
        let mut slots = upper;
        while left > 0 && bottom > min {
            bottom -= 1;
            left -= 1;
            slots.push(joker_slot(bottom));
        }
        keep_best(&mut best, RowCandidate { slots, top });
    }

    if unique.is_empty() && !jokers.is_empty() {
        let length = jokers.len().min(usize::from(max.saturating_sub(min)) + 1);
        let slots = (0..length as u8).map(|i| joker_slot(max - i)).collect();
        best = Some(RowCandidate { slots, top: max });
    }

    let best = best?;
    if best.slots.len() < 2 {
        return None;
    }
    let mut jokers = jokers.iter();
    let mut row = CardList::new();
    for slot in best.slots {
        match slot {
            Slot::Card(card) => row.push(card),
            Slot::Joker(rank) => {
                let joker = jokers.next()?;
                row.push(joker.mirrored((rank, bounds.highest.1), None));
            }
        }
    }
    Some(row)
}

fn joker_slot(rank: u8) -> Slot {
    Slot::Joker(Rank::from_u8(rank).unwrap_or(Rank::Two))
}

fn keep_best(best: &mut Option<RowCandidate>, candidate: RowCandidate) {
    let better = match best {
        None => true,
        Some(current) => {
            (candidate.slots.len(), candidate.top) > (current.slots.len(), current.top)
        }
    };
    if better {
        *best = Some(candidate);
    }
}

/// The single top card, or an unbound joker bound to the deck maximum.
pub fn track_highest(source: &CardList, bounds: &Bounds) -> Option<CardList> {
    let mut sorted = source.clone();
    sorted.sortby(CardAttr::Rank, true);
    let top = *sorted.first()?;
    let card = if top.is_unmirrored_joker() {
        top.mirrored(bounds.highest, None)
    } else {
        top
    };
    Some(CardList::from(vec![card]))
}
