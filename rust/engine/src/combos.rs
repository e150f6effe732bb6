use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardAttr, CardList};
use crate::errors::ComboError;
use crate::tracking::{track_equal, track_highest, track_row, Bounds};

/// Condition keys in the order they break ties between equal combo kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKey {
    Rank,
    Suit,
    Row,
    HighestCard,
}

/// Group sizes per condition key, each sorted descending.
pub type Conditions = BTreeMap<ConditionKey, Vec<usize>>;

/// Proving card groups per condition key.
pub type Cases = BTreeMap<ConditionKey, Vec<CardList>>;

/// A catalogue entry. Priority is assigned by [`ComboKindList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboKind {
    pub name: String,
    #[serde(default, skip_deserializing)]
    pub priority: f64,
    pub cases: Conditions,
}

impl ComboKind {
    pub fn new(name: &str, cases: impl IntoIterator<Item = (ConditionKey, Vec<usize>)>) -> Self {
        Self {
            name: name.to_string(),
            priority: 0.0,
            cases: cases.into_iter().collect(),
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        for sizes in self.cases.values_mut() {
            sizes.sort_unstable_by(|a, b| b.cmp(a));
        }
        self
    }

    /// True if `major` contains at least every group this kind requires.
    ///
    /// `{suit: [5], row: [5]}` is minor for `{suit: [6], row: [7]}`, while
    /// `{row: [5]}` is not minor for `{row: [4, 3]}`.
    pub fn is_minor_combo_for(&self, major: &Conditions) -> bool {
        self.cases.iter().all(|(key, minor_sizes)| {
            major.get(key).is_some_and(|major_sizes| {
                major_sizes.len() >= minor_sizes.len()
                    && major_sizes
                        .iter()
                        .zip(minor_sizes)
                        .all(|(major, minor)| major >= minor)
            })
        })
    }
}

/// Result of looking up conditions in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogueMatch<'a> {
    /// Conditions equal the entry's cases exactly.
    Matched(&'a ComboKind),
    /// Conditions are richer than the entry; trim them to it.
    NeedsTrim(&'a ComboKind),
    /// Nothing matched; use the highest card and the catalogue floor.
    Fallback(&'a ComboKind),
}

/// Immutable catalogue of combo kinds ordered from commonest to rarest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ComboKind>", into = "Vec<ComboKind>")]
pub struct ComboKindList {
    kinds: Vec<ComboKind>,
}

impl ComboKindList {
    /// Validates the entries and assigns evenly spaced priorities.
    pub fn new(kinds: Vec<ComboKind>) -> Result<Self, ComboError> {
        if kinds.is_empty() {
            return Err(ComboError::EmptyCatalogue);
        }
        let mut names = HashSet::new();
        for kind in &kinds {
            if !names.insert(kind.name.as_str()) {
                return Err(ComboError::DuplicateName(kind.name.clone()));
            }
            if kind.cases.is_empty()
                || kind.cases.values().any(|s| s.is_empty() || s.contains(&0))
            {
                return Err(ComboError::EmptyCase(kind.name.clone()));
            }
        }
        Ok(Self::assign_priorities(kinds))
    }

    fn assign_priorities(kinds: Vec<ComboKind>) -> Self {
        let total = kinds.len() as f64;
        let kinds = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| {
                let mut kind = kind.normalized();
                kind.priority = (i as f64 / total * 100.0).round() / 100.0;
                kind
            })
            .collect();
        Self { kinds }
    }

    pub fn classic() -> Self {
        use ConditionKey::*;
        let kinds = vec![
            ComboKind::new("high card", [(HighestCard, vec![1])]),
            ComboKind::new("one pair", [(Rank, vec![2])]),
            ComboKind::new("two pair", [(Rank, vec![2, 2])]),
            ComboKind::new("three of kind", [(Rank, vec![3])]),
            ComboKind::new("straight", [(Row, vec![5])]),
            ComboKind::new("flush", [(Suit, vec![5])]),
            ComboKind::new("full house", [(Rank, vec![3, 2])]),
            ComboKind::new("four of kind", [(Rank, vec![4])]),
            ComboKind::new("straight flush", [(Row, vec![5]), (Suit, vec![5])]),
            ComboKind::new("pocker", [(Rank, vec![5])]),
        ];
        Self::assign_priorities(kinds)
    }

    pub fn kinds(&self) -> &[ComboKind] {
        &self.kinds
    }

    pub fn get(&self, name: &str) -> Option<&ComboKind> {
        self.kinds.iter().find(|k| k.name == name)
    }

    pub fn floor(&self) -> &ComboKind {
        &self.kinds[0]
    }

    /// Scans from rarest to commonest; the first exact or minor entry wins.
    pub fn lookup(&self, conditions: &Conditions) -> CatalogueMatch<'_> {
        for kind in self.kinds.iter().rev() {
            if &kind.cases == conditions {
                return CatalogueMatch::Matched(kind);
            }
            if kind.is_minor_combo_for(conditions) {
                return CatalogueMatch::NeedsTrim(kind);
            }
        }
        CatalogueMatch::Fallback(self.floor())
    }
}

impl TryFrom<Vec<ComboKind>> for ComboKindList {
    type Error = ComboError;

    fn try_from(value: Vec<ComboKind>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComboKindList> for Vec<ComboKind> {
    fn from(list: ComboKindList) -> Self {
        list.kinds
    }
}

impl Default for ComboKindList {
    fn default() -> Self {
        Self::classic()
    }
}

/// Working classification result for one set of cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComboStacks {
    /// All input cards, sorted by rank descending.
    pub source: CardList,
    pub cases: Cases,
    /// Genuine source cards not used by any case.
    pub leftovers: CardList,
    /// Untrimmed cases, recorded when classification had to trim or fall back.
    pub extra_cases: Cases,
}

impl ComboStacks {
    pub fn conditions(&self) -> Conditions {
        self.cases
            .iter()
            .map(|(key, groups)| (*key, groups.iter().map(|g| g.len()).collect()))
            .collect()
    }

    /// True when no case holds a single card.
    pub fn is_empty(&self) -> bool {
        self.cases.values().all(|groups| groups.iter().all(|g| g.is_empty()))
    }

    pub fn used_cards(&self) -> impl Iterator<Item = &Card> {
        self.cases.values().flatten().flat_map(|g| g.iter())
    }

    fn track(&mut self, bounds: &Bounds) {
        for (key, attr) in [
            (ConditionKey::Suit, CardAttr::Suit),
            (ConditionKey::Rank, CardAttr::Rank),
        ] {
            let case = track_equal(&self.source, attr, bounds);
            if !case.is_empty() {
                self.cases.insert(key, case);
            }
        }
        if let Some(row) = track_row(&self.source, bounds) {
            self.cases.insert(ConditionKey::Row, vec![row]);
        }
    }

    /// Drops keys the reference does not use and truncates the rest to its
    /// group counts and sizes. Source cards are never touched.
    pub fn trim_to(&mut self, reference: &ComboKind) {
        self.cases.retain(|key, _| reference.cases.contains_key(key));
        for (key, sizes) in &reference.cases {
            let Some(groups) = self.cases.get_mut(key) else {
                continue;
            };
            groups.truncate(sizes.len());
            for (group, size) in groups.iter_mut().zip(sizes) {
                group.truncate(*size);
            }
        }
    }

    /// Flattens `stacks`, tracks every condition key and merges the result
    /// into the nearest catalogue entry.
    pub fn track_and_merge(
        stacks: &[&CardList],
        references: &ComboKindList,
        bounds: &Bounds,
    ) -> (ComboKind, ComboStacks) {
        let mut source: CardList = stacks.iter().flat_map(|s| s.iter().copied()).collect();
        source.sortby(CardAttr::Rank, true);
        let mut stacks = ComboStacks {
            source,
            ..ComboStacks::default()
        };
        stacks.track(bounds);

        let kind = match references.lookup(&stacks.conditions()) {
            CatalogueMatch::Matched(kind) => kind,
            CatalogueMatch::NeedsTrim(kind) => {
                stacks.extra_cases = stacks.cases.clone();
                stacks.trim_to(kind);
                kind
            }
            CatalogueMatch::Fallback(kind) => {
                if let Some(highest) = track_highest(&stacks.source, bounds) {
                    stacks.cases.insert(ConditionKey::HighestCard, vec![highest]);
                }
                stacks.extra_cases = stacks.cases.clone();
                stacks.trim_to(kind);
                kind
            }
        };
        stacks.leftovers = stacks.compute_leftovers();
        (kind.clone(), stacks)
    }

    fn compute_leftovers(&self) -> CardList {
        let mut used: Vec<Card> = self.used_cards().copied().collect();
        let mut leftovers = CardList::new();
        for card in self.source.iter().filter(|c| !c.is_joker()) {
            match used.iter().position(|u| u == card) {
                Some(i) => {
                    used.swap_remove(i);
                }
                None => leftovers.push(*card),
            }
        }
        leftovers
    }

    /// Compares proving groups key by key, then leftovers.
    pub fn cmp_strength(&self, other: &ComboStacks) -> Ordering {
        let keys: std::collections::BTreeSet<&ConditionKey> =
            self.cases.keys().chain(other.cases.keys()).collect();
        for key in keys {
            let empty = Vec::new();
            let mine = self.cases.get(key).unwrap_or(&empty);
            let theirs = other.cases.get(key).unwrap_or(&empty);
            for (a, b) in mine.iter().zip(theirs) {
                match a.cmp_faces(b) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            match mine.len().cmp(&theirs.len()) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.leftovers.cmp_faces(&other.leftovers)
    }
}

/// A classified hand: its catalogue kind plus the cards proving it.
#[derive(Debug, Clone, Serialize)]
pub struct Combo {
    pub kind: ComboKind,
    pub stacks: ComboStacks,
}

impl Combo {
    pub fn classify(stacks: &[&CardList], references: &ComboKindList, bounds: &Bounds) -> Self {
        let (kind, stacks) = ComboStacks::track_and_merge(stacks, references, bounds);
        Self { kind, stacks }
    }
}

impl Ord for Combo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .priority
            .total_cmp(&other.kind.priority)
            .then_with(|| self.stacks.cmp_strength(&other.stacks))
    }
}

impl PartialOrd for Combo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Combo {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Combo {}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(s: &str) -> Combo {
        let cards: CardList = s.parse().unwrap();
        Combo::classify(&[&cards], &ComboKindList::classic(), &Bounds::default())
    }

    #[test]
    fn classic_priorities_are_evenly_spaced() {
        let list = ComboKindList::classic();
        let priorities: Vec<f64> = list.kinds().iter().map(|k| k.priority).collect();
        assert_eq!(
            priorities,
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
        );
    }

    #[test]
    fn minor_combo_check() {
        let sf = ComboKind::new("sf", [(ConditionKey::Suit, vec![5]), (ConditionKey::Row, vec![5])]);
        let major = Conditions::from([
            (ConditionKey::Suit, vec![6]),
            (ConditionKey::Row, vec![7]),
        ]);
        assert!(sf.is_minor_combo_for(&major));
        let straight = ComboKind::new("s", [(ConditionKey::Row, vec![5])]);
        let split = Conditions::from([(ConditionKey::Row, vec![4, 3])]);
        assert!(!straight.is_minor_combo_for(&split));
    }

    #[test]
    fn three_pairs_trim_to_two_highest() {
        let combo = classify("Ace|H Ace|D 9|C 9|S 4|H 4|D King|C");
        assert_eq!(combo.kind.name, "two pair");
        let groups = &combo.stacks.cases[&ConditionKey::Rank];
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].to_string(), "Ace|H Ace|D");
        assert_eq!(groups[1].to_string(), "9|S 9|C");
        assert!(combo.stacks.extra_cases[&ConditionKey::Rank].len() == 3);
        assert_eq!(combo.stacks.leftovers.to_string(), "King|C 4|H 4|D");
    }

    #[test]
    fn no_cards_is_empty_high_card() {
        let combo = Combo::classify(&[], &ComboKindList::classic(), &Bounds::default());
        assert_eq!(combo.kind.name, "high card");
        assert!(combo.stacks.is_empty());
    }

    #[test]
    fn lone_card_falls_back_to_highest() {
        let combo = classify("7|D");
        assert_eq!(combo.kind.name, "high card");
        assert_eq!(
            combo.stacks.cases[&ConditionKey::HighestCard][0].to_string(),
            "7|D"
        );
        assert!(combo.stacks.leftovers.is_empty());
    }
}
