use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CardError;

/// Represents one of the four suits. Numeric values follow the classic
/// bridge order and are part of the card total order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs = 1,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn from_u8(v: u8) -> Option<Suit> {
        match v {
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Diamonds),
            3 => Some(Suit::Hearts),
            4 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        }
    }

    /// Parses either the full english name or its first letter.
    pub fn parse(token: &str) -> Option<Suit> {
        if let Ok(v) = token.parse::<u8>() {
            return Suit::from_u8(v);
        }
        let first = token.chars().next()?.to_ascii_uppercase();
        let suit = all_suits().into_iter().find(|s| s.name().starts_with(first))?;
        if token.len() == 1 || token.eq_ignore_ascii_case(suit.name()) {
            Some(suit)
        } else {
            None
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
        }
    }

    /// Accepts the english name, its first letter for face cards, or the numeric value.
    pub fn parse(token: &str) -> Option<Rank> {
        if let Ok(v) = token.parse::<u8>() {
            return Rank::from_u8(v);
        }
        all_ranks().into_iter().find(|r| {
            r.value() > 10
                && (r.name().eq_ignore_ascii_case(token)
                    || (token.len() == 1 && r.name().starts_with(&token.to_ascii_uppercase())))
        })
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// Joker color. Black is worth more than red with other things being equal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JokerKind {
    Red = 0,
    Black = 1,
}

impl JokerKind {
    pub fn name(self) -> &'static str {
        match self {
            JokerKind::Red => "red",
            JokerKind::Black => "black",
        }
    }
}

/// A wildcard card. Unmirrored jokers have no face; a mirrored one is bound
/// to a concrete rank and suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Joker {
    pub kind: JokerKind,
    pub mirror: Option<(Rank, Suit)>,
}

/// Which card attribute a list operation keys on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardAttr {
    Rank,
    Suit,
}

impl CardAttr {
    pub fn other(self) -> CardAttr {
        match self {
            CardAttr::Rank => CardAttr::Suit,
            CardAttr::Suit => CardAttr::Rank,
        }
    }
}

/// Represents a single playing card: either a standard card or a joker.
///
/// Equality is structural, so a mirrored joker is never `==` to the card it
/// reflects. Use [`Card::same_face`] and [`Card::cmp_face`] to compare values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    Standard { rank: Rank, suit: Suit },
    Joker(Joker),
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card::Standard { rank, suit }
    }

    pub fn joker(kind: JokerKind) -> Card {
        Card::Joker(Joker { kind, mirror: None })
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Card::Joker(_))
    }

    /// True only for jokers that are not bound to any face yet.
    pub fn is_unmirrored_joker(&self) -> bool {
        matches!(self, Card::Joker(Joker { mirror: None, .. }))
    }

    pub fn face(&self) -> Option<(Rank, Suit)> {
        match *self {
            Card::Standard { rank, suit } => Some((rank, suit)),
            Card::Joker(j) => j.mirror,
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        self.face().map(|(r, _)| r)
    }

    pub fn suit(&self) -> Option<Suit> {
        self.face().map(|(_, s)| s)
    }

    pub fn attr(&self, attr: CardAttr) -> Option<u8> {
        match attr {
            CardAttr::Rank => self.rank().map(Rank::value),
            CardAttr::Suit => self.suit().map(Suit::value),
        }
    }

    /// Returns a new joker of the same kind bound to `reflection`'s face.
    /// `attr`, when given, overrides one attribute of the reflected face.
    /// Standard cards are returned unchanged.
    pub fn mirrored(&self, reflection: (Rank, Suit), attr: Option<(CardAttr, u8)>) -> Card {
        let Card::Joker(j) = *self else {
            return *self;
        };
        let (mut rank, mut suit) = reflection;
        match attr {
            Some((CardAttr::Rank, v)) => rank = Rank::from_u8(v).unwrap_or(rank),
            Some((CardAttr::Suit, v)) => suit = Suit::from_u8(v).unwrap_or(suit),
            None => {}
        }
        Card::Joker(Joker {
            kind: j.kind,
            mirror: Some((rank, suit)),
        })
    }

    /// Value comparison by (rank, suit). Unbound jokers are lower than any
    /// face; two unbound jokers compare equal.
    pub fn cmp_face(&self, other: &Card) -> Ordering {
        self.face().cmp(&other.face())
    }

    pub fn same_face(&self, other: &Card) -> bool {
        self.cmp_face(other) == Ordering::Equal
    }

    fn tiebreak(&self) -> u8 {
        match self {
            Card::Standard { .. } => 2,
            Card::Joker(j) => j.kind as u8,
        }
    }

    /// Total sort key: attribute, the other attribute, then genuine cards
    /// above black above red. Unbound jokers get the lowest key.
    pub fn sort_key(&self, attr: CardAttr) -> (u8, u8, u8) {
        match (self.attr(attr), self.attr(attr.other())) {
            (Some(a), Some(b)) => (a, b, self.tiebreak()),
            _ => (0, 0, self.tiebreak()),
        }
    }

    /// Renders the card according to `mode` without touching shared state.
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Hidden => HIDDEN_TOKEN.to_string(),
            RenderMode::Open => self.to_string(),
        }
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key(CardAttr::Rank)
            .cmp(&other.sort_key(CardAttr::Rank))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn fmt_face(f: &mut fmt::Formatter<'_>, rank: Rank, suit: Suit) -> fmt::Result {
    let short = &suit.name()[..1];
    write!(f, "{}|{}", rank.name(), short)
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Card::Standard { rank, suit } => fmt_face(f, rank, suit),
            Card::Joker(Joker { kind, mirror }) => {
                write!(f, "{}", kind.name())?;
                if let Some((rank, suit)) = mirror {
                    write!(f, "(")?;
                    fmt_face(f, rank, suit)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

fn parse_face(token: &str, whole: &str) -> Result<(Rank, Suit), CardError> {
    let (rank, suit) = token
        .split_once('|')
        .ok_or_else(|| CardError::Malformed(whole.to_string()))?;
    let rank = Rank::parse(rank).ok_or_else(|| CardError::UnknownRank(rank.to_string()))?;
    let suit = Suit::parse(suit).ok_or_else(|| CardError::UnknownSuit(suit.to_string()))?;
    Ok((rank, suit))
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(CardError::Empty);
        }
        if token.contains([' ', '[', ']']) {
            return Err(CardError::ReservedSymbol(token.to_string()));
        }
        let lower = token.to_ascii_lowercase();
        for kind in [JokerKind::Red, JokerKind::Black] {
            let Some(rest) = lower.strip_prefix(kind.name()) else {
                continue;
            };
            if rest.is_empty() {
                return Ok(Card::joker(kind));
            }
            let inner = token[kind.name().len()..]
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| CardError::Malformed(token.to_string()))?;
            let face = parse_face(inner, token)?;
            return Ok(Card::Joker(Joker {
                kind,
                mirror: Some(face),
            }));
        }
        let (rank, suit) = parse_face(token, token)?;
        Ok(Card::new(rank, suit))
    }
}

impl TryFrom<String> for Card {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Placeholder used for cards the viewer is not allowed to see.
pub const HIDDEN_TOKEN: &str = "*";

/// Explicit rendering context passed per call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Open,
    Hidden,
}

/// Ordered, mutable sequence of cards with a canonical space separated text form.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardList(Vec<Card>);

impl CardList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Total in place sort by `attr`, then the other attribute, then the joker
    /// tiebreak. With `reverse` genuine cards come before mirrored jokers of
    /// the same face and unbound jokers go last.
    pub fn sortby(&mut self, attr: CardAttr, reverse: bool) -> &mut Self {
        if reverse {
            self.0
                .sort_unstable_by(|a, b| b.sort_key(attr).cmp(&a.sort_key(attr)));
        } else {
            self.0.sort_unstable_by_key(|c| c.sort_key(attr));
        }
        self
    }

    /// Sorts descending and detaches all unbound jokers from the tail.
    pub fn isolate_jokers(mut self, attr: CardAttr) -> (CardList, CardList) {
        self.sortby(attr, true);
        let mut jokers = CardList::new();
        while self.0.last().is_some_and(Card::is_unmirrored_joker) {
            if let Some(j) = self.0.pop() {
                jokers.push(j);
            }
        }
        (self, jokers)
    }

    /// Consecutive runs of equal `attr` after a descending sort. The flag is
    /// true for the run of unbound jokers.
    pub fn groupby(&mut self, attr: CardAttr) -> Vec<(bool, CardList)> {
        self.sortby(attr, true);
        let mut groups: Vec<(bool, CardList)> = Vec::new();
        let mut last_key: Option<Option<u8>> = None;
        for card in &self.0 {
            let key = card.attr(attr);
            match groups.last_mut() {
                Some((_, group)) if last_key == Some(key) => group.push(*card),
                _ => groups.push((key.is_none(), CardList(vec![*card]))),
            }
            last_key = Some(key);
        }
        groups
    }

    /// Lexicographic value comparison, card by card via [`Card::cmp_face`].
    pub fn cmp_faces(&self, other: &CardList) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.cmp_face(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }

    pub fn render(&self, mode: RenderMode) -> String {
        self.0
            .iter()
            .map(|c| c.render(mode))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Deref for CardList {
    type Target = Vec<Card>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CardList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Card>> for CardList {
    fn from(v: Vec<Card>) -> Self {
        Self(v)
    }
}

impl FromIterator<Card> for CardList {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CardList {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CardList {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CardList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderMode::Open))
    }
}

impl FromStr for CardList {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace().map(str::parse).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(s: &str) -> CardList {
        s.parse().unwrap()
    }

    #[test]
    fn sortby_puts_genuine_card_before_its_mirror() {
        let mut cards = list("2|C 2|D Ace|H red(Ace|H)");
        cards.sortby(CardAttr::Rank, true);
        assert_eq!(cards.to_string(), "Ace|H red(Ace|H) 2|D 2|C");
    }

    #[test]
    fn unbound_jokers_sort_to_the_tail() {
        let mut cards = list("red 2|C black King|S");
        cards.sortby(CardAttr::Rank, true);
        assert_eq!(cards.to_string(), "King|S 2|C black red");
    }

    #[test]
    fn hidden_render_keeps_length() {
        let cards = list("Ace|H black");
        assert_eq!(cards.render(RenderMode::Hidden), "* *");
    }

    #[test]
    fn groupby_suit_collects_runs() {
        let mut cards = list("Queen|S 10|S Ace|H 3|C red");
        let groups = cards.groupby(CardAttr::Suit);
        let sizes: Vec<(bool, usize)> = groups.iter().map(|(j, g)| (*j, g.len())).collect();
        assert_eq!(sizes, vec![(false, 2), (false, 1), (false, 1), (true, 1)]);
    }
}
