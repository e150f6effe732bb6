use jokerpoker_engine::cards::{Card, CardAttr, CardList, JokerKind, Rank, RenderMode, Suit};
use jokerpoker_engine::errors::CardError;

#[test]
fn text_form_is_canonical() {
    let cards: CardList = "A|h 10|Spades  red black(queen|D) 2|1".parse().expect("parse");
    assert_eq!(cards.to_string(), "Ace|H 10|S red black(Queen|D) 2|C");
    let again: CardList = cards.to_string().parse().expect("reparse");
    assert_eq!(again, cards);
}

#[test]
fn separators_inside_tokens_are_rejected() {
    assert!(matches!(
        "Ace|H]".parse::<Card>(),
        Err(CardError::ReservedSymbol(_))
    ));
    assert!(matches!("11|Z".parse::<Card>(), Err(CardError::UnknownSuit(_))));
    assert!(matches!("1|H".parse::<Card>(), Err(CardError::UnknownRank(_))));
    assert!(matches!("red(Ace|H".parse::<Card>(), Err(CardError::Malformed(_))));
}

#[test]
fn order_is_total_on_rank_then_suit() {
    let mut cards: CardList = "2|S Ace|C 2|C King|D Ace|S".parse().expect("parse");
    cards.sort();
    assert_eq!(cards.to_string(), "2|C 2|S King|D Ace|C Ace|S");
}

#[test]
fn mirroring_returns_a_new_card() {
    let joker = Card::joker(JokerKind::Black);
    let bound = joker.mirrored((Rank::Ten, Suit::Hearts), None);
    assert!(joker.is_unmirrored_joker());
    assert!(!bound.is_unmirrored_joker());
    assert!(bound.same_face(&Card::new(Rank::Ten, Suit::Hearts)));
    assert!(bound < Card::new(Rank::Ten, Suit::Hearts));
    assert!(bound > Card::new(Rank::Ten, Suit::Diamonds));
}

#[test]
fn isolating_jokers_keeps_mirrored_ones() {
    let cards: CardList = "red 9|D black(9|H) black 3|C".parse().expect("parse");
    let (rest, jokers) = cards.isolate_jokers(CardAttr::Rank);
    assert_eq!(rest.to_string(), "black(9|H) 9|D 3|C");
    assert_eq!(jokers.len(), 2);
    assert!(jokers.iter().all(Card::is_unmirrored_joker));
}

#[test]
fn hidden_mode_masks_without_mutation() {
    let cards: CardList = "Ace|H King|S".parse().expect("parse");
    assert_eq!(cards.render(RenderMode::Hidden), "* *");
    assert_eq!(cards.render(RenderMode::Open), "Ace|H King|S");
}

#[test]
fn card_lists_serialize_as_text_tokens() {
    let cards: CardList = "Ace|H red".parse().expect("parse");
    let json = serde_json::to_string(&cards).expect("serialize");
    assert_eq!(json, r#"["Ace|H","red"]"#);
}
