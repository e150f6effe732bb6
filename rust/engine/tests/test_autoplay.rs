use jokerpoker_engine::actions::{ActionKind, ActionPrototype, ValueDomain};
use jokerpoker_engine::config::GameConfig;
use jokerpoker_engine::errors::ProcessingError;
use jokerpoker_engine::game::Game;
use jokerpoker_engine::player::Profile;
use jokerpoker_engine::processor::{AutoProcessor, RunStatus, ScriptedAction, StopCondition};
use jokerpoker_engine::stages::Stage;

fn seeded_game(names: &[&str]) -> Game {
    let mut config = GameConfig::classic();
    config.deck.seed = Some(7);
    let mut game = Game::new(1, config).expect("game");
    for name in names {
        game.join(Profile::new(name, 1000)).expect("join");
    }
    game
}

fn total_chips(game: &Game) -> u32 {
    game.players().iter().map(|p| p.bank() + p.bet_total()).sum::<u32>() + game.bank
}

#[test]
fn stops_after_requested_rounds() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    let mut auto = AutoProcessor::new(&mut game);
    auto.stop(StopCondition::AfterRoundsAmount(3));
    assert_eq!(auto.run().expect("run"), RunStatus::ForcedStop);
    assert_eq!(game.rounds_counter, 4);
    assert_eq!(game.stage(), Stage::Setup);
    assert_eq!(total_chips(&game), 3000);
}

#[test]
fn exceeding_the_ceiling_is_an_error() {
    let mut game = seeded_game(&["alice", "bob"]);
    let mut auto = AutoProcessor::new(&mut game);
    auto.stop(StopCondition::AfterRoundsAmount(3)).rounds_ceiling(1);
    assert_eq!(
        auto.run(),
        Err(ProcessingError::TooManyRounds {
            rounds: 2,
            ceiling: 1
        })
    );
}

#[test]
fn ceiling_counts_from_the_run_start() {
    let mut game = seeded_game(&["alice", "bob"]);
    AutoProcessor::new(&mut game)
        .stop(StopCondition::AfterRoundsAmount(2))
        .run()
        .expect("first run");
    assert_eq!(game.rounds_counter, 3);
    let status = AutoProcessor::new(&mut game)
        .stop(StopCondition::AfterRoundsAmount(3))
        .rounds_ceiling(1)
        .run()
        .expect("second run");
    assert_eq!(status, RunStatus::ForcedStop);
    assert_eq!(game.rounds_counter, 4);
}

#[test]
fn zero_rounds_is_an_invalid_stop() {
    let mut game = seeded_game(&["alice", "bob"]);
    let mut auto = AutoProcessor::new(&mut game);
    auto.stop(StopCondition::AfterRoundsAmount(0));
    assert!(matches!(auto.run(), Err(ProcessingError::InvalidStop(_))));
}

#[test]
fn dealer_button_rotates_each_round() {
    let mut game = seeded_game(&["p0", "p1", "p2", "p3"]);
    AutoProcessor::new(&mut game)
        .stop(StopCondition::AfterRoundsAmount(1))
        .run()
        .expect("run");
    let positions: Vec<usize> = ["p0", "p1", "p2", "p3"]
        .iter()
        .map(|n| game.player_by_name(n).expect("player").position)
        .collect();
    assert_eq!(positions, vec![3, 0, 1, 2]);
}

#[test]
fn auto_play_replies_to_the_blinds() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    AutoProcessor::new(&mut game)
        .stop(StopCondition::BeforeStage(Stage::Flop {
            ordinal: 1,
            amount: 3,
        }))
        .run()
        .expect("run");
    assert_eq!(game.bank, 30);
    let replies: Vec<(Option<String>, Option<u32>)> = game
        .actions_history
        .iter()
        .filter(|e| e.class == "PlaceBetReply" || e.class == "PlaceBlind")
        .map(|e| (e.performer.clone(), e.value))
        .collect();
    assert_eq!(
        replies,
        vec![
            (Some("bob".into()), Some(5)),
            (Some("carol".into()), Some(10)),
            (Some("alice".into()), Some(10)),
            (Some("bob".into()), Some(5)),
        ]
    );
}

#[test]
fn stop_after_stage_leaves_flop_on_table() {
    let mut game = seeded_game(&["alice", "bob"]);
    let status = AutoProcessor::new(&mut game)
        .stop(StopCondition::AfterStage(Stage::Flop {
            ordinal: 1,
            amount: 3,
        }))
        .run()
        .expect("run");
    assert_eq!(status, RunStatus::ForcedStop);
    assert_eq!(game.table.len(), 3);
    assert_eq!(game.stage(), Stage::Biddings { ordinal: 2 });
}

#[test]
fn stop_after_actions_amount() {
    let mut game = seeded_game(&["alice", "bob"]);
    AutoProcessor::new(&mut game)
        .stop(StopCondition::AfterActionsAmount(2))
        .run()
        .expect("run");
    let acted: Vec<&str> = game
        .actions_history
        .iter()
        .filter(|e| e.performer.is_some())
        .map(|e| e.class.as_str())
        .collect();
    assert_eq!(acted, vec!["Start", "PlaceBlind"]);
}

#[test]
fn stop_before_matching_action() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    let carol = game.player_by_name("carol").expect("carol").id;
    let pattern = ActionPrototype::new(&game, carol, ActionKind::PlaceBlind, ValueDomain::None);
    AutoProcessor::new(&mut game)
        .stop(StopCondition::BeforeAction(pattern))
        .run()
        .expect("run");
    assert_eq!(game.stage(), Stage::PlacingBlinds);
    assert_eq!(game.player_by_name("carol").expect("carol").bet_total(), 0);
    assert_eq!(game.player_by_name("bob").expect("bob").bet_total(), 5);
}

fn checks_by(game: &Game, name: &str) -> usize {
    game.actions_history
        .iter()
        .filter(|e| e.performer.as_deref() == Some(name) && e.class == "PlaceBetCheck")
        .count()
}

#[test]
fn stage_scoped_pattern_waits_for_its_street() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    let bob = game.player_by_name("bob").expect("bob").id;
    let check = ActionPrototype::new(&game, bob, ActionKind::PlaceBetCheck, ValueDomain::None);

    let mut unscoped = game.clone();
    let pattern = ActionPrototype::new(&unscoped, bob, ActionKind::PlaceBetCheck, ValueDomain::None);
    AutoProcessor::new(&mut unscoped)
        .stop(StopCondition::BeforeAction(pattern))
        .run()
        .expect("run");
    assert_eq!(unscoped.stage(), Stage::Biddings { ordinal: 2 });
    assert_eq!(checks_by(&unscoped, "bob"), 0);

    let status = AutoProcessor::new(&mut game)
        .stop(StopCondition::BeforeAction(
            check.at_stage(Stage::Biddings { ordinal: 3 }),
        ))
        .run()
        .expect("run");
    assert_eq!(status, RunStatus::ForcedStop);
    assert_eq!(game.stage(), Stage::Biddings { ordinal: 3 });
    assert_eq!(checks_by(&game, "bob"), 1);
}

#[test]
fn scripted_raise_is_played_at_its_stage() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    AutoProcessor::new(&mut game)
        .with_actions(vec![ScriptedAction::bet(
            Stage::Biddings { ordinal: 1 },
            "alice",
            50,
        )])
        .stop(StopCondition::AfterStage(Stage::Biddings { ordinal: 1 }))
        .run()
        .expect("run");
    assert_eq!(game.bank, 150);
}

#[test]
fn scripted_pass_waits_for_its_turn() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    AutoProcessor::new(&mut game)
        .with_actions(vec![ScriptedAction::new(
            Stage::Biddings { ordinal: 1 },
            "bob",
            ActionKind::Pass,
        )])
        .stop(StopCondition::AfterStage(Stage::Biddings { ordinal: 1 }))
        .run()
        .expect("run");
    assert!(!game.player_by_name("bob").expect("bob").is_active);
    assert_eq!(game.bank, 25);
}

#[test]
fn never_legal_script_is_reported() {
    let mut game = seeded_game(&["alice", "bob", "carol"]);
    let result = AutoProcessor::new(&mut game)
        .with_actions(vec![ScriptedAction::new(
            Stage::Biddings { ordinal: 1 },
            "alice",
            ActionKind::PlaceBetCheck,
        )])
        .stop(StopCondition::AfterStage(Stage::Biddings { ordinal: 1 }))
        .run();
    assert_eq!(result, Err(ProcessingError::UnconsumedActions(1)));
}

#[test]
fn short_bankroll_blocks_setup() {
    let mut game = seeded_game(&["alice", "bob"]);
    game.join(Profile::new("carol", 5)).expect("join");
    let status = AutoProcessor::new(&mut game).run().expect("run");
    assert_eq!(status, RunStatus::Waiting);
    assert!(game.begins);
    assert_eq!(game.stage(), Stage::Setup);
    assert!(game.status.contains("big blind"));
}

#[test]
fn all_in_player_ends_betting_early() {
    let mut game = seeded_game(&["alice", "bob"]);
    game.join(Profile::new("carol", 10)).expect("join");
    AutoProcessor::new(&mut game)
        .stop(StopCondition::BeforeStage(Stage::Opposing))
        .run()
        .expect("run");
    assert_eq!(game.table.len(), 3);
    assert_eq!(game.bank, 30);
    assert_eq!(game.player_by_name("carol").expect("carol").bank(), 0);
}
