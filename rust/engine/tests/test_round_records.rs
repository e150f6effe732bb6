use std::fs;
use std::path::PathBuf;

use jokerpoker_engine::actions::{Action, ActionKind, ValueDomain};
use jokerpoker_engine::config::GameConfig;
use jokerpoker_engine::game::Game;
use jokerpoker_engine::logger::{RoundLogger, RoundRecord};
use jokerpoker_engine::player::Profile;
use jokerpoker_engine::processor::{AutoProcessor, Processor, StopCondition};
use jokerpoker_engine::repository::{GameRepository, InMemoryRepository};
use jokerpoker_engine::snapshot::GameSnapshot;
use jokerpoker_engine::stages::Stage;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn game(names: &[&str]) -> Game {
    let mut config = GameConfig::foolish();
    config.deck.seed = Some(11);
    let mut game = Game::new(9, config).expect("game");
    for name in names {
        game.join(Profile::new(name, 500)).expect("join");
    }
    game
}

#[test]
fn each_round_is_one_jsonl_line() {
    let path = tmp_path("rounds");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    let mut game = game(&["alice", "bob", "carol"]);
    AutoProcessor::new(&mut game)
        .with_logger(&mut logger)
        .stop(StopCondition::AfterRoundsAmount(2))
        .run()
        .expect("run");
    let content = fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(!content.contains('\r'));
    for (i, line) in lines.iter().enumerate() {
        let record: RoundRecord = serde_json::from_str(line).expect("record");
        assert!(record.round_id.ends_with(&format!("-{:06}", i + 1)));
        assert_eq!(record.round, i as u32 + 1);
        assert_eq!(record.seed, Some(11));
        assert_eq!(record.seats.len(), 3);
        assert_eq!(record.table.len(), 5);
        assert!(record.result.as_deref().is_some_and(|r| r.contains("wins")));
        assert!(record.ts.is_some());
        assert!(record.history.iter().any(|e| e.message == "game begins"));
    }
    let _ = fs::remove_file(&path);
}

#[test]
fn run_flushes_pending_state_once() {
    let mut repo = InMemoryRepository::new();
    let mut game = game(&["alice", "bob"]);
    Processor::new(&mut game)
        .with_repository(&mut repo)
        .run()
        .expect("run");
    assert_eq!(repo.saves(), 1);
    assert_eq!(repo.player_writes(), 2);
    assert!(!game.is_pending_save());

    Processor::new(&mut game)
        .with_repository(&mut repo)
        .run()
        .expect("idle run");
    assert_eq!(repo.saves(), 1);

    let alice = game.player_by_name("alice").expect("alice").id;
    let start = Action::new(&game, alice, ActionKind::Start).expect("start");
    let mut processor = Processor::new(&mut game).with_repository(&mut repo);
    processor.add(start).expect("admitted");
    processor.run().expect("run");
    assert_eq!(repo.saves(), 2);

    let loaded = repo.load(9).expect("load");
    assert_eq!(loaded.stage(), Stage::PlacingBlinds);
    assert_eq!(loaded.deck.len(), game.deck.len());
    assert!(game.check_continuity(loaded.game_ref()).is_err());
}

#[test]
fn snapshot_hides_other_hands() {
    let mut game = game(&["alice", "bob", "carol"]);
    AutoProcessor::new(&mut game)
        .stop(StopCondition::AfterStage(Stage::DealCards {
            ordinal: 1,
            amount: 2,
        }))
        .run()
        .expect("run");
    let bob = game.player_by_name("bob").expect("bob").id;
    let snapshot = GameSnapshot::for_viewer(&game, Some(bob));
    assert_eq!(snapshot.stage, "placing_blinds");
    for player in &snapshot.players {
        if player.username == "bob" {
            assert!(!player.hand.contains('*'));
        } else {
            assert_eq!(player.hand, "* *");
        }
    }
    assert_eq!(snapshot.actions.len(), 2);
    assert_eq!(snapshot.actions[0].name, "PlaceBlind");
    assert_eq!(snapshot.actions[0].values, ValueDomain::Discrete(vec![5]));
    assert_eq!(snapshot.actions[1].name, "LeaveGame");
    assert!(snapshot.status.contains("waiting for bob"));

    let spectator = GameSnapshot::for_viewer(&game, None);
    assert!(spectator.actions.is_empty());
    assert!(spectator.players.iter().all(|p| p.hand == "* *"));
}
