use jokerpoker_cli::logging::CapturedLogs;
use jokerpoker_cli::run;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn run_captured(args: &[&str]) -> (i32, CapturedLogs) {
    let logs = CapturedLogs::new();
    let subscriber = tracing_subscriber::registry().with(logs.layer());
    let code = tracing::subscriber::with_default(subscriber, || {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        run(args, &mut out, &mut err)
    });
    (code, logs)
}

#[test]
fn sim_emits_round_events() {
    let (code, logs) = run_captured(&[
        "jokerpoker", "sim", "--rounds", "2", "--players", "2", "--seed", "4",
    ]);
    assert_eq!(code, 0);
    let entries = logs.entries();

    let start = entries
        .iter()
        .find(|e| e.message == "simulation starts")
        .expect("start event");
    assert_eq!(start.level, Level::INFO);
    assert_eq!(start.field("seed"), Some("4"));

    let begins = entries.iter().filter(|e| e.message == "round begins").count();
    assert_eq!(begins, 2);
    let splits: Vec<_> = entries.iter().filter(|e| e.message == "bank split").collect();
    assert_eq!(splits.len(), 2);
    assert!(splits.iter().all(|e| e.field("combo").is_some()));
    assert!(entries
        .iter()
        .any(|e| e.level == Level::DEBUG && e.message == "action applied"));
}

#[test]
fn failures_are_logged_at_debug() {
    let (code, logs) = run_captured(&["jokerpoker", "eval", "Ace|Q"]);
    assert_eq!(code, 2);
    let entries = logs.entries();
    let failure = entries
        .iter()
        .find(|e| e.message == "command failed")
        .expect("failure event");
    assert!(failure.field("error").is_some_and(|v| v.contains("Unknown suit")));
}
