//! Tests for the JSON-lines play history.

use tempfile::TempDir;

use strictly_tictactoe::{
    Difficulty, GameMode, GameRecord, GameSession, NoHumans, Player, RecordedOutcome, Seat,
    StatsRepository,
};

/// Creates a repository in a fresh temporary directory. The directory handle
/// must stay in scope to keep the files alive.
fn setup_repo() -> (TempDir, StatsRepository) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StatsRepository::new(dir.path().join("history").join("stats.jsonl"));
    (dir, repo)
}

fn pvc(outcome: RecordedOutcome) -> GameRecord {
    GameRecord::new(
        GameMode::PlayerVsComputer,
        outcome,
        Some(Difficulty::Hard),
        Some(Player::O),
        9,
    )
}

#[test]
fn test_missing_file_is_empty_history() {
    let (_dir, repo) = setup_repo();
    assert!(repo.load().expect("Load failed").is_empty());
    assert_eq!(*repo.summarize(None).expect("Summary failed").games(), 0);
}

#[test]
fn test_records_round_trip_in_order() {
    let (_dir, repo) = setup_repo();
    let first = pvc(RecordedOutcome::Draw);
    let second = pvc(RecordedOutcome::Winner(Player::O));
    repo.record(&first).expect("Record failed");
    repo.record(&second).expect("Record failed");

    let loaded = repo.load().expect("Load failed");
    assert_eq!(loaded, vec![first, second]);
}

#[test]
fn test_summary_filters_by_mode() {
    let (_dir, repo) = setup_repo();
    repo.record(&pvc(RecordedOutcome::Winner(Player::O)))
        .expect("Record failed");
    repo.record(&pvc(RecordedOutcome::Winner(Player::X)))
        .expect("Record failed");
    repo.record(&GameRecord::new(
        GameMode::PlayerVsPlayer,
        RecordedOutcome::Draw,
        None,
        None,
        9,
    ))
    .expect("Record failed");

    let all = repo.summarize(None).expect("Summary failed");
    assert_eq!(*all.games(), 3);
    assert_eq!(*all.draws(), 1);

    let pvc_only = repo
        .summarize(Some(GameMode::PlayerVsComputer))
        .expect("Summary failed");
    assert_eq!(*pvc_only.games(), 2);
    assert_eq!(*pvc_only.computer_wins(), 1);
    assert_eq!(*pvc_only.computer_losses(), 1);
    assert_eq!(*pvc_only.draws(), 0);
}

#[test]
fn test_summary_by_difficulty() {
    let (_dir, repo) = setup_repo();
    repo.record(&pvc(RecordedOutcome::Draw))
        .expect("Record failed");
    repo.record(&GameRecord::new(
        GameMode::PlayerVsComputer,
        RecordedOutcome::Winner(Player::X),
        Some(Difficulty::Easy),
        Some(Player::O),
        7,
    ))
    .expect("Record failed");

    let tiers = repo.summarize_by_difficulty(None).expect("Summary failed");
    let names: Vec<_> = tiers.iter().map(|(d, _)| *d).collect();
    assert_eq!(names, vec![Difficulty::Easy, Difficulty::Hard]);
    assert_eq!(*tiers[0].1.computer_losses(), 1);
    assert_eq!(*tiers[1].1.draws(), 1);
}

#[test]
fn test_malformed_line_reports_line_number() {
    let (_dir, repo) = setup_repo();
    repo.record(&pvc(RecordedOutcome::Draw))
        .expect("Record failed");
    let mut contents = std::fs::read_to_string(repo.path()).expect("Read failed");
    contents.push_str("{not json}\n");
    std::fs::write(repo.path(), contents).expect("Write failed");

    let err = repo.load().expect_err("Malformed history should fail");
    assert!(err.to_string().contains("line 2"), "{}", err);
}

#[test]
fn test_finished_session_is_recordable() {
    let (_dir, repo) = setup_repo();
    let mut session = GameSession::new(
        Seat::computer(Difficulty::Hard),
        Seat::computer(Difficulty::Hard),
    );
    session.run(&mut NoHumans, &mut ()).expect("Game failed");

    let record = GameRecord::from_session(&session).expect("Record failed");
    assert_eq!(*record.mode(), GameMode::ComputerVsComputer);
    assert_eq!(*record.outcome(), RecordedOutcome::Draw);
    assert_eq!(*record.moves(), 9);
    assert_eq!(*record.computer_mark(), None);
    repo.record(&record).expect("Record failed");

    assert_eq!(repo.load().expect("Load failed").len(), 1);
}

#[test]
fn test_unfinished_session_is_not_recordable() {
    let session = GameSession::new(Seat::human("Ann"), Seat::computer(Difficulty::Easy));
    assert!(GameRecord::from_session(&session).is_err());
}
