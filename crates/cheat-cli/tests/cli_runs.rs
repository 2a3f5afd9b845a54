use assert_cmd::Command;
use predicates::prelude::*;

fn cheat() -> Command {
    Command::cargo_bin("cheat").expect("cheat binary builds")
}

#[test]
fn a_seeded_auto_game_plays_out() {
    cheat()
        .args([
            "--auto",
            "--seed",
            "7",
            "--max-turns",
            "500",
            "--strategy",
            "basic",
            "--strategy",
            "thinker",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seed: 7"))
        .stdout(predicate::str::contains("wins").or(predicate::str::contains("Turn limit")));
}

#[test]
fn the_same_seed_replays_the_same_game() {
    let args = [
        "--auto",
        "--seed",
        "99",
        "--max-turns",
        "300",
        "--strategy",
        "master",
        "--strategy",
        "basic",
        "--strategy",
        "thinker",
    ];
    let first = cheat().args(args).output().expect("first run");
    let second = cheat().args(args).output().expect("second run");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn random_seats_resolve_to_real_strategies() {
    cheat()
        .args(["--auto", "--seed", "4", "--max-turns", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sits down as"));
}

#[test]
fn an_unknown_strategy_token_is_rejected() {
    cheat()
        .args(["--auto", "--strategy", "wizard", "--strategy", "basic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wizard"));
}

#[test]
fn a_human_seat_cannot_join_an_auto_game() {
    cheat()
        .args(["--auto", "--strategy", "human", "--strategy", "basic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("human"));
}

#[test]
fn the_roster_must_fill_the_table() {
    cheat()
        .args(["--auto", "--players", "4", "--strategy", "basic", "--strategy", "basic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("4 players"));
}

#[test]
fn quitting_at_the_first_pacing_prompt_exits_cleanly() {
    cheat()
        .args(["--seed", "3", "--strategy", "basic", "--strategy", "basic"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Game abandoned"));
}
