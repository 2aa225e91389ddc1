//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn reponse() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("reponse").unwrap()
}

#[test]
fn help_output() {
    reponse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tiered French answer evaluation"));
}

#[test]
fn version_output() {
    reponse()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reponse"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    reponse()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created reponse.toml"))
        .stdout(predicate::str::contains("Created questions.json"));

    assert!(dir.path().join("reponse.toml").exists());
    assert!(dir.path().join("questions.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    reponse()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    reponse()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn evaluate_exact_match_offline() {
    // An exact match resolves in the deterministic tiers, so no judge
    // call happens and the command works without network access.
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("reponse.toml");
    std::fs::write(&config_path, "[judge]\napi_key = \"sk-test\"\n").unwrap();

    let request_path = dir.path().join("request.json");
    std::fs::write(
        &request_path,
        r#"{
            "question": "Translate to French: hello",
            "userAnswer": "bonjour",
            "correctAnswer": "bonjour",
            "questionType": "free_translation",
            "difficulty": "beginner"
        }"#,
    )
    .unwrap();

    reponse()
        .arg("evaluate")
        .arg("--request")
        .arg(&request_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"isCorrect\": true"))
        .stdout(predicate::str::contains("\"score\": 100"));
}

#[test]
fn evaluate_case_difference_scores_98() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("reponse.toml");
    std::fs::write(&config_path, "[judge]\napi_key = \"sk-test\"\n").unwrap();

    let request_path = dir.path().join("request.json");
    std::fs::write(
        &request_path,
        r#"{
            "question": "Translate to French: hello",
            "userAnswer": "Bonjour",
            "correctAnswer": "bonjour",
            "questionType": "free_translation",
            "difficulty": "beginner"
        }"#,
    )
    .unwrap();

    reponse()
        .arg("evaluate")
        .arg("--request")
        .arg(&request_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"score\": 98"));
}

#[test]
fn evaluate_missing_request_file() {
    reponse()
        .arg("evaluate")
        .arg("--request")
        .arg("no_such_request.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_missing_config_file() {
    reponse()
        .arg("evaluate")
        .arg("--request")
        .arg("request.json")
        .arg("--config")
        .arg("/no/such/reponse.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn reclassify_missing_questions_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("reponse.toml");
    std::fs::write(&config_path, "[judge]\napi_key = \"sk-test\"\n").unwrap();

    reponse()
        .arg("reclassify")
        .arg("--questions")
        .arg("no_such_questions.json")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
