use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn list_shows_builtin_content() {
    Command::cargo_bin("chargen")
        .unwrap()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("classes: fighter, wizard"));
}

#[test]
fn compile_draft_to_json() {
    Command::cargo_bin("chargen")
        .unwrap()
        .args(["compile", "--draft", &fixture("fighter_draft.yaml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Perception\""))
        .stdout(predicate::str::contains("\"longsword\""))
        .stdout(predicate::str::contains("\"Elvish\""));
}

#[test]
fn missing_definition_fails_with_its_id() {
    Command::cargo_bin("chargen")
        .unwrap()
        .args(["compile", "--draft", &fixture("missing_class.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bard"));
}

#[test]
fn present_class_as_yaml() {
    Command::cargo_bin("chargen")
        .unwrap()
        .args(["present", "--class", "fighter", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fighter_feature_fighter-fighting-style"))
        .stdout(predicate::str::contains("key_prefix:"))
        .stdout(predicate::str::contains("bundle_0:0"));
}

#[test]
fn present_requires_a_target() {
    Command::cargo_bin("chargen")
        .unwrap()
        .arg("present")
        .assert()
        .failure();
}
