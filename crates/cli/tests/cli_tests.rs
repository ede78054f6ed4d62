use assert_cmd::Command;
use predicates::prelude::*;

fn harvester() -> Command {
    let mut cmd = Command::cargo_bin("nexus-harvester").expect("binary");
    cmd.env_remove("GITHUB_TOKEN");
    cmd
}

#[test]
fn harvest_without_token_fails_fast_with_remediation() {
    harvester()
        .arg("harvest")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"))
        .stderr(predicate::str::contains("export GITHUB_TOKEN="));
}

#[test]
fn bare_invocation_defaults_to_harvest() {
    harvester()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn empty_token_counts_as_missing() {
    harvester()
        .arg("harvest")
        .env("GITHUB_TOKEN", "   ")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn sources_lists_the_production_urls_without_a_token() {
    harvester()
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("cabinet-app"))
        .stdout(predicate::str::contains("dispatch-app"))
        .stdout(predicate::str::contains("formalize-app"))
        .stdout(predicate::str::contains("lunchlottery-app"));
}

#[test]
fn sources_json_is_parsable_and_rank_ordered() {
    let output = harvester()
        .args(["sources", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let sources: Vec<serde_json::Value> =
        serde_json::from_slice(&output).expect("JSON source list");
    let ranks: Vec<u64> = sources
        .iter()
        .map(|source| source["rank"].as_u64().expect("rank"))
        .collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);
}

#[test]
fn invalid_config_path_is_reported() {
    harvester()
        .args(["sources", "--config", "/nonexistent/harvest.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn help_names_the_subcommands() {
    harvester()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("harvest"))
        .stdout(predicate::str::contains("sources"));
}
