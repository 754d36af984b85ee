use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_tierlist")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("tierlist-{name}-{stamp}.{extension}"))
}

/// Command with a reference path that does not exist, so no host data leaks in.
fn tierlist() -> Command {
    let mut command = Command::new(bin());
    command.env(
        "TIERLIST_REFERENCE",
        unique_temp_path("no-reference", "yaml"),
    );
    command.env_remove("TIERLIST_DATASET");
    command
}

const VALID_DATASET: &str = r#"[
  {
    "id": "A",
    "baseTier": 8,
    "synergySets": [
      {
        "synergyEnhancement": 3,
        "characters": [
          "B",
          "C"
        ]
      }
    ]
  },
  {
    "id": "B",
    "baseTier": 6
  },
  {
    "id": "C",
    "baseTier": 12
  }
]
"#;

#[test]
fn unknown_command_prints_usage() {
    let output = tierlist()
        .arg("serve")
        .output()
        .expect("tierlist should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: tierlist"));
}

#[test]
fn validate_command_passes_clean_dataset() {
    let path = unique_temp_path("valid", "json");
    fs::write(&path, VALID_DATASET).expect("fixture should be written");

    let output = tierlist()
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_returns_non_zero_on_invalid_data() {
    let path = unique_temp_path("invalid", "json");
    fs::write(
        &path,
        "[\n  {\n    \"id\": \"A\",\n    \"baseTier\": 3,\n    \"synergySets\": [\n      {\n        \"characters\": [\"ZZZ\"]\n      }\n    ]\n  }\n]\n",
    )
    .expect("fixture should be written");

    let output = tierlist()
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("rule 5"));
    assert!(stderr.contains("rule 7"));

    let _ = fs::remove_file(path);
}

#[test]
fn tier_command_emits_breakdown_json() {
    let path = unique_temp_path("tier", "json");
    fs::write(&path, VALID_DATASET).expect("fixture should be written");

    let output = tierlist()
        .args(["tier", "A", path.to_string_lossy().as_ref()])
        .output()
        .expect("tier should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("tier should emit json");
    assert_eq!(payload["finalTier"], 5);
    assert_eq!(payload["breakdown"]["bestSynergy"], 3);
    assert!(payload["partners"].as_array().is_some());
    assert_eq!(payload["requirements"]["zetas"]["kind"], "all");

    let _ = fs::remove_file(path);
}

#[test]
fn tier_command_uses_reference_omicrons() {
    let dataset = unique_temp_path("omicron", "json");
    let reference = unique_temp_path("reference", "yaml");
    fs::write(
        &dataset,
        r#"[{"id":"X","baseTier":6,"synergySets":[{"synergyEnhancementOmicron":4,"characters":["Y"]}]},{"id":"Y","baseTier":10}]"#,
    )
    .expect("fixture should be written");
    fs::write(&reference, "omicron_modes:\n  X: [territory_wars]\n").expect("fixture should be written");

    let output = tierlist()
        .env("TIERLIST_REFERENCE", &reference)
        .args(["tier", "Y", dataset.to_string_lossy().as_ref()])
        .output()
        .expect("tier should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("tier should emit json");
    assert_eq!(payload["breakdown"]["appliedOmicron"], 4);
    assert_eq!(payload["breakdown"]["omicronSource"], "X");
    assert_eq!(payload["finalTier"], 6);

    let _ = fs::remove_file(dataset);
    let _ = fs::remove_file(reference);
}

#[test]
fn tier_command_requires_an_id() {
    let output = tierlist().arg("tier").output().expect("tier should run");
    assert_eq!(output.status.code(), Some(2));

    let path = unique_temp_path("tier-unknown", "json");
    fs::write(&path, VALID_DATASET).expect("fixture should be written");
    let output = tierlist()
        .args(["tier", "NOPE", path.to_string_lossy().as_ref()])
        .output()
        .expect("tier should run");
    assert_eq!(output.status.code(), Some(1));
    let _ = fs::remove_file(path);
}

#[test]
fn report_command_resolves_every_character() {
    let path = unique_temp_path("report", "json");
    fs::write(&path, VALID_DATASET).expect("fixture should be written");

    let output = tierlist()
        .env("TIERLIST_WORKERS", "2")
        .args(["report", path.to_string_lossy().as_ref()])
        .output()
        .expect("report should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report should emit json");
    let characters = payload["characters"].as_array().expect("characters array");
    assert_eq!(characters.len(), 3);
    assert_eq!(characters[0]["characterId"], "A");
    assert_eq!(characters[0]["finalTier"], 5);
    assert!(payload["generatedAt"].is_string());

    let _ = fs::remove_file(path);
}

#[test]
fn sort_command_rewrites_in_canonical_order() {
    let path = unique_temp_path("sort", "json");
    fs::write(
        &path,
        "[{\"id\":\"C\",\"baseTier\":2},{\"id\":\"A\",\"baseTier\":3},{\"id\":\"B\",\"baseTier\":4}]",
    )
    .expect("fixture should be written");

    let output = tierlist()
        .args(["sort", path.to_string_lossy().as_ref()])
        .output()
        .expect("sort should run");
    assert_eq!(output.status.code(), Some(0));

    let rewritten = fs::read_to_string(&path).expect("sorted file should exist");
    let payload: serde_json::Value = serde_json::from_str(&rewritten).unwrap();
    let ids: Vec<_> = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["A", "B", "C"]);
    assert!(rewritten.contains("\n  {\n    \"id\": \"A\""));

    let output = tierlist()
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");
    assert_eq!(output.status.code(), Some(0));

    let _ = fs::remove_file(path);
}
