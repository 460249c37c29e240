//! Full-pipeline test: classify a small query molecule, build a
//! one-molecule repository through a real (scripted) external tool
//! process, then answer needle queries against the stored aggregate.

#![cfg(unix)]

use molfrag::engine::cache::CacheStore;
use molfrag::engine::config::BuildConfigBuilder;
use molfrag::engine::registry::BuildRegistry;
use molfrag::engine::tool::PartitionProcess;
use molfrag::workflows::{find, generate};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

struct Setup {
    _dir: tempfile::TempDir,
    config: molfrag::engine::config::BuildConfig,
    store: CacheStore,
    tool: PartitionProcess,
}

/// A repository `lipids` with one reference molecule `5276`, served by
/// a tool script that always returns one fragment with pairs
/// (1,1,0.1) and (2,2,0.05).
fn setup() -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let repo_root = dir.path().join("repos");
    let cache_dir = dir.path().join("cache");
    fs::create_dir_all(repo_root.join("lipids")).unwrap();
    fs::write(repo_root.join("lipids").join("5276.lgf"), "@nodes\n@edges\n").unwrap();

    let tool_path = write_tool_script(
        dir.path(),
        r#"echo '{"referenceId":"5276","fragments":[{"pairs":[{"id1":1,"id2":1,"charge":0.1},{"id1":2,"id2":2,"charge":0.05}]}]}'"#,
    );

    let config = BuildConfigBuilder::new()
        .repo_root(repo_root)
        .cache_dir(cache_dir.clone())
        .tool_binary(tool_path.clone())
        .build()
        .unwrap();

    Setup {
        _dir: dir,
        config,
        store: CacheStore::new(cache_dir),
        tool: PartitionProcess::new(tool_path),
    }
}

fn write_tool_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fragments.sh");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

const GENERATE_REQUEST: &str = r#"{
    "molecule": {
        "atoms": [
            {"id": 1, "element": "C"},
            {"id": 2, "element": "H"},
            {"id": 3, "element": "H"}
        ],
        "bonds": [
            {"a1": 1, "a2": 2, "bondType": 1},
            {"a1": 1, "a2": 3, "bondType": 1}
        ]
    },
    "shellSize": 1,
    "moleculeId": 7
}"#;

fn find_request(off: &str, needle: &str) -> String {
    format!(
        r#"{{
            "off": "{off}",
            "needle": {needle},
            "molecule": {{
                "atoms": [
                    {{"id": 1, "element": "C"}},
                    {{"id": 2, "element": "H"}},
                    {{"id": 3, "element": "H"}}
                ],
                "bonds": [
                    {{"a1": 1, "a2": 2, "bondType": 1}},
                    {{"a1": 1, "a2": 3, "bondType": 1}}
                ]
            }}
        }}"#
    )
}

#[test]
fn generate_then_find_round_trip() {
    let setup = setup();
    let registry = BuildRegistry::new();

    let response = generate::handle(
        Some(GENERATE_REQUEST),
        &setup.config,
        &setup.store,
        &registry,
        &setup.tool,
    );
    let text = serde_json::to_string(&response).unwrap();
    let ack: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(ack.get("error").is_none(), "unexpected error: {text}");

    let off = ack["off"].as_str().unwrap();
    assert_eq!(off, "lipids-s1-7.off");
    assert_eq!(ack["missingAtoms"], serde_json::json!([3]));

    // The stored record has one molecule set with one fragment.
    let record = setup.store.load(off).unwrap();
    assert_eq!(record.molecule_sets.len(), 1);
    assert_eq!(record.molecule_sets[0].reference_id, "5276");
    assert_eq!(record.molecule_sets[0].fragments.len(), 1);

    // needle {1}: one match with atoms {1,2} and the (1,2) bond.
    let response = find::handle(Some(&find_request(off, "[1]")), &setup.store);
    let text = serde_json::to_string(&response).unwrap();
    let found: serde_json::Value = serde_json::from_str(&text).unwrap();
    let fragments = found["fragments"].as_array().unwrap();
    assert_eq!(fragments.len(), 1);
    let ids: Vec<u64> = fragments[0]["atoms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
    let bonds = fragments[0]["bonds"].as_array().unwrap();
    assert_eq!(bonds.len(), 1);
    assert_eq!(bonds[0]["a1"], 1);
    assert_eq!(bonds[0]["a2"], 2);
    assert_eq!(bonds[0]["bondType"], 1);

    // needle {1,3}: atom 3 is missing from the fragment, so no match.
    let response = find::handle(Some(&find_request(off, "[1, 3]")), &setup.store);
    let text = serde_json::to_string(&response).unwrap();
    let found: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(found["fragments"].as_array().unwrap().len(), 0);
}

#[test]
fn tool_diagnostics_fail_the_build_and_leave_no_record() {
    let setup = setup();
    let registry = BuildRegistry::new();
    let failing = write_tool_script(setup._dir.path(), "echo 'out of memory' >&2");
    let tool = PartitionProcess::new(failing);

    let response = generate::handle(
        Some(GENERATE_REQUEST),
        &setup.config,
        &setup.store,
        &registry,
        &tool,
    );
    let text = serde_json::to_string(&response).unwrap();
    let ack: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(ack["error"].as_str().unwrap().contains("out of memory"));
    assert!(setup.store.load("lipids-s1-7.off").is_err());
}
