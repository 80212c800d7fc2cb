// End-to-end runs of the binary against the sample specification.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn sample_spec() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("samples")
        .join("openapi.generated.yaml")
}

fn generator(paths_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("restapi-test-generator").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("RESTAPI_TEST_GENERATOR_AUTHOR")
        .arg("--paths-file")
        .arg(paths_file);
    cmd
}

#[test]
fn test_paths_are_validated_and_saved() {
    let dir = tempdir().unwrap();
    let paths_file = dir.path().join("paths.cb");
    let scripts = dir.path().join("scripts");
    fs::create_dir(&scripts).unwrap();

    generator(&paths_file)
        .arg("paths")
        .arg("--script-dir")
        .arg(&scripts)
        .arg("--read-path")
        .arg(sample_spec().parent().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("scriptDir:"))
        .stdout(predicate::str::contains("openapi.generated.yaml"));

    let saved = fs::read_to_string(&paths_file).unwrap();
    assert!(saved.contains(&format!("scriptDir:{}", scripts.display())));
    assert!(saved.contains("readPath:"));
}

#[test]
fn test_paths_reject_missing_directory() {
    let dir = tempdir().unwrap();
    let paths_file = dir.path().join("paths.cb");

    generator(&paths_file)
        .arg("paths")
        .arg("--conf-dir")
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
    assert!(!paths_file.exists());
}

#[test]
fn test_inspect_prints_linked_endpoints() {
    let dir = tempdir().unwrap();

    let output = generator(&dir.path().join("paths.cb"))
        .arg("--spec")
        .arg(sample_spec())
        .arg("inspect")
        .arg("--tag")
        .arg("Clusters")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let endpoints: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let endpoints = endpoints.as_array().unwrap();
    assert_eq!(endpoints.len(), 5);
    assert_eq!(endpoints[0]["operationId"], "getCluster");
    assert_eq!(endpoints[0]["createStatusCode"], 202);
    assert_eq!(endpoints[0]["verb"], "GET");
}

#[test]
fn test_module_uses_configured_directories() {
    let dir = tempdir().unwrap();
    let paths_file = dir.path().join("paths.cb");
    let modules = dir.path().join("modules");
    fs::create_dir(&modules).unwrap();
    fs::write(
        &paths_file,
        format!("modulePath:{}\nreadPath:{}\n", modules.display(), sample_spec().display()),
    )
    .unwrap();

    generator(&paths_file)
        .arg("module")
        .arg("--tag")
        .arg("Clusters")
        .arg("--nomenclature")
        .arg("Clusters_GET")
        .arg("--author")
        .arg("Jane Doe")
        .arg("--superclass")
        .arg("GetProject")
        .assert()
        .success()
        .stdout(predicate::str::contains("get_clusters.py"));

    let script = fs::read_to_string(modules.join("Clusters").join("get_clusters.py")).unwrap();
    assert!(script.contains("@author: Created using restapi-test-generator module by Jane Doe"));
}

#[test]
fn test_missing_configured_path_is_an_error() {
    let dir = tempdir().unwrap();

    generator(&dir.path().join("paths.cb"))
        .arg("--spec")
        .arg(sample_spec())
        .arg("conf")
        .arg("--tag")
        .arg("Clusters")
        .arg("--nomenclature")
        .arg("Clusters")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No confDir configured"));
}

#[test]
fn test_smoke_upgrade_rejects_unknown_cloud() {
    let dir = tempdir().unwrap();
    let paths_file = dir.path().join("paths.cb");
    fs::write(&paths_file, format!("smokeUpgradeDir:{}\n", dir.path().display())).unwrap();

    generator(&paths_file)
        .arg("smoke-upgrade")
        .arg("--cloud")
        .arg("aws")
        .arg("--image")
        .arg("couchbase-cloud-server-7.2.4-6986-x86_64-v1.0.22")
        .arg("--release-id")
        .arg("1.0.22")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown cloud provider"));
    assert!(!dir.path().join("aws").exists());
}
