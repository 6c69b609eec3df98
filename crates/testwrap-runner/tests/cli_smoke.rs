#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn testwrap() -> Command {
    let mut cmd = Command::cargo_bin("testwrap").expect("bin");
    cmd.env_clear().env("RUST_LOG", "warn");
    cmd
}

#[test]
fn dry_run_prints_exact_plan() {
    let dir = tempdir().unwrap();
    testwrap()
        .env("TESTWRAP_DRY_RUN", "1")
        .env("TESTWRAP_RACE", "0")
        .args(["run", "--root"])
        .arg(dir.path())
        .args(["./pkg/a", "-count=1"])
        .assert()
        .success()
        .stdout("packages: ./pkg/a\nflags: -cover -covermode=atomic -timeout=60s -count=1\n");
}

#[test]
fn conflicting_modes_exit_one() {
    let dir = tempdir().unwrap();
    testwrap()
        .env("TESTWRAP_JUNIT", "1")
        .env("TESTWRAP_COVER_DIR", "cover")
        .args(["run", "--root"])
        .arg(dir.path())
        .arg("./pkg/a")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot be combined"));
    assert!(!dir.path().join("cover").exists());
}

#[test]
fn deprecated_alias_is_warned() {
    let dir = tempdir().unwrap();
    testwrap()
        .env("KUBE_DRY_RUN", "y")
        .args(["run", "--root"])
        .arg(dir.path())
        .arg("./x")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("packages: ./x\n"))
        .stderr(predicate::str::contains("KUBE_DRY_RUN"));
}

#[test]
fn policy_check_shipped_manifest() {
    testwrap()
        .args(["policy", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("network-policy-controller"));
}

#[test]
fn policy_check_rejects_bad_manifest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "apiVersion: rbac.authorization.k8s.io/v1\nkind: ClusterRole\nmetadata: { name: x }\nrules:\n  - apiGroups: [\"\"]\n    resources: [\"pods\"]\n    verbs: [\"nuke\"]\n",
    )
    .unwrap();
    testwrap()
        .args(["policy", "check"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown verb"));
}
