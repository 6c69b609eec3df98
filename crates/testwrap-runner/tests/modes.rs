//! Mode dispatch tests driven through a scripted runner.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use testwrap_runner::app::Wrapper;
use testwrap_runner::config::{EnvSnapshot, FileConfig, RunConfig};

use fake_runner::{output, profile_arg, FakeRunner};

fn config(root: &Path, vars: &[(&str, &str)]) -> RunConfig {
    let env = EnvSnapshot::from_vars(vars.iter().copied());
    RunConfig::resolve(FileConfig::default(), &env, root.to_path_buf()).unwrap()
}

fn args(a: &[&str]) -> Vec<String> {
    a.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn report_and_coverage_together_is_fatal_before_anything_runs() {
    let dir = tempdir().unwrap();
    let cfg = config(
        dir.path(),
        &[("TESTWRAP_JUNIT", "1"), ("TESTWRAP_COVER_DIR", "cover")],
    );
    let wrapper = Wrapper::new(cfg, FakeRunner::passing().with_available("go-junit-report"));

    let mut out = Vec::new();
    let err = wrapper
        .run(args(&["./pkg/a"]).as_slice(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.code().as_str(), "MODE_CONFLICT");
    assert_eq!(err.exit_code(), 1);
    assert!(wrapper.runner().calls().is_empty());
    assert!(out.is_empty());
    assert!(!dir.path().join("cover").exists());
    assert!(!dir.path().join("_output").exists());
}

#[tokio::test]
async fn conflict_wins_over_dry_run() {
    let dir = tempdir().unwrap();
    let cfg = config(
        dir.path(),
        &[
            ("TESTWRAP_DRY_RUN", "1"),
            ("TESTWRAP_JUNIT", "1"),
            ("TESTWRAP_COVER_DIR", "cover"),
        ],
    );
    let wrapper = Wrapper::new(cfg, FakeRunner::passing());
    let mut out = Vec::new();
    assert!(wrapper.run(args(&["./a"]).as_slice(), &mut out).await.is_err());
    assert!(out.is_empty());
}

#[tokio::test]
async fn dry_run_prints_plan_and_runs_nothing() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), &[("TESTWRAP_DRY_RUN", "true")]);
    let wrapper = Wrapper::new(cfg, FakeRunner::passing());

    let mut out = Vec::new();
    let code = wrapper
        .run(args(&["./pkg/a", "./pkg/b", "-run", "TestX"]).as_slice(), &mut out)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "packages: ./pkg/a ./pkg/b\nflags: -race -cover -covermode=atomic -timeout=60s -run TestX\n"
    );
    assert!(wrapper.runner().calls().is_empty());
}

#[tokio::test]
async fn plain_mode_single_invocation() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), &[("TESTWRAP_COVER", "0"), ("TESTWRAP_RACE", "0")]);
    let wrapper = Wrapper::new(cfg, FakeRunner::new(|_| output(3, "FAIL\n")));

    let mut out = Vec::new();
    let code = wrapper
        .run(args(&["./a", "./b", "-short"]).as_slice(), &mut out)
        .await
        .unwrap();

    assert_eq!(code, 3);
    let calls = wrapper.runner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "go");
    assert_eq!(calls[0].args, vec!["test", "./a", "./b", "-timeout=60s", "-short"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("_output/test/test.log")).unwrap(),
        "FAIL\n"
    );
}

#[tokio::test]
async fn plain_mode_with_no_packages_found_is_error() {
    let dir = tempdir().unwrap();
    let wrapper = Wrapper::new(config(dir.path(), &[]), FakeRunner::passing());
    let mut out = Vec::new();
    let err = wrapper.run(Vec::<String>::new().as_slice(), &mut out).await.unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
    assert!(wrapper.runner().calls().is_empty());
}

#[tokio::test]
async fn report_mode_keeps_test_exit_code() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), &[("TESTWRAP_JUNIT", "yes")]);
    let runner = FakeRunner::new(|inv| {
        if inv.program == "go-junit-report" {
            output(1, "<testsuites></testsuites>\n")
        } else {
            output(2, "=== RUN   TestX\n--- FAIL: TestX (0.00s)\nFAIL\n")
        }
    })
    .with_available("go-junit-report");
    let wrapper = Wrapper::new(cfg, runner);

    let mut out = Vec::new();
    let code = wrapper
        .run(args(&["./pkg/a"]).as_slice(), &mut out)
        .await
        .unwrap();
    assert_eq!(code, 2);

    let calls = wrapper.runner().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].args[..3], ["test", "./pkg/a", "-v"]);
    assert_eq!(calls[1].program, "go-junit-report");
    assert_eq!(
        calls[1].stdin.as_deref(),
        Some(&b"=== RUN   TestX\n--- FAIL: TestX (0.00s)\nFAIL\n"[..])
    );

    let xml = fs::read_to_string(dir.path().join("_output/test/junit.xml")).unwrap();
    assert_eq!(xml, "<testsuites></testsuites>\n");
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("tests: 0 passed, 1 failed, 0 skipped"));
}

#[tokio::test]
async fn report_mode_passes_when_tests_pass_even_if_formatter_fails() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), &[("TESTWRAP_JUNIT", "1")]);
    let runner = FakeRunner::new(|inv| {
        if inv.program == "go-junit-report" {
            output(5, "")
        } else {
            output(0, "--- PASS: TestY (0.00s)\nok  \tx/pkg\t0.1s\n")
        }
    })
    .with_available("go-junit-report");
    let wrapper = Wrapper::new(cfg, runner);
    let mut out = Vec::new();
    assert_eq!(wrapper.run(args(&["./pkg"]).as_slice(), &mut out).await.unwrap(), 0);
}

#[tokio::test]
async fn report_mode_requires_formatter() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), &[("TESTWRAP_JUNIT", "1")]);
    let wrapper = Wrapper::new(cfg, FakeRunner::passing());

    let mut out = Vec::new();
    let err = wrapper
        .run(args(&["./pkg/a"]).as_slice(), &mut out)
        .await
        .unwrap_err();
    assert_eq!(err.code().as_str(), "MISSING_TOOL");
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("go install"));
    assert!(wrapper.runner().calls().is_empty());
}

fn coverage_runner() -> FakeRunner {
    FakeRunner::new(|inv| {
        if let Some(profile) = profile_arg(inv) {
            let pkg = inv.args[1].trim_start_matches("./").to_string();
            fs::write(&profile, format!("mode: atomic\n{pkg}/x.go:1.1,2.2 1 1\n")).unwrap();
            if pkg == "b" {
                return output(1, "FAIL b\n");
            }
            return output(0, &format!("ok {pkg}\n"));
        }
        output(0, "")
    })
}

#[tokio::test]
async fn coverage_mode_runs_every_package_and_merges() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), &[("TESTWRAP_COVER_DIR", "cover")]);
    let wrapper = Wrapper::new(cfg, coverage_runner());

    let mut out = Vec::new();
    let code = wrapper
        .run(args(&["./a", "./b", "./c"]).as_slice(), &mut out)
        .await
        .unwrap();
    assert_eq!(code, 1);

    let calls = wrapper.runner().calls();
    assert_eq!(calls.len(), 4);
    for (call, pkg) in calls.iter().zip(["./a", "./b", "./c"]) {
        assert_eq!(call.args[1], pkg);
        assert!(call.args[2].starts_with("-coverprofile="));
        assert!(call.args.iter().any(|a| a == "-covermode=atomic"));
    }
    assert_eq!(calls[3].args[..2], ["tool", "cover"]);
    assert!(calls[3].args[2].starts_with("-html="));

    let merged = fs::read_to_string(dir.path().join("cover/combined-coverage.out")).unwrap();
    assert_eq!(
        merged,
        "mode: atomic\na/x.go:1.1,2.2 1 1\nb/x.go:1.1,2.2 1 1\nc/x.go:1.1,2.2 1 1\n"
    );
    assert!(dir.path().join("cover/b/coverage.out").is_file());

    let log = fs::read_to_string(dir.path().join("_output/test/test.log")).unwrap();
    assert_eq!(log, "ok a\nFAIL b\nok c\n");
}

#[tokio::test]
async fn coverage_mode_fail_fast_stops_loop() {
    let dir = tempdir().unwrap();
    let cfg = config(
        dir.path(),
        &[("TESTWRAP_COVER_DIR", "cover"), ("TESTWRAP_FAIL_FAST", "1")],
    );
    let wrapper = Wrapper::new(cfg, coverage_runner());

    let mut out = Vec::new();
    let code = wrapper
        .run(args(&["./a", "./b", "./c"]).as_slice(), &mut out)
        .await
        .unwrap();
    assert_eq!(code, 1);

    let calls = wrapper.runner().calls();
    let tested: Vec<&str> = calls
        .iter()
        .filter(|c| profile_arg(c).is_some())
        .map(|c| c.args[1].as_str())
        .collect();
    assert_eq!(tested, vec!["./a", "./b"]);

    let merged = fs::read_to_string(dir.path().join("cover/combined-coverage.out")).unwrap();
    assert_eq!(merged, "mode: atomic\na/x.go:1.1,2.2 1 1\nb/x.go:1.1,2.2 1 1\n");
}

#[tokio::test]
async fn coverage_mode_discards_profile_from_previous_run() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("cover/a")).unwrap();
    fs::write(
        dir.path().join("cover/a/coverage.out"),
        "mode: atomic\nSTALE/old.go:1.1,2.2 1 1\n",
    )
    .unwrap();

    let cfg = config(dir.path(), &[("TESTWRAP_COVER_DIR", "cover")]);
    // Build failure: no profile gets written.
    let runner = FakeRunner::new(|inv| {
        if profile_arg(inv).is_some() {
            output(2, "build failed\n")
        } else {
            output(0, "")
        }
    });
    let wrapper = Wrapper::new(cfg, runner);

    let mut out = Vec::new();
    let code = wrapper.run(args(&["./a"]).as_slice(), &mut out).await.unwrap();
    assert_eq!(code, 2);

    assert!(!dir.path().join("cover/a/coverage.out").exists());
    assert!(!dir.path().join("cover/combined-coverage.out").exists());
    assert_eq!(wrapper.runner().calls().len(), 1);
}

#[tokio::test]
async fn dry_run_shows_verbose_flag_of_report_mode() {
    let dir = tempdir().unwrap();
    let cfg = config(
        dir.path(),
        &[("TESTWRAP_DRY_RUN", "1"), ("TESTWRAP_JUNIT", "1")],
    );
    let wrapper = Wrapper::new(cfg, FakeRunner::passing());

    let mut out = Vec::new();
    let code = wrapper.run(args(&["./a"]).as_slice(), &mut out).await.unwrap();
    assert_eq!(code, 0);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "packages: ./a\nflags: -v -race -cover -covermode=atomic -timeout=60s\n"
    );
    assert!(wrapper.runner().calls().is_empty());
}

#[tokio::test]
async fn cover_dir_is_ignored_when_coverage_is_off() {
    let dir = tempdir().unwrap();
    let cfg = config(
        dir.path(),
        &[
            ("TESTWRAP_COVER", "0"),
            ("TESTWRAP_JUNIT", "1"),
            ("TESTWRAP_COVER_DIR", "cover"),
        ],
    );
    let runner = FakeRunner::new(|_| output(0, "--- PASS: TestA (0.00s)\n"))
        .with_available("go-junit-report");
    let wrapper = Wrapper::new(cfg, runner);

    let mut out = Vec::new();
    let code = wrapper.run(args(&["./a"]).as_slice(), &mut out).await.unwrap();
    assert_eq!(code, 0);

    let calls = wrapper.runner().calls();
    assert_eq!(calls.len(), 2);
    assert!(profile_arg(&calls[0]).is_none());
    assert_eq!(calls[1].program, "go-junit-report");
    assert!(!dir.path().join("cover").exists());
}
