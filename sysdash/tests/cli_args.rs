//! CLI arg parsing tests for sysdash. `--dry-run` resolves settings and exits before any network I/O.
use std::process::Command;

fn run_sysdash(args: &[&str]) -> (bool, String) {
    // isolate from any real config on the machine
    let td = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_sysdash"))
        .env("XDG_CONFIG_HOME", td.path())
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run sysdash");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let (ok, text) = run_sysdash(&["--help"]);
    assert!(ok);
    for flag in [
        "--profile",
        "-P",
        "--save",
        "--history",
        "--base-delay-ms",
        "--max-attempts",
        "--hide-idle-cores",
        "--sort",
        "--headless",
        "--dry-run",
    ] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn test_dry_run_prints_defaults() {
    let (ok, text) = run_sysdash(&["--dry-run"]);
    assert!(ok, "{text}");
    assert!(text.contains("endpoint: ws://localhost:8765/"), "{text}");
    assert!(text.contains("history: 50"), "{text}");
    assert!(text.contains("retry: base 1000 ms, max 5 attempts"), "{text}");
    assert!(text.contains("hide idle cores: false"), "{text}");
    assert!(text.contains("sort: cpu"), "{text}");
}

#[test]
fn test_dry_run_applies_overrides() {
    let (ok, text) = run_sysdash(&[
        "collector.local:9000",
        "--history",
        "12",
        "--base-delay-ms",
        "250",
        "--max-attempts",
        "2",
        "--hide-idle-cores",
        "--sort",
        "mem",
        "--dry-run",
    ]);
    assert!(ok, "{text}");
    assert!(text.contains("endpoint: ws://collector.local:9000/"), "{text}");
    assert!(text.contains("history: 12"), "{text}");
    assert!(text.contains("retry: base 250 ms, max 2 attempts"), "{text}");
    assert!(text.contains("hide idle cores: true"), "{text}");
    assert!(text.contains("sort: mem"), "{text}");
}

#[test]
fn test_rejects_bad_values() {
    let (ok, text) = run_sysdash(&["http://example.com", "--dry-run"]);
    assert!(!ok);
    assert!(text.contains("unsupported scheme"), "{text}");

    let (ok, text) = run_sysdash(&["--max-attempts", "0", "--dry-run"]);
    assert!(!ok);
    assert!(text.contains("max_attempts must be at least 1"), "{text}");

    let (ok, _) = run_sysdash(&["--sort", "name", "--dry-run"]);
    assert!(!ok);
}

#[test]
fn test_save_requires_profile() {
    let (ok, text) = run_sysdash(&["ws://h:1", "--save", "--dry-run"]);
    assert!(!ok);
    assert!(text.contains("--profile"), "{text}");
}
