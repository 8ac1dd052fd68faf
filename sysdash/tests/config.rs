//! Endpoint normalization, setting precedence and config file persistence.

use std::time::Duration;

use sysdash::config::{
    load, normalize_endpoint, save, ConfigFile, Overrides, Settings, SortKey, DEFAULT_ENDPOINT,
};
use sysdash::error::ConfigError;
use sysdash::view::ProcessSort;

#[test]
fn host_port_gets_ws_scheme() {
    let url = normalize_endpoint("example.com:8765").unwrap();
    assert_eq!(url.as_str(), "ws://example.com:8765/");
    assert_eq!(
        normalize_endpoint("  wss://h:1/feed ").unwrap().as_str(),
        "wss://h:1/feed"
    );
}

#[test]
fn non_ws_schemes_are_rejected() {
    let err = normalize_endpoint("http://example.com").unwrap_err();
    assert!(matches!(err, ConfigError::Endpoint { .. }), "{err}");
    assert!(err.to_string().contains("http"));
    assert!(normalize_endpoint("ws://").is_err());
    assert!(normalize_endpoint("").is_err());
}

#[test]
fn defaults_when_nothing_is_given() {
    let s = Settings::resolve(&ConfigFile::default(), &Overrides::default()).unwrap();
    assert_eq!(s.endpoint, normalize_endpoint(DEFAULT_ENDPOINT).unwrap());
    assert_eq!(s.history_len, 50);
    assert_eq!(s.retry.base_delay, Duration::from_millis(1000));
    assert_eq!(s.retry.max_attempts, 5);
    assert!(!s.projection.hide_idle_cores);
    assert_eq!(s.projection.sort, ProcessSort::CpuDesc);
}

#[test]
fn cli_beats_profile_beats_file() {
    let mut file = ConfigFile {
        endpoint: Some("file-host:1".into()),
        history_len: Some(20),
        max_attempts: Some(3),
        sort: Some(SortKey::Mem),
        ..ConfigFile::default()
    };
    file.remember_profile("lab", "lab-host:2");

    let s = Settings::resolve(&file, &Overrides::default()).unwrap();
    assert_eq!(s.endpoint.host_str(), Some("file-host"));
    assert_eq!(s.history_len, 20);
    assert_eq!(s.retry.max_attempts, 3);
    assert_eq!(s.projection.sort, ProcessSort::MemDesc);

    let by_profile = Overrides {
        profile: Some("lab".into()),
        ..Overrides::default()
    };
    let s = Settings::resolve(&file, &by_profile).unwrap();
    assert_eq!(s.endpoint.host_str(), Some("lab-host"));

    let cli = Overrides {
        endpoint: Some("cli-host:3".into()),
        profile: Some("lab".into()),
        history_len: Some(10),
        sort: Some(SortKey::Cpu),
        ..Overrides::default()
    };
    let s = Settings::resolve(&file, &cli).unwrap();
    assert_eq!(s.endpoint.host_str(), Some("cli-host"));
    assert_eq!(s.history_len, 10);
    assert_eq!(s.retry.max_attempts, 3);
    assert_eq!(s.projection.sort, ProcessSort::CpuDesc);
}

#[test]
fn unknown_profile_is_an_error() {
    let o = Overrides {
        profile: Some("nope".into()),
        ..Overrides::default()
    };
    let err = Settings::resolve(&ConfigFile::default(), &o).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownProfile(ref n) if n == "nope"));
}

#[test]
fn zero_values_are_rejected() {
    for (o, field) in [
        (
            Overrides {
                history_len: Some(0),
                ..Overrides::default()
            },
            "history_len",
        ),
        (
            Overrides {
                base_delay_ms: Some(0),
                ..Overrides::default()
            },
            "base_delay_ms",
        ),
        (
            Overrides {
                max_attempts: Some(0),
                ..Overrides::default()
            },
            "max_attempts",
        ),
    ] {
        let err = Settings::resolve(&ConfigFile::default(), &o).unwrap_err();
        assert!(
            matches!(err, ConfigError::OutOfRange { field: f } if f == field),
            "{err}"
        );
    }
}

#[test]
fn remember_profile_reports_changes() {
    let mut cfg = ConfigFile::default();
    assert!(cfg.remember_profile("lab", "ws://a:1"));
    assert!(!cfg.remember_profile("lab", "ws://a:1"));
    assert!(cfg.remember_profile("lab", "ws://b:1"));
    assert_eq!(cfg.profiles["lab"], "ws://b:1");
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(cfg, ConfigFile::default());
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let mut cfg = ConfigFile {
        history_len: Some(30),
        hide_idle_cores: Some(true),
        sort: Some(SortKey::Mem),
        ..ConfigFile::default()
    };
    cfg.remember_profile("lab", "ws://lab:9000");

    save(&path, &cfg).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"sort\": \"mem\""), "{text}");
    assert!(!text.contains("endpoint\": null"));
    assert_eq!(load(&path).unwrap(), cfg);
}

#[test]
fn invalid_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}
