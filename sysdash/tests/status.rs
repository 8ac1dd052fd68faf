use sysdash::connection::ConnectionState;
use sysdash::status::{StatusKind, StatusReporter};

#[test]
fn starts_disconnected() {
    let r = StatusReporter::new(5);
    assert_eq!(r.current().kind, StatusKind::Disconnected);
    assert_eq!(r.current().text, "Disconnected");
}

#[test]
fn connecting_shows_attempt_out_of_max() {
    let mut r = StatusReporter::new(5);
    let s = r.observe(ConnectionState::Connecting { attempt: 3 });
    assert_eq!(s.kind, StatusKind::Connecting);
    assert_eq!(s.text, "Connecting (attempt 3/5)");
}

#[test]
fn connected() {
    let mut r = StatusReporter::new(5);
    r.observe(ConnectionState::Connecting { attempt: 1 });
    let s = r.observe(ConnectionState::Connected);
    assert_eq!(s.kind, StatusKind::Connected);
    assert_eq!(s.kind.label(), "connected");
    assert_eq!(s.text, "Connected");
    assert_eq!(r.current().text, "Connected");
}

#[test]
fn exhausted_disconnect_is_labelled_until_the_next_attempt() {
    let mut r = StatusReporter::new(2);
    r.observe(ConnectionState::Connecting { attempt: 2 });
    r.note_exhausted();
    assert_eq!(
        r.observe(ConnectionState::Disconnected).text,
        "Disconnected (retries exhausted)"
    );

    r.observe(ConnectionState::Connecting { attempt: 1 });
    assert_eq!(r.observe(ConnectionState::Disconnected).text, "Disconnected");
}

#[test]
fn manual_disconnect_is_plain() {
    let mut r = StatusReporter::new(5);
    r.observe(ConnectionState::Connected);
    let s = r.observe(ConnectionState::Disconnected);
    assert_eq!(s.kind, StatusKind::Disconnected);
    assert_eq!(s.kind.label(), "disconnected");
    assert_eq!(s.text, "Disconnected");
}
