use path_replay::{codec, ShareToken};
use precog::{Action, Effect, InputEvent, Mode, Session, SessionSettings, ToastKind};
use pretty_assertions::assert_eq;
use scenario_tree::{FileSource, NodeId, ScenarioTree};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn example_tree() -> Arc<ScenarioTree> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/example.json");
    Arc::new(ScenarioTree::load(&FileSource::new(path)).unwrap())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn path_of(session: &Session) -> Vec<&str> {
    session.path().iter().map(NodeId::as_str).collect()
}

/// Press a digit and let the settle delay run out
fn choose(session: &mut Session, digit: u8, now: Instant) -> Instant {
    assert_eq!(session.handle(InputEvent::Digit(digit), now), None);
    let settled = now + session.settings().settle_delay;
    session.poll_timers(settled);
    settled
}

#[test]
fn test_choice_commits_after_settle_delay() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let t0 = Instant::now();

    session.handle(InputEvent::Digit(2), t0);
    assert_eq!(session.pending_index(), Some(1));
    assert_eq!(session.next_deadline(), Some(t0 + ms(300)));

    session.poll_timers(t0 + ms(299));
    assert!(session.path().is_empty());

    assert!(session.poll_timers(t0 + ms(300)));
    assert_eq!(path_of(&session), vec!["b"]);
    assert_eq!(session.pending_index(), None);
}

#[test]
fn test_commit_closes_replay_opened_while_settling() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let t0 = choose(&mut session, 2, Instant::now());

    session.handle(InputEvent::Digit(1), t0);
    session.handle(InputEvent::OpenReplay, t0 + ms(50));

    assert!(session.poll_timers(t0 + ms(300)));
    assert_eq!(path_of(&session), vec!["b", "b-1"]);
    assert!(!session.is_replay_open());
    assert!(!session.sequencer().is_running());

    session.handle(InputEvent::OpenReplay, t0 + ms(400));
    assert!(session.is_replay_open());
    assert_eq!(session.sequencer().clock().levels(), 2);
}

#[test]
fn test_double_submit_is_ignored() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let t0 = Instant::now();

    session.handle(InputEvent::Digit(1), t0);
    session.handle(InputEvent::Digit(3), t0 + ms(100));
    session.poll_timers(t0 + ms(1_000));

    assert_eq!(path_of(&session), vec!["a"]);
}

#[test]
fn test_choose_then_back_scenario() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let mut now = Instant::now();

    now = choose(&mut session, 2, now);
    now = choose(&mut session, 1, now);
    assert_eq!(path_of(&session), vec!["b", "b-1"]);
    assert_eq!(session.numeric_path(), "2 → 1");
    insta::assert_snapshot!(
        session.share_link().url(),
        @"http://localhost:3000/share/WyJiIiwiYi0xIl0"
    );

    session.handle(InputEvent::Back, now);
    assert_eq!(path_of(&session), vec!["b"]);
    assert_eq!(session.current_node().unwrap().title, "Muddling through");
}

#[test]
fn test_back_during_settle_drops_pending_choice() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let mut now = Instant::now();
    now = choose(&mut session, 1, now);

    session.handle(InputEvent::Digit(1), now);
    session.apply(Action::GoBack, now + ms(100));
    session.poll_timers(now + ms(1_000));

    assert!(session.path().is_empty());
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn test_reset_returns_to_world_state() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let mut now = Instant::now();
    now = choose(&mut session, 3, now);
    now = choose(&mut session, 2, now);

    session.handle(InputEvent::Reset, now);
    assert!(session.path().is_empty());
    assert_eq!(session.current_choices().len(), 3);
}

#[test]
fn test_replay_runs_and_closes() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let mut now = Instant::now();
    now = choose(&mut session, 2, now);
    now = choose(&mut session, 1, now);

    session.handle(InputEvent::OpenReplay, now);
    assert!(session.is_replay_open());
    assert!(session.sequencer().is_running());
    assert_eq!(session.sequencer().clock().total_steps(), 8);

    // Choices are locked while the replay is showing
    assert_eq!(session.handle(InputEvent::Digit(1), now), None);
    assert_eq!(session.pending_index(), None);

    session.poll_timers(now + ms(10_000));
    assert!(session.sequencer().clock().is_complete());

    session.handle(InputEvent::Close, now + ms(10_000));
    assert!(!session.is_replay_open());
    assert_eq!(session.sequencer().next_deadline(), None);
}

#[test]
fn test_share_produces_clipboard_effect() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let mut now = Instant::now();
    now = choose(&mut session, 2, now);
    now = choose(&mut session, 1, now);

    // Only from the replay
    assert_eq!(session.handle(InputEvent::Share, now), None);

    session.handle(InputEvent::OpenReplay, now);
    let effect = session.handle(InputEvent::Share, now);
    assert_eq!(
        effect,
        Some(Effect::CopyToClipboard(
            "http://localhost:3000/share/WyJiIiwiYi0xIl0".to_string()
        ))
    );
}

#[test]
fn test_clipboard_outcome_is_reported() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let now = Instant::now();
    let url = "http://localhost:3000/share/WyJiIl0";

    session.record_clipboard(Ok::<(), io::Error>(()), url, now);
    session.record_clipboard(
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")),
        url,
        now,
    );

    let kinds: Vec<ToastKind> = session.toasts().visible(now).map(|t| t.kind).collect();
    assert_eq!(kinds, vec![ToastKind::Info, ToastKind::Error]);
    assert!(session
        .toasts()
        .visible(now)
        .all(|t| t.body.as_deref() == Some(url)));

    let ttl = session.settings().toast_ttl;
    session.poll_timers(now + ttl);
    assert!(session.toasts().is_empty());
}

#[test]
fn test_shared_session_autoplays() {
    let now = Instant::now();
    let ids = vec![NodeId::from("c"), NodeId::from("c-2")];
    let session = Session::shared(example_tree(), ids, SessionSettings::default(), now);

    assert!(matches!(session.mode(), Mode::Shared(_)));
    assert!(session.is_replay_open());
    assert!(session.sequencer().is_running());
    // First replay phase uses the shared pacing
    assert_eq!(session.next_deadline(), Some(now + ms(150)));
    assert!(session.current_choices().is_empty());
    assert_eq!(session.current_node().unwrap().title, "Cascading failure");
}

#[test]
fn test_shared_session_skips_unknown_ids() {
    let now = Instant::now();
    let ids = vec![NodeId::from("a"), NodeId::from("ghost"), NodeId::from("a-2")];
    let mut session = Session::shared(example_tree(), ids, SessionSettings::default(), now);

    assert_eq!(path_of(&session), vec!["a", "a-2"]);
    let warnings = session
        .toasts()
        .visible(now)
        .filter(|t| t.kind == ToastKind::Warn)
        .count();
    assert_eq!(warnings, 1);

    // Navigation inputs do nothing here
    assert_eq!(session.handle(InputEvent::Back, now), None);
    assert_eq!(session.handle(InputEvent::Reset, now), None);
    assert_eq!(path_of(&session), vec!["a", "a-2"]);
}

#[test]
fn test_shared_session_shares_the_received_path() {
    let now = Instant::now();
    let ids = vec![NodeId::from("a"), NodeId::from("ghost"), NodeId::from("a-2")];
    let expected = codec::encode(&ids);
    let mut session = Session::shared(example_tree(), ids, SessionSettings::default(), now);

    assert_eq!(
        session.apply(Action::Share, now),
        Some(Effect::CopyToClipboard(format!(
            "http://localhost:3000/share/{expected}"
        )))
    );
}

#[test]
fn test_shared_session_keeps_token_text() {
    let now = Instant::now();
    // Standard alphabet with padding, as pasted from older links
    let (token, ids) = ShareToken::parse("WyJjIiwiYy0yIl0=").unwrap();
    let session = Session::shared(example_tree(), ids, SessionSettings::default(), now)
        .with_share_token(token);

    assert_eq!(path_of(&session), vec!["c", "c-2"]);
    assert_eq!(
        session.share_link().url(),
        "http://localhost:3000/share/WyJjIiwiYy0yIl0="
    );
}

#[test]
fn test_share_token_ignored_while_exploring() {
    let (token, _) = ShareToken::parse("WyJjIiwiYy0yIl0").unwrap();
    let session =
        Session::explore(example_tree(), SessionSettings::default()).with_share_token(token);
    assert_eq!(session.share_link().url(), "http://localhost:3000/share/W10");
}

#[test]
fn test_quit() {
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    assert_eq!(session.handle(InputEvent::Quit, Instant::now()), Some(Effect::Quit));
}
