use path_replay::codec::decode;
use precog::{ui, HitMap, InputEvent, KeyMap, Session, SessionSettings, Theme, ViewError};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use scenario_tree::{FileSource, NodeId, ScenarioTree};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn example_tree() -> Arc<ScenarioTree> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/example.json");
    Arc::new(ScenarioTree::load(&FileSource::new(path)).unwrap())
}

fn screen_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_explore_screen_lists_choices() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let session = Session::explore(example_tree(), SessionSettings::default());
    let (theme, keys, now) = (Theme::dark(), KeyMap::default(), Instant::now());

    let mut hits = HitMap::new();
    terminal
        .draw(|frame| hits = ui::draw(frame, &session, &theme, &keys, now))
        .unwrap();

    let text = screen_text(terminal.backend().buffer());
    assert!(text.contains("Current world"));
    assert!(text.contains("Treaty signed"));
    assert!(text.contains("Talks collapse"));
    assert!(text.contains("Start your journey..."));

    // First card sits just inside the right panel
    assert_eq!(hits.pick(60, 3), Some(0));
    assert_eq!(hits.pick(60, 8), Some(1));
    assert_eq!(hits.pick(10, 3), None);
}

#[test]
fn test_replay_overlay_hides_choices_from_clicks() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut session = Session::explore(example_tree(), SessionSettings::default());
    let (theme, keys) = (Theme::dark(), KeyMap::default());

    let mut now = Instant::now();
    for digit in [2, 1] {
        session.handle(InputEvent::Digit(digit), now);
        now += Duration::from_millis(300);
        session.poll_timers(now);
    }
    session.handle(InputEvent::OpenReplay, now);
    session.poll_timers(now + Duration::from_secs(5));

    let mut hits = HitMap::new();
    terminal
        .draw(|frame| hits = ui::draw(frame, &session, &theme, &keys, now))
        .unwrap();

    let text = screen_text(terminal.backend().buffer());
    assert!(text.contains("Your journey"));
    assert!(text.contains("Demand response scales"));
    assert!(text.contains("2 → 1"));

    assert_eq!(hits.pick(60, 3), None);
}

#[test]
fn test_shared_screen_shows_journey() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let ids = decode("WyJiIiwiYi0xIl0").unwrap();
    let now = Instant::now();
    let mut session = Session::shared(example_tree(), ids, SessionSettings::default(), now);
    session.handle(InputEvent::Close, now);

    terminal
        .draw(|frame| {
            ui::draw(frame, &session, &Theme::light(), &KeyMap::default(), now);
        })
        .unwrap();

    let text = screen_text(terminal.backend().buffer());
    assert!(text.contains("Journey"));
    assert!(text.contains("shared journey"));
    assert!(text.contains("Demand response scales"));
    assert_eq!(session.path().last(), Some(&NodeId::from("b-1")));
}

#[test]
fn test_error_screen() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let error = ViewError::from(decode("%%%").unwrap_err());

    terminal
        .draw(|frame| ui::draw_error(frame, &error, &Theme::dark(), &KeyMap::default()))
        .unwrap();

    let text = screen_text(terminal.backend().buffer());
    assert!(text.contains("Invalid share link"));
    assert!(text.contains("Press q to quit."));
}
