use std::fs;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;

use wordflow::app::{App, Flow};
use wordflow::controller::SessionController;
use wordflow::definition::{DefinitionDispatcher, DefinitionLookup, ThreadDispatcher};
use wordflow::error::DefinitionError;
use wordflow::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use wordflow::session::SessionConfig;
use wordflow::ui::SnapshotCell;
use wordflow::words::{DirSource, IndexPicker, WordStore};

// Headless integration using the internal runtime without a TTY.
// Events come from Runner/TestEventSource; time is passed in explicitly.

struct Glossary;

impl DefinitionLookup for Glossary {
    fn lookup(&self, word: &str) -> Result<String, DefinitionError> {
        match word {
            "dawn" => Ok("The first appearance of light in the sky".to_string()),
            other => Err(DefinitionError::Unavailable(format!("no entry for {other}"))),
        }
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn word_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("EN.txt"), "dawn\n").unwrap();
    fs::write(
        dir.path().join("AZ.json"),
        r#"[{"word": "səhər", "description": "Günün ilk hissəsi"}, {"word": "axşam"}]"#,
    )
    .unwrap();
    dir
}

fn build(
    dir: &TempDir,
    runner: &Runner<TestEventSource, FixedTicker>,
    definitions: bool,
) -> App<SnapshotCell> {
    let store = WordStore::new(Box::new(DirSource::new(dir.path())), IndexPicker::seeded(3));
    let dispatcher = definitions.then(|| {
        Box::new(ThreadDispatcher::new(Glossary, runner.sender())) as Box<dyn DefinitionDispatcher>
    });
    App::new(SessionController::new(
        store,
        SessionConfig::default(),
        SnapshotCell::default(),
        dispatcher,
    ))
}

#[test]
fn headless_session_rotates_words_on_schedule() {
    let dir = word_dir();
    let runner = Runner::new(TestEventSource::new(), FixedTicker::new(ms(5)));
    let mut app = build(&dir, &runner, false);
    app.controller.change_language("EN").unwrap();

    let t0 = Instant::now();
    runner.sender().send(key(' ')).unwrap();
    let ev = runner.step();
    assert!(matches!(ev, AppEvent::Key(_)));
    assert_eq!(app.handle_event(ev, t0), Flow::Continue);
    assert!(app.controller.state().is_running);
    assert_eq!(app.controller.state().words_shown_count, 1);

    // Nothing queued, so the runner yields ticks
    let ev = runner.step();
    assert!(matches!(ev, AppEvent::Tick));
    app.handle_event(ev, t0 + ms(2500));
    assert_eq!(app.controller.presenter().snapshot().countdown_secs, Some(3));

    app.handle_event(runner.step(), t0 + ms(5000));
    assert_eq!(app.controller.state().words_shown_count, 2);

    // A long stall still advances only one word
    app.handle_event(runner.step(), t0 + ms(17_000));
    assert_eq!(app.controller.state().words_shown_count, 3);
    assert_eq!(app.controller.presenter().snapshot().countdown_secs, Some(5));
}

#[test]
fn headless_definition_arrives_through_event_loop() {
    let dir = word_dir();
    let runner = Runner::new(TestEventSource::new(), FixedTicker::new(ms(5)));
    let mut app = build(&dir, &runner, true);
    app.controller.change_language("EN").unwrap();

    let t0 = Instant::now();
    app.handle_event(key('s'), t0);
    assert_eq!(app.controller.presenter().snapshot().word, "dawn");

    let mut got_definition = false;
    for _ in 0..400u32 {
        let ev = runner.step();
        if matches!(ev, AppEvent::Definition(_)) {
            app.handle_event(ev, t0 + ms(10));
            got_definition = true;
            break;
        }
    }

    assert!(got_definition, "lookup result should reach the loop");
    assert_eq!(
        app.controller.presenter().snapshot().description.as_deref(),
        Some("The first appearance of light in the sky")
    );
}

#[test]
fn headless_language_switch_stops_and_reloads() {
    let dir = word_dir();
    let runner = Runner::new(TestEventSource::new(), FixedTicker::new(ms(5)));
    let mut app = build(&dir, &runner, false);
    app.controller.change_language("EN").unwrap();

    let t0 = Instant::now();
    app.handle_event(key(' '), t0);
    app.handle_event(AppEvent::Tick, t0 + ms(5000));
    assert_eq!(app.controller.state().words_shown_count, 2);

    app.handle_event(key('l'), t0 + ms(6000));
    let state = app.controller.state();
    assert!(!state.is_running);
    assert_eq!(state.words_shown_count, 0);
    assert_eq!(state.round_count, 0);
    assert_eq!(state.language, "AZ");

    let snap = app.controller.presenter().snapshot();
    assert_eq!(snap.language_code, "AZ");
    assert_eq!(snap.hint, "2 words loaded · Press start");
    assert!(snap.can_start);

    assert_eq!(app.handle_event(key('q'), t0 + ms(7000)), Flow::Quit);
}
