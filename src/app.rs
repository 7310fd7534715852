use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{Presenter, SessionController};
use crate::runtime::AppEvent;

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// User intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartStop,
    Space,
    NextLanguage,
    PreviousLanguage,
    LongerInterval,
    ShorterInterval,
    Quit,
}

impl Command {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            // ctrl+c to quit
            return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
        }
        let cmd = match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Command::StartStop,
            KeyCode::Char(' ') => Command::Space,
            KeyCode::Tab | KeyCode::Char('l') => Command::NextLanguage,
            KeyCode::BackTab | KeyCode::Char('L') => Command::PreviousLanguage,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right | KeyCode::Up => {
                Command::LongerInterval
            }
            KeyCode::Char('-') | KeyCode::Left | KeyCode::Down => Command::ShorterInterval,
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Routes runtime events into the session controller
pub struct App<P: Presenter> {
    pub controller: SessionController<P>,
}

impl<P: Presenter> App<P> {
    pub fn new(controller: SessionController<P>) -> Self {
        Self { controller }
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) -> Flow {
        match event {
            AppEvent::Tick => self.controller.on_tick(now),
            AppEvent::Resize => {}
            AppEvent::Definition(response) => self.controller.on_definition(response),
            AppEvent::Key(key) => {
                if let Some(cmd) = Command::from_key(key) {
                    return self.apply(cmd, now);
                }
            }
        }
        Flow::Continue
    }

    pub fn apply(&mut self, cmd: Command, now: Instant) -> Flow {
        let ctl = &mut self.controller;
        match cmd {
            Command::StartStop => ctl.toggle_start_stop(now),
            Command::Space => ctl.space(now),
            // load failures are already on screen
            Command::NextLanguage => {
                let _ = ctl.cycle_language(1);
            }
            Command::PreviousLanguage => {
                let _ = ctl.cycle_language(-1);
            }
            Command::LongerInterval => {
                ctl.adjust_duration(1);
            }
            Command::ShorterInterval => {
                ctl.adjust_duration(-1);
            }
            Command::Quit => {
                ctl.stop();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }
}
