//! Round and word-display state machine.
//!
//! `Idle -> Running <-> Paused -> Idle`. The controller is the only writer of
//! [`SessionState`]; every mutation ends with a fresh [`SessionSnapshot`]
//! handed to the [`Presenter`].

use std::time::{Duration, Instant};

use crate::clock::{countdown_secs, SessionClock};
use crate::definition::{DefinitionDispatcher, DefinitionRequest, DefinitionResponse};
use crate::error::{LoadError, UsageError};
use crate::session::{LoadStatus, SessionConfig, SessionSnapshot, SessionState};
use crate::words::{catalog, WordStore};

const FETCHING_TEXT: &str = "Fetching definition…";

/// Receives a snapshot after every state change
pub trait Presenter {
    fn render(&mut self, snapshot: &SessionSnapshot);
}

pub struct SessionController<P: Presenter> {
    store: WordStore,
    clock: SessionClock,
    state: SessionState,
    config: SessionConfig,
    presenter: P,
    dispatcher: Option<Box<dyn DefinitionDispatcher>>,
    idle_hint: String,
}

impl<P: Presenter> SessionController<P> {
    /// Build an idle controller. No word list is loaded until
    /// [`change_language`](Self::change_language) is called.
    pub fn new(
        store: WordStore,
        config: SessionConfig,
        presenter: P,
        dispatcher: Option<Box<dyn DefinitionDispatcher>>,
    ) -> Self {
        let mut config = config;
        config.interval_secs = config.clamp_secs(config.interval_secs);
        let interval = Duration::from_secs(config.interval_secs);
        Self {
            store,
            clock: SessionClock::new(interval),
            state: SessionState::new(String::new(), interval),
            config,
            presenter,
            dispatcher,
            idle_hint: String::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn interval_secs(&self) -> u64 {
        self.state.interval_duration.as_secs()
    }

    /// Start a round. A no-op while running; refused when no words are loaded.
    pub fn start(&mut self, now: Instant) -> Result<(), UsageError> {
        if self.state.is_running {
            return Ok(());
        }
        if self.store.current_set().is_empty() {
            tracing::warn!(language = %self.state.language, "start ignored: {}", UsageError::EmptyWordList);
            return Err(UsageError::EmptyWordList);
        }

        self.state.is_running = true;
        self.state.is_paused = false;
        self.state.session_id += 1;
        self.state.round_count += 1;
        self.state.words_shown_count = 0;

        self.show_next_word();
        self.clock.start(self.state.interval_duration, now);
        self.state.remaining = self.clock.remaining();

        tracing::info!(
            round = self.state.round_count,
            interval_secs = self.interval_secs(),
            "session started"
        );
        self.render();
        Ok(())
    }

    /// End the round and clear the display. Counts reset to zero.
    pub fn stop(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.clock.stop();
        self.store.clear_pending();

        tracing::info!(
            round = self.state.round_count,
            words_shown = self.state.words_shown_count,
            "session stopped"
        );

        self.state.is_running = false;
        self.state.is_paused = false;
        self.state.current = None;
        self.state.generation += 1;
        self.state.words_shown_count = 0;
        self.state.round_count = 0;
        self.state.interval_duration = Duration::from_secs(self.config.interval_secs);
        self.state.remaining = self.state.interval_duration;
        self.idle_hint = "Press start to begin your flow".to_string();
        self.render();
    }

    /// The main start/stop button; ignored while the list is empty
    pub fn toggle_start_stop(&mut self, now: Instant) {
        if self.store.current_set().is_empty() {
            return;
        }
        if self.state.is_running {
            self.stop();
        } else {
            let _ = self.start(now);
        }
    }

    /// Freeze or continue the countdown without losing progress
    pub fn toggle_pause(&mut self, now: Instant) {
        if !self.state.is_running {
            return;
        }
        if self.state.is_paused {
            self.clock.resume(now);
            self.state.is_paused = false;
            tracing::debug!(remaining_ms = self.clock.remaining().as_millis() as u64, "resumed");
        } else {
            self.clock.pause();
            self.state.is_paused = true;
            tracing::debug!(remaining_ms = self.clock.remaining().as_millis() as u64, "paused");
        }
        self.state.remaining = self.clock.remaining();
        self.render();
    }

    /// Space bar: pause/resume while running, start while idle
    pub fn space(&mut self, now: Instant) {
        if self.state.is_running {
            self.toggle_pause(now);
        } else {
            let _ = self.start(now);
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        let Some(step) = self.clock.tick(now) else {
            return;
        };
        if step.interval_elapsed {
            self.state.interval_duration = self.clock.interval();
            self.show_next_word();
        }
        self.state.remaining = step.remaining;
        self.render();
    }

    /// Apply a lookup result if it still belongs to the displayed word
    pub fn on_definition(&mut self, response: DefinitionResponse) {
        let request = &response.request;
        if request.load_epoch != self.state.load_epoch {
            tracing::debug!(word = %request.word, "dropping definition for a replaced word list");
            return;
        }
        if request.session_id != self.state.session_id {
            // stop already released the pending flag
            tracing::debug!(word = %request.word, "dropping definition from an earlier session");
            return;
        }

        // a redraw of the same entry keeps its in-flight lookup
        let is_current = self.state.is_running && self.state.current == Some(request.index);

        if !is_current {
            tracing::debug!(word = %request.word, "dropping stale definition");
            self.store.attach_definition(request.index, None);
            self.render();
            return;
        }

        match &response.result {
            Ok(text) => self.store.attach_definition(request.index, Some(text.as_str())),
            Err(err) => {
                tracing::debug!(word = %request.word, error = %err, "no definition");
                self.store.attach_definition(request.index, None);
            }
        }
        self.render();
    }

    /// Stop any session, then load the list for `code`
    pub fn change_language(&mut self, code: &str) -> Result<usize, LoadError> {
        self.stop();

        self.state.language = catalog::find(code)
            .map(|l| l.code.to_string())
            .unwrap_or_else(|| code.to_string());
        self.state.status = LoadStatus::Loading;
        self.state.generation += 1;
        self.state.load_epoch += 1;
        self.render();

        match self.store.load(code) {
            Ok(set) => {
                let count = set.len();
                self.state.status = LoadStatus::Ready { count };
                self.idle_hint = format!("{count} words loaded · Press start");
                self.render();
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "word list load failed");
                self.state.status = LoadStatus::Failed;
                self.idle_hint = "Could not load word list".to_string();
                self.render();
                Err(err)
            }
        }
    }

    /// Move `step` places through the language catalog
    pub fn cycle_language(&mut self, step: isize) -> Result<usize, LoadError> {
        let next = catalog::cycle(&self.state.language, step);
        self.change_language(next.code)
    }

    /// Set the interval for the next countdown. Returns the clamped value.
    pub fn change_duration(&mut self, secs: u64) -> u64 {
        let secs = self.config.clamp_secs(secs);
        let interval = Duration::from_secs(secs);

        if self.state.is_running {
            // the running countdown keeps its length; the clock swaps at reset
            self.clock.set_next_interval(interval);
        } else {
            self.state.interval_duration = interval;
            self.state.remaining = interval;
        }
        self.config.interval_secs = secs;
        tracing::debug!(interval_secs = secs, "duration changed");
        self.render();
        secs
    }

    pub fn adjust_duration(&mut self, delta: i64) -> u64 {
        let secs = self.config.interval_secs.saturating_add_signed(delta);
        self.change_duration(secs)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = &self.state;
        let entry = state.current.and_then(|i| self.store.entry(i));

        let (word, description) = match (&state.status, entry) {
            (_, Some(entry)) if state.is_running => {
                let description = if entry.lookup_pending {
                    Some(FETCHING_TEXT.to_string())
                } else {
                    entry.display_description().map(str::to_string)
                };
                (entry.text().to_string(), description)
            }
            (LoadStatus::Loading, _) => ("...".to_string(), None),
            (LoadStatus::Failed, _) => ("Error".to_string(), None),
            (LoadStatus::Ready { .. }, _) => ("Ready?".to_string(), None),
        };

        let interval_secs = if state.is_running {
            state.interval_duration.as_secs()
        } else {
            self.config.interval_secs
        };
        let next_interval_secs = (state.is_running && interval_secs != self.config.interval_secs)
            .then_some(self.config.interval_secs);

        let hint = if state.is_paused {
            "PAUSED · Space to resume".to_string()
        } else if let Some(next) = next_interval_secs {
            format!("New word every {interval_secs}s, {next}s from the next word · Space to pause")
        } else if state.is_running {
            format!("New word every {interval_secs}s · Space to pause")
        } else {
            match state.status {
                LoadStatus::Loading => "Loading words…".to_string(),
                _ => self.idle_hint.clone(),
            }
        };

        let language_label = catalog::find(&state.language)
            .map(|l| l.label.to_string())
            .unwrap_or_else(|| state.language.clone());

        SessionSnapshot {
            word,
            description,
            countdown_secs: state.is_running.then(|| countdown_secs(state.remaining)),
            progress: if state.is_running { self.clock.progress() } else { 0.0 },
            is_running: state.is_running,
            is_paused: state.is_paused,
            words_shown: state.words_shown_count,
            rounds: state.round_count,
            hint,
            language_code: state.language.clone(),
            language_label,
            interval_secs,
            next_interval_secs,
            can_start: !state.is_running && !self.store.current_set().is_empty(),
        }
    }

    fn render(&mut self) {
        let snapshot = self.snapshot();
        self.presenter.render(&snapshot);
    }

    fn show_next_word(&mut self) {
        let Some(index) = self.store.pick_random() else {
            return;
        };
        self.state.generation += 1;
        self.state.current = Some(index);
        self.state.words_shown_count += 1;

        let live = self.config.live_definitions
            && catalog::find(&self.state.language).is_some_and(|l| l.live_definitions);

        let Some(entry) = self.store.entry_mut(index) else {
            return;
        };
        tracing::debug!(
            word = entry.text(),
            generation = self.state.generation,
            shown = self.state.words_shown_count,
            "word shown"
        );

        if !live || !entry.needs_lookup() {
            return;
        }
        if let Some(dispatcher) = &self.dispatcher {
            entry.lookup_pending = true;
            dispatcher.dispatch(DefinitionRequest {
                generation: self.state.generation,
                language: self.state.language.clone(),
                load_epoch: self.state.load_epoch,
                session_id: self.state.session_id,
                index,
                word: entry.text().to_string(),
            });
        }
    }
}
