use std::time::Duration;

/// Interval bounds and lookup policy for a controller
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub interval_secs: u64,
    pub min_interval_secs: u64,
    pub max_interval_secs: u64,
    pub live_definitions: bool,
}

impl SessionConfig {
    pub fn clamp_secs(&self, secs: u64) -> u64 {
        secs.clamp(self.min_interval_secs, self.max_interval_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            min_interval_secs: 1,
            max_interval_secs: 60,
            live_definitions: true,
        }
    }
}

/// Outcome of the most recent word-list load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready { count: usize },
    Failed,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub is_running: bool,
    pub is_paused: bool,
    pub round_count: u32,
    pub words_shown_count: u32,
    pub interval_duration: Duration,
    pub remaining: Duration,
    /// Index of the displayed entry in the active set
    pub current: Option<usize>,
    /// Bumped on every word change, stop and language switch
    pub generation: u64,
    /// Bumped on every word-list load
    pub load_epoch: u64,
    /// Bumped on every start; lookups from earlier sessions are ignored
    pub session_id: u64,
    pub language: String,
    pub status: LoadStatus,
}

impl SessionState {
    pub fn new(language: impl Into<String>, interval: Duration) -> Self {
        Self {
            is_running: false,
            is_paused: false,
            round_count: 0,
            words_shown_count: 0,
            interval_duration: interval,
            remaining: interval,
            current: None,
            generation: 0,
            load_epoch: 0,
            session_id: 0,
            language: language.into(),
            status: LoadStatus::Loading,
        }
    }
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub word: String,
    pub description: Option<String>,
    /// None renders as a dash
    pub countdown_secs: Option<u64>,
    pub progress: f64,
    pub is_running: bool,
    pub is_paused: bool,
    pub words_shown: u32,
    pub rounds: u32,
    pub hint: String,
    pub language_code: String,
    pub language_label: String,
    /// Length of the countdown on screen
    pub interval_secs: u64,
    /// Interval queued for the next word while running
    pub next_interval_secs: Option<u64>,
    pub can_start: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            word: "...".to_string(),
            description: None,
            countdown_secs: None,
            progress: 0.0,
            is_running: false,
            is_paused: false,
            words_shown: 0,
            rounds: 0,
            hint: String::new(),
            language_code: String::new(),
            language_label: String::new(),
            interval_secs: SessionConfig::default().interval_secs,
            next_interval_secs: None,
            can_start: false,
        }
    }
}
