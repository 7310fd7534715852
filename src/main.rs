use std::{
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use wordflow::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::SessionController,
    definition::{DefinitionDispatcher, HttpDefinitionLookup, ThreadDispatcher},
    error::{ConfigError, Result},
    logging::{LogFormat, LoggingConfig},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::SessionConfig,
    ui::SnapshotCell,
    words::{DirSource, EmbeddedSource, IndexPicker, WordSource, WordStore},
};

/// random word practice timer for flowing speech
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Shows a random word from the chosen language every few seconds, with an optional short definition, so you can practice speaking without pausing."
)]
pub struct Cli {
    /// language code to start with (AZ, EN)
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// seconds each word stays on screen
    #[clap(short = 'd', long)]
    duration: Option<u64>,

    /// directory with <CODE>.json or <CODE>.txt word lists
    #[clap(long)]
    word_dir: Option<PathBuf>,

    /// never fetch definitions over the network
    #[clap(long)]
    no_definitions: bool,

    /// log line format
    #[clap(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// log filter, e.g. "debug" or "wordflow=trace"
    #[clap(long)]
    log_level: Option<String>,

    /// persist the effective settings and continue
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) {
        if let Some(language) = &self.language {
            cfg.language = language.to_uppercase();
        }
        if let Some(duration) = self.duration {
            cfg.interval_secs = duration;
        }
        if let Some(dir) = &self.word_dir {
            cfg.word_dir = Some(dir.clone());
        }
        if self.no_definitions {
            cfg.live_definitions = false;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let (config, config_err) = load_config(&config_store, &cli);

    LoggingConfig::new(cli.log_format, config.log_level.clone(), AppDirs::log_path()).init();
    if let Some(err) = config_err {
        tracing::warn!(error = %err, "ignoring malformed config");
    }
    tracing::info!(language = %config.language, interval_secs = config.interval_secs, "starting");

    if cli.save_config {
        config_store.save(&config)?;
        tracing::info!(path = %config_store.path().display(), "config saved");
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome
}

/// Stored settings with CLI overrides. A malformed file is handed back so it
/// can be logged once the subscriber is up.
fn load_config(store: &impl ConfigStore, cli: &Cli) -> (Config, Option<ConfigError>) {
    let (mut config, err) = match store.load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    cli.apply(&mut config);
    (config, err)
}

fn build_store(config: &Config) -> WordStore {
    let source: Box<dyn WordSource> = match &config.word_dir {
        Some(dir) => Box::new(DirSource::new(dir)),
        None => Box::new(EmbeddedSource),
    };
    let picker = IndexPicker::from_entropy();
    tracing::debug!(source = %source.describe(), strength = %picker.strength(), "word store ready");
    WordStore::new(source, picker)
}

fn build_dispatcher(
    config: &Config,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> Option<Box<dyn DefinitionDispatcher>> {
    if !config.live_definitions {
        return None;
    }
    let timeout = Duration::from_secs(config.definition_timeout_secs.max(1));
    match HttpDefinitionLookup::new(&config.definition_endpoint, timeout) {
        Ok(lookup) => Some(Box::new(ThreadDispatcher::new(lookup, runner.sender()))),
        Err(err) => {
            tracing::warn!(error = %err, "definitions disabled");
            None
        }
    }
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> Result<()> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    let controller = SessionController::new(
        build_store(config),
        SessionConfig::from(config),
        SnapshotCell::default(),
        build_dispatcher(config, &runner),
    );
    let mut app = App::new(controller);

    if let Err(err) = app.controller.change_language(&config.language) {
        tracing::warn!(error = %err, "initial language unavailable");
    }

    terminal.draw(|f| f.render_widget(app.controller.presenter().snapshot(), f.area()))?;

    loop {
        let event = runner.step();
        let resized = matches!(event, AppEvent::Resize);

        if app.handle_event(event, Instant::now()) == Flow::Quit {
            break;
        }

        if app.controller.presenter_mut().take_dirty() || resized {
            terminal.draw(|f| f.render_widget(app.controller.presenter().snapshot(), f.area()))?;
        }
    }

    tracing::info!(rounds = app.controller.state().round_count, "exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "wordflow",
            "-l",
            "en",
            "-d",
            "9",
            "--no-definitions",
            "--log-level",
            "debug",
        ]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);

        assert_eq!(cfg.language, "EN");
        assert_eq!(cfg.interval_secs, 9);
        assert!(!cfg.live_definitions);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn cli_without_flags_keeps_config() {
        let cli = Cli::parse_from(["wordflow"]);
        let mut cfg = Config {
            language: "EN".into(),
            interval_secs: 7,
            ..Config::default()
        };
        cli.apply(&mut cfg);

        assert_eq!(cfg.language, "EN");
        assert_eq!(cfg.interval_secs, 7);
        assert!(cfg.live_definitions);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn malformed_config_is_returned_for_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        let store = FileConfigStore::with_path(&path);
        let cli = Cli::parse_from(["wordflow", "--log-level", "debug"]);

        let (config, err) = load_config(&store, &cli);
        assert!(matches!(err, Some(ConfigError::Malformed { .. })));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.language, Config::default().language);
    }

    #[test]
    fn valid_config_loads_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        store
            .save(&Config {
                language: "EN".into(),
                ..Config::default()
            })
            .unwrap();

        let (config, err) = load_config(&store, &Cli::parse_from(["wordflow", "-d", "3"]));
        assert!(err.is_none());
        assert_eq!(config.language, "EN");
        assert_eq!(config.interval_secs, 3);
    }

    #[test]
    fn cli_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["wordflow", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
