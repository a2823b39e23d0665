use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyout::{
    app::{App, Effect},
    app_dirs::DataPaths,
    config::{Config, FileConfigStore},
    corpus::Corpus,
    logging,
    runtime::{is_interrupt, key_code, CrosstermEventSource, Runner, TrainerEvent},
    session::Keymap,
    stats::KeyStatistics,
    summary::HistoryLog,
    ui, TrainerError,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    ops::ControlFlow,
    path::PathBuf,
};

/// terminal typing trainer that remembers which keys you miss
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer. Type passages, watch your speed, and see a heatmap of the keys you keep missing."
)]
pub struct Cli {
    /// file with one practice passage per line (defaults to the bundled passages)
    #[clap(long)]
    corpus: Option<PathBuf>,

    /// directory for key statistics, session history and the log file
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// practice on this passage only
    #[clap(short = 'p', long)]
    passage: Option<String>,

    /// replace a corrupt key statistics file with zeros instead of refusing to start
    #[clap(long)]
    zero_fill_corrupt_stats: bool,

    /// log level filter, e.g. "debug" or "keyout=trace" (RUST_LOG wins)
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Command line flags layered over the config file
    fn merge(&self, mut cfg: Config) -> Config {
        if let Some(corpus) = &self.corpus {
            cfg.corpus_path = Some(corpus.clone());
        }
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = Some(dir.clone());
        }
        if self.zero_fill_corrupt_stats {
            cfg.zero_fill_corrupt_stats = true;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn load_corpus(&self, cfg: &Config) -> keyout::Result<Corpus> {
        match (&self.passage, &cfg.corpus_path) {
            (Some(passage), _) => Ok(Corpus::single(passage.clone())),
            (None, Some(path)) => Corpus::load(path),
            (None, None) => Corpus::bundled(),
        }
    }
}

/// Abort before the terminal is touched
fn startup_error(err: TrainerError) -> ! {
    tracing::error!(%err, "startup failed");
    let message = if err.is_corruption() {
        format!("{err}\nrerun with --zero-fill-corrupt-stats to start from zero")
    } else {
        err.to_string()
    };
    let mut cmd = Cli::command();
    cmd.error(ErrorKind::Io, message).exit()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let cfg = cli.merge(cli.config_store().load_or_init());
    let paths = DataPaths::resolve(cfg.data_dir.as_deref());

    let _log_guard = match logging::init(&paths.log, &cfg.log_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    };
    tracing::info!(data_dir = %paths.dir.display(), "starting keyout");

    let stats = KeyStatistics::load_or_default(&paths.key_stats, cfg.zero_fill_corrupt_stats)
        .unwrap_or_else(|err| startup_error(err));
    let corpus = cli.load_corpus(&cfg).unwrap_or_else(|err| startup_error(err));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(corpus, stats, Keymap::default());
    let result = start_tui(&mut terminal, &mut app, &paths);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    tracing::info!("bye");
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    paths: &DataPaths,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());
    let history = HistoryLog::new(&paths.history);

    app.set_history_page_size(ui::history::page_size(terminal.size()?.height));
    terminal.draw(|f| ui::draw(app, f))?;

    while let Some(event) = runner.step() {
        match event {
            TrainerEvent::Resize => {
                app.set_history_page_size(ui::history::page_size(terminal.size()?.height));
            }
            TrainerEvent::Key(key) => {
                if is_interrupt(&key) {
                    break;
                }
                let Some(code) = key_code(&key) else {
                    continue;
                };
                let effects = app.handle_key(code);
                if apply_effects(app, effects, paths, &history).is_break() {
                    break;
                }
            }
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

/// Perform the IO the app asked for. Failures are logged, the session goes on.
fn apply_effects(
    app: &mut App,
    effects: Vec<Effect>,
    paths: &DataPaths,
    history: &HistoryLog,
) -> ControlFlow<()> {
    for effect in effects {
        match effect {
            Effect::SaveSummary(summary) => {
                if let Err(err) = history.append(&summary) {
                    tracing::error!(%err, "could not save session summary");
                }
            }
            Effect::FlushStats => {
                if let Err(err) = app.stats().flush(&paths.key_stats) {
                    tracing::error!(%err, "could not save key statistics");
                }
            }
            Effect::LoadHistory => match history.load_for_browsing() {
                Ok((sessions, skipped)) => app.show_history(sessions, skipped),
                Err(err) => tracing::error!(%err, "could not read session history"),
            },
            Effect::Quit => return ControlFlow::Break(()),
        }
    }
    ControlFlow::Continue(())
}
