mod animations;
mod app;
mod config;
mod render;
mod theme;

use app::App;
use clap::Parser;
use config::{Cli, Settings};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use theme::Theme;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.clone());

    let settings = Settings::load(cli.config.as_deref()).map_err(|e| {
        tracing::error!(error = %e, "Could not load settings");
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    })?;
    let theme = if cli.high_contrast {
        Theme::high_contrast()
    } else {
        Theme::dark()
    };
    let mut app = App::new(
        settings.session_config(&cli),
        settings.catalog(),
        cli.seed,
        theme,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
///
/// Runs before the alternate screen is entered, so problems opening the
/// log can still go to stderr.
fn init_tracing(explicit: Option<PathBuf>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = explicit.or_else(config::default_log_path) else {
        tracing_subscriber::registry().with(env_filter).init();
        return;
    };

    let (file, init_warnings) = open_log_file(&path);

    if let Some(file) = file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::info!(path = %path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    for warning in init_warnings {
        eprintln!("madmemory: {warning}; logging disabled");
    }
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file(path: &Path) -> (Option<File>, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
            return (None, warnings);
        }
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => (Some(file), warnings),
        Err(e) => {
            warnings.push(format!("Failed to open log file {}: {e}", path.display()));
            (None, warnings)
        }
    }
}
