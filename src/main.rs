use autocomplete::demo::{ConfigError, DemoPage, PageConfig};
use autocomplete::terminal::{Terminal, TerminalEvent};
use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Interactive terminal demo of the autocomplete widget.
#[derive(Debug, Parser)]
#[command(name = "autocomplete-demo", version)]
struct Args {
    /// YAML page description to load instead of the built-in page.
    #[arg(long)]
    page: Option<PathBuf>,

    /// Write tracing output to this file. The terminal is owned by the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), DemoError> {
    if let Some(path) = &args.log_file {
        init_tracing(File::create(path)?);
    }

    let config = match &args.page {
        Some(path) => PageConfig::load(path)?,
        None => PageConfig::builtin()?,
    };
    let mut page = DemoPage::new(&config)?;

    let mut terminal = Terminal::new()?;
    terminal.enter()?;
    let result = event_loop(&mut terminal, &mut page);
    page.teardown();
    terminal.leave()?;

    result
}

fn init_tracing(file: File) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn event_loop(terminal: &mut Terminal, page: &mut DemoPage) -> Result<(), DemoError> {
    let mut render_requested = true;

    loop {
        let timeout = page.poll_timeout(Instant::now(), FRAME_INTERVAL);
        if terminal.poll(timeout)? {
            let now = Instant::now();
            match terminal.read_event()? {
                Some(TerminalEvent::Key(key)) => {
                    render_requested |= page.handle_key(key, now);
                }
                Some(TerminalEvent::Click(pos)) => {
                    render_requested |= page.handle_click(pos, now);
                }
                Some(TerminalEvent::Resize { .. }) => {
                    render_requested = true;
                }
                None => {}
            }
        }

        if page.tick(Instant::now()) {
            render_requested = true;
        }

        if page.should_exit() {
            break;
        }

        if render_requested {
            let (lines, cursor) = page.render(terminal.size());
            terminal.draw(&lines, cursor)?;
            render_requested = false;
        }
    }

    Ok(())
}
