use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyEventKind};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod error;
mod models;
mod services;
mod tui;
mod workflow;

use app::{App, InputMode};
use config::Config;
use error::{AppError, Result};
use services::export::{self, COVER_LETTER_FILE, INTERVIEW_FILE};
use tui::{draw, handle_key_event, AppAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // The terminal belongs to the UI, so logs go to a file
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --analyze flag (headless run)
    if let Some(analyze) = parse_analyze_args(&args)? {
        let job = match &analyze.job {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };
        return run_headless(&config, &analyze.resume, job).await;
    }

    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!("Exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    Ok(())
}

const USAGE: &str = "usage: resume-coach --analyze <resume.pdf> [--job <job.txt>]";

#[derive(Debug, PartialEq, Eq)]
struct AnalyzeArgs {
    resume: PathBuf,
    job: Option<PathBuf>,
}

/// `None` when `--analyze` isn't given and the TUI should start.
fn parse_analyze_args(args: &[String]) -> Result<Option<AnalyzeArgs>> {
    if args.get(1).map(String::as_str) != Some("--analyze") {
        return Ok(None);
    }

    let usage = || AppError::Config(USAGE.to_string());
    let resume = args.get(2).map(PathBuf::from).ok_or_else(usage)?;
    let job = match args.get(3..).unwrap_or_default() {
        [] => None,
        [flag, path] if flag == "--job" => Some(PathBuf::from(path)),
        _ => return Err(usage()),
    };

    Ok(Some(AnalyzeArgs { resume, job }))
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Apply finished requests and the backend greeting
        app.poll_results();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, app.input_mode, app.show_help)
                }
                Event::Paste(text) if app.input_mode != InputMode::Normal => {
                    Some(AppAction::InputPaste(text))
                }
                _ => None,
            };

            if let Some(action) = action {
                let should_quit = app.handle_action(action).await?;
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}

async fn run_headless(config: &Config, resume: &std::path::Path, job: Option<String>) -> Result<()> {
    let mut app = App::new(config)?;
    app.analyze(resume, job).await?;
    let state = &app.workflow;

    println!("== Resume Feedback ==");
    for entry in state.scores.entries() {
        println!("{:<24} {:>4.1}/10", entry.category, entry.score);
    }
    if !state.feedback.is_empty() {
        println!("\n{}", state.feedback);
    }

    if !state.cover_letter.is_empty() {
        println!("\n== Cover Letter ==\n{}", state.cover_letter);
        let path = export::save_text(app.download_dir(), COVER_LETTER_FILE, &state.cover_letter)?;
        println!("(saved to {})", path.display());
    }

    if !state.qa.is_empty() {
        let transcript = export::interview_transcript(state.qa.pairs());
        println!("\n== Interview Q&A ==\n{}", transcript);
        let path = export::save_text(app.download_dir(), INTERVIEW_FILE, &transcript)?;
        println!("(saved to {})", path.display());
    }

    if !state.job_search.is_empty() {
        println!("\n== Job Listings ==");
        for link in &state.job_search.links {
            println!("{:<16} {}", link.platform, link.url);
        }
    }

    Ok(())
}
