mod actions;
mod app;
mod backend;
mod classify;
mod config;
mod domain;
mod error;
mod exclusion;
mod export;
mod handlers;
mod infra;
mod logging;
mod selection;
mod terminal;
mod tree;
mod ui;

use crate::actions::request_rebuild;
use crate::app::{App, BackendEvent, BackendTask};
use crate::backend::worker_loop;
use crate::config::AppConfig;
use crate::domain::{ColorPalette, Session};
use crate::export::{export_to_file, render_ansi, render_text, root_label};
use crate::handlers::{handle_backend_event, handle_key_event};
use crate::infra::{DirectoryLister, FsLister};
use crate::logging::init_logging;
use crate::selection::{DirectoryIndex, select_all};
use crate::terminal::{Tui, restore_terminal, setup_terminal};
use crate::tree::render;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Colorized directory tree with per-directory expansion
#[derive(Parser, Debug)]
#[command(name = "dirviz")]
#[command(about = "Browse, filter and export a colorized directory tree", long_about = None)]
#[command(version)]
struct Args {
    /// Root directory to visualize (defaults to the current directory)
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Render the tree once to stdout and exit
    #[arg(long)]
    print: bool,

    /// Colorize `--print` output with ANSI escapes
    #[arg(long, requires = "print")]
    ansi: bool,

    /// Render the tree once into FILE (.txt, .html or .json) and exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Exclude a name or extension (e.g. node_modules, .png); repeatable
    #[arg(long, value_name = "ENTRY")]
    exclude: Vec<String>,

    /// Override a category color (e.g. code=#FF0000); repeatable
    #[arg(long, value_name = "CATEGORY=HEX")]
    color: Vec<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load_or_default(),
    };
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load config, using defaults: {err:#}");
            AppConfig::default()
        }
    };

    if let Err(err) = init_logging() {
        eprintln!("file logging disabled: {err:#}");
    }

    let session = build_session(&args)?;
    tracing::info!(root = %session.root.display(), "starting");

    if args.print || args.export.is_some() {
        return render_once(&args, &config, session);
    }

    let mut terminal = setup_terminal()?;
    let run_result = run_app(&mut terminal, config, session).await;

    restore_terminal(&mut terminal)?;
    if let Err(err) = run_result {
        tracing::error!("{err:#}");
        eprintln!("{err:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn build_session(args: &Args) -> Result<Session> {
    let raw_root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let root = raw_root
        .canonicalize()
        .with_context(|| format!("failed to resolve root directory: {}", raw_root.display()))?;
    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }

    let mut session = Session::new(root);
    for entry in &args.exclude {
        session.exclusion.insert(entry);
    }
    for raw in &args.color {
        let (category, color) = ColorPalette::parse_override(raw)
            .with_context(|| format!("invalid --color value: {raw}"))?;
        session.palette.set(category, color);
    }
    Ok(session)
}

/// Non-interactive mode: every directory is expanded.
fn render_once(args: &Args, config: &AppConfig, mut session: Session) -> Result<()> {
    let lister = FsLister;
    let index = DirectoryIndex::scan(&lister, &session.root)?;
    session.inclusion = select_all(&index);
    let snapshot = render(&lister, &session, &config.hidden())?;
    let label = root_label(&session.root);

    if let Some(path) = &args.export {
        let format = export_to_file(path, &label, &snapshot.tree)?;
        tracing::info!(path = %path.display(), format = format.label(), "tree exported");
        eprintln!("exported {} tree to {}", format.label(), path.display());
    }

    if args.print {
        let body = if args.ansi {
            render_ansi(&label, &snapshot.tree)
        } else {
            render_text(&label, &snapshot.tree)
        };
        print!("{body}");
    }

    Ok(())
}

async fn run_app(terminal: &mut Tui, config: AppConfig, session: Session) -> Result<()> {
    let mut app = App::new(config, session);
    let lister: Arc<dyn DirectoryLister> = Arc::new(FsLister);

    let (task_tx, task_rx) = mpsc::unbounded_channel::<BackendTask>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BackendEvent>();

    tokio::spawn(worker_loop(lister, task_rx, event_tx));

    app.log(format!("scanning {}", app.session.root.display()));
    request_rebuild(&mut app, &task_tx)?;

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // One rebuild in flight at a time: input waits for its result.
        if app.busy {
            let event = event_rx.recv().await.context("rebuild worker stopped")?;
            handle_backend_event(&mut app, &task_tx, event)?;
            continue;
        }

        if event::poll(Duration::from_millis(100)).context("event poll failed")?
            && let Event::Key(key) = event::read().context("event read failed")?
            && key.kind == KeyEventKind::Press
        {
            handle_key_event(&mut app, key, &task_tx)?;
        }
    }

    Ok(())
}
