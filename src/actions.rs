use crate::app::{App, BackendTask};
use crate::export::export_to_file;
use anyhow::{Context, Result};
use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

pub(crate) fn send_task(
    app: &mut App,
    task_tx: &UnboundedSender<BackendTask>,
    task: BackendTask,
) -> Result<()> {
    app.busy = true;
    task_tx
        .send(task)
        .map_err(|err| anyhow::anyhow!("failed to dispatch task: {err}"))
}

pub(crate) fn request_rebuild(app: &mut App, task_tx: &UnboundedSender<BackendTask>) -> Result<()> {
    let task = app.rebuild_task();
    send_task(app, task_tx, task)
}

/// Copies the rendered tree through the terminal (OSC 52), which also works
/// over SSH where no local clipboard service is reachable.
pub(crate) fn copy_tree_to_clipboard(app: &mut App) -> Result<()> {
    let text = app.export_text();
    let mut stdout = io::stdout();
    execute!(stdout, CopyToClipboard::to_clipboard_from(&text))
        .context("failed to copy tree to clipboard")?;
    stdout.flush().context("failed to flush clipboard sequence")?;

    let lines = text.lines().count();
    tracing::info!(lines, "tree copied to clipboard");
    app.log(format!("copied {lines} lines to clipboard"));
    Ok(())
}

pub(crate) fn export_tree(app: &mut App, raw_target: &str) -> Result<PathBuf> {
    let target = resolve_export_path(&app.session.root, raw_target)?;
    let format = export_to_file(&target, &app.root_label, app.tree())?;

    tracing::info!(path = %target.display(), format = format.label(), "tree exported");
    app.log(format!(
        "exported {} tree to {}",
        format.label(),
        target.display()
    ));
    Ok(target)
}

fn resolve_export_path(root: &Path, raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("export path is empty");
    }
    let path = PathBuf::from(trimmed);
    Ok(if path.is_absolute() {
        path
    } else {
        root.join(path)
    })
}
