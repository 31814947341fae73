use crate::actions::{copy_tree_to_clipboard, export_tree, request_rebuild};
use crate::app::{App, BackendEvent, BackendTask, InputKind, ModalState, PaneFocus};
use crate::domain::FileCategory;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

const PAGE_LINES: usize = 10;

pub(crate) fn handle_backend_event(
    app: &mut App,
    task_tx: &UnboundedSender<BackendTask>,
    event: BackendEvent,
) -> Result<()> {
    match event {
        BackendEvent::Rebuilt {
            snapshot,
            duration_ms,
        } => {
            app.busy = false;
            let lines = snapshot.tree.lines.len();
            let directories = snapshot.directories.len();
            if app.apply_snapshot(snapshot) {
                request_rebuild(app, task_tx)?;
            } else {
                let included = app.session.inclusion.len();
                app.log(format!(
                    "rebuilt {lines} lines, {included}/{directories} dirs ({duration_ms}ms)"
                ));
            }
        }
        BackendEvent::Error { context, message } => {
            app.busy = false;
            app.log(format!("error[{context}]: {message}"));
        }
    }

    Ok(())
}

pub(crate) fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    task_tx: &UnboundedSender<BackendTask>,
) -> Result<()> {
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    match app.modal.clone() {
        ModalState::None => handle_key_without_modal(app, key, task_tx),
        ModalState::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.close_modal();
            }
            Ok(())
        }
        ModalState::Input { kind, value } => handle_input_key(app, key, task_tx, kind, value),
        ModalState::Exclusions { selected } => handle_exclusions_key(app, key, task_tx, selected),
        ModalState::Palette { selected } => handle_palette_key(app, key, task_tx, selected),
    }
}

fn handle_key_without_modal(
    app: &mut App,
    key: KeyEvent,
    task_tx: &UnboundedSender<BackendTask>,
) -> Result<()> {
    let mut rebuild = false;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.open_help(),
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            PaneFocus::Selector => app.select_next(),
            PaneFocus::Tree => {
                app.scroll_tree_down(1);
            }
            PaneFocus::Log => {
                app.scroll_log_down(1);
            }
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            PaneFocus::Selector => app.select_prev(),
            PaneFocus::Tree => {
                app.scroll_tree_up(1);
            }
            PaneFocus::Log => {
                app.scroll_log_up(1);
            }
        },
        KeyCode::PageDown => {
            app.scroll_tree_down(PAGE_LINES);
        }
        KeyCode::PageUp => {
            app.scroll_tree_up(PAGE_LINES);
        }
        KeyCode::Char(' ') | KeyCode::Enter if app.focus == PaneFocus::Selector => {
            rebuild = app.toggle_selected();
        }
        KeyCode::Char('a') => rebuild = app.select_all_directories(),
        KeyCode::Char('u') => rebuild = app.unselect_all_directories(),
        KeyCode::Char('x') => app.open_input(InputKind::Exclusion, String::new()),
        KeyCode::Char('X') => app.open_exclusions(),
        KeyCode::Char('p') => app.open_palette(),
        KeyCode::Char('r') => {
            app.log("rescanning".to_string());
            rebuild = true;
        }
        KeyCode::Char('y') => {
            if let Err(err) = copy_tree_to_clipboard(app) {
                app.log(format!("error[copy]: {err:#}"));
            }
        }
        KeyCode::Char('e') => {
            let default_name = app.config.export_file_name.clone();
            app.open_input(InputKind::Export, default_name);
        }
        _ => {}
    }

    if rebuild {
        request_rebuild(app, task_tx)?;
    }
    Ok(())
}

fn handle_input_key(
    app: &mut App,
    key: KeyEvent,
    task_tx: &UnboundedSender<BackendTask>,
    kind: InputKind,
    mut value: String,
) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.modal = return_modal(kind),
        KeyCode::Enter => {
            app.modal = return_modal(kind);
            let rebuild = match kind {
                InputKind::Exclusion => app.add_exclusion(&value),
                InputKind::Color(category) => app.set_color(category, &value),
                InputKind::Export => {
                    if let Err(err) = export_tree(app, &value) {
                        app.log(format!("error[export]: {err:#}"));
                    }
                    false
                }
            };
            if rebuild {
                request_rebuild(app, task_tx)?;
            }
        }
        KeyCode::Backspace => {
            value.pop();
            app.modal = ModalState::Input { kind, value };
        }
        KeyCode::Char(c) => {
            value.push(c);
            app.modal = ModalState::Input { kind, value };
        }
        _ => {}
    }
    Ok(())
}

/// Color edits go back to the palette they were started from.
fn return_modal(kind: InputKind) -> ModalState {
    match kind {
        InputKind::Color(category) => ModalState::Palette {
            selected: FileCategory::ALL
                .iter()
                .position(|c| *c == category)
                .unwrap_or(0),
        },
        InputKind::Exclusion | InputKind::Export => ModalState::None,
    }
}

fn handle_exclusions_key(
    app: &mut App,
    key: KeyEvent,
    task_tx: &UnboundedSender<BackendTask>,
    selected: usize,
) -> Result<()> {
    let len = app.session.exclusion.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
        KeyCode::Char('j') | KeyCode::Down if len > 0 => {
            app.modal = ModalState::Exclusions {
                selected: (selected + 1) % len,
            };
        }
        KeyCode::Char('k') | KeyCode::Up if len > 0 => {
            app.modal = ModalState::Exclusions {
                selected: if selected == 0 { len - 1 } else { selected - 1 },
            };
        }
        KeyCode::Char('a') | KeyCode::Char('x') => {
            app.open_input(InputKind::Exclusion, String::new());
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(entry) = app.exclusion_at(selected)
                && app.remove_exclusion(&entry)
            {
                let remaining = app.session.exclusion.len();
                app.modal = ModalState::Exclusions {
                    selected: selected.min(remaining.saturating_sub(1)),
                };
                request_rebuild(app, task_tx)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_palette_key(
    app: &mut App,
    key: KeyEvent,
    task_tx: &UnboundedSender<BackendTask>,
    selected: usize,
) -> Result<()> {
    let len = FileCategory::ALL.len();
    let category = FileCategory::ALL[selected.min(len - 1)];
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.modal = ModalState::Palette {
                selected: (selected + 1) % len,
            };
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.modal = ModalState::Palette {
                selected: if selected == 0 { len - 1 } else { selected - 1 },
            };
        }
        KeyCode::Enter => {
            let current = app.session.palette.color(category).to_string();
            app.open_input(InputKind::Color(category), current);
        }
        KeyCode::Char('r') => {
            if app.reset_color(category) {
                request_rebuild(app, task_tx)?;
            }
        }
        _ => {}
    }
    Ok(())
}
