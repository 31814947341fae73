use crate::tree::{RenderedTree, TreeLine};
use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize, style};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Html,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("html") | Some("htm") => ExportFormat::Html,
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Text,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }
}

/// Header shown above the tree: the root's base name in upper case.
pub fn root_label(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| root.display().to_string())
}

pub fn render_text(label: &str, tree: &RenderedTree) -> String {
    let mut out = String::with_capacity(label.len() + 1);
    out.push_str(label);
    out.push('\n');
    out.push_str(&tree.text());
    out
}

pub fn render_ansi(label: &str, tree: &RenderedTree) -> String {
    let mut out = String::new();
    out.push_str(&style(label).bold().to_string());
    out.push('\n');
    for line in &tree.lines {
        out.push_str(&line.prefix);
        out.push_str(line.glyph);
        match line.color {
            Some(color) => {
                let styled = style(line.name.as_str()).with(Color::Rgb {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                });
                out.push_str(&styled.to_string());
            }
            None => out.push_str(&line.name),
        }
        out.push('\n');
    }
    out
}

pub fn render_html(label: &str, tree: &RenderedTree) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n");
    out.push_str("<body style=\"background-color: #24292E; color: #FFFFFF;\">\n<pre>");
    out.push_str(&escape_html(label));
    out.push('\n');
    for line in &tree.lines {
        out.push_str(&escape_html(&line.prefix));
        out.push_str(line.glyph);
        match line.color {
            Some(color) => {
                out.push_str(&format!(
                    "<span style=\"color:{color}\">{}</span>",
                    escape_html(&line.name)
                ));
            }
            None => out.push_str(&escape_html(&line.name)),
        }
        out.push('\n');
    }
    out.push_str("</pre>\n</body>\n</html>\n");
    out
}

#[derive(Serialize)]
struct JsonExport<'a> {
    root: &'a str,
    lines: &'a [TreeLine],
}

pub fn render_json(label: &str, tree: &RenderedTree) -> Result<String> {
    let body = serde_json::to_string_pretty(&JsonExport {
        root: label,
        lines: &tree.lines,
    })
    .context("failed to serialize tree")?;
    Ok(body)
}

pub fn render_as(format: ExportFormat, label: &str, tree: &RenderedTree) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(render_text(label, tree)),
        ExportFormat::Html => Ok(render_html(label, tree)),
        ExportFormat::Json => render_json(label, tree),
    }
}

pub fn export_to_file(path: &Path, label: &str, tree: &RenderedTree) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let body = render_as(format, label, tree)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export directory: {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("failed to write export: {}", path.display()))?;

    Ok(format)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
