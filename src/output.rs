use std::sync::OnceLock;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::types::{Items, ProjectEntry, ProjectStatus, ProjectStatusItem};

/// Global output format setting
static OUTPUT_FORMAT: OnceLock<OutputFormat> = OnceLock::new();

pub fn set_format(format: OutputFormat) {
    let _ = OUTPUT_FORMAT.set(format);
}

pub fn format() -> OutputFormat {
    OUTPUT_FORMAT.get().copied().unwrap_or_default()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rows<R: Tabled>(rows: Vec<R>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Organization")]
    group: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&ProjectEntry> for EntryRow {
    fn from(entry: &ProjectEntry) -> Self {
        Self {
            name: entry.name.clone(),
            group: entry.group.clone(),
            id: entry.id.clone(),
        }
    }
}

pub fn print_entries(entries: &Items<ProjectEntry>) -> Result<()> {
    match format() {
        OutputFormat::Json => print_json(entries)?,
        OutputFormat::Compact => {
            for entry in &entries.items {
                println!("{}\t{}", entry.id, entry.name);
            }
        }
        OutputFormat::Table => print_rows(entries.items.iter().map(EntryRow::from).collect()),
    }
    Ok(())
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Project")]
    name: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&ProjectStatusItem> for StatusRow {
    fn from(item: &ProjectStatusItem) -> Self {
        let status = item.status();
        Self {
            name: item.name.clone(),
            group: item.group.clone(),
            state: state_colored(item),
            tags: status.map(tag_names).unwrap_or_default(),
            change: status
                .map(|s| truncate(&change_summary(s), 50))
                .unwrap_or_default(),
            url: status.map(|s| s.web_url.clone()).unwrap_or_default(),
        }
    }
}

pub fn print_statuses(statuses: &Items<ProjectStatusItem>) -> Result<()> {
    match format() {
        OutputFormat::Json => print_json(statuses)?,
        OutputFormat::Compact => {
            for item in &statuses.items {
                println!("{} {}  {}", marker(item), item.id, state_label(item));
            }
        }
        OutputFormat::Table => print_rows(statuses.items.iter().map(StatusRow::from).collect()),
    }
    Ok(())
}

/// Banner printed before each refresh in watch mode.
pub fn print_refresh_header() {
    if format() == OutputFormat::Table {
        let now = Local::now().format("%H:%M:%S").to_string();
        println!("{}", format!("Updated {now}").bright_black());
    }
}

/// Plain state description, e.g. "broken, running".
pub fn state_label(item: &ProjectStatusItem) -> String {
    match (item.status(), item.error()) {
        (Some(status), _) => {
            let mut label = if status.is_broken { "broken" } else { "ok" }.to_string();
            if status.is_running {
                label.push_str(", running");
            }
            if status.is_waiting {
                label.push_str(", waiting");
            }
            label
        }
        (None, Some(error)) => format!("error: {}", error.message),
        (None, None) => String::new(),
    }
}

/// Format state with color
pub fn state_colored(item: &ProjectStatusItem) -> String {
    let label = state_label(item);
    match item.status() {
        None => label.red().bold().to_string(),
        Some(status) if status.is_broken => label.red().to_string(),
        Some(status) if status.is_running => label.blue().to_string(),
        Some(status) if status.is_waiting => label.yellow().to_string(),
        Some(_) => label.green().to_string(),
    }
}

fn marker(item: &ProjectStatusItem) -> &'static str {
    match item.status() {
        None => "!",
        Some(status) if status.is_broken => "x",
        Some(status) if status.is_running => ">",
        Some(status) if status.is_waiting => "~",
        Some(_) => "+",
    }
}

fn tag_names(status: &ProjectStatus) -> String {
    status
        .tags
        .iter()
        .map(|tag| tag.name.yellow().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn change_summary(status: &ProjectStatus) -> String {
    let Some(change) = status.changes.first() else {
        return String::new();
    };
    let message = change
        .message
        .as_deref()
        .and_then(|m| m.lines().next())
        .unwrap_or_default();
    match &change.name {
        Some(name) => format!("{name}: {message}"),
        None => message.to_string(),
    }
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
