use crate::filter::Filters;
use crate::models::{LoadState, Repository, Zone};
use crate::pagination::PAGE_SIZE;
use crate::store::BrowserState;
use chrono::{DateTime, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const NO_MATCHES_MESSAGE: &str = "No repositories match the selected filters.";

/// One displayed repository row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRow {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub stars: u64,
    pub language: Option<String>,
    pub created: String,
    pub updated: String,
}

impl RepoRow {
    pub fn from_repository(repo: &Repository, zone: &Zone) -> Self {
        RepoRow {
            id: repo.id,
            name: repo.name.clone(),
            size: repo.size,
            stars: repo.stargazers_count,
            language: repo.language.clone(),
            created: format_date(&repo.created_at, zone),
            updated: format_date(&repo.updated_at, zone),
        }
    }
}

/// Snapshot of everything the browser displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserView {
    pub username: Option<String>,
    pub load: LoadState,
    pub filters: Filters,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub rows: Vec<RepoRow>,
    /// Empty-state or error text shown instead of rows.
    pub message: Option<String>,
}

impl BrowserView {
    pub fn from_state(state: &BrowserState) -> Self {
        let filtered_count = state.filtered_repos().len();
        let rows = state
            .paged_repos()
            .into_iter()
            .map(|repo| RepoRow::from_repository(repo, state.zone()))
            .collect();

        let message = match &state.load {
            LoadState::Failed(reason) => Some(format!(
                "Could not load repositories for {}: {}",
                state.username.as_deref().unwrap_or_default(),
                reason
            )),
            LoadState::Loaded if filtered_count == 0 => Some(NO_MATCHES_MESSAGE.to_string()),
            _ => None,
        };

        BrowserView {
            username: state.username.clone(),
            load: state.load.clone(),
            filters: state.filters.clone(),
            page: state.page,
            page_size: PAGE_SIZE,
            page_count: state.page_count(),
            filtered_count,
            total_count: state.repositories().len(),
            rows,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.load, LoadState::Failed(_))
    }
}

/// Calendar date of `ts` in `zone`, as `YYYY-MM-DD`.
pub fn format_date(ts: &DateTime<Utc>, zone: &Zone) -> String {
    zone.format(ts, "%Y-%m-%d")
}

/// Colored text rendering for the terminal.
pub fn render_text(view: &BrowserView) -> String {
    let mut out = String::new();

    let Some(username) = view.username.as_deref() else {
        let _ = writeln!(out, "{}", "Enter a GitHub username to browse repositories.".dimmed());
        return out;
    };

    let _ = writeln!(out, "{}", format!("Top repositories for {}", username).bold().green());
    let _ = writeln!(
        out,
        "{}",
        format!(
            "stars: {} | language: {} | year: {}",
            view.filters.stars,
            view.filters.language.as_deref().unwrap_or("any"),
            view.filters.year
        )
        .dimmed()
    );
    let _ = writeln!(out, "{}", "=".repeat(50).dimmed());

    if view.load.is_loading() {
        let _ = writeln!(out, "{}", "Loading repositories...".yellow());
        return out;
    }

    if let Some(message) = &view.message {
        let line = if view.is_error() { message.red() } else { message.yellow() };
        let _ = writeln!(out, "{}", line);
    } else {
        for row in &view.rows {
            let _ = writeln!(
                out,
                "{} - Size: {}, Stars: {}, Created: {}, Language: {}, Last updated: {}",
                row.name.bold(),
                row.size,
                row.stars,
                row.created,
                row.language.as_deref().unwrap_or("-"),
                row.updated
            );
        }
    }

    let _ = writeln!(
        out,
        "{}",
        format!(
            "Page {} of {} ({} of {} repositories)",
            view.page, view.page_count, view.filtered_count, view.total_count
        )
        .dimmed()
    );
    out
}

pub fn render_json(view: &BrowserView) -> crate::error::Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}
