use crate::error::{RepoBrowserError, Result};
use crate::types::GitHubRepo;
use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Star options offered by the filter selector.
pub const STAR_CHOICES: &[&str] = &["1", "2", "3", "+4"];

/// Language options offered by the filter selector. Any other language is
/// still accepted when typed in.
pub const LANGUAGE_CHOICES: &[&str] = &["JavaScript", "Python", "CSS", "VUE", "SCSS", "HTML"];

/// Year options offered by the filter selector, newest first.
pub const YEAR_CHOICES: &[i32] = &[2024, 2023, 2022, 2021, 2020, 2019, 2018, 2017];

/// A repository that passed response validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GitHubRepo> for Repository {
    type Error = RepoBrowserError;

    fn try_from(raw: GitHubRepo) -> Result<Self> {
        let created_at = parse_timestamp(&raw.created_at).map_err(|e| {
            RepoBrowserError::InvalidResponse(format!("repository {}: created_at: {}", raw.id, e))
        })?;
        let updated_at = parse_timestamp(&raw.updated_at).map_err(|e| {
            RepoBrowserError::InvalidResponse(format!("repository {}: updated_at: {}", raw.id, e))
        })?;

        Ok(Repository {
            id: raw.id,
            name: raw.name,
            size: raw.size,
            stargazers_count: raw.stargazers_count,
            language: raw.language,
            created_at,
            updated_at,
        })
    }
}

/// Parse an upstream timestamp. GitHub sends RFC 3339; a bare `YYYY-MM-DD`
/// is also accepted and read as midnight UTC.
pub fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognised timestamp {:?}", value))
}

/// Sort repositories by size, largest first. Equal sizes keep their upstream order.
pub fn sort_by_size_desc(repos: &mut [Repository]) {
    repos.sort_by(|a, b| b.size.cmp(&a.size));
}

/// Result of one fetch, as committed to browser state
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<Repository>),
    Failure(String),
}

impl From<Result<Vec<Repository>>> for FetchOutcome {
    fn from(result: Result<Vec<Repository>>) -> Self {
        match result {
            Ok(repos) => FetchOutcome::Success(repos),
            Err(e) => FetchOutcome::Failure(e.to_string()),
        }
    }
}

/// Where the repository set for the current username stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Time zone used to read calendar years and dates off timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    /// The machine's zone, resolved per timestamp so daylight saving applies.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    pub fn year_of(&self, ts: &DateTime<Utc>) -> i32 {
        match self {
            Zone::Local => ts.with_timezone(&Local).year(),
            Zone::Fixed(offset) => ts.with_timezone(offset).year(),
        }
    }

    pub fn format(&self, ts: &DateTime<Utc>, fmt: &str) -> String {
        match self {
            Zone::Local => ts.with_timezone(&Local).format(fmt).to_string(),
            Zone::Fixed(offset) => ts.with_timezone(offset).format(fmt).to_string(),
        }
    }
}
