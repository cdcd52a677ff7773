//! Star, language and year filters over a fetched repository set.
//!
//! All three filters are independent and combine with logical AND. An unset
//! filter always passes.

use crate::error::{RepoBrowserError, Result};
use crate::models::{Repository, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Star count selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum StarFilter {
    #[default]
    Any,
    Exactly(u64),
    /// Four stars or more.
    AtLeastFour,
}

impl StarFilter {
    pub fn matches(&self, repo: &Repository) -> bool {
        match self {
            StarFilter::Any => true,
            StarFilter::Exactly(n) => repo.stargazers_count == *n,
            StarFilter::AtLeastFour => repo.stargazers_count >= 4,
        }
    }
}

impl FromStr for StarFilter {
    type Err = RepoBrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "any" | "all" => Ok(StarFilter::Any),
            "+4" | "4+" | "4-or-more" => Ok(StarFilter::AtLeastFour),
            other => other
                .parse::<u64>()
                .map(StarFilter::Exactly)
                .map_err(|_| RepoBrowserError::InvalidFilter(format!("stars: {:?}", other))),
        }
    }
}

impl fmt::Display for StarFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StarFilter::Any => write!(f, "any"),
            StarFilter::Exactly(n) => write!(f, "{}", n),
            StarFilter::AtLeastFour => write!(f, "+4"),
        }
    }
}

/// Creation year selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum YearFilter {
    #[default]
    Any,
    Year(i32),
}

impl YearFilter {
    /// The year is taken from `created_at` as seen in `zone`.
    pub fn matches(&self, repo: &Repository, zone: &Zone) -> bool {
        match self {
            YearFilter::Any => true,
            YearFilter::Year(year) => zone.year_of(&repo.created_at) == *year,
        }
    }
}

impl FromStr for YearFilter {
    type Err = RepoBrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "any" | "all" => Ok(YearFilter::Any),
            other => other
                .parse::<i32>()
                .map(YearFilter::Year)
                .map_err(|_| RepoBrowserError::InvalidFilter(format!("year: {:?}", other))),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::Any => write!(f, "any"),
            YearFilter::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Parse a language selector. Blank and `any` clear the filter.
pub fn parse_language(s: &str) -> Option<String> {
    match s.trim() {
        "" => None,
        other if other.eq_ignore_ascii_case("any") || other.eq_ignore_ascii_case("all") => None,
        other => Some(other.to_string()),
    }
}

/// Case-insensitive language match. Repositories without a language never
/// match a set filter.
pub fn language_matches(filter: Option<&str>, repo: &Repository) -> bool {
    match filter {
        None => true,
        Some(wanted) => repo
            .language
            .as_deref()
            .map(|lang| lang.to_lowercase() == wanted.to_lowercase())
            .unwrap_or(false),
    }
}

/// The three active filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub stars: StarFilter,
    pub language: Option<String>,
    pub year: YearFilter,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        *self == Filters::default()
    }

    pub fn matches(&self, repo: &Repository, zone: &Zone) -> bool {
        self.stars.matches(repo)
            && language_matches(self.language.as_deref(), repo)
            && self.year.matches(repo, zone)
    }
}

/// Every repository passing all filters, in input order.
pub fn filter_repos<'a>(
    repos: &'a [Repository],
    filters: &Filters,
    zone: &Zone,
) -> Vec<&'a Repository> {
    repos.iter().filter(|repo| filters.matches(repo, zone)).collect()
}
