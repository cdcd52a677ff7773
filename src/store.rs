//! Explicit state container for the repository browser.
//!
//! The store owns the fetched repositories, the filters and the current page.
//! Every change goes through [`BrowserState::apply`]; the filtered and paged
//! views are recomputed from scratch on each read.

use crate::filter::{filter_repos, Filters, StarFilter, YearFilter};
use crate::models::{sort_by_size_desc, FetchOutcome, LoadState, Repository, Zone};
use crate::pagination::{clamp_page, page_count, page_slice, PAGE_SIZE};
use tracing::debug;

/// State changes the browser understands
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    /// A new username was handed in; a fetch is about to start.
    RequestUser(String),
    /// A fetch finished. Only the result matching the latest request is kept.
    FetchCompleted { generation: u64, outcome: FetchOutcome },
    SetStars(StarFilter),
    SetLanguage(Option<String>),
    SetYear(YearFilter),
    ClearFilters,
    SetPage(usize),
    NextPage,
    PrevPage,
}

#[derive(Debug, Clone)]
pub struct BrowserState {
    pub username: Option<String>,
    pub load: LoadState,
    repositories: Vec<Repository>,
    pub filters: Filters,
    pub page: usize,
    generation: u64,
    zone: Zone,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(Zone::Local)
    }
}

impl BrowserState {
    /// `zone` decides which calendar year a creation timestamp falls in.
    pub fn new(zone: Zone) -> Self {
        Self {
            username: None,
            load: LoadState::Idle,
            repositories: Vec::new(),
            filters: Filters::default(),
            page: 1,
            generation: 0,
            zone,
        }
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Generation of the most recent fetch request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The full fetched set, sorted by size, largest first.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Apply one action. Returns the generation to stamp on the fetch when
    /// the action starts one.
    pub fn apply(&mut self, action: BrowserAction) -> Option<u64> {
        match action {
            BrowserAction::RequestUser(username) => {
                self.generation += 1;
                self.username = Some(username);
                self.load = LoadState::Loading;
                self.repositories.clear();
                self.filters = Filters::default();
                self.page = 1;
                return Some(self.generation);
            }
            BrowserAction::FetchCompleted { generation, outcome } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        latest = self.generation,
                        "Dropping superseded fetch result"
                    );
                    return None;
                }
                match outcome {
                    FetchOutcome::Success(mut repos) => {
                        sort_by_size_desc(&mut repos);
                        self.repositories = repos;
                        self.load = LoadState::Loaded;
                    }
                    FetchOutcome::Failure(reason) => {
                        self.repositories.clear();
                        self.load = LoadState::Failed(reason);
                    }
                }
                self.page = 1;
            }
            BrowserAction::SetStars(stars) => {
                self.filters.stars = stars;
                self.page = 1;
            }
            BrowserAction::SetLanguage(language) => {
                self.filters.language = language;
                self.page = 1;
            }
            BrowserAction::SetYear(year) => {
                self.filters.year = year;
                self.page = 1;
            }
            BrowserAction::ClearFilters => {
                self.filters = Filters::default();
                self.page = 1;
            }
            BrowserAction::SetPage(page) => {
                self.page = clamp_page(page, self.page_count());
            }
            BrowserAction::NextPage => {
                self.page = clamp_page(self.page + 1, self.page_count());
            }
            BrowserAction::PrevPage => {
                self.page = clamp_page(self.page.saturating_sub(1), self.page_count());
            }
        }
        None
    }

    pub fn filtered_repos(&self) -> Vec<&Repository> {
        filtered_repos(self)
    }

    pub fn paged_repos(&self) -> Vec<&Repository> {
        paged_repos(self)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_repos().len(), PAGE_SIZE)
    }
}

/// Repositories passing the current filters.
pub fn filtered_repos(state: &BrowserState) -> Vec<&Repository> {
    filter_repos(&state.repositories, &state.filters, &state.zone)
}

/// The current page of [`filtered_repos`].
pub fn paged_repos(state: &BrowserState) -> Vec<&Repository> {
    let filtered = filtered_repos(state);
    page_slice(&filtered, state.page, PAGE_SIZE).to_vec()
}
