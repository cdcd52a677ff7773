use crate::error::{RepoBrowserError, Result};
use crate::filter::{StarFilter, YearFilter};
use crate::github::GitHubClient;
use crate::models::{FetchOutcome, LoadState, Zone};
use crate::render::BrowserView;
use crate::store::{BrowserAction, BrowserState};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort, SpawnErr};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Owns the browser store and the single in-flight fetch
pub struct RepositoryBrowser;

pub struct RepositoryBrowserState {
    client: Arc<GitHubClient>,
    store: BrowserState,
    in_flight: Option<JoinHandle<()>>,
    waiters: Vec<RpcReplyPort<BrowserView>>,
    fetches_started: u64,
    stale_results_dropped: u64,
}

pub struct RepositoryBrowserArgs {
    pub client: Arc<GitHubClient>,
    /// Time zone used for year filtering and date display.
    pub zone: Zone,
}

/// Messages the browser can handle
#[derive(Debug)]
pub enum BrowserMessage {
    /// Browse a (possibly new) username. Starts a fetch unless this username
    /// is already loaded or loading.
    ShowUser(String),
    SetStars(StarFilter),
    SetLanguage(Option<String>),
    SetYear(YearFilter),
    ClearFilters,
    GoToPage(usize),
    NextPage,
    PrevPage,
    /// Sent by the fetch task when it finishes
    FetchFinished { generation: u64, outcome: FetchOutcome },
    /// Current view, immediately
    GetView(RpcReplyPort<BrowserView>),
    /// Current view, once no fetch is in flight
    WaitIdle(RpcReplyPort<BrowserView>),
    GetStats(RpcReplyPort<BrowserStats>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserStats {
    pub fetches_started: u64,
    pub stale_results_dropped: u64,
    pub generation: u64,
}

impl RepositoryBrowser {
    pub async fn spawn(
        client: Arc<GitHubClient>,
        zone: Zone,
    ) -> std::result::Result<ActorRef<BrowserMessage>, SpawnErr> {
        let args = RepositoryBrowserArgs { client, zone };
        let (actor_ref, _handle) = Actor::spawn(None, RepositoryBrowser, args).await?;
        Ok(actor_ref)
    }

    fn start_fetch(
        myself: &ActorRef<BrowserMessage>,
        state: &mut RepositoryBrowserState,
        username: String,
    ) {
        let request = BrowserAction::RequestUser(username.clone());
        let Some(generation) = state.store.apply(request) else {
            return;
        };

        state.fetches_started += 1;
        info!(%username, generation, "Fetching repositories");

        let client = state.client.clone();
        let myself = myself.clone();
        let handle = tokio::spawn(async move {
            let outcome = match client.fetch_user_repos(&username).await {
                Ok(repos) => FetchOutcome::Success(repos),
                Err(e) => {
                    error!(%username, "Error fetching repos: {}", e);
                    FetchOutcome::Failure(e.to_string())
                }
            };

            let finished = BrowserMessage::FetchFinished { generation, outcome };
            if let Err(e) = myself.send_message(finished) {
                warn!(generation, "Browser stopped before fetch result arrived: {:?}", e);
            }
        });

        // Only the latest request may commit; the previous one is cancelled.
        if let Some(previous) = state.in_flight.replace(handle) {
            previous.abort();
        }
    }

    fn release_waiters(state: &mut RepositoryBrowserState) {
        if state.store.load.is_loading() {
            return;
        }
        let view = BrowserView::from_state(&state.store);
        for reply in state.waiters.drain(..) {
            if !reply.is_closed() {
                let _ = reply.send(view.clone());
            }
        }
    }
}

#[ractor::async_trait]
impl Actor for RepositoryBrowser {
    type Msg = BrowserMessage;
    type State = RepositoryBrowserState;
    type Arguments = RepositoryBrowserArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        debug!(base_url = %args.client.base_url(), "Repository browser starting");

        Ok(RepositoryBrowserState {
            client: args.client,
            store: BrowserState::new(args.zone),
            in_flight: None,
            waiters: Vec::new(),
            fetches_started: 0,
            stale_results_dropped: 0,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        match message {
            BrowserMessage::ShowUser(username) => {
                let unchanged = state.store.username.as_deref() == Some(username.as_str())
                    && matches!(state.store.load, LoadState::Loading | LoadState::Loaded);
                if unchanged {
                    debug!(%username, "Username unchanged, not fetching again");
                } else {
                    Self::start_fetch(&myself, state, username);
                }
            }
            BrowserMessage::SetStars(stars) => {
                state.store.apply(BrowserAction::SetStars(stars));
            }
            BrowserMessage::SetLanguage(language) => {
                state.store.apply(BrowserAction::SetLanguage(language));
            }
            BrowserMessage::SetYear(year) => {
                state.store.apply(BrowserAction::SetYear(year));
            }
            BrowserMessage::ClearFilters => {
                state.store.apply(BrowserAction::ClearFilters);
            }
            BrowserMessage::GoToPage(page) => {
                state.store.apply(BrowserAction::SetPage(page));
            }
            BrowserMessage::NextPage => {
                state.store.apply(BrowserAction::NextPage);
            }
            BrowserMessage::PrevPage => {
                state.store.apply(BrowserAction::PrevPage);
            }
            BrowserMessage::FetchFinished { generation, outcome } => {
                if generation != state.store.generation() {
                    state.stale_results_dropped += 1;
                    debug!(generation, "Ignoring result of superseded fetch");
                    return Ok(());
                }

                state.in_flight = None;
                state.store.apply(BrowserAction::FetchCompleted { generation, outcome });

                match &state.store.load {
                    LoadState::Loaded => info!(
                        username = state.store.username.as_deref().unwrap_or_default(),
                        count = state.store.repositories().len(),
                        "Repositories loaded"
                    ),
                    LoadState::Failed(reason) => warn!(
                        username = state.store.username.as_deref().unwrap_or_default(),
                        "Repositories unavailable: {}",
                        reason
                    ),
                    _ => {}
                }

                Self::release_waiters(state);
            }
            BrowserMessage::GetView(reply) => {
                if !reply.is_closed() {
                    let _ = reply.send(BrowserView::from_state(&state.store));
                }
            }
            BrowserMessage::WaitIdle(reply) => {
                state.waiters.push(reply);
                Self::release_waiters(state);
            }
            BrowserMessage::GetStats(reply) => {
                let stats = BrowserStats {
                    fetches_started: state.fetches_started,
                    stale_results_dropped: state.stale_results_dropped,
                    generation: state.store.generation(),
                };
                if !reply.is_closed() {
                    let _ = reply.send(stats);
                }
            }
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }
        info!(
            fetches_started = state.fetches_started,
            "Repository browser stopped"
        );
        Ok(())
    }
}

/// Ask the browser for its current view.
pub async fn current_view(
    browser: &ActorRef<BrowserMessage>,
    timeout: Option<Duration>,
) -> Result<BrowserView> {
    call_browser(browser, BrowserMessage::GetView, timeout).await
}

/// Wait until no fetch is in flight, then return the view.
pub async fn settled_view(
    browser: &ActorRef<BrowserMessage>,
    timeout: Option<Duration>,
) -> Result<BrowserView> {
    call_browser(browser, BrowserMessage::WaitIdle, timeout).await
}

pub async fn browser_stats(
    browser: &ActorRef<BrowserMessage>,
    timeout: Option<Duration>,
) -> Result<BrowserStats> {
    call_browser(browser, BrowserMessage::GetStats, timeout).await
}

async fn call_browser<T, F>(
    browser: &ActorRef<BrowserMessage>,
    build: F,
    timeout: Option<Duration>,
) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(RpcReplyPort<T>) -> BrowserMessage,
{
    match browser.call(build, timeout).await {
        Ok(ractor::rpc::CallResult::Success(value)) => Ok(value),
        Ok(ractor::rpc::CallResult::Timeout) => {
            Err(RepoBrowserError::ActorError("Timed out waiting for the browser".to_string()))
        }
        Ok(ractor::rpc::CallResult::SenderError) => {
            Err(RepoBrowserError::ActorError("Browser dropped the reply".to_string()))
        }
        Err(e) => Err(RepoBrowserError::ActorError(format!(
            "Failed to reach the browser: {}",
            e
        ))),
    }
}
