//! Drives the page state: issues release fetches and feeds their results
//! back through the reducer.

use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::github::{Channel, GetRelease, GitHubRepo};
use crate::http::ApiError;

use super::state::{Effect, Event, PageState};

/// Owner of a [`PageState`].
///
/// Fetches run as tokio tasks and report back over a channel; their results
/// only reach the state through [`PageState::apply`], which drops responses
/// to superseded requests.
pub struct ReleaseController<G: GetRelease + 'static> {
    state: PageState,
    github: Arc<G>,
    repo: GitHubRepo,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    in_flight: usize,
}

impl<G: GetRelease + 'static> ReleaseController<G> {
    pub fn new(github: G, repo: GitHubRepo, state: PageState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            github: Arc::new(github),
            repo,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn into_state(self) -> PageState {
        self.state
    }

    /// Apply `event`. Fetches are started here; any other effect is handed
    /// back to the caller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: Event) -> Option<Effect> {
        if matches!(event, Event::FetchCompleted { .. }) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        match self.state.apply(event)? {
            Effect::Fetch { request, channel } => {
                self.spawn_fetch(request, channel);
                None
            }
            effect => Some(effect),
        }
    }

    fn spawn_fetch(&mut self, request: u64, channel: Channel) {
        debug!("Starting request {} for {} release", request, channel);

        let github = Arc::clone(&self.github);
        let repo = self.repo.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = github
                .get_release(&repo, channel)
                .await
                .map_err(|e| error_message(&e));
            if let Err(message) = &result {
                warn!("Error loading {} release: {}", channel, message);
            }
            // The controller may be gone already; nobody is left to care.
            let _ = tx.send(Event::FetchCompleted { request, result });
        });
    }

    /// Wait for one fetch to finish and apply its result.
    ///
    /// Returns `false` without waiting when no fetch is running.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Wait until the current request has resolved.
    #[tracing::instrument(skip(self))]
    pub async fn settle(&mut self) -> &PageState {
        while self.state.is_loading() {
            if !self.next_completion().await {
                break;
            }
        }
        &self.state
    }
}

/// Message shown for a failed fetch: the API's own message when the server
/// sent one, otherwise the full error chain.
fn error_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ApiError>() {
        Some(api_error) => api_error.to_string(),
        None => format!("{:#}", error),
    }
}
