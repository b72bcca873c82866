//! Search state controller.
//!
//! A single actor task owns the [`SearchState`] and is its only writer;
//! everyone else sends commands through a [`SearchHandle`] and observes
//! read-only snapshots over a watch channel. The actor also owns the
//! debounce timer and the request sequence counter, so keystroke
//! coalescing and stale-response discarding both live in one place.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::{
    error::ResolveError,
    fallback::FallbackChain,
    model::WeatherRecord,
    store::KvStore,
    validate::{ValidationError, validate_city},
};

/// How long the raw query must sit unchanged before it becomes the
/// debounced query.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Cap on the recent-searches list.
pub const MAX_RECENT_SEARCHES: usize = 5;

const RECENT_SEARCHES_KEY: &str = "recent_searches";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot exposed to the view layer.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Raw input, updated on every keystroke.
    pub query: String,
    /// Lags `query` by the debounce delay.
    pub debounced_query: String,
    pub status: SearchStatus,
    pub current_weather: Option<WeatherRecord>,
    pub error_message: Option<String>,
    /// Most-recent-first, case-insensitively deduplicated, at most
    /// [`MAX_RECENT_SEARCHES`] entries.
    pub recent_searches: Vec<String>,
}

#[derive(Debug)]
enum Command {
    SetQuery(String),
    Submit(String),
    ClearError,
    RemoveRecent(String),
    ClearRecent,
}

type FetchOutcome = (u64, Result<WeatherRecord, ResolveError>);

/// Cloneable front door to the controller actor.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
}

impl SearchHandle {
    /// Spawn a controller with the standard 500 ms debounce.
    pub fn spawn(chain: FallbackChain, store: Box<dyn KvStore>) -> Self {
        Self::spawn_with_delay(chain, store, DEBOUNCE_DELAY)
    }

    pub fn spawn_with_delay(
        chain: FallbackChain,
        store: Box<dyn KvStore>,
        debounce: Duration,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let initial = SearchState {
            recent_searches: load_recent(store.as_ref()),
            ..SearchState::default()
        };
        let (state_tx, state_rx) = watch::channel(initial.clone());

        let controller = Controller {
            state: initial,
            chain: Arc::new(chain),
            store,
            debounce,
            seq: 0,
            state_tx,
        };
        tokio::spawn(controller.run(command_rx));

        Self { commands: command_tx, state: state_rx }
    }

    /// Record a keystroke. Arms (or re-arms) the debounce timer.
    pub fn set_query(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::SetQuery(text.into()));
    }

    /// Search immediately, bypassing the debounce wait.
    pub fn submit_query(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::Submit(text.into()));
    }

    pub fn clear_error(&self) {
        let _ = self.commands.send(Command::ClearError);
    }

    pub fn remove_recent_search(&self, city: impl Into<String>) {
        let _ = self.commands.send(Command::RemoveRecent(city.into()));
    }

    pub fn clear_recent_searches(&self) {
        let _ = self.commands.send(Command::ClearRecent);
    }

    /// Latest published snapshot.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// A dedicated receiver for callers that want to react to every
    /// snapshot.
    pub fn watch(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    /// Wait until a published snapshot satisfies `predicate` and return it.
    pub async fn wait_until(&self, predicate: impl Fn(&SearchState) -> bool) -> SearchState {
        let mut rx = self.state.clone();
        loop {
            {
                let state = rx.borrow_and_update();
                if predicate(&state) {
                    return state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    /// Submit `text` and wait for the attempt to settle. `text` must be
    /// non-empty after trimming, otherwise the submission is a no-op and
    /// this call would wait forever.
    pub async fn submit_and_wait(&self, text: impl Into<String>) -> SearchState {
        let mut rx = self.state.clone();
        rx.mark_unchanged();
        self.submit_query(text);
        loop {
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
            let state = rx.borrow_and_update().clone();
            if state.status != SearchStatus::Loading {
                return state;
            }
        }
    }
}

struct Controller {
    state: SearchState,
    chain: Arc<FallbackChain>,
    store: Box<dyn KvStore>,
    debounce: Duration,
    seq: u64,
    state_tx: watch::Sender<SearchState>,
}

impl Controller {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let (result_tx, mut results) = mpsc::unbounded_channel::<FetchOutcome>();
        let mut debounce_deadline: Option<Instant> = None;
        let mut pending_debounce: Option<String> = None;

        loop {
            let deadline = debounce_deadline;
            let debounce_timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        // every handle dropped; shut the actor down
                        break;
                    };
                    match command {
                        Command::SetQuery(text) => {
                            self.state.query = text.clone();
                            pending_debounce = Some(text);
                            debounce_deadline = Some(Instant::now() + self.debounce);
                            self.publish();
                        }
                        Command::Submit(text) => self.start_submit(text, &result_tx),
                        Command::ClearError => {
                            self.state.error_message = None;
                            self.publish();
                        }
                        Command::RemoveRecent(city) => {
                            self.state.recent_searches.retain(|c| !c.eq_ignore_ascii_case(&city));
                            self.persist_recent();
                            self.publish();
                        }
                        Command::ClearRecent => {
                            self.state.recent_searches.clear();
                            self.persist_recent();
                            self.publish();
                        }
                    }
                }
                () = debounce_timer => {
                    debounce_deadline = None;
                    if let Some(text) = pending_debounce.take() {
                        if text != self.state.debounced_query {
                            self.state.debounced_query = text.clone();
                            self.publish();
                            if !text.trim().is_empty() {
                                self.start_submit(text, &result_tx);
                            }
                        }
                    }
                }
                Some((seq, outcome)) = results.recv() => {
                    if seq == self.seq {
                        self.apply_outcome(outcome);
                    } else {
                        tracing::debug!(seq, latest = self.seq, "discarding stale weather response");
                    }
                }
            }
        }
    }

    fn start_submit(&mut self, text: String, result_tx: &mpsc::UnboundedSender<FetchOutcome>) {
        match validate_city(&text) {
            // an empty submission is a no-op, not an error
            Err(ValidationError::Empty) => return,
            Err(err) => {
                self.state.status = SearchStatus::Error;
                self.state.error_message = Some(err.to_string());
                self.publish();
                return;
            }
            Ok(()) => {}
        }

        self.seq += 1;
        let seq = self.seq;

        self.state.status = SearchStatus::Loading;
        self.state.current_weather = None;
        self.state.error_message = None;
        self.publish();

        let chain = Arc::clone(&self.chain);
        let results = result_tx.clone();
        let city = text.trim().to_owned();
        tokio::spawn(async move {
            let outcome = chain.resolve(&city).await;
            // the actor may already be gone; nothing to do then
            let _ = results.send((seq, outcome));
        });
    }

    fn apply_outcome(&mut self, outcome: Result<WeatherRecord, ResolveError>) {
        match outcome {
            Ok(record) => {
                self.push_recent(record.city_name.clone());
                self.state.status = SearchStatus::Success;
                self.state.current_weather = Some(record);
                self.state.error_message = None;
            }
            Err(err) => {
                self.state.status = SearchStatus::Error;
                self.state.error_message = Some(err.to_string());
                self.state.current_weather = None;
            }
        }
        self.publish();
    }

    fn push_recent(&mut self, city_name: String) {
        self.state.recent_searches.retain(|c| !c.eq_ignore_ascii_case(&city_name));
        self.state.recent_searches.insert(0, city_name);
        self.state.recent_searches.truncate(MAX_RECENT_SEARCHES);
        self.persist_recent();
    }

    fn persist_recent(&mut self) {
        match serde_json::to_string(&self.state.recent_searches) {
            Ok(json) => self.store.set(RECENT_SEARCHES_KEY, &json),
            Err(err) => tracing::warn!(error = %err, "could not serialize recent searches"),
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

fn load_recent(store: &dyn KvStore) -> Vec<String> {
    store
        .get(RECENT_SEARCHES_KEY)
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn recent_searches_load_from_the_store() {
        let mut store = MemoryStore::new();
        store.set(RECENT_SEARCHES_KEY, "[\"Tokyo\",\"Paris\"]");
        assert_eq!(load_recent(&store), vec!["Tokyo", "Paris"]);
    }

    #[test]
    fn missing_or_corrupt_store_values_load_empty() {
        let mut store = MemoryStore::new();
        assert!(load_recent(&store).is_empty());

        store.set(RECENT_SEARCHES_KEY, "{broken");
        assert!(load_recent(&store).is_empty());
    }
}
