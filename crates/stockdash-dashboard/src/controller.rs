//! Dashboard controller.
//!
//! Owns the [`DashboardState`] behind a mutex, performs gateway calls and
//! persistence, and feeds every change through [`DashboardState::apply`].

use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Url;
use serde_json::Value;
use stockdash_core::{parse_daily_series, CoreError, Favorites, ParsedSeries, SearchHistory, Symbol};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult, StoreResult};
use crate::gateway_client::{GatewayReply, QuoteGateway};
use crate::state::{DashboardEvent, DashboardState};
use crate::store::{load_json, save_json, KeyValueStore, FAVORITES_KEY, HISTORY_KEY};

/// Query parameter carrying the initial symbol.
pub const SYMBOL_PARAM: &str = "symbol";

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result was applied to the state.
    Applied,
    /// A newer fetch started meanwhile; result discarded.
    Stale,
}

/// CSV export of the displayed series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name, `<SYMBOL>_stock_data.csv`.
    pub file_name: String,
    pub contents: String,
}

/// Dashboard controller.
pub struct Controller<G, S> {
    gateway: G,
    store: S,
    config: DashboardConfig,
    state: Mutex<DashboardState>,
}

impl<G, S> Controller<G, S>
where
    G: QuoteGateway,
    S: KeyValueStore,
{
    /// Create a controller, restoring history and favorites from `store`.
    pub fn new(gateway: G, store: S, config: DashboardConfig) -> Self {
        let history: SearchHistory = load_json(&store, HISTORY_KEY);
        let favorites: Favorites = load_json(&store, FAVORITES_KEY);

        info!(
            history = history.len(),
            favorites = favorites.len(),
            "Restored dashboard lists"
        );

        let state = DashboardState::default().apply(DashboardEvent::Restored { history, favorites });

        Self {
            gateway,
            store,
            config,
            state: Mutex::new(state),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> DashboardState {
        self.state.lock().clone()
    }

    /// Replace the symbol input.
    pub fn set_symbol(&self, input: impl Into<String>) {
        let mut state = self.state.lock();
        let _ = self.dispatch(&mut state, DashboardEvent::SymbolEdited(input.into()));
    }

    /// Fetch data for the current symbol input.
    ///
    /// Returns `Err` for validation failures and for failures of the latest
    /// attempt; the message is also stored in the state. A result that lost
    /// the race against a newer fetch yields `Ok(FetchOutcome::Stale)`.
    pub async fn fetch(&self) -> DashboardResult<FetchOutcome> {
        let (symbol, request_id) = {
            let mut state = self.state.lock();
            let symbol = match Symbol::new(&state.symbol_input) {
                Ok(symbol) => symbol,
                Err(_) => {
                    let error = DashboardError::Validation;
                    let _ =
                        self.dispatch(&mut state, DashboardEvent::ValidationFailed(error.to_string()));
                    return Err(error);
                }
            };
            let request_id = state.next_request_id();
            let _ = self.dispatch(&mut state, DashboardEvent::FetchStarted { request_id });
            (symbol, request_id)
        };

        info!(symbol = %symbol, request_id = %request_id, "Fetching quote");

        let result = match self.gateway.fetch_stock(&symbol).await {
            Ok(reply) => interpret_reply(&symbol, &reply),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock();
        if !state.is_current(request_id) {
            debug!(
                symbol = %symbol,
                request_id = %request_id,
                pending = ?state.pending_request(),
                "Discarding stale fetch result"
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(parsed) => {
                debug!(symbol = %symbol, bars = parsed.series.len(), "Quote fetched");
                // History persist failure is logged; the fetch still succeeds
                let _ = self.dispatch(
                    &mut state,
                    DashboardEvent::FetchSucceeded {
                        request_id,
                        symbol,
                        parsed,
                    },
                );
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Fetch failed");
                let _ = self.dispatch(
                    &mut state,
                    DashboardEvent::FetchFailed {
                        request_id,
                        message: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Star or unstar `symbol`. Returns whether it is now a favorite.
    pub fn toggle_favorite(&self, symbol: &Symbol) -> DashboardResult<bool> {
        let mut state = self.state.lock();
        self.dispatch(&mut state, DashboardEvent::FavoriteToggled(symbol.clone()))?;
        let now_favorite = state.favorites.contains(symbol);
        info!(symbol = %symbol, favorite = now_favorite, "Favorite toggled");
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, symbol: &Symbol) -> bool {
        self.state.lock().favorites.contains(symbol)
    }

    pub fn clear_history(&self) -> DashboardResult<()> {
        let mut state = self.state.lock();
        self.dispatch(&mut state, DashboardEvent::HistoryCleared)?;
        Ok(())
    }

    /// CSV of the displayed series, `None` when nothing is displayed.
    pub fn export_csv(&self) -> Option<CsvExport> {
        let state = self.state.lock();
        let symbol = state.active_symbol.as_ref()?;
        let contents = state.series.to_csv()?;

        Some(CsvExport {
            file_name: format!("{symbol}_stock_data.csv"),
            contents,
        })
    }

    /// Apply `event` and persist whichever list it changed.
    ///
    /// The state change is kept even if persisting fails.
    fn dispatch(&self, state: &mut DashboardState, event: DashboardEvent) -> StoreResult<()> {
        let history_before = state.history.clone();
        let favorites_before = state.favorites.clone();

        *state = std::mem::take(state).apply(event);

        if state.history != history_before {
            self.persist(HISTORY_KEY, &state.history)?;
        }
        if state.favorites != favorites_before {
            self.persist(FAVORITES_KEY, &state.favorites)?;
        }
        Ok(())
    }

    fn persist<T: serde::Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        save_json(&self.store, key, value).map_err(|e| {
            warn!(key, error = %e, "Failed to persist dashboard list");
            e
        })
    }
}

impl<G, S> Controller<G, S>
where
    G: QuoteGateway + 'static,
    S: KeyValueStore + 'static,
{
    /// Initial load: adopt `?symbol=` from `page_url` and fetch it after the
    /// configured delay. Returns `None` when the URL carries no symbol.
    pub fn start(self: &Arc<Self>, page_url: &str) -> Option<JoinHandle<DashboardResult<FetchOutcome>>> {
        let symbol = initial_symbol(page_url)?;
        self.set_symbol(symbol);

        let controller = Arc::clone(self);
        let delay = self.config.initial_fetch_delay();
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.fetch().await
        }))
    }
}

/// The `symbol` query parameter of `page_url`, if present and non-empty.
pub fn initial_symbol(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url)
        .map_err(|e| debug!(page_url, error = %e, "Ignoring unparseable page URL"))
        .ok()?;

    url.query_pairs()
        .find(|(key, _)| key == SYMBOL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Turn a gateway reply into parsed data or a user-facing error.
fn interpret_reply(symbol: &Symbol, reply: &GatewayReply) -> DashboardResult<ParsedSeries> {
    if !reply.is_success() {
        return Err(DashboardError::NoData {
            symbol: symbol.clone(),
            detail: reply.error_message(),
        });
    }

    let payload: Value =
        serde_json::from_str(&reply.body).map_err(|e| DashboardError::Fetch(e.to_string()))?;

    parse_daily_series(&payload).map_err(|e| match e {
        CoreError::MissingTimeSeries => DashboardError::NoData {
            symbol: symbol.clone(),
            detail: None,
        },
        other => DashboardError::Fetch(other.to_string()),
    })
}
