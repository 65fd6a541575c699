//! Dashboard state and its transitions.
//!
//! All UI state lives in [`DashboardState`]. Every mutation is expressed as a
//! [`DashboardEvent`] applied by [`DashboardState::apply`], a pure function of
//! the old state and the event. The controller owns I/O (gateway calls,
//! persistence); this module owns the rules.

use std::fmt;

use stockdash_core::{
    ChangeIndicator, Favorites, ParsedSeries, QuoteSnapshot, RecentSeries, SearchHistory, Symbol,
};

/// Monotonic id tagging one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input to a state transition.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// Persisted lists loaded at startup.
    Restored {
        history: SearchHistory,
        favorites: Favorites,
    },
    /// User edited the symbol field.
    SymbolEdited(String),
    /// Fetch refused before any request (empty symbol).
    ValidationFailed(String),
    /// A fetch attempt began.
    FetchStarted { request_id: RequestId },
    /// A fetch attempt produced data.
    FetchSucceeded {
        request_id: RequestId,
        symbol: Symbol,
        parsed: ParsedSeries,
    },
    /// A fetch attempt failed with a user-visible message.
    FetchFailed {
        request_id: RequestId,
        message: String,
    },
    /// Star / unstar a symbol.
    FavoriteToggled(Symbol),
    /// Forget all searches.
    HistoryCleared,
}

/// Complete dashboard UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// Raw contents of the symbol input.
    pub symbol_input: String,
    /// Symbol whose data is currently displayed.
    pub active_symbol: Option<Symbol>,
    pub quote: Option<QuoteSnapshot>,
    pub series: RecentSeries,
    pub loading: bool,
    /// User-visible error message of the last attempt.
    pub error: Option<String>,
    pub history: SearchHistory,
    pub favorites: Favorites,
    /// Last issued request id (0 = none yet).
    last_request: u64,
    /// Attempt whose result will be accepted.
    pending: Option<RequestId>,
}

impl DashboardState {
    /// Id for the next fetch attempt.
    pub fn next_request_id(&self) -> RequestId {
        RequestId(self.last_request + 1)
    }

    /// Whether a result tagged `request_id` would be applied.
    pub fn is_current(&self, request_id: RequestId) -> bool {
        self.pending == Some(request_id)
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    /// Day-over-day change of the displayed quote.
    pub fn change(&self) -> Option<ChangeIndicator> {
        self.quote.as_ref().and_then(QuoteSnapshot::change)
    }

    /// Whether the displayed symbol is starred.
    pub fn is_active_favorite(&self) -> bool {
        self.active_symbol
            .as_ref()
            .map(|s| self.favorites.contains(s))
            .unwrap_or(false)
    }

    /// Apply one event, returning the next state.
    ///
    /// Completion events for an attempt other than the pending one are
    /// ignored, so a slow response can never overwrite a newer one.
    pub fn apply(mut self, event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::Restored { history, favorites } => {
                self.history = history;
                self.favorites = favorites;
            }
            DashboardEvent::SymbolEdited(input) => {
                self.symbol_input = input;
            }
            DashboardEvent::ValidationFailed(message) => {
                self.error = Some(message);
            }
            DashboardEvent::FetchStarted { request_id } => {
                self.last_request = self.last_request.max(request_id.0);
                self.pending = Some(request_id);
                self.active_symbol = None;
                self.quote = None;
                self.series = RecentSeries::default();
                self.error = None;
                self.loading = true;
            }
            DashboardEvent::FetchSucceeded {
                request_id,
                symbol,
                parsed,
            } => {
                if !self.is_current(request_id) {
                    return self;
                }
                self.pending = None;
                self.loading = false;
                self.quote = Some(parsed.snapshot);
                self.series = parsed.series;
                self.history.record(symbol.clone());
                self.active_symbol = Some(symbol);
            }
            DashboardEvent::FetchFailed {
                request_id,
                message,
            } => {
                if !self.is_current(request_id) {
                    return self;
                }
                self.pending = None;
                self.loading = false;
                self.error = Some(message);
            }
            DashboardEvent::FavoriteToggled(symbol) => {
                self.favorites.toggle(symbol);
            }
            DashboardEvent::HistoryCleared => {
                self.history.clear();
            }
        }
        self
    }
}
