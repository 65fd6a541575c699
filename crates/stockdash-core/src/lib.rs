//! Core domain types for the stockdash quote dashboard.
//!
//! This crate provides the types shared by the gateway and the dashboard
//! controller:
//! - `Symbol`: normalized ticker identifier
//! - `DailyBar`, `QuoteSnapshot`, `RecentSeries`: parsed daily time series
//! - `ChangeIndicator`: derived day-over-day change display
//! - `SearchHistory`, `Favorites`: the two user-maintained symbol lists

pub mod change;
pub mod error;
pub mod series;
pub mod symbol;
pub mod watchlist;

pub use change::{ChangeIndicator, Direction};
pub use error::{CoreError, Result};
pub use series::{
    parse_daily_series, DailyBar, ParsedSeries, QuoteSnapshot, RecentSeries, CSV_HEADER,
    RECENT_SERIES_LEN, TIME_SERIES_KEY,
};
pub use symbol::Symbol;
pub use watchlist::{Favorites, SearchHistory, SEARCH_HISTORY_LIMIT};
