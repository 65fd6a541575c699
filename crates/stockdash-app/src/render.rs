//! Terminal rendering of the dashboard state.

use std::fmt::Write;

use stockdash_core::{DailyBar, Direction};
use stockdash_dashboard::DashboardState;

const RESET: &str = "\x1b[0m";

fn ansi(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "\x1b[32m",
        Direction::Down => "\x1b[31m",
        Direction::Flat => "\x1b[90m",
    }
}

/// Render the summary card, price table and symbol lists.
///
/// `color` enables ANSI coloring of the change indicator.
pub fn render_dashboard(state: &DashboardState, color: bool) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        let _ = writeln!(out, "{error}");
    }

    if let (Some(symbol), Some(quote)) = (&state.active_symbol, &state.quote) {
        let star = if state.is_active_favorite() { "★" } else { "☆" };
        let _ = writeln!(out, "{star} {symbol}  {}", quote.date());

        let mut price_line = format!("  Close {}", quote.close());
        if let Some(change) = state.change() {
            if color {
                let _ = write!(price_line, "  {}{change}{RESET}", ansi(change.direction));
            } else {
                let _ = write!(price_line, "  {change}");
            }
        }
        let _ = writeln!(out, "{price_line}");
        let _ = writeln!(
            out,
            "  Open {}  High {}  Low {}  Volume {}",
            quote.latest.open, quote.latest.high, quote.latest.low, quote.latest.volume
        );
    }

    if !state.series.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for bar in state.series.bars() {
            let _ = writeln!(out, "{}", table_row(bar));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Favorites: {}", join_symbols(state.favorites.symbols()));
    let _ = writeln!(out, "Recent:    {}", join_symbols(state.history.symbols()));
    out
}

fn table_row(bar: &DailyBar) -> String {
    format!(
        "{:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}",
        bar.date.to_string(),
        bar.open.to_string(),
        bar.high.to_string(),
        bar.low.to_string(),
        bar.close.to_string(),
        bar.volume
    )
}

fn join_symbols<T: std::fmt::Display>(symbols: &[T]) -> String {
    if symbols.is_empty() {
        return "-".to_string();
    }
    symbols
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
