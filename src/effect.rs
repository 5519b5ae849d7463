//! The reactive binding from the slider value to the map filter.
//!
//! Registered as an observer of the slider bus. Each delivery resolves the
//! session's map handle and pushes `AND(YEAR >= low, YEAR <= high)` to the
//! `nfdb` layer.

use crate::filter::{FilterExpr, YearRange};
use crate::session::{MapRegistry, MAP_OUTPUT_ID};

/// Applies the year filter to the session's map.
///
/// If the map output has not rendered yet the update is dropped; the state is
/// transient and self-correcting, since subscribing after registration
/// re-delivers the current slider value.
pub fn apply_year_filter(registry: &MapRegistry, range: YearRange) {
    match registry.get(MAP_OUTPUT_ID) {
        Ok(handle) => handle.set_filter(Some(FilterExpr::year_range(range))),
        Err(err) => log::debug!("dropping filter update for {range:?}: {err}"),
    }
}

/// Like [`apply_year_filter`], but suspends until the map output is ready
/// instead of dropping the update.
pub async fn apply_year_filter_when_ready(registry: &MapRegistry, range: YearRange) {
    let handle = registry.acquire(MAP_OUTPUT_ID).await;
    handle.set_filter(Some(FilterExpr::year_range(range)));
}
