//! Error type of the viewer.

use thiserror::Error;

/// Errors that can occur while setting up or driving the map.
#[derive(Debug, Error)]
pub enum CnfdbError {
    /// A map layer could not be constructed.
    #[error("failed to build map layer: {0}")]
    Layer(#[from] galileo::error::GalileoError),

    /// A filter command was issued before the map output was initialized for
    /// the session. The update is dropped and re-applied on the next slider
    /// change.
    #[error("no map output with id '{0}' exists for this session")]
    MapNotReady(String),

    /// A year pair violating `low <= high`. The slider widget never produces
    /// such a pair, but the constructor still rejects it.
    #[error("invalid year range: {low} > {high}")]
    InvalidYearRange {
        /// Lower bound of the rejected pair.
        low: u16,
        /// Upper bound of the rejected pair.
        high: u16,
    },
}
