//! Per-session registry of live map outputs.
//!
//! The original design resolved the live map by string id from ambient
//! session context. Here the mapping is explicit: each session owns a
//! [`MapRegistry`] that maps an output id (the page has a single one,
//! [`MAP_OUTPUT_ID`]) to a [`MapHandle`] once the map output has rendered.
//! Sessions never share registries, so one session's filter state cannot
//! leak into another's map.
//!
//! A session starts in `Uninitialized` and transitions to `MapReady` when the
//! map output registers; every slider change afterwards is a `MapReady`
//! self-loop that only touches the filter field.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::CnfdbError;
use crate::filter::FilterExpr;

/// Id of the single map output of the page.
pub const MAP_OUTPUT_ID: &str = "map";

/// Lifecycle of a session's map output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The map output has not rendered yet; filter commands are dropped.
    Uninitialized,
    /// The map is live and accepts filter updates.
    MapReady,
}

/// Receiver of filter-update commands, implemented by the rendered map
/// layer. Test code substitutes a recording target.
pub trait FilterTarget: Send + Sync {
    /// Replaces the current filter of the layer. `None` shows all features.
    fn set_filter(&self, filter: Option<&FilterExpr>);
}

/// Handle to a live map output of one session.
pub struct MapHandle {
    output_id: String,
    target: Arc<dyn FilterTarget>,
    current_filter: Mutex<Option<FilterExpr>>,
}

impl MapHandle {
    /// Id of the output this handle belongs to.
    pub fn output_id(&self) -> &str {
        &self.output_id
    }

    /// Pushes a filter-update command to the rendered layer and records it
    /// as the current filter.
    pub fn set_filter(&self, filter: Option<FilterExpr>) {
        log::debug!(
            "updating filter of map output '{}': {filter:?}",
            self.output_id
        );
        self.target.set_filter(filter.as_ref());
        *self.current_filter.lock() = filter;
    }

    /// The filter most recently applied to the layer, if any.
    pub fn current_filter(&self) -> Option<FilterExpr> {
        self.current_filter.lock().clone()
    }
}

/// Maps output ids to live map handles for one session.
#[derive(Default)]
pub struct MapRegistry {
    maps: Mutex<HashMap<String, Arc<MapHandle>>>,
    ready: Notify,
}

impl MapRegistry {
    /// Creates an empty registry for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state of the session.
    pub fn state(&self) -> SessionState {
        if self.maps.lock().is_empty() {
            SessionState::Uninitialized
        } else {
            SessionState::MapReady
        }
    }

    /// Registers a rendered map output and wakes up anyone waiting for it.
    pub fn register(&self, output_id: &str, target: Arc<dyn FilterTarget>) -> Arc<MapHandle> {
        let handle = Arc::new(MapHandle {
            output_id: output_id.to_string(),
            target,
            current_filter: Mutex::new(None),
        });

        self.maps
            .lock()
            .insert(output_id.to_string(), handle.clone());
        log::info!("map output '{output_id}' is ready");
        self.ready.notify_waiters();

        handle
    }

    /// Returns the handle for the output, or [`CnfdbError::MapNotReady`] if
    /// the output has not rendered yet.
    pub fn get(&self, output_id: &str) -> Result<Arc<MapHandle>, CnfdbError> {
        self.maps
            .lock()
            .get(output_id)
            .cloned()
            .ok_or_else(|| CnfdbError::MapNotReady(output_id.to_string()))
    }

    /// Resolves once the output is registered. Returns immediately if it
    /// already is.
    pub async fn acquire(&self, output_id: &str) -> Arc<MapHandle> {
        loop {
            let registered = self.ready.notified();
            if let Ok(handle) = self.get(output_id) {
                return handle;
            }

            registered.await;
        }
    }
}
