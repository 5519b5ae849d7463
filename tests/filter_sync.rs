//! End-to-end wiring of slider, bus, effect and map handle, with the rendered
//! layer replaced by a recording target.

use std::sync::Arc;

use cnfdb_map::effect;
use cnfdb_map::filter::{FilterExpr, YearRange};
use cnfdb_map::reactive::ValueBus;
use cnfdb_map::session::{FilterTarget, MapRegistry, SessionState, MAP_OUTPUT_ID};
use parking_lot::Mutex;

#[derive(Default)]
struct RecordingTarget {
    applied: Mutex<Vec<Option<FilterExpr>>>,
}

impl RecordingTarget {
    fn applied(&self) -> Vec<Option<FilterExpr>> {
        self.applied.lock().clone()
    }
}

impl FilterTarget for RecordingTarget {
    fn set_filter(&self, filter: Option<&FilterExpr>) {
        self.applied.lock().push(filter.cloned());
    }
}

/// One wired session: registered map output plus a subscribed filter effect.
struct Session {
    registry: Arc<MapRegistry>,
    target: Arc<RecordingTarget>,
    bus: ValueBus<YearRange>,
}

impl Session {
    fn start() -> Self {
        let registry = Arc::new(MapRegistry::new());
        let target = Arc::new(RecordingTarget::default());
        registry.register(MAP_OUTPUT_ID, target.clone());

        let mut bus = ValueBus::new(YearRange::full());
        let effect_registry = registry.clone();
        bus.subscribe(move |range: &YearRange| {
            effect::apply_year_filter(&effect_registry, *range);
        });

        Self {
            registry,
            target,
            bus,
        }
    }

    fn drag_slider(&mut self, low: u16, high: u16) {
        self.bus
            .publish(YearRange::new(low, high).expect("slider keeps low <= high"));
    }

    fn current_filter(&self) -> Option<FilterExpr> {
        self.registry
            .get(MAP_OUTPUT_ID)
            .expect("session is started")
            .current_filter()
    }
}

#[test]
fn startup_applies_the_default_filter_exactly_once() {
    let session = Session::start();

    assert_eq!(
        session.target.applied(),
        vec![Some(FilterExpr::year_range(YearRange::full()))]
    );
    assert_eq!(session.registry.state(), SessionState::MapReady);
}

#[test]
fn slider_changes_update_the_filter_in_order() {
    let mut session = Session::start();
    session.drag_slider(2000, 2010);
    session.drag_slider(2005, 2005);

    let expected = vec![
        Some(FilterExpr::year_range(YearRange::full())),
        Some(FilterExpr::year_range(
            YearRange::new(2000, 2010).expect("valid range"),
        )),
        Some(FilterExpr::year_range(
            YearRange::new(2005, 2005).expect("valid range"),
        )),
    ];
    assert_eq!(session.target.applied(), expected);
    assert_eq!(
        session.current_filter(),
        Some(FilterExpr::year_range(
            YearRange::new(2005, 2005).expect("valid range")
        ))
    );
}

#[test]
fn sessions_do_not_observe_each_others_filters() {
    let mut session_a = Session::start();
    let session_b = Session::start();

    session_a.drag_slider(2000, 2010);

    assert_eq!(
        session_a.current_filter(),
        Some(FilterExpr::year_range(
            YearRange::new(2000, 2010).expect("valid range")
        ))
    );
    assert_eq!(
        session_b.current_filter(),
        Some(FilterExpr::year_range(YearRange::full()))
    );
    assert_eq!(session_b.target.applied().len(), 1);
}

#[test]
fn updates_before_first_render_are_dropped_then_self_correct() {
    let registry = Arc::new(MapRegistry::new());
    let mut bus = ValueBus::new(YearRange::full());
    let effect_registry = registry.clone();
    bus.subscribe(move |range: &YearRange| {
        effect::apply_year_filter(&effect_registry, *range);
    });

    // No map output yet: both the startup delivery and this change are
    // dropped without failing.
    bus.publish(YearRange::new(1990, 1991).expect("valid range"));
    assert_eq!(registry.state(), SessionState::Uninitialized);

    let target = Arc::new(RecordingTarget::default());
    registry.register(MAP_OUTPUT_ID, target.clone());
    bus.publish(YearRange::new(1992, 1993).expect("valid range"));

    assert_eq!(
        target.applied(),
        vec![Some(FilterExpr::year_range(
            YearRange::new(1992, 1993).expect("valid range")
        ))]
    );
}

#[test]
fn suspended_acquisition_applies_the_filter_after_readiness() {
    let registry = Arc::new(MapRegistry::new());
    let target = Arc::new(RecordingTarget::default());
    registry.register(MAP_OUTPUT_ID, target.clone());

    tokio_test::block_on(effect::apply_year_filter_when_ready(
        &registry,
        YearRange::new(1985, 1986).expect("valid range"),
    ));

    assert_eq!(
        target.applied(),
        vec![Some(FilterExpr::year_range(
            YearRange::new(1985, 1986).expect("valid range")
        ))]
    );
}
