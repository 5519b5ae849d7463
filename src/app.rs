//! egui application: page layout and reactive wiring.
//!
//! The page is a sidebar with the year slider and a main region filled by the
//! map output. Slider changes go through the session's [`ValueBus`]; the
//! subscribed filter effect pushes the new filter to the `nfdb` layer.

use std::sync::Arc;

use galileo::layer::vector_tile_layer::VectorTileLayer;
use galileo_egui::{EguiMap, EguiMapState};
use galileo_types::cartesian::Point2;
use parking_lot::RwLock;

use crate::effect;
use crate::filter::{FilterExpr, YearRange, YEAR_MAX, YEAR_MIN};
use crate::layers::fire_style;
use crate::reactive::ValueBus;
use crate::session::{FilterTarget, MapRegistry, MAP_OUTPUT_ID};

/// Id of the year slider control.
pub const YEAR_SLIDER_ID: &str = "year_slider";

/// Shared handle to the fire polygon layer, kept alongside the map so the
/// filter effect and the tooltip can reach it after the map takes ownership
/// of the layer list.
pub type SharedFireLayer = Arc<RwLock<VectorTileLayer>>;

/// Applies filter commands to the rendered fire layer by rebuilding its
/// style.
pub struct FireLayerTarget {
    layer: SharedFireLayer,
}

impl FireLayerTarget {
    /// Wraps the shared fire layer.
    pub fn new(layer: SharedFireLayer) -> Self {
        Self { layer }
    }
}

impl FilterTarget for FireLayerTarget {
    fn set_filter(&self, filter: Option<&FilterExpr>) {
        self.layer.write().update_style(fire_style(filter));
    }
}

/// The viewer application. One instance per window, which is one session.
pub struct CnfdbApp {
    map: EguiMapState,
    fire_layer: SharedFireLayer,
    registry: Arc<MapRegistry>,
    bus: ValueBus<YearRange>,
    slider: YearRange,
    feature_info: Option<String>,
    title_set: bool,
}

impl CnfdbApp {
    /// Wires the rendered map into a new session: registers the map output,
    /// then subscribes the filter effect, which applies the default filter
    /// exactly once before the first frame.
    pub fn new(map: EguiMapState, fire_layer: SharedFireLayer) -> Self {
        let registry = Arc::new(MapRegistry::new());
        registry.register(
            MAP_OUTPUT_ID,
            Arc::new(FireLayerTarget::new(fire_layer.clone())),
        );

        let mut bus = ValueBus::new(YearRange::full());
        let effect_registry = registry.clone();
        bus.subscribe(move |range: &YearRange| {
            effect::apply_year_filter(&effect_registry, *range);
        });

        Self {
            map,
            fire_layer,
            registry,
            bus,
            slider: YearRange::full(),
            feature_info: None,
            title_set: false,
        }
    }

    /// The session's registry. Exposed for the binary and for tests.
    pub fn registry(&self) -> &Arc<MapRegistry> {
        &self.registry
    }

    fn year_slider(&mut self, ui: &mut egui::Ui) {
        ui.label("Filter by Year:");

        let mut low = self.slider.low();
        let mut high = self.slider.high();
        let (low_changed, high_changed) = ui
            .push_id(YEAR_SLIDER_ID, |ui| {
                let low_changed = ui
                    .add(egui::Slider::new(&mut low, YEAR_MIN..=YEAR_MAX).text("from"))
                    .changed();
                let high_changed = ui
                    .add(egui::Slider::new(&mut high, YEAR_MIN..=YEAR_MAX).text("to"))
                    .changed();
                (low_changed, high_changed)
            })
            .inner;

        if !low_changed && !high_changed {
            return;
        }

        // Dragging one handle past the other pushes the other along, so
        // low <= high at all times.
        if low_changed && low > high {
            high = low;
        }
        if high_changed && high < low {
            low = high;
        }

        if let Ok(range) = YearRange::new(low, high) {
            self.slider = range;
            self.bus.publish(range);
        }
    }

    fn show_feature_info(&mut self, ui: &egui::Ui, map_rect: egui::Rect) {
        if !ui.input(|i| i.pointer.primary_clicked()) {
            return;
        }

        let Some(pointer) = ui.input(|i| i.pointer.interact_pos()) else {
            return;
        };
        if !map_rect.contains(pointer) {
            return;
        }

        let screen_position = Point2::new(
            (pointer.x - map_rect.min.x) as f64,
            (pointer.y - map_rect.min.y) as f64,
        );

        let view = self.map.map().view().clone();
        let Some(map_position) = view.screen_to_map(screen_position) else {
            return;
        };

        let mut lines = Vec::new();
        for (layer_name, feature) in self
            .fire_layer
            .read()
            .get_features_at(&map_position, &view)
        {
            lines.push(format!("[{layer_name}]"));
            for (name, value) in &feature.properties {
                lines.push(format!("{name}: {value:?}"));
            }
        }

        self.feature_info = if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        };
    }
}

impl eframe::App for CnfdbApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.title_set {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(
                "Canadian National Fire Database (CNFDB)".to_string(),
            ));
            self.title_set = true;
        }

        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Canadian National Fire Database");
                ui.separator();
                self.year_slider(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let map_rect = ui.max_rect();
                EguiMap::new(&mut self.map).show_ui(ui);
                self.show_feature_info(ui, map_rect);
            });

        if let Some(info) = self.feature_info.clone() {
            let mut open = true;
            egui::Window::new("Fire details")
                .open(&mut open)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(info);
                });
            if !open {
                self.feature_info = None;
            }
        }
    }
}
