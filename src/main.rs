//! Entry point of the CNFDB viewer.

use std::sync::Arc;

use cnfdb_map::app::{CnfdbApp, SharedFireLayer};
use cnfdb_map::layers;
use parking_lot::RwLock;

fn main() {
    // The windowing init may install its own logger; ignore a second init.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();

    run().expect("failed to start the CNFDB viewer");
}

fn run() -> anyhow::Result<()> {
    let fire_layer: SharedFireLayer = Arc::new(RwLock::new(layers::fire_layer()?));
    let basemap = layers::basemap_layer()?;
    let map = layers::build_map(basemap, fire_layer.clone());

    galileo_egui::InitBuilder::new(map)
        .with_app_builder(move |map_state| Box::new(CnfdbApp::new(map_state, fire_layer)))
        .init()
        .map_err(|err| anyhow::anyhow!("failed to initialize map window: {err:?}"))?;

    Ok(())
}
