//! Map initialization: basemap, fire layer and camera.
//!
//! The map is configured once per session: a Carto Positron basemap, the
//! `nfdb` vector tile layer drawn as solid red fill at 50% opacity, and the
//! initial camera over western Canada. The only part that changes afterwards
//! is the fire layer's style, which [`fire_style`] rebuilds from the current
//! filter.

use galileo::layer::raster_tile_layer::{RasterTileLayer, RasterTileLayerBuilder};
use galileo::layer::vector_tile_layer::style::{
    StyleRule, VectorTilePolygonSymbol, VectorTileStyle, VectorTileSymbol,
};
use galileo::layer::vector_tile_layer::{VectorTileLayer, VectorTileLayerBuilder};
use galileo::layer::Layer;
use galileo::tile_schema::{TileIndex, VerticalDirection};
use galileo::{Color, Lod, Map, MapBuilder, TileSchema};
use galileo_types::cartesian::{Point2, Rect};
use galileo_types::geo::Crs;

use crate::error::CnfdbError;
use crate::filter::{FilterExpr, YEAR_MAX, YEAR_MIN, YEAR_PROPERTY};

/// Id of the fire polygon layer. Exactly one layer with this id exists per
/// map instance.
pub const FIRE_LAYER_ID: &str = "nfdb";
/// Source layer name inside the vector tiles.
pub const FIRE_SOURCE_LAYER: &str = "nfdb";
/// Endpoint of the vector tile source serving the fire database.
pub const FIRE_SOURCE_URL: &str = "http://127.0.0.1:3000/nfdb";
/// Carto Positron light basemap tiles.
pub const BASEMAP_URL: &str = "https://basemaps.cartocdn.com/light_all";

/// Initial camera latitude.
pub const MAP_CENTER_LAT: f64 = 55.0;
/// Initial camera longitude.
pub const MAP_CENTER_LON: f64 = -125.0;
/// Initial zoom level.
pub const INITIAL_ZOOM: u32 = 4;

/// Fill color of the fire polygons: `#B30000` at 50% opacity.
pub fn fire_fill_color() -> Color {
    Color::rgba(0xB3, 0x00, 0x00, 0x80)
}

/// Builds the style of the fire layer for the given filter.
///
/// The renderer matches style rules by property equality, so a range filter
/// compiles to one rule per year the filter accepts. Years the filter
/// rejects have no matching rule and their features are not drawn. `None`
/// means no filter: a single rule shows every feature of the source layer.
pub fn fire_style(filter: Option<&FilterExpr>) -> VectorTileStyle {
    let symbol = || {
        VectorTileSymbol::Polygon(VectorTilePolygonSymbol {
            fill_color: fire_fill_color(),
        })
    };

    let rules = match filter {
        None => vec![StyleRule {
            layer_name: Some(FIRE_SOURCE_LAYER.to_string()),
            properties: Default::default(),
            symbol: symbol(),
        }],
        Some(expr) => (YEAR_MIN..=YEAR_MAX)
            .filter(|year| expr.matches_year(*year))
            .map(|year| StyleRule {
                layer_name: Some(FIRE_SOURCE_LAYER.to_string()),
                properties: [(YEAR_PROPERTY.to_string(), year.to_string())]
                    .into_iter()
                    .collect(),
                symbol: symbol(),
            })
            .collect(),
    };

    VectorTileStyle {
        rules,
        ..Default::default()
    }
}

/// Creates the basemap layer.
pub fn basemap_layer() -> Result<RasterTileLayer, CnfdbError> {
    let layer = RasterTileLayerBuilder::new_rest(|index: &TileIndex| {
        format!("{BASEMAP_URL}/{}/{}/{}.png", index.z, index.x, index.y)
    })
    .with_file_cache_checked(".tile_cache")
    .build()?;

    Ok(layer)
}

/// Creates the `nfdb` fire polygon layer with no initial filter.
pub fn fire_layer() -> Result<VectorTileLayer, CnfdbError> {
    let layer = VectorTileLayerBuilder::new_rest(|index: &TileIndex| {
        format!("{FIRE_SOURCE_URL}/{}/{}/{}", index.z, index.x, index.y)
    })
    .with_tile_schema(tile_schema())
    .with_style(fire_style(None))
    .with_file_cache_checked(".tile_cache")
    .build()?;

    Ok(layer)
}

/// Assembles the map with the given layers and the initial camera.
pub fn build_map(basemap: RasterTileLayer, fire_layer: impl Layer + 'static) -> Map {
    MapBuilder::default()
        .with_latlon(MAP_CENTER_LAT, MAP_CENTER_LON)
        .with_z_level(INITIAL_ZOOM)
        .with_layer(basemap)
        .with_layer(fire_layer)
        .build()
}

fn tile_schema() -> TileSchema {
    const ORIGIN: Point2 = Point2::new(-20037508.342787, 20037508.342787);
    const TOP_RESOLUTION: f64 = 156543.03392800014 / 4.0;

    let mut lods = vec![Lod::new(TOP_RESOLUTION, 0).expect("invalid config")];
    for i in 1..16 {
        lods.push(
            Lod::new(lods[(i - 1) as usize].resolution() / 2.0, i).expect("invalid tile schema"),
        );
    }

    TileSchema {
        origin: ORIGIN,
        bounds: Rect::new(
            -20037508.342787,
            -20037508.342787,
            20037508.342787,
            20037508.342787,
        ),
        lods: lods.into_iter().collect(),
        tile_width: 1024,
        tile_height: 1024,
        y_direction: VerticalDirection::TopToBottom,
        crs: Crs::EPSG3857,
    }
}
