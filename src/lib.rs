//! Interactive map viewer for the Canadian National Fire Database (CNFDB).
//!
//! The viewer renders a light basemap with an overlay of fire-occurrence
//! polygons served as vector tiles, and keeps the displayed polygons in sync
//! with a year-range slider. Map rendering and tile fetching are delegated to
//! the `galileo` engine; this crate only declares the page layout, the initial
//! map configuration and one reactive binding from the slider value to the
//! fire layer's filter.
//!
//! The wiring is explicit rather than framework-implicit:
//!
//! * [`reactive::ValueBus`] delivers slider changes to registered observers,
//! * [`session::MapRegistry`] maps the `"map"` output id to the live map
//!   handle of the session,
//! * [`effect::apply_year_filter`] pushes the resulting filter expression to
//!   the `nfdb` layer.

pub mod app;
pub mod effect;
pub mod error;
pub mod filter;
pub mod layers;
pub mod reactive;
pub mod session;
