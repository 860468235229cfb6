//! mallroute-export: Pure route serializers (sans-IO)
//!
//! Renders planned routes for display over a map image. Currently
//! supports SVG.

pub mod svg;

pub use svg::{Dimensions, SvgMetadata, build_path_data, to_svg};
