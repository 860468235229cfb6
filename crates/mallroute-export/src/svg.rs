//! SVG export serializer.
//!
//! Draws a planned [`Route`] as an overlay for its map image: one
//! `<path>` through every stop in visiting order, plus a numbered marker
//! next to each stop. Route coordinates are normalized, so they are
//! scaled by the map's pixel [`Dimensions`] on the way out.
//!
//! Document construction, XML escaping, and path data formatting are
//! handled by the [`svg`] crate. This is a pure function with no I/O --
//! it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

use mallroute_optimizer::{Route, RouteStop};

/// Route stroke colour.
const ROUTE_COLOR: &str = "#ff6b6b";
/// Sequence marker fill colour.
const MARKER_COLOR: &str = "#ffc107";

/// Map image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Size assumed when the map image size is unknown.
    pub const FALLBACK: Self = Self {
        width: 800,
        height: 600,
    };

    /// The shorter side, which drives stroke and marker sizes.
    #[must_use]
    pub fn base(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    fn scale(self, stop: &RouteStop) -> (f64, f64) {
        (
            stop.x * f64::from(self.width),
            stop.y * f64::from(self.height),
        )
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Metadata to embed in the SVG document.
///
/// All fields are optional. When present, `<title>`, `<desc>`, and
/// `<metadata>` elements are emitted right after the opening `<svg>` tag.
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized optimizer configuration, emitted inside `<metadata>`
    /// wrapped in a namespaced `<mallroute:config>` element, so exported
    /// files record how the route was planned.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string through the route's stops.
///
/// Uses `M` for the first stop and `L` for the rest, scaling normalized
/// coordinates to pixels. Returns an empty string for routes with fewer
/// than 2 stops.
///
/// # Examples
///
/// ```
/// use mallroute_optimizer::{Route, Solution, Waypoint};
/// use mallroute_export::{Dimensions, build_path_data};
///
/// let waypoints = vec![Waypoint::new("A", 0.0, 0.5), Waypoint::new("B", 0.25, 1.0)];
/// let solution = Solution { order: vec![0, 1], length: 0.56 };
/// let route = Route::from_solution(&waypoints, &solution);
/// let d = build_path_data(&route, Dimensions { width: 200, height: 100 });
/// assert_eq!(d, "M0,50 L50,100");
/// ```
#[must_use]
pub fn build_path_data(route: &Route, dimensions: Dimensions) -> String {
    let Some((first, rest)) = route.path.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to(dimensions.scale(first));
    for stop in rest {
        data = data.line_to(dimensions.scale(stop));
    }
    String::from(Value::from(data))
}

/// Serialize a route into an SVG overlay sized to the map image.
///
/// The `viewBox` matches the map's pixel grid so the overlay lines up
/// with the image when stacked. The path is stroked with rounded joins;
/// each stop gets a circled sequence number (1-based) offset up and to
/// the right so it does not cover the stop itself. Stroke width and
/// marker size scale with the shorter image side.
///
/// # Examples
///
/// ```
/// use mallroute_optimizer::{Route, Solution, Waypoint};
/// use mallroute_export::{Dimensions, SvgMetadata, to_svg};
///
/// let waypoints = vec![Waypoint::new("101", 0.1, 0.1), Waypoint::new("102", 0.9, 0.1)];
/// let route = Route::from_solution(&waypoints, &Solution { order: vec![0, 1], length: 0.8 });
/// let metadata = SvgMetadata {
///     title: Some("Level 1"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&route, Dimensions::FALLBACK, &metadata);
/// assert!(svg.contains("<title>Level 1</title>"));
/// assert!(svg.contains("M80,60 L720,60"));
/// ```
#[must_use]
pub fn to_svg(route: &Route, dimensions: Dimensions, metadata: &SvgMetadata<'_>) -> String {
    let w = dimensions.width;
    let h = dimensions.height;
    let base = dimensions.base();

    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", format!("0 0 {w} {h}"));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("mallroute:config");
        config_el.assign("xmlns:mallroute", "https://mallroute.dev/ns/1");
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    let d = build_path_data(route, dimensions);
    if !d.is_empty() {
        let path = Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", ROUTE_COLOR)
            .set("stroke-width", (base * 0.004).max(3.0))
            .set("stroke-linejoin", "round")
            .set("stroke-linecap", "round")
            .set("opacity", 0.9);
        doc = doc.add(path);
    }

    if !route.path.is_empty() {
        let mut markers = Group::new().set("id", "sequence");
        for (i, stop) in route.path.iter().enumerate() {
            markers = markers.add(sequence_marker(i + 1, stop, dimensions));
        }
        doc = doc.add(markers);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Circled sequence number for one stop.
fn sequence_marker(number: usize, stop: &RouteStop, dimensions: Dimensions) -> Group {
    let base = dimensions.base();
    let (x, y) = dimensions.scale(stop);
    let offset = base * 0.02;
    let radius = (base * 0.008).max(6.0);
    let font_size = (base * 0.007).max(6.0);
    let stroke_width = (base * 0.001).max(1.0);

    let circle = Circle::new()
        .set("r", radius)
        .set("fill", MARKER_COLOR)
        .set("stroke", "#fff")
        .set("stroke-width", stroke_width);

    let mut label = Element::new("text");
    label.assign("x", 0);
    label.assign("y", font_size * 0.35);
    label.assign("text-anchor", "middle");
    label.assign("font-size", font_size);
    label.assign("fill", "#000");
    label.append(Text::new(number.to_string()));

    Group::new()
        .set("data-id", stop.id.as_str())
        .set("transform", format!("translate({},{})", x + offset, y - offset))
        .add(circle)
        .add(label)
}
