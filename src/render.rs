//! Figure descriptors for the globe and the destination map.
//!
//! The structs serialize to the `{data, layout}` shape plotly.js expects, so the
//! page can hand them to `Plotly.react` unchanged.

use crate::types::Marker;
use serde::Serialize;

pub const GLOBE_TITLE: &str = "Click a spot on the globe to see reachable destinations";
pub const MAP_TITLE_PREFIX: &str = "Destinations you can reach from ";

const MARKER_COLOR: &str = "#fc197f";
const MARKER_OUTLINE: &str = "#fce702";
// Transparency keeps dense clusters readable
const MARKER_OPACITY: f64 = 0.6;
const GLOBE_MARKER_SIZE: f64 = 8.0;
const MAP_MARKER_SIZE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<ScatterGeo>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGeo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub hoverinfo: &'static str,
    pub hovertext: Vec<String>,
    pub mode: &'static str,
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub symbol: &'static str,
    pub color: &'static str,
    pub opacity: f64,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub hovermode: &'static str,
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
    pub geo: GeoLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayout {
    pub showland: bool,
    pub showcountries: bool,
    pub showocean: bool,
    pub showlakes: bool,
    pub countrywidth: f64,
    pub landcolor: &'static str,
    pub countrycolor: &'static str,
    pub oceancolor: &'static str,
    pub lakecolor: &'static str,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotation {
    pub lon: f64,
    pub lat: f64,
    pub roll: f64,
}

impl Figure {
    pub fn markers(&self) -> Vec<Marker> {
        self.data
            .first()
            .map(|trace| {
                trace
                    .lat
                    .iter()
                    .zip(&trace.lon)
                    .zip(&trace.hovertext)
                    .map(|((lat, lon), text)| Marker { lat: *lat, lon: *lon, text: text.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn globe_figure(origins: &[Marker]) -> Figure {
    Figure {
        data: vec![scatter(origins, GLOBE_MARKER_SIZE)],
        layout: Layout {
            title: Title { text: GLOBE_TITLE.to_string() },
            hovermode: "closest",
            width: 580,
            height: 580,
            margin: Margin { l: 10, r: 10, b: 10, t: 40 },
            font: font(),
            paper_bgcolor: Some("rgba(0,0,0,0)"),
            plot_bgcolor: Some("rgba(0,0,0,0)"),
            geo: geo_layout(Projection {
                kind: "orthographic",
                rotation: Some(Rotation { lon: 10.0, lat: 30.0, roll: 0.0 }),
            }),
        },
    }
}

/// Destination map for `origin_name`. The title carries the name verbatim,
/// empty before the first click.
pub fn map_figure(origin_name: &str, destinations: &[Marker]) -> Figure {
    Figure {
        data: vec![scatter(destinations, MAP_MARKER_SIZE)],
        layout: Layout {
            title: Title { text: map_title(origin_name) },
            hovermode: "closest",
            width: 800,
            height: 550,
            margin: Margin { l: 40, r: 40, b: 10, t: 40 },
            font: font(),
            paper_bgcolor: None,
            plot_bgcolor: None,
            geo: geo_layout(Projection { kind: "miller", rotation: None }),
        },
    }
}

pub fn map_title(origin_name: &str) -> String {
    format!("{}{}", MAP_TITLE_PREFIX, origin_name)
}

fn scatter(markers: &[Marker], size: f64) -> ScatterGeo {
    ScatterGeo {
        kind: "scattergeo",
        lat: markers.iter().map(|m| m.lat).collect(),
        lon: markers.iter().map(|m| m.lon).collect(),
        hoverinfo: "text", // hide raw coordinates on hover
        hovertext: markers.iter().map(|m| m.text.clone()).collect(),
        mode: "markers",
        marker: MarkerStyle {
            size,
            symbol: "circle",
            color: MARKER_COLOR,
            opacity: MARKER_OPACITY,
            line: LineStyle { width: 0.7, color: MARKER_OUTLINE },
        },
    }
}

fn font() -> Font {
    Font { family: "Garamond EB", size: 18, color: "#535a82" }
}

fn geo_layout(projection: Projection) -> GeoLayout {
    GeoLayout {
        showland: true,
        showcountries: true,
        showocean: true,
        showlakes: true,
        countrywidth: 0.8,
        landcolor: "#f7ede8",
        countrycolor: "#b1ceba",
        oceancolor: "#c7e8e8",
        lakecolor: "#d1f2fc",
        projection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker(text: &str, lat: f64, lon: f64) -> Marker {
        Marker { lat, lon, text: text.to_string() }
    }

    #[test]
    fn map_title_includes_origin_verbatim() {
        let figure = map_figure("London", &[]);
        assert_eq!(figure.layout.title.text, "Destinations you can reach from London");
        assert_eq!(map_figure("", &[]).layout.title.text, "Destinations you can reach from ");
    }

    #[test]
    fn map_serializes_as_scattergeo() {
        let figure = map_figure("London", &[marker("Paris", 48.8, 2.3)]);
        let value = serde_json::to_value(&figure).unwrap();

        assert_eq!(
            value["data"][0],
            json!({
                "type": "scattergeo",
                "lat": [48.8],
                "lon": [2.3],
                "hoverinfo": "text",
                "hovertext": ["Paris"],
                "mode": "markers",
                "marker": {
                    "size": 10.0,
                    "symbol": "circle",
                    "color": "#fc197f",
                    "opacity": 0.6,
                    "line": { "width": 0.7, "color": "#fce702" }
                }
            })
        );
        assert_eq!(value["layout"]["geo"]["projection"], json!({ "type": "miller" }));
        assert!(value["layout"].get("paper_bgcolor").is_none());
    }

    #[test]
    fn globe_is_orthographic_with_small_markers() {
        let figure = globe_figure(&[marker("London", 51.47, -0.45)]);
        let trace = &figure.data[0];

        assert_eq!(trace.marker.size, 8.0);
        assert_eq!(trace.marker.opacity, 0.6);
        assert_eq!(figure.layout.geo.projection.kind, "orthographic");
        assert_eq!(
            figure.layout.geo.projection.rotation,
            Some(Rotation { lon: 10.0, lat: 30.0, roll: 0.0 })
        );
        assert_eq!(figure.layout.title.text, GLOBE_TITLE);
    }

    #[test]
    fn markers_come_back_out_in_order() {
        let input = vec![marker("New York", 40.7, -74.0), marker("Paris", 48.8, 2.3)];
        assert_eq!(map_figure("London", &input).markers(), input);
        assert!(map_figure("", &[]).markers().is_empty());
    }
}
