//! Plotly figure model.
//!
//! Serialises to the `{ "data": [...], "layout": {...} }` shape Plotly.js
//! accepts directly. Only the attributes the dashboard uses are modelled.

use std::sync::Arc;

use serde::Serialize;

use crate::palette::Mark;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
  pub data:   Vec<Trace>,
  pub layout: Layout,
}

// ─── Traces ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Trace {
  Cartesian(CartesianTrace),
  Choropleth(ChoroplethTrace),
}

/// A bar or line trace over a categorical or date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartesianTrace {
  /// Emitted as `type` (and `mode` for lines).
  #[serde(flatten)]
  pub mark:         Mark,
  pub x:            Vec<String>,
  /// `null` where the value is undefined (first difference, empty cell).
  pub y:            Vec<Option<i64>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text:         Option<Vec<Option<i64>>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub textposition: Option<&'static str>,
  pub marker:       Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
  pub color: String,
}

/// A `choroplethmapbox` trace shading GeoJSON features by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
  #[serde(rename = "type")]
  pub kind:          &'static str,
  pub geojson:       Arc<serde_json::Value>,
  pub featureidkey:  &'static str,
  pub locations:     Vec<String>,
  pub z:             Vec<Option<i64>>,
  pub colorscale:    String,
  pub colorbar:      ColorBar,
  pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
  pub title: Title,
}

// ─── Layout ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:         Option<Title>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub height:        Option<u32>,
  pub margin:        Margin,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plot_bgcolor:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub paper_bgcolor: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub yaxis:         Option<Axis>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mapbox:        Option<Mapbox>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
  pub text: String,
}

impl Title {
  pub fn new(text: impl Into<String>) -> Self { Self { text: text.into() } }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Margin {
  pub r: u32,
  pub t: u32,
  pub l: u32,
  pub b: u32,
}

impl Margin {
  pub fn all(m: u32) -> Self { Self { r: m, t: m, l: m, b: m } }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
  pub showgrid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapbox {
  pub style:  &'static str,
  pub center: LatLon,
  pub zoom:   f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
  pub lat: f64,
  pub lon: f64,
}

impl Figure {
  /// The cartesian traces, skipping map traces.
  pub fn cartesian(&self) -> impl Iterator<Item = &CartesianTrace> {
    self.data.iter().filter_map(|t| match t {
      Trace::Cartesian(c) => Some(c),
      Trace::Choropleth(_) => None,
    })
  }
}
