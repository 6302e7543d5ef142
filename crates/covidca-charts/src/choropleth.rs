//! Map of latest cumulative cases per province.

use covidca_core::{
  observation::ProvinceValue,
  region::{NATIONAL_AGGREGATE_NAME, REPATRIATED_TRAVELLERS_NAME, is_pseudo_region},
};

use crate::{
  figure::{ChoroplethTrace, ColorBar, Figure, LatLon, Layout, Mapbox, Margin, Title, Trace},
  geography::{FEATURE_ID_KEY, Geography},
  palette::Palette,
};

const CENTER: LatLon = LatLon { lat: 63.070750, lon: -94.386280 };
const ZOOM: f64 = 2.5;
const MAP_STYLE: &str = "carto-positron";

/// Shade each province by its value, joined to `geography` on the province
/// name. Pseudo-regions are left out; provinces without a boundary are
/// passed through and simply not drawn.
pub fn choropleth(values: &[ProvinceValue], geography: &Geography, palette: &Palette) -> Figure {
  let (locations, z): (Vec<String>, Vec<Option<i64>>) = values
    .iter()
    .filter(|v| {
      !is_pseudo_region(v.province_id)
        && v.province_name != NATIONAL_AGGREGATE_NAME
        && v.province_name != REPATRIATED_TRAVELLERS_NAME
    })
    .map(|v| (v.province_name.clone(), v.value.map(|n| i64::try_from(n).unwrap_or(i64::MAX))))
    .unzip();

  Figure {
    data:   vec![Trace::Choropleth(ChoroplethTrace {
      kind:          "choroplethmapbox",
      geojson:       geography.geojson(),
      featureidkey:  FEATURE_ID_KEY,
      locations,
      z,
      colorscale:    palette.map_scale.clone(),
      colorbar:      ColorBar { title: Title::new("Total Cases") },
      hovertemplate: "Province: %{location}<br>Total Cases: %{z}<extra></extra>".to_owned(),
    })],
    layout: Layout {
      height: Some(600),
      margin: Margin::all(0),
      mapbox: Some(Mapbox { style: MAP_STYLE, center: CENTER, zoom: ZOOM }),
      ..Layout::default()
    },
  }
}
