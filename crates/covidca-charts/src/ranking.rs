//! Provinces ranked by latest cumulative cases.

use std::cmp::Ordering;

use covidca_core::{
  observation::ProvinceValue,
  region::{NATIONAL_AGGREGATE_NAME, ProvinceCatalog, REPATRIATED_TRAVELLERS_NAME, is_pseudo_region},
};

use crate::{
  Result,
  figure::{Axis, CartesianTrace, Figure, Layout, Margin, Marker, Trace},
  palette::{Mark, Palette},
};

/// Bar chart of provinces, highest value first, labelled by two-letter code.
///
/// `values` is expected to be `latest_by_province(Field::Cases)`. The national
/// aggregate and repatriated travellers never appear. A province missing
/// from `catalog` is an error rather than a silently dropped bar.
pub fn ranking_chart(values: &[ProvinceValue], catalog: &ProvinceCatalog, palette: &Palette) -> Result<Figure> {
  let mut ranked: Vec<&ProvinceValue> = values.iter().filter(|v| !is_excluded(v)).collect();
  ranked.sort_by(|a, b| by_value_desc(a, b).then_with(|| a.province_name.cmp(&b.province_name)));

  let x = ranked
    .iter()
    .map(|v| catalog.require_code(&v.province_name).map(str::to_owned))
    .collect::<covidca_core::Result<Vec<_>>>()?;
  let y: Vec<Option<i64>> = ranked.iter().map(|v| v.value.map(to_i64)).collect();

  Ok(Figure {
    data:   vec![Trace::Cartesian(CartesianTrace {
      mark: Mark::Bar,
      x,
      text: Some(y.clone()),
      y,
      textposition: Some("auto"),
      marker: Marker { color: palette.cases.clone() },
    })],
    layout: Layout {
      margin: Margin::all(30),
      plot_bgcolor: Some(palette.background.clone()),
      paper_bgcolor: Some(palette.background.clone()),
      yaxis: Some(Axis { showgrid: false }),
      ..Layout::default()
    },
  })
}

fn is_excluded(v: &ProvinceValue) -> bool {
  is_pseudo_region(v.province_id)
    || v.province_name == NATIONAL_AGGREGATE_NAME
    || v.province_name == REPATRIATED_TRAVELLERS_NAME
}

/// Descending; missing values sort last.
fn by_value_desc(a: &ProvinceValue, b: &ProvinceValue) -> Ordering {
  match (a.value, b.value) {
    (Some(x), Some(y)) => y.cmp(&x),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

fn to_i64(v: u64) -> i64 { i64::try_from(v).unwrap_or(i64::MAX) }
