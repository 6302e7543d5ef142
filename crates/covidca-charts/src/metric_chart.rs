//! Per-region time series charts: the six dashboard tabs.

use covidca_core::{
  metric::{Field, Metric, Mode},
  series::Series,
};
use serde::Serialize;

use crate::{
  figure::{CartesianTrace, Figure, Layout, Margin, Marker, Title, Trace},
  palette::{Mark, Palette},
};

/// Chart title for `metric` in `region`.
pub fn title(metric: Metric, region: &str) -> String {
  let prefix = match (metric.mode, metric.field) {
    (Mode::New, Field::Cases) => "New Reported Cases",
    (Mode::Cumulative, Field::Cases) => "Cumulative Cases",
    (Mode::New, Field::Deaths) => "New Reported Deaths",
    (Mode::Cumulative, Field::Deaths) => "Cumulative Deaths",
    (Mode::New, Field::Tests) => "Daily Tested number",
    (Mode::Cumulative, Field::Tests) => "Total Tested number",
  };
  format!("{prefix} in {region}")
}

/// One tab: `metric` over time for the region of `series`.
///
/// An empty series yields a figure with empty axes, not an error.
pub fn metric_chart(metric: Metric, region: &str, series: &Series, palette: &Palette) -> Figure {
  let x = series.points.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect();
  let y = series.points.iter().map(|p| p.value(metric)).collect();

  Figure {
    data:   vec![Trace::Cartesian(CartesianTrace {
      mark:         Mark::for_metric(metric),
      x,
      y,
      text:         None,
      textposition: None,
      marker:       Marker { color: palette.color(metric.field).to_owned() },
    })],
    layout: Layout {
      title: Some(Title::new(title(metric, region))),
      height: Some(280),
      margin: Margin::all(50),
      ..Layout::default()
    },
  }
}

/// A figure tagged with the metric it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricFigure {
  pub metric: Metric,
  pub figure: Figure,
}

/// All six tabs for one region, in [`Metric::ALL`] order.
pub fn metric_charts(region: &str, series: &Series, palette: &Palette) -> Vec<MetricFigure> {
  Metric::ALL
    .into_iter()
    .map(|metric| MetricFigure { metric, figure: metric_chart(metric, region, series, palette) })
    .collect()
}
