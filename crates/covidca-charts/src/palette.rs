//! Colours and mark types.

use covidca_core::metric::{Field, Metric, Mode};
use serde::{
  Deserialize, Serialize, Serializer,
  ser::SerializeStruct as _,
};

/// One colour per metric family plus the panel background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
  pub cases:      String,
  pub deaths:     String,
  pub tests:      String,
  pub background: String,
  /// Plotly colour scale name for the choropleth.
  pub map_scale:  String,
}

impl Default for Palette {
  fn default() -> Self {
    Self {
      cases:      "#2171b5".to_owned(),
      deaths:     "#fb6a4a".to_owned(),
      tests:      "#238b45".to_owned(),
      background: "#f9f9f9".to_owned(),
      map_scale:  "Blues".to_owned(),
    }
  }
}

impl Palette {
  pub fn color(&self, field: Field) -> &str {
    match field {
      Field::Cases => &self.cases,
      Field::Deaths => &self.deaths,
      Field::Tests => &self.tests,
    }
  }
}

/// How a metric is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
  Bar,
  Line,
}

impl Mark {
  /// Fixed lookup: daily values are bars, running totals are lines.
  pub fn for_metric(metric: Metric) -> Self {
    match metric.mode {
      Mode::New => Mark::Bar,
      Mode::Cumulative => Mark::Line,
    }
  }
}

/// Plotly has no `line` trace type; lines are `scatter` in `lines` mode.
impl Serialize for Mark {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Mark::Bar => {
        let mut s = serializer.serialize_struct("Mark", 1)?;
        s.serialize_field("type", "bar")?;
        s.end()
      }
      Mark::Line => {
        let mut s = serializer.serialize_struct("Mark", 2)?;
        s.serialize_field("type", "scatter")?;
        s.serialize_field("mode", "lines")?;
        s.end()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mark_lookup_covers_all_metrics() {
    let marks: Vec<Mark> = Metric::ALL.into_iter().map(Mark::for_metric).collect();
    assert_eq!(marks, [Mark::Bar, Mark::Line, Mark::Bar, Mark::Line, Mark::Bar, Mark::Line]);
  }

  #[test]
  fn colors_per_family() {
    let p = Palette::default();
    assert_eq!(p.color(Field::Cases), "#2171b5");
    assert_eq!(p.color(Field::Deaths), "#fb6a4a");
    assert_eq!(p.color(Field::Tests), "#238b45");
  }
}
