//! Province boundary data for the choropleth.
//!
//! A GeoJSON `FeatureCollection` whose features carry `properties.name` equal
//! to the upstream province name. Loaded once, then shared read-only.

use std::{path::Path, str::FromStr, sync::Arc};

use serde_json::Value;

use crate::{Error, Result};

/// Property path Plotly uses to match locations to features.
pub const FEATURE_ID_KEY: &str = "properties.name";

#[derive(Debug, Clone)]
pub struct Geography {
  geojson: Arc<Value>,
  names:   Vec<String>,
}

impl Geography {
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    raw.parse()
  }

  pub fn from_value(geojson: Value) -> Result<Self> {
    if geojson.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
      return Err(Error::InvalidGeography("expected a FeatureCollection".to_owned()));
    }
    let features = geojson
      .get("features")
      .and_then(Value::as_array)
      .ok_or_else(|| Error::InvalidGeography("missing features array".to_owned()))?;

    let names = features
      .iter()
      .enumerate()
      .map(|(i, f)| {
        f.pointer("/properties/name")
          .and_then(Value::as_str)
          .map(str::to_owned)
          .ok_or_else(|| Error::InvalidGeography(format!("feature {i} has no properties.name")))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self { geojson: Arc::new(geojson), names })
  }

  /// Shared handle to the raw GeoJSON.
  pub fn geojson(&self) -> Arc<Value> { Arc::clone(&self.geojson) }

  /// Feature names, in file order.
  pub fn names(&self) -> &[String] { &self.names }

  pub fn contains(&self, name: &str) -> bool { self.names.iter().any(|n| n == name) }
}

impl FromStr for Geography {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::from_value(serde_json::from_str(s)?) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_feature_names() {
    let geo: Geography = r#"{"type":"FeatureCollection","features":[
      {"type":"Feature","properties":{"name":"Ontario"},"geometry":null},
      {"type":"Feature","properties":{"name":"Quebec"},"geometry":null}
    ]}"#
      .parse()
      .unwrap();
    assert_eq!(geo.names(), ["Ontario", "Quebec"]);
    assert!(geo.contains("Quebec"));
    assert!(!geo.contains("Canada"));
  }

  #[test]
  fn rejects_non_collections() {
    let err = r#"{"type":"Feature"}"#.parse::<Geography>().unwrap_err();
    assert!(matches!(err, Error::InvalidGeography(_)));
  }

  #[test]
  fn rejects_unnamed_features() {
    let err = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{}}]}"#
      .parse::<Geography>()
      .unwrap_err();
    assert!(matches!(err, Error::InvalidGeography(msg) if msg.contains("feature 0")));
  }

  #[test]
  fn rejects_bad_json() {
    assert!(matches!("{".parse::<Geography>(), Err(Error::Json(_))));
  }
}
