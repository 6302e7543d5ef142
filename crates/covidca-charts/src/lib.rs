//! Chart builders for the covidca dashboard.
//!
//! Pure, stateless transforms from query results to Plotly figure
//! specifications. Nothing here touches the network or the database; the
//! same inputs always produce the same figure.

pub mod error;
pub mod figure;
pub mod geography;
pub mod palette;

mod choropleth;
mod metric_chart;
mod ranking;

pub use choropleth::choropleth;
pub use error::{Error, Result};
pub use figure::Figure;
pub use geography::Geography;
pub use metric_chart::{MetricFigure, metric_chart, metric_charts, title};
pub use palette::{Mark, Palette};
pub use ranking::ranking_chart;
