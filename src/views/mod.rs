//! View transforms
//!
//! Each submodule implements one pure transform from a filtered subset to a
//! [`crate::chart::ChartSpec`]. Transforms share three properties: they are
//! total on well-typed input, they never mutate the subset or the store, and
//! an empty subset yields a well-formed zero-data chart rather than an
//! error.

pub mod box_plot;
pub mod heatmap;
pub mod histogram;
pub mod polar;
pub mod scatter;
pub mod sunburst;
