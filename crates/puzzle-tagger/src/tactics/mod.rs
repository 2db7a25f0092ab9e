/// Tactical motif detectors, one pure predicate per motif
/// Grouped by the board features they look at

pub mod simple;
pub mod material;
pub mod attacks;
pub mod pins;
pub mod line_geometry;
pub mod positional;
