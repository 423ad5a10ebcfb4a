use glam::DVec2;

/// The float type used in the algorithm's computations
pub type Float = f64;
/// The vertex type used in the algorithm's computations
pub type Vertex = DVec2;
