use glam::Vec2;

/// The float type used in the algorithm's computations
pub type Float = f32;
/// The vertex type used in the algorithm's computations
pub type Vertex = Vec2;
