use glam::{DVec2, Vec2};

use super::{Float, Vertex};

/// Defines a simple 2d point
pub trait Vertex2d: Clone + Copy + Sized {
    fn x(self) -> Float;
    fn y(self) -> Float;

    /// Converts to the vertex type used by the algorithm
    #[inline(always)]
    #[must_use]
    fn to_vertex(self) -> Vertex {
        Vertex::new(self.x(), self.y())
    }
}

impl Vertex2d for Vec2 {
    #[inline(always)]
    #[must_use]
    fn x(self) -> Float {
        self.x as Float
    }

    #[inline(always)]
    #[must_use]
    fn y(self) -> Float {
        self.y as Float
    }
}
impl Vertex2d for DVec2 {
    #[inline(always)]
    #[must_use]
    fn x(self) -> Float {
        self.x as Float
    }

    #[inline(always)]
    #[must_use]
    fn y(self) -> Float {
        self.y as Float
    }
}
impl Vertex2d for [f32; 2] {
    #[inline(always)]
    #[must_use]
    fn x(self) -> Float {
        self[0] as Float
    }

    #[inline(always)]
    #[must_use]
    fn y(self) -> Float {
        self[1] as Float
    }
}
impl Vertex2d for [f64; 2] {
    #[inline(always)]
    #[must_use]
    fn x(self) -> Float {
        self[0] as Float
    }

    #[inline(always)]
    #[must_use]
    fn y(self) -> Float {
        self[1] as Float
    }
}
