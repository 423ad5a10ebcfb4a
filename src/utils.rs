use crate::triangulation::TriangulationError;
use crate::types::{Float, Vertex, Vertex2d, VertexId};

#[cfg(feature = "more_profile_traces")]
use tracing::{span, Level};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Returns the orientation of an ordered triplet (p, q, r).
pub fn triplet_orientation(p: Vertex, q: Vertex, r: Vertex) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if val == 0. {
        Orientation::Colinear
    } else if val > 0. {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Returns the circumcenter of the triangle `abc`, or [None] if `a`, `b` and `c` are collinear.
///
/// The circumcenter is the intersection of the perpendicular bisectors of `ab` and `bc`. Each bisector is the set of
/// points `X` such that `(X - mid) . side = 0`, which gives a 2x2 linear system solved with Cramer's rule.
/// There is no slope involved, so vertical and horizontal sides are regular inputs.
///
/// Computations are done relative to `a`.
pub fn circumcenter(a: Vertex, b: Vertex, c: Vertex) -> Option<Vertex> {
    #[cfg(feature = "more_profile_traces")]
    let _span = span!(Level::TRACE, "circumcenter").entered();

    let ab = b - a;
    let bc = c - b;

    let det = ab.perp_dot(bc);
    if det == 0. {
        return None;
    }

    let mid_ab = ab * 0.5;
    let mid_bc = (b + c) * 0.5 - a;
    let rhs_ab = ab.dot(mid_ab);
    let rhs_bc = bc.dot(mid_bc);

    let center = a + Vertex::new(
        (rhs_ab * bc.y - ab.y * rhs_bc) / det,
        (ab.x * rhs_bc - rhs_ab * bc.x) / det,
    );
    // Nearly collinear points can still overflow
    center.is_finite().then_some(center)
}

/// Circle passing through the three vertices of a triangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circumcircle {
    pub center: Vertex,
    /// Squared distance from the center to the first vertex of the triangle
    pub radius_squared: Float,
}

impl Circumcircle {
    /// Returns [None] if `a`, `b` and `c` are collinear
    #[inline]
    pub fn from_triangle(a: Vertex, b: Vertex, c: Vertex) -> Option<Self> {
        let center = circumcenter(a, b, c)?;
        Some(Self {
            center,
            radius_squared: center.distance_squared(a),
        })
    }

    /// Circle of infinite radius, used by the triangles connected to an infinite vertex.
    ///
    /// It is never on the left of any vertex, so those triangles are never finalized early.
    #[inline]
    pub fn unbounded(center: Vertex) -> Self {
        Self {
            center,
            radius_squared: Float::INFINITY,
        }
    }

    #[inline]
    pub fn radius(&self) -> Float {
        self.radius_squared.sqrt()
    }

    /// Returns `true` if `p` is inside the circle or exactly on it.
    ///
    /// The boundary is inclusive: a vertex cocircular with a triangle invalidates it. On cocircular sets, this makes the
    /// insertion replace the triangle rather than keep a triangle whose circumcircle passes through the new vertex.
    #[inline(always)]
    pub fn contains(&self, p: Vertex) -> bool {
        self.center.distance_squared(p) <= self.radius_squared
    }

    /// Returns `true` if the whole circle is strictly on the left of the vertical line at `x`.
    ///
    /// When vertices are inserted by increasing x, no vertex inserted from then on can be contained by the circle.
    #[inline(always)]
    pub fn is_left_of(&self, x: Float) -> bool {
        self.center.x + self.radius() < x
    }

    /// Returns the ids of the `vertices` contained (inclusive) in the circle
    pub fn contained_vertices(&self, vertices: &[Vertex]) -> Vec<VertexId> {
        vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| self.contains(**v))
            .map(|(id, _)| id as VertexId)
            .collect()
    }
}

/// Checks that all the `vertices` have finite coordinates.
///
/// Returns [TriangulationError::InvalidVertex] with the id of the first NaN or infinite vertex.
pub fn validate_vertices<T: Vertex2d>(vertices: &[T]) -> Result<(), TriangulationError> {
    match vertices
        .iter()
        .position(|v| !v.x().is_finite() || !v.y().is_finite())
    {
        Some(id) => Err(TriangulationError::InvalidVertex {
            id: id as VertexId,
        }),
        None => Ok(()),
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        triangulation::TriangulationError,
        types::{Float, Vertex},
        utils::{
            circumcenter, triplet_orientation, validate_vertices, Circumcircle, Orientation,
        },
    };

    #[test]
    fn vertex_in_triangle_circumcircle() {
        let unit_circle = Circumcircle::from_triangle(
            Vertex::new(-1., 0.),
            Vertex::new(1., 0.),
            Vertex::new(0., 1.),
        )
        .expect("Not degenerate");

        let step = 100;
        for i in -step..step {
            for j in -step..step {
                let p = Vertex::new(i as Float / step as Float, j as Float / step as Float);
                let p_length = p.length_squared();
                let p_in_circle = unit_circle.contains(p);
                if p_length < 1. {
                    assert_eq!(true, p_in_circle, "p_length < 1, p should be in the circle");
                } else if p_length > 1. {
                    assert_eq!(
                        false, p_in_circle,
                        "p_length > 1, p should be out of the circle"
                    );
                }
            }
        }
    }

    #[test]
    fn circumcircle_boundary_is_inclusive() {
        let circle = Circumcircle::from_triangle(
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(1., 1.),
        )
        .expect("Not degenerate");

        // Fourth corner of the square is exactly on the circle
        assert!(circle.contains(Vertex::new(0., 1.)));
        assert!(circle.contains(Vertex::new(0., 0.)));
        assert!(!circle.contains(Vertex::new(1.2, 1.2)));
    }

    #[test]
    fn circumcenter_right_triangle() {
        let center = circumcenter(
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(0., 1.),
        )
        .expect("Not degenerate");

        assert_abs_diff_eq!(center.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(center.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn circumcenter_with_vertical_and_horizontal_sides() {
        // ab is vertical, bc is horizontal
        let a = Vertex::new(2., -1.);
        let b = Vertex::new(2., 3.);
        let c = Vertex::new(-4., 3.);

        let center = circumcenter(a, b, c).expect("Not degenerate");

        assert_abs_diff_eq!(center.x, -1., epsilon = 1e-6);
        assert_abs_diff_eq!(center.y, 1., epsilon = 1e-6);
        assert_abs_diff_eq!(
            center.distance(a),
            center.distance(b),
            epsilon = 1e-5
        );
        assert_abs_diff_eq!(
            center.distance(a),
            center.distance(c),
            epsilon = 1e-5
        );
    }

    #[test]
    fn circumcenter_is_equidistant() {
        let a = Vertex::new(-3.5, 0.25);
        let b = Vertex::new(7., 2.);
        let c = Vertex::new(1.5, -6.);

        let circle = Circumcircle::from_triangle(a, b, c).expect("Not degenerate");

        assert_abs_diff_eq!(circle.radius(), circle.center.distance(b), epsilon = 1e-4);
        assert_abs_diff_eq!(circle.radius(), circle.center.distance(c), epsilon = 1e-4);
    }

    #[test]
    fn circumcenter_collinear() {
        assert_eq!(
            None,
            circumcenter(
                Vertex::new(0., 0.),
                Vertex::new(1., 0.),
                Vertex::new(2., 0.)
            )
        );
        assert_eq!(
            None,
            circumcenter(
                Vertex::new(1., 1.),
                Vertex::new(1., 5.),
                Vertex::new(1., -3.)
            )
        );
        assert_eq!(
            None,
            Circumcircle::from_triangle(
                Vertex::new(0., 0.),
                Vertex::new(0., 0.),
                Vertex::new(1., 1.)
            )
        );
    }

    #[test]
    fn circle_left_of() {
        let circle = Circumcircle::from_triangle(
            Vertex::new(-1., 0.),
            Vertex::new(1., 0.),
            Vertex::new(0., 1.),
        )
        .expect("Not degenerate");

        assert!(circle.is_left_of(1.5));
        assert!(!circle.is_left_of(1.));
        assert!(!circle.is_left_of(0.));

        let unbounded = Circumcircle::unbounded(Vertex::new(-1e6, 0.));
        assert!(!unbounded.is_left_of(1e9));
    }

    #[test]
    fn contained_vertices() {
        let circle = Circumcircle::from_triangle(
            Vertex::new(-1., 0.),
            Vertex::new(1., 0.),
            Vertex::new(0., 1.),
        )
        .expect("Not degenerate");
        let vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(2., 0.),
            Vertex::new(0., -1.),
            Vertex::new(0.5, 0.5),
            Vertex::new(-1., -1.),
        ];

        assert_eq!(vec![0, 2, 3], circle.contained_vertices(&vertices));
    }

    #[test]
    fn orientation() {
        let p = Vertex::new(0., 0.);
        let q = Vertex::new(1., 0.);

        assert_eq!(
            Orientation::CounterClockwise,
            triplet_orientation(p, q, Vertex::new(0., 1.))
        );
        assert_eq!(
            Orientation::Clockwise,
            triplet_orientation(p, q, Vertex::new(0., -1.))
        );
        assert_eq!(
            Orientation::Colinear,
            triplet_orientation(p, q, Vertex::new(3., 0.))
        );
    }

    #[test]
    fn validate_non_finite_vertices() {
        assert_eq!(
            Ok(()),
            validate_vertices(&[[0., 1.], [2., 3.], [-1., 0.5]] as &[[f64; 2]])
        );
        assert_eq!(
            Err(TriangulationError::InvalidVertex { id: 1 }),
            validate_vertices(&[[0., 1.], [f64::NAN, 3.], [-1., 0.5]])
        );
        assert_eq!(
            Err(TriangulationError::InvalidVertex { id: 2 }),
            validate_vertices(&[[0., 1.], [2., 3.], [-1., f64::INFINITY]])
        );
    }
}
