use arrayvec::ArrayVec;

use crate::{
    triangulation::TriangulationError,
    types::{Float, TriangleData, Vertex, VertexId},
};

#[cfg(feature = "more_profile_traces")]
use tracing::{span, Level};

/// Directions of the container triangle vertices, from the center of the bounding box of the input vertices.
///
/// All of them have the same norm, [INFINITE_VERTS_DIRECTIONS_NORM]. Integer coordinates keep the half-plane tests
/// exact on integer inputs.
pub const INFINITE_VERTS_DIRECTIONS: [[Float; 2]; 3] = [[-4., -3.], [0., 5.], [4., -3.]];
pub const INFINITE_VERTS_DIRECTIONS_NORM: Float = 5.;

/// Positions of the container triangle vertices when placed at `distance` from `center`
pub fn infinite_vertices_positions(center: Vertex, distance: Float) -> [Vertex; 3] {
    INFINITE_VERTS_DIRECTIONS
        .map(|direction| center + Vertex::from(direction) * (distance / INFINITE_VERTS_DIRECTIONS_NORM))
}

/// The three vertices of the container triangle.
///
/// In the containment tests, they are infinitely far from `center` along [INFINITE_VERTS_DIRECTIONS]. The circumcircle of a
/// triangle connected to one of them degenerates into a half-plane. Their finite positions in the vertices buffer are only
/// used for debugging.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InfiniteVertices {
    /// Id of the first infinite vertex, the two others follow it
    pub first_id: VertexId,
    /// Center of the bounding box of the input vertices
    pub center: Vertex,
}

impl InfiniteVertices {
    pub fn new(first_id: VertexId, center: Vertex) -> Self {
        Self { first_id, center }
    }

    #[inline]
    pub fn is_infinite(&self, vertex_id: VertexId) -> bool {
        vertex_id >= self.first_id
    }

    #[inline]
    pub fn is_finite_triangle(&self, verts: &[VertexId; 3]) -> bool {
        verts.iter().all(|v| !self.is_infinite(*v))
    }

    /// INVALID for a finite vertex
    #[inline]
    pub fn direction(&self, vertex_id: VertexId) -> Vertex {
        Vertex::from(INFINITE_VERTS_DIRECTIONS[(vertex_id - self.first_id) as usize])
    }

    /// Splits the vertices of a triangle into its finite and infinite vertices, keeping their order
    #[inline(always)]
    fn split_triangle_vertices(
        &self,
        verts: &[VertexId; 3],
    ) -> (ArrayVec<VertexId, 3>, ArrayVec<VertexId, 3>) {
        let mut finite_verts = ArrayVec::new();
        let mut infinite_verts = ArrayVec::new();
        for &vertex_id in verts {
            if self.is_infinite(vertex_id) {
                infinite_verts.push(vertex_id);
            } else {
                finite_verts.push(vertex_id);
            }
        }
        (finite_verts, infinite_verts)
    }

    /// Creates a triangle, which may be connected to infinite vertices.
    ///
    /// Fails with [TriangulationError::DegenerateTriangle] if the vertices are collinear.
    pub(crate) fn new_triangle(
        &self,
        verts: [VertexId; 3],
        vertices: &[Vertex],
    ) -> Result<TriangleData, TriangulationError> {
        if self.is_finite_triangle(&verts) {
            return TriangleData::new(verts, vertices);
        }

        let (finite_verts, infinite_verts) = self.split_triangle_vertices(&verts);
        if let [a, b] = finite_verts[..] {
            let orientation = half_plane_1_orientation(
                vertices[a as usize],
                vertices[b as usize],
                self.direction(infinite_verts[0]),
                self.center,
            );
            if orientation == 0. {
                return Err(TriangulationError::DegenerateTriangle { verts });
            }
        }
        // Two distinct infinite directions are never collinear
        Ok(TriangleData::new_unbounded(verts, self.center))
    }

    /// Returns `true` if `vertex` is inside (inclusive) the circumcircle of `triangle`
    #[inline(always)]
    pub(crate) fn is_vertex_in_triangle_circumcircle(
        &self,
        triangle: &TriangleData,
        vertex: Vertex,
        vertices: &[Vertex],
    ) -> bool {
        if self.is_finite_triangle(&triangle.verts) {
            triangle.circumcircle.contains(vertex)
        } else {
            self.is_vertex_in_half_plane(triangle, vertex, vertices)
        }
    }

    #[cold]
    fn is_vertex_in_half_plane(
        &self,
        triangle: &TriangleData,
        vertex: Vertex,
        vertices: &[Vertex],
    ) -> bool {
        #[cfg(feature = "more_profile_traces")]
        let _span = span!(Level::TRACE, "is_vertex_in_half_plane").entered();

        let (finite_verts, infinite_verts) = self.split_triangle_vertices(&triangle.verts);
        match finite_verts[..] {
            [a, b] => is_vertex_in_half_plane_1(
                vertices[a as usize],
                vertices[b as usize],
                self.direction(infinite_verts[0]),
                self.center,
                vertex,
            ),
            [a] => is_vertex_in_half_plane_2(
                vertices[a as usize],
                self.direction(infinite_verts[0]),
                self.direction(infinite_verts[1]),
                self.center,
                vertex,
            ),
            // The container triangle contains everything
            _ => true,
        }
    }
}

/// Orientation of the triangle `a`, `b`, `center + t * direction` when `t` grows to infinity.
///
/// Falls back to the side of `center` when `ab` is parallel to `direction`. Zero means the triangle is flat.
#[inline]
pub(crate) fn half_plane_1_orientation(
    a: Vertex,
    b: Vertex,
    direction: Vertex,
    center: Vertex,
) -> Float {
    let ab = b - a;
    let orientation = ab.perp_dot(direction);
    if orientation != 0. {
        orientation
    } else {
        ab.perp_dot(center - a)
    }
}

/// Test if `p` is inside the circle through `a`, `b` and one infinite vertex: the open half-plane bounded by the line
/// `ab`, on the side of the infinite vertex. On the line itself, the circle only contains the open segment `ab`.
pub(crate) fn is_vertex_in_half_plane_1(
    a: Vertex,
    b: Vertex,
    direction: Vertex,
    center: Vertex,
    p: Vertex,
) -> bool {
    let orientation = half_plane_1_orientation(a, b, direction, center);
    let side = (b - a).perp_dot(p - a);
    if side == 0. {
        return (p - a).dot(p - b) < 0.;
    }
    orientation != 0. && (side > 0.) == (orientation > 0.)
}

/// Test if `p` is inside the circle through `a` and two infinite vertices: the half-plane bounded by the line through
/// `a` parallel to the two infinite vertices, on their side.
///
/// On that line, the circle contains the open segment between `a` and its mirror image through the axis of symmetry of
/// the two infinite vertices.
pub(crate) fn is_vertex_in_half_plane_2(
    a: Vertex,
    direction_1: Vertex,
    direction_2: Vertex,
    center: Vertex,
    p: Vertex,
) -> bool {
    let orientation = direction_1.perp_dot(direction_2);
    let slope = direction_1 - direction_2;
    let pa = a - p;
    let side = pa.perp_dot(slope);
    if side != 0. {
        return (side > 0.) == (orientation > 0.);
    }
    pa.dot(slope) * (a + p - center * 2.).dot(slope) > 0.
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::{
        infinite::{
            infinite_vertices_positions, is_vertex_in_half_plane_1, is_vertex_in_half_plane_2,
            InfiniteVertices, INFINITE_VERTS_DIRECTIONS,
        },
        triangulation::TriangulationError,
        types::{TriangleData, Vertex},
    };

    /// Square `[0, 4]²` followed by the three infinite vertices
    fn square_with_infinite_vertices() -> (Vec<Vertex>, InfiniteVertices) {
        let center = Vertex::new(2., 2.);
        let mut vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(4., 0.),
            Vertex::new(4., 4.),
            Vertex::new(0., 4.),
        ];
        vertices.extend(infinite_vertices_positions(center, 100.));
        (vertices, InfiniteVertices::new(4, center))
    }

    #[test]
    fn infinite_vertices_ids() {
        let (_, infinite) = square_with_infinite_vertices();

        assert!(!infinite.is_infinite(3));
        assert!(infinite.is_infinite(4));
        assert!(infinite.is_infinite(6));
        assert!(infinite.is_finite_triangle(&[0, 1, 2]));
        assert!(!infinite.is_finite_triangle(&[0, 5, 2]));
        assert_eq!(Vertex::from(INFINITE_VERTS_DIRECTIONS[1]), infinite.direction(5));
    }

    #[test]
    fn positions_follow_directions() {
        let positions = infinite_vertices_positions(Vertex::new(1., 1.), 10.);

        assert_eq!(Vertex::new(-7., -5.), positions[0]);
        assert_eq!(Vertex::new(1., 11.), positions[1]);
        assert_eq!(Vertex::new(9., -5.), positions[2]);
    }

    #[test]
    fn half_plane_with_one_infinite_vertex() {
        let a = Vertex::new(0., 0.);
        let b = Vertex::new(4., 0.);
        let down = Vertex::new(-4., -3.);
        let center = Vertex::new(2., 2.);

        assert!(is_vertex_in_half_plane_1(a, b, down, center, Vertex::new(100., -0.001)));
        assert!(!is_vertex_in_half_plane_1(a, b, down, center, Vertex::new(2., 0.001)));
        // On the line ab: only the open segment is inside
        assert!(is_vertex_in_half_plane_1(a, b, down, center, Vertex::new(1., 0.)));
        assert!(!is_vertex_in_half_plane_1(a, b, down, center, Vertex::new(5., 0.)));
        assert!(!is_vertex_in_half_plane_1(a, b, down, center, Vertex::new(-1., 0.)));
    }

    #[test]
    fn half_plane_with_one_infinite_vertex_parallel_to_edge() {
        // ab is vertical, like the direction of the top infinite vertex. The side of the center is used.
        let a = Vertex::new(0., 0.);
        let b = Vertex::new(0., 4.);
        let up = Vertex::new(0., 5.);
        let center = Vertex::new(2., 2.);

        assert!(is_vertex_in_half_plane_1(a, b, up, center, Vertex::new(1., 10.)));
        assert!(!is_vertex_in_half_plane_1(a, b, up, center, Vertex::new(-1., 2.)));
    }

    #[test]
    fn half_plane_with_two_infinite_vertices() {
        // The two bottom infinite vertices: the half-plane below a
        let a = Vertex::new(1., 1.);
        let left = Vertex::new(-4., -3.);
        let right = Vertex::new(4., -3.);
        let center = Vertex::new(2., 2.);

        assert!(is_vertex_in_half_plane_2(a, left, right, center, Vertex::new(50., 0.5)));
        assert!(!is_vertex_in_half_plane_2(a, left, right, center, Vertex::new(1., 1.5)));
        // Same y as a: inside between a and its mirror image through x = 2
        assert!(is_vertex_in_half_plane_2(a, left, right, center, Vertex::new(2.5, 1.)));
        assert!(!is_vertex_in_half_plane_2(a, left, right, center, Vertex::new(3.5, 1.)));
        assert!(!is_vertex_in_half_plane_2(a, left, right, center, Vertex::new(0., 1.)));
        // Does not depend on the order of the infinite vertices
        assert!(is_vertex_in_half_plane_2(a, right, left, center, Vertex::new(50., 0.5)));
        assert!(!is_vertex_in_half_plane_2(a, right, left, center, Vertex::new(1., 1.5)));
    }

    #[test]
    fn triangle_circumcircle_dispatch() {
        let (vertices, infinite) = square_with_infinite_vertices();

        let finite = infinite
            .new_triangle([0, 1, 2], &vertices)
            .expect("Not degenerate");
        // Bottom edge of the square with the bottom-left infinite vertex
        let bottom = infinite
            .new_triangle([0, 1, 4], &vertices)
            .expect("Not degenerate");

        // Far below the square: outside of any finite circumcircle, but in the half-plane
        let far_below = Vertex::new(2., -1000.);
        assert!(!infinite.is_vertex_in_triangle_circumcircle(&finite, far_below, &vertices));
        assert!(infinite.is_vertex_in_triangle_circumcircle(&bottom, far_below, &vertices));
        assert!(!infinite.is_vertex_in_triangle_circumcircle(
            &bottom,
            Vertex::new(2., 0.5),
            &vertices
        ));

        let container = TriangleData::new_container_triangle(4, infinite.center);
        assert!(infinite.is_vertex_in_triangle_circumcircle(
            &container,
            Vertex::new(-1e9, 1e9),
            &vertices
        ));
    }

    #[test]
    fn flat_infinite_triangle() {
        // The line 0-2 goes through the center and is parallel to the top infinite vertex direction
        let center = Vertex::new(0., 2.);
        let mut vertices = vec![
            Vertex::new(0., 0.),
            Vertex::new(1., 2.),
            Vertex::new(0., 4.),
        ];
        vertices.extend(infinite_vertices_positions(center, 100.));
        let infinite = InfiniteVertices::new(3, center);

        assert_eq!(
            Err(TriangulationError::DegenerateTriangle { verts: [0, 2, 4] }),
            infinite.new_triangle([0, 2, 4], &vertices)
        );
        assert!(infinite.new_triangle([0, 2, 3], &vertices).is_ok());
        assert!(infinite.new_triangle([1, 3, 5], &vertices).is_ok());
    }
}
