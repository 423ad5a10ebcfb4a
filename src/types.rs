use crate::triangulation::TriangulationError;
use crate::utils::Circumcircle;

#[cfg(not(feature = "f32"))]
pub mod f64;
#[cfg(not(feature = "f32"))]
pub use f64::*;

#[cfg(feature = "f32")]
pub mod f32;
#[cfg(feature = "f32")]
pub use f32::*;

#[cfg(not(feature = "u64_indexes"))]
pub mod u32;
#[cfg(not(feature = "u64_indexes"))]
pub use u32::IndexType;

#[cfg(feature = "u64_indexes")]
pub mod u64;
#[cfg(feature = "u64_indexes")]
pub use u64::IndexType;

pub mod vertex;
pub use vertex::Vertex2d;

pub type VertexId = IndexType;
pub type TriangleId = IndexType;

pub type TriangleVertexIndex = u8;
pub const VERT_1: TriangleVertexIndex = 0;
pub const VERT_2: TriangleVertexIndex = 1;
pub const VERT_3: TriangleVertexIndex = 2;

pub type TriangleEdgeIndex = u8;
pub const EDGE_12: TriangleEdgeIndex = 0;
pub const EDGE_23: TriangleEdgeIndex = 1;
pub const EDGE_31: TriangleEdgeIndex = 2;

/// From a TriangleEdgeIndex, gives the corresponding pair of TriangleVertexIndex
pub const EDGE_TO_VERTS: [[TriangleVertexIndex; 2]; 3] =
    [[VERT_1, VERT_2], [VERT_2, VERT_3], [VERT_3, VERT_1]];

/// An edge between two vertices, identified by their ids.
///
/// Equality through `==` is directed. Use [`Edge::undirected_equals`] or [`Edge::undirected`] to compare edges as unordered pairs.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}
impl Edge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn undirected_equals(&self, other: &Edge) -> bool {
        self == other || (self.from == other.to && self.to == other.from)
    }

    /// Returns the same edge with its smallest vertex id first.
    ///
    /// Two edges are undirected-equal if and only if their undirected forms are equal, which makes it usable as a hash key.
    #[inline]
    pub fn undirected(&self) -> Edge {
        if self.from <= self.to {
            *self
        } else {
            Edge::new(self.to, self.from)
        }
    }
}

/// A triangle of the mesh being built.
///
/// Vertices have no enforced winding order. The circumcircle is computed once at creation and reused by every containment test.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleData {
    /// Triangle vertices indexes
    pub verts: [VertexId; 3],
    pub circumcircle: Circumcircle,
}

impl TriangleData {
    /// Fails with [`TriangulationError::DegenerateTriangle`] if the three vertices are collinear
    pub fn new(verts: [VertexId; 3], vertices: &[Vertex]) -> Result<Self, TriangulationError> {
        let circumcircle = Circumcircle::from_triangle(
            vertices[verts[VERT_1 as usize] as usize],
            vertices[verts[VERT_2 as usize] as usize],
            vertices[verts[VERT_3 as usize] as usize],
        )
        .ok_or(TriangulationError::DegenerateTriangle { verts })?;
        Ok(Self {
            verts,
            circumcircle,
        })
    }

    /// Triangle connected to at least one infinite vertex. Its circumcircle is unbounded.
    pub(crate) fn new_unbounded(verts: [VertexId; 3], center: Vertex) -> Self {
        Self {
            verts,
            circumcircle: Circumcircle::unbounded(center),
        }
    }

    /// The container triangle uses the three consecutive vertex ids starting at `first_index`
    pub(crate) fn new_container_triangle(first_index: VertexId, center: Vertex) -> Self {
        Self::new_unbounded([first_index, first_index + 1, first_index + 2], center)
    }

    #[inline]
    pub fn edge(&self, edge_index: TriangleEdgeIndex) -> Edge {
        let vert_indexes = EDGE_TO_VERTS[edge_index as usize];
        Edge::new(
            self.verts[vert_indexes[0] as usize],
            self.verts[vert_indexes[1] as usize],
        )
    }

    #[inline]
    pub fn edges(&self) -> [Edge; 3] {
        [self.edge(EDGE_12), self.edge(EDGE_23), self.edge(EDGE_31)]
    }

    #[inline]
    pub fn contains_vertex(&self, vertex_id: VertexId) -> bool {
        self.verts.contains(&vertex_id)
    }

    /// Returns `true` if any vertex id of this triangle is also a vertex id of `other`
    #[inline]
    pub fn shares_vertex(&self, other: &TriangleData) -> bool {
        self.verts.iter().any(|v| other.contains_vertex(*v))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Triangles {
    pub buffer: Vec<TriangleData>,
}
impl Triangles {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn buffer(&self) -> &Vec<TriangleData> {
        &self.buffer
    }
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Vec<TriangleData> {
        &mut self.buffer
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.buffer.len()
    }
    #[inline]
    pub fn next_id(&self) -> TriangleId {
        self.buffer.len() as TriangleId
    }

    #[inline]
    pub fn push(&mut self, triangle: TriangleData) {
        self.buffer.push(triangle)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear()
    }
}

pub type TriangleVertices = (Vertex, Vertex, Vertex);

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
