use hashbrown::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, error};

#[cfg(feature = "parallel_filtering")]
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::infinite::{infinite_vertices_positions, InfiniteVertices};
use crate::types::{
    Edge, Float, TriangleData, TriangleVertices, Triangles, Vertex, Vertex2d, VertexId,
};
use crate::utils::{triplet_orientation, validate_vertices, Circumcircle, Orientation};

#[cfg(feature = "progress_log")]
use tracing::info;

#[cfg(feature = "debug_context")]
use crate::debug::{DebugConfiguration, DebugContext, Phase};

#[cfg(feature = "profile_traces")]
use tracing::{span, Level};

/// The vertices of the container triangle are placed `DEFAULT_SUPER_TRIANGLE_SCALE` times the largest extent of the bounding box away from its center.
pub const DEFAULT_SUPER_TRIANGLE_SCALE: Float = 100.;
/// Below this scale, the container triangle may not enclose all of the vertices
pub const MIN_SUPER_TRIANGLE_SCALE: Float = 2.;

pub const DEFAULT_FILTER_PARALLEL_TRI_COUNT_THRESHOLD: usize = 100_000;
pub const DEFAULT_FILTER_PARALLEL_MIN_BATCH_LEN: usize = 1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
    /// Less than 3 vertices were given
    #[error("cannot triangulate {count} vertices, at least 3 are required")]
    InsufficientPoints { count: usize },
    /// The vertices of a triangle are collinear and the triangle has no circumcircle.
    ///
    /// Also returned when all the input vertices are collinear.
    #[error("vertices {verts:?} are collinear, their triangle has no circumcircle")]
    DegenerateTriangle { verts: [VertexId; 3] },
    /// A vertex has a NaN or infinite coordinate
    #[error("vertex {id} has a non-finite coordinate")]
    InvalidVertex { id: VertexId },
}

/// Order in which the vertices are inserted into the triangulation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum InsertionOrder {
    /// Vertices are inserted by increasing x coordinate (stable for equal x).
    ///
    /// Enables early finalization: a triangle whose circumcircle lies entirely on the left of the vertex being inserted
    /// can never be invalidated again, and is moved out of the set of triangles tested by the next insertions.
    #[default]
    SortedByX,
    /// Vertices are inserted in their input order. Every triangle is tested against every vertex.
    AsGiven,
}

#[derive(Clone, Debug)]
pub struct TriangulationConfiguration {
    pub insertion_order: InsertionOrder,
    /// Distance of the container triangle vertices from the center of the bounding box, relative to its largest extent.
    ///
    /// Values lower than [MIN_SUPER_TRIANGLE_SCALE] are clamped. The containment tests consider the container vertices
    /// infinitely far, so this only changes their positions in the debug snapshots.
    pub super_triangle_scale: Float,
    /// Only used with the `parallel_filtering` feature. Minimum count of triangles for the final filtering to run in parallel.
    pub filter_parallel_tri_count_threshold: usize,
    /// Only used with the `parallel_filtering` feature. Minimum count of triangles handled by a parallel task.
    pub filter_parallel_min_batch_len: usize,
    #[cfg(feature = "debug_context")]
    pub debug_config: DebugConfiguration,
}
impl Default for TriangulationConfiguration {
    fn default() -> Self {
        Self {
            insertion_order: InsertionOrder::default(),
            super_triangle_scale: DEFAULT_SUPER_TRIANGLE_SCALE,
            filter_parallel_tri_count_threshold: DEFAULT_FILTER_PARALLEL_TRI_COUNT_THRESHOLD,
            filter_parallel_min_batch_len: DEFAULT_FILTER_PARALLEL_MIN_BATCH_LEN,
            #[cfg(feature = "debug_context")]
            debug_config: DebugConfiguration::default(),
        }
    }
}

pub struct Triangulation {
    /// Indices of the original vertices by groups of 3 to form triangles.
    ///
    /// No ordering of the triangles nor winding of their vertices is guaranteed.
    pub triangles: Vec<[VertexId; 3]>,
    /// Circumcircle of each triangle, at the same index as in `triangles`
    pub circumcircles: Vec<Circumcircle>,

    #[cfg(feature = "debug_context")]
    pub debug_context: DebugContext,
}

impl Triangulation {
    /// Returns the positions of the three vertices of the triangle at `index`.
    ///
    /// `vertices` must be the vertices given to the triangulation.
    pub fn triangle_vertices<T: Vertex2d>(&self, index: usize, vertices: &[T]) -> TriangleVertices {
        let [v1, v2, v3] = self.triangles[index];
        (
            vertices[v1 as usize].to_vertex(),
            vertices[v2 as usize].to_vertex(),
            vertices[v3 as usize].to_vertex(),
        )
    }
}

/// Creates a Delaunay triangulation of the input vertices, using the Bowyer-Watson algorithm.
///
/// Vertices with identical coordinates are merged: only the first one of them appears in the triangulation.
///
/// Errors:
/// - [TriangulationError::InsufficientPoints] if there are less than 3 vertices
/// - [TriangulationError::InvalidVertex] if a vertex has a NaN or infinite coordinate
/// - [TriangulationError::DegenerateTriangle] if all the vertices are collinear, or if a triangle with collinear
///   vertices is encountered. The whole triangulation is aborted, no partial result is returned.
///
/// With [InsertionOrder::SortedByX] (default), vertices are sorted by x before insertion, which allows finalizing
/// triangles early. With [InsertionOrder::AsGiven], vertices are inserted in input order and no early finalization
/// takes place.
pub fn triangulation_from_2d_vertices<T: Vertex2d>(
    vertices: &[T],
    config: TriangulationConfiguration,
) -> Result<Triangulation, TriangulationError> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "triangulation_from_2d_vertices").entered();

    if vertices.len() < 3 {
        return Err(TriangulationError::InsufficientPoints {
            count: vertices.len(),
        });
    }
    validate_vertices(vertices)?;

    let mut planar_vertices: Vec<Vertex> = vertices.iter().map(|v| v.to_vertex()).collect();
    check_vertices_not_collinear(&planar_vertices)?;

    let insertion_order = sort_insertion_order(&planar_vertices, config.insertion_order);
    let bounds = compute_bounding_box(&planar_vertices);

    #[cfg(feature = "debug_context")]
    let mut debug_context = DebugContext::new(config.debug_config.clone(), bounds);

    let (super_triangle, infinite_vertices) = add_super_triangle_vertices(
        &mut planar_vertices,
        &bounds,
        config.super_triangle_scale,
    )?;

    let triangles = match wrap_and_triangulate_2d_vertices(
        &planar_vertices,
        &insertion_order,
        super_triangle.clone(),
        &infinite_vertices,
        config.insertion_order == InsertionOrder::SortedByX,
        #[cfg(feature = "debug_context")]
        &mut debug_context,
    ) {
        Ok(triangles) => triangles,
        Err(err) => {
            error!("Triangulation aborted: {}", err);
            return Err(err);
        }
    };

    let (triangles, circumcircles) = remove_wrapping(
        &triangles,
        &super_triangle,
        &config,
        #[cfg(feature = "debug_context")]
        &mut debug_context,
    );

    debug!(
        "Triangulated {} vertices ({} inserted) into {} triangles",
        vertices.len(),
        insertion_order.len(),
        triangles.len()
    );

    Ok(Triangulation {
        triangles,
        circumcircles,
        #[cfg(feature = "debug_context")]
        debug_context,
    })
}

/// Axis-aligned bounding box of a set of vertices
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub x_min: Float,
    pub y_min: Float,
    pub x_max: Float,
    pub y_max: Float,
}
impl BoundingBox {
    #[inline]
    pub fn width(&self) -> Float {
        self.x_max - self.x_min
    }
    #[inline]
    pub fn height(&self) -> Float {
        self.y_max - self.y_min
    }
    #[inline]
    pub fn center(&self) -> Vertex {
        Vertex::new(
            (self.x_min + self.x_max) / 2.,
            (self.y_min + self.y_max) / 2.,
        )
    }
}

/// Min and max are tracked independently on each axis.
pub(crate) fn compute_bounding_box(vertices: &[Vertex]) -> BoundingBox {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "compute_bounding_box").entered();

    let (mut x_min, mut y_min, mut x_max, mut y_max) =
        (Float::MAX, Float::MAX, Float::MIN, Float::MIN);

    for vertex in vertices.iter() {
        if vertex.x < x_min {
            x_min = vertex.x;
        }
        if vertex.x > x_max {
            x_max = vertex.x;
        }
        if vertex.y < y_min {
            y_min = vertex.y;
        }
        if vertex.y > y_max {
            y_max = vertex.y;
        }
    }

    BoundingBox {
        x_min,
        y_min,
        x_max,
        y_max,
    }
}

/// Returns an error if all the vertices are collinear (or coincident), since they do not form a single triangle.
pub(crate) fn check_vertices_not_collinear(vertices: &[Vertex]) -> Result<(), TriangulationError> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "check_vertices_not_collinear").entered();

    let first = vertices[0];
    let Some(second_id) = vertices.iter().position(|v| *v != first) else {
        return Err(TriangulationError::DegenerateTriangle { verts: [0, 1, 2] });
    };
    let second = vertices[second_id];

    if vertices
        .iter()
        .any(|v| triplet_orientation(first, second, *v) != Orientation::Colinear)
    {
        Ok(())
    } else {
        let third_id = if second_id == 1 { 2 } else { 1 };
        Err(TriangulationError::DegenerateTriangle {
            verts: [0, second_id as VertexId, third_id],
        })
    }
}

/// Returns the ids of the vertices to insert, in insertion order.
///
/// Vertices with the same coordinates as a previous vertex (in input order) are left out.
pub(crate) fn sort_insertion_order(vertices: &[Vertex], order: InsertionOrder) -> Vec<VertexId> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "sort_insertion_order").entered();

    let mut known_positions = HashSet::with_capacity(vertices.len());
    let mut insertion_order: Vec<VertexId> = Vec::with_capacity(vertices.len());
    for (vertex_id, vertex) in vertices.iter().enumerate() {
        // Adding 0. turns -0. into 0.
        if known_positions.insert([(vertex.x + 0.).to_bits(), (vertex.y + 0.).to_bits()]) {
            insertion_order.push(vertex_id as VertexId);
        }
    }
    if insertion_order.len() < vertices.len() {
        debug!(
            "Merged {} duplicated vertices",
            vertices.len() - insertion_order.len()
        );
    }

    if order == InsertionOrder::SortedByX {
        insertion_order
            .sort_by(|a, b| vertices[*a as usize].x.total_cmp(&vertices[*b as usize].x));
    }
    insertion_order
}

/// Returns the vertices of a container triangle which strictly encloses `bounds`.
///
/// ```text
///                 v2
///                /  \
///               /    \
///              /      \
///             /  ----  \
///            /  |bbox|  \
///           /    ----    \
///         v1 ------------ v3
/// ```
pub fn super_triangle_vertices(bounds: &BoundingBox, scale: Float) -> [Vertex; 3] {
    let scale = scale.max(MIN_SUPER_TRIANGLE_SCALE);
    let d_max = bounds.width().max(bounds.height());
    infinite_vertices_positions(bounds.center(), scale * d_max)
}

/// Select three dummy points to form a supertriangle that completely encompasses all of the points to be triangulated.
///  This supertriangle initially defines a Delaunay triangulation which is comprised of a single triangle.
///  Its vertices are appended to `vertices`, their ids follow the ids of the input vertices.
///
/// The containment tests treat them as [InfiniteVertices].
pub(crate) fn add_super_triangle_vertices(
    vertices: &mut Vec<Vertex>,
    bounds: &BoundingBox,
    scale: Float,
) -> Result<(TriangleData, InfiniteVertices), TriangulationError> {
    let min_super_vertex_id = vertices.len() as VertexId;
    let [v1, v2, v3] = super_triangle_vertices(bounds, scale);
    if triplet_orientation(v1, v2, v3) == Orientation::Colinear {
        return Err(TriangulationError::DegenerateTriangle {
            verts: [
                min_super_vertex_id,
                min_super_vertex_id + 1,
                min_super_vertex_id + 2,
            ],
        });
    }
    vertices.extend([v1, v2, v3]);

    let infinite_vertices = InfiniteVertices::new(min_super_vertex_id, bounds.center());
    Ok((
        TriangleData::new_container_triangle(min_super_vertex_id, infinite_vertices.center),
        infinite_vertices,
    ))
}

/// - `vertices` contains the input vertices followed by the vertices of `super_triangle`
/// - `insertion_order` contains the ids of the input vertices to insert
///
/// Returns all the triangles, including the ones connected to the super triangle.
pub(crate) fn wrap_and_triangulate_2d_vertices(
    vertices: &[Vertex],
    insertion_order: &[VertexId],
    super_triangle: TriangleData,
    infinite_vertices: &InfiniteVertices,
    finalize_early: bool,
    #[cfg(feature = "debug_context")] debug_context: &mut DebugContext,
) -> Result<Triangles, TriangulationError> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "wrap_and_triangulate_2d_vertices").entered();

    let mut triangles = Triangles::with_capacity(vertices.len() * 2 + 1);
    triangles.push(super_triangle);

    #[cfg(feature = "debug_context")]
    debug_context.push_snapshot(Phase::SuperTriangle, &triangles, &[0]);

    // Triangles that can't be invalidated by any of the remaining vertices
    let mut completed = Triangles::new();

    // Those buffers are re-used by all the insertions, to share their allocations.
    let mut kept_triangles = Triangles::with_capacity(vertices.len() * 2 + 1);
    let mut hole_edges = Vec::new();
    let mut edge_counts = HashMap::new();

    for (_index, &vertex_id) in insertion_order.iter().enumerate() {
        #[cfg(feature = "debug_context")]
        {
            let force_end = debug_context.advance_step();
            if force_end {
                break;
            }
        }

        let vertex = vertices[vertex_id as usize];

        #[cfg(feature = "debug_context")]
        let completed_count = completed.count();

        remove_bad_triangles(
            &mut triangles,
            &mut kept_triangles,
            &mut completed,
            &mut hole_edges,
            vertex,
            vertices,
            infinite_vertices,
            finalize_early,
        );

        #[cfg(feature = "debug_context")]
        {
            if completed.count() > completed_count {
                let finalized_ids: Vec<_> = (completed_count..completed.count())
                    .map(|id| id as crate::types::TriangleId)
                    .collect();
                debug_context.push_snapshot(Phase::FinalizeEarly, &completed, &finalized_ids);
            }
            debug_context.push_snapshot(Phase::RemoveBadTriangles, &triangles, &[]);
        }

        keep_boundary_edges(&mut hole_edges, &mut edge_counts);

        #[cfg(feature = "debug_context")]
        let first_new_id = triangles.next_id();

        retriangulate_hole(
            &mut triangles,
            &hole_edges,
            vertex_id,
            vertices,
            infinite_vertices,
        )?;

        #[cfg(feature = "debug_context")]
        {
            let new_ids: Vec<_> = (first_new_id..triangles.next_id()).collect();
            debug_context.push_snapshot(Phase::Retriangulate, &triangles, &new_ids);
        }

        #[cfg(feature = "progress_log")]
        {
            if _index % ((insertion_order.len() / 50) + 1) == 0 {
                let progress = 100. * _index as f32 / insertion_order.len() as f32;
                info!(
                    "Triangulation progress, step n°{}, {}%: {}/{}, {} live triangles, {} completed",
                    debug_context.current_step,
                    progress,
                    _index,
                    insertion_order.len(),
                    triangles.count(),
                    completed.count()
                );
            }
        }
    }

    completed.buffer_mut().append(triangles.buffer_mut());
    Ok(completed)
}

/// Removes from `triangles` the triangles whose circumcircle contains `vertex`, and collects their edges into `hole_edges`.
///
/// The remaining triangles are moved to `kept_triangles`, then both buffers are swapped: on return, `triangles` holds
/// the triangles still valid and `kept_triangles` is empty.
///
/// With `finalize_early`, triangles with a circumcircle entirely on the left of `vertex` are moved to `completed`.
/// Only valid if the vertices are inserted by increasing x. Triangles connected to an infinite vertex are never finalized.
#[allow(clippy::too_many_arguments)]
pub(crate) fn remove_bad_triangles(
    triangles: &mut Triangles,
    kept_triangles: &mut Triangles,
    completed: &mut Triangles,
    hole_edges: &mut Vec<Edge>,
    vertex: Vertex,
    vertices: &[Vertex],
    infinite_vertices: &InfiniteVertices,
    finalize_early: bool,
) {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "remove_bad_triangles").entered();

    kept_triangles.clear();
    hole_edges.clear();

    for triangle in triangles.buffer_mut().drain(..) {
        if finalize_early && triangle.circumcircle.is_left_of(vertex.x) {
            completed.push(triangle);
        } else if infinite_vertices.is_vertex_in_triangle_circumcircle(&triangle, vertex, vertices)
        {
            hole_edges.extend(triangle.edges());
        } else {
            kept_triangles.push(triangle);
        }
    }

    std::mem::swap(triangles, kept_triangles);
}

/// Only keeps the edges on the boundary of the hole left by the removed triangles.
///
/// An edge shared by two removed triangles is inside the hole: all of its occurrences are removed. The order of the
/// boundary edges is preserved.
///
/// `edge_counts` is a shared buffer, cleared on each call.
pub(crate) fn keep_boundary_edges(hole_edges: &mut Vec<Edge>, edge_counts: &mut HashMap<Edge, u32>) {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "keep_boundary_edges").entered();

    edge_counts.clear();
    for edge in hole_edges.iter() {
        *edge_counts.entry(edge.undirected()).or_insert(0) += 1;
    }
    hole_edges.retain(|edge| edge_counts.get(&edge.undirected()) == Some(&1));
}

/// Creates a triangle between `vertex_id` and each edge of the hole boundary
pub(crate) fn retriangulate_hole(
    triangles: &mut Triangles,
    boundary_edges: &[Edge],
    vertex_id: VertexId,
    vertices: &[Vertex],
    infinite_vertices: &InfiniteVertices,
) -> Result<(), TriangulationError> {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "retriangulate_hole").entered();

    for edge in boundary_edges {
        triangles.push(infinite_vertices.new_triangle([edge.from, edge.to, vertex_id], vertices)?);
    }
    Ok(())
}

/// Removes all the triangles that share a vertex with the super triangle.
///
/// Returns the vertices and circumcircles of the remaining triangles.
pub(crate) fn remove_wrapping(
    triangles: &Triangles,
    super_triangle: &TriangleData,
    #[cfg_attr(not(feature = "parallel_filtering"), allow(unused_variables))]
    config: &TriangulationConfiguration,
    #[cfg(feature = "debug_context")] debug_context: &mut DebugContext,
) -> (Vec<[VertexId; 3]>, Vec<Circumcircle>) {
    #[cfg(feature = "profile_traces")]
    let _span = span!(Level::TRACE, "remove_wrapping").entered();

    let keep = |t: &TriangleData| match t.shares_vertex(super_triangle) {
        true => None,
        false => Some((t.verts, t.circumcircle)),
    };

    #[cfg(feature = "parallel_filtering")]
    let filtered = if triangles.count() > config.filter_parallel_tri_count_threshold {
        triangles
            .buffer()
            .par_iter()
            .with_min_len(config.filter_parallel_min_batch_len)
            .filter_map(keep)
            .unzip()
    } else {
        triangles.buffer().iter().filter_map(keep).unzip()
    };

    #[cfg(not(feature = "parallel_filtering"))]
    let filtered = triangles.buffer().iter().filter_map(keep).unzip();

    #[cfg(feature = "debug_context")]
    {
        let mut filtered_debug_triangles = Triangles::new();
        for triangle in triangles.buffer().iter() {
            if !triangle.shares_vertex(super_triangle) {
                filtered_debug_triangles.push(triangle.clone());
            }
        }
        debug_context.push_snapshot(Phase::RemoveWrapping, &filtered_debug_triangles, &[]);
    }

    filtered
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
