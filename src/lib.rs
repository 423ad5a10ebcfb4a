//! 2d Delaunay triangulation with the incremental Bowyer-Watson algorithm.
//!
//! Vertices are inserted one at a time into a mesh seeded with a container triangle enclosing all of them. Each
//! insertion removes the triangles whose circumcircle contains the new vertex, then fills the hole by connecting the
//! vertex to the edges of its boundary. Triangles connected to the container triangle are removed at the end.
//!
//! ```
//! use ghx_bowyer_watson::{
//!     triangulation::TriangulationConfiguration, triangulation_from_2d_vertices, types::Vertex,
//! };
//!
//! let vertices = vec![
//!     Vertex::new(0., 0.),
//!     Vertex::new(1., 0.),
//!     Vertex::new(0.5, 1.),
//!     Vertex::new(0.5, 0.3),
//! ];
//! let triangulation =
//!     triangulation_from_2d_vertices(&vertices, TriangulationConfiguration::default())
//!         .expect("Triangulation should succeed");
//!
//! assert_eq!(3, triangulation.triangles.len());
//! ```

pub mod infinite;
pub mod triangulation;
pub mod types;
pub mod utils;

#[cfg(feature = "debug_context")]
pub mod debug;

pub use glam;
pub use hashbrown;

pub use triangulation::{
    triangulation_from_2d_vertices, InsertionOrder, Triangulation, TriangulationError,
};

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
