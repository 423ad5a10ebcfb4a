use benchmarks::{uniform_f64, walk_f64};
use ghx_bowyer_watson::{
    triangulation::TriangulationConfiguration, triangulation_from_2d_vertices, types::Vertex,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, Registry};
use tracing_tracy::TracyLayer;

// Bowyer-Watson is quadratic in the worst case, keep it reasonable
const VERTICES_COUNT: usize = 50_000;

fn to_vertices(points: Vec<[f64; 2]>) -> Vec<Vertex> {
    points.iter().map(|p| Vertex::new(p[0], p[1])).collect()
}

fn main() {
    let subscriber = Registry::default()
        .with(TracyLayer::default())
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let data_sets = [
        ("random walk", to_vertices(walk_f64(VERTICES_COUNT))),
        ("uniform", to_vertices(uniform_f64(VERTICES_COUNT))),
    ];

    for (name, vertices) in data_sets.iter() {
        let _span = tracing::info_span!("data_set", name).entered();
        match triangulation_from_2d_vertices(
            vertices,
            TriangulationConfiguration {
                filter_parallel_tri_count_threshold: 10_000,
                filter_parallel_min_batch_len: 10_000,
                ..Default::default()
            },
        ) {
            Ok(triangulation) => info!(
                "{}: {} vertices, {} triangles",
                name,
                vertices.len(),
                triangulation.triangles.len()
            ),
            Err(err) => info!("{}: triangulation failed: {}", name, err),
        }
    }
}
