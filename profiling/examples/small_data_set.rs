use benchmarks::walk_f64;
use ghx_bowyer_watson::{
    triangulation::TriangulationConfiguration, triangulation_from_2d_vertices, types::Vertex,
    InsertionOrder,
};
use tracing_subscriber::{layer::SubscriberExt, Registry};
use tracing_tracy::TracyLayer;

const VERTICES_COUNT: usize = 2000;
const ITERATIONS: usize = 20;

fn main() {
    let subscriber = Registry::default().with(TracyLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let vertices: Vec<Vertex> = walk_f64(VERTICES_COUNT)
        .iter()
        .map(|p| Vertex::new(p[0], p[1]))
        .collect();

    // Without early finalization, for comparison in the profiler
    for insertion_order in [InsertionOrder::SortedByX, InsertionOrder::AsGiven] {
        let _span = tracing::info_span!("insertion_order", ?insertion_order).entered();
        for _ in 0..ITERATIONS {
            let _triangulation = triangulation_from_2d_vertices(
                &vertices,
                TriangulationConfiguration {
                    insertion_order,
                    ..Default::default()
                },
            );
        }
    }
}
